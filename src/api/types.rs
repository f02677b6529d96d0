use serde::{Deserialize, Serialize};

use crate::models::{BookingId, CategoryId, ListingStatus, PaymentStatus, PropertyId, Provider};

/// Server-side filters for the property listing
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct PropertyFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<CategoryId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ListingStatus>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateBookingRequest {
    pub property_id: PropertyId,
}

#[derive(Debug, Clone, Serialize)]
pub struct InitiatePaymentRequest {
    pub booking_id: BookingId,
    pub provider: Provider,
}

/// Body of a provider callback
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WebhookPayload {
    pub booking_id: BookingId,
    pub status: PaymentStatus,
    pub transaction_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

/// List endpoints answer either with a bare array or a paginated envelope.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ListBody<T> {
    Plain(Vec<T>),
    Page { results: Vec<T> },
}

impl<T> ListBody<T> {
    pub(crate) fn into_items(self) -> Vec<T> {
        match self {
            ListBody::Plain(items) => items,
            ListBody::Page { results } => results,
        }
    }
}
