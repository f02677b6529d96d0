use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub use rust_decimal::Decimal;

pub type PropertyId = i64;
pub type BookingId = i64;
pub type CategoryId = i64;

/// Publication status of a listing
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum ListingStatus {
    Draft,
    Active,
    Inactive,
}

/// Property category, optionally nested under a parent
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub parent: Option<CategoryId>,
}

/// Core property data model
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Property {
    pub id: PropertyId,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
    pub location: String,
    pub price: Decimal,
    pub bedrooms: u32,
    pub bathrooms: u32,
    #[serde(default)]
    pub area: Option<u32>,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub status: Option<ListingStatus>,
    pub is_available: bool,
    pub category: CategoryId,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Property {
    /// Preferred image reference: explicit URL first, then the uploaded file.
    pub fn image_ref(&self) -> Option<&str> {
        self.image_url
            .as_deref()
            .or(self.image.as_deref())
            .filter(|s| !s.is_empty())
    }
}

/// Compact property shape embedded in booking responses
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PropertySummary {
    pub id: PropertyId,
    pub title: String,
    pub slug: String,
    pub location: String,
    #[serde(default)]
    pub image: Option<String>,
}

/// A booking references its property either by id or by an embedded summary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum PropertyRef {
    Id(PropertyId),
    Summary(PropertySummary),
}

impl PropertyRef {
    pub fn id(&self) -> PropertyId {
        match self {
            PropertyRef::Id(id) => *id,
            PropertyRef::Summary(summary) => summary.id,
        }
    }

    pub fn summary(&self) -> Option<&PropertySummary> {
        match self {
            PropertyRef::Id(_) => None,
            PropertyRef::Summary(summary) => Some(summary),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Canceled,
    Paid,
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BookingStatus::Pending => "PENDING",
            BookingStatus::Confirmed => "CONFIRMED",
            BookingStatus::Canceled => "CANCELED",
            BookingStatus::Paid => "PAID",
        };
        f.write_str(label)
    }
}

/// Reservation of a property by the signed-in user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Booking {
    pub id: BookingId,
    pub property: PropertyRef,
    pub total_amount: Decimal,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

impl User {
    pub fn display_name(&self) -> String {
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect();
        if parts.is_empty() {
            self.email.clone()
        } else {
            parts.join(" ")
        }
    }
}

/// Access/refresh pair returned by the login endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
    #[serde(default)]
    pub user: Option<User>,
}

/// Payment processors known to the backend
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Provider {
    /// Card processor
    Stripe,
    /// Mobile-money service
    Bkash,
}

impl Provider {
    /// Path segment of the provider's webhook endpoint
    pub fn webhook_segment(&self) -> &'static str {
        match self {
            Provider::Stripe => "stripe",
            Provider::Bkash => "bkash",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::Stripe => f.write_str("Stripe"),
            Provider::Bkash => f.write_str("bKash"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentStatus {
    Initiated,
    Success,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Payment {
    pub id: i64,
    pub booking: BookingId,
    pub provider: Provider,
    pub status: PaymentStatus,
    #[serde(default)]
    pub transaction_id: Option<String>,
    #[serde(default)]
    pub raw_response: Option<serde_json::Value>,
}
