use async_trait::async_trait;

use crate::api::types::{Credentials, PropertyFilter, Registration, WebhookPayload};
use crate::error::ApiError;
use crate::models::{
    Booking, BookingId, Category, CategoryId, Payment, Property, PropertyId, Provider, TokenPair, User,
};

/// Operations offered by the brokerage backend.
///
/// The HTTP client is the production implementation; flows are generic over
/// this trait so they can run against any backend.
#[async_trait]
pub trait EstateApi: Send + Sync {
    /// Whether requests currently go out with a bearer token
    fn is_authenticated(&self) -> bool;

    async fn list_properties(&self, filter: &PropertyFilter) -> Result<Vec<Property>, ApiError>;

    async fn get_property(&self, slug: &str) -> Result<Property, ApiError>;

    /// Active properties in the category and all of its descendants
    async fn recommended_properties(&self, category_id: CategoryId) -> Result<Vec<Property>, ApiError>;

    async fn list_categories(&self) -> Result<Vec<Category>, ApiError>;

    async fn list_bookings(&self) -> Result<Vec<Booking>, ApiError>;

    async fn get_booking(&self, id: BookingId) -> Result<Booking, ApiError>;

    /// Creates a PENDING booking server-side
    async fn create_booking(&self, property_id: PropertyId) -> Result<Booking, ApiError>;

    async fn initiate_payment(&self, booking_id: BookingId, provider: Provider) -> Result<Payment, ApiError>;

    /// Deliver a provider callback to the backend
    async fn send_webhook(&self, provider: Provider, payload: &WebhookPayload) -> Result<(), ApiError>;

    async fn login(&self, credentials: &Credentials) -> Result<TokenPair, ApiError>;

    async fn register(&self, registration: &Registration) -> Result<User, ApiError>;

    async fn me(&self) -> Result<User, ApiError>;
}
