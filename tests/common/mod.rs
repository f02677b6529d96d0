#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use parking_lot::Mutex;
use reqwest::StatusCode;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

use luxe_estates::api::{Credentials, PropertyFilter, Registration, WebhookPayload};
use luxe_estates::models::{
    Booking, BookingId, BookingStatus, Category, CategoryId, Decimal, Payment, PaymentStatus, Property,
    PropertyId, PropertyRef, Provider, TokenPair, User,
};
use luxe_estates::session::shared;
use luxe_estates::{ApiError, EstateApi, Session, SharedSession};

/// How the backend answers a create-booking call
#[derive(Clone)]
pub enum CreateReply {
    Created(BookingId),
    Rejected(Option<String>),
}

/// In-memory backend recording every call it receives
pub struct FakeApi {
    pub session: SharedSession,
    pub calls: Mutex<Vec<String>>,
    pub properties: Vec<Property>,
    pub categories: Vec<Category>,
    pub filters: Mutex<Vec<PropertyFilter>>,
    pub create_reply: CreateReply,
    pub create_gate: Option<Arc<Notify>>,
    pub statuses: Mutex<VecDeque<BookingStatus>>,
    pub fail_fetches: Mutex<u32>,
    pub cancel_on_fetch: Mutex<Option<(usize, CancellationToken)>>,
    pub webhooks: Mutex<Vec<(Provider, WebhookPayload)>>,
    pub payment_status: PaymentStatus,
}

impl Default for FakeApi {
    fn default() -> Self {
        Self {
            session: shared(Session::default()),
            calls: Mutex::new(Vec::new()),
            properties: Vec::new(),
            categories: Vec::new(),
            filters: Mutex::new(Vec::new()),
            create_reply: CreateReply::Created(42),
            create_gate: None,
            statuses: Mutex::new(VecDeque::new()),
            fail_fetches: Mutex::new(0),
            cancel_on_fetch: Mutex::new(None),
            webhooks: Mutex::new(Vec::new()),
            payment_status: PaymentStatus::Initiated,
        }
    }
}

impl FakeApi {
    pub fn signed_in() -> Self {
        let api = Self::default();
        api.sign_in("token");
        api
    }

    pub fn with_statuses(statuses: impl IntoIterator<Item = BookingStatus>) -> Self {
        let api = Self {
            statuses: Mutex::new(statuses.into_iter().collect()),
            ..Self::default()
        };
        api.sign_in("token");
        api
    }

    pub fn sign_in(&self, token: &str) {
        *self.session.write() = Session::with_token(token);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.calls.lock().iter().filter(|c| c.starts_with(prefix)).count()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().push(call.into());
    }
}

pub fn property(id: PropertyId, slug: &str, category: CategoryId) -> Property {
    Property {
        id,
        title: format!("Listing {id}"),
        slug: slug.to_string(),
        description: "Panoramic views.".to_string(),
        location: "Verbier, Switzerland".to_string(),
        price: Decimal::from(6_200_000),
        bedrooms: 7,
        bathrooms: 8,
        area: Some(9100),
        amenities: vec!["Sauna".to_string()],
        image: None,
        image_url: None,
        status: None,
        is_available: true,
        category,
        created_at: None,
        updated_at: None,
    }
}

pub fn booking(id: BookingId, status: BookingStatus) -> Booking {
    Booking {
        id,
        property: PropertyRef::Id(7),
        total_amount: Decimal::from(6_200_000),
        status,
        created_at: Utc.with_ymd_and_hms(2025, 3, 14, 9, 0, 0).unwrap(),
        updated_at: None,
    }
}

#[async_trait]
impl EstateApi for FakeApi {
    fn is_authenticated(&self) -> bool {
        self.session.read().is_authenticated()
    }

    async fn list_properties(&self, filter: &PropertyFilter) -> Result<Vec<Property>, ApiError> {
        self.record("GET /api/properties/");
        self.filters.lock().push(filter.clone());
        Ok(self.properties.clone())
    }

    async fn get_property(&self, slug: &str) -> Result<Property, ApiError> {
        self.record(format!("GET /api/properties/{slug}/"));
        if slug == "broken" {
            return Err(ApiError::Status {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                detail: None,
            });
        }
        self.properties
            .iter()
            .find(|p| p.slug == slug)
            .cloned()
            .ok_or_else(|| ApiError::NotFound {
                path: format!("/api/properties/{slug}/"),
            })
    }

    async fn recommended_properties(&self, category_id: CategoryId) -> Result<Vec<Property>, ApiError> {
        self.record(format!("GET /api/properties/recommended/?category_id={category_id}"));
        Ok(self
            .properties
            .iter()
            .filter(|p| p.category == category_id)
            .cloned()
            .collect())
    }

    async fn list_categories(&self) -> Result<Vec<Category>, ApiError> {
        self.record("GET /api/categories/");
        Ok(self.categories.clone())
    }

    async fn list_bookings(&self) -> Result<Vec<Booking>, ApiError> {
        self.record("GET /api/bookings/");
        Ok(vec![booking(42, BookingStatus::Pending)])
    }

    async fn get_booking(&self, id: BookingId) -> Result<Booking, ApiError> {
        self.record(format!("GET /api/bookings/{id}/"));

        let fetches = self.count("GET /api/bookings/");
        if let Some((after, token)) = self.cancel_on_fetch.lock().as_ref() {
            if fetches >= *after {
                token.cancel();
            }
        }

        {
            let mut failures = self.fail_fetches.lock();
            if *failures > 0 {
                *failures -= 1;
                return Err(ApiError::Status {
                    status: StatusCode::BAD_GATEWAY,
                    detail: None,
                });
            }
        }

        let status = self.statuses.lock().pop_front().unwrap_or(BookingStatus::Pending);
        Ok(booking(id, status))
    }

    async fn create_booking(&self, property_id: PropertyId) -> Result<Booking, ApiError> {
        self.record(format!("POST /api/bookings/create/ property_id={property_id}"));
        if let Some(gate) = &self.create_gate {
            gate.notified().await;
        }
        match &self.create_reply {
            CreateReply::Created(id) => Ok(booking(*id, BookingStatus::Pending)),
            CreateReply::Rejected(detail) => Err(ApiError::Status {
                status: StatusCode::BAD_REQUEST,
                detail: detail.clone(),
            }),
        }
    }

    async fn initiate_payment(&self, booking_id: BookingId, provider: Provider) -> Result<Payment, ApiError> {
        self.record(format!("POST /api/payments/initiate/ booking_id={booking_id}"));
        Ok(Payment {
            id: 1,
            booking: booking_id,
            provider,
            status: self.payment_status,
            transaction_id: Some(format!("{}_test_txn_{booking_id}", provider.webhook_segment())),
            raw_response: None,
        })
    }

    async fn send_webhook(&self, provider: Provider, payload: &WebhookPayload) -> Result<(), ApiError> {
        self.record(format!("POST /api/payments/webhook/{}/", provider.webhook_segment()));
        self.webhooks.lock().push((provider, payload.clone()));
        Ok(())
    }

    async fn login(&self, credentials: &Credentials) -> Result<TokenPair, ApiError> {
        self.record("POST /api/auth/login/");
        Ok(TokenPair {
            access: "access".into(),
            refresh: "refresh".into(),
            user: Some(User {
                id: 1,
                email: credentials.email.clone(),
                first_name: None,
                last_name: None,
            }),
        })
    }

    async fn register(&self, registration: &Registration) -> Result<User, ApiError> {
        self.record("POST /api/auth/register/");
        Ok(User {
            id: 2,
            email: registration.email.clone(),
            first_name: registration.first_name.clone(),
            last_name: registration.last_name.clone(),
        })
    }

    async fn me(&self) -> Result<User, ApiError> {
        self.record("GET /api/auth/me/");
        Err(ApiError::Unauthorized { detail: None })
    }
}
