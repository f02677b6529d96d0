use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::api::traits::EstateApi;
use crate::api::types::{
    CreateBookingRequest, Credentials, InitiatePaymentRequest, ListBody, PropertyFilter, Registration,
    WebhookPayload,
};
use crate::config::Config;
use crate::error::ApiError;
use crate::models::{
    Booking, BookingId, Category, CategoryId, Payment, Property, PropertyId, Provider, TokenPair, User,
};
use crate::session::SharedSession;

/// HTTP client for the brokerage REST API
pub struct HttpApi {
    client: Client,
    base_url: String,
    session: SharedSession,
}

impl HttpApi {
    /// Create a client for the configured host.
    ///
    /// The token is read from `session` on every request, so signing in or out
    /// through the same handle takes effect immediately.
    pub fn new(config: &Config, session: SharedSession) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.http_timeout)
            .user_agent(concat!("luxe-estates/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &SharedSession {
        &self.session
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let builder = self
            .client
            .request(method, url)
            .header(reqwest::header::ACCEPT, "application/json");
        let token = self.session.read().token().map(str::to_string);
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder, path: &str) -> Result<T, ApiError> {
        debug!("Requesting {}", path);

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        debug!("{} answered {} ({} bytes)", path, status, body.len());
        decode_response(path, status, &body)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send(self.request(Method::GET, path), path).await
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, ApiError> {
        self.send(self.request(Method::POST, path).json(body), path).await
    }

    async fn get_list<T: DeserializeOwned>(&self, builder: RequestBuilder, path: &str) -> Result<Vec<T>, ApiError> {
        let body: ListBody<T> = self.send(builder, path).await?;
        Ok(body.into_items())
    }
}

/// Map a raw response onto a typed result.
///
/// Non-success statuses become [`ApiError`] variants carrying the server's
/// `detail` message when it sent one.
pub fn decode_response<T: DeserializeOwned>(path: &str, status: StatusCode, body: &str) -> Result<T, ApiError> {
    if status.is_success() {
        return serde_json::from_str(body).map_err(|source| ApiError::Decode {
            path: path.to_string(),
            source,
        });
    }

    let detail = extract_detail(body);
    match status {
        StatusCode::NOT_FOUND => Err(ApiError::NotFound { path: path.to_string() }),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ApiError::Unauthorized { detail }),
        _ => {
            warn!("{} failed with {}", path, status);
            Err(ApiError::Status { status, detail })
        }
    }
}

/// Pull a human-readable message out of an error body.
///
/// Handles `{"detail": "..."}`, a bare list of messages, and field error maps
/// such as `{"non_field_errors": ["..."]}`.
pub fn extract_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;

    fn first_message(value: &serde_json::Value) -> Option<String> {
        match value {
            serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
            serde_json::Value::Array(items) => items.iter().find_map(first_message),
            _ => None,
        }
    }

    match &value {
        serde_json::Value::Object(map) => map
            .get("detail")
            .and_then(first_message)
            .or_else(|| map.get("non_field_errors").and_then(first_message))
            .or_else(|| map.values().find_map(first_message)),
        other => first_message(other),
    }
}

#[async_trait]
impl EstateApi for HttpApi {
    fn is_authenticated(&self) -> bool {
        self.session.read().is_authenticated()
    }

    async fn list_properties(&self, filter: &PropertyFilter) -> Result<Vec<Property>, ApiError> {
        let path = "/api/properties/";
        self.get_list(self.request(Method::GET, path).query(filter), path).await
    }

    async fn get_property(&self, slug: &str) -> Result<Property, ApiError> {
        self.get(&format!("/api/properties/{slug}/")).await
    }

    async fn recommended_properties(&self, category_id: CategoryId) -> Result<Vec<Property>, ApiError> {
        let path = "/api/properties/recommended/";
        let builder = self.request(Method::GET, path).query(&[("category_id", category_id)]);
        self.get_list(builder, path).await
    }

    async fn list_categories(&self) -> Result<Vec<Category>, ApiError> {
        let path = "/api/categories/";
        self.get_list(self.request(Method::GET, path), path).await
    }

    async fn list_bookings(&self) -> Result<Vec<Booking>, ApiError> {
        let path = "/api/bookings/";
        self.get_list(self.request(Method::GET, path), path).await
    }

    async fn get_booking(&self, id: BookingId) -> Result<Booking, ApiError> {
        self.get(&format!("/api/bookings/{id}/")).await
    }

    async fn create_booking(&self, property_id: PropertyId) -> Result<Booking, ApiError> {
        self.post("/api/bookings/create/", &CreateBookingRequest { property_id })
            .await
    }

    async fn initiate_payment(&self, booking_id: BookingId, provider: Provider) -> Result<Payment, ApiError> {
        self.post("/api/payments/initiate/", &InitiatePaymentRequest { booking_id, provider })
            .await
    }

    async fn send_webhook(&self, provider: Provider, payload: &WebhookPayload) -> Result<(), ApiError> {
        let path = format!("/api/payments/webhook/{}/", provider.webhook_segment());
        let _ack: serde_json::Value = self.post(&path, payload).await?;
        Ok(())
    }

    async fn login(&self, credentials: &Credentials) -> Result<TokenPair, ApiError> {
        self.post("/api/auth/login/", credentials).await
    }

    async fn register(&self, registration: &Registration) -> Result<User, ApiError> {
        self.post("/api/auth/register/", registration).await
    }

    async fn me(&self) -> Result<User, ApiError> {
        self.get("/api/auth/me/").await
    }
}
