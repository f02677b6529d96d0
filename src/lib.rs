//! Client for the Luxe Estates brokerage API: listings, bookings and the
//! booking-to-payment handoff.

pub mod api;
pub mod booking;
pub mod config;
pub mod error;
pub mod models;
pub mod payment;
pub mod routes;
pub mod session;
pub mod views;

pub use api::{EstateApi, HttpApi};
pub use booking::{BookingFlow, BookingOutcome};
pub use config::Config;
pub use error::{ApiError, ConfigError};
pub use payment::{CheckoutOutcome, PaymentFlow, PollOutcome, PollPolicy};
pub use routes::Route;
pub use session::{Session, SessionStore, SharedSession};
