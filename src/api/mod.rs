pub mod client;
pub mod traits;
pub mod types;

pub use client::HttpApi;
pub use traits::EstateApi;
pub use types::{Credentials, PropertyFilter, Registration, WebhookPayload};
