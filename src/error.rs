//! Error types for the brokerage API client

use reqwest::StatusCode;
use thiserror::Error;

/// Failure talking to the brokerage API
#[derive(Error, Debug)]
pub enum ApiError {
    /// Resource does not exist (HTTP 404)
    #[error("Not found: {path}")]
    NotFound { path: String },

    /// Missing or rejected bearer credential (HTTP 401/403)
    #[error("Unauthorized: {}", .detail.as_deref().unwrap_or("authentication required"))]
    Unauthorized { detail: Option<String> },

    /// Any other non-success status
    #[error("API responded with {status}: {}", .detail.as_deref().unwrap_or("no detail"))]
    Status {
        status: StatusCode,
        detail: Option<String>,
    },

    /// Connection, timeout or body read failure
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Response body did not match the expected schema
    #[error("Unexpected response from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    /// Server-provided message suitable for showing inline, if any
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Unauthorized { detail } | ApiError::Status { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound { .. })
    }
}

/// Invalid or missing configuration
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?} ({reason})")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("Could not determine a location for the session file; set LUXE_SESSION_PATH")]
    NoSessionLocation,

    #[error("Payment simulation is disabled; set LUXE_PAYMENT_SIMULATION=true for development backends")]
    SimulationDisabled,
}
