//! Error types for the pricing pipeline.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Errors that can occur while serving a pricing request.
#[derive(Debug, thiserror::Error)]
pub enum PricingError {
    /// The requested depot is not a known location.
    #[error("unknown location: {0}")]
    UnknownLocation(String),

    /// The requested hour of day is outside [0, 24).
    #[error("hour of day out of range: {0}")]
    InvalidHour(f64),

    /// No bookings survive preprocessing for the requested depot.
    #[error("no recent bookings at {0}")]
    NoRecentBookings(String),

    /// A model, scaler, or encoder artifact failed to load.
    #[error("artifact {name} failed to load: {reason}")]
    Artifact { name: String, reason: String },

    /// A feature vector does not match the width the models were fitted on.
    #[error("feature vector width {actual}, expected {expected}")]
    FeatureShape { expected: usize, actual: usize },

    /// The input tables are malformed.
    #[error("data error: {0}")]
    Data(String),

    /// CSV parsing failed.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error reading tables or artifacts.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Artifact deserialization failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PricingError {
    /// HTTP status the error maps to. Validation problems are the caller's,
    /// missing data is a 404, everything else is internal.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::UnknownLocation(_) | Self::InvalidHour(_) => StatusCode::BAD_REQUEST,
            Self::NoRecentBookings(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for PricingError {
    fn into_response(self) -> Response {
        let status = self.status();
        // Internal failures are logged server-side; the body only ever
        // carries the display message.
        if status.is_server_error() {
            tracing::error!(error = %self, "pricing request failed");
        }
        (status, axum::Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

/// Result type for pricing operations.
pub type Result<T> = std::result::Result<T, PricingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            PricingError::UnknownLocation("Atlantis".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            PricingError::InvalidHour(27.0).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            PricingError::NoRecentBookings("Perth".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            PricingError::FeatureShape {
                expected: 47,
                actual: 46
            }
            .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
