//! Tracking error types.

use serde_json::Value;

/// Errors from one tracking lookup, tagged by where they arose.
#[derive(Debug, thiserror::Error)]
pub enum TrackError {
    /// The request was rejected before any upstream call.
    #[error("{0}")]
    Validation(String),

    /// Server-side configuration required for tracking is missing.
    #[error("{0}")]
    Configuration(String),

    /// The provider answered with an error status or a structured error list.
    #[error("{message}")]
    Upstream {
        /// The provider's HTTP status, when a response was received.
        status: Option<u16>,
        /// Human-readable failure description.
        message: String,
        /// Raw response body, passed to the caller as diagnostic detail.
        detail: Option<Value>,
    },

    /// Network-level failure talking to the provider.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn display_shows_the_message() {
        let err = TrackError::Validation("number is required".to_string());
        assert_eq!(err.to_string(), "number is required");

        let err = TrackError::Upstream {
            status: Some(200),
            message: "Submitted number is invalid.".to_string(),
            detail: Some(json!({ "code": 0 })),
        };
        assert_eq!(err.to_string(), "Submitted number is invalid.");
    }
}
