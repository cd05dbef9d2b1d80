//! Carrier source error types.

/// Errors that can occur while loading the carrier source document.
#[derive(Debug, thiserror::Error)]
pub enum CarrierError {
    /// Reading the source file failed
    #[error("could not read carrier file: {0}")]
    Io(#[from] std::io::Error),

    /// The source document is not valid JSON
    #[error("could not parse carrier file: {0}")]
    Json(#[from] serde_json::Error),
}
