//! Tracking request/result types and upstream envelope helpers.

use serde_json::Value;

/// One tracking lookup as received from the caller.
#[derive(Debug, Clone)]
pub struct TrackingRequest {
    /// Tracking number supplied by the end user.
    pub number: String,
    /// Explicit carrier code, if the caller already knows it.
    pub carrier: Option<u32>,
    /// Free-form carrier hint ("dhl", "100 - DHL", ...).
    pub carrier_text: Option<String>,
}

/// Aggregate of the three raw upstream response bodies.
///
/// Bodies are passed through verbatim; the server does not reinterpret them.
#[derive(Debug, Clone)]
pub struct TrackingReport {
    /// Response body of the register call.
    pub register: Value,
    /// Response body of the track info call.
    pub info: Value,
    /// Response body of the delete call, or an empty object when it failed.
    pub stop: Value,
}

/// Non-empty `data.errors` array of an upstream response body, if present.
///
/// The provider reports per-number failures this way inside an HTTP 200.
pub(crate) fn structured_errors(body: &Value) -> Option<&Vec<Value>> {
    body.get("data")?
        .get("errors")?
        .as_array()
        .filter(|errors| !errors.is_empty())
}

/// Message of the first entry in the body's `data.errors` array.
pub(crate) fn first_error_message(body: &Value) -> Option<String> {
    structured_errors(body)?
        .first()?
        .get("message")?
        .as_str()
        .map(str::to_owned)
}
