//! Three-step tracking orchestration.
//!
//! Each lookup registers the number with the provider, fetches the current
//! track info, and then deletes the registration so the provider does not
//! keep polling the carrier on its own schedule. On the success path no
//! upstream state is left behind.

use std::sync::Arc;

use reqwest::StatusCode;
use serde_json::Value;
use tracing::debug;

use crate::carriers::CarrierDirectory;

use super::client::TrackClient;
use super::error::TrackError;
use super::types::{TrackingReport, TrackingRequest, first_error_message, structured_errors};

/// Drives tracking lookups through the upstream API.
#[derive(Debug)]
pub struct Tracker {
    client: TrackClient,
    directory: Arc<CarrierDirectory>,
}

impl Tracker {
    /// Create a new tracker.
    pub fn new(client: TrackClient, directory: Arc<CarrierDirectory>) -> Self {
        Self { client, directory }
    }

    /// Run one tracking lookup: register, fetch info, delete.
    ///
    /// Register and info failures abort the sequence. The delete step is
    /// best-effort: its body is folded into the report whatever its status,
    /// and a failure to reach the provider at all yields an empty object.
    /// No step is ever retried.
    pub async fn track(&self, request: &TrackingRequest) -> Result<TrackingReport, TrackError> {
        let number = request.number.trim();
        if number.is_empty() {
            return Err(TrackError::Validation("number is required".to_string()));
        }

        let carrier = self
            .directory
            .resolve(request.carrier, request.carrier_text.as_deref());
        if let Some(code) = carrier {
            debug!(
                carrier = code,
                name = self.directory.name_of(code).unwrap_or(""),
                "resolved carrier"
            );
        }

        // Step 1: register the number so the provider starts tracking it.
        // The provider can refuse inside an HTTP 200, via `data.errors`.
        let (status, register) = self.client.register(number, carrier).await?;
        if !status.is_success() || structured_errors(&register).is_some() {
            let message = first_error_message(&register).unwrap_or_else(|| status_reason(status));
            return Err(TrackError::Upstream {
                status: Some(status.as_u16()),
                message,
                detail: Some(register),
            });
        }

        // Step 2: fetch the current tracking events. A failure here skips
        // the delete step and leaves the registration dangling upstream,
        // where it expires on the provider's schedule.
        let (status, info) = self.client.get_track_info(number, carrier).await?;
        if !status.is_success() {
            return Err(TrackError::Upstream {
                status: Some(status.as_u16()),
                message: status_reason(status),
                detail: Some(info),
            });
        }

        // Step 3: stop tracking. Failures are swallowed; the lookup already
        // has its answer.
        let stop = match self.client.delete_track(number, carrier).await {
            Ok((_, body)) => body,
            Err(_) => Value::Object(serde_json::Map::new()),
        };

        Ok(TrackingReport {
            register,
            info,
            stop,
        })
    }
}

/// Canonical reason phrase for an HTTP status, e.g. "Internal Server Error".
fn status_reason(status: StatusCode) -> String {
    status
        .canonical_reason()
        .unwrap_or("request failed")
        .to_string()
}
