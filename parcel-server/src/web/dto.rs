//! Data transfer objects for the web layer.
//!
//! Field names match what the front end sends and expects: camelCase, with
//! aliases for the older spellings the admin tooling has used over time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::news::NewsPost;
use crate::parcels::{ParcelUpdate, UpdateInput};
use crate::tracking::TrackingReport;

/// Request body for a tracking lookup.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackRequestBody {
    /// Tracking number. Validated after trimming.
    #[serde(default)]
    pub number: String,

    /// Explicit carrier code, when the caller already knows it.
    #[serde(default)]
    pub carrier: Option<u32>,

    /// Free-form carrier name or "100 - DHL" style text.
    #[serde(default)]
    pub carrier_text: Option<String>,
}

/// Aggregated tracking response: the three raw upstream bodies.
#[derive(Debug, Serialize)]
pub struct TrackResponse {
    pub register: Value,
    pub info: Value,
    pub stop: Value,
}

impl From<TrackingReport> for TrackResponse {
    fn from(report: TrackingReport) -> Self {
        Self {
            register: report.register,
            info: report.info,
            stop: report.stop,
        }
    }
}

/// Query parameters for the news listing.
#[derive(Debug, Deserialize)]
pub struct NewsListParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Query parameters for fetching one post.
///
/// The id stays a string here so a garbled value can produce a clear
/// message instead of a generic deserialization failure.
#[derive(Debug, Deserialize)]
pub struct NewsPostParams {
    pub id: Option<String>,
    pub slug: Option<String>,
}

/// Body for news writes. Create ignores `id`; update and delete require it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsWriteBody {
    /// Shared secret. The admin tooling has used several names for it.
    #[serde(default, alias = "secretKey", alias = "key")]
    pub secret: Option<String>,

    #[serde(default)]
    pub id: Option<i64>,

    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub cover_url: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub content_html: Option<String>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

/// Envelope for a single post.
#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub post: NewsPost,
}

/// Query parameters for the parcel updates listing.
#[derive(Debug, Deserialize)]
pub struct ParcelListParams {
    /// Parcel code; older clients sent `parcel` or `number`.
    #[serde(default, alias = "parcel", alias = "number")]
    pub code: Option<String>,
}

/// Body for parcel update writes.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParcelWriteBody {
    #[serde(default, alias = "secretKey", alias = "key")]
    pub secret: Option<String>,

    /// CREATE, UPDATE or DELETE (case-insensitive).
    #[serde(default)]
    pub mode: Option<String>,

    /// Parcel code; older clients sent `code` or `number`.
    #[serde(default, alias = "code", alias = "number")]
    pub parcel_code: Option<String>,

    /// Fields of the update being written.
    #[serde(default)]
    pub data: UpdateFields,

    /// Explicit target for UPDATE and DELETE; defaults to the newest update.
    #[serde(default)]
    pub update_id: Option<i64>,
}

/// Update fields, accepting the alias vocabulary of the admin tools.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateFields {
    #[serde(default, alias = "timestamp", alias = "date")]
    pub time: Option<DateTime<Utc>>,
    #[serde(default, alias = "description")]
    pub event: Option<String>,
    #[serde(default, alias = "place")]
    pub location: Option<String>,
    /// An id embedded in the data blob also selects the target.
    #[serde(default, alias = "updateId")]
    pub id: Option<i64>,
}

impl UpdateFields {
    /// The store's input type, without the target id.
    pub fn as_input(&self) -> UpdateInput {
        UpdateInput {
            time: self.time,
            event: self.event.clone(),
            location: self.location.clone(),
        }
    }
}

/// Envelope for a parcel's update list.
#[derive(Debug, Serialize)]
pub struct ParcelUpdatesResponse {
    pub code: String,
    pub updates: Vec<ParcelUpdate>,
}

/// Envelope for one created or changed update.
#[derive(Debug, Serialize)]
pub struct ParcelUpdateChanged {
    pub code: String,
    pub update: ParcelUpdate,
}

/// Envelope for one removed update.
#[derive(Debug, Serialize)]
pub struct ParcelUpdateRemoved {
    pub code: String,
    pub removed: ParcelUpdate,
}

/// Error payload returned by every failing endpoint.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Human-readable message.
    pub error: String,
    /// Raw upstream payload, when one is worth passing along.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<Value>,
}
