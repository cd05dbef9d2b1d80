//! Client and orchestration for the upstream tracking provider.
//!
//! Provider API characteristics the code leans on:
//! - every operation is a POST with a JSON batch payload; this server
//!   always sends one-element batches
//! - a `17token` header carries the credential
//! - failures arrive either as a non-2xx status or as a structured
//!   `data.errors` list inside an HTTP 200; both count as errors

mod client;
mod error;
mod orchestrator;
mod types;

pub use client::{TrackClient, TrackClientConfig};
pub use error::TrackError;
pub use orchestrator::Tracker;
pub use types::{TrackingReport, TrackingRequest};
