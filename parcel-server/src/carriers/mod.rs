//! Carrier directory: canonical carrier codes from free-form input.
//!
//! The directory is loaded once at startup from a JSON document and never
//! mutated. A failed load degrades to an empty directory so the rest of the
//! server keeps working without carrier resolution.

mod directory;
mod error;

pub use directory::{CarrierDirectory, CarrierRecord};
pub use error::CarrierError;
