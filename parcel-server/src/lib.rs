//! Parcel tracking site backend.
//!
//! Proxies tracking lookups to the 17TRACK API, serves the carrier code
//! directory, and stores the site's news posts and hand-curated parcel
//! status updates.

pub mod carriers;
pub mod config;
pub mod db;
pub mod news;
pub mod parcels;
pub mod tracking;
pub mod web;
