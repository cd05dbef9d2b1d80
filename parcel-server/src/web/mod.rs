//! Web layer for the parcel tracking site.
//!
//! Provides the JSON API and serves the static front end.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::create_router;
pub use state::AppState;
