//! Parcel status update storage.

mod store;

pub use store::{ParcelStore, ParcelUpdate, UpdateInput};
