//! Application state for the web layer.

use std::sync::Arc;

use sqlx::sqlite::SqlitePool;

use crate::carriers::CarrierDirectory;
use crate::config::Config;
use crate::news::NewsStore;
use crate::parcels::ParcelStore;
use crate::tracking::Tracker;

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Carrier directory (empty when the source document failed to load).
    pub carriers: Arc<CarrierDirectory>,

    /// Tracking orchestrator; `None` without a credential, in which case
    /// the tracking endpoint fails each request with a configuration error.
    pub tracker: Option<Arc<Tracker>>,

    /// News post store.
    pub news: NewsStore,

    /// Parcel status update store.
    pub parcel_updates: ParcelStore,

    /// Runtime configuration (shared secrets live here).
    pub config: Arc<Config>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(
        config: Config,
        carriers: Arc<CarrierDirectory>,
        tracker: Option<Tracker>,
        pool: SqlitePool,
    ) -> Self {
        Self {
            carriers,
            tracker: tracker.map(Arc::new),
            news: NewsStore::new(pool.clone()),
            parcel_updates: ParcelStore::new(pool),
            config: Arc::new(config),
        }
    }
}
