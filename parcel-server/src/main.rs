use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use parcel_server::carriers::CarrierDirectory;
use parcel_server::config::Config;
use parcel_server::db;
use parcel_server::tracking::{TrackClient, TrackClientConfig, Tracker};
use parcel_server::web::{AppState, create_router};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = Config::from_env();

    // A failed carrier load is not fatal: lookups still work, they just
    // lose name-based carrier resolution.
    let carriers = match CarrierDirectory::load(&config.carrier_file) {
        Ok(directory) => {
            info!(
                "loaded {} carriers from {}",
                directory.len(),
                config.carrier_file.display()
            );
            directory
        }
        Err(e) => {
            warn!(
                "could not load carriers from {}: {e}",
                config.carrier_file.display()
            );
            CarrierDirectory::empty()
        }
    };
    let carriers = Arc::new(carriers);

    // Without a credential the server still starts; the tracking endpoint
    // fails each request with a configuration error.
    let tracker = match &config.track17_key {
        Some(key) => match TrackClient::new(TrackClientConfig::new(key)) {
            Ok(client) => Some(Tracker::new(client, carriers.clone())),
            Err(e) => {
                warn!("could not build tracking client: {e}");
                None
            }
        },
        None => {
            warn!("TRACK17_KEY not set; tracking requests will fail");
            None
        }
    };

    let pool = db::connect(&config.database_url)
        .await
        .expect("failed to open database");

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let public_dir = config.public_dir.clone();

    let state = AppState::new(config, carriers, tracker, pool);
    let app = create_router(state, &public_dir);

    info!("parcel server listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
