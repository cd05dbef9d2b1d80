//! Environment configuration.

use std::env;
use std::path::PathBuf;

use tracing::warn;

const DEFAULT_PORT: u16 = 3000;

/// Runtime configuration, read once at startup.
///
/// Credentials and shared secrets are optional on purpose: the server
/// starts without them, and the endpoints that need them fail each request
/// with a configuration error instead.
#[derive(Debug, Clone)]
pub struct Config {
    /// Listen port.
    pub port: u16,
    /// SQLite database URL.
    pub database_url: String,
    /// Path of the carrier source document.
    pub carrier_file: PathBuf,
    /// Directory of static front-end assets.
    pub public_dir: PathBuf,
    /// Credential for the upstream tracking API.
    pub track17_key: Option<String>,
    /// Shared secret gating news writes.
    pub news_secret: Option<String>,
    /// Shared secret gating parcel update writes.
    pub parcel_updates_secret: Option<String>,
}

impl Config {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Self {
        Self {
            port: port_from(env::var("PORT").ok()),
            database_url: var_or("DATABASE_URL", "sqlite:parcel.db?mode=rwc"),
            carrier_file: PathBuf::from(var_or("CARRIER_FILE", "carriers/apicarrier.all.json")),
            public_dir: PathBuf::from(var_or("PUBLIC_DIR", "public")),
            track17_key: secret("TRACK17_KEY"),
            news_secret: secret("NEWS_SECRET"),
            parcel_updates_secret: secret("PARCEL_UPDATES_SECRET"),
        }
    }
}

/// An environment value, or the default when unset or blank.
fn var_or(key: &str, default: &str) -> String {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => value,
        _ => default.to_string(),
    }
}

/// A secret value; unset and blank are both treated as absent.
fn secret(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn port_from(raw: Option<String>) -> u16 {
    match raw {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("invalid PORT value {raw:?}, using {DEFAULT_PORT}");
            DEFAULT_PORT
        }),
        None => DEFAULT_PORT,
    }
}
