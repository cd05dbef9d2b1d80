//! HTTP client for the 17TRACK Open API v2.4.

use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use serde_json::Value;

use super::error::TrackError;

/// Default base URL for the tracking API.
const DEFAULT_BASE_URL: &str = "https://api.17track.net/track/v2.4";

/// One entry of the batch payload the API expects.
///
/// The API accepts up to 40 numbers per call; this server always sends one.
#[derive(Debug, Serialize)]
struct TrackItem<'a> {
    number: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    carrier: Option<u32>,
}

/// Configuration for the tracking API client.
#[derive(Debug, Clone)]
pub struct TrackClientConfig {
    /// API credential, sent as the `17token` header on every call.
    pub api_key: String,
    /// Base URL for the API.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl TrackClientConfig {
    /// Create a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Client for the three tracking operations.
#[derive(Debug, Clone)]
pub struct TrackClient {
    http: reqwest::Client,
    base_url: String,
}

impl TrackClient {
    /// Create a new client.
    pub fn new(config: TrackClientConfig) -> Result<Self, TrackError> {
        let mut headers = HeaderMap::new();
        let token = HeaderValue::from_str(&config.api_key).map_err(|_| {
            TrackError::Configuration("TRACK17_KEY contains invalid characters".to_string())
        })?;
        headers.insert(HeaderName::from_static("17token"), token);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
        })
    }

    /// Ask the provider to begin tracking the number.
    pub async fn register(
        &self,
        number: &str,
        carrier: Option<u32>,
    ) -> Result<(StatusCode, Value), TrackError> {
        self.post("register", number, carrier).await
    }

    /// Request the current tracking events for the number.
    pub async fn get_track_info(
        &self,
        number: &str,
        carrier: Option<u32>,
    ) -> Result<(StatusCode, Value), TrackError> {
        self.post("gettrackinfo", number, carrier).await
    }

    /// Ask the provider to stop tracking the number.
    pub async fn delete_track(
        &self,
        number: &str,
        carrier: Option<u32>,
    ) -> Result<(StatusCode, Value), TrackError> {
        self.post("deletetrack", number, carrier).await
    }

    /// POST a one-element batch to an API operation.
    ///
    /// Returns the HTTP status together with the response body. A body that
    /// cannot be read or parsed becomes an empty JSON object, so callers can
    /// triage on the status alone.
    async fn post(
        &self,
        operation: &str,
        number: &str,
        carrier: Option<u32>,
    ) -> Result<(StatusCode, Value), TrackError> {
        let url = format!("{}/{}", self.base_url, operation);
        let payload = [TrackItem { number, carrier }];

        let response = self.http.post(&url).json(&payload).send().await?;
        let status = response.status();
        let body = response
            .json::<Value>()
            .await
            .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));

        Ok((status, body))
    }
}
