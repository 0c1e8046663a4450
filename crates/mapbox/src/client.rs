use std::env;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Local;
use distance::provider::{DrivingRoute, ProviderError, RouteProvider};
use model::Coordinate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use url::Url;

use crate::ApiError;

pub const MAPBOX_API_URL: &str = "https://api.mapbox.com";

/// Request timeout for both the geocoding and directions endpoints.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Transient failures (transport, 5xx) are retried this many times in total.
const MAX_ATTEMPTS: u32 = 3;

const RETRY_BASE_DELAY: Duration = Duration::from_millis(500);

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapboxCredentials {
    pub access_token: String,
    /// ISO country filter for geocoding, e.g. "us".
    pub country: String,
    pub rate_limit_per_minute: Option<u64>,
}

impl MapboxCredentials {
    pub fn from_env() -> Option<Self> {
        let access_token = env::var("MAPBOX_ACCESS_TOKEN").ok()?;
        let country = env::var("MAPBOX_COUNTRY").unwrap_or_else(|_| "us".to_owned());
        let rate_limit_per_minute = env::var("MAPBOX_RATE_LIMIT_PER_MINUTE")
            .ok()
            .and_then(|raw| raw.parse().ok());
        Some(Self {
            access_token,
            country,
            rate_limit_per_minute,
        })
    }
}

struct ClientState {
    available_requests: u64,
    last_refill: chrono::DateTime<Local>,
}

/// Client for the Mapbox geocoding and directions APIs. Constructible without
/// credentials; calls then return [`ApiError::MissingConfiguration`] so
/// callers can degrade instead of crashing.
pub struct MapboxClient {
    credentials: Option<MapboxCredentials>,
    base_url: String,
    http: reqwest::Client,
    state: RwLock<ClientState>,
}

impl MapboxClient {
    pub fn new(credentials: Option<MapboxCredentials>) -> Self {
        let available_requests = credentials
            .as_ref()
            .and_then(|credentials| credentials.rate_limit_per_minute)
            .unwrap_or(0);
        Self {
            credentials,
            base_url: MAPBOX_API_URL.to_owned(),
            http: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .expect("failed to build http client"),
            state: RwLock::new(ClientState {
                available_requests,
                last_refill: chrono::offset::Local::now(),
            }),
        }
    }

    pub fn from_env() -> Self {
        Self::new(MapboxCredentials::from_env())
    }

    /// Point the client at a different host. Used by tests and self-hosted
    /// proxies.
    pub fn with_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn is_configured(&self) -> bool {
        self.credentials.is_some()
    }

    pub(crate) fn credentials(&self) -> Result<&MapboxCredentials, ApiError> {
        self.credentials
            .as_ref()
            .ok_or(ApiError::MissingConfiguration)
    }

    pub fn country(&self) -> &str {
        self.credentials
            .as_ref()
            .map(|credentials| credentials.country.as_str())
            .unwrap_or("us")
    }

    pub(crate) fn url(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|_| ApiError::InvalidUrl(self.base_url.clone()))?;
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base_url.clone()))?
            .extend(segments);
        Ok(url)
    }

    async fn try_decrement_available_requests(&self) -> Result<(), ApiError> {
        let rate_limit = self
            .credentials
            .as_ref()
            .and_then(|credentials| credentials.rate_limit_per_minute);
        if let Some(rate_limit_per_minute) = rate_limit {
            let mut state = self.state.write().await;

            let minutes_since_last_refill =
                (chrono::offset::Local::now() - state.last_refill).num_minutes();
            if minutes_since_last_refill >= 1 {
                state.available_requests = rate_limit_per_minute;
                state.last_refill = chrono::offset::Local::now();
            }

            if state.available_requests != 0 {
                state.available_requests -= 1;
            } else {
                return Err(ApiError::RateLimitReached);
            }
        }
        Ok(())
    }

    /// Fetch and deserialize a JSON endpoint. Transport failures and 5xx
    /// responses are retried with doubling backoff; 4xx responses are
    /// permanent and returned as-is.
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        url: Url,
    ) -> Result<T, ApiError> {
        self.try_decrement_available_requests().await?;

        let display_url = redacted(&url);
        let mut attempt = 0;
        loop {
            attempt += 1;
            log::debug!("requesting {} (attempt {})", display_url, attempt);

            let result = self.http.get(url.clone()).send().await;
            match result {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return Ok(response.json().await?);
                    }

                    let body = response.text().await.ok();
                    if !status.is_server_error() || attempt >= MAX_ATTEMPTS {
                        return Err(ApiError::InvalidResponse {
                            status_code: status,
                            url: display_url,
                            response: body,
                        });
                    }
                    log::warn!(
                        "server error ({}) from {}, retrying",
                        status,
                        display_url
                    );
                }
                Err(why) => {
                    if attempt >= MAX_ATTEMPTS {
                        return Err(why.into());
                    }
                    log::warn!(
                        "transport error from {}: {}, retrying",
                        display_url,
                        why
                    );
                }
            }

            tokio::time::sleep(RETRY_BASE_DELAY * 2u32.pow(attempt - 1)).await;
        }
    }
}

/// Request URL without its query string, safe for logs.
fn redacted(url: &Url) -> String {
    let mut url = url.clone();
    url.set_query(None);
    url.to_string()
}

#[async_trait]
impl RouteProvider for MapboxClient {
    async fn geocode(
        &self,
        address: &str,
        country: &str,
    ) -> Result<Coordinate, ProviderError> {
        crate::geocoding::forward(self, address, country)
            .await
            .map_err(ProviderError::from)?
            .ok_or(ProviderError::NoMatch)
    }

    async fn directions(
        &self,
        waypoints: &[Coordinate],
    ) -> Result<DrivingRoute, ProviderError> {
        crate::directions::driving(self, waypoints)
            .await
            .map_err(ProviderError::from)?
            .ok_or(ProviderError::NoRoute)
    }
}
