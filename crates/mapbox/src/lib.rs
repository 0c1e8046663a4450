use std::error;
use std::fmt;
use std::sync::Arc;

pub mod client;
pub mod directions;
pub mod geocoding;

pub use client::{MapboxClient, MapboxCredentials};

#[derive(Debug, Clone)]
pub enum ApiError {
    /// No access token is configured. Calls fail with a typed error instead
    /// of the process refusing to start.
    MissingConfiguration,
    RequestError(Arc<reqwest::Error>),
    JsonError(Arc<serde_json::Error>),
    InvalidUrl(String),
    InvalidResponse {
        status_code: reqwest::StatusCode,
        url: String,
        response: Option<String>,
    },
    RateLimitReached,
}

impl error::Error for ApiError {}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ApiError::MissingConfiguration => {
                write!(f, "Mapbox access token not configured.")
            }
            ApiError::RequestError(e) => write!(f, "HTTP request error: {}", e),
            ApiError::JsonError(e) => write!(f, "JSON parse error: {}", e),
            ApiError::InvalidUrl(url) => write!(f, "Invalid request URL: {}", url),
            ApiError::InvalidResponse {
                status_code,
                url,
                response,
            } => match response {
                Some(text) => {
                    write!(f, "Invalid Response ({}) {}: {}", status_code, url, text)
                }
                None => write!(f, "Invalid Response ({}) {}", status_code, url),
            },
            ApiError::RateLimitReached => write!(f, "Rate limit reached."),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::RequestError(Arc::new(e))
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::JsonError(Arc::new(e))
    }
}

impl From<ApiError> for distance::ProviderError {
    fn from(value: ApiError) -> Self {
        match value {
            ApiError::MissingConfiguration => Self::MissingConfiguration,
            ApiError::RateLimitReached => Self::RateLimitReached,
            ApiError::InvalidResponse {
                status_code,
                url,
                response,
            } => Self::InvalidResponse {
                status: status_code.as_u16(),
                url,
                body: response,
            },
            other => Self::Transport(Box::new(other)),
        }
    }
}
