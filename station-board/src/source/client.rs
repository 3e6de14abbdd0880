//! HTTP client for the schedule provider.

use std::time::Duration;

use reqwest::{StatusCode, Url};
use tracing::debug;

use crate::config::ConfigError;
use crate::domain::{Station, StationDetail, StationId};

use super::ScheduleSource;
use super::convert::{parse_station_detail, parse_station_list};
use super::error::FetchError;

/// Default provider host.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default provider port.
pub const DEFAULT_PORT: u16 = 3000;

/// Configuration for the provider client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    /// API root, e.g. `http://127.0.0.1:3000/api`
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl SourceConfig {
    /// Create a config addressing the provider at `host:port`.
    pub fn new(host: &str, port: u16) -> Self {
        Self {
            base_url: format!("http://{host}:{port}/api"),
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self::new(DEFAULT_HOST, DEFAULT_PORT)
    }
}

/// Schedule provider reached over HTTP.
///
/// Each fetch issues exactly one request. Nothing is retried or cached
/// here.
#[derive(Debug, Clone)]
pub struct HttpScheduleSource {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpScheduleSource {
    pub fn new(config: SourceConfig) -> Result<Self, ConfigError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| ConfigError::Invalid {
            name: "base_url",
            message: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::Invalid {
                name: "base_url",
                message: format!("{base_url} cannot be a base URL"),
            });
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ConfigError::Invalid {
                name: "http_client",
                message: e.to_string(),
            })?;

        Ok(Self { http, base_url })
    }

    /// URL of the station list: `{base}/stations/`.
    pub fn stations_url(&self) -> Url {
        self.url_with_segments(&["stations", ""])
    }

    /// URL of one station's board: `{base}/stations/{id}`.
    ///
    /// The id is percent-encoded as a single path segment.
    pub fn station_url(&self, id: &StationId) -> Url {
        self.url_with_segments(&["stations", id.as_str()])
    }

    fn url_with_segments(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Checked in `new`: the base URL can carry path segments
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// GET a URL, returning the status and body.
    async fn get(&self, url: Url) -> Result<(StatusCode, String), FetchError> {
        debug!(%url, "fetching");
        let response = self.http.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;
        Ok((status, body))
    }
}

impl ScheduleSource for HttpScheduleSource {
    async fn fetch_station_list(&self) -> Result<Vec<Station>, FetchError> {
        let (status, body) = self.get(self.stations_url()).await?;

        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                message: body,
            });
        }

        parse_station_list(&body)
    }

    async fn fetch_station_detail(&self, id: &StationId) -> Result<StationDetail, FetchError> {
        let (status, body) = self.get(self.station_url(id)).await?;

        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound { id: id.clone() });
        }

        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                message: body,
            });
        }

        parse_station_detail(id, &body)
    }
}
