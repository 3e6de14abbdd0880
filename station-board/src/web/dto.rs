//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::Station;

/// Query for station search.
#[derive(Debug, Default, Deserialize)]
pub struct StationSearchRequest {
    /// Free-text query; empty lists the first stations
    #[serde(default)]
    pub q: String,
}

/// A station in search results.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StationResult {
    pub id: String,
    pub name: String,
}

impl From<Station> for StationResult {
    fn from(station: Station) -> Self {
        Self {
            id: station.id.to_string(),
            name: station.name,
        }
    }
}

/// Station search response.
#[derive(Debug, Serialize, Deserialize)]
pub struct StationSearchResponse {
    /// Matches, best first
    pub stations: Vec<StationResult>,
}

/// Result of reloading the station list.
#[derive(Debug, Serialize, Deserialize)]
pub struct ReloadResponse {
    /// Number of stations now loaded
    pub count: usize,
}

/// Request to watch a station's board.
#[derive(Debug, Default, Deserialize)]
pub struct SubscribeRequest {
    /// Display name; looked up in the station list when absent
    #[serde(default)]
    pub name: Option<String>,
}

/// Error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}
