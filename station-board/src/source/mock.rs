//! Static schedule source for development and tests.
//!
//! Serves a fixed station list and fixed departure boards, loaded either
//! in memory or from JSON files shaped like provider responses.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::config::ConfigError;
use crate::domain::{Station, StationDetail, StationId};

use super::ScheduleSource;
use super::convert::{convert_station_detail, parse_station_list};
use super::error::FetchError;
use super::wire::StationDetailDto;

/// Name of the station list file inside a mock data directory.
pub const STATIONS_FILE: &str = "stations.json";

/// Name of the directory holding one board file per station.
pub const BOARDS_DIR: &str = "boards";

/// Schedule source that serves pre-loaded data.
#[derive(Debug, Clone, Default)]
pub struct StaticScheduleSource {
    stations: Arc<Vec<Station>>,
    boards: Arc<HashMap<StationId, StationDetail>>,
}

impl StaticScheduleSource {
    pub fn new(stations: Vec<Station>, boards: impl IntoIterator<Item = StationDetail>) -> Self {
        Self {
            stations: Arc::new(stations),
            boards: Arc::new(boards.into_iter().map(|b| (b.id.clone(), b)).collect()),
        }
    }

    /// Load from a directory containing `stations.json` (a station list
    /// response) and `boards/*.json` (one station detail response each).
    ///
    /// Boards are keyed by the `gtfsId` inside each file, not the file
    /// name.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let dir = dir.as_ref();

        let stations_path = dir.join(STATIONS_FILE);
        let body = read(&stations_path)?;
        let stations = parse_station_list(&body).map_err(|e| mock_error(&stations_path, e))?;

        let mut boards = Vec::new();
        let boards_dir = dir.join(BOARDS_DIR);
        if boards_dir.is_dir() {
            let entries = std::fs::read_dir(&boards_dir).map_err(|e| mock_error(&boards_dir, e))?;
            for entry in entries {
                let path = entry.map_err(|e| mock_error(&boards_dir, e))?.path();
                if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("json") {
                    continue;
                }

                let body = read(&path)?;
                let dto: StationDetailDto =
                    serde_json::from_str(&body).map_err(|e| mock_error(&path, e))?;
                boards.push(convert_station_detail(dto));
            }
        }

        Ok(Self::new(stations, boards))
    }

    /// Ids of stations that have a board.
    pub fn available_boards(&self) -> Vec<StationId> {
        let mut ids: Vec<_> = self.boards.keys().cloned().collect();
        ids.sort();
        ids
    }
}

fn read(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|e| mock_error(path, e))
}

fn mock_error(path: &Path, err: impl std::fmt::Display) -> ConfigError {
    ConfigError::MockData {
        path: path.display().to_string(),
        message: err.to_string(),
    }
}

impl ScheduleSource for StaticScheduleSource {
    async fn fetch_station_list(&self) -> Result<Vec<Station>, FetchError> {
        Ok(self.stations.as_ref().clone())
    }

    async fn fetch_station_detail(&self, id: &StationId) -> Result<StationDetail, FetchError> {
        self.boards
            .get(id)
            .cloned()
            .ok_or_else(|| FetchError::NotFound { id: id.clone() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{detail, entry, stop_time};
    use tempfile::tempdir;

    const BOARD: &str = r#"{
        "gtfsId": "HSL:1",
        "name": "Central",
        "routes": [{
            "shortName": "101",
            "delay": 0,
            "remarks": [],
            "trips": [{
                "gtfsId": "T1",
                "stoptimes": [{
                    "stop": {"gtfsId": "S1", "name": "Central"},
                    "scheduledArrival": "2024-01-01T10:00:00Z",
                    "scheduledDeparture": "2024-01-01T10:00:00Z",
                    "estimatedTimeArrival": "2024-01-01T10:00:00Z",
                    "estimatedTimeDeparture": "2024-01-01T10:00:00Z"
                }]
            }]
        }]
    }"#;

    #[tokio::test]
    async fn serves_in_memory_data() {
        let board = detail(
            "A",
            "Central",
            vec![entry("101", 0, vec![], vec![stop_time("X", "2024-01-01T10:00:00Z")])],
        );
        let source = StaticScheduleSource::new(vec![Station::new("A", "Central")], vec![board.clone()]);

        assert_eq!(source.fetch_station_list().await.unwrap().len(), 1);
        assert_eq!(
            source.fetch_station_detail(&StationId::new("A")).await.unwrap(),
            board
        );
    }

    #[tokio::test]
    async fn unknown_station_is_not_found() {
        let source = StaticScheduleSource::default();
        let err = source
            .fetch_station_detail(&StationId::new("nope"))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            FetchError::NotFound {
                id: StationId::new("nope")
            }
        );
    }

    #[tokio::test]
    async fn load_from_dir() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join(STATIONS_FILE),
            r#"[{"gtfsId": "HSL:1", "name": "Central"}, {"gtfsId": "HSL:2", "name": "Eastside"}]"#,
        )
        .unwrap();
        std::fs::create_dir(dir.path().join(BOARDS_DIR)).unwrap();
        std::fs::write(dir.path().join(BOARDS_DIR).join("central.json"), BOARD).unwrap();
        std::fs::write(dir.path().join(BOARDS_DIR).join("notes.txt"), "ignored").unwrap();

        let source = StaticScheduleSource::from_dir(dir.path()).unwrap();
        assert_eq!(source.available_boards(), vec![StationId::new("HSL:1")]);

        let stations = source.fetch_station_list().await.unwrap();
        assert_eq!(stations.len(), 2);

        let board = source
            .fetch_station_detail(&StationId::new("HSL:1"))
            .await
            .unwrap();
        assert_eq!(board.routes[0].short_name(), "101");
    }

    #[test]
    fn missing_station_file_is_error() {
        let dir = tempdir().unwrap();
        let err = StaticScheduleSource::from_dir(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::MockData { .. }));
    }

    #[test]
    fn bad_board_file_is_error() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(STATIONS_FILE), "[]").unwrap();
        std::fs::create_dir(dir.path().join(BOARDS_DIR)).unwrap();
        std::fs::write(dir.path().join(BOARDS_DIR).join("bad.json"), "{").unwrap();

        let err = StaticScheduleSource::from_dir(dir.path()).unwrap_err();
        assert!(err.to_string().contains("bad.json"));
    }
}
