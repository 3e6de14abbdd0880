//! Provider response types.
//!
//! These mirror the JSON served by the schedule provider. They are
//! converted to domain types by [`super::convert`] and are not used
//! elsewhere.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An entry of the station list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationDto {
    pub gtfs_id: String,
    pub name: String,
}

/// A station with its departure board.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationDetailDto {
    pub gtfs_id: String,
    pub name: String,
    #[serde(default)]
    pub routes: Vec<RouteDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteDto {
    #[serde(default)]
    pub short_name: Option<String>,
    #[serde(default)]
    pub trips: Vec<TripDto>,
    /// Delay of the active trip in seconds
    #[serde(default)]
    pub delay: Option<i64>,
    #[serde(default)]
    pub remarks: Option<Vec<RemarkDto>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripDto {
    pub gtfs_id: String,
    #[serde(default)]
    pub stoptimes: Vec<StopTimeDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopTimeDto {
    pub stop: StopDto,
    pub scheduled_arrival: DateTime<Utc>,
    pub scheduled_departure: DateTime<Utc>,
    pub estimated_time_arrival: DateTime<Utc>,
    pub estimated_time_departure: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopDto {
    #[serde(default)]
    pub gtfs_id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemarkDto {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_station_list() {
        let json = r#"[{"gtfsId": "HSL:1", "name": "Central"}, {"gtfsId": "HSL:2", "name": "Eastside"}]"#;
        let stations: Vec<StationDto> = serde_json::from_str(json).unwrap();
        assert_eq!(stations.len(), 2);
        assert_eq!(stations[0].gtfs_id, "HSL:1");
        assert_eq!(stations[1].name, "Eastside");
    }

    #[test]
    fn deserialize_route_with_defaults() {
        let json = r#"{"shortName": "101", "trips": []}"#;
        let route: RouteDto = serde_json::from_str(json).unwrap();
        assert_eq!(route.short_name.as_deref(), Some("101"));
        assert_eq!(route.delay, None);
        assert!(route.remarks.is_none());
    }

    #[test]
    fn deserialize_null_remarks_and_delay() {
        let json = r#"{"shortName": "101", "trips": [], "delay": null, "remarks": null}"#;
        let route: RouteDto = serde_json::from_str(json).unwrap();
        assert_eq!(route.delay, None);
        assert!(route.remarks.is_none());
    }

    #[test]
    fn deserialize_stop_time_with_offset() {
        let json = r#"{
            "stop": {"gtfsId": "HSL:10", "name": "X"},
            "scheduledArrival": "2024-01-01T12:00:00+02:00",
            "scheduledDeparture": "2024-01-01T12:01:00+02:00",
            "estimatedTimeArrival": "2024-01-01T12:03:00+02:00",
            "estimatedTimeDeparture": "2024-01-01T12:04:00+02:00"
        }"#;
        let st: StopTimeDto = serde_json::from_str(json).unwrap();
        assert_eq!(st.stop.name, "X");
        assert_eq!(st.scheduled_arrival.to_rfc3339(), "2024-01-01T10:00:00+00:00");
        assert_eq!(
            st.estimated_time_departure.to_rfc3339(),
            "2024-01-01T10:04:00+00:00"
        );
    }

    #[test]
    fn reject_non_timestamp() {
        let json = r#"{
            "stop": {"gtfsId": "HSL:10", "name": "X"},
            "scheduledArrival": "noon",
            "scheduledDeparture": "2024-01-01T12:01:00Z",
            "estimatedTimeArrival": "2024-01-01T12:03:00Z",
            "estimatedTimeDeparture": "2024-01-01T12:04:00Z"
        }"#;
        assert!(serde_json::from_str::<StopTimeDto>(json).is_err());
    }
}
