//! Display-ready views handed to the presentation layer.
//!
//! Renderers consume only these types; they never read schedule records
//! directly.

use serde::Serialize;

use crate::domain::Remark;
use crate::scheduler::SubscriptionStatus;

/// Punctuality of a departure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DelayStatus {
    OnTime,
    /// Delayed by this many whole minutes, rounded up.
    Delayed { minutes: i64 },
}

impl DelayStatus {
    pub fn from_seconds(delay_seconds: i64) -> Self {
        if delay_seconds > 0 {
            DelayStatus::Delayed {
                minutes: delay_seconds / 60 + i64::from(delay_seconds % 60 != 0),
            }
        } else {
            DelayStatus::OnTime
        }
    }
}

/// One row of the departure board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayRow {
    /// Active trip id; stable key for the row.
    pub key: String,
    /// Route short name.
    pub label: String,
    /// Scheduled departure from the first stop, `HH:MM`.
    pub primary_time: String,
    /// Estimated departure from the first stop, only when delayed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_time: Option<String>,
    /// Name of the trip's last stop.
    pub destination: String,
    /// Whether the route carries service remarks.
    pub highlighted: bool,
    pub delay: DelayStatus,
}

/// Expanded view of one route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayDetail {
    pub label: String,
    pub destination: String,
    /// `"<stop name> <HH:MM estimated arrival>"` for every stop, in order.
    pub stops: Vec<String>,
    pub remarks: Vec<Remark>,
}

/// The whole board as shown for the current subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardView {
    pub station_id: Option<String>,
    pub title: Option<String>,
    pub status: SubscriptionStatus,
    pub rows: Vec<DisplayRow>,
    /// True when a fetch succeeded but the station has no departures.
    /// Distinct from a failed subscription, which has no data at all.
    pub empty: bool,
    /// Time of the last successful fetch, `HH:MM`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_rounds_up_to_minutes() {
        assert_eq!(DelayStatus::from_seconds(0), DelayStatus::OnTime);
        assert_eq!(DelayStatus::from_seconds(-30), DelayStatus::OnTime);
        assert_eq!(
            DelayStatus::from_seconds(1),
            DelayStatus::Delayed { minutes: 1 }
        );
        assert_eq!(
            DelayStatus::from_seconds(120),
            DelayStatus::Delayed { minutes: 2 }
        );
        assert_eq!(
            DelayStatus::from_seconds(121),
            DelayStatus::Delayed { minutes: 3 }
        );
    }

    #[test]
    fn huge_delay_does_not_overflow() {
        assert_eq!(
            DelayStatus::from_seconds(i64::MAX),
            DelayStatus::Delayed {
                minutes: i64::MAX / 60 + 1
            }
        );
        assert_eq!(DelayStatus::from_seconds(i64::MIN), DelayStatus::OnTime);
    }

    #[test]
    fn delay_serializes_tagged() {
        assert_eq!(
            serde_json::to_string(&DelayStatus::Delayed { minutes: 4 }).unwrap(),
            r#"{"kind":"delayed","minutes":4}"#
        );
        assert_eq!(
            serde_json::to_string(&DelayStatus::OnTime).unwrap(),
            r#"{"kind":"on_time"}"#
        );
    }

    #[test]
    fn on_time_row_omits_secondary_time() {
        let row = DisplayRow {
            key: "T1".into(),
            label: "101".into(),
            primary_time: "10:00".into(),
            secondary_time: None,
            destination: "Y".into(),
            highlighted: false,
            delay: DelayStatus::OnTime,
        };
        let json = serde_json::to_value(&row).unwrap();
        assert!(json.get("secondary_time").is_none());
        assert_eq!(json["primary_time"], "10:00");
    }
}
