//! Projection of schedule records into display views.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::domain::ScheduleEntry;
use crate::scheduler::BoardSnapshot;

use super::views::{BoardView, DelayStatus, DisplayDetail, DisplayRow};

/// Maximum number of rows shown on a board.
pub const DEFAULT_ROW_CAP: usize = 20;

/// Derives display views from schedule records.
///
/// Projection never mutates its input and depends only on the record and
/// the display timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Projector {
    zone: Tz,
}

impl Projector {
    pub fn new(zone: Tz) -> Self {
        Self { zone }
    }

    pub fn utc() -> Self {
        Self::new(Tz::UTC)
    }

    pub fn zone(&self) -> Tz {
        self.zone
    }

    /// Render an instant as 24-hour `HH:MM` in the display timezone.
    pub fn format_time(&self, instant: DateTime<Utc>) -> String {
        instant.with_timezone(&self.zone).format("%H:%M").to_string()
    }

    /// Project one route into a board row.
    pub fn project(&self, entry: &ScheduleEntry) -> DisplayRow {
        let trip = entry.active_trip();
        let origin = trip.origin();

        let secondary_time = entry
            .is_delayed()
            .then(|| self.format_time(origin.estimated_departure));

        DisplayRow {
            key: trip.id().to_string(),
            label: entry.short_name().to_string(),
            primary_time: self.format_time(origin.scheduled_departure),
            secondary_time,
            destination: trip.destination().stop.name.clone(),
            highlighted: !entry.remarks().is_empty(),
            delay: DelayStatus::from_seconds(entry.delay_seconds()),
        }
    }

    /// Project one route into its expanded view.
    pub fn project_detail(&self, entry: &ScheduleEntry) -> DisplayDetail {
        let trip = entry.active_trip();

        let stops = trip
            .stop_times()
            .iter()
            .map(|st| format!("{} {}", st.stop.name, self.format_time(st.estimated_arrival)))
            .collect();

        DisplayDetail {
            label: entry.short_name().to_string(),
            destination: trip.destination().stop.name.clone(),
            stops,
            remarks: entry.remarks().to_vec(),
        }
    }

    /// Project the board state, showing at most `row_cap` routes.
    pub fn project_board(&self, snapshot: &BoardSnapshot, row_cap: usize) -> BoardView {
        let routes = snapshot
            .detail
            .as_ref()
            .map(|d| d.routes.as_slice())
            .unwrap_or_default();

        BoardView {
            station_id: snapshot.station_id.as_ref().map(|id| id.to_string()),
            title: snapshot.title.clone(),
            status: snapshot.status,
            rows: routes.iter().take(row_cap).map(|e| self.project(e)).collect(),
            empty: snapshot.detail.is_some() && routes.is_empty(),
            last_updated: snapshot.last_updated.map(|t| self.format_time(t)),
        }
    }
}

impl Default for Projector {
    fn default() -> Self {
        Self::utc()
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::domain::{Remark, StopRef, StopTime, Trip};
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn instant(minutes: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + chrono::Duration::minutes(minutes)
    }

    prop_compose! {
        fn stop_time()(name in "[A-Z][a-z]{1,8}", sched in 0i64..2000, late in 0i64..60) -> StopTime {
            StopTime {
                stop: StopRef { id: name.to_lowercase(), name },
                scheduled_arrival: instant(sched),
                scheduled_departure: instant(sched),
                estimated_arrival: instant(sched + late),
                estimated_departure: instant(sched + late),
            }
        }
    }

    prop_compose! {
        fn schedule_entry()(
            short_name in "[0-9]{1,3}[A-Z]?",
            delay in -60i64..600,
            remarks in prop::collection::vec(("[a-z]{1,5}", "[a-z ]{0,10}"), 0..3),
            stops in prop::collection::vec(stop_time(), 1..6),
        ) -> ScheduleEntry {
            let remarks = remarks
                .into_iter()
                .map(|(title, message)| Remark { title, message })
                .collect();
            let trip = Trip::new("T", stops).unwrap();
            ScheduleEntry::new(short_name, delay, remarks, vec![trip]).unwrap()
        }
    }

    proptest! {
        #[test]
        fn highlighted_iff_remarks(e in schedule_entry()) {
            prop_assert_eq!(Projector::utc().project(&e).highlighted, !e.remarks().is_empty());
        }

        #[test]
        fn secondary_time_iff_delayed(e in schedule_entry()) {
            let projector = Projector::utc();
            let row = projector.project(&e);
            if e.delay_seconds() > 0 {
                let origin = e.active_trip().origin();
                prop_assert_eq!(
                    row.secondary_time,
                    Some(projector.format_time(origin.estimated_departure))
                );
            } else {
                prop_assert_eq!(row.secondary_time, None);
            }
        }

        #[test]
        fn detail_has_one_line_per_stop(e in schedule_entry()) {
            let detail = Projector::utc().project_detail(&e);
            prop_assert_eq!(detail.stops.len(), e.active_trip().stop_times().len());
            prop_assert_eq!(&detail.destination, &e.active_trip().destination().stop.name);
        }

        #[test]
        fn projection_is_deterministic(e in schedule_entry()) {
            let projector = Projector::utc();
            prop_assert_eq!(projector.project(&e), projector.project(&e));
            prop_assert_eq!(projector.project_detail(&e), projector.project_detail(&e));
        }
    }
}
