//! Builders for schedule records used across unit tests.

use chrono::{DateTime, Utc};

use crate::domain::{Remark, ScheduleEntry, StationDetail, StationId, StopRef, StopTime, Trip};

pub fn at(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .expect("valid RFC 3339 timestamp")
        .with_timezone(&Utc)
}

/// An on-time stop: all four instants equal.
pub fn stop_time(name: &str, time: &str) -> StopTime {
    delayed_stop_time(name, time, time)
}

pub fn delayed_stop_time(name: &str, scheduled: &str, estimated: &str) -> StopTime {
    StopTime {
        stop: StopRef {
            id: format!("stop:{name}"),
            name: name.to_string(),
        },
        scheduled_arrival: at(scheduled),
        scheduled_departure: at(scheduled),
        estimated_arrival: at(estimated),
        estimated_departure: at(estimated),
    }
}

pub fn remark(title: &str, message: &str) -> Remark {
    Remark {
        title: title.to_string(),
        message: message.to_string(),
    }
}

pub fn entry(
    short_name: &str,
    delay_seconds: i64,
    remarks: Vec<Remark>,
    stops: Vec<StopTime>,
) -> ScheduleEntry {
    let trip = Trip::new(format!("trip:{short_name}"), stops).expect("non-empty stops");
    ScheduleEntry::new(short_name, delay_seconds, remarks, vec![trip]).expect("one trip")
}

pub fn detail(id: &str, name: &str, routes: Vec<ScheduleEntry>) -> StationDetail {
    StationDetail {
        id: StationId::new(id),
        name: name.to_string(),
        routes,
    }
}
