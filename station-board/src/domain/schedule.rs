//! Departure board records.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::error::ScheduleError;
use super::station::StationId;

/// A stop referenced by a stop time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopRef {
    pub id: String,
    pub name: String,
}

/// Scheduled and estimated times for one stop of a trip.
///
/// When the owning entry has a positive delay, the estimated instants are
/// at or after the scheduled ones. With zero delay they conventionally
/// equal the scheduled instants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopTime {
    pub stop: StopRef,
    pub scheduled_arrival: DateTime<Utc>,
    pub scheduled_departure: DateTime<Utc>,
    pub estimated_arrival: DateTime<Utc>,
    pub estimated_departure: DateTime<Utc>,
}

/// One run of a vehicle with its stops in scheduled order.
///
/// Always has at least one stop time: the first is the origin (or the
/// current stop), the last is the destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trip {
    id: String,
    stop_times: Vec<StopTime>,
}

impl Trip {
    pub fn new(id: impl Into<String>, stop_times: Vec<StopTime>) -> Result<Self, ScheduleError> {
        let id = id.into();
        if stop_times.is_empty() {
            return Err(ScheduleError::EmptyTrip { trip_id: id });
        }
        Ok(Self { id, stop_times })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn stop_times(&self) -> &[StopTime] {
        &self.stop_times
    }

    /// First stop of the trip.
    pub fn origin(&self) -> &StopTime {
        &self.stop_times[0]
    }

    /// Last stop of the trip. Same as the origin for single-stop trips.
    pub fn destination(&self) -> &StopTime {
        &self.stop_times[self.stop_times.len() - 1]
    }
}

/// A titled service note attached to a route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Remark {
    pub title: String,
    pub message: String,
}

/// One route's row on a station's departure board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleEntry {
    short_name: String,
    delay_seconds: i64,
    remarks: Vec<Remark>,
    trips: Vec<Trip>,
}

impl ScheduleEntry {
    /// Build an entry, rejecting one with no trips.
    pub fn new(
        short_name: impl Into<String>,
        delay_seconds: i64,
        remarks: Vec<Remark>,
        trips: Vec<Trip>,
    ) -> Result<Self, ScheduleError> {
        let short_name = short_name.into();
        if trips.is_empty() {
            return Err(ScheduleError::NoTrips { short_name });
        }
        Ok(Self {
            short_name,
            delay_seconds,
            remarks,
            trips,
        })
    }

    pub fn short_name(&self) -> &str {
        &self.short_name
    }

    pub fn delay_seconds(&self) -> i64 {
        self.delay_seconds
    }

    pub fn is_delayed(&self) -> bool {
        self.delay_seconds > 0
    }

    pub fn remarks(&self) -> &[Remark] {
        &self.remarks
    }

    pub fn trips(&self) -> &[Trip] {
        &self.trips
    }

    /// The trip shown on the board: the next run of this route.
    pub fn active_trip(&self) -> &Trip {
        &self.trips[0]
    }
}

/// A station's full departure board as returned by one detail fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationDetail {
    pub id: StationId,
    pub name: String,
    pub routes: Vec<ScheduleEntry>,
}
