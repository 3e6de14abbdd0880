//! Domain error types.
//!
//! These errors represent records that violate the schedule model's
//! invariants. They are distinct from transport errors.

/// A schedule record that cannot be represented in the domain model.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleError {
    /// A trip arrived without any stop times
    #[error("trip {trip_id} has no stop times")]
    EmptyTrip { trip_id: String },

    /// A route arrived without any trips
    #[error("route {short_name} has no trips")]
    NoTrips { short_name: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ScheduleError::EmptyTrip {
            trip_id: "T1".into(),
        };
        assert_eq!(err.to_string(), "trip T1 has no stop times");

        let err = ScheduleError::NoTrips {
            short_name: "101".into(),
        };
        assert_eq!(err.to_string(), "route 101 has no trips");
    }
}
