//! Fetch error types.

use crate::domain::{ScheduleError, StationId};

/// Errors from a single fetch against the schedule provider.
///
/// Every variant is terminal for the call that produced it; callers decide
/// whether and when to try again.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// The provider could not be reached (connect failure, timeout, reset)
    #[error("network unavailable: {message}")]
    NetworkUnavailable { message: String },

    /// The response did not have the expected shape
    #[error("malformed response: {message}")]
    MalformedResponse {
        message: String,
        body: Option<String>,
    },

    /// The provider does not know the requested station
    #[error("station not found: {id}")]
    NotFound { id: StationId },

    /// The provider answered with a non-success status
    #[error("provider error {status}: {message}")]
    Status { status: u16, message: String },
}

impl FetchError {
    /// Whether this is a connectivity failure rather than a bad answer.
    pub fn is_network(&self) -> bool {
        matches!(self, FetchError::NetworkUnavailable { .. })
    }

    pub(crate) fn malformed(message: impl Into<String>, body: &str) -> Self {
        FetchError::MalformedResponse {
            message: message.into(),
            body: Some(body.chars().take(500).collect()),
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            FetchError::MalformedResponse {
                message: err.to_string(),
                body: None,
            }
        } else {
            FetchError::NetworkUnavailable {
                message: err.to_string(),
            }
        }
    }
}

impl From<ScheduleError> for FetchError {
    fn from(err: ScheduleError) -> Self {
        FetchError::MalformedResponse {
            message: err.to_string(),
            body: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = FetchError::NetworkUnavailable {
            message: "connection refused".into(),
        };
        assert_eq!(err.to_string(), "network unavailable: connection refused");
        assert!(err.is_network());

        let err = FetchError::NotFound {
            id: StationId::new("X"),
        };
        assert_eq!(err.to_string(), "station not found: X");
        assert!(!err.is_network());

        let err = FetchError::Status {
            status: 503,
            message: "down".into(),
        };
        assert_eq!(err.to_string(), "provider error 503: down");

        let err = FetchError::malformed("expected array", "{}");
        assert!(err.to_string().contains("expected array"));
    }

    #[test]
    fn malformed_body_is_truncated() {
        let body = "x".repeat(2000);
        let FetchError::MalformedResponse { body: Some(kept), .. } =
            FetchError::malformed("too long", &body)
        else {
            panic!("expected malformed response");
        };
        assert_eq!(kept.len(), 500);
    }

    #[test]
    fn schedule_errors_are_malformed_responses() {
        let err: FetchError = ScheduleError::NoTrips {
            short_name: "101".into(),
        }
        .into();
        assert!(matches!(err, FetchError::MalformedResponse { .. }));
    }
}
