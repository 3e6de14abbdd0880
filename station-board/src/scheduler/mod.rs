//! Live refresh of the watched station's departure board.
//!
//! [`RefreshScheduler`] polls the subscribed station on a fixed period and
//! on demand, with at most one fetch in flight. [`Board`] holds the state
//! machine it drives.

mod actor;
mod config;
mod machine;

pub use actor::{RefreshScheduler, SchedulerClosed, SchedulerHandle};
pub use config::{DEFAULT_REFRESH_INTERVAL, SchedulerConfig};
pub use machine::{
    Board, BoardSnapshot, Completion, FetchTicket, RefreshTrigger, SubscribeOutcome,
    SubscriptionStatus,
};
