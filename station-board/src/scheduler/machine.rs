//! Subscription state machine.
//!
//! Pure bookkeeping for the one station whose board is being watched. The
//! machine decides when a fetch may be issued and how a result is applied;
//! it performs no I/O and knows nothing about timers.
//!
//! ```text
//!            subscribe                 ok
//!   Idle ───────────────▶ Loading ─────────────▶ Ready ◀──┐
//!                           │  ▲                  │  ▲    │ ok / err
//!                       err │  │ tick / manual    │  │    │ (stale kept)
//!                           ▼  │      tick/manual ▼  │    │
//!                          Failed             Refreshing ─┘
//! ```
//!
//! At most one fetch is outstanding per subscription: a refresh request
//! while `Loading` or `Refreshing` is refused.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{StationDetail, StationId};
use crate::source::FetchError;

/// Externally visible state of the board.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    /// No station subscribed.
    #[default]
    Idle,
    /// First fetch in flight, no data yet.
    Loading,
    /// Data present, nothing in flight.
    Ready,
    /// Data present, a refresh is in flight.
    Refreshing,
    /// Fetched without ever obtaining data.
    Failed,
}

impl SubscriptionStatus {
    /// Whether a fetch is in flight.
    pub fn is_busy(self) -> bool {
        matches!(self, SubscriptionStatus::Loading | SubscriptionStatus::Refreshing)
    }
}

/// What asked for a refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshTrigger {
    Timer,
    Manual,
}

/// Permission to run one fetch for one subscription.
///
/// The result must be handed back through [`Board::complete`] with the
/// same ticket. Tickets from a torn-down subscription are ignored there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    epoch: u64,
    station_id: StationId,
}

impl FetchTicket {
    pub fn station_id(&self) -> &StationId {
        &self.station_id
    }
}

/// Result of [`Board::subscribe`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscribeOutcome {
    /// A new subscription started; its first fetch must be issued.
    Started {
        ticket: FetchTicket,
        replaced: Option<StationId>,
    },
    /// The station was already subscribed; nothing changed.
    AlreadySubscribed,
}

/// Result of [`Board::complete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The result was applied and the board moved to this status.
    Applied(SubscriptionStatus),
    /// The result belonged to a subscription that no longer exists.
    Discarded,
}

/// Read-only copy of the board state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardSnapshot {
    pub station_id: Option<StationId>,
    pub station_name: Option<String>,
    /// Set to the subscribed station's name once data has arrived.
    pub title: Option<String>,
    pub status: SubscriptionStatus,
    /// Last successfully fetched board.
    pub detail: Option<Arc<StationDetail>>,
    pub last_updated: Option<DateTime<Utc>>,
}

#[derive(Debug)]
struct Subscription {
    epoch: u64,
    station_id: StationId,
    station_name: String,
    status: SubscriptionStatus,
    detail: Option<Arc<StationDetail>>,
    title: Option<String>,
    last_updated: Option<DateTime<Utc>>,
}

impl Subscription {
    fn ticket(&self) -> FetchTicket {
        FetchTicket {
            epoch: self.epoch,
            station_id: self.station_id.clone(),
        }
    }
}

/// State of the single active subscription, if any.
#[derive(Debug, Default)]
pub struct Board {
    last_epoch: u64,
    current: Option<Subscription>,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> SubscriptionStatus {
        self.current
            .as_ref()
            .map_or(SubscriptionStatus::Idle, |s| s.status)
    }

    pub fn station_id(&self) -> Option<&StationId> {
        self.current.as_ref().map(|s| &s.station_id)
    }

    /// Start watching a station, replacing any other subscription.
    pub fn subscribe(&mut self, id: StationId, name: String) -> SubscribeOutcome {
        if self
            .current
            .as_ref()
            .is_some_and(|current| current.station_id == id)
        {
            return SubscribeOutcome::AlreadySubscribed;
        }

        let replaced = self.current.take().map(|s| s.station_id);
        self.last_epoch += 1;

        let subscription = Subscription {
            epoch: self.last_epoch,
            station_id: id,
            station_name: name,
            status: SubscriptionStatus::Loading,
            detail: None,
            title: None,
            last_updated: None,
        };
        let ticket = subscription.ticket();
        self.current = Some(subscription);

        SubscribeOutcome::Started { ticket, replaced }
    }

    /// Stop watching `id`. Returns false if `id` is not the current
    /// subscription.
    pub fn unsubscribe(&mut self, id: &StationId) -> bool {
        match &self.current {
            Some(current) if &current.station_id == id => {
                self.current = None;
                true
            }
            _ => false,
        }
    }

    /// Ask for a refresh. Returns a ticket only if a fetch may start now.
    ///
    /// Timer and manual triggers follow the same rules; the trigger is
    /// accepted for the caller's logging.
    pub fn request_refresh(&mut self, _trigger: RefreshTrigger) -> Option<FetchTicket> {
        let current = self.current.as_mut()?;

        current.status = match current.status {
            SubscriptionStatus::Ready => SubscriptionStatus::Refreshing,
            SubscriptionStatus::Failed => SubscriptionStatus::Loading,
            SubscriptionStatus::Idle
            | SubscriptionStatus::Loading
            | SubscriptionStatus::Refreshing => return None,
        };

        Some(current.ticket())
    }

    /// Apply the result of the fetch identified by `ticket`.
    ///
    /// Success replaces the board wholesale. Failure keeps the previous
    /// board if there is one, otherwise the subscription fails.
    pub fn complete(
        &mut self,
        ticket: &FetchTicket,
        result: Result<StationDetail, FetchError>,
        now: DateTime<Utc>,
    ) -> Completion {
        let Some(current) = self.current.as_mut() else {
            return Completion::Discarded;
        };
        if current.epoch != ticket.epoch || !current.status.is_busy() {
            return Completion::Discarded;
        }

        current.status = match result {
            Ok(detail) => {
                current.detail = Some(Arc::new(detail));
                current.title = Some(current.station_name.clone());
                current.last_updated = Some(now);
                SubscriptionStatus::Ready
            }
            Err(_) if current.detail.is_some() => SubscriptionStatus::Ready,
            Err(_) => SubscriptionStatus::Failed,
        };

        Completion::Applied(current.status)
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        let Some(current) = &self.current else {
            return BoardSnapshot::default();
        };

        BoardSnapshot {
            station_id: Some(current.station_id.clone()),
            station_name: Some(current.station_name.clone()),
            title: current.title.clone(),
            status: current.status,
            detail: current.detail.clone(),
            last_updated: current.last_updated,
        }
    }
}
