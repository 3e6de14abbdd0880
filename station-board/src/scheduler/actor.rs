//! Refresh scheduler task.
//!
//! One tokio task owns the [`Board`] and is the only code that mutates it.
//! Subscribe, unsubscribe and manual refresh requests arrive as commands
//! from [`SchedulerHandle`]s; the periodic timer and fetch completions are
//! events in the same loop, so every state change is serialized without
//! locks. Fetches run as separate tasks that report back over a channel.

use std::future;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::domain::{StationDetail, StationId};
use crate::source::{FetchError, ScheduleSource};

use super::config::SchedulerConfig;
use super::machine::{
    Board, BoardSnapshot, Completion, FetchTicket, RefreshTrigger, SubscribeOutcome,
};

/// The scheduler task has stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("refresh scheduler has shut down")]
pub struct SchedulerClosed;

enum Command {
    Subscribe {
        id: StationId,
        name: String,
        reply: oneshot::Sender<BoardSnapshot>,
    },
    Unsubscribe {
        id: StationId,
        reply: oneshot::Sender<BoardSnapshot>,
    },
    Refresh {
        reply: oneshot::Sender<BoardSnapshot>,
    },
    Shutdown,
}

struct FetchDone {
    ticket: FetchTicket,
    result: Result<StationDetail, FetchError>,
}

enum Event {
    Command(Option<Command>),
    Completed(FetchDone),
    Tick,
}

/// Handle for driving the refresh scheduler.
///
/// Cheap to clone. Every request is applied by the scheduler task in the
/// order it is received.
#[derive(Debug, Clone)]
pub struct SchedulerHandle {
    commands: mpsc::Sender<Command>,
    snapshots: watch::Receiver<BoardSnapshot>,
}

impl SchedulerHandle {
    /// Watch `id`, replacing any other subscription.
    ///
    /// Returns the board state right after the request was applied
    /// (normally `Loading`).
    pub async fn subscribe(
        &self,
        id: StationId,
        name: impl Into<String>,
    ) -> Result<BoardSnapshot, SchedulerClosed> {
        let name = name.into();
        self.request(|reply| Command::Subscribe { id, name, reply })
            .await
    }

    /// Stop watching `id`: the timer stops and any in-flight result is
    /// dropped.
    pub async fn unsubscribe(&self, id: StationId) -> Result<BoardSnapshot, SchedulerClosed> {
        self.request(|reply| Command::Unsubscribe { id, reply }).await
    }

    /// Ask for an immediate refresh. Does nothing if a fetch is already in
    /// flight.
    pub async fn refresh(&self) -> Result<BoardSnapshot, SchedulerClosed> {
        self.request(|reply| Command::Refresh { reply }).await
    }

    /// The latest published board state.
    pub fn snapshot(&self) -> BoardSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Wait until the board state satisfies `predicate`.
    pub async fn wait_for(
        &self,
        predicate: impl FnMut(&BoardSnapshot) -> bool,
    ) -> Result<BoardSnapshot, SchedulerClosed> {
        let mut snapshots = self.snapshots.clone();
        let snapshot = snapshots
            .wait_for(predicate)
            .await
            .map_err(|_| SchedulerClosed)?;
        Ok(snapshot.clone())
    }

    /// Wait until no fetch is in flight.
    pub async fn settled(&self) -> Result<BoardSnapshot, SchedulerClosed> {
        self.wait_for(|s| !s.status.is_busy()).await
    }

    /// Stop the scheduler task.
    pub async fn shutdown(&self) {
        // Already stopped if the send fails
        let _ = self.commands.send(Command::Shutdown).await;
    }

    async fn request(
        &self,
        command: impl FnOnce(oneshot::Sender<BoardSnapshot>) -> Command,
    ) -> Result<BoardSnapshot, SchedulerClosed> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(command(reply))
            .await
            .map_err(|_| SchedulerClosed)?;
        response.await.map_err(|_| SchedulerClosed)
    }
}

/// The scheduler task's state.
pub struct RefreshScheduler<S> {
    source: Arc<S>,
    config: SchedulerConfig,
    board: Board,
    commands: mpsc::Receiver<Command>,
    completions_tx: mpsc::UnboundedSender<FetchDone>,
    completions: mpsc::UnboundedReceiver<FetchDone>,
    snapshots: watch::Sender<BoardSnapshot>,
    ticker: Option<Interval>,
    in_flight: Option<JoinHandle<()>>,
}

impl<S: ScheduleSource> RefreshScheduler<S> {
    /// Spawn the scheduler on the current tokio runtime.
    pub fn spawn(source: Arc<S>, config: SchedulerConfig) -> SchedulerHandle {
        let (handle, scheduler) = Self::new(source, config);
        tokio::spawn(scheduler.run());
        handle
    }

    fn new(source: Arc<S>, config: SchedulerConfig) -> (SchedulerHandle, Self) {
        let (commands_tx, commands) = mpsc::channel(config.command_buffer.max(1));
        let (completions_tx, completions) = mpsc::unbounded_channel();
        let (snapshots, snapshots_rx) = watch::channel(BoardSnapshot::default());

        let handle = SchedulerHandle {
            commands: commands_tx,
            snapshots: snapshots_rx,
        };
        let scheduler = Self {
            source,
            config,
            board: Board::new(),
            commands,
            completions_tx,
            completions,
            snapshots,
            ticker: None,
            in_flight: None,
        };
        (handle, scheduler)
    }

    async fn run(mut self) {
        debug!("refresh scheduler started");

        loop {
            let event = tokio::select! {
                command = self.commands.recv() => Event::Command(command),
                Some(done) = self.completions.recv() => Event::Completed(done),
                _ = next_tick(&mut self.ticker) => Event::Tick,
            };

            match event {
                Event::Command(None) | Event::Command(Some(Command::Shutdown)) => break,
                Event::Command(Some(command)) => self.handle_command(command),
                Event::Completed(done) => self.handle_completion(done),
                Event::Tick => self.refresh(RefreshTrigger::Timer),
            }
            self.publish();
        }

        self.stop_subscription();
        debug!("refresh scheduler stopped");
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::Subscribe { id, name, reply } => {
                self.subscribe(id, name);
                self.reply(reply);
            }
            Command::Unsubscribe { id, reply } => {
                if self.board.unsubscribe(&id) {
                    info!(station = %id, "unsubscribed");
                    self.stop_subscription();
                } else {
                    debug!(station = %id, "unsubscribe for inactive station ignored");
                }
                self.reply(reply);
            }
            Command::Refresh { reply } => {
                self.refresh(RefreshTrigger::Manual);
                self.reply(reply);
            }
            Command::Shutdown => {}
        }
    }

    fn subscribe(&mut self, id: StationId, name: String) {
        match self.board.subscribe(id, name) {
            SubscribeOutcome::Started { ticket, replaced } => {
                if let Some(previous) = replaced {
                    info!(station = %previous, "subscription replaced");
                    self.stop_subscription();
                }
                info!(station = %ticket.station_id(), "subscribed");
                self.start_timer();
                self.start_fetch(ticket);
            }
            SubscribeOutcome::AlreadySubscribed => {
                debug!("already subscribed");
            }
        }
    }

    fn refresh(&mut self, trigger: RefreshTrigger) {
        match self.board.request_refresh(trigger) {
            Some(ticket) => {
                debug!(station = %ticket.station_id(), ?trigger, "refreshing");
                self.start_fetch(ticket);
            }
            None => debug!(?trigger, status = ?self.board.status(), "refresh skipped"),
        }
    }

    fn handle_completion(&mut self, done: FetchDone) {
        let FetchDone { ticket, result } = done;
        let error = result.as_ref().err().map(ToString::to_string);

        match self.board.complete(&ticket, result, Utc::now()) {
            Completion::Applied(status) => {
                self.in_flight = None;
                match error {
                    None => info!(station = %ticket.station_id(), ?status, "board updated"),
                    Some(error) => warn!(
                        station = %ticket.station_id(),
                        ?status,
                        %error,
                        "fetch failed"
                    ),
                }
            }
            Completion::Discarded => {
                debug!(station = %ticket.station_id(), "discarding result of cancelled fetch");
            }
        }
    }

    fn start_timer(&mut self) {
        let period = self.config.refresh_interval;
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        // Keep ticks aligned to the subscription start, not fetch latency
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        self.ticker = Some(ticker);
    }

    fn start_fetch(&mut self, ticket: FetchTicket) {
        let source = Arc::clone(&self.source);
        let completions = self.completions_tx.clone();

        self.in_flight = Some(tokio::spawn(async move {
            let result = source.fetch_station_detail(ticket.station_id()).await;
            // The scheduler holds the receiver for as long as it runs
            let _ = completions.send(FetchDone { ticket, result });
        }));
    }

    /// Drop the timer and abandon any in-flight fetch.
    fn stop_subscription(&mut self) {
        self.ticker = None;
        if let Some(fetch) = self.in_flight.take() {
            fetch.abort();
        }
    }

    fn publish(&self) {
        let next = self.board.snapshot();
        self.snapshots.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
    }

    /// Publish, then answer, so a requester never observes an older
    /// snapshot through the watch channel than the one it was sent.
    fn reply(&self, reply: oneshot::Sender<BoardSnapshot>) {
        self.publish();
        // The requester may have given up waiting
        let _ = reply.send(self.board.snapshot());
    }
}

/// Resolve on the next timer tick, or never if there is no timer.
async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => future::pending().await,
    }
}
