//! Schedule provider access.
//!
//! A [`ScheduleSource`] performs single fetches of the station list or of
//! one station's departure board. Transport and shape failures are
//! normalized into [`FetchError`]; sources never retry and never touch
//! shared state.

mod client;
mod convert;
mod error;
mod mock;
mod wire;

use std::future::Future;

pub use client::{DEFAULT_HOST, DEFAULT_PORT, HttpScheduleSource, SourceConfig};
pub use convert::{parse_station_detail, parse_station_list};
pub use error::FetchError;
pub use mock::StaticScheduleSource;
pub use wire::{RemarkDto, RouteDto, StationDetailDto, StationDto, StopDto, StopTimeDto, TripDto};

use crate::domain::{Station, StationDetail, StationId};

/// Where station lists and departure boards come from.
pub trait ScheduleSource: Send + Sync + 'static {
    /// Fetch the full station list.
    fn fetch_station_list(&self) -> impl Future<Output = Result<Vec<Station>, FetchError>> + Send;

    /// Fetch one station's departure board.
    fn fetch_station_detail(
        &self,
        id: &StationId,
    ) -> impl Future<Output = Result<StationDetail, FetchError>> + Send;
}

/// The source selected at startup.
#[derive(Debug, Clone)]
pub enum Provider {
    Http(HttpScheduleSource),
    Static(StaticScheduleSource),
}

impl ScheduleSource for Provider {
    async fn fetch_station_list(&self) -> Result<Vec<Station>, FetchError> {
        match self {
            Provider::Http(source) => source.fetch_station_list().await,
            Provider::Static(source) => source.fetch_station_list().await,
        }
    }

    async fn fetch_station_detail(&self, id: &StationId) -> Result<StationDetail, FetchError> {
        match self {
            Provider::Http(source) => source.fetch_station_detail(id).await,
            Provider::Static(source) => source.fetch_station_detail(id).await,
        }
    }
}
