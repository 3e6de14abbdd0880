//! Shared station list for search.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::domain::{Station, StationId};
use crate::source::{FetchError, ScheduleSource};

use super::matcher::StationIndex;

/// Thread-safe holder of the station list.
///
/// The list is fetched on first use and then held read-only. An explicit
/// [`reload`](Self::reload) replaces it wholesale; a failed load or reload
/// leaves whatever was there before.
pub struct StationDirectory<S> {
    inner: Arc<RwLock<Option<Arc<StationIndex>>>>,
    source: Arc<S>,
}

impl<S> Clone for StationDirectory<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            source: Arc::clone(&self.source),
        }
    }
}

impl<S: ScheduleSource> StationDirectory<S> {
    /// Create an empty directory. Nothing is fetched until first use.
    pub fn new(source: Arc<S>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(None)),
            source,
        }
    }

    /// The loaded index, if a load has succeeded.
    pub async fn cached(&self) -> Option<Arc<StationIndex>> {
        self.inner.read().await.clone()
    }

    /// Return the index, fetching the station list if it is not loaded.
    ///
    /// Concurrent callers share a single fetch.
    pub async fn load(&self) -> Result<Arc<StationIndex>, FetchError> {
        if let Some(index) = self.cached().await {
            return Ok(index);
        }

        let mut guard = self.inner.write().await;
        if let Some(index) = guard.as_ref() {
            return Ok(Arc::clone(index));
        }

        let index = Arc::new(self.fetch_index().await?);
        info!(count = index.len(), "loaded station list");
        *guard = Some(Arc::clone(&index));
        Ok(index)
    }

    /// Fetch the station list again and replace the current one.
    ///
    /// Returns the new station count. On failure the existing list is
    /// kept and the error returned.
    pub async fn reload(&self) -> Result<usize, FetchError> {
        let index = match self.fetch_index().await {
            Ok(index) => index,
            Err(e) => {
                warn!(error = %e, "station list reload failed, keeping current list");
                return Err(e);
            }
        };
        let count = index.len();

        let mut guard = self.inner.write().await;
        *guard = Some(Arc::new(index));
        info!(count, "reloaded station list");

        Ok(count)
    }

    /// Rank stations against `query`, returning at most `cap`.
    pub async fn search(&self, query: &str, cap: usize) -> Result<Vec<Station>, FetchError> {
        let index = self.load().await?;
        Ok(index.search(query, cap).into_iter().cloned().collect())
    }

    /// Look up a station by id.
    pub async fn find(&self, id: &StationId) -> Result<Option<Station>, FetchError> {
        let index = self.load().await?;
        Ok(index.stations().iter().find(|s| &s.id == id).cloned())
    }

    async fn fetch_index(&self) -> Result<StationIndex, FetchError> {
        let stations = self.source.fetch_station_list().await?;
        Ok(StationIndex::new(stations))
    }
}
