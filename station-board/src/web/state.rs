//! Application state for the web layer.

use crate::display::Projector;
use crate::scheduler::SchedulerHandle;
use crate::search::{DEFAULT_RESULT_CAP, StationDirectory};
use crate::source::Provider;

/// Shared application state.
///
/// Contains the services needed to handle requests. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    /// Handle to the refresh scheduler owning the board
    pub scheduler: SchedulerHandle,

    /// Station list used for search and name lookup
    pub directory: StationDirectory<Provider>,

    /// Renders board state into display views
    pub projector: Projector,

    /// Maximum number of station search results
    pub result_cap: usize,
}

impl AppState {
    /// Create a new app state with the default result cap.
    pub fn new(
        scheduler: SchedulerHandle,
        directory: StationDirectory<Provider>,
        projector: Projector,
    ) -> Self {
        Self {
            scheduler,
            directory,
            projector,
            result_cap: DEFAULT_RESULT_CAP,
        }
    }

    /// Set the search result cap.
    pub fn with_result_cap(mut self, cap: usize) -> Self {
        self.result_cap = cap;
        self
    }
}
