//! Station search.
//!
//! Ranks the provider's station list against free-text input. The list
//! itself is fetched once per activation and held read-only by
//! [`StationDirectory`]; matching is synchronous and runs on every query.

mod directory;
mod fold;
mod matcher;

pub use directory::StationDirectory;
pub use fold::fold;
pub use matcher::{DEFAULT_RESULT_CAP, MatchTier, StationIndex, match_stations, rank};
