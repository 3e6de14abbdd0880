//! Station identity types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Provider-assigned station identifier (the feed's `gtfsId`).
///
/// Identifiers are opaque: they are compared and passed back to the
/// provider verbatim, never parsed.
///
/// # Examples
///
/// ```
/// use station_board::domain::StationId;
///
/// let id = StationId::new("HSL:1000202");
/// assert_eq!(id.as_str(), "HSL:1000202");
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StationId(String);

impl StationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationId({})", self.0)
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StationId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for StationId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A named station as listed by the provider.
///
/// Identity is the `id`; two stations with the same id are the same
/// station even if the names differ between list fetches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Station {
    pub id: StationId,
    pub name: String,
}

impl Station {
    pub fn new(id: impl Into<StationId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

impl PartialEq for Station {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Station {}
