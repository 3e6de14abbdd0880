//! Domain types for station departure boards.
//!
//! Records are created wholesale from a provider response and never
//! patched in place. Types that carry a non-emptiness invariant enforce it
//! at construction, so code that receives them can index the first and
//! last elements without checking.

mod error;
mod schedule;
mod station;

pub use error::ScheduleError;
pub use schedule::{Remark, ScheduleEntry, StationDetail, StopRef, StopTime, Trip};
pub use station::{Station, StationId};
