//! Presentation-ready projections of the departure board.

mod projector;
mod views;

pub use projector::{DEFAULT_ROW_CAP, Projector};
pub use views::{BoardView, DelayStatus, DisplayDetail, DisplayRow};
