//! Web layer for the station board.
//!
//! Exposes station search and the live departure board as JSON endpoints.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::create_router;
pub use state::AppState;
