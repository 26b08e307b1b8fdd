//! Web layer for the stop locator.
//!
//! JSON endpoints over the ranking engine, the line registry, reverse
//! geocoding and the session's last known position.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::{AppState, StartupError};
