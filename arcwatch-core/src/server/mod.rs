//! HTTP surface: viewer stream, viewer config, health, static assets.

mod middleware;
mod routes;
mod setup;
mod state;


pub use routes::{HEALTH_PATH, VIEWER_CONFIG_PATH, build_router};
pub use setup::{Arcwatch, ServerError, build, run, shutdown_signal};
pub use state::{AppState, HealthReport, ViewerSettings};
