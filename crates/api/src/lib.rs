//! HTTP API layer for session-insights.

pub mod context;
pub mod response;
pub mod routes;
pub mod state;

pub use routes::router;
pub use state::AppState;
