//! HTTP edge adapters: endpoint handlers, static docs, health, and the
//! rate-limit middleware.

pub mod api_handler;
pub mod docs_handler;
pub mod health_handler;
pub mod rate_limit;

pub use api_handler::AppState;
