//! # Plasma - Synthetic Data API Server
//!
//! Plasma fabricates pseudo-random but structurally plausible records over
//! HTTP: users, products, companies, transactions, interaction datasets,
//! time series, and caller-defined custom schemas, rendered as JSON (bulk or
//! streamed) or CSV.
//!
//! ## Features
//!
//! - **Field subsets and bounds**: `fields`, `ageRange`, and `locale`
//!   parameters shape every record
//! - **Reproducibility**: a `seed` parameter drives a per-request RNG, so
//!   identical requests return identical bodies
//! - **Referential plausibility**: transactions and dataset rows reference
//!   bounded per-request pools of users and products
//! - **Bounded memory**: JSON responses past a streaming threshold are
//!   emitted incrementally
//! - **Request log**: optional SQLite sink feeding `/stats`
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use plasma::config::Settings;
//!
//! fn main() -> anyhow::Result<()> {
//!     // Loads plasma.toml when present, falling back to defaults.
//!     let settings = Settings::new()?;
//!     println!("would listen on {}:{}", settings.server.host, settings.server.port);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **Domain**: entity shapes and the error taxonomy
//! - **Generation**: field generators, builders, pools, parameter
//!   resolution, serialization
//! - **Adapters**: HTTP handlers and middleware
//! - **Persistence**: the optional request-log collaborator

pub mod adapters;
pub mod cli;
pub mod config;
pub mod domain;
pub mod generation;
pub mod persistence;

use axum::routing::{get, post};
use axum::Router;

use crate::adapters::{api_handler, docs_handler, health_handler, AppState};

/// Creates the Axum application router with all endpoints configured.
pub fn create_app(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/", get(docs_handler::welcome))
        .route("/docs", get(docs_handler::docs))
        .route("/health", get(health_handler::health))
        .route("/users", get(api_handler::users))
        .route("/products", get(api_handler::products))
        .route("/companies", get(api_handler::companies))
        .route("/transactions", get(api_handler::transactions))
        .route("/dataset", get(api_handler::dataset))
        .route("/timeseries", get(api_handler::timeseries))
        .route("/custom", post(api_handler::custom))
        .route("/stats", get(api_handler::stats))
        .with_state(state.clone());

    if let Some(rate_limit) = &state.settings.rate_limit {
        if rate_limit.enabled {
            let limiter = adapters::rate_limit::create_limiter(
                rate_limit.requests_per_second,
                rate_limit.burst_size,
            );
            router = router.layer(axum::middleware::from_fn_with_state(
                limiter,
                adapters::rate_limit::rate_limit_middleware,
            ));
        }
    }

    router.layer(
        tower_http::cors::CorsLayer::new()
            .allow_origin(tower_http::cors::Any)
            .allow_methods(tower_http::cors::Any)
            .allow_headers(tower_http::cors::Any),
    )
}
