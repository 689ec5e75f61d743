//! gizi-api - REST API layer for the gizi nutrition screening service
//!
//! Serves the `/analyst` resource on top of an [`gizi_core::AnalysisStore`]
//! and a [`gizi_predict::PredictorClient`]. It is store-agnostic.
//!
//! # Usage
//!
//! ```ignore
//! use gizi_api::{create_router, AppState};
//! use gizi_store::MemoryAnalysisStore;
//!
//! let state = AppState::new(Arc::new(MemoryAnalysisStore::new()), predictor, tokens);
//! let router = create_router(state);
//! ```

pub mod auth;
pub mod error;
pub mod handlers;
pub mod state;

pub use error::ApiError;
pub use state::AppState;

use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the REST API router with the given application state
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let analyst = get(handlers::analyst::list_analyses)
        .post(handlers::analyst::create_analysis)
        .delete(handlers::analyst::delete_analysis);

    Router::new()
        // Health check
        .route("/health", get(|| async { "OK" }))
        // Analysis resource, also under the path the web form already calls
        .route("/analyst", analyst.clone())
        .route("/api/analyst", analyst)
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
