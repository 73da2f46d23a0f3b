//! API Routes
//!
//! This module organizes all HTTP endpoints for the application:
//! - `/api/upload-public-file` - Public file upload, answers with a signed link
//! - `/api/health` - Health checks
//! - `/` - Browser upload form with local history

pub mod health;
pub mod ui;
pub mod upload;

use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::middleware::cors_layer;
use crate::models::AppState;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    info!("Creating application router");

    let cors = cors_layer(&state.config.server.cors_allowed_origins);

    Router::new()
        .merge(upload::router(state.clone()))
        .merge(health::router(state))
        .merge(ui::router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
