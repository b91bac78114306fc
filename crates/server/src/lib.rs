//! HTTP boundary for the recipe analyzer.
//!
//! [`router`] wires a [`RecipeAnalyzer`] into an axum [`Router`]:
//!
//! | Route              | Purpose                                   |
//! |--------------------|-------------------------------------------|
//! | `GET /`            | service banner                            |
//! | `GET /health`      | liveness and current mode                 |
//! | `GET /api/example` | fixed response, no provider call          |
//! | `POST /api/analyze`| generate 2-3 recipes from ingredients     |
//!
//! Only malformed requests fail. Every accepted request gets recipes; whether
//! they came from the primary strategy is reported in the
//! [`GENERATION_STATUS_HEADER`] response header.

mod cors;
mod error;
mod routes;

use axum::Router;
use axum::http::HeaderName;
use axum::routing::{get, post};
use runtime::{Backend, RecipeAnalyzer};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub use cors::cors_layer;
pub use error::{ApiError, ErrorResponse};
pub use routes::{AnalyzeRequest, RecipeResponse};

/// `success` or `degraded-fallback`, set on every analyze response.
pub const GENERATION_STATUS_HEADER: HeaderName = HeaderName::from_static("x-generation-status");

/// Build the API router around a shared analyzer.
pub fn router<B: Backend + 'static>(
    analyzer: Arc<RecipeAnalyzer<B>>,
    allowed_origins: &[String],
) -> Router {
    Router::new()
        .route("/", get(routes::root))
        .route("/health", get(routes::health::<B>))
        .route("/api/example", get(routes::example::<B>))
        .route("/api/analyze", post(routes::analyze::<B>))
        .layer(cors_layer(allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(analyzer)
}
