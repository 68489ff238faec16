//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - The `/file` lifecycle routes and `/health`
//! - Basic authentication middleware
//! - Request extractors carrying the request id
//! - The JSON response envelope

pub mod extractors;
pub mod middleware;
pub mod response;
pub mod routes;

#[cfg(test)]
mod test_support;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    extract::{DefaultBodyLimit, Request},
    http::StatusCode,
};
use filekeep_core::{file::FileService, naming::UuidNameGenerator, storage::OpendalBlobStore};
use filekeep_db::FileRepository;
use filekeep_shared::{AppConfig, config::AuthConfig};
use sea_orm::DatabaseConnection;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use crate::extractors::REQUEST_ID_HEADER;

/// The file lifecycle service as wired in production.
pub type Files = FileService<FileRepository, OpendalBlobStore, UuidNameGenerator>;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// File lifecycle service.
    pub files: Arc<Files>,
    /// Basic credentials guarding the file routes.
    pub auth: Arc<AuthConfig>,
}

/// Transport limits applied to every request.
#[derive(Debug, Clone, Copy)]
pub struct HttpLimits {
    /// Largest accepted request body.
    pub max_upload_bytes: usize,
    /// Per-request deadline.
    pub request_timeout: Duration,
}

impl HttpLimits {
    /// Read limits from the application configuration.
    #[must_use]
    pub const fn from_config(config: &AppConfig) -> Self {
        Self {
            max_upload_bytes: config.storage.max_upload_bytes,
            request_timeout: Duration::from_secs(config.server.request_timeout_secs),
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState, limits: HttpLimits) -> Router {
    Router::new()
        .merge(routes::api_routes_with_state(state.clone()))
        .layer(DefaultBodyLimit::max(limits.max_upload_bytes))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http().make_span_with(request_span))
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    limits.request_timeout,
                ))
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .with_state(state)
}

/// Request span carrying the correlation id set by [`SetRequestIdLayer`].
fn request_span(request: &Request) -> Span {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-");

    tracing::info_span!(
        "request",
        method = %request.method(),
        path = %request.uri().path(),
        request_id,
    )
}
