//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::basic_auth_middleware};

pub mod files;
pub mod health;

/// Creates the router: public health checks plus the Basic-auth guarded file routes.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    let protected_routes = files::routes().layer(middleware::from_fn_with_state(
        state.clone(),
        basic_auth_middleware,
    ));

    Router::new()
        .merge(health::routes())
        .merge(protected_routes)
}
