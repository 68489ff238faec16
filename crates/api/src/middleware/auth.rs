//! Basic authentication middleware for the file routes.

use axum::{
    extract::{Request, State},
    http::{HeaderValue, StatusCode, header::WWW_AUTHENTICATE},
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Basic};
use subtle::ConstantTimeEq;
use tracing::warn;

use crate::{AppState, response::ApiResponse};

/// Challenge sent with every 401.
const CHALLENGE: &str = r#"Basic realm="filekeep""#;

/// Authentication middleware that checks HTTP Basic credentials.
///
/// Requests pass through untouched when no credentials are configured. A missing or malformed
/// `Authorization` header is a 401, never a 400.
pub async fn basic_auth_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let Some((username, password)) = state.auth.credentials() else {
        return next.run(request).await;
    };

    if let Some(auth_header) = request.headers().typed_get::<Authorization<Basic>>()
        && credentials_match(&auth_header, username, password)
    {
        return next.run(request).await;
    }

    warn!(path = %request.uri().path(), "Rejected unauthenticated request");
    unauthorized()
}

/// Compares both fields in constant time, evaluating each regardless of the other.
fn credentials_match(header: &Authorization<Basic>, username: &str, password: &str) -> bool {
    let user_ok = header.username().as_bytes().ct_eq(username.as_bytes());
    let password_ok = header.password().as_bytes().ct_eq(password.as_bytes());
    (user_ok & password_ok).into()
}

fn unauthorized() -> Response {
    let mut response =
        ApiResponse::error("unauthorized").into_response_with(StatusCode::UNAUTHORIZED);
    response
        .headers_mut()
        .insert(WWW_AUTHENTICATE, HeaderValue::from_static(CHALLENGE));
    response
}
