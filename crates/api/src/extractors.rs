//! Request extractors.
//!
//! Handlers receive a [`RequestContext`] built from the `x-request-id` header (set by
//! `SetRequestIdLayer` before routing) and, for `/file/{id}` routes, the parsed path id.

use axum::{
    extract::{FromRequestParts, Path},
    http::{StatusCode, request::Parts},
    response::Response,
};
use filekeep_core::file::RequestContext;
use filekeep_shared::types::FileId;

use crate::response::ApiResponse;

/// Header carrying the request correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

fn request_id(parts: &Parts) -> String {
    parts
        .headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// Context for requests that do not address a stored file.
#[derive(Debug, Clone)]
pub struct RequestCtx(pub RequestContext);

impl<S> FromRequestParts<S> for RequestCtx
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(RequestContext::new(request_id(parts))))
    }
}

/// Context for `/file/{id}` requests.
///
/// Rejects with 400 `invalid file id` when the path segment is not an integer.
#[derive(Debug, Clone)]
pub struct FileCtx {
    /// Request context with `file_id` set.
    pub ctx: RequestContext,
    /// The addressed file.
    pub id: FileId,
}

impl<S> FromRequestParts<S> for FileCtx
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let invalid =
            || ApiResponse::error("invalid file id").into_response_with(StatusCode::BAD_REQUEST);

        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| invalid())?;
        let id: FileId = raw.parse().map_err(|_| invalid())?;

        Ok(Self {
            ctx: RequestContext::new(request_id(parts)).with_file_id(id),
            id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;
    use rstest::rstest;

    fn parts(uri: &str, request_id: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri(uri);
        if let Some(id) = request_id {
            builder = builder.header(REQUEST_ID_HEADER, id);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn test_request_ctx_reads_header() {
        let mut parts = parts("/file", Some("abc-123"));
        let RequestCtx(ctx) = RequestCtx::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(ctx.request_id, "abc-123");
        assert_eq!(ctx.file_id, None);
    }

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    #[tokio::test]
    async fn test_request_ctx_without_id(#[case] header: Option<&str>) {
        let mut parts = parts("/file", header);
        let RequestCtx(ctx) = RequestCtx::from_request_parts(&mut parts, &()).await.unwrap();
        assert!(ctx.request_id.is_empty());
    }
}
