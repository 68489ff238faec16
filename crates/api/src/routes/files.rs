//! File lifecycle routes.
//!
//! - `POST /file` stores a multipart upload (field `file`)
//! - `GET /file/{id}` downloads a live file
//! - `PATCH /file/{id}` soft-deletes
//! - `DELETE /file/{id}` hard-deletes a soft-deleted file

use axum::{
    Router,
    extract::{Multipart, State, multipart::MultipartRejection},
    http::{
        HeaderValue, StatusCode,
        header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    },
    response::{IntoResponse, Response},
    routing::{get, post},
};
use filekeep_core::file::{FileError, RequestContext, UploadInput};
use filekeep_shared::{AppError, types::FileId};
use tracing::{error, warn};

use crate::{
    AppState,
    extractors::{FileCtx, RequestCtx},
    response::ApiResponse,
};

/// Multipart field holding the upload.
const UPLOAD_FIELD: &str = "file";

/// Creates the file routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/file", post(upload_file)).route(
        "/file/{id}",
        get(download_file)
            .patch(soft_delete_file)
            .delete(hard_delete_file),
    )
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Pull the `file` part out of a multipart body.
async fn read_upload(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<UploadInput, String> {
    let mut multipart = multipart.map_err(|e| e.body_text())?;

    while let Some(field) = multipart.next_field().await.map_err(|e| e.body_text())? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let original_name = field.file_name().unwrap_or_default().to_string();
        if original_name.is_empty() {
            return Err("file name is empty".to_string());
        }

        let content = field.bytes().await.map_err(|e| e.body_text())?;
        return Ok(UploadInput::new(original_name, content));
    }

    Err(format!("missing `{UPLOAD_FIELD}` field"))
}

/// `attachment; filename="..."` with quotes escaped and control characters dropped.
///
/// Non-ASCII names get an ASCII fallback plus an RFC 5987 `filename*` carrying the UTF-8 name.
fn content_disposition(original_name: &str) -> HeaderValue {
    let name: String = original_name.chars().filter(|c| !c.is_control()).collect();

    let mut fallback = String::with_capacity(name.len());
    for c in name.chars() {
        match c {
            '"' | '\\' => {
                fallback.push('\\');
                fallback.push(c);
            }
            c if c.is_ascii() => fallback.push(c),
            _ => fallback.push('_'),
        }
    }

    let value = if name.is_ascii() {
        format!("attachment; filename=\"{fallback}\"")
    } else {
        format!(
            "attachment; filename=\"{fallback}\"; filename*=UTF-8''{}",
            urlencoding::encode(&name)
        )
    };

    HeaderValue::from_str(&value).unwrap_or_else(|_| HeaderValue::from_static("attachment"))
}

/// Map a lifecycle error to a response. Only server errors are logged; their detail never
/// reaches the body.
fn failure(
    ctx: &RequestContext,
    op: &'static str,
    err: FileError,
    message: &'static str,
) -> Response {
    let err = AppError::from(err);

    match err.status_code() {
        400 => ApiResponse::error("invalid request").into_response_with(StatusCode::BAD_REQUEST),
        404 => ApiResponse::error("file not found").into_response_with(StatusCode::NOT_FOUND),
        _ => {
            error!(
                op,
                request_id = %ctx.request_id,
                file_id = ctx.file_id.map(FileId::into_inner),
                code = err.error_code(),
                error = %err,
                "File operation failed"
            );
            ApiResponse::error(message).into_response_with(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST `/file`
/// Store an upload and return its id.
async fn upload_file(
    State(state): State<AppState>,
    RequestCtx(ctx): RequestCtx,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let input = match read_upload(multipart).await {
        Ok(input) => input,
        Err(reason) => {
            warn!(request_id = %ctx.request_id, reason, "Invalid upload request");
            return ApiResponse::error("invalid request")
                .into_response_with(StatusCode::BAD_REQUEST);
        }
    };

    match state.files.save(&ctx, input).await {
        Ok(id) => ApiResponse::success("file saved")
            .with_id(id)
            .into_response_with(StatusCode::CREATED),
        Err(e) => failure(&ctx, "save", e, "failed to save file"),
    }
}

/// GET `/file/{id}`
/// Stream back the bytes of a live file.
async fn download_file(
    State(state): State<AppState>,
    FileCtx { ctx, id }: FileCtx,
) -> Response {
    match state.files.read(&ctx, id).await {
        Ok(stored) => (
            StatusCode::OK,
            [
                (
                    CONTENT_TYPE,
                    HeaderValue::from_static("application/octet-stream"),
                ),
                (
                    CONTENT_DISPOSITION,
                    content_disposition(&stored.record.original_name),
                ),
            ],
            stored.content,
        )
            .into_response(),
        Err(e) => failure(&ctx, "read", e, "failed to get file"),
    }
}

/// PATCH `/file/{id}`
/// Soft delete.
async fn soft_delete_file(
    State(state): State<AppState>,
    FileCtx { ctx, id }: FileCtx,
) -> Response {
    match state.files.soft_delete(&ctx, id).await {
        Ok(()) => ApiResponse::success("file deleted").into_response_with(StatusCode::OK),
        Err(e) => failure(&ctx, "soft_delete", e, "failed to delete file"),
    }
}

/// DELETE `/file/{id}`
/// Hard delete: the file must have been soft-deleted first.
async fn hard_delete_file(
    State(state): State<AppState>,
    FileCtx { ctx, id }: FileCtx,
) -> Response {
    match state.files.hard_delete(&ctx, id).await {
        Ok(()) => ApiResponse::success("file deleted").into_response_with(StatusCode::OK),
        Err(e) => failure(&ctx, "hard_delete", e, "failed to delete file"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use filekeep_core::storage::BlobError;
    use rstest::rstest;

    #[rstest]
    #[case("report.pdf", r#"attachment; filename="report.pdf""#)]
    #[case(r#"say "hi".txt"#, r#"attachment; filename="say \"hi\".txt""#)]
    #[case("back\\slash", r#"attachment; filename="back\\slash""#)]
    #[case("line\nbreak", r#"attachment; filename="linebreak""#)]
    #[case(
        "résumé.pdf",
        r#"attachment; filename="r_sum_.pdf"; filename*=UTF-8''r%C3%A9sum%C3%A9.pdf"#
    )]
    #[case(
        "报告 1.txt",
        r#"attachment; filename="__ 1.txt"; filename*=UTF-8''%E6%8A%A5%E5%91%8A%201.txt"#
    )]
    fn test_content_disposition(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(content_disposition(name), expected);
    }

    #[rstest]
    #[case(FileError::validation("empty"), StatusCode::BAD_REQUEST)]
    #[case(FileError::NotFound(FileId(1)), StatusCode::NOT_FOUND)]
    #[case(FileError::DuplicateKey("k".into()), StatusCode::INTERNAL_SERVER_ERROR)]
    #[case(FileError::Storage(BlobError::not_found("k")), StatusCode::INTERNAL_SERVER_ERROR)]
    #[case(FileError::Catalog("down".into()), StatusCode::INTERNAL_SERVER_ERROR)]
    fn test_failure_status(#[case] err: FileError, #[case] expected: StatusCode) {
        let ctx = RequestContext::new("req").with_file_id(FileId(1));
        assert_eq!(failure(&ctx, "read", err, "failed to get file").status(), expected);
    }
}

/// Router tests over in-memory SQLite and the OpenDAL memory service.
#[cfg(test)]
mod integration_tests {
    use axum::http::{Request, header::AUTHORIZATION};
    use axum::body::Body;
    use filekeep_core::file::FileCatalog;
    use filekeep_db::FileRepository;
    use filekeep_shared::config::AuthConfig;
    use serde_json::json;
    use tower::ServiceExt;

    use super::*;
    use crate::test_support::{
        body_bytes, body_json, empty_request, multipart_upload, test_app, test_app_with_limit,
        test_state,
    };

    #[tokio::test]
    async fn test_full_lifecycle() {
        let state = test_state(AuthConfig::default()).await;
        let app = test_app(state.clone());

        // Upload
        let response = app
            .clone()
            .oneshot(multipart_upload("file", Some("test.txt"), "test"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            body_json(response).await,
            json!({"status": "success", "message": "file saved", "id": 1})
        );

        // Download
        let response = app
            .clone()
            .oneshot(empty_request("GET", "/file/1"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(CONTENT_TYPE).unwrap(),
            "application/octet-stream"
        );
        assert_eq!(
            response.headers().get(CONTENT_DISPOSITION).unwrap(),
            r#"attachment; filename="test.txt""#
        );
        assert_eq!(body_bytes(response).await, "test");

        // Soft delete
        let response = app
            .clone()
            .oneshot(empty_request("PATCH", "/file/1"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({"status": "success", "message": "file deleted"})
        );

        // Hidden from reads
        let response = app
            .clone()
            .oneshot(empty_request("GET", "/file/1"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await,
            json!({"status": "error", "message": "file not found"})
        );

        let record = FileRepository::new((*state.db).clone())
            .get_by_id(FileId(1), true)
            .await
            .unwrap();
        assert!(
            state
                .files
                .blob_store()
                .exists(&record.storage_name)
                .await
                .unwrap()
        );

        // Hard delete
        let response = app
            .clone()
            .oneshot(empty_request("DELETE", "/file/1"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(
            !state
                .files
                .blob_store()
                .exists(&record.storage_name)
                .await
                .unwrap()
        );

        // Gone
        let response = app
            .oneshot(empty_request("DELETE", "/file/1"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[rstest::rstest]
    #[case("GET")]
    #[case("PATCH")]
    #[case("DELETE")]
    #[tokio::test]
    async fn test_invalid_file_id(#[case] method: &str) {
        let app = test_app(test_state(AuthConfig::default()).await);

        let response = app
            .oneshot(empty_request(method, "/file/abc"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({"status": "error", "message": "invalid file id"})
        );
    }

    #[rstest::rstest]
    #[case("GET")]
    #[case("PATCH")]
    #[case("DELETE")]
    #[tokio::test]
    async fn test_unknown_file_id(#[case] method: &str) {
        let app = test_app(test_state(AuthConfig::default()).await);

        let response = app
            .oneshot(empty_request(method, "/file/42"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_hard_delete_live_file_is_not_found() {
        let state = test_state(AuthConfig::default()).await;
        let app = test_app(state);

        app.clone()
            .oneshot(multipart_upload("file", Some("a.txt"), "live"))
            .await
            .unwrap();

        let response = app
            .clone()
            .oneshot(empty_request("DELETE", "/file/1"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app
            .oneshot(empty_request("GET", "/file/1"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[rstest::rstest]
    #[case::missing_field(multipart_upload("document", Some("a.txt"), "x"))]
    #[case::empty_filename(multipart_upload("file", Some(""), "x"))]
    #[case::no_filename(multipart_upload("file", None, "x"))]
    #[case::not_multipart(
        Request::builder()
            .method("POST")
            .uri("/file")
            .header("Content-Type", "application/json")
            .body(Body::from("{}"))
            .unwrap()
    )]
    #[tokio::test]
    async fn test_upload_invalid_request(#[case] request: Request<Body>) {
        let state = test_state(AuthConfig::default()).await;
        let app = test_app(state.clone());

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({"status": "error", "message": "invalid request"})
        );
        assert!(
            FileRepository::new((*state.db).clone())
                .get_by_id(FileId(1), false)
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn test_upload_over_limit_is_rejected() {
        let app = test_app_with_limit(test_state(AuthConfig::default()).await, 64);

        let response = app
            .oneshot(multipart_upload("file", Some("big.bin"), &"x".repeat(4096)))
            .await
            .unwrap();

        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn test_request_id_is_generated_and_propagated() {
        let app = test_app(test_state(AuthConfig::default()).await);

        let response = app
            .clone()
            .oneshot(empty_request("GET", "/file/42"))
            .await
            .unwrap();
        assert!(response.headers().contains_key("x-request-id"));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/file/42")
                    .header("x-request-id", "caller-supplied")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            response.headers().get("x-request-id").unwrap(),
            "caller-supplied"
        );
    }

    fn with_credentials() -> AuthConfig {
        AuthConfig {
            username: Some("admin".to_string()),
            password: Some("secret".to_string()),
        }
    }

    #[tokio::test]
    async fn test_auth_rejects_missing_credentials() {
        let app = test_app(test_state(with_credentials()).await);

        let response = app
            .oneshot(multipart_upload("file", Some("a.txt"), "x"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().contains_key("www-authenticate"));
        assert_eq!(
            body_json(response).await,
            json!({"status": "error", "message": "unauthorized"})
        );
    }

    #[rstest::rstest]
    // admin:wrong
    #[case("Basic YWRtaW46d3Jvbmc=", StatusCode::UNAUTHORIZED)]
    // admin:secret
    #[case("Basic YWRtaW46c2VjcmV0", StatusCode::NOT_FOUND)]
    #[case("Bearer token", StatusCode::UNAUTHORIZED)]
    #[tokio::test]
    async fn test_auth_checks_credentials(#[case] header: &str, #[case] expected: StatusCode) {
        let app = test_app(test_state(with_credentials()).await);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/file/42")
                    .header(AUTHORIZATION, header)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), expected);
    }

    #[tokio::test]
    async fn test_health_is_public() {
        let app = test_app(test_state(with_credentials()).await);

        let response = app
            .clone()
            .oneshot(empty_request("GET", "/health"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "healthy");

        let response = app
            .oneshot(empty_request("GET", "/health/ready"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ready");
    }
}
