//! Shared fixtures for router tests.

use std::sync::Arc;
use std::time::Duration;

use axum::{Router, body::Body, http::Request};
use filekeep_core::{file::FileService, naming::UuidNameGenerator, storage::OpendalBlobStore};
use filekeep_db::{FileRepository, Migrator, migration::MigratorTrait};
use filekeep_shared::config::{AuthConfig, StorageProvider};
use http_body_util::BodyExt;
use sea_orm::{ConnectOptions, Database};

use crate::{AppState, HttpLimits, create_router};

pub const BOUNDARY: &str = "filekeep-test-boundary";

/// State over a fresh in-memory SQLite catalog and an in-memory blob store.
pub async fn test_state(auth: AuthConfig) -> AppState {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(options)
        .await
        .expect("Failed to connect to database");
    Migrator::up(&db, None).await.expect("Failed to migrate");

    let blobs = OpendalBlobStore::from_provider(&StorageProvider::Memory)
        .expect("should create memory store");
    let files = FileService::new(
        Arc::new(FileRepository::new(db.clone())),
        Arc::new(blobs),
        Arc::new(UuidNameGenerator::new()),
    );

    AppState {
        db: Arc::new(db),
        files: Arc::new(files),
        auth: Arc::new(auth),
    }
}

pub fn test_app(state: AppState) -> Router {
    test_app_with_limit(state, 1024 * 1024)
}

pub fn test_app_with_limit(state: AppState, max_upload_bytes: usize) -> Router {
    create_router(
        state,
        HttpLimits {
            max_upload_bytes,
            request_timeout: Duration::from_secs(5),
        },
    )
}

/// A `POST /file` multipart request with a single part.
pub fn multipart_upload(field: &str, filename: Option<&str>, content: &str) -> Request<Body> {
    let disposition = match filename {
        Some(name) => format!(r#"form-data; name="{field}"; filename="{name}""#),
        None => format!(r#"form-data; name="{field}""#),
    };
    let body = format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: {disposition}\r\n\
         Content-Type: application/octet-stream\r\n\r\n\
         {content}\r\n\
         --{BOUNDARY}--\r\n"
    );

    Request::builder()
        .method("POST")
        .uri("/file")
        .header(
            "Content-Type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
