//! JSON response envelope.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use filekeep_shared::types::FileId;
use serde::Serialize;

/// `{"status": "success" | "error", "message": ..., "id": ...}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponse {
    /// `success` or `error`.
    pub status: &'static str,
    /// Human-readable outcome.
    pub message: &'static str,
    /// Id of the file the request created.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<FileId>,
}

impl ApiResponse {
    /// A success envelope.
    #[must_use]
    pub const fn success(message: &'static str) -> Self {
        Self {
            status: "success",
            message,
            id: None,
        }
    }

    /// An error envelope.
    #[must_use]
    pub const fn error(message: &'static str) -> Self {
        Self {
            status: "error",
            message,
            id: None,
        }
    }

    /// Attach the id of a created file.
    #[must_use]
    pub const fn with_id(mut self, id: FileId) -> Self {
        self.id = Some(id);
        self
    }

    /// Pair the envelope with a status code.
    pub fn into_response_with(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}
