//! Request handlers.
//!
//! `/qr` never fails: every extraction error is logged and answered with the
//! empty record. `/search-web` does not suppress errors and answers 500.

use super::AppState;
use crate::error::ExtractionError;
use crate::models::{ContactRecord, ResearchResult, ResearchSubject};
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};

/// Multipart field expected to carry the image.
pub const UPLOAD_FIELD: &str = "file";

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

/// Error response for handlers that propagate failures.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    /// Generic 500; details stay in the logs.
    pub fn internal() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "internal server error".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let payload = Json(ErrorResponse {
            error: self.message,
        });
        (self.status, payload).into_response()
    }
}

/// `POST /qr`
pub async fn parse_qr(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Json<ContactRecord> {
    let result = match multipart {
        Ok(multipart) => match read_upload(multipart).await {
            Ok(upload) => state.contacts.extract_from_image(upload).await,
            Err(e) => Err(e),
        },
        Err(rejection) => Err(ExtractionError::Upload(rejection.body_text())),
    };

    match result {
        Ok(extraction) => {
            tracing::info!(source = ?extraction.source, "Contact extracted");
            Json(extraction.record)
        }
        Err(e) => {
            tracing::warn!("Contact extraction failed, returning empty record: {}", e);
            Json(ContactRecord::empty())
        }
    }
}

/// Read the uploaded image: the `file` field, or else the first field that
/// carries a filename.
async fn read_upload(mut multipart: Multipart) -> Result<Vec<u8>, ExtractionError> {
    let mut fallback = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ExtractionError::Upload(e.body_text()))?
    {
        let named = field.name() == Some(UPLOAD_FIELD);
        let has_filename = field.file_name().is_some();
        if !named && (!has_filename || fallback.is_some()) {
            continue;
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| ExtractionError::Upload(e.body_text()))?;

        if named {
            return Ok(data.to_vec());
        }
        fallback = Some(data.to_vec());
    }

    fallback.ok_or_else(|| ExtractionError::Upload("no file in upload".to_string()))
}

/// `GET /search-web`
pub async fn search_web(
    State(state): State<AppState>,
    Query(subject): Query<ResearchSubject>,
) -> Result<Json<ResearchResult>, ApiError> {
    let result = state.research.research(&subject).await.map_err(|e| {
        tracing::error!("Web research failed: {}", e);
        ApiError::internal()
    })?;

    Ok(Json(result))
}

/// `GET /health`
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
