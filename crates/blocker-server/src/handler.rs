use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Json};
use serde::{Deserialize, Serialize};

use crate::error::{BlobError, BlobResult};
use crate::service::IngestOutcome;
use crate::state::AppState;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub max_blob_size: usize,
}

/// Health check handler.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
        max_blob_size: state.service.max_blob_size(),
    })
}

/// `POST /blobs`: store the body, reply with its key.
///
/// 201 when the content is new, 200 when it was already stored.
pub async fn ingest_handler(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> BlobResult<impl IntoResponse> {
    let body = body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            BlobError::PayloadTooLarge {
                max: state.service.max_blob_size(),
            }
        } else {
            BlobError::Transport(rejection.body_text())
        }
    })?;

    let service = state.service.clone();
    let ingested = tokio::task::spawn_blocking(move || service.ingest(&body))
        .await
        .map_err(|e| BlobError::Internal(format!("ingest task failed: {e}")))??;

    let status = match ingested.outcome {
        IngestOutcome::Created => StatusCode::CREATED,
        IngestOutcome::Existing => StatusCode::OK,
    };
    Ok((
        status,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        ingested.key.to_string(),
    ))
}

/// `GET /blobs/:key`: return verified bytes.
pub async fn retrieve_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> BlobResult<impl IntoResponse> {
    retrieve(state, Some(key)).await
}

/// `GET /blobs` or `GET /blobs/` with no key.
pub async fn missing_key_handler(State(state): State<AppState>) -> BlobResult<impl IntoResponse> {
    retrieve(state, None).await
}

async fn retrieve(state: AppState, key: Option<String>) -> BlobResult<impl IntoResponse> {
    let service = state.service.clone();
    let data = tokio::task::spawn_blocking(move || service.retrieve(key.as_deref()))
        .await
        .map_err(|e| BlobError::Internal(format!("retrieve task failed: {e}")))??;
    Ok((
        [(header::CONTENT_TYPE, "application/octet-stream")],
        data,
    ))
}
