//! Alerting configuration endpoints.
//!
//! Routes:
//! - `POST   /api/alertmanager/:datasource_id/config/api/v1/alerts`: validate and store a config
//! - `GET    /api/alertmanager/:datasource_id/config/api/v1/alerts`: read the stored config
//! - `DELETE /api/alertmanager/:datasource_id/config/api/v1/alerts`: drop the stored config
//!
//! A body that fails decoding or validation is always a `400`; nothing is
//! stored in that case.

use axum::{
    body::{Body, Bytes},
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::Response,
    Json,
};
use serde::{Deserialize, Serialize};

use super::headers::{compute_etag, if_none_match_matches, last_modified};
use super::AppState;
use crate::alerting::{decode_postable, Backend};
use crate::error::AppError;

pub const CONFIG_PATH: &str = "/api/alertmanager/:datasource_id/config/api/v1/alerts";

/// Acknowledgement body for write operations.
#[derive(Debug, Serialize, Deserialize)]
pub struct Ack {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend: Option<Backend>,
}

/// `POST`: decode, validate and store an alerting config.
pub async fn post_alerting_config(
    State(state): State<AppState>,
    Path(datasource_id): Path<String>,
    body: Bytes,
) -> Result<(StatusCode, Json<Ack>), AppError> {
    let config = decode_postable(&body).map_err(|err| {
        state.metrics.record_rejected(&err);
        tracing::warn!(
            "Rejected alerting config for datasource {} ({}): {}",
            datasource_id,
            err.reason(),
            err
        );
        AppError::from(err)
    })?;

    let backend = config.backend();
    state.store.write().await.put(datasource_id.clone(), config);
    state.metrics.record_accepted(backend);

    tracing::info!(
        "Stored alerting config for datasource {} (backend: {:?})",
        datasource_id,
        backend
    );

    Ok((
        StatusCode::CREATED,
        Json(Ack {
            message: "configuration created".to_string(),
            backend: Some(backend),
        }),
    ))
}

/// `GET`: return the stored config as a read-model document.
///
/// Honors `If-None-Match` with a `304`.
pub async fn get_alerting_config(
    State(state): State<AppState>,
    Path(datasource_id): Path<String>,
    request_headers: HeaderMap,
) -> Result<Response, AppError> {
    let stored = state
        .store
        .read()
        .await
        .get(&datasource_id)
        .cloned()
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "no alerting configuration for datasource {}",
                datasource_id
            ))
        })?;

    let body = serde_json::to_vec(&stored.to_gettable())
        .map_err(|err| AppError::Internal(err.to_string()))?;
    let etag = compute_etag(&body);

    let mut builder = Response::builder()
        .header(header::CACHE_CONTROL, "no-cache")
        .header(header::ETAG, etag.as_str());
    if let Some(value) = last_modified(stored.stored_at) {
        builder = builder.header(header::LAST_MODIFIED, value);
    }

    let response = if if_none_match_matches(&request_headers, &etag) {
        builder.status(StatusCode::NOT_MODIFIED).body(Body::empty())
    } else {
        builder
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
    };

    response.map_err(|err| AppError::Internal(err.to_string()))
}

/// `DELETE`: remove the stored config. Deleting a missing config is not
/// an error.
pub async fn delete_alerting_config(
    State(state): State<AppState>,
    Path(datasource_id): Path<String>,
) -> Json<Ack> {
    if state.store.write().await.remove(&datasource_id) {
        state.metrics.documents_deleted_total.inc();
        tracing::info!("Deleted alerting config for datasource {}", datasource_id);
    }

    Json(Ack {
        message: "configuration deleted".to_string(),
        backend: None,
    })
}
