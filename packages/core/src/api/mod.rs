//! HTTP surface: alerting config routes, health and metrics.

pub mod alertmanager;
pub mod headers;
pub mod health;

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{DefaultBodyLimit, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::Response,
    routing::get,
    Router,
};
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;

use crate::error::AppError;
use crate::metrics::AppMetrics;
use crate::store::ConfigStore;

/// Shared state for all routes.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<ConfigStore>>,
    pub metrics: Arc<AppMetrics>,
}

impl AppState {
    pub fn new(metrics: Arc<AppMetrics>) -> Self {
        Self {
            store: Arc::new(RwLock::new(ConfigStore::new())),
            metrics,
        }
    }
}

/// Assemble the full router.
pub fn router(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/metrics", get(render_metrics))
        .route(
            alertmanager::CONFIG_PATH,
            get(alertmanager::get_alerting_config)
                .post(alertmanager::post_alerting_config)
                .delete(alertmanager::delete_alerting_config),
        )
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(middleware::from_fn_with_state(
            state.metrics.clone(),
            track_requests,
        ))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn render_metrics(State(state): State<AppState>) -> Result<Response, AppError> {
    let body = state
        .metrics
        .render()
        .map_err(|err| AppError::Internal(err.to_string()))?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/plain; version=0.0.4")
        .body(Body::from(body))
        .map_err(|err| AppError::Internal(err.to_string()))
}

async fn track_requests(
    State(metrics): State<Arc<AppMetrics>>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().to_string();
    let response = next.run(request).await;

    metrics
        .http_requests_total
        .with_label_values(&[method.as_str(), response.status().as_str()])
        .inc();

    response
}
