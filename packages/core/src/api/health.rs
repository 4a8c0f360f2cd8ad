use axum::{
    http::{header, HeaderValue},
    response::IntoResponse,
};

pub async fn health() -> impl IntoResponse {
    (
        [(header::CACHE_CONTROL, HeaderValue::from_static("no-store"))],
        "ok",
    )
}
