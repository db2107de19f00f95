use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use rust_embed::Embed;

use crate::state::AppState;

#[derive(Embed)]
#[folder = "assets/"]
struct Assets;

fn file_response(path: &str, body: Vec<u8>, cache: &str) -> Response {
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, mime.as_ref().to_string()),
            (header::CACHE_CONTROL, cache.to_string()),
        ],
        body,
    )
        .into_response()
}

/// GET /assets/{*path}: stylesheet, script and images compiled into the binary
pub async fn serve(Path(path): Path<String>) -> Response {
    match Assets::get(&path) {
        Some(file) => file_response(&path, file.data.to_vec(), "public, max-age=86400"),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// GET /uploads/{*path}: images stored by the admin dashboard
pub async fn serve_upload(State(state): State<AppState>, Path(path): Path<String>) -> Response {
    let Some(file_path) = state.blobs.resolve(&path) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    match tokio::fs::read(&file_path).await {
        Ok(bytes) => file_response(&path, bytes, "public, max-age=31536000, immutable"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => StatusCode::NOT_FOUND.into_response(),
        Err(e) => {
            tracing::error!("Failed to read upload {}: {}", path, e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
