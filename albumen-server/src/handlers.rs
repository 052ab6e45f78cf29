use std::sync::Arc;

use albumen_core::PhotoRecord;
use axum::{
    extract::State,
    http::{StatusCode, Uri},
    response::{IntoResponse, Json, Response},
};
use serde_json::{Value, json};
use tracing::{debug, info};

use crate::{
    AppState,
    errors::{AppError, AppResult},
};

/// `GET /api/photos`
///
/// The directory scan is blocking, so it runs on the blocking pool.
pub async fn list_photos_handler(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<PhotoRecord>>> {
    let catalog = Arc::clone(&state.catalog);
    let photos = tokio::task::spawn_blocking(move || catalog.list()).await??;

    info!("Listed {} photos", photos.len());
    Ok(Json(photos))
}

/// `GET /api/photos/{filename}`
///
/// The filename is the last segment of the request path, still
/// percent-encoded; the catalog performs the single decoding pass. Axum's
/// path extractors would decode it first and answer non UTF-8 segments
/// with a plain-text 400.
pub async fn get_photo_handler(
    State(state): State<AppState>,
    uri: Uri,
) -> AppResult<Json<PhotoRecord>> {
    let filename = uri
        .path()
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .ok_or_else(|| AppError::not_found("Photo not found"))?;

    debug!("Photo lookup for {}", filename);

    let catalog = Arc::clone(&state.catalog);
    let photo = tokio::task::spawn_blocking(move || catalog.lookup(&filename)).await??;

    Ok(Json(photo))
}

pub async fn ping_handler() -> Json<Value> {
    info!("Ping endpoint called");
    Json(json!({
        "status": "ok",
        "message": "Albumen photo server is running",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

pub async fn health_handler(State(state): State<AppState>) -> Response {
    let photos_dir = &state.config().photos_dir;
    let available = photos_dir.is_dir();

    let body = json!({
        "status": if available { "healthy" } else { "unhealthy" },
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "checks": {
            "photos_dir": {
                "status": if available { "healthy" } else { "unhealthy" },
                "path": photos_dir.display().to_string(),
            }
        }
    });

    let status = if available {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(body)).into_response()
}
