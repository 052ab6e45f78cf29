use axum::{
    Router,
    http::{HeaderValue, Method},
    routing::get,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::warn;

use crate::{
    AppState,
    config::Config,
    handlers::{get_photo_handler, health_handler, list_photos_handler, ping_handler},
};

pub const PHOTOS_API: &str = "/api/photos";
pub const PHOTO_API: &str = "/api/photos/{filename}";

/// Build the full application router: JSON API, static photo files, and
/// the tracing/CORS middleware.
pub fn create_app(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.config().photos_dir);
    let url_prefix = state.catalog.config().url_prefix.trim_end_matches('/').to_string();

    let middleware = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(state.config()));

    Router::new()
        .route("/ping", get(ping_handler))
        .route("/health", get(health_handler))
        .route(PHOTOS_API, get(list_photos_handler))
        .route(PHOTO_API, get(get_photo_handler))
        .nest_service(&url_prefix, static_files)
        .layer(middleware)
        .with_state(state)
}

/// Permissive in dev mode or when no origins are configured, allow-list
/// otherwise.
fn cors_layer(config: &Config) -> CorsLayer {
    if config.dev_mode || config.cors_allowed_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .cors_allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::HEAD, Method::OPTIONS])
        .allow_headers(Any)
}
