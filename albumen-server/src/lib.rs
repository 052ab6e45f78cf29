//! # Albumen Server
//!
//! HTTP surface for a local photo directory:
//!
//! - `GET /api/photos`: every image with size, dates and capture details
//! - `GET /api/photos/{filename}`: a single file's record
//! - `GET /photos/*`: the image bytes themselves
//!
//! Built on Axum; the listing logic lives in `albumen-core`.

pub mod app_state;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod routes;

pub use app_state::AppState;
pub use routes::create_app;
