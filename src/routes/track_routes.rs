use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::{
    controllers::{track_controller::TrackController, upload_controller::UploadController},
    AppState,
};

/// Upper bound on one multipart upload (audio + artwork).
const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

pub struct TrackRoutes;

impl TrackRoutes {
    pub fn routes() -> Router<AppState> {
        Router::new()
            .route("/upload", post(UploadController::upload_track))
            .route("/{id}", get(TrackController::get_track))
            .route("/{id}/vote", post(TrackController::vote))
            .route("/{id}/play", post(TrackController::play))
            .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
    }
}
