use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::{controllers::admin_controller::AdminController, AppState};

pub struct AdminRoutes;

impl AdminRoutes {
    pub fn routes() -> Router<AppState> {
        Router::new()
            .route("/tracks", get(AdminController::list_tracks))
            .route("/tracks/{id}", delete(AdminController::delete_track))
            .route("/tracks/{id}/approve", put(AdminController::set_approval))
            .route("/winners/finalize", post(AdminController::finalize_winner))
            .route("/tokens", post(AdminController::issue_token))
    }
}
