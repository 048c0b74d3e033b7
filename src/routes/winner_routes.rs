use axum::{routing::get, Router};

use crate::{controllers::winner_controller::WinnerController, AppState};

pub struct WinnerRoutes;

impl WinnerRoutes {
    pub fn routes() -> Router<AppState> {
        Router::new().route("/", get(WinnerController::list_winners))
    }
}
