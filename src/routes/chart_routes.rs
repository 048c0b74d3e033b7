use axum::{routing::get, Router};

use crate::{controllers::chart_controller::ChartController, AppState};

pub struct ChartRoutes;

impl ChartRoutes {
    pub fn routes() -> Router<AppState> {
        Router::new().route("/", get(ChartController::list_charts))
    }
}
