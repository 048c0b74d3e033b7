use axum::{
    extract::{Query, State},
    Json,
};

use crate::{
    error::Result,
    models::pagination::{ChartsQuery, PaginatedResponse},
    models::track::TrackSummary,
    services::chart_service::ChartService,
    AppState,
};

pub struct ChartController;

impl ChartController {
    pub async fn list_charts(
        State(state): State<AppState>,
        Query(query): Query<ChartsQuery>,
    ) -> Result<Json<PaginatedResponse<TrackSummary>>> {
        let page = ChartService::list_charts(&state.db, &query).await?;

        Ok(Json(page))
    }
}
