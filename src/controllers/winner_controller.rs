use axum::{extract::State, Json};

use crate::{
    error::Result, models::winner::WinnerRecord, services::winner_service::WinnerService, AppState,
};

pub struct WinnerController;

impl WinnerController {
    pub async fn list_winners(State(state): State<AppState>) -> Result<Json<Vec<WinnerRecord>>> {
        let winners = WinnerService::list_winners(&state.db).await?;

        Ok(Json(winners))
    }
}
