use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;

use crate::{
    error::Result,
    models::track::TrackSummary,
    services::rating_service::{PlayOutcome, RatingService, VoteOutcome},
    services::track_service::TrackService,
    AppState,
};

#[derive(Debug, Deserialize)]
pub struct VoteBody {
    pub score: i64,
}

pub struct TrackController;

impl TrackController {
    pub async fn get_track(
        State(state): State<AppState>,
        Path(track_id): Path<String>,
    ) -> Result<Json<TrackSummary>> {
        let track = TrackService::get_public_track(&state.db, &track_id).await?;

        Ok(Json(track))
    }

    pub async fn vote(
        State(state): State<AppState>,
        Path(track_id): Path<String>,
        Json(body): Json<VoteBody>,
    ) -> Result<Json<VoteOutcome>> {
        let outcome = RatingService::record_vote(&state.db, &track_id, body.score).await?;

        Ok(Json(outcome))
    }

    pub async fn play(
        State(state): State<AppState>,
        Path(track_id): Path<String>,
    ) -> Result<Json<PlayOutcome>> {
        let outcome = RatingService::record_play(&state.db, &track_id).await?;

        Ok(Json(outcome))
    }
}
