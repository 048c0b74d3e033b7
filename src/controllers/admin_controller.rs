use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::{
    error::Result,
    models::pagination::{ChartsQuery, PaginatedResponse},
    models::track::Track,
    models::upload_token::UploadToken,
    models::winner::WinnerRecord,
    services::token_service::TokenService,
    services::track_service::TrackService,
    services::winner_service::WinnerService,
    AppState,
};

#[derive(Debug, Deserialize, Default)]
pub struct FinalizeWinnerBody {
    pub period: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ApprovalBody {
    pub approved: bool,
}

#[derive(Debug, Deserialize)]
pub struct IssueTokenBody {
    pub owner_email: String,
}

pub struct AdminController;

impl AdminController {
    pub async fn finalize_winner(
        State(state): State<AppState>,
        body: Option<Json<FinalizeWinnerBody>>,
    ) -> Result<(StatusCode, Json<WinnerRecord>)> {
        let period = body.and_then(|Json(body)| body.period);

        let record = WinnerService::finalize(&state.db, period).await?;

        Ok((StatusCode::CREATED, Json(record)))
    }

    pub async fn list_tracks(
        State(state): State<AppState>,
        Query(query): Query<ChartsQuery>,
    ) -> Result<Json<PaginatedResponse<Track>>> {
        let page = TrackService::list_all(&state.db, &query).await?;

        Ok(Json(page))
    }

    /// Removes the record and releases the blobs it owned. Blob cleanup is
    /// logged but never turns a completed delete into a failure.
    pub async fn delete_track(
        State(state): State<AppState>,
        Path(track_id): Path<String>,
    ) -> Result<Json<Track>> {
        let deleted = TrackService::delete_track(&state.db, &track_id).await?;

        if let Err(err) = state.blobs.delete_by_url(&deleted.audio_url).await {
            tracing::warn!(%err, track_id = %track_id, "audio blob release failed");
        }
        if let Err(err) = state.blobs.delete_by_url(&deleted.artwork_url).await {
            tracing::warn!(%err, track_id = %track_id, "artwork blob release failed");
        }

        Ok(Json(deleted))
    }

    pub async fn set_approval(
        State(state): State<AppState>,
        Path(track_id): Path<String>,
        Json(body): Json<ApprovalBody>,
    ) -> Result<Json<Track>> {
        let updated = TrackService::set_approved(&state.db, &track_id, body.approved).await?;

        Ok(Json(updated))
    }

    /// Creates a token and hands the secret back to the issuing admin; the
    /// owner is additionally notified by email when SMTP is configured.
    /// Dispatch is fire-and-forget: a mail failure is logged, issuance
    /// already succeeded.
    pub async fn issue_token(
        State(state): State<AppState>,
        Json(body): Json<IssueTokenBody>,
    ) -> Result<(StatusCode, Json<UploadToken>)> {
        let token = TokenService::issue(&state.db, &body.owner_email).await?;

        if let Some(mailer) = state.mailer.clone() {
            let to_email = token.owner_email.clone();
            let secret = token.secret.clone();
            tokio::spawn(async move {
                if let Err(err) = mailer.send_upload_token(&to_email, &secret).await {
                    tracing::error!(%err, to = %to_email, "token email dispatch failed");
                }
            });
        }

        Ok((StatusCode::CREATED, Json(token)))
    }
}
