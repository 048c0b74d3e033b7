use chrono::Utc;
use serde::Serialize;
use surrealdb::{engine::any::Any, Surreal};
use surrealdb::sql::Datetime;

use crate::error::{Error, Result};
use crate::models::track::Track;
use crate::services::admission_service::AdmissionService;
use crate::services::blob_service::BlobService;
use crate::services::track_service::TrackService;
use crate::validators::upload_validator::UploadValidator;

/// Upload progress, strictly sequential; logged at each transition.
#[derive(Debug, Clone, Copy, PartialEq, strum_macros::Display)]
pub enum UploadStage {
    #[strum(serialize = "RECEIVED")]
    Received,
    #[strum(serialize = "TOKEN_VALIDATED")]
    TokenValidated,
    #[strum(serialize = "BLOB_STORED")]
    BlobStored,
    #[strum(serialize = "METADATA_PERSISTED")]
    MetadataPersisted,
    #[strum(serialize = "TOKEN_CONSUMED")]
    TokenConsumed,
    #[strum(serialize = "COMPLETE")]
    Complete,
}

#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Default)]
pub struct UploadRequest {
    pub owner_email: String,
    pub secret: String,
    pub artist: String,
    pub title: String,
    pub genre: String,
    pub allow_download: bool,
    pub audio: Option<UploadFile>,
    pub artwork: Option<UploadFile>,
}

#[derive(Debug, Serialize)]
pub struct UploadReceipt {
    pub track_id: String,
    pub title: String,
    pub audio_url: String,
    pub artwork_url: String,
}

pub struct UploadService;

impl UploadService {
    /// Runs one upload through the full admission pipeline. Steps never
    /// overlap: no transition starts before the previous one committed.
    ///
    /// Token consumption happens last, after the metadata insert. Losing the
    /// consumption race to a concurrent upload rolls the insert back, so a
    /// token can never gate two completed uploads. A store failure at that
    /// final step instead leaves the track behind with the token unconsumed;
    /// that state is reported as its own error kind for reconciliation.
    pub async fn finalize_upload(
        db: &Surreal<Any>,
        blobs: &BlobService,
        request: UploadRequest,
    ) -> Result<UploadReceipt> {
        let mut stage = UploadStage::Received;
        tracing::debug!(stage = %stage, title = %request.title, "upload received");

        UploadValidator::validate(&request)?;

        let token = AdmissionService::admit(db, &request.owner_email, &request.secret).await?;
        let token_id = token
            .id
            .ok_or_else(|| Error::DbError("token record without id".to_string()))?;
        stage = UploadStage::TokenValidated;
        tracing::debug!(stage = %stage, owner = %request.owner_email, "upload admitted");

        let audio = request.audio.as_ref().ok_or_else(|| Error::MissingField {
            field: "audio".to_string(),
        })?;
        let audio_url = blobs.store_audio(&audio.file_name, &audio.bytes).await?;

        // Artwork is cosmetic: a failed write degrades to the placeholder
        // instead of failing the upload.
        let artwork_url = match &request.artwork {
            Some(artwork) => match blobs.store_artwork(&artwork.file_name, &artwork.bytes).await {
                Ok(url) => url,
                Err(err) => {
                    tracing::warn!(%err, "artwork write failed, using placeholder");
                    blobs.default_artwork_url()
                }
            },
            None => blobs.default_artwork_url(),
        };
        stage = UploadStage::BlobStored;
        tracing::debug!(stage = %stage, audio_url = %audio_url, "payload stored");

        let track = Track {
            id: None,
            artist: request.artist.trim().to_string(),
            title: request.title.trim().to_string(),
            genre: request.genre.trim().to_lowercase(),
            audio_url: audio_url.clone(),
            preview_url: None,
            artwork_url: artwork_url.clone(),
            owner_email: request.owner_email.clone(),
            allow_download: request.allow_download,
            approved: false,
            play_count: 0,
            vote_count: 0,
            average_rating: 0.0,
            created_at: Datetime::from(Utc::now()),
        };

        let inserted = match TrackService::insert_track(db, track).await {
            Ok(track) => track,
            Err(err) => {
                Self::discard_blobs(blobs, &audio_url, &artwork_url).await;
                return Err(err);
            }
        };
        let track_id = inserted
            .id
            .as_ref()
            .map(|thing| thing.id.to_string())
            .ok_or_else(|| Error::DbError("track record without id".to_string()))?;
        stage = UploadStage::MetadataPersisted;
        tracing::debug!(stage = %stage, track_id = %track_id, "metadata persisted");

        match AdmissionService::consume(db, &token_id).await {
            Ok(_) => {
                stage = UploadStage::TokenConsumed;
                tracing::debug!(stage = %stage, "token consumed");
            }
            Err(Error::TokenAlreadyUsed) => {
                // A concurrent upload on the same token got there first;
                // roll our insert back and report the denial.
                tracing::warn!(
                    track_id = %track_id,
                    "lost token consumption race, rolling upload back"
                );
                if let Err(del_err) = TrackService::delete_track(db, &track_id).await {
                    tracing::error!(%del_err, track_id = %track_id, "rollback delete failed");
                }
                Self::discard_blobs(blobs, &audio_url, &artwork_url).await;
                return Err(Error::TokenAlreadyUsed);
            }
            Err(err) => {
                tracing::error!(
                    stage = %stage,
                    track_id = %track_id,
                    %err,
                    "token consumption failed after metadata commit"
                );
                return Err(Error::PartialUploadFailure {
                    track_id,
                    detail: err.to_string(),
                });
            }
        }

        stage = UploadStage::Complete;
        tracing::info!(stage = %stage, track_id = %track_id, title = %inserted.title, "upload complete");

        Ok(UploadReceipt {
            track_id,
            title: inserted.title,
            audio_url,
            artwork_url,
        })
    }

    /// Cleanup never masks the failure that triggered it.
    async fn discard_blobs(blobs: &BlobService, audio_url: &str, artwork_url: &str) {
        if let Err(err) = blobs.delete_by_url(audio_url).await {
            tracing::warn!(%err, url = audio_url, "audio cleanup failed");
        }
        if let Err(err) = blobs.delete_by_url(artwork_url).await {
            tracing::warn!(%err, url = artwork_url, "artwork cleanup failed");
        }
    }
}
