use surrealdb::{engine::any::Any, Surreal};

use crate::error::{Error, Result};
use crate::helpers::thing_helpers::create_track_thing;
use crate::models::pagination::{ChartsQuery, PaginatedResponse, PaginationInfo};
use crate::models::track::{Track, TrackSummary};

pub struct TrackService;

impl TrackService {
    pub async fn insert_track(db: &Surreal<Any>, track: Track) -> Result<Track> {
        let created: Option<Track> = db.create("track").content(track).await?;
        created.ok_or_else(|| Error::DbError("track insert returned nothing".to_string()))
    }

    /// Public detail view: only approved tracks resolve.
    pub async fn get_public_track(db: &Surreal<Any>, track_id: &str) -> Result<TrackSummary> {
        let track_thing = create_track_thing(track_id);

        let mut response = db
            .query("SELECT * FROM track WHERE id = $track_id AND approved = true;")
            .bind(("track_id", track_thing))
            .await?;

        let track: Option<TrackSummary> = response.take(0)?;
        track.ok_or(Error::TrackNotFound {
            id: track_id.to_string(),
        })
    }

    /// Administrative listing: every track, unapproved included, newest
    /// first.
    pub async fn list_all(
        db: &Surreal<Any>,
        query: &ChartsQuery,
    ) -> Result<PaginatedResponse<Track>> {
        let offset = query.offset();
        let limit = query.limit();

        let mut response = db
            .query(
                "SELECT * FROM track ORDER BY created_at DESC, id ASC \
                    LIMIT $limit START $offset;",
            )
            .bind(("limit", limit))
            .bind(("offset", offset))
            .await?;
        let tracks: Vec<Track> = response.take(0)?;

        let mut count_response = db
            .query("SELECT count() AS total FROM track GROUP ALL;")
            .await?;

        #[derive(serde::Deserialize)]
        struct CountRow {
            total: u64,
        }
        let count_row: Option<CountRow> = count_response.take(0)?;
        let total_items = count_row.map(|row| row.total).unwrap_or(0);

        Ok(PaginatedResponse {
            pagination: PaginationInfo {
                offset,
                limit,
                total_items,
                has_more: offset + tracks.len() as u64 < total_items,
            },
            data: tracks,
        })
    }

    /// Deletes the record and hands back its final state so the caller can
    /// release the blobs it pointed at.
    pub async fn delete_track(db: &Surreal<Any>, track_id: &str) -> Result<Track> {
        let track_thing = create_track_thing(track_id);

        let mut response = db
            .query("DELETE $track_id RETURN BEFORE;")
            .bind(("track_id", track_thing))
            .await?;

        let deleted: Option<Track> = response.take(0)?;
        deleted.ok_or(Error::TrackNotFound {
            id: track_id.to_string(),
        })
    }

    pub async fn set_approved(db: &Surreal<Any>, track_id: &str, approved: bool) -> Result<Track> {
        let track_thing = create_track_thing(track_id);

        let mut response = db
            .query("UPDATE $track_id SET approved = $approved RETURN AFTER;")
            .bind(("track_id", track_thing))
            .bind(("approved", approved))
            .await?;

        let updated: Option<Track> = response.take(0)?;
        updated.ok_or(Error::TrackNotFound {
            id: track_id.to_string(),
        })
    }
}
