use serde::{Deserialize, Serialize};
use surrealdb::sql::{Datetime, Thing};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Track {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Thing>,

    pub artist: String,
    pub title: String,
    pub genre: String,

    // Media
    pub audio_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview_url: Option<String>,
    pub artwork_url: String,

    pub owner_email: String,
    pub allow_download: bool,
    pub approved: bool,

    // Aggregate stats. average_rating is the running arithmetic mean of all
    // scores ever cast; vote_count == 0 implies average_rating == 0.
    pub play_count: u64,
    pub vote_count: u64,
    pub average_rating: f64,

    pub created_at: Datetime,
}

/// Public listing shape for charts and track detail.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TrackSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Thing>,
    pub artist: String,
    pub title: String,
    pub genre: String,
    pub audio_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview_url: Option<String>,
    pub artwork_url: String,
    // no owner email
    pub allow_download: bool,
    pub play_count: u64,
    pub vote_count: u64,
    pub average_rating: f64,
    pub created_at: Datetime,
}
