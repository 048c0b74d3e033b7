use serde::{Deserialize, Serialize};
use surrealdb::sql::{Datetime, Thing};

/// One appended row per winner finalization. The track fields are a
/// denormalized snapshot taken at selection time; the winner table never
/// mutates the track itself.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct WinnerRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Thing>,

    /// Calendar month, "YYYY-MM".
    pub period: String,
    pub track_id: Thing,

    pub artist: String,
    pub title: String,
    pub genre: String,
    pub composite_score: f64,

    pub selected_at: Datetime,
}
