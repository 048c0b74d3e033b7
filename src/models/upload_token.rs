use serde::{Deserialize, Serialize};
use surrealdb::sql::{Datetime, Thing};

/// Single-use admission token. Valid only while `used == false` and both
/// `owner_email` and `secret` match exactly. Flipped to `used == true` once,
/// at the moment it gates an upload; kept forever as an audit trail.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UploadToken {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Thing>,

    pub owner_email: String,
    pub secret: String,
    pub used: bool,

    pub created_at: Datetime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub used_at: Option<Datetime>,
}
