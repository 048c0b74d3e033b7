use chrono::Utc;
use surrealdb::{engine::any::Any, Surreal};
use surrealdb::sql::Datetime;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::upload_token::UploadToken;
use crate::validators::upload_validator::validate_email;

pub struct TokenService;

impl TokenService {
    /// Creates one unused admission token for the given artist identity. The
    /// secret is generated here and only ever travels to the owner (response
    /// to the issuing admin, plus the notification email).
    pub async fn issue(db: &Surreal<Any>, owner_email: &str) -> Result<UploadToken> {
        validate_email("owner_email", owner_email)?;

        let token = UploadToken {
            id: None,
            owner_email: owner_email.to_string(),
            secret: generate_secret(),
            used: false,
            created_at: Datetime::from(Utc::now()),
            used_at: None,
        };

        let created: Option<UploadToken> = db.create("upload_token").content(token).await?;
        created.ok_or_else(|| Error::DbError("token insert returned nothing".to_string()))
    }
}

fn generate_secret() -> String {
    Uuid::new_v4().simple().to_string().to_uppercase()
}
