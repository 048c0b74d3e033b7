use surrealdb::{engine::any::Any, sql::Thing, Surreal};

use crate::error::{Error, Result};
use crate::models::upload_token::UploadToken;

pub struct AdmissionService;

impl AdmissionService {
    /// Looks up the admission token matching `(owner_email, secret)` exactly,
    /// case-sensitive, no normalization. Performs no mutation: the token is
    /// only flipped by [`AdmissionService::consume`] once the upload it gates
    /// has been persisted.
    pub async fn admit(
        db: &Surreal<Any>,
        owner_email: &str,
        secret: &str,
    ) -> Result<UploadToken> {
        let sql = "SELECT * FROM upload_token \
            WHERE owner_email = $owner_email AND secret = $secret \
            LIMIT 1;";

        let mut response = db
            .query(sql)
            .bind(("owner_email", owner_email.to_string()))
            .bind(("secret", secret.to_string()))
            .await?;

        let token: Option<UploadToken> = response.take(0)?;

        match token {
            None => Err(Error::TokenInvalid),
            Some(token) if token.used => Err(Error::TokenAlreadyUsed),
            Some(token) => Ok(token),
        }
    }

    /// Atomically flips the token from unused to used. The WHERE clause is
    /// the race arbiter: the statement commits as one transaction, so of any
    /// number of concurrent callers exactly one observes `used = false` and
    /// gets the record back; the rest fail with `TokenAlreadyUsed`.
    pub async fn consume(db: &Surreal<Any>, token_id: &Thing) -> Result<UploadToken> {
        let sql = "UPDATE $token_id \
            SET used = true, used_at = time::now() \
            WHERE used = false \
            RETURN AFTER;";

        let mut response = db.query(sql).bind(("token_id", token_id.clone())).await?;

        let consumed: Option<UploadToken> = response.take(0)?;
        consumed.ok_or(Error::TokenAlreadyUsed)
    }
}
