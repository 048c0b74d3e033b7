use lazy_regex::regex_is_match;

use crate::error::{Error, Result};
use crate::services::upload_service::UploadRequest;

const MAX_TEXT_LEN: usize = 200;

pub fn validate_email(field: &str, value: &str) -> Result<()> {
    if !regex_is_match!(r"^[^@\s]+@[^@\s]+\.[^@\s]+$", value) {
        return Err(Error::InvalidField {
            field: field.to_string(),
            reason: "not a valid email address".to_string(),
        });
    }
    Ok(())
}

pub struct UploadValidator;

impl UploadValidator {
    /// Shape checks only; no store access. Token matching, extension
    /// allow-lists and duplicate handling happen downstream.
    pub fn validate(request: &UploadRequest) -> Result<()> {
        validate_email("owner_email", &request.owner_email)?;
        require_text("secret", &request.secret)?;
        require_text("artist", &request.artist)?;
        require_text("title", &request.title)?;
        require_text("genre", &request.genre)?;

        let audio = request.audio.as_ref().ok_or_else(|| Error::MissingField {
            field: "audio".to_string(),
        })?;
        if audio.bytes.is_empty() {
            return Err(Error::InvalidField {
                field: "audio".to_string(),
                reason: "empty payload".to_string(),
            });
        }

        if let Some(artwork) = &request.artwork {
            if artwork.bytes.is_empty() {
                return Err(Error::InvalidField {
                    field: "artwork".to_string(),
                    reason: "empty payload".to_string(),
                });
            }
        }

        Ok(())
    }
}

fn require_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::MissingField {
            field: field.to_string(),
        });
    }
    if value.len() > MAX_TEXT_LEN {
        return Err(Error::InvalidField {
            field: field.to_string(),
            reason: format!("longer than {} characters", MAX_TEXT_LEN),
        });
    }
    Ok(())
}
