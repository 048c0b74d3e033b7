use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Clone, Debug, Serialize, strum_macros::AsRefStr)]
#[serde(tag = "type", content = "data")]
pub enum Error {
    // -- Request validation.
    MissingField { field: String },
    InvalidField { field: String, reason: String },
    InvalidScore { score: i64 },

    // -- Admission.
    TokenInvalid,
    TokenAlreadyUsed,
    AdminAuthFail,

    // -- Lookups.
    TrackNotFound { id: String },
    NoEligibleTracks,

    // -- Upload finalization. Track row committed but the token was not
    // consumed; needs operator reconciliation.
    PartialUploadFailure { track_id: String, detail: String },

    // -- Backends.
    IoError(String),
    DbError(String),
    MailError(String),
    ConfigError(String),
}

impl core::fmt::Display for Error {
    fn fmt(&self, fmt: &mut core::fmt::Formatter) -> core::result::Result<(), core::fmt::Error> {
        write!(fmt, "{self:?}")
    }
}

impl std::error::Error for Error {}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status_code, client_error) = self.client_status_and_error();

        let response_body = serde_json::json!({
            "error": client_error.as_ref(),
        });

        (status_code, Json(response_body)).into_response()
    }
}

impl Error {
    pub fn client_status_and_error(&self) -> (StatusCode, ClientError) {
        match self {
            Self::MissingField { .. } | Self::InvalidField { .. } | Self::InvalidScore { .. } => {
                (StatusCode::BAD_REQUEST, ClientError::INVALID_PARAMS)
            }

            Self::TokenInvalid => (StatusCode::UNAUTHORIZED, ClientError::TOKEN_INVALID),
            Self::TokenAlreadyUsed => (StatusCode::UNAUTHORIZED, ClientError::TOKEN_ALREADY_USED),
            Self::AdminAuthFail => (StatusCode::FORBIDDEN, ClientError::NO_AUTH),

            Self::TrackNotFound { .. } | Self::NoEligibleTracks => {
                (StatusCode::NOT_FOUND, ClientError::RESOURCE_NOT_FOUND)
            }

            Self::PartialUploadFailure { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ClientError::UPLOAD_INCOMPLETE,
            ),

            Self::IoError(_) | Self::DbError(_) | Self::MailError(_) | Self::ConfigError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ClientError::SERVICE_ERROR,
            ),
        }
    }
}

#[derive(Debug, strum_macros::AsRefStr)]
#[allow(non_camel_case_types)]
pub enum ClientError {
    INVALID_PARAMS,
    TOKEN_INVALID,
    TOKEN_ALREADY_USED,
    NO_AUTH,
    RESOURCE_NOT_FOUND,
    UPLOAD_INCOMPLETE,
    SERVICE_ERROR,
}

impl From<surrealdb::Error> for Error {
    fn from(err: surrealdb::Error) -> Self {
        Error::DbError(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IoError(err.to_string())
    }
}

impl From<std::env::VarError> for Error {
    fn from(err: std::env::VarError) -> Self {
        Error::ConfigError(err.to_string())
    }
}
