use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::{Error, Result},
    services::upload_service::{UploadFile, UploadReceipt, UploadRequest, UploadService},
    AppState,
};

pub struct UploadController;

impl UploadController {
    pub async fn upload_track(
        State(state): State<AppState>,
        multipart: Multipart,
    ) -> Result<(StatusCode, Json<UploadReceipt>)> {
        let request = parse_multipart(multipart).await?;

        let receipt = UploadService::finalize_upload(&state.db, &state.blobs, request).await?;

        Ok((StatusCode::CREATED, Json(receipt)))
    }
}

async fn parse_multipart(mut multipart: Multipart) -> Result<UploadRequest> {
    let mut request = UploadRequest::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        match name.as_str() {
            "owner_email" => request.owner_email = text_field(field).await?,
            "secret" => request.secret = text_field(field).await?,
            "artist" => request.artist = text_field(field).await?,
            "title" => request.title = text_field(field).await?,
            "genre" => request.genre = text_field(field).await?,
            "allow_download" => {
                let value = text_field(field).await?;
                request.allow_download = matches!(value.as_str(), "true" | "1" | "on");
            }
            "audio" => request.audio = Some(file_field(field).await?),
            "artwork" => request.artwork = Some(file_field(field).await?),
            _ => {
                // Unknown parts are skipped, not rejected.
                field.bytes().await.map_err(multipart_error)?;
            }
        }
    }

    Ok(request)
}

async fn text_field(field: axum::extract::multipart::Field<'_>) -> Result<String> {
    field.text().await.map_err(multipart_error)
}

async fn file_field(field: axum::extract::multipart::Field<'_>) -> Result<UploadFile> {
    let file_name = field.file_name().unwrap_or_default().to_string();
    let bytes = field.bytes().await.map_err(multipart_error)?;
    Ok(UploadFile {
        file_name,
        bytes: bytes.to_vec(),
    })
}

fn multipart_error(err: axum::extract::multipart::MultipartError) -> Error {
    Error::InvalidField {
        field: "multipart".to_string(),
        reason: err.to_string(),
    }
}
