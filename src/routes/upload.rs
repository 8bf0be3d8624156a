use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use bytes::{Bytes, BytesMut};

use crate::{
    dto::upload_dto::{ImageSetResponse, RandomSetResponse, UploadResponse},
    error::{Error, Result},
    middleware::auth::AdminUser,
    services::extraction_service::admit_content_type,
    AppState,
};

const UPLOAD_FIELD: &str = "ppt";

/// Human-readable upload limit: whole MB, else KB, else bytes.
fn describe_size(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = 1024 * KB;
    if bytes >= MB {
        format!("{}MB", bytes / MB)
    } else if bytes >= KB {
        format!("{}KB", bytes / KB)
    } else {
        format!("{} bytes", bytes)
    }
}

#[axum::debug_handler]
pub async fn upload_ppt(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    mut multipart: Multipart,
) -> Result<impl IntoResponse> {
    let max_bytes = state.config.max_upload_bytes;
    let mut upload: Option<(String, Bytes)> = None;

    while let Some(mut field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        admit_content_type(field.content_type()).map_err(|e| {
            tracing::warn!(content_type = ?field.content_type(), "rejected upload with a non-presentation type");
            e
        })?;

        let file_name = field.file_name().unwrap_or("presentation.pptx").to_string();
        let mut data = BytesMut::new();
        while let Some(chunk) = field.chunk().await? {
            if data.len() + chunk.len() > max_bytes {
                return Err(Error::BadRequest(format!(
                    "File size too large. Maximum size is {}.",
                    describe_size(max_bytes)
                )));
            }
            data.extend_from_slice(&chunk);
        }
        upload = Some((file_name, data.freeze()));
        break;
    }

    let Some((file_name, data)) = upload.filter(|(_, data)| !data.is_empty()) else {
        return Err(Error::BadRequest("No file uploaded".to_string()));
    };

    tracing::info!(admin_id = admin.id, file = %file_name, bytes = data.len(), "presentation upload accepted");
    let set = state
        .image_set_service
        .ingest_presentation(&file_name, data)
        .await?;

    Ok((StatusCode::CREATED, Json(UploadResponse::from(set))))
}

#[axum::debug_handler]
pub async fn random_set(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let set = state.image_set_service.random_set().await?;
    Ok(Json(RandomSetResponse::from(set)))
}

#[axum::debug_handler]
pub async fn list_sets(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let sets = state.image_set_service.list_sets().await?;
    Ok(Json(
        sets.into_iter()
            .map(ImageSetResponse::from)
            .collect::<Vec<_>>(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_limit_is_never_reported_as_zero() {
        assert_eq!(describe_size(10 * 1024 * 1024), "10MB");
        assert_eq!(describe_size(512 * 1024), "512KB");
        assert_eq!(describe_size(300), "300 bytes");
    }
}
