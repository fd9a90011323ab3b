use axum::extract::multipart::MultipartRejection;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::models::PhotoVerification;
use crate::photos::{self, MAX_PHOTOS_PER_UPLOAD, MAX_PHOTO_BYTES};
use crate::state::AppState;

/// Multipart field that carries the photos.
const PHOTO_FIELD: &str = "photos";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub filenames: Vec<String>,
    pub verification: PhotoVerification,
}

struct PendingPhoto {
    filename: String,
    data: axum::body::Bytes,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/photos",
            post(upload).layer(DefaultBodyLimit::max(
                MAX_PHOTOS_PER_UPLOAD * MAX_PHOTO_BYTES + 64 * 1024,
            )),
        )
        .route("/api/photos/verification", get(verification))
}

async fn upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<UploadResponse>> {
    let mut multipart = multipart?;
    if state.store.lock().await.profile().is_none() {
        return Err(AppError::NotFound("Create a profile before uploading photos".into()));
    }

    // Validate every part before anything touches disk
    let mut pending = Vec::new();
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(PHOTO_FIELD) {
            continue;
        }
        if pending.len() == MAX_PHOTOS_PER_UPLOAD {
            return Err(AppError::BadRequest(format!(
                "Upload at most {} photos at a time",
                MAX_PHOTOS_PER_UPLOAD
            )));
        }

        let content_type = photos::resolve_content_type(field.content_type(), field.file_name());
        let data = field.bytes().await?;
        let ext = photos::validate_upload(content_type.as_deref(), data.len())?;
        pending.push(PendingPhoto {
            filename: format!("{}.{}", uuid::Uuid::now_v7(), ext),
            data,
        });
    }

    let uploads = state.config.uploads_path();
    tokio::fs::create_dir_all(&uploads).await?;
    let filenames: Vec<String> = pending.iter().map(|p| p.filename.clone()).collect();
    for photo in &pending {
        if let Err(e) = tokio::fs::write(uploads.join(&photo.filename), &photo.data).await {
            photos::remove_stored(&uploads, &filenames).await;
            return Err(e.into());
        }
    }

    let photo_count = state
        .store
        .lock()
        .await
        .add_photos(&filenames)
        .map(<[String]>::len);
    let Some(photo_count) = photo_count else {
        photos::remove_stored(&uploads, &filenames).await;
        return Err(AppError::NotFound("Profile was removed during upload".into()));
    };

    // Verification covers this upload only; the GET endpoint covers them all
    let verification = photos::verify(filenames.len(), &mut StdRng::from_entropy());
    tracing::info!(
        uploaded = filenames.len(),
        total = photo_count,
        status = ?verification.status,
        "Photos uploaded"
    );

    Ok(Json(UploadResponse {
        filenames,
        verification,
    }))
}

async fn verification(State(state): State<AppState>) -> AppResult<Json<PhotoVerification>> {
    let store = state.store.lock().await;
    let profile = store
        .profile()
        .ok_or_else(|| AppError::NotFound("No profile created yet".into()))?;
    if profile.photos.is_empty() {
        return Err(AppError::NotFound("No photos uploaded yet".into()));
    }

    Ok(Json(photos::verify(
        profile.photos.len(),
        &mut StdRng::from_entropy(),
    )))
}
