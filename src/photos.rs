use std::path::Path;

use rand::Rng;

use crate::error::AppError;
use crate::models::{PhotoVerification, VerificationStatus};

pub const MAX_PHOTOS_PER_UPLOAD: usize = 3;
pub const MAX_PHOTO_BYTES: usize = 5 * 1024 * 1024;

/// Accepted content types and the extension stored files get.
const ALLOWED_TYPES: &[(&str, &str)] = &[
    ("image/jpeg", "jpg"),
    ("image/png", "png"),
    ("image/webp", "webp"),
];

/// Fixed confidence reported for a single photo.
const SINGLE_PHOTO_CONFIDENCE: u8 = 75;

/// Resolves a part's content type, guessing from the filename when the
/// client sent none.
pub fn resolve_content_type(content_type: Option<&str>, file_name: Option<&str>) -> Option<String> {
    content_type
        .map(|ct| ct.to_ascii_lowercase())
        .or_else(|| {
            file_name
                .and_then(|name| mime_guess::from_path(name).first())
                .map(|mime| mime.essence_str().to_string())
        })
}

/// Validates one uploaded file and returns the extension to store it under.
pub fn validate_upload(content_type: Option<&str>, size: usize) -> Result<&'static str, AppError> {
    let content_type = content_type
        .ok_or_else(|| AppError::BadRequest("Photo is missing a content type".into()))?;

    let ext = ALLOWED_TYPES
        .iter()
        .find(|(mime, _)| *mime == content_type)
        .map(|(_, ext)| *ext)
        .ok_or_else(|| {
            AppError::BadRequest(format!(
                "Unsupported photo type '{}'. Use JPEG, PNG or WebP",
                content_type
            ))
        })?;

    if size == 0 {
        return Err(AppError::BadRequest("Photo is empty".into()));
    }
    if size > MAX_PHOTO_BYTES {
        return Err(AppError::BadRequest("Photo must be 5MB or smaller".into()));
    }

    Ok(ext)
}

/// Mock identity check over the profile's photos.
///
/// No image is inspected. Two or more photos get a random confidence in
/// `[80, 95)` that is then classified.
pub fn verify<R: Rng>(photo_count: usize, rng: &mut R) -> PhotoVerification {
    match photo_count {
        0 => PhotoVerification {
            status: VerificationStatus::Failed,
            confidence: 0,
            message: "No photos to verify. Upload at least one photo.".into(),
        },
        1 => PhotoVerification {
            status: VerificationStatus::Success,
            confidence: SINGLE_PHOTO_CONFIDENCE,
            message: "Photo looks good. Add more photos to raise your verification confidence.".into(),
        },
        _ => classify(rng.gen_range(80..95)),
    }
}

/// Best-effort removal of stored photos that never made it onto a profile.
pub async fn remove_stored(dir: &Path, filenames: &[String]) {
    for name in filenames {
        if let Err(e) = tokio::fs::remove_file(dir.join(name)).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(file = %name, "Failed to remove orphaned photo: {}", e);
            }
        }
    }
}

fn classify(confidence: u8) -> PhotoVerification {
    let (status, message) = if confidence >= 85 {
        (
            VerificationStatus::Success,
            "Your photos consistently show the same person.",
        )
    } else if confidence >= 70 {
        (
            VerificationStatus::Inconclusive,
            "We couldn't fully confirm your photos match. Try clearer, well-lit shots.",
        )
    } else {
        (
            VerificationStatus::Failed,
            "Your photos don't appear to show the same person.",
        )
    };

    PhotoVerification {
        status,
        confidence,
        message: message.to_string(),
    }
}
