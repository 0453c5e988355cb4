//! Processing handler
//!
//! Accepts a multipart batch upload and answers with a ZIP of the
//! processed images.

use axum::{
    extract::{Multipart, State},
    http::{header, HeaderName, StatusCode},
    response::{IntoResponse, Response},
};

use crate::domain::entities::{BatchId, StageToggles, UploadedImage};
use crate::error::AppError;
use crate::AppState;

/// Response header carrying the number of images in the archive
pub const PROCESSED_HEADER: &str = "x-images-processed";

/// Response header carrying the number of uploads that failed
pub const FAILED_HEADER: &str = "x-images-failed";

/// Parsed upload form
#[derive(Debug, Default)]
struct UploadForm {
    /// Whether any `images` field was sent, even an empty one
    has_images_field: bool,
    images: Vec<UploadedImage>,
    toggles: StageToggles,
}

/// Read every multipart field. Checkbox fields count by presence alone.
async fn read_upload_form(multipart: &mut Multipart) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "images" => {
                form.has_images_field = true;
                let file_name = field.file_name().map(str::to_string);
                let data = field.bytes().await?;
                form.images.push(UploadedImage {
                    file_name,
                    data: data.to_vec(),
                });
            }
            "resize" => form.toggles.resize = true,
            "remove_background" => form.toggles.remove_background = true,
            "enhance" => form.toggles.enhance = true,
            other => tracing::debug!("Ignoring form field {:?}", other),
        }
    }

    Ok(form)
}

/// POST /process
///
/// Processes uploaded images and returns them as a ZIP attachment.
/// - `images`: one or more files
/// - `resize`, `remove_background`, `enhance`: enable a stage when present
#[tracing::instrument(skip_all, fields(batch_id))]
pub async fn process_images(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    let batch_id = BatchId::new();
    tracing::Span::current().record("batch_id", tracing::field::display(batch_id));

    let form = read_upload_form(&mut multipart).await?;
    if !form.has_images_field {
        return Err(AppError::BadRequest("No files uploaded".to_string()));
    }

    let operations = state.processor.config().operations.with_toggles(form.toggles);
    tracing::info!(
        "Processing {} upload(s) with {:?}",
        form.images.len(),
        operations
    );

    let processor = state.processor.clone();
    let images = form.images;
    let batch = tokio::task::spawn_blocking(move || {
        processor.process_batch(batch_id, images, &operations)
    })
    .await
    .map_err(|e| AppError::Internal(format!("processing task failed: {}", e)))??;

    let headers = [
        (header::CONTENT_TYPE, "application/zip".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", batch.archive_name),
        ),
        (
            HeaderName::from_static(PROCESSED_HEADER),
            batch.processed.to_string(),
        ),
        (
            HeaderName::from_static(FAILED_HEADER),
            batch.failures.len().to_string(),
        ),
    ];

    Ok((StatusCode::OK, headers, batch.archive).into_response())
}
