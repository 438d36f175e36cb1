//! Axum route handlers for resume upload and processing.

use std::io::Write;

use axum::extract::{Multipart, State};
use axum::response::Html;
use axum::Json;
use serde_json::{json, Value};
use tempfile::NamedTempFile;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::extract;
use crate::resume::pipeline::{summarize, Resume};
use crate::resume::render;
use crate::state::AppState;

/// GET /
///
/// Serves the upload form.
pub async fn handle_upload_form() -> Html<&'static str> {
    Html(render::UPLOAD_FORM)
}

/// POST /
///
/// Multipart field `file` with PDF bytes → rendered HTML result page.
pub async fn handle_upload_page(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Html<String>, AppError> {
    let resume = process_upload(&state, multipart).await?;
    Ok(Html(render::result_page(&resume.content)))
}

/// POST /api/v1/resumes
///
/// Same pipeline as the page handler, JSON response for API consumers.
pub async fn handle_upload_json(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<Value>, AppError> {
    let resume = process_upload(&state, multipart).await?;
    Ok(Json(json!({ "resume": resume.content })))
}

/// Full per-request pipeline: read upload, stash it in a scoped temp file,
/// extract page texts, run the generation loop, optionally write the
/// artifact file. The temp file is removed when the guard drops, on success
/// and failure alike.
async fn process_upload(state: &AppState, mut multipart: Multipart) -> Result<Resume, AppError> {
    let bytes = read_file_field(&mut multipart).await?;
    let upload = save_upload(&bytes)?;

    let path = upload.path().to_path_buf();
    let pages = tokio::task::spawn_blocking(move || extract::extract_pages(&path))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("extraction task panicked: {e}")))??;
    info!("extracted {} page(s) from upload", pages.len());

    let resume = summarize(&pages, &state.llm).await?;

    if let Some(artifact) = &state.config.artifact_path {
        // Side artifact only; a write failure must not fail the request.
        if let Err(e) = std::fs::write(artifact, &resume.content) {
            warn!("failed to write artifact {}: {e}", artifact.display());
        }
    }

    Ok(resume)
}

/// Pulls the `file` field out of the multipart body.
async fn read_file_field(multipart: &mut Multipart) -> Result<Vec<u8>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Upload(e.to_string()))?
    {
        if field.name() == Some("file") {
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::Upload(e.to_string()))?;
            return Ok(data.to_vec());
        }
    }
    Err(AppError::Upload("multipart field 'file' is missing".to_string()))
}

/// Validates the PDF magic and writes the upload to a scoped temp file.
fn save_upload(bytes: &[u8]) -> Result<NamedTempFile, AppError> {
    extract::validate_pdf_magic(bytes)?;

    let mut upload = NamedTempFile::new().map_err(|e| AppError::Upload(e.to_string()))?;
    upload
        .write_all(bytes)
        .map_err(|e| AppError::Upload(e.to_string()))?;
    upload
        .flush()
        .map_err(|e| AppError::Upload(e.to_string()))?;
    Ok(upload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::ExtractError;

    #[test]
    fn upload_temp_file_is_removed_on_drop() {
        let upload = save_upload(b"%PDF-1.4 fake body").unwrap();
        let path = upload.path().to_path_buf();
        assert!(path.exists());

        drop(upload);
        assert!(!path.exists());
    }

    #[test]
    fn non_pdf_upload_is_rejected_before_any_file_is_created() {
        let err = save_upload(b"<html>nope</html>").unwrap_err();
        assert!(matches!(err, AppError::Extract(ExtractError::NotAPdf)));
    }
}
