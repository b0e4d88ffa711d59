use std::path::{Path, PathBuf};

use axum::extract::multipart::Field;
use axum::extract::Multipart;
use chrono::Utc;
use rand::Rng;

use crate::data_formats::ArticleForm;
use crate::errors::RequestError;

/// Upload directory, `UPLOAD_DIR` env override with a local default.
pub fn upload_dir() -> PathBuf {
    std::env::var("UPLOAD_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("uploads"))
}

/// Drain the multipart body of a create/update request into an
/// `ArticleForm`. The `image` field, when present, is written to the upload
/// directory while parsing; only its `/uploads/...` reference travels on.
/// Unknown fields are ignored.
pub async fn parse_article_form(mut multipart: Multipart) -> Result<ArticleForm, RequestError> {
    let mut form = ArticleForm::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| RequestError::BadRequest("Malformed multipart body"))?
    {
        let name = field.name().map(|name| name.to_string());
        match name.as_deref() {
            Some("title") => form.title = Some(field_text(field).await?),
            Some("content") => form.content = Some(field_text(field).await?),
            Some("tags") => form.tags = Some(field_text(field).await?),
            Some("status") => form.status = Some(field_text(field).await?),
            Some("image") => form.image_url = Some(store_image(field).await?),
            _ => {}
        }
    }
    Ok(form)
}

async fn field_text(field: Field<'_>) -> Result<String, RequestError> {
    field
        .text()
        .await
        .map_err(|_| RequestError::BadRequest("Malformed multipart body"))
}

async fn store_image(field: Field<'_>) -> Result<String, RequestError> {
    let filename = upload_filename(field.file_name());
    let data = field
        .bytes()
        .await
        .map_err(|_| RequestError::BadRequest("Malformed multipart body"))?;

    let dir = upload_dir();
    tokio::fs::create_dir_all(&dir).await.map_err(|e| {
        tracing::error!("failed to create upload dir {}: {}", dir.display(), e);
        RequestError::ServerError
    })?;
    let path = dir.join(&filename);
    tokio::fs::write(&path, &data).await.map_err(|e| {
        tracing::error!("failed to store upload {}: {}", path.display(), e);
        RequestError::ServerError
    })?;

    Ok(format!("/uploads/{}", filename))
}

/// `<unix-millis>-<random below 10^9>` plus the original extension, so two
/// uploads in the same request window cannot collide.
fn upload_filename(original_name: Option<&str>) -> String {
    let extension = original_name
        .and_then(|name| Path::new(name).extension())
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();
    let suffix = rand::thread_rng().gen_range(0..1_000_000_000u32);
    format!("{}-{}{}", Utc::now().timestamp_millis(), suffix, extension)
}

/// Best-effort removal of a stored upload. Only the basename of the URL is
/// used, so a mangled reference cannot point outside the upload directory.
/// A missing file is not an error.
pub async fn remove_upload_file(dir: &Path, file_url: &str) {
    let name = match Path::new(file_url).file_name() {
        Some(name) => name.to_owned(),
        None => return,
    };
    let path = dir.join(name);
    if let Err(e) = tokio::fs::remove_file(&path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!("failed to remove upload {}: {}", path.display(), e);
        }
    }
}
