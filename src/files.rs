//! Uploaded-file storage. Files land on local disk under the configured
//! upload path and are served back through the file server domain, so the
//! stored path and the public URL differ only in their prefix.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use axum::extract::multipart::{Field, Multipart};
use chrono::Utc;
use tokio::fs;
use uuid::Uuid;

use crate::config::config;
use crate::error::ApiError;

/// A file pulled out of a multipart request, held in memory until the
/// surrounding handler decides the request is otherwise valid.
pub struct UploadedFile {
    pub field_name: String,
    pub original_name: String,
    pub bytes: Vec<u8>,
}

/// Text fields plus any file parts from a multipart form. Handlers that mix
/// form fields with uploads read the whole form up front so validation can
/// run before anything touches disk.
pub struct MultipartForm {
    pub fields: HashMap<String, String>,
    pub files: Vec<UploadedFile>,
}

impl MultipartForm {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(|s| s.trim()).filter(|s| !s.is_empty())
    }
}

pub async fn read_form(mut multipart: Multipart) -> Result<MultipartForm, ApiError> {
    let mut fields = HashMap::new();
    let mut files = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ApiError::bad_request(err.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if field.file_name().is_some() {
            files.push(read_file_field(name, field).await?);
        } else {
            let value = field
                .text()
                .await
                .map_err(|err| ApiError::bad_request(err.body_text()))?;
            fields.insert(name, value);
        }
    }
    Ok(MultipartForm { fields, files })
}

async fn read_file_field(field_name: String, field: Field<'_>) -> Result<UploadedFile, ApiError> {
    let original_name = field.file_name().unwrap_or_default().to_string();
    let bytes = field
        .bytes()
        .await
        .map_err(|err| ApiError::bad_request(err.body_text()))?
        .to_vec();
    Ok(UploadedFile {
        field_name,
        original_name,
        bytes,
    })
}

/// Where a stored file ended up: its disk path and the URL it is served from.
pub struct StoredFile {
    pub file_name: String,
    pub path: String,
    pub url: String,
}

/// Writes a file under `<upload_path>/<subdir>/` with a collision-proof name.
pub async fn store(file: &UploadedFile, subdir: &str) -> Result<StoredFile, ApiError> {
    let cfg = config();
    let file_name = unique_name(&file.field_name, &file.original_name);
    let dir = Path::new(&cfg.files.upload_path).join(subdir);
    fs::create_dir_all(&dir).await.map_err(|err| {
        tracing::error!("failed to create upload directory: {err}");
        ApiError::internal("Something went wrong")
    })?;
    let path = dir.join(&file_name);
    fs::write(&path, &file.bytes).await.map_err(|err| {
        tracing::error!("failed to store uploaded file: {err}");
        ApiError::internal("Something went wrong")
    })?;
    Ok(StoredFile {
        url: format!(
            "{}/{}/{}",
            cfg.files.file_server_domain.trim_end_matches('/'),
            subdir,
            file_name
        ),
        path: path.to_string_lossy().into_owned(),
        file_name,
    })
}

/// Best-effort unlink; a missing or locked file is logged, never surfaced.
pub async fn remove_quietly(path: &str) {
    if let Err(err) = fs::remove_file(path).await {
        tracing::warn!("failed to remove stored file {path}: {err}");
    }
}

/// Local disk path behind a stored file URL, for records that only keep the
/// URL (land-owner national IDs).
pub fn path_for_url(url: &str) -> Option<PathBuf> {
    let cfg = config();
    let suffix = url.strip_prefix(cfg.files.file_server_domain.trim_end_matches('/'))?;
    Some(Path::new(&cfg.files.upload_path).join(suffix.trim_start_matches('/')))
}

fn unique_name(field_name: &str, original_name: &str) -> String {
    let ext = Path::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{e}"))
        .unwrap_or_default();
    format!(
        "{}-{}-{}{}",
        field_name,
        Utc::now().timestamp_millis(),
        Uuid::new_v4(),
        ext
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_name_keeps_extension() {
        let name = unique_name("deed", "parcel map.pdf");
        assert!(name.starts_with("deed-"));
        assert!(name.ends_with(".pdf"));
    }

    #[test]
    fn unique_name_without_extension() {
        let name = unique_name("photo", "snapshot");
        assert!(!name.contains('.'));
    }
}
