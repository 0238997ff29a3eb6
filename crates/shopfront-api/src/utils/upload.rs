//! Common utilities for file upload handlers

use axum::extract::Multipart;
use shopfront_core::{AppError, UploadLimits};

/// A validated image ready to be staged
#[derive(Debug)]
pub struct UploadedFile {
    pub data: Vec<u8>,
    pub filename: String,
    pub content_type: String,
    /// Lowercase extension taken from the filename
    pub extension: String,
}

/// Extract file data, filename, and content type from multipart form.
/// Only one field named "file" is accepted; multiple file fields are rejected.
pub async fn extract_multipart_file(
    mut multipart: Multipart,
) -> Result<(Vec<u8>, String, String), AppError> {
    let mut file_data: Option<Vec<u8>> = None;
    let mut filename: Option<String> = None;
    let mut content_type: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Failed to read multipart: {}", e)))?
    {
        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();

        if field_name == "file" {
            if file_data.is_some() {
                return Err(AppError::InvalidInput(
                    "Multiple file fields are not allowed; send exactly one field named 'file'"
                        .to_string(),
                ));
            }
            filename = field.file_name().map(|s: &str| s.to_string());
            content_type = field.content_type().map(|s: &str| s.to_string());

            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::InvalidInput(format!("Failed to read file data: {}", e)))?;

            file_data = Some(data.to_vec());
        }
    }

    let file_data =
        file_data.ok_or_else(|| AppError::InvalidInput("No file provided".to_string()))?;

    let original_filename = filename.unwrap_or_else(|| "unknown".to_string());
    let content_type = content_type.unwrap_or_else(|| "application/octet-stream".to_string());

    Ok((file_data, original_filename, content_type))
}

/// Validate file size
pub fn validate_file_size(file_size: usize, max_size: usize) -> Result<(), AppError> {
    if file_size == 0 {
        return Err(AppError::InvalidInput("File is empty".to_string()));
    }
    if file_size > max_size {
        return Err(AppError::PayloadTooLarge(format!(
            "File size exceeds maximum allowed size of {} MB",
            max_size / 1024 / 1024
        )));
    }
    Ok(())
}

/// Normalize MIME type by stripping parameters (e.g. "image/jpeg; charset=utf-8" -> "image/jpeg").
fn normalize_mime_type(content_type: &str) -> &str {
    content_type
        .split(';')
        .next()
        .map(|s| s.trim())
        .unwrap_or(content_type)
}

/// Validate content type against allowlist. Compares normalized MIME type only (no parameter bypass).
pub fn validate_content_type(content_type: &str, allowed_types: &[String]) -> Result<(), AppError> {
    let normalized = normalize_mime_type(content_type).to_lowercase();
    if !allowed_types.iter().any(|ct| normalized == ct.to_lowercase()) {
        return Err(AppError::InvalidInput(format!(
            "Invalid content type. Allowed types: {}",
            allowed_types.join(", ")
        )));
    }
    Ok(())
}

/// Validate file extension
pub fn validate_file_extension(
    filename: &str,
    allowed_extensions: &[String],
) -> Result<String, AppError> {
    let Some((_, extension)) = filename.rsplit_once('.') else {
        return Err(AppError::InvalidInput(format!(
            "Missing file extension (filename: {})",
            filename
        )));
    };
    let extension = extension.to_lowercase();

    if !allowed_extensions.contains(&extension) {
        return Err(AppError::InvalidInput(format!(
            "Invalid file extension. Allowed extensions: {}",
            allowed_extensions.join(", ")
        )));
    }

    Ok(extension)
}

/// Read the single `file` field and run every upload check against `limits`
pub async fn read_image_upload(
    multipart: Multipart,
    limits: &UploadLimits,
) -> Result<UploadedFile, AppError> {
    let (data, filename, content_type) = extract_multipart_file(multipart).await?;

    validate_file_size(data.len(), limits.max_file_size_bytes)?;
    validate_content_type(&content_type, &limits.allowed_content_types)?;
    let extension = validate_file_extension(&filename, &limits.allowed_extensions)?;

    Ok(UploadedFile {
        data,
        filename,
        content_type: normalize_mime_type(&content_type).to_lowercase(),
        extension,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allowed(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_validate_file_size() {
        assert!(validate_file_size(10, 100).is_ok());
        assert!(matches!(
            validate_file_size(101, 100),
            Err(AppError::PayloadTooLarge(_))
        ));
        assert!(matches!(
            validate_file_size(0, 100),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_content_type_parameters_are_ignored() {
        let types = allowed(&["image/png", "image/jpeg"]);
        assert!(validate_content_type("image/PNG; charset=binary", &types).is_ok());
        assert!(validate_content_type("application/pdf", &types).is_err());
    }

    #[test]
    fn test_validate_file_extension() {
        let extensions = allowed(&["png", "jpg"]);
        assert_eq!(validate_file_extension("Photo.JPG", &extensions).unwrap(), "jpg");
        assert!(validate_file_extension("script.exe", &extensions).is_err());
        assert!(validate_file_extension("noextension", &extensions).is_err());
    }
}
