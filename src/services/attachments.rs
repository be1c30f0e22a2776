//! Multipart attachment intake: size-capped streaming reads.

use actix_multipart::Multipart;
use futures_util::StreamExt;

use crate::error::{AppError, AppResult};

/// One uploaded file read out of a multipart request.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub field_name: String,
    pub filename: String,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

/// Strip any path components from a client-supplied filename.
pub fn sanitize_filename(raw: &str) -> String {
    let name = raw.rsplit(['/', '\\']).next().unwrap_or(raw).trim();
    if name.is_empty() {
        "attachment".to_string()
    } else {
        name.to_string()
    }
}

/// Read every file field from a multipart payload, enforcing the size cap
/// per file while streaming.
pub async fn read_multipart_files(
    mut payload: Multipart,
    max_size: usize,
) -> AppResult<Vec<UploadedFile>> {
    let mut files = Vec::new();

    while let Some(field) = payload.next().await {
        let mut field = field
            .map_err(|e| AppError::InvalidInput(format!("Malformed multipart payload: {}", e)))?;

        let field_name = field.name().unwrap_or("").to_string();
        // Non-file parts (e.g. a JSON `visit` part) carry no filename;
        // fall back to the field name so callers can still pick them up
        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(sanitize_filename)
            .unwrap_or_else(|| sanitize_filename(&field_name));

        let content_type = field.content_type().map(|ct| ct.to_string());

        let mut data = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk
                .map_err(|e| AppError::InvalidInput(format!("Failed to read upload: {}", e)))?;

            if data.len() + chunk.len() > max_size {
                return Err(AppError::InvalidInput(format!(
                    "{}: attachment exceeds the {} byte limit",
                    field_name, max_size
                )));
            }
            data.extend_from_slice(&chunk);
        }

        if data.is_empty() {
            return Err(AppError::InvalidInput(format!(
                "{}: attachment is empty",
                field_name
            )));
        }

        files.push(UploadedFile {
            field_name,
            filename,
            content_type,
            data,
        });
    }

    Ok(files)
}

/// Pick the single file expected under `field` from an upload.
pub fn single_file(files: Vec<UploadedFile>, field: &str) -> AppResult<UploadedFile> {
    files
        .into_iter()
        .find(|f| f.field_name == field)
        .ok_or_else(|| AppError::InvalidInput(format!("{}: attachment is required", field)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename_strips_paths() {
        assert_eq!(sanitize_filename("letter.pdf"), "letter.pdf");
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("C:\\Users\\x\\cv.docx"), "cv.docx");
        assert_eq!(sanitize_filename("  "), "attachment");
    }

    #[test]
    fn test_single_file_by_field() {
        let files = vec![
            UploadedFile {
                field_name: "cv".to_string(),
                filename: "cv.pdf".to_string(),
                content_type: None,
                data: vec![1],
            },
            UploadedFile {
                field_name: "acceptance_letter".to_string(),
                filename: "letter.pdf".to_string(),
                content_type: None,
                data: vec![2],
            },
        ];

        let picked = single_file(files.clone(), "acceptance_letter").unwrap();
        assert_eq!(picked.filename, "letter.pdf");

        assert!(single_file(files, "request_letter").is_err());
    }
}
