//! File Reader — turns an uploaded résumé into text.
//!
//! Dropped and selected files arrive through the same multipart field and
//! take this one path. Only plain text decodes meaningfully; PDF and Word
//! files are passed through as lossy UTF-8.

use std::path::Path;

use tracing::warn;

use crate::errors::AppError;

pub const ACCEPTED_EXTENSIONS: [&str; 4] = ["pdf", "doc", "docx", "txt"];

/// Validates the extension of `file_name` and decodes `bytes` as text.
pub fn read_resume_text(file_name: &str, bytes: &[u8]) -> Result<String, AppError> {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .ok_or_else(|| {
            AppError::Validation(format!(
                "Resume file '{file_name}' has no extension; accepted: {}",
                accepted_list()
            ))
        })?;

    if !ACCEPTED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(AppError::Validation(format!(
            "Resume file type '.{extension}' is not supported; accepted: {}",
            accepted_list()
        )));
    }

    if extension != "txt" {
        warn!(
            "Resume '{}' is .{}; reading it as raw text, document structure will be lost",
            file_name, extension
        );
    }

    Ok(String::from_utf8_lossy(bytes).into_owned())
}

fn accepted_list() -> String {
    ACCEPTED_EXTENSIONS
        .iter()
        .map(|e| format!(".{e}"))
        .collect::<Vec<_>>()
        .join(", ")
}
