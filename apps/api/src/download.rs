//! Download Sink — serves a generated document as a text file attachment.

use axum::{
    http::header,
    response::{IntoResponse, Response},
};

pub const RESUME_FILENAME: &str = "tailored-resume.txt";
pub const COVER_LETTER_FILENAME: &str = "cover-letter.txt";

/// Wraps `body` in a `text/plain` response the browser saves as `filename`.
pub fn attachment(filename: &str, body: String) -> Response {
    (
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    )
        .into_response()
}
