//! Response Splitter — recovers the résumé and cover letter from the model's answer.

use serde::Serialize;

use crate::errors::AnalysisError;
use crate::matching::prompts::{COVER_LETTER_MARKER, RESUME_MARKER};

/// The two documents multiplexed into one completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TailoredDocuments {
    pub resume: String,
    pub cover_letter: String,
}

/// Splits a completion on the first cover-letter marker.
///
/// Everything after that boundary belongs to the cover letter, including any
/// later marker occurrences. The first résumé marker is removed from the
/// leading part. Both parts are trimmed and must be non-empty.
pub fn split_response(raw: &str) -> Result<TailoredDocuments, AnalysisError> {
    let (head, tail) = raw.split_once(COVER_LETTER_MARKER).ok_or_else(|| {
        AnalysisError::ResponseFormat(format!(
            "cover letter delimiter not found ({COVER_LETTER_MARKER})"
        ))
    })?;

    let resume = head.replacen(RESUME_MARKER, "", 1).trim().to_string();
    let cover_letter = tail.trim().to_string();

    if resume.is_empty() {
        return Err(AnalysisError::ResponseFormat(
            "resume section is empty".to_string(),
        ));
    }
    if cover_letter.is_empty() {
        return Err(AnalysisError::ResponseFormat(
            "cover letter section is empty".to_string(),
        ));
    }

    Ok(TailoredDocuments {
        resume,
        cover_letter,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::prompts::OUTPUT_FORMAT_INSTRUCTION;

    fn reason(err: AnalysisError) -> String {
        match err {
            AnalysisError::ResponseFormat(reason) => reason,
            other => panic!("expected ResponseFormat, got {other:?}"),
        }
    }

    #[test]
    fn test_well_formed_response_round_trips() {
        let resume = "Jane Doe\nSenior Engineer\n- Shipped things";
        let cover = "Dear Hiring Team,\n\nI am excited to apply.";
        let raw = format!("{RESUME_MARKER}\n{resume}\n{COVER_LETTER_MARKER}\n{cover}");

        let docs = split_response(&raw).unwrap();
        assert_eq!(docs.resume, resume);
        assert_eq!(docs.cover_letter, cover);
    }

    #[test]
    fn test_answer_following_prompt_format_block_splits_cleanly() {
        // A model that copies the requested layout verbatim, bodies filled in.
        let layout_start = OUTPUT_FORMAT_INSTRUCTION.find(RESUME_MARKER).unwrap();
        let layout = &OUTPUT_FORMAT_INSTRUCTION[layout_start..];
        let answer = layout
            .replace("[tailored resume content]", "Jane Doe\nRust Engineer")
            .replace("[cover letter content]", "Dear Hiring Team,\nHello.");
        assert_ne!(answer, layout, "placeholders not found in the format block");

        let docs = split_response(&answer).unwrap();
        assert_eq!(docs.resume, "Jane Doe\nRust Engineer");
        assert_eq!(docs.cover_letter, "Dear Hiring Team,\nHello.");
    }

    #[test]
    fn test_missing_delimiter_is_a_format_error() {
        let err = split_response("---RESUME---\nJust a resume, no letter").unwrap_err();
        assert!(reason(err).contains("delimiter not found"));
    }

    #[test]
    fn test_empty_completion_is_a_format_error() {
        assert!(matches!(
            split_response(""),
            Err(AnalysisError::ResponseFormat(_))
        ));
    }

    #[test]
    fn test_empty_cover_letter_is_a_format_error() {
        let err = split_response("---RESUME---\nResume body\n---COVER_LETTER---\n   \n").unwrap_err();
        assert_eq!(reason(err), "cover letter section is empty");
    }

    #[test]
    fn test_empty_resume_is_a_format_error() {
        let err = split_response("---RESUME---\n\n---COVER_LETTER---\nLetter").unwrap_err();
        assert_eq!(reason(err), "resume section is empty");
    }

    #[test]
    fn test_repeated_delimiter_keeps_everything_after_first_boundary() {
        let raw = "---RESUME---\nR\n---COVER_LETTER---\nC1\n---COVER_LETTER---\nC2";
        let docs = split_response(raw).unwrap();
        assert_eq!(docs.resume, "R");
        assert_eq!(docs.cover_letter, "C1\n---COVER_LETTER---\nC2");
    }

    #[test]
    fn test_resume_marker_is_optional_and_removed_once() {
        let docs = split_response("Intro text\n---COVER_LETTER---\nLetter").unwrap();
        assert_eq!(docs.resume, "Intro text");

        let docs =
            split_response("---RESUME---\nA ---RESUME--- B\n---COVER_LETTER---\nLetter").unwrap();
        assert_eq!(docs.resume, "A ---RESUME--- B");
    }
}
