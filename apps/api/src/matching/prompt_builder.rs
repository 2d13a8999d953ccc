//! Prompt Builder — formats the job, the résumé and the skill gap into one request.

use crate::matching::prompts::{
    CURRENT_RESUME_LABEL, JOB_DESCRIPTION_LABEL, MISSING_SKILLS_LABEL, OUTPUT_FORMAT_INSTRUCTION,
    TAILOR_INSTRUCTION,
};

/// Builds the single user message sent to the completion endpoint.
///
/// `job_text` must already be validated as non-empty by the caller. The
/// inputs are interpolated in one pass, so text that happens to look like a
/// label or marker is forwarded as-is.
pub fn build_prompt(job_text: &str, resume_text: &str, missing_skills: &[String]) -> String {
    format!(
        "{JOB_DESCRIPTION_LABEL}\n{job_text}\n\n\
         {CURRENT_RESUME_LABEL}\n{resume_text}\n\n\
         {MISSING_SKILLS_LABEL} {skills}\n\n\
         {TAILOR_INSTRUCTION}\n\n\
         {OUTPUT_FORMAT_INSTRUCTION}",
        skills = missing_skills.join(", "),
    )
}
