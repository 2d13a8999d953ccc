// Prompt constants for the tailoring request.
// The two markers are a wire contract: the splitter matches them byte-for-byte.

/// Precedes the tailored résumé in the model's answer.
pub const RESUME_MARKER: &str = "---RESUME---";

/// Separates the résumé from the cover letter in the model's answer.
pub const COVER_LETTER_MARKER: &str = "---COVER_LETTER---";

pub const JOB_DESCRIPTION_LABEL: &str = "Job Description:";
pub const CURRENT_RESUME_LABEL: &str = "Current Resume:";
pub const MISSING_SKILLS_LABEL: &str = "Missing Skills:";

/// Instruction appended after the three labelled inputs.
pub const TAILOR_INSTRUCTION: &str = "\
Using the job description and the current resume above, write:
1. A professional resume tailored to this job. Emphasise the experience that matches the role \
and work the missing skills in wherever the candidate's background genuinely supports them.
2. A matching cover letter addressed to the hiring team for this role.

Do not invent employers, dates, degrees or certifications that are not in the current resume.";

/// Output-format block. Must stay in sync with the two marker constants.
pub const OUTPUT_FORMAT_INSTRUCTION: &str = "\
Format your response EXACTLY as follows, with each marker on its own line and nothing before the first marker:
---RESUME---
[tailored resume content]
---COVER_LETTER---
[cover letter content]";
