//! Skill-Gap Analyzer — job keywords the résumé never mentions.

use crate::matching::keywords::KeywordSet;

/// Returns every job keyword absent from the résumé keywords, in the job's
/// first-seen order. Pure presence/absence; nothing is ranked or weighted.
pub fn missing_skills(job_keywords: &KeywordSet, resume_keywords: &KeywordSet) -> Vec<String> {
    job_keywords
        .iter()
        .filter(|keyword| !resume_keywords.contains(keyword.as_str()))
        .cloned()
        .collect()
}
