// Matching engine: keyword extraction, skill gap, prompt construction, response splitting.
// Pure functions only. The network call lives in llm_client and the wiring in analysis.

pub mod keywords;
pub mod prompt_builder;
pub mod prompts;
pub mod skill_gap;
pub mod splitter;
