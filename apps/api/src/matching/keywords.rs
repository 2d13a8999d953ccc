//! Keyword Extractor — turns free text into an order-preserving set of lower-case tokens.

use indexmap::IndexSet;

/// Words dropped before a token can become a keyword.
pub const STOP_WORDS: [&str; 11] = [
    "and", "or", "the", "in", "on", "at", "to", "for", "with", "a", "an",
];

/// Tokens must be strictly longer than this (in characters) to count.
const MIN_KEYWORD_EXCLUSIVE_LEN: usize = 2;

/// Keywords in first-seen order; inserting an existing keyword is a no-op.
/// Serializes as a JSON array in that order.
pub type KeywordSet = IndexSet<String>;

/// Extracts keywords from `text`.
///
/// Pipeline: lower-case → strip everything that is not a word character or
/// whitespace → split on whitespace → drop stop-words and tokens of two
/// characters or fewer → de-duplicate keeping first occurrence.
///
/// `None` and the empty string both yield an empty set.
pub fn extract_keywords(text: Option<&str>) -> KeywordSet {
    let mut keywords = KeywordSet::new();
    let Some(text) = text else {
        return keywords;
    };

    let stripped: String = text
        .to_lowercase()
        .chars()
        .filter(|c| is_word_char(*c) || c.is_whitespace())
        .collect();

    for token in stripped.split_whitespace() {
        if token.chars().count() <= MIN_KEYWORD_EXCLUSIVE_LEN || STOP_WORDS.contains(&token) {
            continue;
        }
        keywords.insert(token.to_string());
    }

    keywords
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
