//! Heuristic language detection for Hinglish chat input.
//!
//! Classifies a question as Hindi, English or mixed using a fixed list of
//! Hindi function words written in Latin script, a Devanagari code-point
//! check, and a Latin-letter check, in that order. This is a lexical
//! heuristic, not a linguistic classifier; substring false positives
//! ("tha" inside "that") are accepted.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Detected input language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Hindi,
    English,
    Mixed,
}

impl Language {
    pub fn name(&self) -> &'static str {
        match self {
            Language::Hindi => "hindi",
            Language::English => "english",
            Language::Mixed => "mixed",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Common Hindi function words and verb forms in Latin script.
///
/// Matched by substring containment over the lowercased input. The list
/// deliberately omits "the" and "ho", which shadow the English article and
/// "who"/"how".
const HINDI_WORDS: &[&str] = &[
    "kon", "kaun", "kya", "kahan", "kab", "kisne", "tum", "aap", "main", "mujhe", "mera",
    "meri", "ham", "hum", "hai", "hain", "tha", "thi", "banaya", "banayi", "banaye",
    "karna", "karti", "karte", "kar", "karne", "sakta", "sakti", "sakte", "sak", "sakne",
    "naam", "kaise", "kyun", "kabhi", "kuch", "koi", "sab", "saare", "dono", "acha",
    "accha", "bura", "buri", "bada", "badi", "chota", "choti", "naya", "nayi", "purana",
    "purani", "meetha", "meethi", "teekha", "teekhi", "samajh", "samajhte", "samajhti",
    "samajhne", "dekh", "dekhte", "dekhti", "dekhne", "sun", "sunte", "sunti", "sunne",
    "bol", "bolte", "bolti", "bolne", "soch", "sochte", "sochti", "sochne", "namaste",
];

/// Classify the language of a chat question.
///
/// Deterministic: the same input always yields the same answer.
pub fn detect(text: &str) -> Language {
    let lower = text.to_lowercase();

    if HINDI_WORDS.iter().any(|word| lower.contains(word)) {
        return Language::Hindi;
    }

    if text.chars().any(is_devanagari) {
        return Language::Hindi;
    }

    if text.chars().any(|c| c.is_ascii_alphabetic()) {
        return Language::English;
    }

    Language::Mixed
}

/// Whether a character falls in the Devanagari block (U+0900..U+097F).
fn is_devanagari(c: char) -> bool {
    ('\u{0900}'..='\u{097F}').contains(&c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hindi_word_list_hit() {
        assert_eq!(detect("namaste, how are you"), Language::Hindi);
        assert_eq!(detect("tum kaun ho"), Language::Hindi);
        assert_eq!(detect("kya haal hai"), Language::Hindi);
    }

    #[test]
    fn test_devanagari_hit() {
        assert_eq!(detect("नमस्ते"), Language::Hindi);
    }

    #[test]
    fn test_english() {
        assert_eq!(detect("hello there"), Language::English);
        assert_eq!(detect("who created you"), Language::English);
    }

    #[test]
    fn test_mixed_for_no_letters() {
        assert_eq!(detect(""), Language::Mixed);
        assert_eq!(detect("12345"), Language::Mixed);
        assert_eq!(detect("!?~"), Language::Mixed);
    }

    #[test]
    fn test_substring_false_positive_is_accepted() {
        // "tha" hides inside "that"; the heuristic accepts this.
        assert_eq!(detect("that one"), Language::Hindi);
    }

    #[test]
    fn test_deterministic() {
        for _ in 0..3 {
            assert_eq!(detect("namaste, how are you"), Language::Hindi);
        }
    }
}
