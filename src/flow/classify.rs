//! Client classification and name extraction heuristics.
//!
//! Both are pure functions. Classification decides which portfolio set the
//! showcase stage offers; when it cannot decide it returns [`Category::Unknown`]
//! and the showcase instruction asks the client instead of guessing.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Audience segment used to pick the portfolio shown at the showcase stage.
///
/// `Unknown` is a legitimate persisted value, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Woman,
    Man,
    Unknown,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Category::Woman => "woman",
            Category::Man => "man",
            Category::Unknown => "unknown",
        };
        write!(f, "{s}")
    }
}

/// Gendered title and profession tokens a client may use about themselves.
const FEMININE_CUES: &[&str] = &[
    "dra", "sra", "senhora", "fotógrafa", "arquiteta", "advogada", "médica", "dentista",
    "nutricionista", "psicóloga",
];
const MASCULINE_CUES: &[&str] = &[
    "dr", "sr", "senhor", "fotógrafo", "arquiteto", "advogado", "médico",
];

/// First names seen in past leads. Matched as whole tokens only.
const FEMININE_NAMES: &[&str] = &[
    "ana", "maria", "carla", "leticia", "letícia", "marlia", "márlia", "ayla", "julia", "júlia",
    "fernanda", "camila", "beatriz",
];
const MASCULINE_NAMES: &[&str] = &[
    "tales", "dredson", "william", "joão", "joao", "pedro", "lucas", "carlos", "rafael",
];

/// Classify a client from their message text and (optionally) their name.
///
/// Explicit self-declared cues in the message win; otherwise the first token
/// of the name is checked against the fixed first-name lists, feminine list
/// first. Matching is whole-token and case-insensitive — substring
/// containment is deliberately avoided so short keys cannot match inside
/// unrelated names.
pub fn classify(name: Option<&str>, text: &str) -> Category {
    let text_tokens: Vec<String> = tokens(text);
    if text_tokens.iter().any(|t| FEMININE_CUES.contains(&t.as_str())) {
        return Category::Woman;
    }
    if text_tokens.iter().any(|t| MASCULINE_CUES.contains(&t.as_str())) {
        return Category::Man;
    }

    if let Some(first) = name.and_then(|n| tokens(n).into_iter().next()) {
        if FEMININE_NAMES.contains(&first.as_str()) {
            return Category::Woman;
        }
        if MASCULINE_NAMES.contains(&first.as_str()) {
            return Category::Man;
        }
    }

    Category::Unknown
}

static NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i:meu nome é|meu nome e|me chamo|my name is|i am|eu sou)\s+([\p{Lu}][\p{L}]*)")
        .expect("name pattern is valid")
});

/// Extract a self-declared first name from message text, if present.
///
/// Recognizes "meu nome é X" / "me chamo X" / "my name is X" style
/// declarations and returns the first name with its original casing. The
/// captured word must be capitalized, so "eu sou fotógrafa" declares a
/// profession, not a name.
pub fn extract_name(text: &str) -> Option<String> {
    NAME_PATTERN
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Lowercased word tokens, punctuation stripped.
fn tokens(s: &str) -> Vec<String> {
    s.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_cue_beats_name() {
        // Name says one thing, self-declaration says another.
        assert_eq!(
            classify(Some("Tales"), "sou fotógrafa e quero renovar meu material"),
            Category::Woman
        );
        assert_eq!(classify(Some("Ana"), "sou advogado"), Category::Man);
    }

    #[test]
    fn name_list_match_is_whole_token() {
        assert_eq!(classify(Some("Carla Mendes"), "oi"), Category::Woman);
        assert_eq!(classify(Some("Tales"), "oi"), Category::Man);
        // "Marla" contains "a" and "arla"-ish fragments but is not on a list.
        assert_eq!(classify(Some("Marla"), "oi"), Category::Unknown);
    }

    #[test]
    fn feminine_list_checked_first() {
        assert_eq!(classify(Some("ana"), "bom dia"), Category::Woman);
    }

    #[test]
    fn unknown_when_nothing_matches() {
        assert_eq!(classify(None, "oi, tudo bem?"), Category::Unknown);
        assert_eq!(classify(Some("Xlzq"), "oi"), Category::Unknown);
        assert_eq!(classify(Some(""), "oi"), Category::Unknown);
    }

    #[test]
    fn classification_is_deterministic() {
        let a = classify(Some("Carla"), "meu nome é Carla");
        let b = classify(Some("Carla"), "meu nome é Carla");
        assert_eq!(a, b);
    }

    #[test]
    fn extracts_portuguese_name_declaration() {
        assert_eq!(extract_name("meu nome é Carla"), Some("Carla".to_string()));
        assert_eq!(extract_name("Me chamo João!"), Some("João".to_string()));
    }

    #[test]
    fn extracts_english_name_declaration() {
        assert_eq!(extract_name("my name is Alice"), Some("Alice".to_string()));
    }

    #[test]
    fn no_name_in_plain_message() {
        assert_eq!(extract_name("oi, quero fotos"), None);
        assert_eq!(extract_name(""), None);
    }

    #[test]
    fn lowercase_word_after_declaration_is_not_a_name() {
        assert_eq!(extract_name("eu sou fotógrafa"), None);
        assert_eq!(extract_name("I am interested in a session"), None);
    }
}
