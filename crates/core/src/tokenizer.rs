//! Transcript tokenizer
//!
//! Turns raw speech-to-text output into lower-case word tokens. Only runs of
//! ASCII letters and hyphens survive; digits, punctuation, whitespace and other
//! scripts act as separators.

use once_cell::sync::Lazy;
use regex::Regex;

static TOKEN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-z-]+").expect("token pattern is a valid regex"));

/// Tokenize a transcript into normalized words
///
/// ```
/// use barge_in_core::tokenize;
///
/// assert_eq!(tokenize("Yeah, wait a second!"), vec!["yeah", "wait", "a", "second"]);
/// assert_eq!(tokenize("uh-huh"), vec!["uh-huh"]);
/// ```
pub fn tokenize(text: &str) -> Vec<String> {
    // Lower-case first so that non-ASCII capitals folding to ASCII are kept
    let lowered = text.to_lowercase();
    TOKEN_PATTERN
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Check whether a word is a well-formed token
pub fn is_token(word: &str) -> bool {
    !word.is_empty() && word.bytes().all(|b| b.is_ascii_lowercase() || b == b'-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_words() {
        assert_eq!(tokenize("yeah ok"), vec!["yeah", "ok"]);
    }

    #[test]
    fn test_punctuation_removed() {
        assert_eq!(tokenize("yeah, wait."), vec!["yeah", "wait"]);
        assert_eq!(tokenize("yeah, okay..."), vec!["yeah", "okay"]);
    }

    #[test]
    fn test_mixed_case() {
        assert_eq!(tokenize("YeAh BuT WaIt"), vec!["yeah", "but", "wait"]);
    }

    #[test]
    fn test_hyphenated_words() {
        assert_eq!(tokenize("uh-huh"), vec!["uh-huh"]);
        assert_eq!(tokenize("mm-hmm, right"), vec!["mm-hmm", "right"]);
    }

    #[test]
    fn test_sentence_example() {
        assert_eq!(
            tokenize("Yeah, wait a second!"),
            vec!["yeah", "wait", "a", "second"]
        );
    }

    #[test]
    fn test_empty_and_noise() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   ").is_empty());
        assert!(tokenize("123 !!! 4.5").is_empty());
    }

    #[test]
    fn test_digits_split_words() {
        assert_eq!(tokenize("abc123def"), vec!["abc", "def"]);
    }

    #[test]
    fn test_other_scripts_discarded() {
        assert_eq!(tokenize("नमस्ते stop"), vec!["stop"]);
        assert_eq!(tokenize("café"), vec!["caf"]);
    }

    #[test]
    fn test_idempotent_on_joined_tokens() {
        let inputs = [
            "Yeah, wait a second!",
            "okay yeah uh-huh",
            "NO... please STOP",
            "hmm 42 right-o",
            "",
        ];
        for input in inputs {
            let once = tokenize(input);
            let twice = tokenize(&once.join(" "));
            assert_eq!(once, twice, "input: {input:?}");
        }
    }

    #[test]
    fn test_case_insensitive() {
        let inputs = ["Yeah", "STOP right THERE", "Uh-Huh", "MiXeD-CaSe words"];
        for input in inputs {
            assert_eq!(tokenize(input), tokenize(&input.to_lowercase()));
        }
    }

    #[test]
    fn test_is_token() {
        assert!(is_token("uh-huh"));
        assert!(is_token("stop"));
        assert!(!is_token(""));
        assert!(!is_token("Stop"));
        assert!(!is_token("two words"));
        assert!(!is_token("ok!"));
    }
}
