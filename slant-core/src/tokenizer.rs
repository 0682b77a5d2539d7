//! Word tokenizer shared by every scorer.

use once_cell::sync::Lazy;
use regex::Regex;

/// Maximal runs of Unicode word characters (alphanumerics and underscore).
static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").expect("valid word regex"));

/// Lazily yield lowercase word tokens.
///
/// Matches are found one at a time on the original text and lowercased as
/// they are yielded. Punctuation and whitespace only separate tokens; they
/// never appear in the output. Works for any string, including the empty one.
pub fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    WORD_RE.find_iter(text).map(|m| m.as_str().to_lowercase())
}

/// Split text into lowercase word tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    tokens(text).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_split_and_lowercase() {
        assert_eq!(
            tokenize("SHOCKING news: Markets crash!"),
            vec!["shocking", "news", "markets", "crash"]
        );
    }

    #[test]
    fn test_empty_and_whitespace() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \n\t ").is_empty());
        assert!(tokenize("?!... ---").is_empty());
    }

    #[test]
    fn test_word_characters() {
        assert_eq!(tokenize("snake_case x2 don't"), vec!["snake_case", "x2", "don", "t"]);
        assert_eq!(tokenize("Café déjà-vu"), vec!["café", "déjà", "vu"]);
    }

    #[test]
    fn test_lazy_matches_eager() {
        let text = "Everyone is ALWAYS outraged, never calm.";
        let lazy: Vec<String> = tokens(text).collect();
        assert_eq!(lazy, tokenize(text));
    }

    #[test]
    fn test_tokens_stop_early() {
        let text = format!("first second {}", "rest ".repeat(10_000));
        let mut iter = tokens(&text);
        assert_eq!(iter.next().as_deref(), Some("first"));
        assert_eq!(iter.next().as_deref(), Some("second"));
        assert_eq!(tokens(&text).take(3).count(), 3);
    }
}
