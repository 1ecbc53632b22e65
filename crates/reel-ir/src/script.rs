use serde::{Deserialize, Serialize};

use reel_core::Duration;

/// Average narration pace used for up-front duration estimates.
pub const WORDS_PER_SECOND: f64 = 2.5;

/// One whitespace-delimited token of a script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    pub text: String,
    /// Length in Unicode scalar values, surrounding whitespace excluded.
    pub char_len: usize,
}

impl Word {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let char_len = text.chars().count();
        Self { text, char_len }
    }
}

/// The narration text and the ordered words derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    text: String,
    words: Vec<Word>,
}

impl Script {
    /// Split `text` on whitespace. Punctuation stays attached to its word.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let words = text.split_whitespace().map(Word::new).collect();
        Self { text, words }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn total_chars(&self) -> usize {
        self.words.iter().map(|w| w.char_len).sum()
    }

    /// Rough spoken length at 150 words per minute, rounded to a tenth of a second.
    pub fn estimated_duration(&self) -> Duration {
        let seconds = self.word_count() as f64 / WORDS_PER_SECOND;
        Duration::from_seconds((seconds * 10.0).round() / 10.0)
    }

    /// The first `max_words` words joined by single spaces.
    pub fn excerpt(&self, max_words: usize) -> String {
        self.words
            .iter()
            .take(max_words)
            .map(|w| w.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_on_any_whitespace() {
        let script = Script::new("  Wake up\tearly.\n\nGrind  hard ");
        let texts: Vec<&str> = script.words().iter().map(|w| w.text.as_str()).collect();
        assert_eq!(texts, ["Wake", "up", "early.", "Grind", "hard"]);
    }

    #[test]
    fn test_char_len_counts_scalars() {
        let word = Word::new("café");
        assert_eq!(word.char_len, 4);
    }

    #[test]
    fn test_whitespace_only_is_empty() {
        assert!(Script::new(" \n\t ").is_empty());
        assert!(Script::new("").is_empty());
    }

    #[test]
    fn test_total_chars() {
        assert_eq!(Script::new("Wake up early").total_chars(), 11);
    }

    #[test]
    fn test_estimated_duration() {
        let script = Script::new("one two three four five six seven");
        assert!((script.estimated_duration().as_seconds() - 2.8).abs() < 1e-9);
        assert!(Script::new("").estimated_duration().is_zero());
    }

    #[test]
    fn test_excerpt() {
        let script = Script::new("a b c d");
        assert_eq!(script.excerpt(2), "a b");
        assert_eq!(script.excerpt(10), "a b c d");
    }
}
