//! Plain text heuristics

use std::collections::HashSet;

use serde_json::json;

use super::context::FileContext;
use crate::constants::text::{IDEAL_SENTENCE_LENGTH, READABILITY_SPAN};
use crate::types::{Result, Section, section};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextStats {
    pub line_count: usize,
    pub word_count: usize,
    /// Unicode scalar values
    pub char_count: usize,
    pub average_line_length: f64,
    /// Non-empty segments between `.`, `!` and `?`
    pub sentence_count: usize,
    /// Distinct lowercased words
    pub unique_words: usize,
}

impl TextStats {
    pub fn measure(text: &str) -> Self {
        let line_count = text.lines().count();
        let char_count = text.chars().count();
        let line_chars: usize = text.lines().map(|l| l.chars().count()).sum();

        let words: Vec<&str> = text.split_whitespace().collect();
        let unique_words = words
            .iter()
            .map(|w| w.to_lowercase())
            .collect::<HashSet<_>>()
            .len();

        let sentence_count = text
            .split(['.', '!', '?'])
            .filter(|s| !s.trim().is_empty())
            .count();

        Self {
            line_count,
            word_count: words.len(),
            char_count,
            average_line_length: if line_count == 0 {
                0.0
            } else {
                line_chars as f64 / line_count as f64
            },
            sentence_count,
            unique_words,
        }
    }

    /// `1 - (avg_sentence_len - 15) / 30`, clamped to [0,1]; 0 without sentences
    pub fn readability(&self) -> f64 {
        if self.sentence_count == 0 {
            return 0.0;
        }
        let avg = self.word_count as f64 / self.sentence_count as f64;
        (1.0 - (avg - IDEAL_SENTENCE_LENGTH) / READABILITY_SPAN).clamp(0.0, 1.0)
    }
}

pub fn structure(ctx: &FileContext<'_>) -> Result<Section> {
    let stats = ctx.text_stats();
    Ok(section(json!({
        "line_count": stats.line_count,
        "word_count": stats.word_count,
        "char_count": stats.char_count,
        "average_line_length": stats.average_line_length,
    })))
}

pub fn content(ctx: &FileContext<'_>) -> Result<Section> {
    let stats = ctx.text_stats();
    Ok(section(json!({
        "sentence_count": stats.sentence_count,
        "unique_words": stats.unique_words,
    })))
}

pub fn quality(ctx: &FileContext<'_>) -> Result<Section> {
    Ok(section(json!({
        "readability": ctx.text_stats().readability(),
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_counts() {
        let stats = TextStats::measure("Hello world.\nHello again!\n");
        assert_eq!(stats.line_count, 2);
        assert_eq!(stats.word_count, 4);
        assert_eq!(stats.char_count, 26);
        assert_eq!(stats.sentence_count, 2);
        assert_eq!(stats.unique_words, 3);
        assert!((stats.average_line_length - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_char_count_is_unicode_scalars() {
        assert_eq!(TextStats::measure("héllo").char_count, 5);
    }

    #[test]
    fn test_readability() {
        // short sentences read perfectly
        assert_eq!(TextStats::measure("Go now. Stop.").readability(), 1.0);
        assert_eq!(TextStats::measure("").readability(), 0.0);

        let long = format!("{}.", vec!["word"; 45].join(" "));
        assert_eq!(TextStats::measure(&long).readability(), 0.0);

        let thirty = format!("{}.", vec!["word"; 30].join(" "));
        assert!((TextStats::measure(&thirty).readability() - 0.5).abs() < 1e-9);
    }

    proptest! {
        #[test]
        fn prop_readability_bounded(text in "[a-zA-Z .!?\n]{0,300}") {
            let r = TextStats::measure(&text).readability();
            prop_assert!((0.0..=1.0).contains(&r));
        }
    }
}
