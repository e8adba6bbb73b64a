//! Lexical Security Flags
//!
//! Case-insensitive substring search against fixed keyword lists. This is
//! not a static analyzer: "tokenizer" trips the secret flag and a base64
//! encoded key does not. Callers should treat the flags as review hints.

use serde_json::json;

use crate::constants::security::{PII_KEYWORDS, SECRET_KEYWORDS};
use crate::types::{Section, section};

/// Keyword hits for one piece of text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordScan {
    pub secret_hits: Vec<&'static str>,
    pub pii_hits: Vec<&'static str>,
}

impl KeywordScan {
    pub fn run(text: &str) -> Self {
        let lower = text.to_lowercase();
        Self {
            secret_hits: hits(&lower, SECRET_KEYWORDS),
            pii_hits: hits(&lower, PII_KEYWORDS),
        }
    }

    pub fn secrets_exposed(&self) -> bool {
        !self.secret_hits.is_empty()
    }

    pub fn pii_detected(&self) -> bool {
        !self.pii_hits.is_empty()
    }

    /// Base security section shared by every text-bearing category
    pub fn to_section(&self) -> Section {
        section(json!({
            "secrets_exposed": self.secrets_exposed(),
            "pii_detected": self.pii_detected(),
            "secret_keywords": self.secret_hits,
            "pii_keywords": self.pii_hits,
            "vulnerability_indicators": Vec::<String>::new(),
        }))
    }
}

/// Keywords from `list` that occur in already-lowercased `haystack`
pub fn hits(haystack: &str, list: &[&'static str]) -> Vec<&'static str> {
    list.iter()
        .copied()
        .filter(|keyword| haystack.contains(keyword))
        .collect()
}
