//! File Category Detection
//!
//! **Single source of truth** for mapping an extension/MIME pair to a
//! [`Category`]. Rules are evaluated in [`RULE_ORDER`]; the first rule whose
//! extension set contains the extension, or whose MIME markers match, wins.
//! Nothing matched means [`Category::Binary`].
//!
//! ```rust
//! use filescope::analyzer::{Category, classify};
//!
//! assert_eq!(classify(".py", Some("text/plain")), Category::Code);
//! assert_eq!(classify(".csv", Some("text/csv")), Category::Data);
//! assert_eq!(classify(".unknownext", Some("application/octet-stream")), Category::Binary);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// =============================================================================
// Category Rule Table
// =============================================================================

/// Matching rule for one category
struct CategoryRule {
    /// Known extensions (lowercase, leading dot)
    extensions: &'static [&'static str],
    /// MIME substrings that select this category
    mime_markers: &'static [&'static str],
    /// MIME markers only apply to `text/*` types
    mime_requires_text: bool,
}

macro_rules! rule {
    ([$($ext:literal),*], [$($mime:literal),*]) => {
        CategoryRule {
            extensions: &[$($ext),*],
            mime_markers: &[$($mime),*],
            mime_requires_text: false,
        }
    };
    ([$($ext:literal),*], text [$($mime:literal),*]) => {
        CategoryRule {
            extensions: &[$($ext),*],
            mime_markers: &[$($mime),*],
            mime_requires_text: true,
        }
    };
}

/// Evaluation order. Specific categories precede the generic `Text`.
pub const RULE_ORDER: [Category; 9] = [
    Category::Code,
    Category::Data,
    Category::Document,
    Category::Image,
    Category::Audio,
    Category::Video,
    Category::Config,
    Category::Archive,
    Category::Text,
];

impl Category {
    fn rule(&self) -> CategoryRule {
        match self {
            Category::Code => rule!(
                [".py", ".js", ".ts", ".tsx", ".jsx", ".sol", ".go", ".rs", ".cpp", ".cc", ".c",
                 ".h", ".hpp", ".java", ".php", ".rb", ".swift", ".kt", ".cs", ".sh"],
                text ["python", "javascript", "c++"]
            ),
            Category::Data => rule!(
                [".csv", ".tsv", ".json", ".xml", ".yaml", ".yml", ".parquet", ".db", ".sql"],
                ["json"]
            ),
            Category::Document => rule!(
                [".pdf", ".docx", ".doc", ".pptx", ".ppt", ".xlsx", ".xls", ".odt"],
                ["pdf", "officedocument", "msword"]
            ),
            Category::Image => rule!(
                [".jpg", ".jpeg", ".png", ".gif", ".bmp", ".webp", ".svg", ".ico", ".tiff"],
                ["image"]
            ),
            Category::Audio => rule!(
                [".mp3", ".wav", ".flac", ".ogg", ".m4a", ".aac"],
                ["audio"]
            ),
            Category::Video => rule!(
                [".mp4", ".mkv", ".mov", ".avi", ".webm"],
                ["video"]
            ),
            Category::Config => rule!(
                [".toml", ".ini", ".conf", ".cfg", ".env", ".properties"],
                []
            ),
            Category::Archive => rule!(
                [".zip", ".tar", ".gz", ".tgz", ".bz2", ".xz", ".rar", ".7z"],
                ["zip", "x-tar", "gzip", "x-7z", "x-rar"]
            ),
            Category::Text => rule!([".txt", ".md", ".rst", ".log"], ["text"]),
            Category::Binary => rule!([], []),
        }
    }

    fn matches(&self, extension: &str, mime: &str) -> bool {
        let rule = self.rule();
        if rule.extensions.contains(&extension) {
            return true;
        }
        if mime.is_empty() || (rule.mime_requires_text && !mime.contains("text")) {
            return false;
        }
        rule.mime_markers.iter().any(|marker| mime.contains(marker))
    }
}

// =============================================================================
// Category Enum
// =============================================================================

/// Classification tag; exactly one per file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Code,
    Data,
    Document,
    Text,
    Image,
    Audio,
    Video,
    Config,
    Archive,
    #[default]
    Binary,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Category::Code,
        Category::Data,
        Category::Document,
        Category::Text,
        Category::Image,
        Category::Audio,
        Category::Video,
        Category::Config,
        Category::Archive,
        Category::Binary,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Code => "code",
            Category::Data => "data",
            Category::Document => "document",
            Category::Text => "text",
            Category::Image => "image",
            Category::Audio => "audio",
            Category::Video => "video",
            Category::Config => "config",
            Category::Archive => "archive",
            Category::Binary => "binary",
        }
    }

    /// Categories whose content is decoded and inspected as text
    pub fn is_text_bearing(&self) -> bool {
        matches!(
            self,
            Category::Code | Category::Data | Category::Text | Category::Config
        )
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == lower)
            .ok_or_else(|| {
                format!(
                    "Unknown category: {}. Valid values: {}",
                    s,
                    Category::ALL.map(|c| c.as_str()).join(", ")
                )
            })
    }
}

/// Classify an extension/MIME pair.
///
/// The extension is compared case-insensitively and a missing leading dot is
/// tolerated. Never fails: unmatched input is `Binary`.
pub fn classify(extension: &str, mime_type: Option<&str>) -> Category {
    let extension = normalize(extension);
    let mime = mime_type.map(str::to_lowercase).unwrap_or_default();

    RULE_ORDER
        .into_iter()
        .find(|category| category.matches(&extension, &mime))
        .unwrap_or(Category::Binary)
}

fn normalize(extension: &str) -> String {
    let lower = extension.trim().to_lowercase();
    if lower.is_empty() || lower.starts_with('.') {
        lower
    } else {
        format!(".{}", lower)
    }
}
