//! Global Constants
//!
//! Centralized keyword lists and tuning thresholds for the heuristics.
//! All magic numbers should be defined here with documentation.

/// Literal value for fields a category analyzer does not compute
pub const UNSUPPORTED: &str = "unsupported";

/// Scanner defaults
pub mod scanner {
    /// Default maximum file size for analysis (10MB)
    pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

    /// Default number of files analyzed concurrently
    pub const DEFAULT_CONCURRENCY: usize = 8;
}

/// Code heuristics
pub mod code {
    /// Line prefixes treated as comments (after trimming)
    pub const COMMENT_PREFIXES: &[&str] = &["#", "//"];

    /// Substrings counted as function definitions
    pub const FUNCTION_MARKERS: &[&str] = &["def ", "function "];

    /// Substring counted as a class definition
    pub const CLASS_MARKER: &str = "class ";

    /// Branching keywords counted (whole words) for the complexity estimate
    pub const BRANCH_KEYWORDS: &[&str] = &["if", "for", "while", "switch", "case", "try", "catch"];

    /// Branch counts above this are "high"
    pub const COMPLEXITY_HIGH: usize = 20;

    /// Branch counts above this are "medium"
    pub const COMPLEXITY_MEDIUM: usize = 10;

    /// Line length at which the maintainability length term bottoms out
    pub const MAX_COMFORTABLE_LINE_LENGTH: f64 = 100.0;

    /// Markers counted as test evidence
    pub const TEST_MARKERS: &[&str] = &[
        "def test_",
        "class Test",
        "assert",
        "#[test]",
        "unittest",
        "pytest",
    ];

    /// Maximum number of dependency lines reported
    pub const MAX_DEPENDENCIES: usize = 10;
}

/// Data heuristics
pub mod data {
    /// Rows sampled for column type inference
    pub const DEFAULT_SAMPLE_ROWS: usize = 1000;

    /// Unique/non-empty ratio above which a string column counts as inconsistent
    pub const INCONSISTENCY_RATIO: f64 = 0.8;

    /// Outlier share above which a numeric column counts as an accuracy issue
    pub const OUTLIER_SHARE: f64 = 0.1;

    /// Column name fragments suggesting personal data
    pub const PII_COLUMN_HINTS: &[&str] = &["email", "phone", "ssn", "name", "address"];

    /// Column name fragments suggesting sensitive values
    pub const SENSITIVE_COLUMN_HINTS: &[&str] =
        &["password", "secret", "token", "key", "ssn", "credit"];
}

/// Text heuristics
pub mod text {
    /// Sentence length treated as perfectly readable
    pub const IDEAL_SENTENCE_LENGTH: f64 = 15.0;

    /// Words over the ideal length at which readability reaches zero
    pub const READABILITY_SPAN: f64 = 30.0;
}

/// Lexical security flags. Best effort only: substring matches produce both
/// false positives ("tokenizer") and false negatives (obfuscated keys).
pub mod security {
    pub const SECRET_KEYWORDS: &[&str] = &["password", "api_key", "secret", "token", "private_key"];

    pub const PII_KEYWORDS: &[&str] = &["email", "phone", "address", "ssn", "credit card"];

    /// Assignment-shaped secrets in code
    pub const HARDCODED_SECRET_PATTERNS: &[&str] = &["password=", "api_key=", "secret=", "token="];

    /// (indicator, patterns) pairs; matched case-sensitively
    pub const VULNERABILITY_PATTERNS: &[(&str, &[&str])] = &[
        ("sql_injection", &["execute(", "query(", "%s", "format("]),
        ("code_injection", &["eval(", "exec("]),
        ("command_injection", &["os.system(", "shell=True"]),
    ];

    pub const VULNERABILITY_PENALTY: f64 = 0.2;

    pub const SECRET_PENALTY: f64 = 0.3;

    /// Extensions flagged as executables in binary reports
    pub const EXECUTABLE_EXTENSIONS: &[&str] = &[".exe", ".app", ".deb", ".msi", ".dmg", ".bin"];
}

/// Enrichment defaults
pub mod enrichment {
    pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

    pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

    pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

    pub const DEFAULT_MAX_TOKENS: usize = 1024;

    /// Confidence reported by the rule-based fallback
    pub const FALLBACK_CONFIDENCE: f64 = 0.5;
}
