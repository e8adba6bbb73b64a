//! Source Code Heuristics
//!
//! Language-agnostic line and marker counting. Function and class counts are
//! plain substring counts (`"def "`, `"function "`, `"class "`), so they also
//! count occurrences inside strings and comments.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::context::FileContext;
use super::security::{KeywordScan, hits};
use crate::constants::code::{
    BRANCH_KEYWORDS, CLASS_MARKER, COMMENT_PREFIXES, COMPLEXITY_HIGH, COMPLEXITY_MEDIUM,
    FUNCTION_MARKERS, MAX_COMFORTABLE_LINE_LENGTH, MAX_DEPENDENCIES, TEST_MARKERS,
};
use crate::constants::security::{
    HARDCODED_SECRET_PATTERNS, SECRET_PENALTY, VULNERABILITY_PATTERNS, VULNERABILITY_PENALTY,
};
use crate::types::{Result, Section, section};

static BRANCH_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    let alternation = BRANCH_KEYWORDS.join("|");
    Regex::new(&format!(r"(?i)\b(?:{})\b", alternation)).expect("branch keyword regex is valid")
});

/// Framework name and lowercase import markers
const FRAMEWORK_MARKERS: &[(&str, &[&str])] = &[
    ("react", &["import react", "from 'react'", "from \"react\"", "require('react')"]),
    ("fastapi", &["from fastapi", "fastapi()"]),
    ("django", &["from django", "import django"]),
    ("flask", &["from flask", "flask(__name__)"]),
    ("express", &["require('express')", "from 'express'", "from \"express\""]),
];

/// Display name for a code extension
fn language_name(extension: &str) -> &'static str {
    match extension {
        ".py" => "Python",
        ".js" | ".jsx" => "JavaScript",
        ".ts" | ".tsx" => "TypeScript",
        ".sol" => "Solidity",
        ".go" => "Go",
        ".rs" => "Rust",
        ".c" | ".h" => "C",
        ".cpp" | ".cc" | ".hpp" => "C++",
        ".java" => "Java",
        ".php" => "PHP",
        ".rb" => "Ruby",
        ".swift" => "Swift",
        ".kt" => "Kotlin",
        ".cs" => "C#",
        ".sh" => "Shell",
        _ => "unknown",
    }
}

// =============================================================================
// Code Statistics
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Low,
    Medium,
    High,
}

impl Complexity {
    pub fn from_branch_count(count: usize) -> Self {
        if count > COMPLEXITY_HIGH {
            Complexity::High
        } else if count > COMPLEXITY_MEDIUM {
            Complexity::Medium
        } else {
            Complexity::Low
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeStats {
    pub total_lines: usize,
    pub code_lines: usize,
    pub comment_lines: usize,
    pub blank_lines: usize,
    pub functions: usize,
    pub classes: usize,
    pub branch_keywords: usize,
    /// Sum of line lengths in characters
    pub total_line_chars: usize,
}

impl CodeStats {
    pub fn measure(code: &str) -> Self {
        let mut stats = Self::default();

        for line in code.lines() {
            stats.total_lines += 1;
            stats.total_line_chars += line.chars().count();

            let trimmed = line.trim();
            if trimmed.is_empty() {
                stats.blank_lines += 1;
            } else if COMMENT_PREFIXES.iter().any(|p| trimmed.starts_with(p)) {
                stats.comment_lines += 1;
            } else {
                stats.code_lines += 1;
            }
        }

        stats.functions = FUNCTION_MARKERS.iter().map(|m| code.matches(m).count()).sum();
        stats.classes = code.matches(CLASS_MARKER).count();
        stats.branch_keywords = BRANCH_PATTERN.find_iter(code).count();
        stats
    }

    pub fn complexity(&self) -> Complexity {
        Complexity::from_branch_count(self.branch_keywords)
    }

    pub fn average_line_length(&self) -> f64 {
        if self.total_lines == 0 {
            0.0
        } else {
            self.total_line_chars as f64 / self.total_lines as f64
        }
    }

    /// Blend of comment ratio and inverse average line length, in [0,1]
    pub fn maintainability(&self) -> f64 {
        if self.total_lines == 0 {
            return 0.0;
        }
        let comment_ratio = self.comment_lines as f64 / self.total_lines as f64;
        let length_term = 1.0 - (self.average_line_length() / MAX_COMFORTABLE_LINE_LENGTH).min(1.0);
        (comment_ratio * 0.5 + length_term * 0.5).min(1.0)
    }
}

/// `markers / functions` capped at 1.0; 1.0 when there are no functions
fn per_function_ratio(markers: usize, functions: usize) -> f64 {
    if functions == 0 {
        1.0
    } else {
        (markers as f64 / functions as f64).min(1.0)
    }
}

fn docstring_markers(code: &str) -> usize {
    code.matches("\"\"\"").count() / 2 + code.matches("'''").count() / 2 + code.matches("/**").count()
}

// =============================================================================
// Phases
// =============================================================================

pub fn structure(ctx: &FileContext<'_>) -> Result<Section> {
    let stats = ctx.code_stats();
    Ok(section(json!({
        "total_lines": stats.total_lines,
        "code_lines": stats.code_lines,
        "comment_lines": stats.comment_lines,
        "blank_lines": stats.blank_lines,
        "functions_count": stats.functions,
        "classes_count": stats.classes,
        "branch_keywords": stats.branch_keywords,
        "complexity_estimate": stats.complexity(),
    })))
}

pub fn content(ctx: &FileContext<'_>) -> Result<Section> {
    let code = ctx.text;
    let lower = code.to_lowercase();

    let frameworks: Vec<&str> = FRAMEWORK_MARKERS
        .iter()
        .filter(|(_, markers)| markers.iter().any(|m| lower.contains(m)))
        .map(|(name, _)| *name)
        .collect();

    let dependencies: Vec<&str> = code
        .lines()
        .map(str::trim)
        .filter(|line| is_dependency_line(line))
        .take(MAX_DEPENDENCIES)
        .collect();

    let mut patterns = Vec::new();
    if code.contains(CLASS_MARKER) {
        patterns.push("object-oriented");
    }
    if code.contains("async ") || code.contains("await ") {
        patterns.push("async-programming");
    }
    if code.contains("lambda ") || code.contains("=>") {
        patterns.push("functional-programming");
    }
    if code.lines().any(|line| line.trim_start().starts_with('@')) {
        patterns.push("decorators");
    }

    Ok(section(json!({
        "language": language_name(&ctx.record.extension),
        "frameworks": frameworks,
        "dependencies": dependencies,
        "patterns": patterns,
    })))
}

fn is_dependency_line(line: &str) -> bool {
    line.starts_with("import ")
        || line.starts_with("from ")
        || line.starts_with("use ")
        || line.starts_with("#include")
        || line.contains("require(")
}

pub fn quality(ctx: &FileContext<'_>) -> Result<Section> {
    let stats = ctx.code_stats();
    let test_markers: usize = TEST_MARKERS.iter().map(|m| ctx.text.matches(m).count()).sum();

    Ok(section(json!({
        "maintainability": stats.maintainability(),
        "documentation_coverage": per_function_ratio(docstring_markers(ctx.text), stats.functions),
        "test_coverage_estimate": per_function_ratio(test_markers, stats.functions),
    })))
}

pub fn security(ctx: &FileContext<'_>) -> Result<Section> {
    let code = ctx.text;
    let mut out = KeywordScan::run(code).to_section();

    let vulnerabilities: Vec<&str> = VULNERABILITY_PATTERNS
        .iter()
        .filter(|(_, patterns)| patterns.iter().any(|p| code.contains(p)))
        .map(|(name, _)| *name)
        .collect();
    let hardcoded = hits(&code.to_lowercase(), HARDCODED_SECRET_PATTERNS);

    let penalty = vulnerabilities.len() as f64 * VULNERABILITY_PENALTY
        + hardcoded.len() as f64 * SECRET_PENALTY;

    out.insert("vulnerability_indicators".to_string(), json!(vulnerabilities));
    out.insert("hardcoded_secrets".to_string(), json!(hardcoded));
    out.insert("security_score".to_string(), json!((1.0 - penalty).max(0.0)));
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::context::AnalyzerOptions;
    use crate::types::FileRecord;
    use proptest::prelude::*;

    fn with_ctx<T>(name: &str, code: &str, f: impl FnOnce(&FileContext<'_>) -> T) -> T {
        let record = FileRecord::from_bytes(name, code.as_bytes(), None);
        let options = AnalyzerOptions::default();
        let ctx = FileContext::new(&record, code, &options);
        f(&ctx)
    }

    #[test]
    fn test_three_hash_comments_of_ten_lines() {
        let code = "# one\nx = 1\n# two\ny = 2\n\nz = 3\n# three\nprint(x)\nprint(y)\nprint(z)";
        let stats = CodeStats::measure(code);
        assert_eq!(stats.total_lines, 10);
        assert_eq!(stats.comment_lines, 3);
        assert!(stats.code_lines <= 7);
        assert_eq!(stats.code_lines, 6);
        assert_eq!(stats.blank_lines, 1);
    }

    #[test]
    fn test_function_and_class_counts() {
        let code = "class A:\n    def f(self):\n        pass\n\nfunction g() {}\n";
        let stats = CodeStats::measure(code);
        assert_eq!(stats.functions, 2);
        assert_eq!(stats.classes, 1);
    }

    #[test]
    fn test_branch_keywords_are_whole_words() {
        // "diff", "format", "tryhard" must not count
        let stats = CodeStats::measure("diff = format(tryhard)\nif x: pass\nfor y in z: pass");
        assert_eq!(stats.branch_keywords, 2);
        assert_eq!(stats.complexity(), Complexity::Low);
    }

    #[test]
    fn test_complexity_buckets() {
        assert_eq!(Complexity::from_branch_count(10), Complexity::Low);
        assert_eq!(Complexity::from_branch_count(11), Complexity::Medium);
        assert_eq!(Complexity::from_branch_count(20), Complexity::Medium);
        assert_eq!(Complexity::from_branch_count(21), Complexity::High);
    }

    #[test]
    fn test_documentation_coverage() {
        assert_eq!(per_function_ratio(0, 0), 1.0);
        assert_eq!(per_function_ratio(1, 2), 0.5);
        assert_eq!(per_function_ratio(5, 2), 1.0);

        let code = "def a():\n    \"\"\"Doc.\"\"\"\n\ndef b():\n    pass\n";
        let q = with_ctx("m.py", code, |ctx| quality(ctx).unwrap());
        assert_eq!(q["documentation_coverage"], json!(0.5));
    }

    #[test]
    fn test_maintainability_of_empty_file() {
        assert_eq!(CodeStats::measure("").maintainability(), 0.0);
    }

    #[test]
    fn test_content_detects_dependencies_and_frameworks() {
        let code = "from flask import Flask\nimport os\napp = Flask(__name__)\n@app.route('/')\nasync def index():\n    await x\n";
        let c = with_ctx("app.py", code, |ctx| content(ctx).unwrap());
        assert_eq!(c["language"], json!("Python"));
        assert_eq!(c["frameworks"], json!(["flask"]));
        assert_eq!(
            c["dependencies"],
            json!(["from flask import Flask", "import os"])
        );
        assert_eq!(c["patterns"], json!(["async-programming", "decorators"]));
    }

    #[test]
    fn test_security_flags_hardcoded_secret_and_injection() {
        let code = "API_KEY=\"abc\"\ncursor.execute(\"SELECT %s\" % name)\n";
        let s = with_ctx("db.py", code, |ctx| security(ctx).unwrap());
        assert_eq!(s["secrets_exposed"], json!(true));
        assert_eq!(s["hardcoded_secrets"], json!(["api_key="]));
        assert_eq!(s["vulnerability_indicators"], json!(["sql_injection"]));
        let score = s["security_score"].as_f64().unwrap();
        assert!((score - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_structure_section_fields() {
        let s = with_ctx("x.js", "function f() { if (a) { return 1; } }", |ctx| {
            structure(ctx).unwrap()
        });
        assert_eq!(s["functions_count"], json!(1));
        assert_eq!(s["complexity_estimate"], json!("low"));
    }

    proptest! {
        #[test]
        fn prop_quality_scores_bounded(code in "[a-z#/ \n\"(){}:=_]{0,400}") {
            let stats = CodeStats::measure(&code);
            let m = stats.maintainability();
            prop_assert!((0.0..=1.0).contains(&m));
            prop_assert_eq!(
                stats.total_lines,
                stats.code_lines + stats.comment_lines + stats.blank_lines
            );
            let d = per_function_ratio(docstring_markers(&code), stats.functions);
            prop_assert!((0.0..=1.0).contains(&d));
        }
    }
}
