//! Analysis Report Types
//!
//! Output of one file analysis. The four phase maps use sorted keys so that
//! byte-identical input serializes to byte-identical maps.

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::record::FileRecord;
use crate::analyzer::Category;
use crate::constants::enrichment::FALLBACK_CONFIDENCE;

/// One phase's output (structure, content, quality or security)
pub type Section = BTreeMap<String, Value>;

/// Convert a `json!` object literal into a [`Section`].
///
/// Non-object values are stored under `"value"`.
pub fn section(value: Value) -> Section {
    match value {
        Value::Object(map) => map.into_iter().collect(),
        other => BTreeMap::from([("value".to_string(), other)]),
    }
}

/// Section carrying only an error message
pub fn error_section(message: impl Into<String>) -> Section {
    BTreeMap::from([("error".to_string(), Value::String(message.into()))])
}

// =============================================================================
// Analysis Report
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub record: FileRecord,
    pub category: Category,
    pub structure: Section,
    pub content: Section,
    pub quality: Section,
    pub security: Section,
    /// Set when the content could not be decoded; all sections are then empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enrichment: Option<Enrichment>,
    /// Wall-clock fields; everything above is a function of the bytes
    pub analyzed_at: DateTime<Utc>,
    #[serde(default)]
    pub duration_ms: u64,
}

impl AnalysisReport {
    /// Equality over everything except `analyzed_at` and `duration_ms`
    pub fn same_analysis(&self, other: &AnalysisReport) -> bool {
        self.record == other.record
            && self.category == other.category
            && self.structure == other.structure
            && self.content == other.content
            && self.quality == other.quality
            && self.security == other.security
            && self.error == other.error
            && self.enrichment == other.enrichment
    }

    pub fn secrets_exposed(&self) -> bool {
        flag(&self.security, "secrets_exposed")
    }

    pub fn pii_detected(&self) -> bool {
        flag(&self.security, "pii_detected")
    }

    /// `(phase, message)` for every phase that reported an error
    pub fn phase_errors(&self) -> Vec<(&'static str, &str)> {
        [
            ("structure", &self.structure),
            ("content", &self.content),
            ("quality", &self.quality),
            ("security", &self.security),
        ]
        .into_iter()
        .filter_map(|(phase, section)| {
            section
                .get("error")
                .and_then(Value::as_str)
                .map(|msg| (phase, msg))
        })
        .collect()
    }

    /// Numeric quality score by name, if present
    pub fn quality_score(&self, name: &str) -> Option<f64> {
        self.quality.get(name).and_then(Value::as_f64)
    }
}

fn flag(section: &Section, key: &str) -> bool {
    section.get(key).and_then(Value::as_bool).unwrap_or(false)
}

// =============================================================================
// Analysis Outcome
// =============================================================================

/// Per-file result: a report, or a failure with its message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum AnalysisOutcome {
    Completed(Box<AnalysisReport>),
    Failed(FailedAnalysis),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedAnalysis {
    pub path: PathBuf,
    pub error: String,
}

impl AnalysisOutcome {
    pub fn failed(path: impl Into<PathBuf>, error: impl Into<String>) -> Self {
        Self::Failed(FailedAnalysis {
            path: path.into(),
            error: error.into(),
        })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    pub fn report(&self) -> Option<&AnalysisReport> {
        match self {
            Self::Completed(report) => Some(report),
            Self::Failed(_) => None,
        }
    }

    pub fn status(&self) -> &'static str {
        match self {
            Self::Completed(_) => "completed",
            Self::Failed(_) => "failed",
        }
    }
}

// =============================================================================
// Enrichment
// =============================================================================

/// Insights added by an optional enrichment provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enrichment {
    pub model: String,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub risk_level: String,
    #[serde(default)]
    pub integrations: Vec<String>,
    #[serde(default)]
    pub confidence: f64,
    /// Why the provider's answer was replaced by the fallback
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Enrichment {
    /// Rule-based fallback used when no provider is configured or it failed
    pub fn fallback(error: Option<String>) -> Self {
        Self {
            model: "rule_based".to_string(),
            recommendations: vec![
                "AI enrichment not available - configure an enrichment provider".to_string(),
            ],
            risk_level: "unknown".to_string(),
            integrations: vec!["manual_review_recommended".to_string()],
            confidence: FALLBACK_CONFIDENCE,
            error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_report() -> AnalysisReport {
        AnalysisReport {
            record: FileRecord::from_bytes("a.txt", b"hello", None),
            category: Category::Text,
            structure: section(json!({"line_count": 1})),
            content: Section::new(),
            quality: section(json!({"readability": 0.0})),
            security: section(json!({"secrets_exposed": true, "pii_detected": false})),
            error: None,
            enrichment: None,
            analyzed_at: Utc::now(),
            duration_ms: 3,
        }
    }

    #[test]
    fn test_outcome_serializes_status_tag() {
        let failed = AnalysisOutcome::failed("missing.txt", "File not found");
        let value = serde_json::to_value(&failed).unwrap();
        assert_eq!(value["status"], "failed");
        assert_eq!(value["error"], "File not found");

        let completed = AnalysisOutcome::Completed(Box::new(sample_report()));
        let value = serde_json::to_value(&completed).unwrap();
        assert_eq!(value["status"], "completed");
        assert_eq!(value["category"], "text");
        assert_eq!(value["duration_ms"], 3);
        assert!(value.get("error").is_none());
    }

    #[test]
    fn test_flags_and_scores() {
        let report = sample_report();
        assert!(report.secrets_exposed());
        assert!(!report.pii_detected());
        assert_eq!(report.quality_score("readability"), Some(0.0));
        assert_eq!(report.quality_score("missing"), None);
    }

    #[test]
    fn test_phase_errors() {
        let mut report = sample_report();
        report.structure = error_section("bad json");
        assert_eq!(report.phase_errors(), vec![("structure", "bad json")]);
    }

    #[test]
    fn test_same_analysis_ignores_wall_clock_fields() {
        let a = sample_report();
        let mut b = a.clone();
        b.analyzed_at = a.analyzed_at + chrono::Duration::seconds(5);
        b.duration_ms = 40;
        assert!(a.same_analysis(&b));
        b.structure.insert("line_count".to_string(), json!(2));
        assert!(!a.same_analysis(&b));
    }

    #[test]
    fn test_section_wraps_non_objects() {
        let s = section(json!(3));
        assert_eq!(s.get("value"), Some(&json!(3)));
    }
}
