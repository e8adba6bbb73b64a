use console::style;
use serde_json::Value;

use crate::analyzer::{BatchReport, BatchSummary};
use crate::cli::util::percent;
use crate::types::{AnalysisReport, Enrichment, Section};

pub struct Output;

impl Output {
    pub fn new() -> Self {
        Self
    }

    pub fn success(&self, message: &str) {
        println!("{} {}", style("✓").green(), message);
    }

    pub fn error(&self, message: &str) {
        eprintln!("{} {}", style("✗").red(), message);
    }

    pub fn warning(&self, message: &str) {
        println!("{} {}", style("⚠").yellow(), message);
    }

    pub fn info(&self, message: &str) {
        println!("{} {}", style("ℹ").blue(), message);
    }

    pub fn header(&self, message: &str) {
        println!("\n{}", style(message).bold().underlined());
    }

    pub fn section(&self, message: &str) {
        println!("\n{}", style(message).bold());
        println!("{}", "─".repeat(40));
    }

    pub fn field(&self, label: &str, value: impl std::fmt::Display) {
        println!("  {:<24} {}", style(label).dim(), value);
    }

    fn phase(&self, title: &str, section: &Section) {
        self.section(title);
        if section.is_empty() {
            println!("  {}", style("(empty)").dim());
        }
        for (key, value) in section {
            self.field(key, render_value(value));
        }
    }

    pub fn report(&self, report: &AnalysisReport) {
        let record = &report.record;
        self.header(&format!("{} ({})", record.path.display(), report.category));
        self.field("size", &record.size_human);
        self.field("mime type", record.mime_type.as_deref().unwrap_or("unknown"));
        self.field("sha256", &record.content_hash);
        self.field("duration", format!("{} ms", report.duration_ms));

        if let Some(error) = &report.error {
            self.warning(error);
        }

        self.phase("Structure", &report.structure);
        self.phase("Content", &report.content);
        self.phase("Quality", &report.quality);
        self.phase("Security", &report.security);

        if let Some(enrichment) = &report.enrichment {
            self.enrichment(enrichment);
        }

        if report.secrets_exposed() {
            self.warning("Possible secrets found; review before sharing this file");
        }
    }

    fn enrichment(&self, enrichment: &Enrichment) {
        self.section("Enrichment");
        self.field("model", &enrichment.model);
        self.field("risk level", &enrichment.risk_level);
        self.field("confidence", percent(enrichment.confidence));
        for recommendation in &enrichment.recommendations {
            println!("  • {}", recommendation);
        }
        if let Some(error) = &enrichment.error {
            self.warning(&format!("Fallback used: {}", error));
        }
    }

    pub fn batch(&self, report: &BatchReport) {
        let root = report
            .root
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(explicit paths)".to_string());
        self.header(&format!("Batch analysis of {}", root));
        self.field("run id", report.run_id);
        self.field("files", report.total_files);
        self.field("analyzed", report.files_analyzed);
        self.field("failed", report.files_failed);
        self.field("skipped (too large)", report.files_skipped);
        self.field("duration", format!("{} ms", report.duration_ms));

        self.section("Files");
        for entry in &report.results {
            match entry.outcome.report() {
                Some(r) => println!(
                    "  {} {:<10} {}",
                    style("✓").green(),
                    r.category.as_str(),
                    entry.path.display()
                ),
                None => println!(
                    "  {} {:<10} {}",
                    style("✗").red(),
                    "failed",
                    entry.path.display()
                ),
            }
        }

        self.summary(&report.summary);
    }

    fn summary(&self, summary: &BatchSummary) {
        self.section("Summary");
        for (category, count) in &summary.by_category {
            self.field(category.as_str(), count);
        }
        self.field("total size", crate::types::record::format_size(summary.total_bytes));
        self.field("secrets flagged", summary.secrets_flagged);
        self.field("pii flagged", summary.pii_flagged);
        if let Some(score) = summary.average_maintainability {
            self.field("avg maintainability", percent(score));
        }

        for failure in &summary.failures {
            self.error(failure);
        }
        for partial in &summary.partial_failures {
            self.warning(partial);
        }
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

/// Compact single-line rendering of a section value
fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() => format!("{:.3}", f),
            _ => n.to_string(),
        },
        Value::Array(items) if items.is_empty() => "-".to_string(),
        Value::Array(items) => items
            .iter()
            .map(render_value)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}
