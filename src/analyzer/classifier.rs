//! File Classifier
//!
//! Entry point for single-file analysis. [`FileClassifier::analyze_bytes`] is
//! pure apart from the `analyzed_at` timestamp; [`FileClassifier::analyze_path`]
//! adds exactly one read of the file.

use std::borrow::Cow;
use std::path::Path;
use std::time::Instant;

use chrono::Utc;
use tracing::{debug, warn};

use super::category::{Category, classify};
use super::context::{AnalyzerOptions, FileContext};
use super::{data, phases};
use crate::types::{
    AnalysisOutcome, AnalysisReport, FileRecord, Result, ResultExt, ScopeError, Section,
    error_section,
};

/// Caller-supplied overrides for one analysis
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisHints {
    /// Skip rule matching and use this category
    pub forced_category: Option<Category>,
    /// Replace the guessed MIME type before classification
    pub mime_override: Option<String>,
}

impl AnalysisHints {
    pub fn with_category(mut self, category: Category) -> Self {
        self.forced_category = Some(category);
        self
    }

    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime_override = Some(mime.into());
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct FileClassifier {
    options: AnalyzerOptions,
}

impl FileClassifier {
    pub fn new(options: AnalyzerOptions) -> Self {
        Self { options }
    }

    pub fn classify_record(&self, record: &FileRecord, hints: &AnalysisHints) -> Category {
        hints
            .forced_category
            .unwrap_or_else(|| classify(&record.extension, record.mime_type.as_deref()))
    }

    /// Analyze a byte snapshot attributed to `path`. Never fails: decode and
    /// parse problems are reported inside the returned report.
    pub fn analyze_bytes(
        &self,
        path: impl AsRef<Path>,
        bytes: &[u8],
        hints: &AnalysisHints,
    ) -> AnalysisReport {
        let start = Instant::now();
        let record = FileRecord::from_bytes(path, bytes, hints.mime_override.as_deref());
        let category = self.classify_record(&record, hints);

        let text = if decodes_text(category, &record) {
            match self.decode(&record, bytes) {
                Ok(text) => text,
                Err(e) => {
                    debug!(path = %record.path.display(), error = %e, "Decode failed");
                    let error = Some(e.to_string());
                    return Self::assemble(record, category, Default::default(), error, start);
                }
            }
        } else {
            Cow::Borrowed("")
        };

        let ctx = FileContext::new(&record, &text, &self.options);
        let sections = [
            run_phase("structure", phases::structure(category, &ctx)),
            run_phase("content", phases::content(category, &ctx)),
            run_phase("quality", phases::quality(category, &ctx)),
            run_phase("security", phases::security(category, &ctx)),
        ];
        drop(ctx);

        Self::assemble(record, category, sections, None, start)
    }

    /// Read `path` once and analyze it. An unreadable file is the only
    /// condition that yields [`AnalysisOutcome::Failed`].
    pub fn analyze_path(&self, path: impl AsRef<Path>, hints: &AnalysisHints) -> AnalysisOutcome {
        let path = path.as_ref();
        match read_snapshot(path) {
            Ok(bytes) => {
                AnalysisOutcome::Completed(Box::new(self.analyze_bytes(path, &bytes, hints)))
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Cannot read file");
                AnalysisOutcome::failed(path, e.to_string())
            }
        }
    }

    fn decode<'b>(&self, record: &FileRecord, bytes: &'b [u8]) -> Result<Cow<'b, str>> {
        match std::str::from_utf8(bytes) {
            Ok(text) => Ok(Cow::Borrowed(text)),
            Err(_) if self.options.lossy_decode => Ok(String::from_utf8_lossy(bytes)),
            Err(e) => Err(ScopeError::Decode {
                path: record.path.clone(),
                message: e.to_string(),
            }),
        }
    }

    fn assemble(
        record: FileRecord,
        category: Category,
        [structure, content, quality, security]: [Section; 4],
        error: Option<String>,
        start: Instant,
    ) -> AnalysisReport {
        AnalysisReport {
            record,
            category,
            structure,
            content,
            quality,
            security,
            error,
            enrichment: None,
            analyzed_at: Utc::now(),
            duration_ms: start.elapsed().as_millis() as u64,
        }
    }
}

/// Text-bearing categories are decoded, except binary data formats
fn decodes_text(category: Category, record: &FileRecord) -> bool {
    category.is_text_bearing()
        && !(category == Category::Data && data::is_opaque_format(&record.extension))
}

fn read_snapshot(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context_fn(|| format!("Cannot read {}", path.display()))
}

fn run_phase(phase: &'static str, result: Result<Section>) -> Section {
    result.unwrap_or_else(|e| {
        debug!(phase, error = %e, "Analysis phase failed");
        error_section(e.to_string())
    })
}
