//! Batch Analysis
//!
//! Analyzes many files concurrently. Each file is read and analyzed on the
//! blocking pool, with at most `concurrency` files in flight. A file that
//! cannot be read (or whose task panics) becomes a `failed` entry; the batch
//! itself only fails when the root directory is missing or not a directory.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::category::Category;
use super::classifier::{AnalysisHints, FileClassifier};
use super::context::AnalyzerOptions;
use super::scanner::FileScanner;
use crate::config::AnalysisConfig;
use crate::metrics::ProcessingCounters;
use crate::types::{AnalysisOutcome, Result, ScopeError};

// =============================================================================
// Report Types
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchEntry {
    pub path: PathBuf,
    pub outcome: AnalysisOutcome,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub by_category: BTreeMap<Category, usize>,
    pub total_bytes: u64,
    /// Files whose security section flags secrets
    pub secrets_flagged: usize,
    pub pii_flagged: usize,
    /// Mean maintainability over code files, if any
    pub average_maintainability: Option<f64>,
    /// `path: message` for every failed file
    pub failures: Vec<String>,
    /// `path: phase: message` for decode errors and failed phases
    pub partial_failures: Vec<String>,
}

impl BatchSummary {
    pub fn from_entries(entries: &[BatchEntry]) -> Self {
        let mut summary = Self::default();
        let mut maintainability = Vec::new();

        for entry in entries {
            let path = entry.path.display();
            let report = match &entry.outcome {
                AnalysisOutcome::Completed(report) => report,
                AnalysisOutcome::Failed(failed) => {
                    summary.failures.push(format!("{}: {}", path, failed.error));
                    continue;
                }
            };

            *summary.by_category.entry(report.category).or_insert(0) += 1;
            summary.total_bytes += report.record.size_bytes;
            summary.secrets_flagged += usize::from(report.secrets_exposed());
            summary.pii_flagged += usize::from(report.pii_detected());

            if let Some(error) = &report.error {
                summary.partial_failures.push(format!("{}: decode: {}", path, error));
            }
            for (phase, message) in report.phase_errors() {
                summary
                    .partial_failures
                    .push(format!("{}: {}: {}", path, phase, message));
            }

            if report.category == Category::Code
                && let Some(score) = report.quality_score("maintainability")
            {
                maintainability.push(score);
            }
        }

        if !maintainability.is_empty() {
            summary.average_maintainability =
                Some(maintainability.iter().sum::<f64>() / maintainability.len() as f64);
        }
        summary
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    /// Scanned directory; absent for explicit path lists
    pub root: Option<PathBuf>,
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub total_files: usize,
    pub files_analyzed: usize,
    pub files_failed: usize,
    /// Files over the size limit, never read
    pub files_skipped: usize,
    /// Sorted by path
    pub results: Vec<BatchEntry>,
    pub summary: BatchSummary,
}

// =============================================================================
// Batch Analyzer
// =============================================================================

pub struct BatchAnalyzer {
    classifier: Arc<FileClassifier>,
    config: AnalysisConfig,
    counters: Option<Arc<ProcessingCounters>>,
}

impl BatchAnalyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        let classifier = FileClassifier::new(AnalyzerOptions::from(&config));
        Self {
            classifier: Arc::new(classifier),
            config,
            counters: None,
        }
    }

    pub fn with_counters(mut self, counters: Arc<ProcessingCounters>) -> Self {
        self.counters = Some(counters);
        self
    }

    fn concurrency(&self) -> usize {
        self.config.concurrency.max(1)
    }

    /// Scan `root` and analyze every listed file
    pub async fn analyze_dir(&self, root: impl AsRef<Path>) -> Result<BatchReport> {
        let root = root.as_ref().to_path_buf();
        let scanner = FileScanner::from_config(&root, &self.config);
        let scan = tokio::task::spawn_blocking(move || scanner.scan())
            .await
            .map_err(|e| ScopeError::Context(format!("Directory scan failed: {}", e)))??;

        info!(
            root = %root.display(),
            files = scan.files.len(),
            bytes = scan.files.iter().map(|f| f.size).sum::<u64>(),
            skipped = scan.skipped.len(),
            "Scanned directory"
        );

        let paths = scan.files.into_iter().map(|f| f.path).collect();
        let mut report = self.run(Some(root), paths).await;
        report.files_skipped = scan.skipped.len();
        Ok(report)
    }

    /// Analyze an explicit list of files
    pub async fn analyze_paths(&self, paths: Vec<PathBuf>) -> BatchReport {
        self.run(None, paths).await
    }

    async fn run(&self, root: Option<PathBuf>, paths: Vec<PathBuf>) -> BatchReport {
        let started_at = Utc::now();
        let start = Instant::now();
        let total_files = paths.len();

        let mut stream = futures::stream::iter(paths)
            .map(|path| {
                let classifier = Arc::clone(&self.classifier);
                async move {
                    let task_path = path.clone();
                    let joined = tokio::task::spawn_blocking(move || {
                        classifier.analyze_path(&task_path, &AnalysisHints::default())
                    })
                    .await;

                    let outcome = joined.unwrap_or_else(|e| {
                        warn!(path = %path.display(), error = %e, "Analysis task failed");
                        AnalysisOutcome::failed(&path, format!("Analysis task failed: {}", e))
                    });
                    BatchEntry { path, outcome }
                }
            })
            .buffer_unordered(self.concurrency());

        let mut results = Vec::with_capacity(total_files);
        while let Some(entry) = stream.next().await {
            if let Some(counters) = &self.counters {
                match entry.outcome.report() {
                    Some(report) => counters.record_success(report.category, report.record.size_bytes),
                    None => counters.record_failure(),
                }
            }
            debug!(path = %entry.path.display(), status = entry.outcome.status(), "Analyzed");
            results.push(entry);
        }
        results.sort_by(|a, b| a.path.cmp(&b.path));

        let files_failed = results.iter().filter(|e| e.outcome.is_failed()).count();
        let summary = BatchSummary::from_entries(&results);

        BatchReport {
            root,
            run_id: Uuid::new_v4(),
            started_at,
            duration_ms: start.elapsed().as_millis() as u64,
            total_files,
            files_analyzed: total_files - files_failed,
            files_failed,
            files_skipped: 0,
            results,
            summary,
        }
    }
}
