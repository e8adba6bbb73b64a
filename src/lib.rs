//! filescope - Heuristic File Categorization and Analysis
//!
//! Maps a file to one of a fixed set of categories from its extension and
//! MIME type, then runs lightweight, deterministic heuristics over its bytes:
//! structural counts, crude complexity and readability scores, and naive
//! secret/PII keyword flags.
//!
//! ## Quick Start
//!
//! ```ignore
//! use filescope::{AnalysisHints, FileClassifier};
//!
//! let classifier = FileClassifier::default();
//! let report = classifier.analyze_bytes("main.py", b"def main():\n    pass\n", &AnalysisHints::default());
//! assert_eq!(report.category, filescope::Category::Code);
//! ```
//!
//! ## Modules
//!
//! - [`analyzer`]: Category rules, per-category phases, scanning and batches
//! - [`enrich`]: Optional model-generated insights with a rule-based fallback
//! - [`metrics`]: Injected processing counters
//! - [`config`]: Layered configuration
//! - [`types`]: Records, reports and errors

pub mod analyzer;
pub mod cli;
pub mod config;
pub mod constants;
pub mod enrich;
pub mod metrics;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

// Configuration
pub use config::{AnalysisConfig, Config, ConfigLoader, EnrichmentConfig, EnrichmentProvider};

// Error Types
pub use types::error::{Result, ResultExt, ScopeError};

// Records and Reports
pub use types::{AnalysisOutcome, AnalysisReport, Enrichment, FailedAnalysis, FileRecord, Section};

// =============================================================================
// Analyzer Re-exports
// =============================================================================

pub use analyzer::{
    AnalysisHints, AnalyzerOptions, BatchAnalyzer, BatchReport, BatchSummary, Category,
    FileClassifier, FileScanner, classify,
};

// =============================================================================
// Enrichment Re-exports
// =============================================================================

pub use enrich::{Enricher, NoopEnricher, OpenAiEnricher, SharedEnricher, create_enricher, enrich_report};

pub use metrics::{CounterSnapshot, ProcessingCounters};
