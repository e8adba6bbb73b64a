//! File Analyzer Module
//!
//! Provides deterministic, per-category file heuristics:
//! - Category detection from extension and MIME type
//! - Structure, content, quality and security phases per category
//! - Directory scanning with gitignore support and concurrent batch analysis

pub mod batch;
pub mod category;
pub mod classifier;
pub mod code;
pub mod config_file;
pub mod context;
pub mod data;
pub mod opaque;
pub mod phases;
pub mod scanner;
pub mod security;
pub mod text;

pub use batch::{BatchAnalyzer, BatchEntry, BatchReport, BatchSummary};
pub use category::{Category, classify};
pub use classifier::{AnalysisHints, FileClassifier};
pub use context::AnalyzerOptions;
pub use scanner::FileScanner;
