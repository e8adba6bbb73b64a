//! Per-file analysis context
//!
//! Holds the decoded snapshot shared by all four phases, plus lazily parsed
//! intermediate forms so each format is parsed at most once per file.

use std::cell::OnceCell;

use super::code::CodeStats;
use super::data::DataShape;
use super::text::TextStats;
use crate::config::AnalysisConfig;
use crate::constants::data::DEFAULT_SAMPLE_ROWS;
use crate::types::FileRecord;

/// Knobs that change analysis output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzerOptions {
    /// Rows sampled for column type inference
    pub sample_rows: usize,
    /// Replace invalid UTF-8 instead of failing the decode
    pub lossy_decode: bool,
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        Self {
            sample_rows: DEFAULT_SAMPLE_ROWS,
            lossy_decode: false,
        }
    }
}

impl From<&AnalysisConfig> for AnalyzerOptions {
    fn from(config: &AnalysisConfig) -> Self {
        Self {
            sample_rows: config.csv_sample_rows,
            lossy_decode: config.lossy_decode,
        }
    }
}

pub struct FileContext<'a> {
    pub record: &'a FileRecord,
    /// Decoded content; empty for categories that are not text-bearing
    pub text: &'a str,
    pub options: &'a AnalyzerOptions,
    code_stats: OnceCell<CodeStats>,
    text_stats: OnceCell<TextStats>,
    data_shape: OnceCell<Result<DataShape, String>>,
}

impl<'a> FileContext<'a> {
    pub fn new(record: &'a FileRecord, text: &'a str, options: &'a AnalyzerOptions) -> Self {
        Self {
            record,
            text,
            options,
            code_stats: OnceCell::new(),
            text_stats: OnceCell::new(),
            data_shape: OnceCell::new(),
        }
    }

    /// Extension without the leading dot, or `"unknown"`
    pub fn format(&self) -> String {
        match self.record.extension.strip_prefix('.') {
            Some(ext) if !ext.is_empty() => ext.to_string(),
            _ => "unknown".to_string(),
        }
    }

    pub fn code_stats(&self) -> &CodeStats {
        self.code_stats.get_or_init(|| CodeStats::measure(self.text))
    }

    pub fn text_stats(&self) -> &TextStats {
        self.text_stats.get_or_init(|| TextStats::measure(self.text))
    }

    /// Parsed data shape, or the parse error message
    pub fn data_shape(&self) -> &Result<DataShape, String> {
        self.data_shape
            .get_or_init(|| DataShape::parse(self).map_err(|e| e.to_string()))
    }
}
