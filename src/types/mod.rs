pub mod error;
pub mod record;
pub mod report;

pub use error::{Result, ResultExt, ScopeError};
pub use record::FileRecord;
pub use report::{
    AnalysisOutcome, AnalysisReport, Enrichment, FailedAnalysis, Section, error_section, section,
};
