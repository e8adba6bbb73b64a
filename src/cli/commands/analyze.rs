//! Analyze Command
//!
//! Analyze a single file and print its report.

use std::path::PathBuf;
use std::time::Duration;

use tracing::info;

use crate::analyzer::{AnalysisHints, AnalyzerOptions, Category, FileClassifier};
use crate::cli::ui::Output;
use crate::cli::util::{is_json, load_config, print_json};
use crate::enrich::{create_enricher, enrich_report};
use crate::types::{AnalysisOutcome, Result, ScopeError};

pub struct AnalyzeOptions {
    pub file: PathBuf,
    pub category: Option<Category>,
    pub mime: Option<String>,
    pub enrich: bool,
    pub format: String,
}

pub async fn run(options: AnalyzeOptions) -> Result<()> {
    let config = load_config(|_| {})?;
    let classifier = FileClassifier::new(AnalyzerOptions::from(&config.analysis));
    let hints = AnalysisHints {
        forced_category: options.category,
        mime_override: options.mime,
    };

    let path = options.file.clone();
    let outcome = tokio::task::spawn_blocking(move || classifier.analyze_path(&path, &hints))
        .await
        .map_err(|e| ScopeError::Context(format!("Analysis task failed: {}", e)))?;

    let mut report = match outcome {
        AnalysisOutcome::Completed(report) => *report,
        AnalysisOutcome::Failed(failed) => {
            if is_json(&options.format) {
                print_json(&AnalysisOutcome::Failed(failed.clone()))?;
            }
            return Err(ScopeError::Context(failed.error));
        }
    };

    if options.enrich {
        let enricher = create_enricher(&config.enrichment)?;
        info!(enricher = enricher.name(), "Enriching report");
        let timeout = Duration::from_secs(config.enrichment.timeout_secs);
        report = enrich_report(enricher.as_ref(), report, timeout).await;
    }

    if is_json(&options.format) {
        print_json(&AnalysisOutcome::Completed(Box::new(report)))
    } else {
        Output::new().report(&report);
        Ok(())
    }
}
