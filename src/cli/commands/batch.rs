//! Batch Command
//!
//! Analyze every file under a directory.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

use crate::analyzer::BatchAnalyzer;
use crate::cli::ui::Output;
use crate::cli::util::{is_json, load_config, print_json};
use crate::metrics::ProcessingCounters;
use crate::types::Result;

pub struct BatchOptions {
    pub dir: PathBuf,
    pub concurrency: Option<usize>,
    pub hidden: bool,
    pub format: String,
}

pub async fn run(options: BatchOptions) -> Result<()> {
    let config = load_config(|config| {
        if let Some(concurrency) = options.concurrency {
            config.analysis.concurrency = concurrency;
        }
        if options.hidden {
            config.analysis.include_hidden = true;
        }
    })?;

    let counters = Arc::new(ProcessingCounters::new());
    let analyzer = BatchAnalyzer::new(config.analysis).with_counters(counters.clone());
    let report = analyzer.analyze_dir(&options.dir).await?;

    debug!(counters = ?counters.snapshot(), "Batch finished");

    if is_json(&options.format) {
        print_json(&report)
    } else {
        Output::new().batch(&report);
        Ok(())
    }
}
