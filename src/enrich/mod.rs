//! Optional Report Enrichment
//!
//! An [`Enricher`] adds model-generated insights to a report that already
//! exists. It never changes the core sections: [`enrich_report`] falls back to
//! the rule-based [`Enrichment`] on error or timeout.

mod openai;
mod timeout;

pub use openai::OpenAiEnricher;
pub use timeout::with_timeout;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use crate::config::{EnrichmentConfig, EnrichmentProvider};
use crate::types::{AnalysisReport, Enrichment, Result};

/// Shared enricher type for concurrent access
pub type SharedEnricher = Arc<dyn Enricher>;

#[async_trait]
pub trait Enricher: Send + Sync {
    async fn enrich(&self, report: &AnalysisReport) -> Result<Enrichment>;

    /// Provider name for logging
    fn name(&self) -> &str;
}

/// Used when no provider is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEnricher;

#[async_trait]
impl Enricher for NoopEnricher {
    async fn enrich(&self, _report: &AnalysisReport) -> Result<Enrichment> {
        Ok(Enrichment::fallback(None))
    }

    fn name(&self) -> &str {
        "none"
    }
}

/// Create a shared enricher from configuration
pub fn create_enricher(config: &EnrichmentConfig) -> Result<SharedEnricher> {
    match config.provider {
        EnrichmentProvider::None => Ok(Arc::new(NoopEnricher)),
        EnrichmentProvider::OpenAi => Ok(Arc::new(OpenAiEnricher::new(config)?)),
    }
}

/// Return `report` with an enrichment attached.
///
/// Errors and timeouts produce the fallback enrichment with `error` set; the
/// structure, content, quality and security sections are carried over as is.
pub async fn enrich_report(
    enricher: &dyn Enricher,
    report: AnalysisReport,
    timeout: Duration,
) -> AnalysisReport {
    let result = with_timeout(timeout, enricher.enrich(&report), "enrichment").await;
    let enrichment = result.unwrap_or_else(|e| {
        warn!(
            enricher = enricher.name(),
            path = %report.record.path.display(),
            error = %e,
            "Enrichment failed, using fallback"
        );
        Enrichment::fallback(Some(e.to_string()))
    });

    AnalysisReport {
        enrichment: Some(enrichment),
        ..report
    }
}
