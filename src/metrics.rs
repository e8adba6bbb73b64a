//! Processing Counters
//!
//! Thread-safe tallies of analyzed files, shared through an `Arc` by whoever
//! drives analysis. There is no process-wide instance.
//!
//! ```ignore
//! let counters = Arc::new(ProcessingCounters::new());
//! let analyzer = BatchAnalyzer::new(config).with_counters(counters.clone());
//! analyzer.analyze_dir(root).await?;
//! println!("{}", counters.snapshot().files_processed);
//! ```

use std::collections::BTreeMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use serde::Serialize;

use crate::analyzer::Category;

/// Uses atomic operations for counters and an `RwLock` for the per-category map.
#[derive(Debug)]
pub struct ProcessingCounters {
    start_time: Instant,
    files_processed: AtomicU64,
    files_failed: AtomicU64,
    bytes_processed: AtomicU64,
    by_category: RwLock<BTreeMap<Category, u64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CounterSnapshot {
    pub files_processed: u64,
    pub files_failed: u64,
    pub bytes_processed: u64,
    pub by_category: BTreeMap<Category, u64>,
    pub uptime_secs: f64,
}

impl Default for ProcessingCounters {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessingCounters {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            files_processed: AtomicU64::new(0),
            files_failed: AtomicU64::new(0),
            bytes_processed: AtomicU64::new(0),
            by_category: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn record_success(&self, category: Category, bytes: u64) {
        self.files_processed.fetch_add(1, Ordering::Relaxed);
        self.bytes_processed.fetch_add(bytes, Ordering::Relaxed);
        if let Ok(mut map) = self.by_category.write() {
            *map.entry(category).or_insert(0) += 1;
        }
    }

    pub fn record_failure(&self) {
        self.files_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            files_processed: self.files_processed.load(Ordering::Relaxed),
            files_failed: self.files_failed.load(Ordering::Relaxed),
            bytes_processed: self.bytes_processed.load(Ordering::Relaxed),
            by_category: self
                .by_category
                .read()
                .map(|m| m.clone())
                .unwrap_or_default(),
            uptime_secs: self.start_time.elapsed().as_secs_f64(),
        }
    }
}
