use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::info;

/// Tracker API usage counters for one client
#[derive(Debug, Default)]
pub struct TrackerApiMetrics {
    pub total_requests: AtomicU64,
    pub pages: AtomicU64,
    pub issues: AtomicU64,
    pub errors: AtomicU64,
}

impl TrackerApiMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_request(&self) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_page(&self, issue_count: u64) {
        self.pages.fetch_add(1, Ordering::Relaxed);
        self.issues.fetch_add(issue_count, Ordering::Relaxed);
    }

    pub fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_stats(&self) -> TrackerApiStats {
        TrackerApiStats {
            total_requests: self.total_requests.load(Ordering::Relaxed),
            pages: self.pages.load(Ordering::Relaxed),
            issues: self.issues.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
        }
    }

    pub fn log_stats(&self) {
        let stats = self.get_stats();
        info!(
            "Tracker API metrics: requests={}, pages={}, issues={}, errors={}",
            stats.total_requests, stats.pages, stats.issues, stats.errors
        );
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerApiStats {
    pub total_requests: u64,
    pub pages: u64,
    pub issues: u64,
    pub errors: u64,
}

/// Time an operation and log its duration when finished
pub struct OperationTimer {
    operation: String,
    start: Instant,
}

impl OperationTimer {
    pub fn new(operation: &str) -> Self {
        Self {
            operation: operation.to_string(),
            start: Instant::now(),
        }
    }

    pub fn finish(self) -> u128 {
        let duration_ms = self.start.elapsed().as_millis();
        info!(
            operation = %self.operation,
            duration_ms,
            "Operation completed"
        );
        duration_ms
    }
}
