// Sprint productivity metrics
// Derives time spent, process, cycle and lead times from normalized issues

pub mod aggregator;
pub mod reports;
pub mod types;

pub use aggregator::MetricsAggregator;
pub use reports::SprintSummary;
pub use types::*;
