//! Stats module - grouped descriptive statistics

mod aggregator;
mod summary;

pub use aggregator::Aggregator;
pub use summary::{GroupSummary, ProvinceField, SummaryStat};
