pub mod stats;

pub use stats::{BucketSummary, StatsHelper};
