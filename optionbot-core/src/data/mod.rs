//! Market data: tick aggregation, bounded histories, snapshots.

pub mod aggregator;
pub mod series;
pub mod snapshot;

pub use aggregator::CandleAggregator;
pub use series::BoundedSeries;
pub use snapshot::{MarketSnapshot, NotReady, SnapshotBuilder, MIN_CANDLES, MIN_OI_SAMPLES};
