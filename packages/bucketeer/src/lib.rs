#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! # bucketeer
//!
//! Explicit-bucket histogram aggregation for metrics pipelines.
//!
//! Measurements are reported one at a time, each tagged with an attribute set. For every
//! distinct attribute set, the aggregator maintains a bucketed distribution:
//!
//! * Count of measurements (`u64`).
//! * Sum of measurement values (`f64`, regardless of the reported numeric type).
//! * (Optional) Minimum and maximum measured value.
//! * Per-bucket counts against a fixed list of bucket boundaries.
//!
//! On each collection cycle, the aggregator produces an isolated [`HistogramSnapshot`] that
//! shares nothing mutable with the live aggregator state.
//!
//! # Temporality
//!
//! Two aggregators are provided, differing in how state evolves across collections:
//!
//! * [`DeltaHistogram`] reports only the measurements made since the previous collection.
//!   Every collection starts a fresh generation, forgetting all attribute sets seen so far.
//! * [`CumulativeHistogram`] reports all measurements made since the aggregator was created.
//!   Attribute sets are never forgotten.
//!
//! ```
//! use bucketeer::{Aggregator, DeltaHistogram, HistogramConfig};
//!
//! let config = HistogramConfig::builder()
//!     .boundaries(&[10.0, 50.0, 100.0])
//!     .build()
//!     .unwrap();
//!
//! let histogram = DeltaHistogram::<i64, &str>::new(&config);
//!
//! histogram.aggregate(7, &"GET");
//! histogram.aggregate(75, &"GET");
//! histogram.aggregate(500, &"POST");
//!
//! let snapshot = histogram.collect();
//! assert_eq!(snapshot.data_points().len(), 2);
//!
//! // The delta aggregator forgets everything once collected.
//! assert!(histogram.collect().data_points().is_empty());
//! ```
//!
//! # Buckets
//!
//! Each boundary is the inclusive upper edge of its bucket. With boundaries `[1, 5]` there
//! are three buckets: `(-inf, 1]`, `(1, 5]` and `(5, +inf)`. A value exactly equal to a
//! boundary lands in the bucket below it. An empty boundary list yields a single bucket
//! that accepts every value.
//!
//! # Thread safety
//!
//! Aggregators are `Send + Sync`. Any number of threads may call
//! [`aggregate()`][Aggregator::aggregate] concurrently with each other and with one
//! [`collect()`][Aggregator::collect]. Every measurement is applied exactly once to exactly
//! one collection cycle.
//!
//! # Panic policy
//!
//! Invalid bucket boundaries are rejected when building a [`HistogramConfig`], returning an
//! [`Error`]. Aggregation and collection never fail.
//!
//! # Mathematics policy
//!
//! Counters use wrapping arithmetic. Observing more than `u64::MAX` measurements for a single
//! attribute set will mangle the data instead of panicking.

mod aggregator;
mod bucket_set;
mod clock;
mod config;
mod cumulative;
mod delta;
mod error;
mod generation;
mod snapshot;

pub use aggregator::*;
pub(crate) use bucket_set::*;
pub use clock::*;
pub use config::*;
pub use cumulative::*;
pub use delta::*;
pub use error::Error;
pub(crate) use error::Result;
pub(crate) use generation::*;
pub use snapshot::*;

/// Private API surface for benchmarks. Not part of the public API contract.
#[doc(hidden)]
pub mod private {
    pub use crate::bucket_set::find_bucket_index;
}
