use std::fmt::Debug;
use std::hash::Hash;

use num_traits::AsPrimitive;

use crate::HistogramSnapshot;

/// A numeric type that measurements may be reported in.
///
/// Implemented for all primitive numeric types. Values are converted to `f64` once,
/// when they are reported, and all further processing happens in `f64`.
pub trait Number: AsPrimitive<f64> + Debug + Send + Sync {}

impl<T> Number for T where T: AsPrimitive<f64> + Debug + Send + Sync {}

/// A set of attributes identifying the dimensional context of a measurement.
///
/// Measurements are aggregated separately for each distinct attribute set, as determined
/// by `Eq` and `Hash`. The attribute set is cloned when it is seen for the first time
/// in a collection cycle.
pub trait AttributeSet: Eq + Hash + Clone + Debug + Send {}

impl<T> AttributeSet for T where T: Eq + Hash + Clone + Debug + Send {}

/// Aggregates measurements into per-attribute-set histograms.
///
/// Implemented by [`DeltaHistogram`][crate::DeltaHistogram] and
/// [`CumulativeHistogram`][crate::CumulativeHistogram], which differ in whether state is
/// reset after each collection.
///
/// # Example
///
/// ```
/// use bucketeer::{Aggregator, CumulativeHistogram, DeltaHistogram, HistogramConfig};
///
/// fn record_requests(aggregator: &dyn Aggregator<i64, &'static str>) {
///     aggregator.aggregate(12, &"GET");
///     aggregator.aggregate(40, &"GET");
/// }
///
/// let config = HistogramConfig::default();
///
/// let delta = DeltaHistogram::<i64, &str>::new(&config);
/// let cumulative = CumulativeHistogram::<i64, &str>::new(&config);
///
/// record_requests(&delta);
/// record_requests(&cumulative);
///
/// assert_eq!(delta.collect().data_points()[0].count(), 2);
/// assert_eq!(cumulative.collect().data_points()[0].count(), 2);
/// ```
pub trait Aggregator<N, A>: Debug + Send + Sync
where
    N: Number,
    A: AttributeSet,
{
    /// Records one measurement for the given attribute set.
    ///
    /// May be called concurrently from any number of threads.
    fn aggregate(&self, value: N, attributes: &A);

    /// Produces a snapshot of the aggregated data and ends the current collection cycle.
    ///
    /// The returned snapshot shares no mutable state with the aggregator.
    fn collect(&self) -> HistogramSnapshot<A>;
}
