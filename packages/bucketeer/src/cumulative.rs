use std::marker::PhantomData;
use std::sync::Arc;
use std::time::SystemTime;

use num_traits::AsPrimitive;
use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::snapshot::copy_data_points;
use crate::{
    Aggregator, AttributeSet, Clock, Generation, HistogramConfig, HistogramSnapshot, Number,
    SystemClock, Temporality,
};

/// Histogram aggregator that reports all measurements made since it was created.
///
/// State is never reset and attribute sets are never forgotten. Every collection
/// deep-copies the live state, so the returned snapshot and the aggregator never
/// affect each other afterwards. For any attribute set, the count and every bucket
/// count are non-decreasing across collections.
///
/// # Example
///
/// ```
/// use bucketeer::{Aggregator, CumulativeHistogram, HistogramConfig};
///
/// let config = HistogramConfig::builder()
///     .boundaries(&[1.0, 5.0])
///     .build()
///     .unwrap();
///
/// let histogram = CumulativeHistogram::<f64, &str>::new(&config);
///
/// histogram.aggregate(0.5, &"alice");
/// assert_eq!(histogram.collect().data_points()[0].count(), 1);
///
/// histogram.aggregate(7.5, &"alice");
/// let snapshot = histogram.collect();
/// assert_eq!(snapshot.data_points()[0].count(), 2);
/// assert_eq!(snapshot.data_points()[0].bucket_counts(), &[1, 0, 1]);
/// ```
#[derive(Debug)]
pub struct CumulativeHistogram<N, A, C = SystemClock> {
    record_min_max: bool,
    clock: C,

    /// Every cycle reports this as its start time.
    start_time: SystemTime,

    generation: Mutex<Generation<A>>,

    _number: PhantomData<fn(N)>,
}

impl<N, A> CumulativeHistogram<N, A, SystemClock>
where
    N: Number,
    A: AttributeSet,
{
    /// Creates a cumulative histogram that takes timestamps from the system clock.
    #[must_use]
    pub fn new(config: &HistogramConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<N, A, C> CumulativeHistogram<N, A, C>
where
    N: Number,
    A: AttributeSet,
    C: Clock,
{
    /// Creates a cumulative histogram that takes timestamps from the given clock.
    ///
    /// The clock is read once immediately, to determine the start time reported by
    /// every collection.
    #[must_use]
    pub fn with_clock(config: &HistogramConfig, clock: C) -> Self {
        let start_time = clock.now();

        debug!(
            buckets = config.boundaries().len(),
            record_min_max = config.record_min_max(),
            "created cumulative histogram"
        );

        Self {
            record_min_max: config.record_min_max(),
            clock,
            start_time,
            generation: Mutex::new(Generation::new(Arc::clone(config.shared_boundaries()))),
            _number: PhantomData,
        }
    }
}

impl<N, A, C> Aggregator<N, A> for CumulativeHistogram<N, A, C>
where
    N: Number,
    A: AttributeSet,
    C: Clock,
{
    fn aggregate(&self, value: N, attributes: &A) {
        let value = value.as_();

        self.generation.lock().record(value, attributes);
    }

    fn collect(&self) -> HistogramSnapshot<A> {
        let data_points = {
            let generation = self.generation.lock();

            let time = self.clock.now();
            copy_data_points(&generation, self.start_time, time, self.record_min_max)
        };

        trace!(
            temporality = %Temporality::Cumulative,
            data_points = data_points.len(),
            "collected histogram"
        );

        HistogramSnapshot::new(Temporality::Cumulative, data_points)
    }
}
