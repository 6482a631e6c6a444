use std::marker::PhantomData;
use std::mem;
use std::sync::Arc;
use std::time::SystemTime;

use num_traits::AsPrimitive;
use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::snapshot::drain_data_points;
use crate::{
    Aggregator, AttributeSet, Clock, Generation, HistogramConfig, HistogramSnapshot, Number,
    SystemClock, Temporality,
};

/// Histogram aggregator that reports only the measurements made since the previous
/// collection.
///
/// Every collection hands the entire current generation of per-attribute-set data to the
/// snapshot and starts over with an empty generation. Attribute sets with no measurements
/// since the previous collection are not reported.
///
/// # Example
///
/// ```
/// use bucketeer::{Aggregator, DeltaHistogram, HistogramConfig};
///
/// let config = HistogramConfig::builder()
///     .boundaries(&[1.0, 5.0])
///     .build()
///     .unwrap();
///
/// let histogram = DeltaHistogram::<i64, &str>::new(&config);
///
/// histogram.aggregate(1, &"alice");
/// let snapshot = histogram.collect();
/// assert_eq!(snapshot.data_points()[0].count(), 1);
///
/// histogram.aggregate(1, &"bob");
/// let snapshot = histogram.collect();
/// assert_eq!(snapshot.data_points().len(), 1);
/// assert_eq!(*snapshot.data_points()[0].attributes(), "bob");
/// ```
#[derive(Debug)]
pub struct DeltaHistogram<N, A, C = SystemClock> {
    record_min_max: bool,
    clock: C,

    state: Mutex<DeltaState<A>>,

    _number: PhantomData<fn(N)>,
}

/// Everything that changes hands when a collection cycle ends.
#[derive(Debug)]
struct DeltaState<A> {
    generation: Generation<A>,

    /// When the current generation started (previous collection or creation).
    start_time: SystemTime,
}

impl<N, A> DeltaHistogram<N, A, SystemClock>
where
    N: Number,
    A: AttributeSet,
{
    /// Creates a delta histogram that takes timestamps from the system clock.
    #[must_use]
    pub fn new(config: &HistogramConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<N, A, C> DeltaHistogram<N, A, C>
where
    N: Number,
    A: AttributeSet,
    C: Clock,
{
    /// Creates a delta histogram that takes timestamps from the given clock.
    ///
    /// The clock is read once immediately, to determine the start time of the first cycle.
    #[must_use]
    pub fn with_clock(config: &HistogramConfig, clock: C) -> Self {
        let start_time = clock.now();

        debug!(
            buckets = config.boundaries().len(),
            record_min_max = config.record_min_max(),
            "created delta histogram"
        );

        Self {
            record_min_max: config.record_min_max(),
            clock,
            state: Mutex::new(DeltaState {
                generation: Generation::new(Arc::clone(config.shared_boundaries())),
                start_time,
            }),
            _number: PhantomData,
        }
    }
}

impl<N, A, C> Aggregator<N, A> for DeltaHistogram<N, A, C>
where
    N: Number,
    A: AttributeSet,
    C: Clock,
{
    fn aggregate(&self, value: N, attributes: &A) {
        let value = value.as_();

        self.state.lock().generation.record(value, attributes);
    }

    fn collect(&self) -> HistogramSnapshot<A> {
        // Only the swap happens under the lock. Once detached, the previous generation is
        // exclusively ours, so converting it does not hold up concurrent measurements.
        let (generation, start_time, time) = {
            let mut state = self.state.lock();

            let time = self.clock.now();
            let successor = state.generation.successor();
            let generation = mem::replace(&mut state.generation, successor);
            let start_time = mem::replace(&mut state.start_time, time);

            (generation, start_time, time)
        };

        let data_points = drain_data_points(generation, start_time, time, self.record_min_max);

        trace!(
            temporality = %Temporality::Delta,
            data_points = data_points.len(),
            "collected histogram"
        );

        HistogramSnapshot::new(Temporality::Delta, data_points)
    }
}
