use std::fmt::{self, Display, Write};
use std::num::NonZero;
use std::sync::Arc;
use std::time::SystemTime;
use std::{cmp, iter};

use crate::{AttributeSet, BucketSet, Generation};

/// Defines the window that an aggregation was calculated over.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Temporality {
    /// Each collection reports only the measurements made since the previous collection.
    Delta,

    /// Each collection reports all measurements made since the aggregator was created.
    Cumulative,
}

impl Display for Temporality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Delta => f.write_str("delta"),
            Self::Cumulative => f.write_str("cumulative"),
        }
    }
}

/// The result of one collection cycle of a histogram aggregator.
///
/// Contains one [`HistogramDataPoint`] per attribute set. The order of data points is
/// unspecified and may differ between collections.
///
/// For human-readable output, use the `Display` trait implementation.
#[derive(Debug)]
pub struct HistogramSnapshot<A> {
    temporality: Temporality,
    data_points: Vec<HistogramDataPoint<A>>,
}

impl<A> HistogramSnapshot<A> {
    pub(crate) fn new(temporality: Temporality, data_points: Vec<HistogramDataPoint<A>>) -> Self {
        Self {
            temporality,
            data_points,
        }
    }

    /// Whether the data points cover the latest cycle only or everything since start.
    #[must_use]
    pub fn temporality(&self) -> Temporality {
        self.temporality
    }

    /// The distribution of measurements for each attribute set, in unspecified order.
    #[must_use]
    pub fn data_points(&self) -> &[HistogramDataPoint<A>] {
        &self.data_points
    }

    /// Consumes the snapshot, returning the data points.
    #[must_use]
    pub fn into_data_points(self) -> Vec<HistogramDataPoint<A>> {
        self.data_points
    }
}

impl<A> Display for HistogramSnapshot<A>
where
    A: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} histogram", self.temporality)?;

        for data_point in &self.data_points {
            write!(f, "{data_point}")?;
        }

        Ok(())
    }
}

/// The distribution of measurements reported for one attribute set in one collection.
///
/// Part of a collected [`HistogramSnapshot`].
#[derive(Debug)]
pub struct HistogramDataPoint<A> {
    attributes: A,

    start_time: SystemTime,
    time: SystemTime,

    count: u64,
    sum: f64,

    // None if there were no measurements or min/max recording is disabled.
    min_max: Option<(f64, f64)>,

    /// Shared with the aggregator. Immutable.
    bounds: Arc<[f64]>,

    /// Owned by this data point. Always `bounds.len() + 1` long.
    bucket_counts: Box<[u64]>,
}

impl<A> HistogramDataPoint<A> {
    /// The attribute set these measurements were reported with.
    #[must_use]
    pub fn attributes(&self) -> &A {
        &self.attributes
    }

    /// When the aggregation window began.
    #[must_use]
    pub fn start_time(&self) -> SystemTime {
        self.start_time
    }

    /// When the aggregation window ended (the time of collection).
    #[must_use]
    pub fn time(&self) -> SystemTime {
        self.time
    }

    /// Number of measurements in the aggregation window.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Sum of all measurement values in the aggregation window.
    #[must_use]
    pub fn sum(&self) -> f64 {
        self.sum
    }

    /// Smallest measured value.
    ///
    /// `None` if there were no measurements or min/max recording is disabled.
    #[must_use]
    pub fn min(&self) -> Option<f64> {
        self.min_max.map(|(min, _)| min)
    }

    /// Largest measured value.
    ///
    /// `None` if there were no measurements or min/max recording is disabled.
    #[must_use]
    pub fn max(&self) -> Option<f64> {
        self.min_max.map(|(_, max)| max)
    }

    /// The inclusive upper edges of all buckets except the last, in ascending order.
    #[must_use]
    pub fn bounds(&self) -> &[f64] {
        &self.bounds
    }

    /// Number of measurements in each bucket, including the trailing overflow bucket.
    ///
    /// Always one element longer than [`bounds()`][Self::bounds].
    #[must_use]
    pub fn bucket_counts(&self) -> &[u64] {
        &self.bucket_counts
    }

    /// Consumes the data point, returning the bucket counts.
    ///
    /// The returned buffer is owned exclusively by the caller.
    #[must_use]
    pub fn into_bucket_counts(self) -> Vec<u64> {
        self.bucket_counts.into_vec()
    }

    /// Iterates over the buckets as `(upper_bound, count)` pairs, in ascending order.
    ///
    /// The last bucket always has the upper bound `f64::INFINITY`, counting
    /// measurements that exceed every configured boundary.
    pub fn buckets(&self) -> impl Iterator<Item = (f64, u64)> {
        self.bounds
            .iter()
            .copied()
            .chain(iter::once(f64::INFINITY))
            .zip(self.bucket_counts.iter().copied())
    }
}

/// Converts a detached generation into data points, moving the bucket counts out of it.
///
/// The generation is consumed, so nothing else can observe or mutate the moved buffers.
pub(crate) fn drain_data_points<A>(
    generation: Generation<A>,
    start_time: SystemTime,
    time: SystemTime,
    record_min_max: bool,
) -> Vec<HistogramDataPoint<A>>
where
    A: AttributeSet,
{
    let mut data_points = Vec::with_capacity(generation.len());

    for (attributes, buckets) in generation.into_entries() {
        let count = buckets.count();
        let sum = buckets.sum();
        let min_max = buckets.min_max().filter(|_| record_min_max);
        let bounds = Arc::clone(buckets.boundaries());

        data_points.push(HistogramDataPoint {
            attributes,
            start_time,
            time,
            count,
            sum,
            min_max,
            bounds,
            bucket_counts: buckets.into_counts(),
        });
    }

    data_points
}

/// Copies a live generation into data points, leaving the generation untouched.
///
/// Every data point receives its own clone of the attribute set and its own copy of the
/// bucket counts. Only the immutable boundaries are shared.
pub(crate) fn copy_data_points<A>(
    generation: &Generation<A>,
    start_time: SystemTime,
    time: SystemTime,
    record_min_max: bool,
) -> Vec<HistogramDataPoint<A>>
where
    A: AttributeSet,
{
    generation
        .iter()
        .map(|(attributes, buckets)| {
            copy_data_point(attributes, buckets, start_time, time, record_min_max)
        })
        .collect()
}

fn copy_data_point<A>(
    attributes: &A,
    buckets: &BucketSet,
    start_time: SystemTime,
    time: SystemTime,
    record_min_max: bool,
) -> HistogramDataPoint<A>
where
    A: AttributeSet,
{
    HistogramDataPoint {
        attributes: attributes.clone(),
        start_time,
        time,
        count: buckets.count(),
        sum: buckets.sum(),
        min_max: buckets.min_max().filter(|_| record_min_max),
        bounds: Arc::clone(buckets.boundaries()),
        bucket_counts: Box::from(buckets.counts()),
    }
}

impl<A> Display for HistogramDataPoint<A>
where
    A: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: ", self.attributes)?;

        if self.count == 0 {
            // If there is no recorded data, we just report a flat zero no questions asked.
            writeln!(f, "0")?;
            return Ok(());
        }

        write!(f, "{}; sum {}", self.count, self.sum)?;

        if let Some((min, max)) = self.min_max {
            write!(f, "; min {min}; max {max}")?;
        }

        writeln!(f)?;

        let buckets = self.buckets().collect::<Vec<_>>();

        // We write the observation counts here (both in measurement phase and when rendering).
        let mut count_str = String::new();

        let widest_count = buckets.iter().fold(0, |current, bucket| {
            count_str.clear();
            write!(&mut count_str, "{}", bucket.1)
                .expect("we expect writing integer to String to be infallible");
            cmp::max(current, count_str.len())
        });

        let mut upper_bound_str = String::new();

        let widest_upper_bound = buckets.iter().fold(0, |current, bucket| {
            upper_bound_str.clear();
            write_upper_bound(&mut upper_bound_str, bucket.0)
                .expect("we expect writing float to String to be infallible");
            cmp::max(current, upper_bound_str.len())
        });

        let scale = BarScale::new(self.bucket_counts.iter().copied());

        for (upper_bound, count) in buckets {
            upper_bound_str.clear();
            write_upper_bound(&mut upper_bound_str, upper_bound)?;

            count_str.clear();
            write!(&mut count_str, "{count}")?;

            write!(
                f,
                "value <= {upper_bound_str:>widest_upper_bound$} [ {count_str:>widest_count$} ]: "
            )?;
            scale.write_bar(count, f)?;

            writeln!(f)?;
        }

        Ok(())
    }
}

fn write_upper_bound(f: &mut impl Write, upper_bound: f64) -> fmt::Result {
    if upper_bound.is_infinite() {
        f.write_str("+inf")
    } else {
        write!(f, "{upper_bound}")
    }
}

/// We auto-scale histogram bars when rendering. This is the number of characters
/// that we use to represent the largest bucket.
///
/// Bars may be narrower than this because one character never represents less than
/// one measurement.
const BAR_WIDTH_CHARS: u64 = 50;

const BAR_CHAR: char = '∎';

/// Auto-scaling of histogram bars, identifying how many measurements each character represents.
#[derive(Debug)]
struct BarScale {
    count_per_char: NonZero<u64>,
}

impl BarScale {
    fn new(counts: impl Iterator<Item = u64>) -> Self {
        let max_count = counts.max().unwrap_or_default();

        #[expect(
            clippy::integer_division,
            reason = "we accept the loss of precision here - the bar might not always reach 100% of desired width"
        )]
        let count_per_char = NonZero::new(cmp::max(max_count / BAR_WIDTH_CHARS, 1))
            .expect("guarded by max()");

        Self { count_per_char }
    }

    fn write_bar(&self, count: u64, f: &mut impl Write) -> fmt::Result {
        let width = count
            .checked_div(self.count_per_char.get())
            .expect("division by zero impossible - divisor is NonZero");

        for _ in 0..width {
            f.write_char(BAR_CHAR)?;
        }

        Ok(())
    }
}
