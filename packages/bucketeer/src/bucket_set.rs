use std::sync::Arc;

/// The distribution of measurements for one attribute set.
///
/// Binning is not synchronized. The owning aggregator is responsible for ensuring that
/// only one thread at a time mutates a bucket set.
#[derive(Debug)]
pub(crate) struct BucketSet {
    /// Shared with every other bucket set of the same aggregator. Never mutated.
    boundaries: Arc<[f64]>,

    /// Always `boundaries.len() + 1` long. The last element is the overflow bucket.
    counts: Box<[u64]>,

    count: u64,
    sum: f64,

    // Only meaningful if `count > 0`.
    min: f64,
    max: f64,
}

impl BucketSet {
    pub(crate) fn new(boundaries: Arc<[f64]>) -> Self {
        let counts = vec![0; boundaries.len().wrapping_add(1)].into_boxed_slice();

        Self {
            boundaries,
            counts,
            count: 0,
            sum: 0.0,
            min: 0.0,
            max: 0.0,
        }
    }

    /// Records one measurement.
    pub(crate) fn bin(&mut self, value: f64) {
        let index = find_bucket_index(value, &self.boundaries);

        // The overflow bucket has index `boundaries.len()`, which always exists.
        let bucket_count = self
            .counts
            .get_mut(index)
            .expect("there is always one more count than there are boundaries");
        *bucket_count = bucket_count.wrapping_add(1);

        if self.count == 0 {
            self.min = value;
            self.max = value;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);
        }

        self.count = self.count.wrapping_add(1);
        self.sum += value;
    }

    pub(crate) fn boundaries(&self) -> &Arc<[f64]> {
        &self.boundaries
    }

    pub(crate) fn counts(&self) -> &[u64] {
        &self.counts
    }

    pub(crate) fn into_counts(self) -> Box<[u64]> {
        self.counts
    }

    pub(crate) fn count(&self) -> u64 {
        self.count
    }

    pub(crate) fn sum(&self) -> f64 {
        self.sum
    }

    /// The extrema of all binned values, or `None` if nothing has been binned.
    pub(crate) fn min_max(&self) -> Option<(f64, f64)> {
        (self.count > 0).then_some((self.min, self.max))
    }
}

/// Identifies the bucket that a value belongs to.
///
/// Returns the index of the first boundary that is greater than or equal to `value`.
/// If there is no such boundary, returns `boundaries.len()` (the overflow bucket).
///
/// `boundaries` must be sorted in ascending order.
#[inline]
#[must_use]
pub fn find_bucket_index(value: f64, boundaries: &[f64]) -> usize {
    boundaries.partition_point(|&boundary| boundary < value)
}
