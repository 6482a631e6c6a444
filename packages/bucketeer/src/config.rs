use std::sync::Arc;

use crate::{Error, Result};

/// Bucket boundaries used when none are specified.
///
/// These are the conventional explicit-bucket defaults of OpenTelemetry SDKs, suitable for
/// latencies measured in milliseconds.
pub const DEFAULT_BOUNDARIES: &[f64] = &[
    0.0, 5.0, 10.0, 25.0, 50.0, 75.0, 100.0, 250.0, 500.0, 750.0, 1000.0, 2500.0, 5000.0,
    7500.0, 10000.0,
];

/// Validated configuration shared by the histogram aggregators.
///
/// Use [`HistogramConfig::builder()`] to create an instance.
///
/// The boundaries are held in a single immutable buffer. Every aggregator built from this
/// configuration, every attribute set tracked by those aggregators and every exported
/// data point refers to the same buffer without copying it.
#[derive(Clone, Debug, PartialEq)]
pub struct HistogramConfig {
    boundaries: Arc<[f64]>,
    record_min_max: bool,
}

impl HistogramConfig {
    /// Starts building a new configuration.
    ///
    /// # Example
    ///
    /// ```
    /// use bucketeer::HistogramConfig;
    ///
    /// let config = HistogramConfig::builder()
    ///     .boundaries(&[1.0, 5.0])
    ///     .record_min_max(false)
    ///     .build()
    ///     .unwrap();
    ///
    /// assert_eq!(config.boundaries(), &[1.0, 5.0]);
    /// assert!(!config.record_min_max());
    /// ```
    #[must_use]
    pub fn builder() -> HistogramConfigBuilder {
        HistogramConfigBuilder::new()
    }

    /// The inclusive upper edges of all buckets except the last, in ascending order.
    ///
    /// There is always one more bucket than there are boundaries. The last bucket
    /// counts every value greater than the last boundary.
    #[must_use]
    pub fn boundaries(&self) -> &[f64] {
        &self.boundaries
    }

    /// Whether the minimum and maximum measured values are reported.
    #[must_use]
    pub fn record_min_max(&self) -> bool {
        self.record_min_max
    }

    pub(crate) fn shared_boundaries(&self) -> &Arc<[f64]> {
        &self.boundaries
    }
}

impl Default for HistogramConfig {
    fn default() -> Self {
        Self {
            boundaries: Arc::from(DEFAULT_BOUNDARIES),
            record_min_max: true,
        }
    }
}

/// Creates instances of [`HistogramConfig`].
///
/// Defaults to [`DEFAULT_BOUNDARIES`] with min/max recording enabled.
#[derive(Debug)]
pub struct HistogramConfigBuilder {
    boundaries: Vec<f64>,
    record_min_max: bool,
}

impl HistogramConfigBuilder {
    fn new() -> Self {
        Self {
            boundaries: DEFAULT_BOUNDARIES.to_vec(),
            record_min_max: true,
        }
    }

    /// Sets the inclusive upper edges of the histogram buckets.
    ///
    /// The values are copied, so the caller may freely reuse or modify the slice afterwards.
    /// An empty slice is allowed and results in a single bucket that accepts all values.
    ///
    /// Boundaries must be finite and strictly increasing, which is verified by
    /// [`build()`][Self::build].
    #[must_use]
    pub fn boundaries(self, boundaries: &[f64]) -> Self {
        Self {
            boundaries: boundaries.to_vec(),
            ..self
        }
    }

    /// Sets whether the minimum and maximum measured values are reported.
    ///
    /// Enabled by default.
    #[must_use]
    pub fn record_min_max(self, enabled: bool) -> Self {
        Self {
            record_min_max: enabled,
            ..self
        }
    }

    /// Validates the boundaries and builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NonFiniteBoundary`] if any boundary is NaN or infinite.
    ///
    /// Returns [`Error::UnorderedBoundaries`] if the boundaries are not strictly increasing.
    pub fn build(self) -> Result<HistogramConfig> {
        validate_boundaries(&self.boundaries)?;

        Ok(HistogramConfig {
            boundaries: Arc::from(self.boundaries),
            record_min_max: self.record_min_max,
        })
    }
}

fn validate_boundaries(boundaries: &[f64]) -> Result<()> {
    if let Some((index, &value)) = boundaries.iter().enumerate().find(|(_, b)| !b.is_finite()) {
        return Err(Error::NonFiniteBoundary { index, value });
    }

    // All values are finite by now, so the comparison below is a total order.
    for (previous_index, pair) in boundaries.windows(2).enumerate() {
        let &[previous, value] = pair else {
            unreachable!("windows(2) always yields exactly two elements");
        };

        if value <= previous {
            return Err(Error::UnorderedBoundaries {
                index: previous_index.wrapping_add(1),
                value,
                previous,
            });
        }
    }

    Ok(())
}
