use thiserror::Error;

/// Errors that can occur when building a histogram configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// A bucket boundary was NaN or infinite.
    ///
    /// The overflow bucket above the last boundary is always present, so there is no need
    /// to specify `+inf` as a boundary.
    #[error("histogram bucket boundary at index {index} is not finite: {value}")]
    NonFiniteBoundary {
        /// Position of the offending boundary in the supplied list.
        index: usize,

        /// The offending boundary value.
        value: f64,
    },

    /// A bucket boundary was not strictly greater than the boundary before it.
    #[error(
        "histogram bucket boundaries must be strictly increasing: {value} at index {index} does not exceed {previous}"
    )]
    UnorderedBoundaries {
        /// Position of the offending boundary in the supplied list.
        index: usize,

        /// The offending boundary value.
        value: f64,

        /// The boundary immediately before the offending one.
        previous: f64,
    },
}

/// A specialized `Result` type for configuration operations, returning the crate's
/// [`Error`] type as the error value.
pub(crate) type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::fmt::Debug;

    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(Error: Send, Sync, Debug);

    #[test]
    fn non_finite_boundary_message_names_the_position() {
        let error = Error::NonFiniteBoundary {
            index: 3,
            value: f64::INFINITY,
        };

        let message = error.to_string();
        assert!(message.contains("index 3"), "{message}");
        assert!(message.contains("inf"), "{message}");
    }

    #[test]
    fn unordered_boundaries_message_names_both_values() {
        let error = Error::UnorderedBoundaries {
            index: 2,
            value: 5.0,
            previous: 10.0,
        };

        let message = error.to_string();
        assert!(message.contains("index 2"), "{message}");
        assert!(message.contains('5'), "{message}");
        assert!(message.contains("10"), "{message}");
    }
}
