use std::fmt::Debug;
use std::time::SystemTime;

/// A source of wall-clock timestamps for the start and end times of collection cycles.
///
/// Aggregators read the clock once when they are created and once per collection.
/// Substitute your own implementation to make timestamps deterministic in tests.
///
/// # Example
///
/// ```
/// use std::time::{Duration, SystemTime};
///
/// use bucketeer::Clock;
///
/// #[derive(Debug)]
/// struct FrozenClock(SystemTime);
///
/// impl Clock for FrozenClock {
///     fn now(&self) -> SystemTime {
///         self.0
///     }
/// }
///
/// let clock = FrozenClock(SystemTime::UNIX_EPOCH + Duration::from_secs(1000));
/// assert_eq!(clock.now(), clock.now());
/// ```
#[cfg_attr(test, mockall::automock)]
pub trait Clock: Debug + Send + Sync {
    /// The current time.
    fn now(&self) -> SystemTime;
}

/// Real clock implementation backed by [`SystemTime::now()`].
#[non_exhaustive]
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[cfg_attr(test, mutants::skip)] // Trivial forwarder.
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}
