//! Drives delta and cumulative aggregators through several collection cycles with
//! measurements arriving from multiple threads, verifying the exact exported data.

#![allow(
    clippy::indexing_slicing,
    reason = "panic is fine in tests, indices are verified by earlier assertions"
)]
#![allow(
    clippy::float_cmp,
    reason = "exact values are expected, all inputs are small integers"
)]

use std::collections::BTreeMap;
use std::thread;
use std::time::{Duration, SystemTime};

use bucketeer::{
    Aggregator, Clock, CumulativeHistogram, DeltaHistogram, HistogramConfig, HistogramDataPoint,
    Number, Temporality,
};

type Attributes = BTreeMap<&'static str, &'static str>;

const BOUNDS: &[f64] = &[1.0, 5.0];

const THREADS: u64 = 5;
const MEASUREMENTS_PER_THREAD: u64 = 10;
const CYCLES: u64 = 3;

/// Every measurement for a given attribute set has the same value, so the expected
/// distribution can be derived from the value alone.
const INCREMENTS: &[(&str, i8, usize)] = &[
    // (user, value, expected bucket index)
    ("alice", 1, 0),
    ("bob", 10, 2),
    ("carol", 3, 1),
];

#[derive(Debug)]
struct FrozenClock;

impl Clock for FrozenClock {
    fn now(&self) -> SystemTime {
        now()
    }
}

fn now() -> SystemTime {
    SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000)
}

fn attributes(user: &'static str) -> Attributes {
    BTreeMap::from([("user", user)])
}

fn config() -> HistogramConfig {
    HistogramConfig::builder()
        .boundaries(BOUNDS)
        .build()
        .unwrap()
}

/// Records one cycle worth of measurements from several threads at once.
fn record_cycle<N>(aggregator: &dyn Aggregator<N, Attributes>)
where
    N: Number + From<i8>,
{
    thread::scope(|s| {
        for _ in 0..THREADS {
            s.spawn(|| {
                for _ in 0..MEASUREMENTS_PER_THREAD {
                    for &(user, value, _) in INCREMENTS {
                        aggregator.aggregate(N::from(value), &attributes(user));
                    }
                }
            });
        }
    });
}

fn assert_data_points(data_points: &[HistogramDataPoint<Attributes>], multiplier: u64) {
    assert_eq!(data_points.len(), INCREMENTS.len());

    for &(user, value, bucket_index) in INCREMENTS {
        let data_point = data_points
            .iter()
            .find(|data_point| *data_point.attributes() == attributes(user))
            .unwrap();

        let mut expected_counts = vec![0; BOUNDS.len() + 1];
        expected_counts[bucket_index] = multiplier;

        assert_eq!(data_point.start_time(), now());
        assert_eq!(data_point.time(), now());
        assert_eq!(data_point.count(), multiplier);
        assert_eq!(data_point.sum(), f64::from(value) * multiplier as f64);
        assert_eq!(data_point.min(), Some(f64::from(value)));
        assert_eq!(data_point.max(), Some(f64::from(value)));
        assert_eq!(data_point.bounds(), BOUNDS);
        assert_eq!(data_point.bucket_counts(), expected_counts.as_slice());
    }
}

fn delta_cycles<N>()
where
    N: Number + From<i8>,
{
    let aggregator = DeltaHistogram::<N, Attributes, _>::with_clock(&config(), FrozenClock);

    for _ in 0..CYCLES {
        record_cycle(&aggregator);

        let snapshot = aggregator.collect();
        assert_eq!(snapshot.temporality(), Temporality::Delta);
        assert_data_points(snapshot.data_points(), THREADS * MEASUREMENTS_PER_THREAD);
    }
}

fn cumulative_cycles<N>()
where
    N: Number + From<i8>,
{
    let aggregator = CumulativeHistogram::<N, Attributes, _>::with_clock(&config(), FrozenClock);

    for cycle in 1..=CYCLES {
        record_cycle(&aggregator);

        let snapshot = aggregator.collect();
        assert_eq!(snapshot.temporality(), Temporality::Cumulative);
        assert_data_points(
            snapshot.data_points(),
            cycle * THREADS * MEASUREMENTS_PER_THREAD,
        );
    }
}

#[test]
fn delta_i64() {
    delta_cycles::<i64>();
}

#[test]
fn delta_f64() {
    delta_cycles::<f64>();
}

#[test]
fn cumulative_i64() {
    cumulative_cycles::<i64>();
}

#[test]
fn cumulative_f64() {
    cumulative_cycles::<f64>();
}

#[test]
fn delta_and_cumulative_diverge_under_identical_input() {
    let delta = DeltaHistogram::<i64, Attributes, _>::with_clock(&config(), FrozenClock);
    let cumulative = CumulativeHistogram::<i64, Attributes, _>::with_clock(&config(), FrozenClock);

    let aggregators: [&dyn Aggregator<i64, Attributes>; 2] = [&delta, &cumulative];

    for cycle in 1..=CYCLES {
        for aggregator in aggregators {
            for _ in 0..7 {
                aggregator.aggregate(2, &attributes("alice"));
            }
        }

        assert_eq!(delta.collect().data_points()[0].count(), 7);
        assert_eq!(cumulative.collect().data_points()[0].count(), cycle * 7);
    }
}
