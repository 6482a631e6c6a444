use std::sync::Arc;

use foldhash::{HashMap, HashMapExt};
use tracing::debug;

use crate::{AttributeSet, BucketSet};

/// One set of per-attribute-set distributions, routing each measurement to the
/// bucket set owned by its attribute set.
///
/// Not synchronized. The owning aggregator keeps the generation behind its lock so that
/// lookup, insertion and binning form a single critical section.
#[derive(Debug)]
pub(crate) struct Generation<A> {
    boundaries: Arc<[f64]>,
    values: HashMap<A, BucketSet>,
}

impl<A> Generation<A>
where
    A: AttributeSet,
{
    pub(crate) fn new(boundaries: Arc<[f64]>) -> Self {
        Self {
            boundaries,
            values: HashMap::new(),
        }
    }

    /// Returns the bucket set for `attributes`, creating an empty one on first sight.
    pub(crate) fn route(&mut self, attributes: &A) -> &mut BucketSet {
        // We look up by reference first so that the attribute set is only cloned when
        // a new entry is actually created, which is the rare case.
        if !self.values.contains_key(attributes) {
            debug!(?attributes, "tracking new attribute set");

            self.values.insert(
                attributes.clone(),
                BucketSet::new(Arc::clone(&self.boundaries)),
            );
        }

        self.values
            .get_mut(attributes)
            .expect("guarded by insertion above")
    }

    /// Routes and bins one measurement.
    pub(crate) fn record(&mut self, value: f64, attributes: &A) {
        self.route(attributes).bin(value);
    }

    /// Creates an empty generation that shares the boundaries of this one.
    pub(crate) fn successor(&self) -> Self {
        Self::new(Arc::clone(&self.boundaries))
    }

    pub(crate) fn len(&self) -> usize {
        self.values.len()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&A, &BucketSet)> {
        self.values.iter()
    }

    pub(crate) fn into_entries(self) -> impl Iterator<Item = (A, BucketSet)> {
        self.values.into_iter()
    }

    #[cfg(test)]
    pub(crate) fn get(&self, attributes: &A) -> Option<&BucketSet> {
        self.values.get(attributes)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    #![allow(
        clippy::float_cmp,
        reason = "exact values are expected, all inputs are small integers"
    )]

    use super::*;

    fn generation() -> Generation<&'static str> {
        Generation::new(Arc::from(&[1.0, 5.0][..]))
    }

    #[test]
    fn route_creates_bucket_set_on_first_sight() {
        let mut generation = generation();
        assert_eq!(generation.len(), 0);

        let buckets = generation.route(&"alice");
        assert_eq!(buckets.count(), 0);
        assert_eq!(buckets.counts(), &[0, 0, 0]);

        assert_eq!(generation.len(), 1);
    }

    #[test]
    fn route_returns_same_bucket_set_for_equal_attributes() {
        let mut generation = generation();

        generation.record(2.0, &"alice");
        generation.record(3.0, &"alice");

        assert_eq!(generation.len(), 1);

        let alice = generation.get(&"alice").unwrap();
        assert_eq!(alice.count(), 2);
        assert_eq!(alice.sum(), 5.0);
    }

    #[test]
    fn attribute_sets_are_tracked_independently() {
        let mut generation = generation();

        generation.record(0.0, &"alice");
        generation.record(10.0, &"bob");
        generation.record(10.0, &"bob");

        assert_eq!(generation.len(), 2);
        assert_eq!(generation.get(&"alice").unwrap().counts(), &[1, 0, 0]);
        assert_eq!(generation.get(&"bob").unwrap().counts(), &[0, 0, 2]);
    }

    #[test]
    fn bucket_sets_share_generation_boundaries() {
        let boundaries: Arc<[f64]> = Arc::from(&[1.0][..]);
        let mut generation = Generation::new(Arc::clone(&boundaries));

        generation.record(1.0, &"alice");
        generation.record(1.0, &"bob");

        for (_, buckets) in generation.iter() {
            assert!(Arc::ptr_eq(buckets.boundaries(), &boundaries));
        }
    }

    #[test]
    fn successor_is_empty_and_shares_boundaries() {
        let mut generation = generation();
        generation.record(1.0, &"alice");

        let mut successor = generation.successor();
        assert_eq!(successor.len(), 0);

        successor.record(1.0, &"bob");
        let bob = successor.get(&"bob").unwrap();
        assert!(Arc::ptr_eq(bob.boundaries(), &generation.boundaries));
    }

    #[test]
    fn into_entries_yields_every_entry() {
        let mut generation = generation();
        generation.record(1.0, &"alice");
        generation.record(1.0, &"bob");

        let mut names = generation
            .into_entries()
            .map(|(attributes, _)| attributes)
            .collect::<Vec<_>>();
        names.sort_unstable();

        assert_eq!(names, vec!["alice", "bob"]);
    }
}
