//! Collectors gathering values into collections.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;
use std::marker::PhantomData;

use super::Collector;

/// Creates a collector of the values of `mapper` in accumulation order.
///
/// # Example
///
/// ```
/// use streamforge_scoring::stream::collector::{to_list, Collector};
///
/// let collector = to_list(|s: &&str| s.len());
/// let mut container = collector.supply();
/// let first = collector.accumulate(&mut container, &"abc");
/// collector.accumulate(&mut container, &"de");
/// collector.accumulate(&mut container, &"f");
/// collector.retract(&mut container, first);
/// assert_eq!(collector.finish(&container), vec![2, 1]);
/// ```
pub fn to_list<In, T, F>(mapper: F) -> ToListCollector<In, T, F>
where
    F: Fn(&In) -> T + Send + Sync + 'static,
{
    ToListCollector {
        mapper,
        _phantom: PhantomData,
    }
}

/// Created by [`to_list()`].
pub struct ToListCollector<In, T, F> {
    mapper: F,
    _phantom: PhantomData<fn(&In) -> T>,
}

/// Values keyed by accumulation sequence number.
pub struct SequencedValues<T> {
    next: u64,
    values: BTreeMap<u64, T>,
}

impl<In, T, F> Collector<In> for ToListCollector<In, T, F>
where
    In: 'static,
    T: Clone + PartialEq + Debug + Send + Sync + 'static,
    F: Fn(&In) -> T + Send + Sync + 'static,
{
    type Container = SequencedValues<T>;
    type Result = Vec<T>;
    type Retractor = u64;

    fn supply(&self) -> Self::Container {
        SequencedValues {
            next: 0,
            values: BTreeMap::new(),
        }
    }

    fn accumulate(&self, container: &mut Self::Container, input: &In) -> u64 {
        let sequence = container.next;
        container.next += 1;
        container.values.insert(sequence, (self.mapper)(input));
        sequence
    }

    fn retract(&self, container: &mut Self::Container, sequence: u64) {
        container.values.remove(&sequence);
    }

    fn finish(&self, container: &Self::Container) -> Vec<T> {
        container.values.values().cloned().collect()
    }
}

/// Creates a collector of the distinct values of `mapper`.
///
/// Values are counted, so retracting one of two equal values keeps the value
/// in the set.
pub fn to_set<In, T, F>(mapper: F) -> ToSetCollector<In, T, F>
where
    T: Eq + Hash,
    F: Fn(&In) -> T + Send + Sync + 'static,
{
    ToSetCollector {
        mapper,
        _phantom: PhantomData,
    }
}

/// Created by [`to_set()`].
pub struct ToSetCollector<In, T, F> {
    mapper: F,
    _phantom: PhantomData<fn(&In) -> T>,
}

impl<In, T, F> Collector<In> for ToSetCollector<In, T, F>
where
    In: 'static,
    T: Eq + Hash + Clone + Debug + Send + Sync + 'static,
    F: Fn(&In) -> T + Send + Sync + 'static,
{
    type Container = HashMap<T, usize>;
    type Result = HashSet<T>;
    type Retractor = T;

    fn supply(&self) -> Self::Container {
        HashMap::new()
    }

    fn accumulate(&self, container: &mut Self::Container, input: &In) -> T {
        let value = (self.mapper)(input);
        *container.entry(value.clone()).or_insert(0) += 1;
        value
    }

    fn retract(&self, container: &mut Self::Container, value: T) {
        if let Some(count) = container.get_mut(&value) {
            *count -= 1;
            if *count == 0 {
                container.remove(&value);
            }
        }
    }

    fn finish(&self, container: &Self::Container) -> HashSet<T> {
        container.keys().cloned().collect()
    }
}

/// Creates a collector of the distinct values of `mapper`, in natural order.
pub fn to_sorted_set<In, T, F>(mapper: F) -> ToSortedSetCollector<In, T, F>
where
    T: Ord,
    F: Fn(&In) -> T + Send + Sync + 'static,
{
    ToSortedSetCollector {
        mapper,
        _phantom: PhantomData,
    }
}

/// Created by [`to_sorted_set()`].
pub struct ToSortedSetCollector<In, T, F> {
    mapper: F,
    _phantom: PhantomData<fn(&In) -> T>,
}

impl<In, T, F> Collector<In> for ToSortedSetCollector<In, T, F>
where
    In: 'static,
    T: Ord + Clone + Debug + Send + Sync + 'static,
    F: Fn(&In) -> T + Send + Sync + 'static,
{
    type Container = BTreeMap<T, usize>;
    type Result = BTreeSet<T>;
    type Retractor = T;

    fn supply(&self) -> Self::Container {
        BTreeMap::new()
    }

    fn accumulate(&self, container: &mut Self::Container, input: &In) -> T {
        let value = (self.mapper)(input);
        *container.entry(value.clone()).or_insert(0) += 1;
        value
    }

    fn retract(&self, container: &mut Self::Container, value: T) {
        if let Some(count) = container.get_mut(&value) {
            *count -= 1;
            if *count == 0 {
                container.remove(&value);
            }
        }
    }

    fn finish(&self, container: &Self::Container) -> BTreeSet<T> {
        container.keys().cloned().collect()
    }
}
