//! Collectors gathering key/value pairs into maps.
//!
//! Several inputs may map to the same key, and even to the same key and
//! value. Every map keeps a multiset of values per key so that retracting
//! one colliding entry never removes a surviving one.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;
use std::marker::PhantomData;

use super::Collector;

/// Creates a collector mapping each key to the set of its values.
///
/// # Example
///
/// ```
/// use std::collections::HashSet;
/// use streamforge_scoring::stream::collector::{to_map, Collector};
///
/// let collector = to_map(|p: &(char, i32)| p.0, |p: &(char, i32)| p.1);
/// let mut container = collector.supply();
/// let first = collector.accumulate(&mut container, &('a', 1));
/// collector.accumulate(&mut container, &('a', 1));
/// collector.retract(&mut container, first);
///
/// let result = collector.finish(&container);
/// assert_eq!(result[&'a'], HashSet::from([1]));
/// ```
pub fn to_map<In, K, V, FK, FV>(key: FK, value: FV) -> ToMapCollector<In, K, V, FK, FV>
where
    FK: Fn(&In) -> K + Send + Sync + 'static,
    FV: Fn(&In) -> V + Send + Sync + 'static,
{
    ToMapCollector {
        key,
        value,
        _phantom: PhantomData,
    }
}

/// Created by [`to_map()`].
pub struct ToMapCollector<In, K, V, FK, FV> {
    key: FK,
    value: FV,
    _phantom: PhantomData<fn(&In) -> (K, V)>,
}

impl<In, K, V, FK, FV> Collector<In> for ToMapCollector<In, K, V, FK, FV>
where
    In: 'static,
    K: Eq + Hash + Clone + Debug + Send + Sync + 'static,
    V: Eq + Hash + Clone + Debug + Send + Sync + 'static,
    FK: Fn(&In) -> K + Send + Sync + 'static,
    FV: Fn(&In) -> V + Send + Sync + 'static,
{
    type Container = HashMap<K, HashMap<V, usize>>;
    type Result = HashMap<K, HashSet<V>>;
    type Retractor = (K, V);

    fn supply(&self) -> Self::Container {
        HashMap::new()
    }

    fn accumulate(&self, container: &mut Self::Container, input: &In) -> (K, V) {
        let key = (self.key)(input);
        let value = (self.value)(input);
        *container
            .entry(key.clone())
            .or_default()
            .entry(value.clone())
            .or_insert(0) += 1;
        (key, value)
    }

    fn retract(&self, container: &mut Self::Container, (key, value): (K, V)) {
        let Some(values) = container.get_mut(&key) else {
            return;
        };
        if let Some(count) = values.get_mut(&value) {
            *count -= 1;
            if *count == 0 {
                values.remove(&value);
            }
        }
        if values.is_empty() {
            container.remove(&key);
        }
    }

    fn finish(&self, container: &Self::Container) -> Self::Result {
        container
            .iter()
            .map(|(key, values)| (key.clone(), values.keys().cloned().collect()))
            .collect()
    }
}

/// Like [`to_map()`], with keys and values in natural order.
pub fn to_sorted_map<In, K, V, FK, FV>(key: FK, value: FV) -> ToSortedMapCollector<In, K, V, FK, FV>
where
    FK: Fn(&In) -> K + Send + Sync + 'static,
    FV: Fn(&In) -> V + Send + Sync + 'static,
{
    ToSortedMapCollector {
        key,
        value,
        _phantom: PhantomData,
    }
}

/// Created by [`to_sorted_map()`].
pub struct ToSortedMapCollector<In, K, V, FK, FV> {
    key: FK,
    value: FV,
    _phantom: PhantomData<fn(&In) -> (K, V)>,
}

impl<In, K, V, FK, FV> Collector<In> for ToSortedMapCollector<In, K, V, FK, FV>
where
    In: 'static,
    K: Ord + Clone + Debug + Send + Sync + 'static,
    V: Ord + Clone + Debug + Send + Sync + 'static,
    FK: Fn(&In) -> K + Send + Sync + 'static,
    FV: Fn(&In) -> V + Send + Sync + 'static,
{
    type Container = BTreeMap<K, BTreeMap<V, usize>>;
    type Result = BTreeMap<K, BTreeSet<V>>;
    type Retractor = (K, V);

    fn supply(&self) -> Self::Container {
        BTreeMap::new()
    }

    fn accumulate(&self, container: &mut Self::Container, input: &In) -> (K, V) {
        let key = (self.key)(input);
        let value = (self.value)(input);
        *container
            .entry(key.clone())
            .or_default()
            .entry(value.clone())
            .or_insert(0) += 1;
        (key, value)
    }

    fn retract(&self, container: &mut Self::Container, (key, value): (K, V)) {
        let Some(values) = container.get_mut(&key) else {
            return;
        };
        if let Some(count) = values.get_mut(&value) {
            *count -= 1;
            if *count == 0 {
                values.remove(&value);
            }
        }
        if values.is_empty() {
            container.remove(&key);
        }
    }

    fn finish(&self, container: &Self::Container) -> Self::Result {
        container
            .iter()
            .map(|(key, values)| (key.clone(), values.keys().cloned().collect()))
            .collect()
    }
}

/// Creates a collector mapping each key to one value, merging the values of
/// colliding keys with `merge` in accumulation order.
///
/// # Example
///
/// ```
/// use streamforge_scoring::stream::collector::{to_map_merged, Collector};
///
/// let collector = to_map_merged(|p: &(char, i32)| p.0, |p: &(char, i32)| p.1, |a: &i32, b: &i32| a + b);
/// let mut container = collector.supply();
/// collector.accumulate(&mut container, &('a', 1));
/// let two = collector.accumulate(&mut container, &('a', 2));
/// collector.accumulate(&mut container, &('b', 5));
/// assert_eq!(collector.finish(&container)[&'a'], 3);
///
/// collector.retract(&mut container, two);
/// assert_eq!(collector.finish(&container)[&'a'], 1);
/// ```
pub fn to_map_merged<In, K, V, FK, FV, M>(
    key: FK,
    value: FV,
    merge: M,
) -> ToMergedMapCollector<In, K, V, FK, FV, M>
where
    FK: Fn(&In) -> K + Send + Sync + 'static,
    FV: Fn(&In) -> V + Send + Sync + 'static,
    M: Fn(&V, &V) -> V + Send + Sync + 'static,
{
    ToMergedMapCollector {
        key,
        value,
        merge,
        _phantom: PhantomData,
    }
}

/// Created by [`to_map_merged()`].
pub struct ToMergedMapCollector<In, K, V, FK, FV, M> {
    key: FK,
    value: FV,
    merge: M,
    _phantom: PhantomData<fn(&In) -> (K, V)>,
}

/// Values per key, each tagged with its accumulation sequence number.
pub struct SequencedMap<K, V> {
    next: u64,
    entries: HashMap<K, BTreeMap<u64, V>>,
}

impl<In, K, V, FK, FV, M> Collector<In> for ToMergedMapCollector<In, K, V, FK, FV, M>
where
    In: 'static,
    K: Eq + Hash + Clone + Debug + Send + Sync + 'static,
    V: Clone + PartialEq + Debug + Send + Sync + 'static,
    FK: Fn(&In) -> K + Send + Sync + 'static,
    FV: Fn(&In) -> V + Send + Sync + 'static,
    M: Fn(&V, &V) -> V + Send + Sync + 'static,
{
    type Container = SequencedMap<K, V>;
    type Result = HashMap<K, V>;
    type Retractor = (K, u64);

    fn supply(&self) -> Self::Container {
        SequencedMap {
            next: 0,
            entries: HashMap::new(),
        }
    }

    fn accumulate(&self, container: &mut Self::Container, input: &In) -> (K, u64) {
        let key = (self.key)(input);
        let sequence = container.next;
        container.next += 1;
        container
            .entries
            .entry(key.clone())
            .or_default()
            .insert(sequence, (self.value)(input));
        (key, sequence)
    }

    fn retract(&self, container: &mut Self::Container, (key, sequence): (K, u64)) {
        if let Some(values) = container.entries.get_mut(&key) {
            values.remove(&sequence);
            if values.is_empty() {
                container.entries.remove(&key);
            }
        }
    }

    fn finish(&self, container: &Self::Container) -> Self::Result {
        container
            .entries
            .iter()
            .filter_map(|(key, values)| {
                let mut values = values.values();
                let first = values.next()?.clone();
                let merged = values.fold(first, |acc, v| (self.merge)(&acc, v));
                Some((key.clone(), merged))
            })
            .collect()
    }
}
