//! Extremum collectors.

use std::cmp::Ordering;
use std::fmt::Debug;
use std::marker::PhantomData;

use super::Collector;

type NaturalOrder<T> = fn(&T, &T) -> Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Extreme {
    Min,
    Max,
}

/// Creates a collector for the smallest value of `mapper`, or `None`.
///
/// # Example
///
/// ```
/// use streamforge_scoring::stream::collector::{min, Collector};
///
/// let collector = min(|x: &i32| *x);
/// let mut container = collector.supply();
/// let three = collector.accumulate(&mut container, &3);
/// collector.accumulate(&mut container, &3);
/// collector.accumulate(&mut container, &8);
///
/// collector.retract(&mut container, three);
/// assert_eq!(collector.finish(&container), Some(3));
/// ```
pub fn min<In, T, F>(mapper: F) -> ExtremumCollector<In, T, F, NaturalOrder<T>>
where
    T: Ord,
    F: Fn(&In) -> T + Send + Sync + 'static,
{
    ExtremumCollector::new(mapper, T::cmp, Extreme::Min)
}

/// Creates a collector for the largest value of `mapper`, or `None`.
pub fn max<In, T, F>(mapper: F) -> ExtremumCollector<In, T, F, NaturalOrder<T>>
where
    T: Ord,
    F: Fn(&In) -> T + Send + Sync + 'static,
{
    ExtremumCollector::new(mapper, T::cmp, Extreme::Max)
}

/// Like [`min()`], ordered by `comparator`.
pub fn min_by<In, T, F, Cmp>(mapper: F, comparator: Cmp) -> ExtremumCollector<In, T, F, Cmp>
where
    F: Fn(&In) -> T + Send + Sync + 'static,
    Cmp: Fn(&T, &T) -> Ordering + Send + Sync + 'static,
{
    ExtremumCollector::new(mapper, comparator, Extreme::Min)
}

/// Like [`max()`], ordered by `comparator`.
pub fn max_by<In, T, F, Cmp>(mapper: F, comparator: Cmp) -> ExtremumCollector<In, T, F, Cmp>
where
    F: Fn(&In) -> T + Send + Sync + 'static,
    Cmp: Fn(&T, &T) -> Ordering + Send + Sync + 'static,
{
    ExtremumCollector::new(mapper, comparator, Extreme::Max)
}

/// Keeps every accumulated value in a vector sorted by the comparator, with
/// duplicates, so retracting one of several equal values keeps the others.
pub struct ExtremumCollector<In, T, F, Cmp> {
    mapper: F,
    comparator: Cmp,
    extreme: Extreme,
    _phantom: PhantomData<fn(&In) -> T>,
}

impl<In, T, F, Cmp> ExtremumCollector<In, T, F, Cmp> {
    fn new(mapper: F, comparator: Cmp, extreme: Extreme) -> Self {
        Self {
            mapper,
            comparator,
            extreme,
            _phantom: PhantomData,
        }
    }
}

impl<In, T, F, Cmp> Collector<In> for ExtremumCollector<In, T, F, Cmp>
where
    In: 'static,
    T: Clone + PartialEq + Debug + Send + Sync + 'static,
    F: Fn(&In) -> T + Send + Sync + 'static,
    Cmp: Fn(&T, &T) -> Ordering + Send + Sync + 'static,
{
    type Container = Vec<T>;
    type Result = Option<T>;
    type Retractor = T;

    fn supply(&self) -> Vec<T> {
        Vec::new()
    }

    fn accumulate(&self, container: &mut Vec<T>, input: &In) -> T {
        let value = (self.mapper)(input);
        let position =
            container.partition_point(|v| (self.comparator)(v, &value) != Ordering::Greater);
        container.insert(position, value.clone());
        value
    }

    fn retract(&self, container: &mut Vec<T>, value: T) {
        let start = container.partition_point(|v| (self.comparator)(v, &value) == Ordering::Less);
        let end = container.partition_point(|v| (self.comparator)(v, &value) != Ordering::Greater);
        let position = container[start..end]
            .iter()
            .position(|v| *v == value)
            .map_or(start, |offset| start + offset);
        if position < end {
            container.remove(position);
        }
    }

    fn finish(&self, container: &Vec<T>) -> Option<T> {
        match self.extreme {
            Extreme::Min => container.first().cloned(),
            Extreme::Max => container.last().cloned(),
        }
    }
}
