//! Counting collectors.

use std::collections::HashMap;
use std::hash::Hash;
use std::marker::PhantomData;

use super::Collector;

/// Creates a collector that counts its inputs.
///
/// # Example
///
/// ```
/// use streamforge_scoring::stream::collector::{count, Collector};
///
/// fn total<C: Collector<&'static str>>(collector: &C, words: &[&'static str]) -> C::Result {
///     let mut container = collector.supply();
///     for word in words {
///         collector.accumulate(&mut container, word);
///     }
///     collector.finish(&container)
/// }
///
/// assert_eq!(total(&count(), &["a", "b", "c"]), 3);
/// ```
pub fn count() -> CountCollector {
    CountCollector
}

/// A collector that counts its inputs. Created by [`count()`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CountCollector;

impl<In> Collector<In> for CountCollector {
    type Container = usize;
    type Result = usize;
    type Retractor = ();

    fn supply(&self) -> usize {
        0
    }

    fn accumulate(&self, container: &mut usize, _input: &In) {
        *container += 1;
    }

    fn retract(&self, container: &mut usize, _retractor: ()) {
        *container -= 1;
    }

    fn finish(&self, container: &usize) -> usize {
        *container
    }
}

/// Creates a collector that counts the distinct values of `mapper`.
pub fn count_distinct<In, T, F>(mapper: F) -> CountDistinctCollector<In, T, F>
where
    T: Eq + Hash + Clone + Send + 'static,
    F: Fn(&In) -> T + Send + Sync + 'static,
{
    CountDistinctCollector {
        mapper,
        _phantom: PhantomData,
    }
}

/// Created by [`count_distinct()`].
pub struct CountDistinctCollector<In, T, F> {
    mapper: F,
    _phantom: PhantomData<fn(&In) -> T>,
}

impl<In, T, F> Collector<In> for CountDistinctCollector<In, T, F>
where
    In: 'static,
    T: Eq + Hash + Clone + Send + 'static,
    F: Fn(&In) -> T + Send + Sync + 'static,
{
    type Container = HashMap<T, usize>;
    type Result = usize;
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

    fn finish(&self, container: &Self::Container) -> usize {
        container.len()
    }
}

/// Membership-only collector used by key-only group-bys: the group output
/// carries the key and never changes while the group lives.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Presence;

impl<In> Collector<In> for Presence {
    type Container = ();
    type Result = ();
    type Retractor = ();

    fn supply(&self) {}

    fn accumulate(&self, _container: &mut (), _input: &In) {}

    fn retract(&self, _container: &mut (), _retractor: ()) {}

    fn finish(&self, _container: &()) {}
}
