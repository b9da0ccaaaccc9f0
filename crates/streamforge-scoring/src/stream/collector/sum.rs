//! Sum and average collectors.

use std::fmt::Debug;
use std::marker::PhantomData;
use std::mem;
use std::ops::{Add, Sub};

use num_traits::ToPrimitive;

use super::Collector;

/// Creates a collector that sums the values of `mapper`.
///
/// Works for any type with a zero (`Default`), `+` and `-`: integers,
/// `Duration`, decimals.
///
/// # Example
///
/// ```
/// use streamforge_scoring::stream::collector::{sum, Collector};
///
/// let collector = sum(|x: &i64| *x);
/// let mut container = collector.supply();
/// let five = collector.accumulate(&mut container, &5);
/// collector.accumulate(&mut container, &7);
/// assert_eq!(collector.finish(&container), 12);
///
/// collector.retract(&mut container, five);
/// assert_eq!(collector.finish(&container), 7);
/// ```
pub fn sum<In, T, F>(mapper: F) -> SumCollector<In, T, F>
where
    T: Default + Clone + Add<Output = T> + Sub<Output = T>,
    F: Fn(&In) -> T + Send + Sync + 'static,
{
    SumCollector {
        mapper,
        _phantom: PhantomData,
    }
}

/// Created by [`sum()`].
pub struct SumCollector<In, T, F> {
    mapper: F,
    _phantom: PhantomData<fn(&In) -> T>,
}

impl<In, T, F> Collector<In> for SumCollector<In, T, F>
where
    In: 'static,
    T: Default + Clone + PartialEq + Debug + Add<Output = T> + Sub<Output = T> + Send + Sync + 'static,
    F: Fn(&In) -> T + Send + Sync + 'static,
{
    type Container = T;
    type Result = T;
    type Retractor = T;

    fn supply(&self) -> T {
        T::default()
    }

    fn accumulate(&self, container: &mut T, input: &In) -> T {
        let value = (self.mapper)(input);
        *container = mem::take(container) + value.clone();
        value
    }

    fn retract(&self, container: &mut T, value: T) {
        *container = mem::take(container) - value;
    }

    fn finish(&self, container: &T) -> T {
        container.clone()
    }
}

/// Creates a collector that averages the values of `mapper`.
///
/// The result is `None` while the group is empty.
pub fn average<In, T, F>(mapper: F) -> AverageCollector<In, T, F>
where
    T: Default + Clone + Add<Output = T> + Sub<Output = T> + ToPrimitive,
    F: Fn(&In) -> T + Send + Sync + 'static,
{
    AverageCollector {
        mapper,
        _phantom: PhantomData,
    }
}

/// Created by [`average()`].
pub struct AverageCollector<In, T, F> {
    mapper: F,
    _phantom: PhantomData<fn(&In) -> T>,
}

impl<In, T, F> Collector<In> for AverageCollector<In, T, F>
where
    In: 'static,
    T: Default + Clone + Add<Output = T> + Sub<Output = T> + ToPrimitive + Send + Sync + 'static,
    F: Fn(&In) -> T + Send + Sync + 'static,
{
    /// Count and running sum.
    type Container = (usize, T);
    type Result = Option<f64>;
    type Retractor = T;

    fn supply(&self) -> (usize, T) {
        (0, T::default())
    }

    fn accumulate(&self, container: &mut (usize, T), input: &In) -> T {
        let value = (self.mapper)(input);
        container.0 += 1;
        container.1 = mem::take(&mut container.1) + value.clone();
        value
    }

    fn retract(&self, container: &mut (usize, T), value: T) {
        container.0 -= 1;
        container.1 = mem::take(&mut container.1) - value;
    }

    fn finish(&self, container: &(usize, T)) -> Option<f64> {
        if container.0 == 0 {
            return None;
        }
        container.1.to_f64().map(|total| total / container.0 as f64)
    }
}
