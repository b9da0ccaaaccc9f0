use std::marker::PhantomData;

use super::Collector;

/// Wraps a collector so it only sees the inputs accepted by `predicate`.
///
/// The decision is taken once, at accumulation, and carried by the
/// retractor: retracting a skipped input is a no-op even if the predicate
/// would now accept it.
///
/// # Example
///
/// ```
/// use streamforge_scoring::stream::collector::{conditionally, count, Collector};
///
/// let collector = conditionally(|x: &i32| *x > 0, count());
/// let mut container = collector.supply();
/// let skipped = collector.accumulate(&mut container, &-1);
/// collector.accumulate(&mut container, &5);
/// collector.retract(&mut container, skipped);
/// assert_eq!(collector.finish(&container), 1);
/// ```
pub fn conditionally<In, P, C>(predicate: P, inner: C) -> ConditionalCollector<In, P, C>
where
    P: Fn(&In) -> bool + Send + Sync + 'static,
    C: Collector<In>,
{
    ConditionalCollector {
        predicate,
        inner,
        _phantom: PhantomData,
    }
}

/// Created by [`conditionally()`].
pub struct ConditionalCollector<In, P, C> {
    predicate: P,
    inner: C,
    _phantom: PhantomData<fn(&In)>,
}

impl<In, P, C> Collector<In> for ConditionalCollector<In, P, C>
where
    In: 'static,
    P: Fn(&In) -> bool + Send + Sync + 'static,
    C: Collector<In>,
{
    type Container = C::Container;
    type Result = C::Result;
    /// `None` when the input was skipped.
    type Retractor = Option<C::Retractor>;

    fn supply(&self) -> C::Container {
        self.inner.supply()
    }

    fn accumulate(&self, container: &mut C::Container, input: &In) -> Self::Retractor {
        if (self.predicate)(input) {
            Some(self.inner.accumulate(container, input))
        } else {
            None
        }
    }

    fn retract(&self, container: &mut C::Container, retractor: Self::Retractor) {
        if let Some(retractor) = retractor {
            self.inner.retract(container, retractor);
        }
    }

    fn finish(&self, container: &C::Container) -> C::Result {
        self.inner.finish(container)
    }
}
