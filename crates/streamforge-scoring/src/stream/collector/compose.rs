//! Composition of collectors.

use std::fmt::Debug;
use std::marker::PhantomData;

use super::Collector;

/// Runs two collectors on the same inputs and combines their results.
///
/// # Example
///
/// ```
/// use streamforge_scoring::stream::collector::{compose2, count, sum, Collector};
///
/// // Mean as an integer division of sum by count.
/// let collector = compose2(count(), sum(|x: &i64| *x), |n: &usize, s: &i64| {
///     if *n == 0 { 0 } else { s / *n as i64 }
/// });
/// let mut container = collector.supply();
/// collector.accumulate(&mut container, &4);
/// collector.accumulate(&mut container, &8);
/// assert_eq!(collector.finish(&container), 6);
/// ```
pub fn compose2<In, C1, C2, R, F>(first: C1, second: C2, combiner: F) -> Compose2<In, C1, C2, F>
where
    C1: Collector<In>,
    C2: Collector<In>,
    F: Fn(&C1::Result, &C2::Result) -> R + Send + Sync + 'static,
{
    Compose2 {
        collectors: (first, second),
        combiner,
        _phantom: PhantomData,
    }
}

/// Created by [`compose2()`].
pub struct Compose2<In, C1, C2, F> {
    collectors: (C1, C2),
    combiner: F,
    _phantom: PhantomData<fn(&In)>,
}

impl<In, C1, C2, R, F> Collector<In> for Compose2<In, C1, C2, F>
where
    In: 'static,
    C1: Collector<In>,
    C2: Collector<In>,
    R: Clone + PartialEq + Debug + Send + Sync + 'static,
    F: Fn(&C1::Result, &C2::Result) -> R + Send + Sync + 'static,
{
    type Container = (C1::Container, C2::Container);
    type Result = R;
    type Retractor = (C1::Retractor, C2::Retractor);

    fn supply(&self) -> Self::Container {
        self.collectors.supply()
    }

    fn accumulate(&self, container: &mut Self::Container, input: &In) -> Self::Retractor {
        self.collectors.accumulate(container, input)
    }

    fn retract(&self, container: &mut Self::Container, retractor: Self::Retractor) {
        self.collectors.retract(container, retractor);
    }

    fn finish(&self, container: &Self::Container) -> R {
        let (first, second) = self.collectors.finish(container);
        (self.combiner)(&first, &second)
    }
}

/// Runs three collectors on the same inputs and combines their results.
pub fn compose3<In, C1, C2, C3, R, F>(
    first: C1,
    second: C2,
    third: C3,
    combiner: F,
) -> Compose3<In, C1, C2, C3, F>
where
    C1: Collector<In>,
    C2: Collector<In>,
    C3: Collector<In>,
    F: Fn(&C1::Result, &C2::Result, &C3::Result) -> R + Send + Sync + 'static,
{
    Compose3 {
        collectors: (first, second, third),
        combiner,
        _phantom: PhantomData,
    }
}

/// Created by [`compose3()`].
pub struct Compose3<In, C1, C2, C3, F> {
    collectors: (C1, C2, C3),
    combiner: F,
    _phantom: PhantomData<fn(&In)>,
}

impl<In, C1, C2, C3, R, F> Collector<In> for Compose3<In, C1, C2, C3, F>
where
    In: 'static,
    C1: Collector<In>,
    C2: Collector<In>,
    C3: Collector<In>,
    R: Clone + PartialEq + Debug + Send + Sync + 'static,
    F: Fn(&C1::Result, &C2::Result, &C3::Result) -> R + Send + Sync + 'static,
{
    type Container = (C1::Container, C2::Container, C3::Container);
    type Result = R;
    type Retractor = (C1::Retractor, C2::Retractor, C3::Retractor);

    fn supply(&self) -> Self::Container {
        let (c1, c2, c3) = &self.collectors;
        (c1.supply(), c2.supply(), c3.supply())
    }

    fn accumulate(&self, container: &mut Self::Container, input: &In) -> Self::Retractor {
        let (c1, c2, c3) = &self.collectors;
        (
            c1.accumulate(&mut container.0, input),
            c2.accumulate(&mut container.1, input),
            c3.accumulate(&mut container.2, input),
        )
    }

    fn retract(&self, container: &mut Self::Container, retractor: Self::Retractor) {
        let (c1, c2, c3) = &self.collectors;
        c1.retract(&mut container.0, retractor.0);
        c2.retract(&mut container.1, retractor.1);
        c3.retract(&mut container.2, retractor.2);
    }

    fn finish(&self, container: &Self::Container) -> R {
        let (c1, c2, c3) = &self.collectors;
        (self.combiner)(
            &c1.finish(&container.0),
            &c2.finish(&container.1),
            &c3.finish(&container.2),
        )
    }
}

/// Runs four collectors on the same inputs and combines their results.
pub fn compose4<In, C1, C2, C3, C4, R, F>(
    first: C1,
    second: C2,
    third: C3,
    fourth: C4,
    combiner: F,
) -> Compose4<In, C1, C2, C3, C4, F>
where
    C1: Collector<In>,
    C2: Collector<In>,
    C3: Collector<In>,
    C4: Collector<In>,
    F: Fn(&C1::Result, &C2::Result, &C3::Result, &C4::Result) -> R + Send + Sync + 'static,
{
    Compose4 {
        collectors: (first, second, third, fourth),
        combiner,
        _phantom: PhantomData,
    }
}

/// Created by [`compose4()`].
pub struct Compose4<In, C1, C2, C3, C4, F> {
    collectors: (C1, C2, C3, C4),
    combiner: F,
    _phantom: PhantomData<fn(&In)>,
}

impl<In, C1, C2, C3, C4, R, F> Collector<In> for Compose4<In, C1, C2, C3, C4, F>
where
    In: 'static,
    C1: Collector<In>,
    C2: Collector<In>,
    C3: Collector<In>,
    C4: Collector<In>,
    R: Clone + PartialEq + Debug + Send + Sync + 'static,
    F: Fn(&C1::Result, &C2::Result, &C3::Result, &C4::Result) -> R + Send + Sync + 'static,
{
    type Container = (C1::Container, C2::Container, C3::Container, C4::Container);
    type Result = R;
    type Retractor = (C1::Retractor, C2::Retractor, C3::Retractor, C4::Retractor);

    fn supply(&self) -> Self::Container {
        let (c1, c2, c3, c4) = &self.collectors;
        (c1.supply(), c2.supply(), c3.supply(), c4.supply())
    }

    fn accumulate(&self, container: &mut Self::Container, input: &In) -> Self::Retractor {
        let (c1, c2, c3, c4) = &self.collectors;
        (
            c1.accumulate(&mut container.0, input),
            c2.accumulate(&mut container.1, input),
            c3.accumulate(&mut container.2, input),
            c4.accumulate(&mut container.3, input),
        )
    }

    fn retract(&self, container: &mut Self::Container, retractor: Self::Retractor) {
        let (c1, c2, c3, c4) = &self.collectors;
        c1.retract(&mut container.0, retractor.0);
        c2.retract(&mut container.1, retractor.1);
        c3.retract(&mut container.2, retractor.2);
        c4.retract(&mut container.3, retractor.3);
    }

    fn finish(&self, container: &Self::Container) -> R {
        let (c1, c2, c3, c4) = &self.collectors;
        (self.combiner)(
            &c1.finish(&container.0),
            &c2.finish(&container.1),
            &c3.finish(&container.2),
            &c4.finish(&container.3),
        )
    }
}
