use std::fmt::Debug;

/// An incrementally retractable aggregate.
///
/// A group-by node owns one container per group. Every accumulation returns
/// a retractor that undoes exactly that accumulation, whatever was
/// accumulated or retracted in between:
///
/// ```text
/// let rx = accumulate(c, x); accumulate(c, y); retract(c, rx);
/// finish(c) == finish(supply() + y)
/// ```
///
/// The retractor is a value of an associated type, so it can only be handed
/// back to the collector kind that produced it.
pub trait Collector<In>: Send + Sync + 'static {
    type Container: Send + 'static;
    type Result: Clone + PartialEq + Debug + Send + Sync + 'static;
    type Retractor: Send + 'static;

    fn supply(&self) -> Self::Container;

    fn accumulate(&self, container: &mut Self::Container, input: &In) -> Self::Retractor;

    fn retract(&self, container: &mut Self::Container, retractor: Self::Retractor);

    fn finish(&self, container: &Self::Container) -> Self::Result;
}

/// Two collectors run side by side; the result is the pair of results.
impl<In, C1, C2> Collector<In> for (C1, C2)
where
    C1: Collector<In>,
    C2: Collector<In>,
{
    type Container = (C1::Container, C2::Container);
    type Result = (C1::Result, C2::Result);
    type Retractor = (C1::Retractor, C2::Retractor);

    fn supply(&self) -> Self::Container {
        (self.0.supply(), self.1.supply())
    }

    fn accumulate(&self, container: &mut Self::Container, input: &In) -> Self::Retractor {
        (
            self.0.accumulate(&mut container.0, input),
            self.1.accumulate(&mut container.1, input),
        )
    }

    fn retract(&self, container: &mut Self::Container, retractor: Self::Retractor) {
        self.0.retract(&mut container.0, retractor.0);
        self.1.retract(&mut container.1, retractor.1);
    }

    fn finish(&self, container: &Self::Container) -> Self::Result {
        (self.0.finish(&container.0), self.1.finish(&container.1))
    }
}
