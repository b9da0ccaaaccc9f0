//! Streams of fact quadruples, the widest arity.

use streamforge_core::Score;

use super::{flatten_last_node, StreamElement};

impl_arity_stream!(QuadConstraintStream, QuadView, (A, B, C, D), [A: 0, B: 1, C: 2, D: 3]);

impl<A, B, C, D, Sc> QuadConstraintStream<A, B, C, D, Sc>
where
    A: StreamElement,
    B: StreamElement,
    C: StreamElement,
    D: StreamElement,
    Sc: Score,
{
    pub fn flatten_last<O, I, F>(self, expand: F) -> QuadConstraintStream<A, B, C, O, Sc>
    where
        O: StreamElement,
        I: IntoIterator<Item = O>,
        F: Fn(&D) -> I + Send + Sync + 'static,
    {
        let stream = self.chain(flatten_last_node::<D, O, I, F>(4, expand));
        QuadConstraintStream::from_parts(self.factory, stream)
    }
}
