//! Streams of fact triples.

use streamforge_core::Score;

use super::joiner::Joiner;
use super::{flatten_last_node, JoinKey, QuadConstraintStream, StreamElement, UniConstraintStream};
use crate::network::node::JoinNode;
use crate::network::Side;

impl_arity_stream!(TriConstraintStream, TriView, (A, B, C), [A: 0, B: 1, C: 2]);

impl<A, B, C, Sc> TriConstraintStream<A, B, C, Sc>
where
    A: StreamElement,
    B: StreamElement,
    C: StreamElement,
    Sc: Score,
{
    /// Extends every triple with the facts of `other` accepted by `joiner`.
    pub fn join<D, K>(
        self,
        other: UniConstraintStream<D, Sc>,
        joiner: Joiner<(A, B, C), D, K>,
    ) -> QuadConstraintStream<A, B, C, D, Sc>
    where
        D: StreamElement,
        K: JoinKey,
    {
        let node = JoinNode::new(joiner.left_key, joiner.right_key, joiner.filter);
        let stream = self
            .factory
            .add_node(node, &[(self.stream, Side::Left), (other.stream, Side::Right)]);
        QuadConstraintStream::from_parts(self.factory, stream)
    }

    pub fn flatten_last<O, I, F>(self, expand: F) -> TriConstraintStream<A, B, O, Sc>
    where
        O: StreamElement,
        I: IntoIterator<Item = O>,
        F: Fn(&C) -> I + Send + Sync + 'static,
    {
        let stream = self.chain(flatten_last_node::<C, O, I, F>(3, expand));
        TriConstraintStream::from_parts(self.factory, stream)
    }
}
