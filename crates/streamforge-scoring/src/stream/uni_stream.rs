//! Streams of single facts.

use streamforge_core::Score;

use super::joiner::Joiner;
use super::{flatten_last_node, BiConstraintStream, JoinKey, StreamElement};
use crate::network::node::JoinNode;
use crate::network::Side;

impl_arity_stream!(UniConstraintStream, UniView, A, [A: 0]);

impl<A, Sc> UniConstraintStream<A, Sc>
where
    A: StreamElement,
    Sc: Score,
{
    /// Joins every tuple with the facts of `other` accepted by `joiner`.
    ///
    /// # Example
    ///
    /// ```
    /// use streamforge_core::HardSoftScore;
    /// use streamforge_scoring::stream::joiner::equal;
    /// use streamforge_scoring::{Constraint, ConstraintFactory};
    ///
    /// #[derive(Clone, Debug)]
    /// struct Lesson { room: u32, students: u32 }
    /// #[derive(Clone, Debug)]
    /// struct Room { id: u32, capacity: u32 }
    ///
    /// fn define(factory: &ConstraintFactory<HardSoftScore>) -> Vec<Constraint<HardSoftScore>> {
    ///     vec![factory
    ///         .for_each::<Lesson>()
    ///         .join(factory.for_each::<Room>(), equal(|l: &Lesson| l.room, |r: &Room| r.id))
    ///         .filter(|l, r| l.students > r.capacity)
    ///         .penalize_with(HardSoftScore::ONE_HARD, |l, r| (l.students - r.capacity) as i64)
    ///         .as_constraint("Room capacity")]
    /// }
    /// ```
    pub fn join<B, K>(
        self,
        other: UniConstraintStream<B, Sc>,
        joiner: Joiner<(A,), B, K>,
    ) -> BiConstraintStream<A, B, Sc>
    where
        B: StreamElement,
        K: JoinKey,
    {
        let node = JoinNode::new(joiner.left_key, joiner.right_key, joiner.filter);
        let stream = self
            .factory
            .add_node(node, &[(self.stream, Side::Left), (other.stream, Side::Right)]);
        BiConstraintStream::from_parts(self.factory, stream)
    }

    /// Replaces every fact by the items `expand` returns for it.
    pub fn flatten_last<O, I, F>(self, expand: F) -> UniConstraintStream<O, Sc>
    where
        O: StreamElement,
        I: IntoIterator<Item = O>,
        F: Fn(&A) -> I + Send + Sync + 'static,
    {
        let stream = self.chain(flatten_last_node::<A, O, I, F>(1, expand));
        UniConstraintStream::from_parts(self.factory, stream)
    }
}
