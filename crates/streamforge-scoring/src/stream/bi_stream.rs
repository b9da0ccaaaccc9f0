//! Streams of fact pairs.

use streamforge_core::Score;

use super::joiner::Joiner;
use super::{flatten_last_node, JoinKey, StreamElement, TriConstraintStream, UniConstraintStream};
use crate::network::node::JoinNode;
use crate::network::Side;

impl_arity_stream!(BiConstraintStream, BiView, (A, B), [A: 0, B: 1]);

impl<A, B, Sc> BiConstraintStream<A, B, Sc>
where
    A: StreamElement,
    B: StreamElement,
    Sc: Score,
{
    /// Extends every pair with the facts of `other` accepted by `joiner`.
    pub fn join<C, K>(
        self,
        other: UniConstraintStream<C, Sc>,
        joiner: Joiner<(A, B), C, K>,
    ) -> TriConstraintStream<A, B, C, Sc>
    where
        C: StreamElement,
        K: JoinKey,
    {
        let node = JoinNode::new(joiner.left_key, joiner.right_key, joiner.filter);
        let stream = self
            .factory
            .add_node(node, &[(self.stream, Side::Left), (other.stream, Side::Right)]);
        TriConstraintStream::from_parts(self.factory, stream)
    }

    /// Replaces the second element by each item `expand` returns for it.
    ///
    /// # Example
    ///
    /// ```
    /// use streamforge_core::SimpleScore;
    /// use streamforge_scoring::stream::joiner::equal;
    /// use streamforge_scoring::{Constraint, ConstraintFactory};
    ///
    /// #[derive(Clone, Debug)]
    /// struct Employee { id: u32, unavailable: Vec<u32> }
    /// #[derive(Clone, Debug)]
    /// struct Shift { employee: u32, day: u32 }
    ///
    /// fn define(factory: &ConstraintFactory<SimpleScore>) -> Vec<Constraint<SimpleScore>> {
    ///     vec![factory
    ///         .for_each::<Shift>()
    ///         .join(factory.for_each::<Employee>(), equal(|s: &Shift| s.employee, |e: &Employee| e.id))
    ///         .flatten_last(|e: &Employee| e.unavailable.clone())
    ///         .filter(|s, day| s.day == *day)
    ///         .penalize(SimpleScore::ONE)
    ///         .as_constraint("Unavailable employee")]
    /// }
    /// ```
    pub fn flatten_last<O, I, F>(self, expand: F) -> BiConstraintStream<A, O, Sc>
    where
        O: StreamElement,
        I: IntoIterator<Item = O>,
        F: Fn(&B) -> I + Send + Sync + 'static,
    {
        let stream = self.chain(flatten_last_node::<B, O, I, F>(2, expand));
        BiConstraintStream::from_parts(self.factory, stream)
    }
}
