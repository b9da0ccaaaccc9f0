// Constraint factory: the entry point of the fluent constraint API.

use std::any::{type_name, TypeId};
use std::cell::RefCell;
use std::marker::PhantomData;
use std::rc::Rc;

use streamforge_core::{Score, SolutionDescriptor};

use super::joiner::Joiner;
use super::{BiConstraintStream, JoinKey, StreamElement, UniConstraintStream};
use crate::network::node::JoinNode;
use crate::network::{NetworkBuilder, Node, Side, StreamId};

// Factory for creating constraint streams over the fact classes of one
// solution descriptor.
//
// Handed to `ConstraintProvider::define_constraints`; every stream created
// from it (and every clone of it) appends to the same network.
//
// # Example
//
// ```
// use streamforge_core::SimpleScore;
// use streamforge_scoring::stream::joiner::equal_self;
// use streamforge_scoring::{Constraint, ConstraintFactory};
//
// #[derive(Clone, Debug)]
// struct Queen { row: u32 }
//
// fn define(factory: &ConstraintFactory<SimpleScore>) -> Vec<Constraint<SimpleScore>> {
//     vec![factory
//         .for_each_unique_pair(equal_self(|q: &Queen| q.row))
//         .penalize(SimpleScore::ONE)
//         .as_constraint("Row conflict")]
// }
// ```
pub struct ConstraintFactory<Sc: Score> {
    builder: Rc<RefCell<NetworkBuilder>>,
    _phantom: PhantomData<fn() -> Sc>,
}

impl<Sc: Score> Clone for ConstraintFactory<Sc> {
    fn clone(&self) -> Self {
        Self {
            builder: Rc::clone(&self.builder),
            _phantom: PhantomData,
        }
    }
}

impl<Sc: Score> std::fmt::Debug for ConstraintFactory<Sc> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConstraintFactory").finish_non_exhaustive()
    }
}

impl<Sc: Score> ConstraintFactory<Sc> {
    pub(crate) fn new(descriptor: &SolutionDescriptor) -> Self {
        Self {
            builder: Rc::new(RefCell::new(NetworkBuilder::new(descriptor))),
            _phantom: PhantomData,
        }
    }

    // Creates a uni stream over every fact of type `A`.
    //
    // `A` must be a registered entity or problem-fact class; otherwise the
    // network build fails with a configuration error.
    pub fn for_each<A: StreamElement>(&self) -> UniConstraintStream<A, Sc> {
        let stream = self
            .builder
            .borrow_mut()
            .source(TypeId::of::<A>(), type_name::<A>());
        UniConstraintStream::from_parts(self.clone(), stream)
    }

    // Creates a bi stream over every unordered pair of distinct `A` facts
    // accepted by `joiner`. Each pair appears once, never as `(a, a)`.
    pub fn for_each_unique_pair<A, K>(&self, joiner: Joiner<(A,), A, K>) -> BiConstraintStream<A, A, Sc>
    where
        A: StreamElement,
        K: JoinKey,
    {
        let source = self.for_each::<A>().stream;
        let node = JoinNode::new(joiner.left_key, joiner.right_key, joiner.filter).unique_pairs();
        let stream = self.add_node(node, &[(source, Side::Left), (source, Side::Right)]);
        BiConstraintStream::from_parts(self.clone(), stream)
    }

    pub(crate) fn add_node(&self, node: impl Node + 'static, inputs: &[(StreamId, Side)]) -> StreamId {
        self.builder.borrow_mut().add_node(Box::new(node), inputs)
    }

    pub(crate) fn into_builder(self) -> NetworkBuilder {
        self.builder.take()
    }
}
