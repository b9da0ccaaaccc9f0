//! The tuple propagation network.
//!
//! A network is a DAG of nodes built once per working solution. Facts enter
//! at one source stream per fact class as arity-1 tuples; every node turns
//! the lifecycle events of its input streams into events on its own output
//! stream; constraint scorers sit at the leaves. Propagation is synchronous
//! and depth-first: an event handed to [`Session`] is fully processed before
//! the call returns.

pub(crate) mod node;
mod propagation;
mod scorer;
mod session;
mod tuple;

#[cfg(test)]
mod tests;

use std::marker::PhantomData;

pub use propagation::TupleEvent;
pub use tuple::{Facts, Tuple, TupleId, TupleState};

pub(crate) use propagation::Propagation;
pub(crate) use scorer::{Justifier, MatchWeight};
pub(crate) use session::{build_session, NetworkBuilder, Session};
pub(crate) use tuple::TupleArena;

use streamforge_core::Result;

/// Identifier of a stream (the output of a source or of a node).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StreamId(pub(crate) usize);

/// Identifier of a node in the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

/// Which input of a two-input node a stream feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

/// Listener of a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Target {
    Node { node: NodeId, side: Side },
    Scorer(usize),
}

/// A propagation node.
///
/// A node receives the events of its input streams and emits events about
/// the tuples it owns through the [`Propagation`] context. Single-input nodes
/// only ever see [`Side::Left`].
pub(crate) trait Node: Send {
    fn insert(&mut self, side: Side, id: TupleId, ctx: &mut Propagation<'_>) -> Result<()>;

    fn update(&mut self, side: Side, id: TupleId, ctx: &mut Propagation<'_>) -> Result<()>;

    fn retract(&mut self, side: Side, id: TupleId, ctx: &mut Propagation<'_>) -> Result<()>;

    fn name(&self) -> &'static str;
}

pub(crate) type TuplePredicate = Box<dyn Fn(&Tuple) -> bool + Send + Sync>;
pub(crate) type PairPredicate = Box<dyn Fn(&Tuple, &Tuple) -> bool + Send + Sync>;
pub(crate) type TupleMapping<K> = Box<dyn Fn(&Tuple) -> K + Send + Sync>;

/// Typed view of a tuple handed to collectors.
///
/// Uni tuples lend their element; wider tuples are cloned into an owned
/// Rust tuple.
pub trait TupleView: 'static {
    type Input: 'static;

    fn with<R>(tuple: &Tuple, f: impl FnOnce(&Self::Input) -> R) -> R;
}

/// View of an arity-1 tuple as `A`.
pub struct UniView<A>(PhantomData<fn() -> A>);

/// View of an arity-2 tuple as `(A, B)`.
pub struct BiView<A, B>(PhantomData<fn() -> (A, B)>);

/// View of an arity-3 tuple as `(A, B, C)`.
pub struct TriView<A, B, C>(PhantomData<fn() -> (A, B, C)>);

/// View of an arity-4 tuple as `(A, B, C, D)`.
pub struct QuadView<A, B, C, D>(PhantomData<fn() -> (A, B, C, D)>);

impl<A: 'static> TupleView for UniView<A> {
    type Input = A;

    fn with<R>(tuple: &Tuple, f: impl FnOnce(&A) -> R) -> R {
        f(tuple.get::<A>(0))
    }
}

impl<A: Clone + 'static, B: Clone + 'static> TupleView for BiView<A, B> {
    type Input = (A, B);

    fn with<R>(tuple: &Tuple, f: impl FnOnce(&(A, B)) -> R) -> R {
        f(&(tuple.get::<A>(0).clone(), tuple.get::<B>(1).clone()))
    }
}

impl<A, B, C> TupleView for TriView<A, B, C>
where
    A: Clone + 'static,
    B: Clone + 'static,
    C: Clone + 'static,
{
    type Input = (A, B, C);

    fn with<R>(tuple: &Tuple, f: impl FnOnce(&(A, B, C)) -> R) -> R {
        f(&(
            tuple.get::<A>(0).clone(),
            tuple.get::<B>(1).clone(),
            tuple.get::<C>(2).clone(),
        ))
    }
}

impl<A, B, C, D> TupleView for QuadView<A, B, C, D>
where
    A: Clone + 'static,
    B: Clone + 'static,
    C: Clone + 'static,
    D: Clone + 'static,
{
    type Input = (A, B, C, D);

    fn with<R>(tuple: &Tuple, f: impl FnOnce(&(A, B, C, D)) -> R) -> R {
        f(&(
            tuple.get::<A>(0).clone(),
            tuple.get::<B>(1).clone(),
            tuple.get::<C>(2).clone(),
            tuple.get::<D>(3).clone(),
        ))
    }
}
