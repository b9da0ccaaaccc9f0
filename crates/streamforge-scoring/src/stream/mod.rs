//! Fluent constraint stream API.
//!
//! Streams are typed handles on positions of the constraint network under
//! construction. Every operation appends a node and returns the stream of
//! that node's output; nothing is evaluated until a score director builds a
//! session from the finished constraints.
//!
//! # Example
//!
//! ```
//! use streamforge_core::SimpleScore;
//! use streamforge_scoring::stream::collector::count;
//! use streamforge_scoring::{Constraint, ConstraintFactory};
//!
//! #[derive(Clone, Debug)]
//! struct Shift { employee: Option<usize>, day: u32 }
//!
//! fn define(factory: &ConstraintFactory<SimpleScore>) -> Vec<Constraint<SimpleScore>> {
//!     let shifts = factory.for_each::<Shift>();
//!     vec![
//!         shifts
//!             .clone()
//!             .filter(|s| s.employee.is_none())
//!             .penalize(SimpleScore::ONE)
//!             .as_constraint("Unassigned shift"),
//!         shifts
//!             .filter(|s| s.employee.is_some())
//!             .group_by(|s| (s.employee, s.day), count())
//!             .filter(|_, n| *n > 1)
//!             .penalize_with(SimpleScore::ONE, |_, n| *n as i64 - 1)
//!             .as_constraint("One shift per day"),
//!     ]
//! }
//! ```
//!
//! ```text
//! factory.for_each::<A>()      -> UniConstraintStream<A>   (source)
//!     .join(other, joiner)     -> BiConstraintStream<A, B> (join node)
//!     .group_by(key, count())  -> BiConstraintStream<K, usize>
//!     .penalize(weight)        -> ConstraintBuilder
//!     .as_constraint(name)     -> Constraint               (score node)
//! ```

#[macro_use]
mod arity_stream_macros;
mod bi_stream;
pub mod collector;
mod constraint;
mod factory;
pub mod joiner;
mod quad_stream;
mod tri_stream;
mod uni_stream;


use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;

use streamforge_core::FactValue;

use crate::network::node::FlattenNode;
use crate::network::{Facts, Tuple};

pub use bi_stream::BiConstraintStream;
pub use constraint::{Constraint, ConstraintBuilder};
pub use factory::ConstraintFactory;
pub use quad_stream::QuadConstraintStream;
pub use tri_stream::TriConstraintStream;
pub use uni_stream::UniConstraintStream;

/// Values that can flow through a stream: facts, mapped values, group keys
/// and collector results.
pub trait StreamElement: Clone + Debug + Send + Sync + 'static {}

impl<T: Clone + Debug + Send + Sync + 'static> StreamElement for T {}

/// Values usable as join, group and distinct keys.
pub trait JoinKey: Eq + Hash + Clone + Send + Sync + 'static {}

impl<T: Eq + Hash + Clone + Send + Sync + 'static> JoinKey for T {}

pub(crate) fn fact<T: StreamElement>(value: T) -> FactValue {
    Arc::new(value)
}

/// Flattens the last element of `arity`-tuples of which it is an `L`,
/// keeping the leading elements.
pub(crate) fn flatten_last_node<L, O, I, F>(arity: usize, expand: F) -> FlattenNode
where
    L: 'static,
    O: StreamElement,
    I: IntoIterator<Item = O>,
    F: Fn(&L) -> I + Send + Sync + 'static,
{
    let last = arity - 1;
    FlattenNode::new(Box::new(move |t: &Tuple| {
        expand(t.get::<L>(last))
            .into_iter()
            .map(|item| {
                let mut facts: Facts = t.facts()[..last].iter().cloned().collect();
                facts.push(fact(item));
                facts
            })
            .collect()
    }))
}
