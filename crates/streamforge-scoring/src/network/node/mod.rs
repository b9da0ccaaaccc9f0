//! Propagation node implementations.

mod distinct;
mod filter;
mod group_by;
mod if_exists;
mod join;
mod map;

pub(crate) use distinct::DistinctNode;
pub(crate) use filter::FilterNode;
pub(crate) use group_by::{GroupByNode, GroupEmitter};
pub(crate) use if_exists::IfExistsNode;
pub(crate) use join::JoinNode;
pub(crate) use map::{FlattenNode, MapNode};

use streamforge_core::StreamForgeError;

use super::{Side, TupleId};

fn already_known(node: &str, side: Side, id: TupleId) -> StreamForgeError {
    StreamForgeError::LifecycleViolation(format!(
        "{} received a second insert of {} on its {:?} input",
        node, id, side
    ))
}

fn unknown(node: &str, side: Side, id: TupleId) -> StreamForgeError {
    StreamForgeError::LifecycleViolation(format!(
        "{} received an event for {} on its {:?} input, which was never inserted",
        node, id, side
    ))
}
