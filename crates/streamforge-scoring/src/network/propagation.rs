//! Per-call propagation context handed to nodes.

use streamforge_core::Result;

use super::tuple::{Facts, Tuple, TupleArena, TupleId};

/// Lifecycle event carried from one node to its listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TupleEvent {
    Insert,
    Update,
    Retract,
}

/// Gives a node read access to tuples and collects the events it emits.
///
/// Emitted events are fired by the session on the node's output stream, in
/// emission order, once the node call returns.
pub(crate) struct Propagation<'a> {
    arena: &'a mut TupleArena,
    emitted: Vec<(TupleEvent, TupleId)>,
}

impl<'a> Propagation<'a> {
    pub(crate) fn new(arena: &'a mut TupleArena) -> Self {
        Self {
            arena,
            emitted: Vec::new(),
        }
    }

    pub(crate) fn tuple(&self, id: TupleId) -> Result<&Tuple> {
        self.arena.get(id)
    }

    /// Creates an output tuple and schedules its insert.
    pub(crate) fn insert(&mut self, facts: Facts) -> TupleId {
        let id = self.arena.create(facts);
        self.emitted.push((TupleEvent::Insert, id));
        id
    }

    /// Replaces the facts of an output tuple and schedules its update.
    pub(crate) fn update(&mut self, id: TupleId, facts: Facts) -> Result<()> {
        self.arena.replace_facts(id, facts)?;
        self.emitted.push((TupleEvent::Update, id));
        Ok(())
    }

    /// Schedules the retract of an output tuple.
    pub(crate) fn retract(&mut self, id: TupleId) {
        self.emitted.push((TupleEvent::Retract, id));
    }

    pub(crate) fn into_emitted(self) -> Vec<(TupleEvent, TupleId)> {
        self.emitted
    }
}
