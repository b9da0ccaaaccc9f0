use std::collections::HashMap;

use streamforge_core::Result;

use super::{already_known, unknown};
use crate::network::{Node, Propagation, Side, TupleId, TuplePredicate};

/// Forwards the tuples that satisfy a predicate.
///
/// Remembers, per input, whether it is currently forwarded so that an update
/// flipping the predicate becomes an insert or a retract downstream.
pub(crate) struct FilterNode {
    predicate: TuplePredicate,
    outputs: HashMap<TupleId, Option<TupleId>>,
}

impl FilterNode {
    pub(crate) fn new(predicate: TuplePredicate) -> Self {
        Self {
            predicate,
            outputs: HashMap::new(),
        }
    }
}

impl Node for FilterNode {
    fn insert(&mut self, side: Side, id: TupleId, ctx: &mut Propagation<'_>) -> Result<()> {
        if self.outputs.contains_key(&id) {
            return Err(already_known(self.name(), side, id));
        }
        let tuple = ctx.tuple(id)?;
        let out = if (self.predicate)(tuple) {
            let facts = tuple.to_facts();
            Some(ctx.insert(facts))
        } else {
            None
        };
        self.outputs.insert(id, out);
        Ok(())
    }

    fn update(&mut self, side: Side, id: TupleId, ctx: &mut Propagation<'_>) -> Result<()> {
        let tuple = ctx.tuple(id)?;
        let passes = (self.predicate)(tuple);
        let facts = tuple.to_facts();
        let slot = self
            .outputs
            .get_mut(&id)
            .ok_or_else(|| unknown("FilterNode", side, id))?;
        match (*slot, passes) {
            (Some(out), true) => ctx.update(out, facts)?,
            (Some(out), false) => {
                ctx.retract(out);
                *slot = None;
            }
            (None, true) => *slot = Some(ctx.insert(facts)),
            (None, false) => {}
        }
        Ok(())
    }

    fn retract(&mut self, side: Side, id: TupleId, ctx: &mut Propagation<'_>) -> Result<()> {
        match self.outputs.remove(&id) {
            Some(Some(out)) => ctx.retract(out),
            Some(None) => {}
            None => return Err(unknown(self.name(), side, id)),
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "FilterNode"
    }
}
