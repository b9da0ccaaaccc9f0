use std::collections::HashMap;

use streamforge_core::Result;

use super::{already_known, unknown};
use crate::network::{Facts, Node, Propagation, Side, Tuple, TupleId};

pub(crate) type FactsMapping = Box<dyn Fn(&Tuple) -> Facts + Send + Sync>;
pub(crate) type FactsExpansion = Box<dyn Fn(&Tuple) -> Vec<Facts> + Send + Sync>;

/// Maps every input tuple to exactly one output tuple.
pub(crate) struct MapNode {
    mapping: FactsMapping,
    outputs: HashMap<TupleId, TupleId>,
}

impl MapNode {
    pub(crate) fn new(mapping: FactsMapping) -> Self {
        Self {
            mapping,
            outputs: HashMap::new(),
        }
    }
}

impl Node for MapNode {
    fn insert(&mut self, side: Side, id: TupleId, ctx: &mut Propagation<'_>) -> Result<()> {
        if self.outputs.contains_key(&id) {
            return Err(already_known(self.name(), side, id));
        }
        let facts = (self.mapping)(ctx.tuple(id)?);
        let out = ctx.insert(facts);
        self.outputs.insert(id, out);
        Ok(())
    }

    fn update(&mut self, side: Side, id: TupleId, ctx: &mut Propagation<'_>) -> Result<()> {
        let out = *self
            .outputs
            .get(&id)
            .ok_or_else(|| unknown("MapNode", side, id))?;
        let facts = (self.mapping)(ctx.tuple(id)?);
        ctx.update(out, facts)
    }

    fn retract(&mut self, side: Side, id: TupleId, ctx: &mut Propagation<'_>) -> Result<()> {
        let out = self
            .outputs
            .remove(&id)
            .ok_or_else(|| unknown("MapNode", side, id))?;
        ctx.retract(out);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "MapNode"
    }
}

/// Replaces the last element of every input tuple by each item of a
/// collection derived from it, emitting one output tuple per item.
///
/// Updates are positional: the i-th item of the new expansion updates the
/// i-th output tuple, surplus items are inserted and missing ones retracted.
pub(crate) struct FlattenNode {
    expansion: FactsExpansion,
    outputs: HashMap<TupleId, Vec<TupleId>>,
}

impl FlattenNode {
    pub(crate) fn new(expansion: FactsExpansion) -> Self {
        Self {
            expansion,
            outputs: HashMap::new(),
        }
    }
}

impl Node for FlattenNode {
    fn insert(&mut self, side: Side, id: TupleId, ctx: &mut Propagation<'_>) -> Result<()> {
        if self.outputs.contains_key(&id) {
            return Err(already_known(self.name(), side, id));
        }
        let expanded = (self.expansion)(ctx.tuple(id)?);
        let outs = expanded.into_iter().map(|facts| ctx.insert(facts)).collect();
        self.outputs.insert(id, outs);
        Ok(())
    }

    fn update(&mut self, side: Side, id: TupleId, ctx: &mut Propagation<'_>) -> Result<()> {
        let expanded = (self.expansion)(ctx.tuple(id)?);
        let outs = self
            .outputs
            .get_mut(&id)
            .ok_or_else(|| unknown("FlattenNode", side, id))?;
        let kept = expanded.len().min(outs.len());
        for out in outs.drain(kept..) {
            ctx.retract(out);
        }
        for (position, facts) in expanded.into_iter().enumerate() {
            if position < kept {
                ctx.update(outs[position], facts)?;
            } else {
                outs.push(ctx.insert(facts));
            }
        }
        Ok(())
    }

    fn retract(&mut self, side: Side, id: TupleId, ctx: &mut Propagation<'_>) -> Result<()> {
        let outs = self
            .outputs
            .remove(&id)
            .ok_or_else(|| unknown("FlattenNode", side, id))?;
        for out in outs {
            ctx.retract(out);
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "FlattenNode"
    }
}
