use std::collections::HashMap;
use std::hash::Hash;

use streamforge_core::Result;

use super::{already_known, unknown};
use crate::network::{Node, Propagation, Side, TupleId, TupleMapping};

struct DistinctGroup {
    count: usize,
    out: TupleId,
}

/// Forwards one tuple per distinct value.
///
/// Inputs are keyed by their value; the first input of a key creates the
/// output tuple and the last one to leave retracts it.
pub(crate) struct DistinctNode<K> {
    key: TupleMapping<K>,
    groups: HashMap<K, DistinctGroup>,
    members: HashMap<TupleId, K>,
}

impl<K> DistinctNode<K>
where
    K: Eq + Hash + Clone + Send + 'static,
{
    pub(crate) fn new(key: TupleMapping<K>) -> Self {
        Self {
            key,
            groups: HashMap::new(),
            members: HashMap::new(),
        }
    }

    fn join_group(&mut self, id: TupleId, key: K, ctx: &mut Propagation<'_>) -> Result<()> {
        match self.groups.get_mut(&key) {
            Some(group) => group.count += 1,
            None => {
                let facts = ctx.tuple(id)?.to_facts();
                let out = ctx.insert(facts);
                self.groups
                    .insert(key.clone(), DistinctGroup { count: 1, out });
            }
        }
        self.members.insert(id, key);
        Ok(())
    }

    fn leave_group(&mut self, key: &K, ctx: &mut Propagation<'_>) {
        if let Some(group) = self.groups.get_mut(key) {
            group.count -= 1;
            if group.count == 0 {
                ctx.retract(group.out);
                self.groups.remove(key);
            }
        }
    }
}

impl<K> Node for DistinctNode<K>
where
    K: Eq + Hash + Clone + Send + 'static,
{
    fn insert(&mut self, side: Side, id: TupleId, ctx: &mut Propagation<'_>) -> Result<()> {
        if self.members.contains_key(&id) {
            return Err(already_known(self.name(), side, id));
        }
        let key = (self.key)(ctx.tuple(id)?);
        self.join_group(id, key, ctx)
    }

    fn update(&mut self, side: Side, id: TupleId, ctx: &mut Propagation<'_>) -> Result<()> {
        let new_key = (self.key)(ctx.tuple(id)?);
        let old_key = self
            .members
            .remove(&id)
            .ok_or_else(|| unknown("DistinctNode", side, id))?;
        if old_key == new_key {
            // Equal value, nothing observable changed.
            self.members.insert(id, old_key);
            return Ok(());
        }
        self.leave_group(&old_key, ctx);
        self.join_group(id, new_key, ctx)
    }

    fn retract(&mut self, side: Side, id: TupleId, ctx: &mut Propagation<'_>) -> Result<()> {
        let key = self
            .members
            .remove(&id)
            .ok_or_else(|| unknown("DistinctNode", side, id))?;
        self.leave_group(&key, ctx);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "DistinctNode"
    }
}
