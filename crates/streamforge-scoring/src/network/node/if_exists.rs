use std::collections::{BTreeSet, HashMap};
use std::hash::Hash;

use streamforge_core::Result;

use super::{already_known, unknown};
use crate::network::{Node, PairPredicate, Propagation, Side, TupleId, TupleMapping};

struct LeftRecord<K> {
    key: K,
    /// Right tuples that currently match this left tuple.
    matches: BTreeSet<TupleId>,
    out: Option<TupleId>,
}

/// Gates a left stream on the existence (or absence) of matching right
/// tuples. The right facts never appear in the output.
///
/// A left tuple is forwarded while `matches.is_empty() != should_exist`.
/// Right-side events re-evaluate every left tuple of the affected key
/// buckets, so crossing the empty/non-empty boundary emits on the left tuple
/// within the same propagation.
pub(crate) struct IfExistsNode<K> {
    should_exist: bool,
    left_key: TupleMapping<K>,
    right_key: TupleMapping<K>,
    filter: Option<PairPredicate>,
    lefts: HashMap<TupleId, LeftRecord<K>>,
    left_index: HashMap<K, BTreeSet<TupleId>>,
    right_keys: HashMap<TupleId, K>,
    right_index: HashMap<K, BTreeSet<TupleId>>,
}

impl<K> IfExistsNode<K>
where
    K: Eq + Hash + Clone + Send + 'static,
{
    pub(crate) fn new(
        should_exist: bool,
        left_key: TupleMapping<K>,
        right_key: TupleMapping<K>,
        filter: Option<PairPredicate>,
    ) -> Self {
        Self {
            should_exist,
            left_key,
            right_key,
            filter,
            lefts: HashMap::new(),
            left_index: HashMap::new(),
            right_keys: HashMap::new(),
            right_index: HashMap::new(),
        }
    }

    fn matches(&self, left: TupleId, right: TupleId, ctx: &Propagation<'_>) -> Result<bool> {
        match &self.filter {
            Some(filter) => Ok(filter(ctx.tuple(left)?, ctx.tuple(right)?)),
            None => Ok(true),
        }
    }

    fn matching_rights(&self, left: TupleId, key: &K, ctx: &Propagation<'_>) -> Result<BTreeSet<TupleId>> {
        let mut matches = BTreeSet::new();
        if let Some(bucket) = self.right_index.get(key) {
            for &right in bucket {
                if self.matches(left, right, ctx)? {
                    matches.insert(right);
                }
            }
        }
        Ok(matches)
    }

    /// Emits whatever the left tuple's current match set calls for.
    fn sync_left(&mut self, left: TupleId, content_changed: bool, ctx: &mut Propagation<'_>) -> Result<()> {
        let Some(record) = self.lefts.get_mut(&left) else {
            return Ok(());
        };
        let forward = self.should_exist != record.matches.is_empty();
        match (record.out, forward) {
            (None, true) => {
                let facts = ctx.tuple(left)?.to_facts();
                record.out = Some(ctx.insert(facts));
            }
            (Some(out), false) => {
                ctx.retract(out);
                record.out = None;
            }
            (Some(out), true) if content_changed => {
                let facts = ctx.tuple(left)?.to_facts();
                ctx.update(out, facts)?;
            }
            _ => {}
        }
        Ok(())
    }

    fn index_left(&mut self, left: TupleId, key: K) {
        self.left_index.entry(key).or_default().insert(left);
    }

    fn unindex_left(&mut self, left: TupleId, key: &K) {
        if let Some(bucket) = self.left_index.get_mut(key) {
            bucket.remove(&left);
            if bucket.is_empty() {
                self.left_index.remove(key);
            }
        }
    }

    fn lefts_in(&self, key: &K) -> Vec<TupleId> {
        self.left_index
            .get(key)
            .map(|bucket| bucket.iter().copied().collect())
            .unwrap_or_default()
    }

    fn insert_left(&mut self, id: TupleId, ctx: &mut Propagation<'_>) -> Result<()> {
        if self.lefts.contains_key(&id) {
            return Err(already_known(self.name(), Side::Left, id));
        }
        let key = (self.left_key)(ctx.tuple(id)?);
        let matches = self.matching_rights(id, &key, ctx)?;
        self.index_left(id, key.clone());
        self.lefts.insert(
            id,
            LeftRecord {
                key,
                matches,
                out: None,
            },
        );
        self.sync_left(id, false, ctx)
    }

    fn update_left(&mut self, id: TupleId, ctx: &mut Propagation<'_>) -> Result<()> {
        let new_key = (self.left_key)(ctx.tuple(id)?);
        let old_key = self
            .lefts
            .get(&id)
            .map(|record| record.key.clone())
            .ok_or_else(|| unknown("IfExistsNode", Side::Left, id))?;
        if old_key != new_key {
            self.unindex_left(id, &old_key);
            self.index_left(id, new_key.clone());
        }
        let matches = self.matching_rights(id, &new_key, ctx)?;
        if let Some(record) = self.lefts.get_mut(&id) {
            record.key = new_key;
            record.matches = matches;
        }
        self.sync_left(id, true, ctx)
    }

    fn retract_left(&mut self, id: TupleId, ctx: &mut Propagation<'_>) -> Result<()> {
        let record = self
            .lefts
            .remove(&id)
            .ok_or_else(|| unknown("IfExistsNode", Side::Left, id))?;
        self.unindex_left(id, &record.key);
        if let Some(out) = record.out {
            ctx.retract(out);
        }
        Ok(())
    }

    fn insert_right(&mut self, id: TupleId, ctx: &mut Propagation<'_>) -> Result<()> {
        if self.right_keys.contains_key(&id) {
            return Err(already_known(self.name(), Side::Right, id));
        }
        let key = (self.right_key)(ctx.tuple(id)?);
        self.right_index.entry(key.clone()).or_default().insert(id);
        self.right_keys.insert(id, key.clone());
        for left in self.lefts_in(&key) {
            if self.matches(left, id, ctx)? {
                if let Some(record) = self.lefts.get_mut(&left) {
                    record.matches.insert(id);
                }
                self.sync_left(left, false, ctx)?;
            }
        }
        Ok(())
    }

    fn update_right(&mut self, id: TupleId, ctx: &mut Propagation<'_>) -> Result<()> {
        let new_key = (self.right_key)(ctx.tuple(id)?);
        let old_key = self
            .right_keys
            .get(&id)
            .cloned()
            .ok_or_else(|| unknown("IfExistsNode", Side::Right, id))?;
        let mut affected = self.lefts_in(&old_key);
        if old_key != new_key {
            self.unindex_right(id, &old_key);
            self.right_index.entry(new_key.clone()).or_default().insert(id);
            self.right_keys.insert(id, new_key.clone());
            affected.extend(self.lefts_in(&new_key));
        }
        for left in affected {
            let in_bucket = self
                .lefts
                .get(&left)
                .is_some_and(|record| record.key == new_key);
            let matched = in_bucket && self.matches(left, id, ctx)?;
            if let Some(record) = self.lefts.get_mut(&left) {
                if matched {
                    record.matches.insert(id);
                } else {
                    record.matches.remove(&id);
                }
            }
            self.sync_left(left, false, ctx)?;
        }
        Ok(())
    }

    fn retract_right(&mut self, id: TupleId, ctx: &mut Propagation<'_>) -> Result<()> {
        let key = self
            .right_keys
            .remove(&id)
            .ok_or_else(|| unknown("IfExistsNode", Side::Right, id))?;
        self.unindex_right(id, &key);
        for left in self.lefts_in(&key) {
            if let Some(record) = self.lefts.get_mut(&left) {
                record.matches.remove(&id);
            }
            self.sync_left(left, false, ctx)?;
        }
        Ok(())
    }

    fn unindex_right(&mut self, id: TupleId, key: &K) {
        if let Some(bucket) = self.right_index.get_mut(key) {
            bucket.remove(&id);
            if bucket.is_empty() {
                self.right_index.remove(key);
            }
        }
    }
}

impl<K> Node for IfExistsNode<K>
where
    K: Eq + Hash + Clone + Send + 'static,
{
    fn insert(&mut self, side: Side, id: TupleId, ctx: &mut Propagation<'_>) -> Result<()> {
        match side {
            Side::Left => self.insert_left(id, ctx),
            Side::Right => self.insert_right(id, ctx),
        }
    }

    fn update(&mut self, side: Side, id: TupleId, ctx: &mut Propagation<'_>) -> Result<()> {
        match side {
            Side::Left => self.update_left(id, ctx),
            Side::Right => self.update_right(id, ctx),
        }
    }

    fn retract(&mut self, side: Side, id: TupleId, ctx: &mut Propagation<'_>) -> Result<()> {
        match side {
            Side::Left => self.retract_left(id, ctx),
            Side::Right => self.retract_right(id, ctx),
        }
    }

    fn name(&self) -> &'static str {
        if self.should_exist {
            "IfExistsNode"
        } else {
            "IfNotExistsNode"
        }
    }
}
