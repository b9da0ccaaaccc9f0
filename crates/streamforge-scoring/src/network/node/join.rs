use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::hash::Hash;

use streamforge_core::Result;

use super::{already_known, unknown};
use crate::network::{Node, PairPredicate, Propagation, Side, TupleId, TupleMapping};

/// Joins a left stream with a right uni stream on an equality key.
///
/// Both sides are hash-indexed by key. Every accepted `(left, right)`
/// combination owns one output tuple holding the left facts followed by the
/// right fact. The pair tables double as each input's record of the
/// combinations it participates in.
///
/// In unique-pair mode both inputs are the same stream and a combination is
/// accepted only when `left < right`, which rules out `(a, a)` and emits only
/// one of `(a, b)` and `(b, a)`.
pub(crate) struct JoinNode<K> {
    left_key: TupleMapping<K>,
    right_key: TupleMapping<K>,
    filter: Option<PairPredicate>,
    unique_pairs: bool,
    left_index: HashMap<K, BTreeSet<TupleId>>,
    right_index: HashMap<K, BTreeSet<TupleId>>,
    left_keys: HashMap<TupleId, K>,
    right_keys: HashMap<TupleId, K>,
    /// `(left, right) -> output`
    pairs: BTreeMap<(TupleId, TupleId), TupleId>,
    /// `(right, left)` for every entry of `pairs`
    right_pairs: BTreeSet<(TupleId, TupleId)>,
}

impl<K> JoinNode<K>
where
    K: Eq + Hash + Clone + Send + 'static,
{
    pub(crate) fn new(
        left_key: TupleMapping<K>,
        right_key: TupleMapping<K>,
        filter: Option<PairPredicate>,
    ) -> Self {
        Self {
            left_key,
            right_key,
            filter,
            unique_pairs: false,
            left_index: HashMap::new(),
            right_index: HashMap::new(),
            left_keys: HashMap::new(),
            right_keys: HashMap::new(),
            pairs: BTreeMap::new(),
            right_pairs: BTreeSet::new(),
        }
    }

    pub(crate) fn unique_pairs(mut self) -> Self {
        self.unique_pairs = true;
        self
    }

    fn orient(side: Side, id: TupleId, partner: TupleId) -> (TupleId, TupleId) {
        match side {
            Side::Left => (id, partner),
            Side::Right => (partner, id),
        }
    }

    fn accepts(&self, left: TupleId, right: TupleId, ctx: &Propagation<'_>) -> Result<bool> {
        if self.unique_pairs && left >= right {
            return Ok(false);
        }
        match &self.filter {
            Some(filter) => Ok(filter(ctx.tuple(left)?, ctx.tuple(right)?)),
            None => Ok(true),
        }
    }

    fn partners(&self, side: Side, key: &K) -> Vec<TupleId> {
        let index = match side {
            Side::Left => &self.right_index,
            Side::Right => &self.left_index,
        };
        index
            .get(key)
            .map(|bucket| bucket.iter().copied().collect())
            .unwrap_or_default()
    }

    fn create_pair(&mut self, left: TupleId, right: TupleId, ctx: &mut Propagation<'_>) -> Result<()> {
        let facts = ctx.tuple(left)?.concat(ctx.tuple(right)?);
        let out = ctx.insert(facts);
        self.pairs.insert((left, right), out);
        self.right_pairs.insert((right, left));
        Ok(())
    }

    fn remove_pair(&mut self, left: TupleId, right: TupleId, ctx: &mut Propagation<'_>) {
        if let Some(out) = self.pairs.remove(&(left, right)) {
            self.right_pairs.remove(&(right, left));
            ctx.retract(out);
        }
    }

    fn refresh_pair(&mut self, left: TupleId, right: TupleId, ctx: &mut Propagation<'_>) -> Result<()> {
        let accepted = self.accepts(left, right, ctx)?;
        match (self.pairs.get(&(left, right)).copied(), accepted) {
            (Some(out), true) => {
                let facts = ctx.tuple(left)?.concat(ctx.tuple(right)?);
                ctx.update(out, facts)?;
            }
            (Some(_), false) => self.remove_pair(left, right, ctx),
            (None, true) => self.create_pair(left, right, ctx)?,
            (None, false) => {}
        }
        Ok(())
    }

    fn insert_side(&mut self, side: Side, id: TupleId, key: K, ctx: &mut Propagation<'_>) -> Result<()> {
        let (index, keys) = match side {
            Side::Left => (&mut self.left_index, &mut self.left_keys),
            Side::Right => (&mut self.right_index, &mut self.right_keys),
        };
        index.entry(key.clone()).or_default().insert(id);
        keys.insert(id, key.clone());
        for partner in self.partners(side, &key) {
            let (left, right) = Self::orient(side, id, partner);
            if self.accepts(left, right, ctx)? {
                self.create_pair(left, right, ctx)?;
            }
        }
        Ok(())
    }

    fn retract_side(&mut self, side: Side, id: TupleId, ctx: &mut Propagation<'_>) -> Result<()> {
        let (index, keys) = match side {
            Side::Left => (&mut self.left_index, &mut self.left_keys),
            Side::Right => (&mut self.right_index, &mut self.right_keys),
        };
        let key = keys
            .remove(&id)
            .ok_or_else(|| unknown("JoinNode", side, id))?;
        if let Some(bucket) = index.get_mut(&key) {
            bucket.remove(&id);
            if bucket.is_empty() {
                index.remove(&key);
            }
        }
        let combinations: Vec<(TupleId, TupleId)> = match side {
            Side::Left => self
                .pairs
                .range((id, TupleId::MIN)..=(id, TupleId::MAX))
                .map(|(&pair, _)| pair)
                .collect(),
            Side::Right => self
                .right_pairs
                .range((id, TupleId::MIN)..=(id, TupleId::MAX))
                .map(|&(right, left)| (left, right))
                .collect(),
        };
        for (left, right) in combinations {
            self.remove_pair(left, right, ctx);
        }
        Ok(())
    }

    fn key_of(&self, side: Side, id: TupleId, ctx: &Propagation<'_>) -> Result<K> {
        let tuple = ctx.tuple(id)?;
        Ok(match side {
            Side::Left => (self.left_key)(tuple),
            Side::Right => (self.right_key)(tuple),
        })
    }

    fn known_key(&self, side: Side, id: TupleId) -> Option<&K> {
        match side {
            Side::Left => self.left_keys.get(&id),
            Side::Right => self.right_keys.get(&id),
        }
    }
}

impl<K> Node for JoinNode<K>
where
    K: Eq + Hash + Clone + Send + 'static,
{
    fn insert(&mut self, side: Side, id: TupleId, ctx: &mut Propagation<'_>) -> Result<()> {
        if self.known_key(side, id).is_some() {
            return Err(already_known(self.name(), side, id));
        }
        let key = self.key_of(side, id, ctx)?;
        self.insert_side(side, id, key, ctx)
    }

    fn update(&mut self, side: Side, id: TupleId, ctx: &mut Propagation<'_>) -> Result<()> {
        let new_key = self.key_of(side, id, ctx)?;
        let old_key = self
            .known_key(side, id)
            .ok_or_else(|| unknown("JoinNode", side, id))?;
        if *old_key != new_key {
            self.retract_side(side, id, ctx)?;
            return self.insert_side(side, id, new_key, ctx);
        }
        for partner in self.partners(side, &new_key) {
            let (left, right) = Self::orient(side, id, partner);
            self.refresh_pair(left, right, ctx)?;
        }
        Ok(())
    }

    fn retract(&mut self, side: Side, id: TupleId, ctx: &mut Propagation<'_>) -> Result<()> {
        self.retract_side(side, id, ctx)
    }

    fn name(&self) -> &'static str {
        if self.unique_pairs {
            "UniquePairJoinNode"
        } else {
            "JoinNode"
        }
    }
}
