use std::collections::HashMap;
use std::hash::Hash;
use std::marker::PhantomData;

use streamforge_core::{Result, StreamForgeError};

use super::{already_known, unknown};
use crate::network::{Facts, Node, Propagation, Side, TupleId, TupleMapping, TupleView};
use crate::stream::collector::Collector;

pub(crate) type GroupEmitter<K, R> = Box<dyn Fn(&K, &R) -> Facts + Send + Sync>;

struct Group<Container, R> {
    container: Container,
    size: usize,
    out: Option<TupleId>,
    /// Finisher result last sent downstream.
    result: Option<R>,
}

struct Membership<K, Retractor> {
    key: K,
    retractor: Retractor,
}

/// Groups input tuples by key and maintains one collector container per
/// group.
///
/// A group's output tuple is inserted when its first member arrives and
/// retracted when its last member leaves. In between, the output is updated
/// only when the finisher result differs from the one last emitted; this
/// keeps regrouping pipelines (a group-by keyed on an upstream finisher
/// result) from seeing updates where nothing observable changed.
pub(crate) struct GroupByNode<V, K, C>
where
    V: TupleView,
    C: Collector<V::Input>,
{
    key: TupleMapping<K>,
    collector: C,
    emit: GroupEmitter<K, C::Result>,
    groups: HashMap<K, Group<C::Container, C::Result>>,
    members: HashMap<TupleId, Membership<K, C::Retractor>>,
    _view: PhantomData<fn() -> V>,
}

impl<V, K, C> GroupByNode<V, K, C>
where
    V: TupleView,
    K: Eq + Hash + Clone + Send + 'static,
    C: Collector<V::Input>,
{
    pub(crate) fn new(key: TupleMapping<K>, collector: C, emit: GroupEmitter<K, C::Result>) -> Self {
        Self {
            key,
            collector,
            emit,
            groups: HashMap::new(),
            members: HashMap::new(),
            _view: PhantomData,
        }
    }

    fn add_member(&mut self, id: TupleId, key: K, ctx: &mut Propagation<'_>) -> Result<()> {
        let tuple = ctx.tuple(id)?;
        let collector = &self.collector;
        let group = self.groups.entry(key.clone()).or_insert_with(|| Group {
            container: collector.supply(),
            size: 0,
            out: None,
            result: None,
        });
        let retractor = V::with(tuple, |input| collector.accumulate(&mut group.container, input));
        group.size += 1;
        self.members.insert(
            id,
            Membership {
                key: key.clone(),
                retractor,
            },
        );
        self.refresh_group(&key, ctx)
    }

    fn remove_member(&mut self, membership: Membership<K, C::Retractor>, ctx: &mut Propagation<'_>) -> Result<()> {
        let group = self.groups.get_mut(&membership.key).ok_or_else(|| {
            StreamForgeError::InvalidState("group-by member refers to a missing group".to_string())
        })?;
        self.collector
            .retract(&mut group.container, membership.retractor);
        group.size -= 1;
        self.refresh_group(&membership.key, ctx)
    }

    /// Emits the insert, update or retract the group's current state calls for.
    fn refresh_group(&mut self, key: &K, ctx: &mut Propagation<'_>) -> Result<()> {
        let Some(group) = self.groups.get_mut(key) else {
            return Ok(());
        };
        if group.size == 0 {
            if let Some(out) = group.out {
                ctx.retract(out);
            }
            self.groups.remove(key);
            return Ok(());
        }
        let result = self.collector.finish(&group.container);
        match group.out {
            None => {
                group.out = Some(ctx.insert((self.emit)(key, &result)));
                group.result = Some(result);
            }
            Some(out) => {
                if group.result.as_ref() != Some(&result) {
                    ctx.update(out, (self.emit)(key, &result))?;
                    group.result = Some(result);
                }
            }
        }
        Ok(())
    }
}

impl<V, K, C> Node for GroupByNode<V, K, C>
where
    V: TupleView,
    K: Eq + Hash + Clone + Send + 'static,
    C: Collector<V::Input>,
{
    fn insert(&mut self, side: Side, id: TupleId, ctx: &mut Propagation<'_>) -> Result<()> {
        if self.members.contains_key(&id) {
            return Err(already_known(self.name(), side, id));
        }
        let key = (self.key)(ctx.tuple(id)?);
        self.add_member(id, key, ctx)
    }

    fn update(&mut self, side: Side, id: TupleId, ctx: &mut Propagation<'_>) -> Result<()> {
        let new_key = (self.key)(ctx.tuple(id)?);
        let membership = self
            .members
            .remove(&id)
            .ok_or_else(|| unknown("GroupByNode", side, id))?;
        if membership.key != new_key {
            self.remove_member(membership, ctx)?;
            return self.add_member(id, new_key, ctx);
        }

        // Same group: undo the old accumulation and redo it with the new
        // content against the same container.
        let tuple = ctx.tuple(id)?;
        let collector = &self.collector;
        let group = self.groups.get_mut(&membership.key).ok_or_else(|| {
            StreamForgeError::InvalidState("group-by member refers to a missing group".to_string())
        })?;
        collector.retract(&mut group.container, membership.retractor);
        let retractor = V::with(tuple, |input| collector.accumulate(&mut group.container, input));
        self.members.insert(
            id,
            Membership {
                key: membership.key.clone(),
                retractor,
            },
        );
        self.refresh_group(&membership.key, ctx)
    }

    fn retract(&mut self, side: Side, id: TupleId, ctx: &mut Propagation<'_>) -> Result<()> {
        let membership = self
            .members
            .remove(&id)
            .ok_or_else(|| unknown("GroupByNode", side, id))?;
        self.remove_member(membership, ctx)
    }

    fn name(&self) -> &'static str {
        "GroupByNode"
    }
}
