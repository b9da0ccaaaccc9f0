//! Tuples and the arena that owns them.
//!
//! Every node owns the tuples it emits. A tuple is addressed by a
//! generational [`TupleId`], so a handle kept after the tuple died is
//! detected instead of silently aliasing a recycled slot.

use std::any::type_name;
use std::fmt;

use smallvec::SmallVec;
use streamforge_core::{FactValue, Result, StreamForgeError};

/// The facts referenced by one tuple, in stream order.
pub type Facts = SmallVec<[FactValue; 4]>;

/// Stable handle of a tuple in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TupleId {
    index: u32,
    generation: u32,
}

impl TupleId {
    pub(crate) const MIN: TupleId = TupleId {
        index: 0,
        generation: 0,
    };
    pub(crate) const MAX: TupleId = TupleId {
        index: u32::MAX,
        generation: u32::MAX,
    };

    /// Slot index of this tuple in its arena.
    pub fn index(&self) -> usize {
        self.index as usize
    }
}

impl fmt::Display for TupleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}.{}", self.index, self.generation)
    }
}

/// Lifecycle state of a tuple.
///
/// `Creating -> Active` when its insert is delivered, `Active -> Dying`
/// when its retract starts, `Dying -> Dead` once every listener saw it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TupleState {
    Creating,
    Active,
    Dying,
    Dead,
}

/// An ordered, fixed-arity bundle of facts.
pub struct Tuple {
    facts: Facts,
    state: TupleState,
}

impl Tuple {
    pub fn facts(&self) -> &[FactValue] {
        &self.facts
    }

    /// Returns element `index`, typed.
    ///
    /// # Panics
    /// Panics if the element is not a `T`. Stream types guarantee the element
    /// types at every network position, so a mismatch is a wiring bug.
    pub fn get<T: 'static>(&self, index: usize) -> &T {
        self.facts[index].downcast_ref::<T>().unwrap_or_else(|| {
            panic!(
                "tuple element {} of a {}-tuple is not a {}",
                index,
                self.facts.len(),
                type_name::<T>()
            )
        })
    }

    pub(crate) fn to_facts(&self) -> Facts {
        self.facts.clone()
    }

    /// Facts of `self` followed by the facts of `other`.
    pub(crate) fn concat(&self, other: &Tuple) -> Facts {
        let mut facts = self.facts.clone();
        facts.extend(other.facts.iter().cloned());
        facts
    }
}

impl fmt::Debug for Tuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tuple")
            .field("arity", &self.facts.len())
            .field("state", &self.state)
            .finish()
    }
}

struct Slot {
    generation: u32,
    tuple: Option<Tuple>,
}

/// Owner of every tuple of one network.
#[derive(Default)]
pub(crate) struct TupleArena {
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
}

impl TupleArena {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Allocates a tuple in the `Creating` state.
    pub(crate) fn create(&mut self, facts: Facts) -> TupleId {
        let tuple = Tuple {
            facts,
            state: TupleState::Creating,
        };
        self.live += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.tuple = Some(tuple);
            TupleId {
                index,
                generation: slot.generation,
            }
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                tuple: Some(tuple),
            });
            TupleId {
                index,
                generation: 0,
            }
        }
    }

    pub(crate) fn get(&self, id: TupleId) -> Result<&Tuple> {
        self.slots
            .get(id.index())
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.tuple.as_ref())
            .ok_or_else(|| stale(id))
    }

    fn get_mut(&mut self, id: TupleId) -> Result<&mut Tuple> {
        self.slots
            .get_mut(id.index())
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.tuple.as_mut())
            .ok_or_else(|| stale(id))
    }

    /// Moves a tuple from `from` to `to`, failing if it is in any other state.
    pub(crate) fn transition(&mut self, id: TupleId, from: TupleState, to: TupleState) -> Result<()> {
        let tuple = self.get_mut(id)?;
        if tuple.state != from {
            return Err(StreamForgeError::LifecycleViolation(format!(
                "tuple {} is {:?}, expected {:?} before moving to {:?}",
                id, tuple.state, from, to
            )));
        }
        tuple.state = to;
        Ok(())
    }

    pub(crate) fn expect_state(&self, id: TupleId, state: TupleState) -> Result<()> {
        let tuple = self.get(id)?;
        if tuple.state != state {
            return Err(StreamForgeError::LifecycleViolation(format!(
                "tuple {} is {:?}, expected {:?}",
                id, tuple.state, state
            )));
        }
        Ok(())
    }

    /// Replaces the facts of a live tuple in place; the handle stays valid.
    pub(crate) fn replace_facts(&mut self, id: TupleId, facts: Facts) -> Result<()> {
        let tuple = self.get_mut(id)?;
        match tuple.state {
            TupleState::Creating | TupleState::Active => {
                tuple.facts = facts;
                Ok(())
            }
            state => Err(StreamForgeError::LifecycleViolation(format!(
                "cannot update tuple {} in state {:?}",
                id, state
            ))),
        }
    }

    /// Frees the slot of a dead tuple.
    pub(crate) fn release(&mut self, id: TupleId) -> Result<()> {
        self.expect_state(id, TupleState::Dead)?;
        let slot = &mut self.slots[id.index()];
        slot.tuple = None;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.live -= 1;
        Ok(())
    }

    pub(crate) fn live_count(&self) -> usize {
        self.live
    }
}

fn stale(id: TupleId) -> StreamForgeError {
    StreamForgeError::LifecycleViolation(format!("tuple {} is not live", id))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use smallvec::smallvec;

    use super::*;

    fn facts(value: i32) -> Facts {
        smallvec![Arc::new(value) as FactValue]
    }

    #[test]
    fn test_create_get_and_typed_access() {
        let mut arena = TupleArena::new();
        let id = arena.create(facts(7));
        let tuple = arena.get(id).unwrap();
        assert_eq!(tuple.facts().len(), 1);
        assert!(arena.expect_state(id, TupleState::Creating).is_ok());
        assert_eq!(*tuple.get::<i32>(0), 7);
        assert_eq!(arena.live_count(), 1);
    }

    #[test]
    #[should_panic(expected = "is not a")]
    fn test_typed_access_mismatch_panics() {
        let mut arena = TupleArena::new();
        let id = arena.create(facts(7));
        arena.get(id).unwrap().get::<String>(0);
    }

    #[test]
    fn test_full_lifecycle_and_slot_reuse() {
        let mut arena = TupleArena::new();
        let first = arena.create(facts(1));
        arena
            .transition(first, TupleState::Creating, TupleState::Active)
            .unwrap();
        arena
            .transition(first, TupleState::Active, TupleState::Dying)
            .unwrap();
        arena
            .transition(first, TupleState::Dying, TupleState::Dead)
            .unwrap();
        arena.release(first).unwrap();
        assert_eq!(arena.live_count(), 0);

        let second = arena.create(facts(2));
        assert_eq!(second.index(), first.index());
        assert_ne!(second, first);
        assert!(matches!(
            arena.get(first),
            Err(StreamForgeError::LifecycleViolation(_))
        ));
        assert_eq!(*arena.get(second).unwrap().get::<i32>(0), 2);
    }

    #[test]
    fn test_wrong_transition_is_a_lifecycle_violation() {
        let mut arena = TupleArena::new();
        let id = arena.create(facts(1));
        assert!(matches!(
            arena.transition(id, TupleState::Active, TupleState::Dying),
            Err(StreamForgeError::LifecycleViolation(_))
        ));
        assert!(arena.release(id).is_err());
    }

    #[test]
    fn test_replace_facts_keeps_identity() {
        let mut arena = TupleArena::new();
        let id = arena.create(facts(1));
        arena.replace_facts(id, facts(5)).unwrap();
        assert_eq!(*arena.get(id).unwrap().get::<i32>(0), 5);
    }

    #[test]
    fn test_concat() {
        let mut arena = TupleArena::new();
        let a = arena.create(facts(1));
        let b = arena.create(facts(2));
        let joined = arena.get(a).unwrap().concat(arena.get(b).unwrap());
        assert_eq!(joined.len(), 2);
        assert_eq!(joined[1].downcast_ref::<i32>(), Some(&2));
    }
}
