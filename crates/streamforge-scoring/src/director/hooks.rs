//! Pairing of before/after lifecycle hooks.

use std::fmt;

use streamforge_core::{FactKind, Result, StreamForgeError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HookKind {
    EntityAdded,
    VariableChanged,
    EntityRemoved,
    ProblemFactAdded,
    ProblemPropertyChanged,
    ProblemFactRemoved,
}

impl HookKind {
    pub(crate) fn fact_kind(self) -> FactKind {
        match self {
            HookKind::EntityAdded | HookKind::VariableChanged | HookKind::EntityRemoved => {
                FactKind::Entity
            }
            HookKind::ProblemFactAdded
            | HookKind::ProblemPropertyChanged
            | HookKind::ProblemFactRemoved => FactKind::ProblemFact,
        }
    }
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HookKind::EntityAdded => "entity_added",
            HookKind::VariableChanged => "variable_changed",
            HookKind::EntityRemoved => "entity_removed",
            HookKind::ProblemFactAdded => "problem_fact_added",
            HookKind::ProblemPropertyChanged => "problem_property_changed",
            HookKind::ProblemFactRemoved => "problem_fact_removed",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingHook {
    kind: HookKind,
    descriptor_index: usize,
    index: usize,
}

/// Before-hooks still waiting for their after-hook.
///
/// Several mutations may be open at once; each after-hook closes the oldest
/// open before-hook with the same kind and address.
#[derive(Debug, Default)]
pub(crate) struct HookLedger {
    pending: Vec<PendingHook>,
}

impl HookLedger {
    pub(crate) fn before(&mut self, kind: HookKind, descriptor_index: usize, index: usize) {
        self.pending.push(PendingHook {
            kind,
            descriptor_index,
            index,
        });
    }

    pub(crate) fn after(&mut self, kind: HookKind, descriptor_index: usize, index: usize) -> Result<()> {
        let hook = PendingHook {
            kind,
            descriptor_index,
            index,
        };
        let position = self.pending.iter().position(|p| *p == hook).ok_or_else(|| {
            StreamForgeError::LifecycleViolation(format!(
                "after_{}({}, {}) without a matching before_{}",
                kind, descriptor_index, index, kind
            ))
        })?;
        self.pending.remove(position);
        Ok(())
    }

    pub(crate) fn is_settled(&self) -> bool {
        self.pending.is_empty()
    }

    pub(crate) fn ensure_settled(&self) -> Result<()> {
        match self.pending.first() {
            None => Ok(()),
            Some(open) => Err(StreamForgeError::InvalidState(format!(
                "{} before-hook(s) without after-hook, first before_{}({}, {})",
                self.pending.len(),
                open.kind,
                open.descriptor_index,
                open.index
            ))),
        }
    }

    pub(crate) fn clear(&mut self) {
        self.pending.clear();
    }
}
