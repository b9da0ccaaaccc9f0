//! Terminal stage of a stream: a named constraint.

use std::fmt;

use streamforge_core::{ConstraintRef, ImpactType, Score};

use crate::network::{Justifier, MatchWeight, StreamId};

/// A stream with its impact decided, waiting for a name.
pub struct ConstraintBuilder<Sc: Score> {
    stream: StreamId,
    impact_type: ImpactType,
    weight: Sc,
    match_weight: Option<MatchWeight>,
    justify: Justifier,
}

impl<Sc: Score> ConstraintBuilder<Sc> {
    pub(crate) fn new(
        stream: StreamId,
        impact_type: ImpactType,
        weight: Sc,
        match_weight: Option<MatchWeight>,
        justify: Justifier,
    ) -> Self {
        Self {
            stream,
            impact_type,
            weight,
            match_weight,
            justify,
        }
    }

    /// Names the constraint, with an empty package.
    pub fn as_constraint(self, name: &str) -> Constraint<Sc> {
        self.as_constraint_in("", name)
    }

    /// Names the constraint within `package`; its full name is
    /// `package/name`.
    pub fn as_constraint_in(self, package: &str, name: &str) -> Constraint<Sc> {
        Constraint {
            constraint_ref: ConstraintRef::new(package, name),
            stream: self.stream,
            impact_type: self.impact_type,
            weight: self.weight,
            match_weight: self.match_weight,
            justify: self.justify,
        }
    }
}

impl<Sc: Score> fmt::Debug for ConstraintBuilder<Sc> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstraintBuilder")
            .field("impact_type", &self.impact_type)
            .field("weight", &self.weight)
            .finish_non_exhaustive()
    }
}

/// A finished constraint definition.
pub struct Constraint<Sc: Score> {
    pub(crate) constraint_ref: ConstraintRef,
    pub(crate) stream: StreamId,
    pub(crate) impact_type: ImpactType,
    pub(crate) weight: Sc,
    pub(crate) match_weight: Option<MatchWeight>,
    pub(crate) justify: Justifier,
}

impl<Sc: Score> Constraint<Sc> {
    pub fn constraint_ref(&self) -> &ConstraintRef {
        &self.constraint_ref
    }

    pub fn name(&self) -> &str {
        &self.constraint_ref.name
    }

    pub fn impact_type(&self) -> ImpactType {
        self.impact_type
    }

    /// Weight declared in the stream, before overrides.
    pub fn weight(&self) -> Sc {
        self.weight
    }

    pub fn is_hard(&self) -> bool {
        self.weight.has_hard_component()
    }
}

impl<Sc: Score> fmt::Debug for Constraint<Sc> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constraint")
            .field("name", &self.constraint_ref.full_name())
            .field("impact_type", &self.impact_type)
            .field("weight", &self.weight)
            .finish()
    }
}
