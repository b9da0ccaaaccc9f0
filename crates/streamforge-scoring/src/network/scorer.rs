//! Terminal node of a constraint.

use std::collections::BTreeMap;

use streamforge_core::{ConstraintRef, ImpactType, Result, Score, StreamForgeError};

use super::{Tuple, TupleEvent, TupleId};
use crate::api::{
    ConstraintJustification, ConstraintMatchTotal, DetailedConstraintMatch, EntityRef,
};

pub(crate) type MatchWeight = Box<dyn Fn(&Tuple) -> i64 + Send + Sync>;
pub(crate) type Justifier = Box<dyn Fn(&Tuple) -> Vec<EntityRef> + Send + Sync>;

struct LiveMatch<Sc> {
    score: Sc,
    justification: Option<Vec<EntityRef>>,
}

/// Turns the tuples reaching the end of a constraint into score deltas.
///
/// The delta of every live tuple is recorded at insert and subtracted as
/// recorded at retract; the impact function is never re-evaluated for a
/// tuple that is leaving.
pub(crate) struct ConstraintScorer<Sc: Score> {
    constraint_ref: ConstraintRef,
    impact_type: ImpactType,
    weight: Sc,
    match_weight: Option<MatchWeight>,
    justify: Justifier,
    track_matches: bool,
    matches: BTreeMap<TupleId, LiveMatch<Sc>>,
    total: Sc,
}

impl<Sc: Score> ConstraintScorer<Sc> {
    pub(crate) fn new(
        constraint_ref: ConstraintRef,
        impact_type: ImpactType,
        weight: Sc,
        match_weight: Option<MatchWeight>,
        justify: Justifier,
        track_matches: bool,
    ) -> Self {
        Self {
            constraint_ref,
            impact_type,
            weight,
            match_weight,
            justify,
            track_matches,
            matches: BTreeMap::new(),
            total: Sc::zero(),
        }
    }

    pub(crate) fn on_event(&mut self, event: TupleEvent, id: TupleId, tuple: &Tuple) -> Result<()> {
        match event {
            TupleEvent::Insert => self.insert(id, tuple),
            TupleEvent::Update => {
                self.retract(id)?;
                self.insert(id, tuple)
            }
            TupleEvent::Retract => self.retract(id),
        }
    }

    fn insert(&mut self, id: TupleId, tuple: &Tuple) -> Result<()> {
        if self.matches.contains_key(&id) {
            return Err(StreamForgeError::LifecycleViolation(format!(
                "constraint {} already scores tuple {}",
                self.constraint_ref, id
            )));
        }
        let score = self.impact(tuple)?;
        let justification = self.track_matches.then(|| (self.justify)(tuple));
        self.total = self.total + score;
        self.matches.insert(
            id,
            LiveMatch {
                score,
                justification,
            },
        );
        Ok(())
    }

    fn retract(&mut self, id: TupleId) -> Result<()> {
        let live = self.matches.remove(&id).ok_or_else(|| {
            StreamForgeError::LifecycleViolation(format!(
                "constraint {} does not score tuple {}",
                self.constraint_ref, id
            ))
        })?;
        self.total = self.total - live.score;
        Ok(())
    }

    fn impact(&self, tuple: &Tuple) -> Result<Sc> {
        let multiplier = match &self.match_weight {
            Some(match_weight) => match_weight(tuple),
            None => 1,
        };
        if multiplier < 0 && !self.impact_type.allows_negative_match_weight() {
            return Err(StreamForgeError::ScoreCalculation(format!(
                "constraint {} ({:?}) produced negative match weight {}; use impact for mixed signs",
                self.constraint_ref, self.impact_type, multiplier
            )));
        }
        Ok(self.weight.scale(multiplier * self.impact_type.sign()))
    }

    pub(crate) fn total(&self) -> Sc {
        self.total
    }

    #[cfg(test)]
    pub(crate) fn match_count(&self) -> usize {
        self.matches.len()
    }

    pub(crate) fn constraint_ref(&self) -> &ConstraintRef {
        &self.constraint_ref
    }

    pub(crate) fn weight(&self) -> Sc {
        self.weight
    }

    pub(crate) fn match_total(&self) -> ConstraintMatchTotal<Sc> {
        ConstraintMatchTotal {
            constraint_ref: self.constraint_ref.clone(),
            impact_type: self.impact_type,
            constraint_weight: self.weight,
            score: self.total,
            match_count: self.matches.len(),
        }
    }

    /// Live matches in tuple order. Justifications are empty unless match
    /// tracking is enabled.
    pub(crate) fn detailed_matches(&self) -> Vec<DetailedConstraintMatch<Sc>> {
        self.matches
            .values()
            .map(|live| {
                DetailedConstraintMatch::new(
                    self.constraint_ref.clone(),
                    live.score,
                    ConstraintJustification::new(live.justification.clone().unwrap_or_default()),
                )
            })
            .collect()
    }
}
