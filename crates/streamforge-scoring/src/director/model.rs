//! Everything a director needs to (re)build a network for a solution.

use std::any::Any;
use std::sync::Arc;

use streamforge_config::ScoreDirectorConfig;
use streamforge_core::{
    FactClass, FactKind, FactValue, Result, Score, SolutionDescriptor, StreamForgeError,
};

use crate::api::{
    ConstraintAnalysis, ConstraintMatchTotal, ConstraintProvider, ConstraintWeightOverrides,
    ScoreExplanation,
};
use crate::network::{build_session, Session, TupleId};

/// Tuple handle of every fact of a solution, by class ordinal then position.
/// `None` for facts of classes no constraint reads.
pub(crate) type FactHandles = Vec<Vec<Option<TupleId>>>;

pub(crate) struct ScoringModel<Sc: Score> {
    pub(crate) descriptor: Arc<SolutionDescriptor>,
    pub(crate) provider: Arc<dyn ConstraintProvider<Sc>>,
    pub(crate) overrides: Arc<ConstraintWeightOverrides<Sc>>,
    pub(crate) config: Arc<ScoreDirectorConfig>,
}

impl<Sc: Score> Clone for ScoringModel<Sc> {
    fn clone(&self) -> Self {
        Self {
            descriptor: Arc::clone(&self.descriptor),
            provider: Arc::clone(&self.provider),
            overrides: Arc::clone(&self.overrides),
            config: Arc::clone(&self.config),
        }
    }
}

impl<Sc: Score> ScoringModel<Sc> {
    pub(crate) fn tracks_matches(&self) -> bool {
        self.config.constraint_match_enabled
    }

    pub(crate) fn empty_session(&self, track_matches: bool) -> Result<Session<Sc>> {
        build_session(
            &self.descriptor,
            self.provider.as_ref(),
            &self.overrides,
            track_matches,
        )
    }

    /// Builds a network and inserts every fact of `solution` into it.
    pub(crate) fn load<S: Any>(
        &self,
        solution: &S,
        track_matches: bool,
    ) -> Result<(Session<Sc>, FactHandles)> {
        let mut session = self.empty_session(track_matches)?;
        let mut handles = Vec::with_capacity(self.descriptor.class_count());
        for class in self.descriptor.fact_classes() {
            let ordinal = self.descriptor.class_ordinal(class);
            let count = self.fact_count(class, solution)?;
            let mut class_handles = Vec::with_capacity(count);
            for index in 0..count {
                let handle = if session.reads_class(ordinal) {
                    session.insert_fact(ordinal, self.clone_fact(class, solution, index)?)?
                } else {
                    None
                };
                class_handles.push(handle);
            }
            handles.push(class_handles);
        }
        Ok((session, handles))
    }

    /// Score of `solution` computed on a fresh network.
    pub(crate) fn scratch_score<S: Any>(&self, solution: &S) -> Result<Sc> {
        let (session, _) = self.load(solution, false)?;
        Ok(session.score())
    }

    /// Resolves a hook address to a registered class.
    pub(crate) fn class(&self, kind: FactKind, descriptor_index: usize) -> Result<FactClass> {
        let class = FactClass {
            kind,
            descriptor_index,
        };
        if self.descriptor.fact_descriptor(class).is_none() {
            return Err(StreamForgeError::DomainModel(format!(
                "solution {} has no {:?} class #{}",
                self.descriptor.type_name, kind, descriptor_index
            )));
        }
        Ok(class)
    }

    pub(crate) fn fact_count<S: Any>(&self, class: FactClass, solution: &S) -> Result<usize> {
        self.descriptor
            .fact_count(class, solution)
            .ok_or_else(|| self.not_this_solution())
    }

    pub(crate) fn clone_fact<S: Any>(
        &self,
        class: FactClass,
        solution: &S,
        index: usize,
    ) -> Result<FactValue> {
        self.descriptor
            .clone_fact(class, solution, index)
            .ok_or_else(|| {
                StreamForgeError::DomainModel(format!(
                    "{:?} class #{} has no fact at index {}",
                    class.kind, class.descriptor_index, index
                ))
            })
    }

    fn not_this_solution(&self) -> StreamForgeError {
        StreamForgeError::DomainModel(format!(
            "working solution is not a {}",
            self.descriptor.type_name
        ))
    }
}

pub(crate) fn match_totals<Sc: Score>(session: &Session<Sc>) -> Vec<ConstraintMatchTotal<Sc>> {
    session.scorers().iter().map(|s| s.match_total()).collect()
}

/// Explanation of a session built with match tracking.
pub(crate) fn explain<Sc: Score>(session: &Session<Sc>) -> ScoreExplanation<Sc> {
    let analyses = session
        .scorers()
        .iter()
        .map(|scorer| {
            ConstraintAnalysis::new(
                scorer.constraint_ref().clone(),
                scorer.weight(),
                scorer.total(),
                scorer.detailed_matches(),
            )
        })
        .collect();
    ScoreExplanation::new(session.score(), analyses)
}
