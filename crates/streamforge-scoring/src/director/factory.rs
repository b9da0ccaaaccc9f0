//! Score director factory for creating score directors.

use std::marker::PhantomData;
use std::sync::Arc;

use streamforge_config::ScoreDirectorConfig;
use streamforge_core::{ParseableScore, PlanningSolution, Result, SolutionDescriptor};
use tracing::info;

use super::model::ScoringModel;
use super::scratch::ScratchScoreDirector;
use super::stream::StreamScoreDirector;
use crate::api::{ConstraintProvider, ConstraintWeightOverrides};

/// Factory for creating score directors.
///
/// Holds the solution descriptor, the constraint provider, the weight
/// overrides and the configuration behind `Arc`s, so it is cheap to clone
/// and can hand one director to each worker thread.
pub struct ScoreDirectorFactory<S: PlanningSolution> {
    model: ScoringModel<S::Score>,
    _phantom: PhantomData<fn() -> S>,
}

impl<S: PlanningSolution> ScoreDirectorFactory<S> {
    /// Creates a factory with the default configuration and no weight
    /// overrides.
    pub fn new<P>(descriptor: SolutionDescriptor, provider: P) -> Self
    where
        P: ConstraintProvider<S::Score> + 'static,
    {
        info!(
            solution = descriptor.type_name,
            entity_class_count = descriptor.entity_descriptors.len(),
            problem_fact_class_count = descriptor.problem_fact_descriptors.len(),
            "Score director factory built"
        );
        Self {
            model: ScoringModel {
                descriptor: Arc::new(descriptor),
                provider: Arc::new(provider),
                overrides: Arc::new(ConstraintWeightOverrides::new()),
                config: Arc::new(ScoreDirectorConfig::default()),
            },
            _phantom: PhantomData,
        }
    }

    /// Replaces the weight overrides.
    pub fn with_weight_overrides(mut self, overrides: ConstraintWeightOverrides<S::Score>) -> Self {
        self.model.overrides = Arc::new(overrides);
        self
    }

    /// Checks the constraint definitions against the descriptor without a
    /// solution: unknown fact classes, duplicate names and overrides of
    /// unknown constraints are reported here.
    pub fn validate(&self) -> Result<()> {
        self.model.empty_session(false).map(|_| ())
    }

    /// Creates an incremental score director for `solution`.
    pub fn build_score_director(&self, solution: S) -> Result<StreamScoreDirector<S>> {
        StreamScoreDirector::new(self.model.clone(), solution)
    }

    /// Creates a from-scratch score director for `solution`.
    pub fn build_scratch_score_director(&self, solution: S) -> Result<ScratchScoreDirector<S>> {
        ScratchScoreDirector::new(self.model.clone(), solution)
    }

    pub fn solution_descriptor(&self) -> &SolutionDescriptor {
        &self.model.descriptor
    }

    pub fn config(&self) -> &ScoreDirectorConfig {
        &self.model.config
    }

    pub fn weight_overrides(&self) -> &ConstraintWeightOverrides<S::Score> {
        &self.model.overrides
    }
}

impl<S> ScoreDirectorFactory<S>
where
    S: PlanningSolution,
    S::Score: ParseableScore,
{
    /// Applies `config`, including the constraint weights it lists.
    ///
    /// Fails if a weight is not a valid score string.
    pub fn with_config(mut self, config: ScoreDirectorConfig) -> Result<Self> {
        let overrides = ConstraintWeightOverrides::from_config(&config)?;
        self.model.overrides = Arc::new(overrides);
        self.model.config = Arc::new(config);
        Ok(self)
    }
}

impl<S: PlanningSolution> Clone for ScoreDirectorFactory<S> {
    fn clone(&self) -> Self {
        Self {
            model: self.model.clone(),
            _phantom: PhantomData,
        }
    }
}
