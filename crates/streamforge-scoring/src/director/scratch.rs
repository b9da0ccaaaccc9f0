//! From-scratch score director.

use streamforge_core::{PlanningSolution, Result, StreamForgeError};
use tracing::{debug, info, trace};

use super::hooks::{HookKind, HookLedger};
use super::model::{explain, match_totals, ScoringModel};
use super::ScoreDirector;
use crate::api::{ConstraintMatchTotal, ScoreExplanation};

/// Score director that builds a fresh network for every score.
///
/// Hooks are only checked for pairing and addressing. Scores, totals and
/// explanations are identical to those of [`StreamScoreDirector`] for the
/// same solution, which makes this director the reference when hunting
/// score corruption.
///
/// [`StreamScoreDirector`]: super::StreamScoreDirector
pub struct ScratchScoreDirector<S: PlanningSolution> {
    model: ScoringModel<S::Score>,
    solution: S,
    ledger: HookLedger,
    calculation_count: u64,
}

impl<S: PlanningSolution> ScratchScoreDirector<S> {
    pub(crate) fn new(model: ScoringModel<S::Score>, solution: S) -> Result<Self> {
        // Fail on a broken constraint definition now rather than at the
        // first score.
        model.empty_session(false)?;
        info!(solution = model.descriptor.type_name, "Working solution set");
        Ok(Self {
            model,
            solution,
            ledger: HookLedger::default(),
            calculation_count: 0,
        })
    }

    fn open(&mut self, kind: HookKind, descriptor_index: usize, index: usize) -> Result<()> {
        trace!(hook = %kind, descriptor_index, index, "before hook");
        let class = self.model.class(kind.fact_kind(), descriptor_index)?;
        if matches!(kind, HookKind::EntityRemoved | HookKind::ProblemFactRemoved) {
            let count = self.model.fact_count(class, &self.solution)?;
            if index >= count {
                return Err(StreamForgeError::DomainModel(format!(
                    "index {} is out of range for {:?} class #{} with {} facts",
                    index, class.kind, descriptor_index, count
                )));
            }
        }
        self.ledger.before(kind, descriptor_index, index);
        Ok(())
    }

    fn close(&mut self, kind: HookKind, descriptor_index: usize, index: usize) -> Result<()> {
        trace!(hook = %kind, descriptor_index, index, "after hook");
        self.model.class(kind.fact_kind(), descriptor_index)?;
        self.ledger.after(kind, descriptor_index, index)
    }
}

impl<S: PlanningSolution> ScoreDirector<S> for ScratchScoreDirector<S> {
    fn working_solution(&self) -> &S {
        &self.solution
    }

    fn working_solution_mut(&mut self) -> &mut S {
        &mut self.solution
    }

    fn set_working_solution(&mut self, solution: S) -> Result<()> {
        self.solution = solution;
        self.ledger.clear();
        info!(solution = self.model.descriptor.type_name, "Working solution set");
        Ok(())
    }

    fn calculate_score(&mut self) -> Result<S::Score> {
        self.ledger.ensure_settled()?;
        let score = self.model.scratch_score(&self.solution)?;
        self.calculation_count += 1;
        debug!(%score, calculation_count = self.calculation_count, "Score calculated from scratch");
        self.solution.set_score(Some(score));
        Ok(score)
    }

    fn calculation_count(&self) -> u64 {
        self.calculation_count
    }

    fn before_entity_added(&mut self, descriptor_index: usize, entity_index: usize) -> Result<()> {
        self.open(HookKind::EntityAdded, descriptor_index, entity_index)
    }

    fn after_entity_added(&mut self, descriptor_index: usize, entity_index: usize) -> Result<()> {
        self.close(HookKind::EntityAdded, descriptor_index, entity_index)
    }

    fn before_variable_changed(&mut self, descriptor_index: usize, entity_index: usize) -> Result<()> {
        self.open(HookKind::VariableChanged, descriptor_index, entity_index)
    }

    fn after_variable_changed(&mut self, descriptor_index: usize, entity_index: usize) -> Result<()> {
        self.close(HookKind::VariableChanged, descriptor_index, entity_index)
    }

    fn before_entity_removed(&mut self, descriptor_index: usize, entity_index: usize) -> Result<()> {
        self.open(HookKind::EntityRemoved, descriptor_index, entity_index)
    }

    fn after_entity_removed(&mut self, descriptor_index: usize, entity_index: usize) -> Result<()> {
        self.close(HookKind::EntityRemoved, descriptor_index, entity_index)
    }

    fn before_problem_fact_added(&mut self, descriptor_index: usize, fact_index: usize) -> Result<()> {
        self.open(HookKind::ProblemFactAdded, descriptor_index, fact_index)
    }

    fn after_problem_fact_added(&mut self, descriptor_index: usize, fact_index: usize) -> Result<()> {
        self.close(HookKind::ProblemFactAdded, descriptor_index, fact_index)
    }

    fn before_problem_property_changed(
        &mut self,
        descriptor_index: usize,
        fact_index: usize,
    ) -> Result<()> {
        self.open(HookKind::ProblemPropertyChanged, descriptor_index, fact_index)
    }

    fn after_problem_property_changed(
        &mut self,
        descriptor_index: usize,
        fact_index: usize,
    ) -> Result<()> {
        self.close(HookKind::ProblemPropertyChanged, descriptor_index, fact_index)
    }

    fn before_problem_fact_removed(&mut self, descriptor_index: usize, fact_index: usize) -> Result<()> {
        self.open(HookKind::ProblemFactRemoved, descriptor_index, fact_index)
    }

    fn after_problem_fact_removed(&mut self, descriptor_index: usize, fact_index: usize) -> Result<()> {
        self.close(HookKind::ProblemFactRemoved, descriptor_index, fact_index)
    }

    fn constraint_match_totals(&self) -> Result<Vec<ConstraintMatchTotal<S::Score>>> {
        self.ledger.ensure_settled()?;
        let (session, _) = self.model.load(&self.solution, false)?;
        Ok(match_totals(&session))
    }

    fn explain_score(&self) -> Result<ScoreExplanation<S::Score>> {
        self.ledger.ensure_settled()?;
        let (session, _) = self.model.load(&self.solution, true)?;
        Ok(explain(&session))
    }

    fn take_solution(self) -> S {
        self.solution
    }
}
