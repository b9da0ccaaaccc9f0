// Score director trait definition.

use streamforge_core::{PlanningSolution, Result};

use crate::api::{ConstraintMatchTotal, IndictmentMap, ScoreExplanation};

// The score director manages the working solution and its score.
//
// Every mutation of the working solution is wrapped in a pair of hooks:
// the before-hook sees the old state, the after-hook the new one. Facts are
// addressed by the index of their class within its kind (entity classes and
// problem-fact classes are numbered separately) and by their position in
// the class collection. For additions the position is the one the new fact
// will occupy; for removals, the one it occupied.
//
// A hook error leaves the director in an unspecified state; recover with
// `set_working_solution`.
pub trait ScoreDirector<S: PlanningSolution>: Send {
    // Returns a reference to the working solution.
    fn working_solution(&self) -> &S;

    // Returns a mutable reference to the working solution. Mutate it only
    // between a before-hook and its after-hook.
    fn working_solution_mut(&mut self) -> &mut S;

    // Replaces the working solution and reinserts every fact from scratch.
    fn set_working_solution(&mut self, solution: S) -> Result<()>;

    // Returns the score of the working solution and stores it in it.
    //
    // Fails while a before-hook is open.
    fn calculate_score(&mut self) -> Result<S::Score>;

    // Number of `calculate_score` calls since the director was created.
    fn calculation_count(&self) -> u64;

    fn before_entity_added(&mut self, descriptor_index: usize, entity_index: usize) -> Result<()>;

    fn after_entity_added(&mut self, descriptor_index: usize, entity_index: usize) -> Result<()>;

    fn before_variable_changed(&mut self, descriptor_index: usize, entity_index: usize) -> Result<()>;

    fn after_variable_changed(&mut self, descriptor_index: usize, entity_index: usize) -> Result<()>;

    fn before_entity_removed(&mut self, descriptor_index: usize, entity_index: usize) -> Result<()>;

    fn after_entity_removed(&mut self, descriptor_index: usize, entity_index: usize) -> Result<()>;

    fn before_problem_fact_added(&mut self, descriptor_index: usize, fact_index: usize) -> Result<()>;

    fn after_problem_fact_added(&mut self, descriptor_index: usize, fact_index: usize) -> Result<()>;

    fn before_problem_property_changed(
        &mut self,
        descriptor_index: usize,
        fact_index: usize,
    ) -> Result<()>;

    fn after_problem_property_changed(
        &mut self,
        descriptor_index: usize,
        fact_index: usize,
    ) -> Result<()>;

    fn before_problem_fact_removed(&mut self, descriptor_index: usize, fact_index: usize) -> Result<()>;

    fn after_problem_fact_removed(&mut self, descriptor_index: usize, fact_index: usize) -> Result<()>;

    // Running total and match count of every constraint, in definition order.
    fn constraint_match_totals(&self) -> Result<Vec<ConstraintMatchTotal<S::Score>>>;

    // Score broken down per constraint with every live match.
    fn explain_score(&self) -> Result<ScoreExplanation<S::Score>>;

    // Score impact of every fact that appears in a match.
    fn indictments(&self) -> Result<IndictmentMap<S::Score>> {
        let explanation = self.explain_score()?;
        Ok(IndictmentMap::from_matches(
            explanation
                .constraint_analyses
                .into_iter()
                .flat_map(|analysis| analysis.matches)
                .collect(),
        ))
    }

    // Consumes the director and returns the working solution.
    fn take_solution(self) -> S
    where
        Self: Sized;
}
