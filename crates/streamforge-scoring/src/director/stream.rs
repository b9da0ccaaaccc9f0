//! Incremental score director.

use streamforge_core::{FactClass, PlanningSolution, Result, StreamForgeError};
use tracing::{debug, info, trace, warn};

use super::hooks::{HookKind, HookLedger};
use super::model::{explain, match_totals, FactHandles, ScoringModel};
use super::ScoreDirector;
use crate::api::{ConstraintMatchTotal, ScoreExplanation};
use crate::network::Session;

/// Score director that keeps the constraint network alive between calls.
///
/// Every after-hook pushes the mutated fact through the network, so
/// `calculate_score` only sums the running constraint totals.
///
/// # Example
///
/// ```
/// use streamforge_core::{PlanningSolution, SimpleScore, SolutionDescriptor};
/// use streamforge_scoring::{Constraint, ConstraintFactory, ScoreDirector, ScoreDirectorFactory};
///
/// #[derive(Clone, Debug)]
/// struct Queen { column: u32, row: Option<u32> }
///
/// #[derive(Clone, Debug)]
/// struct Board { queens: Vec<Queen>, score: Option<SimpleScore> }
///
/// impl PlanningSolution for Board {
///     type Score = SimpleScore;
///     fn score(&self) -> Option<SimpleScore> { self.score }
///     fn set_score(&mut self, score: Option<SimpleScore>) { self.score = score; }
/// }
///
/// fn queens(b: &Board) -> &Vec<Queen> { &b.queens }
///
/// fn define(factory: &ConstraintFactory<SimpleScore>) -> Vec<Constraint<SimpleScore>> {
///     vec![factory
///         .for_each::<Queen>()
///         .filter(|q| q.row.is_none())
///         .penalize(SimpleScore::ONE)
///         .as_constraint("Unassigned queen")]
/// }
///
/// let descriptor = SolutionDescriptor::new::<Board>("Board").with_entity_class("Queen", queens);
/// let factory = ScoreDirectorFactory::<Board>::new(descriptor, define);
///
/// let board = Board {
///     queens: vec![Queen { column: 0, row: None }, Queen { column: 1, row: Some(0) }],
///     score: None,
/// };
/// let mut director = factory.build_score_director(board).unwrap();
/// assert_eq!(director.calculate_score().unwrap(), SimpleScore::of(-1));
///
/// director.before_variable_changed(0, 0).unwrap();
/// director.working_solution_mut().queens[0].row = Some(3);
/// director.after_variable_changed(0, 0).unwrap();
/// assert_eq!(director.calculate_score().unwrap(), SimpleScore::ZERO);
/// ```
pub struct StreamScoreDirector<S: PlanningSolution> {
    model: ScoringModel<S::Score>,
    solution: S,
    session: Session<S::Score>,
    handles: FactHandles,
    ledger: HookLedger,
    calculation_count: u64,
}

impl<S: PlanningSolution> StreamScoreDirector<S> {
    pub(crate) fn new(model: ScoringModel<S::Score>, solution: S) -> Result<Self> {
        let (session, handles) = model.load(&solution, model.tracks_matches())?;
        let director = Self {
            model,
            solution,
            session,
            handles,
            ledger: HookLedger::default(),
            calculation_count: 0,
        };
        director.log_loaded();
        Ok(director)
    }

    /// Number of operator nodes in the network.
    pub fn node_count(&self) -> usize {
        self.session.node_count()
    }

    /// Number of tuples alive in the network, facts included.
    pub fn live_tuple_count(&self) -> usize {
        self.session.live_tuple_count()
    }

    fn log_loaded(&self) {
        info!(
            solution = self.model.descriptor.type_name,
            fact_count = self.handles.iter().map(Vec::len).sum::<usize>(),
            constraint_count = self.session.scorers().len(),
            node_count = self.session.node_count(),
            "Working solution set"
        );
    }

    fn open(&mut self, kind: HookKind, descriptor_index: usize, index: usize) -> Result<()> {
        trace!(hook = %kind, descriptor_index, index, "before hook");
        let class = self.model.class(kind.fact_kind(), descriptor_index)?;
        self.ledger.before(kind, descriptor_index, index);
        match kind {
            // The fact is still in the solution; its position goes away.
            HookKind::EntityRemoved | HookKind::ProblemFactRemoved => self.retract(class, index),
            _ => Ok(()),
        }
    }

    fn close(&mut self, kind: HookKind, descriptor_index: usize, index: usize) -> Result<()> {
        trace!(hook = %kind, descriptor_index, index, "after hook");
        let class = self.model.class(kind.fact_kind(), descriptor_index)?;
        self.ledger.after(kind, descriptor_index, index)?;
        match kind {
            HookKind::EntityAdded | HookKind::ProblemFactAdded => self.insert(class, index)?,
            HookKind::VariableChanged | HookKind::ProblemPropertyChanged => {
                self.update(class, index)?
            }
            HookKind::EntityRemoved | HookKind::ProblemFactRemoved => {}
        }
        if self.model.config.environment_mode.is_fully_asserted() && self.ledger.is_settled() {
            self.assert_score(&format!("after_{}({}, {})", kind, descriptor_index, index))?;
        }
        Ok(())
    }

    fn insert(&mut self, class: FactClass, index: usize) -> Result<()> {
        let ordinal = self.model.descriptor.class_ordinal(class);
        let known = self.handles[ordinal].len();
        if index > known {
            return Err(out_of_range(class, index, known + 1));
        }
        let handle = if self.session.reads_class(ordinal) {
            let fact = self.model.clone_fact(class, &self.solution, index)?;
            self.session.insert_fact(ordinal, fact)?
        } else {
            None
        };
        self.handles[ordinal].insert(index, handle);
        Ok(())
    }

    fn update(&mut self, class: FactClass, index: usize) -> Result<()> {
        let ordinal = self.model.descriptor.class_ordinal(class);
        let handles = &self.handles[ordinal];
        let handle = *handles
            .get(index)
            .ok_or_else(|| out_of_range(class, index, handles.len()))?;
        if let Some(id) = handle {
            let fact = self.model.clone_fact(class, &self.solution, index)?;
            self.session.update_fact(ordinal, id, fact)?;
        }
        Ok(())
    }

    fn retract(&mut self, class: FactClass, index: usize) -> Result<()> {
        let ordinal = self.model.descriptor.class_ordinal(class);
        let known = self.handles[ordinal].len();
        if index >= known {
            return Err(out_of_range(class, index, known));
        }
        if let Some(id) = self.handles[ordinal].remove(index) {
            self.session.retract_fact(ordinal, id)?;
        }
        Ok(())
    }

    fn assert_score(&self, checkpoint: &str) -> Result<()> {
        let incremental = self.session.score();
        let expected = self.model.scratch_score(&self.solution)?;
        if incremental != expected {
            warn!(%incremental, %expected, checkpoint, "Score corruption detected");
            return Err(StreamForgeError::ScoreCorruption(format!(
                "incremental score {} differs from the from-scratch score {} at {}",
                incremental, expected, checkpoint
            )));
        }
        Ok(())
    }
}

fn out_of_range(class: FactClass, index: usize, len: usize) -> StreamForgeError {
    StreamForgeError::DomainModel(format!(
        "index {} is out of range for {:?} class #{} with {} known facts",
        index, class.kind, class.descriptor_index, len
    ))
}

impl<S: PlanningSolution> ScoreDirector<S> for StreamScoreDirector<S> {
    fn working_solution(&self) -> &S {
        &self.solution
    }

    fn working_solution_mut(&mut self) -> &mut S {
        &mut self.solution
    }

    fn set_working_solution(&mut self, solution: S) -> Result<()> {
        let (session, handles) = self.model.load(&solution, self.model.tracks_matches())?;
        self.solution = solution;
        self.session = session;
        self.handles = handles;
        self.ledger.clear();
        self.log_loaded();
        Ok(())
    }

    fn calculate_score(&mut self) -> Result<S::Score> {
        self.ledger.ensure_settled()?;
        let score = self.session.score();
        self.calculation_count += 1;
        debug!(%score, calculation_count = self.calculation_count, "Score calculated");
        if self.model.config.environment_mode.is_asserted() {
            self.assert_score("calculate_score")?;
        }
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
        Ok(match_totals(&self.session))
    }

    fn explain_score(&self) -> Result<ScoreExplanation<S::Score>> {
        self.ledger.ensure_settled()?;
        if self.model.tracks_matches() {
            return Ok(explain(&self.session));
        }
        // Without tracking the live matches carry no justification.
        let (session, _) = self.model.load(&self.solution, true)?;
        Ok(explain(&session))
    }

    fn take_solution(self) -> S {
        self.solution
    }
}
