//! User entry point for constraint definitions.

use streamforge_core::Score;

use crate::stream::{Constraint, ConstraintFactory};

/// Defines the constraints of a problem.
///
/// Called once per network build with a fresh factory. Any
/// `Fn(&ConstraintFactory<Sc>) -> Vec<Constraint<Sc>>` is a provider.
///
/// # Example
///
/// ```
/// use streamforge_core::SimpleScore;
/// use streamforge_scoring::{Constraint, ConstraintFactory, ConstraintProvider};
///
/// #[derive(Clone, Debug)]
/// struct Task { duration: i64 }
///
/// fn define(factory: &ConstraintFactory<SimpleScore>) -> Vec<Constraint<SimpleScore>> {
///     vec![factory
///         .for_each::<Task>()
///         .penalize_with(SimpleScore::ONE, |t| t.duration)
///         .as_constraint("Total duration")]
/// }
///
/// fn assert_provider<P: ConstraintProvider<SimpleScore>>(_: &P) {}
/// assert_provider(&define);
/// ```
pub trait ConstraintProvider<Sc: Score>: Send + Sync {
    fn define_constraints(&self, factory: &ConstraintFactory<Sc>) -> Vec<Constraint<Sc>>;
}

impl<Sc, F> ConstraintProvider<Sc> for F
where
    Sc: Score,
    F: Fn(&ConstraintFactory<Sc>) -> Vec<Constraint<Sc>> + Send + Sync,
{
    fn define_constraints(&self, factory: &ConstraintFactory<Sc>) -> Vec<Constraint<Sc>> {
        self(factory)
    }
}
