//! Tests for constraint weight overrides and the provider entry point.

use std::sync::Arc;

use streamforge_config::ScoreDirectorConfig;
use streamforge_core::{ConstraintRef, HardSoftScore, SimpleScore, StreamForgeError};

use crate::api::weight_overrides::{ConstraintWeightOverrides, WeightProvider};
use crate::api::ConstraintProvider;
use crate::stream::{Constraint, ConstraintFactory};

// ============================================================================
// ConstraintWeightOverrides tests
// ============================================================================

#[test]
fn test_new_is_empty() {
    let overrides = ConstraintWeightOverrides::<SimpleScore>::new();
    assert!(overrides.is_empty());
    assert_eq!(overrides.len(), 0);
}

#[test]
fn test_put_and_get() {
    let mut overrides = ConstraintWeightOverrides::<SimpleScore>::new();
    overrides.put("Unassigned", SimpleScore::of(5));

    assert!(overrides.contains("Unassigned"));
    assert_eq!(overrides.get("Unassigned"), Some(&SimpleScore::of(5)));
    assert_eq!(overrides.get("Other"), None);
}

#[test]
fn test_get_or_default() {
    let overrides =
        ConstraintWeightOverrides::from_pairs([("Overlap", SimpleScore::of(5))]);

    assert_eq!(
        overrides.get_or_default("Overlap", SimpleScore::ONE),
        SimpleScore::of(5)
    );
    assert_eq!(
        overrides.get_or_default("Unassigned", SimpleScore::ONE),
        SimpleScore::ONE
    );
}

#[test]
fn test_remove_and_clear() {
    let mut overrides = ConstraintWeightOverrides::from_pairs([
        ("a", SimpleScore::of(1)),
        ("b", SimpleScore::of(2)),
    ]);

    assert_eq!(overrides.remove("a"), Some(SimpleScore::of(1)));
    assert_eq!(overrides.remove("a"), None);
    assert_eq!(overrides.len(), 1);

    overrides.clear();
    assert!(overrides.is_empty());
}

#[test]
fn test_from_pairs_hard_soft() {
    let overrides = ConstraintWeightOverrides::<HardSoftScore>::from_pairs([
        ("hard_constraint", HardSoftScore::of_hard(1)),
        ("soft_constraint", HardSoftScore::of_soft(10)),
    ]);

    assert_eq!(overrides.len(), 2);
    assert_eq!(
        overrides.get("soft_constraint"),
        Some(&HardSoftScore::of_soft(10))
    );
}

#[test]
fn test_weight_provider_trait() {
    let overrides = ConstraintWeightOverrides::from_pairs([("test", SimpleScore::of(5))]);

    assert_eq!(overrides.weight("test"), Some(SimpleScore::of(5)));
    assert_eq!(overrides.weight("missing"), None);
    assert_eq!(
        overrides.weight_or_default("missing", SimpleScore::of(3)),
        SimpleScore::of(3)
    );
}

#[test]
fn test_weight_provider_through_arc() {
    let overrides =
        ConstraintWeightOverrides::from_pairs([("test", SimpleScore::of(7))]).into_arc();
    let shared = Arc::clone(&overrides);

    assert_eq!(shared.weight("test"), Some(SimpleScore::of(7)));
    assert_eq!(Arc::strong_count(&overrides), 2);
}

#[test]
fn test_unknown_names_are_sorted() {
    let overrides = ConstraintWeightOverrides::from_pairs([
        ("scheduling/Overlap", SimpleScore::of(1)),
        ("zeta", SimpleScore::of(1)),
        ("alpha", SimpleScore::of(1)),
    ]);
    let known = vec![ConstraintRef::new("scheduling", "Overlap")];

    assert_eq!(overrides.unknown_names(&known), vec!["alpha", "zeta"]);
}

#[test]
fn test_debug_shows_count_only() {
    let overrides = ConstraintWeightOverrides::from_pairs([("secret", SimpleScore::of(1))]);
    let debug = format!("{:?}", overrides);

    assert!(debug.contains("count: 1"));
    assert!(!debug.contains("secret"));
}

// ============================================================================
// Configuration tests
// ============================================================================

#[test]
fn test_from_config_parses_weights() {
    let config = ScoreDirectorConfig::new()
        .with_constraint_weight("Overlap", "2hard/0soft")
        .with_constraint_weight("Preference", "0hard/-3soft");

    let overrides = ConstraintWeightOverrides::<HardSoftScore>::from_config(&config).unwrap();

    assert_eq!(overrides.get("Overlap"), Some(&HardSoftScore::of(2, 0)));
    assert_eq!(overrides.get("Preference"), Some(&HardSoftScore::of(0, -3)));
}

#[test]
fn test_from_config_rejects_bad_weight() {
    let config = ScoreDirectorConfig::new().with_constraint_weight("Overlap", "two");

    let err = ConstraintWeightOverrides::<SimpleScore>::from_config(&config).unwrap_err();

    match err {
        StreamForgeError::Config(message) => {
            assert!(message.contains("Overlap"));
            assert!(message.contains("two"));
        }
        other => panic!("expected a config error, got {:?}", other),
    }
}

#[test]
fn test_from_config_empty() {
    let overrides =
        ConstraintWeightOverrides::<SimpleScore>::from_config(&ScoreDirectorConfig::default())
            .unwrap();
    assert!(overrides.is_empty());
}

// ============================================================================
// ConstraintProvider tests
// ============================================================================

#[derive(Clone, Debug)]
struct Task {
    duration: i64,
}

fn tasks(tasks: &Vec<Task>) -> &Vec<Task> {
    tasks
}

struct DurationProvider {
    weight: SimpleScore,
}

impl ConstraintProvider<SimpleScore> for DurationProvider {
    fn define_constraints(
        &self,
        factory: &ConstraintFactory<SimpleScore>,
    ) -> Vec<Constraint<SimpleScore>> {
        vec![factory
            .for_each::<Task>()
            .penalize_with(self.weight, |t| t.duration)
            .as_constraint_in("tasks", "Duration")]
    }
}

#[test]
fn test_struct_provider_defines_constraints() {
    let descriptor = streamforge_core::SolutionDescriptor::new::<Vec<Task>>("Tasks")
        .with_entity_class("Task", tasks);
    let factory = ConstraintFactory::<SimpleScore>::new(&descriptor);
    let provider = DurationProvider {
        weight: SimpleScore::of(2),
    };

    let constraints = provider.define_constraints(&factory);

    assert_eq!(constraints.len(), 1);
    assert_eq!(constraints[0].constraint_ref().full_name(), "tasks/Duration");
    assert_eq!(constraints[0].weight(), SimpleScore::of(2));
}
