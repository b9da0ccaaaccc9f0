//! Network-level tests: sessions driven directly by fact events.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use streamforge_core::{Result, SimpleScore, StreamForgeError};
use streamforge_test::lavish::{descriptor, generate_solution};
use streamforge_test::{LavishEntity, LavishEntityGroup, LavishValue, LavishValueGroup};

use super::{build_session, Session, TupleId};
use crate::api::{ConstraintProvider, ConstraintWeightOverrides};
use crate::stream::collector::{count, sum};
use crate::stream::joiner::{cross, equal, equal_self};
use crate::stream::ConstraintFactory;

const ENTITY: usize = 0;
const VALUE_GROUP: usize = 1;
const VALUE: usize = 2;
const ENTITY_GROUP: usize = 3;

type Factory = ConstraintFactory<SimpleScore>;

fn try_session<P: ConstraintProvider<SimpleScore>>(
    provider: P,
    overrides: ConstraintWeightOverrides<SimpleScore>,
) -> Result<Session<SimpleScore>> {
    build_session(&descriptor(), &provider, &overrides, true)
}

fn session<P: ConstraintProvider<SimpleScore>>(provider: P) -> Session<SimpleScore> {
    try_session(provider, ConstraintWeightOverrides::new()).unwrap()
}

fn entity(code: &str, group: &str, value: Option<&str>, integer_property: i64) -> LavishEntity {
    LavishEntity {
        code: code.to_string(),
        entity_group: group.to_string(),
        value: value.map(str::to_string),
        integer_property,
    }
}

fn value(code: &str, group: &str) -> LavishValue {
    LavishValue {
        code: code.to_string(),
        value_group: group.to_string(),
    }
}

fn insert_entity(session: &mut Session<SimpleScore>, e: LavishEntity) -> TupleId {
    session.insert_fact(ENTITY, Arc::new(e)).unwrap().unwrap()
}

fn insert_value(session: &mut Session<SimpleScore>, v: LavishValue) -> TupleId {
    session.insert_fact(VALUE, Arc::new(v)).unwrap().unwrap()
}

fn assert_lifecycle_violation<T: std::fmt::Debug>(result: Result<T>) {
    match result {
        Err(StreamForgeError::LifecycleViolation(_)) => {}
        other => panic!("expected a lifecycle violation, got {:?}", other),
    }
}

fn assert_config_error<T>(result: Result<T>) {
    match result {
        Err(StreamForgeError::Config(_)) => {}
        Err(other) => panic!("expected a config error, got {:?}", other),
        Ok(_) => panic!("expected a config error, got a session"),
    }
}

// ============================================================================
// Fact lifecycle
// ============================================================================

fn assigned(factory: &Factory) -> Vec<crate::Constraint<SimpleScore>> {
    vec![factory
        .for_each::<LavishEntity>()
        .filter(|e| e.value.is_some())
        .penalize(SimpleScore::ONE)
        .as_constraint("Assigned")]
}

#[test]
fn test_insert_update_retract() {
    let mut session = session(assigned);

    let a = insert_entity(&mut session, entity("a", "g", Some("v"), 0));
    let b = insert_entity(&mut session, entity("b", "g", Some("v"), 0));
    insert_entity(&mut session, entity("c", "g", None, 0));
    assert_eq!(session.score(), SimpleScore::of(-2));

    session
        .update_fact(ENTITY, a, Arc::new(entity("a", "g", None, 0)))
        .unwrap();
    assert_eq!(session.score(), SimpleScore::of(-1));

    session.retract_fact(ENTITY, b).unwrap();
    assert_eq!(session.score(), SimpleScore::ZERO);
    assert_eq!(session.scorers()[0].match_count(), 0);
}

#[test]
fn test_double_retract_is_lifecycle_violation() {
    let mut session = session(assigned);
    let a = insert_entity(&mut session, entity("a", "g", Some("v"), 0));

    session.retract_fact(ENTITY, a).unwrap();

    assert_lifecycle_violation(session.retract_fact(ENTITY, a));
    assert_eq!(session.score(), SimpleScore::ZERO);
}

#[test]
fn test_update_of_dead_tuple_is_lifecycle_violation() {
    let mut session = session(assigned);
    let a = insert_entity(&mut session, entity("a", "g", Some("v"), 0));
    session.retract_fact(ENTITY, a).unwrap();

    assert_lifecycle_violation(session.update_fact(ENTITY, a, Arc::new(entity("a", "g", None, 0))));
}

#[test]
fn test_recycled_slot_rejects_stale_handle() {
    let mut session = session(assigned);
    let old = insert_entity(&mut session, entity("a", "g", Some("v"), 0));
    session.retract_fact(ENTITY, old).unwrap();

    let new = insert_entity(&mut session, entity("b", "g", Some("v"), 0));

    assert_eq!(old.index(), new.index());
    assert_ne!(old, new);
    assert_lifecycle_violation(session.retract_fact(ENTITY, old));
    assert_eq!(session.score(), SimpleScore::of(-1));
}

// ============================================================================
// Joins
// ============================================================================

#[test]
fn test_unique_pairs_over_n_facts() {
    let mut session = session(|factory: &Factory| {
        vec![factory
            .for_each_unique_pair::<LavishEntity, ()>(cross())
            .penalize(SimpleScore::ONE)
            .as_constraint("Every pair")]
    });

    let ids: Vec<TupleId> = (0..5)
        .map(|i| insert_entity(&mut session, entity(&format!("e{}", i), "g", None, i)))
        .collect();
    assert_eq!(session.scorers()[0].match_count(), 10);
    assert_eq!(session.score(), SimpleScore::of(-10));

    session.retract_fact(ENTITY, ids[2]).unwrap();
    assert_eq!(session.scorers()[0].match_count(), 6);
}

#[test]
fn test_unique_pairs_never_pair_a_fact_with_itself() {
    let mut session = session(|factory: &Factory| {
        vec![factory
            .for_each_unique_pair(equal_self(|e: &LavishEntity| e.entity_group.clone()))
            .penalize(SimpleScore::ONE)
            .as_constraint("Same group")]
    });

    let a = insert_entity(&mut session, entity("a", "g1", None, 0));
    assert_eq!(session.score(), SimpleScore::ZERO);

    insert_entity(&mut session, entity("b", "g1", None, 0));
    insert_entity(&mut session, entity("c", "g2", None, 0));
    assert_eq!(session.score(), SimpleScore::of(-1));

    session
        .update_fact(ENTITY, a, Arc::new(entity("a", "g2", None, 0)))
        .unwrap();
    assert_eq!(session.score(), SimpleScore::of(-1));
    assert_eq!(session.scorers()[0].match_count(), 1);
}

#[test]
fn test_join_follows_key_changes() {
    let mut session = session(|factory: &Factory| {
        vec![factory
            .for_each::<LavishEntity>()
            .join(
                factory.for_each::<LavishValue>(),
                equal(|e: &LavishEntity| e.value.clone(), |v: &LavishValue| Some(v.code.clone())),
            )
            .filter(|_, v| v.value_group == "vg0")
            .penalize(SimpleScore::ONE)
            .as_constraint("In value group 0")]
    });

    insert_value(&mut session, value("v0", "vg0"));
    let v1 = insert_value(&mut session, value("v1", "vg1"));
    let e = insert_entity(&mut session, entity("e", "g", Some("v1"), 0));
    assert_eq!(session.score(), SimpleScore::ZERO);

    session
        .update_fact(ENTITY, e, Arc::new(entity("e", "g", Some("v0"), 0)))
        .unwrap();
    assert_eq!(session.score(), SimpleScore::of(-1));

    session
        .update_fact(VALUE, v1, Arc::new(value("v1", "vg0")))
        .unwrap();
    assert_eq!(session.score(), SimpleScore::of(-1));

    session
        .update_fact(ENTITY, e, Arc::new(entity("e", "g", Some("v1"), 0)))
        .unwrap();
    assert_eq!(session.score(), SimpleScore::of(-1));
}

// ============================================================================
// Exists
// ============================================================================

fn value_exists(should_exist: bool) -> impl Fn(&Factory) -> Vec<crate::Constraint<SimpleScore>> {
    move |factory: &Factory| {
        let entities = factory.for_each::<LavishEntity>();
        let values = factory.for_each::<LavishValue>();
        let joiner = equal(|e: &LavishEntity| e.value.clone(), |v: &LavishValue| Some(v.code.clone()));
        let gated = if should_exist {
            entities.if_exists(values, joiner)
        } else {
            entities.if_not_exists(values, joiner)
        };
        vec![gated.penalize(SimpleScore::ONE).as_constraint("Gated")]
    }
}

#[test]
fn test_if_exists_flips_on_first_and_last_match() {
    let mut session = session(value_exists(true));
    insert_entity(&mut session, entity("e", "g", Some("v"), 0));
    assert_eq!(session.score(), SimpleScore::ZERO);

    let first = insert_value(&mut session, value("v", "vg"));
    assert_eq!(session.score(), SimpleScore::of(-1));

    let second = insert_value(&mut session, value("v", "other"));
    assert_eq!(session.score(), SimpleScore::of(-1));

    session.retract_fact(VALUE, first).unwrap();
    assert_eq!(session.score(), SimpleScore::of(-1));

    session.retract_fact(VALUE, second).unwrap();
    assert_eq!(session.score(), SimpleScore::ZERO);
}

#[test]
fn test_if_not_exists_is_the_complement() {
    let mut session = session(value_exists(false));
    let e = insert_entity(&mut session, entity("e", "g", Some("v"), 0));
    assert_eq!(session.score(), SimpleScore::of(-1));

    let v = insert_value(&mut session, value("v", "vg"));
    assert_eq!(session.score(), SimpleScore::ZERO);

    session
        .update_fact(ENTITY, e, Arc::new(entity("e", "g", Some("w"), 0)))
        .unwrap();
    assert_eq!(session.score(), SimpleScore::of(-1));

    session
        .update_fact(VALUE, v, Arc::new(value("w", "vg")))
        .unwrap();
    assert_eq!(session.score(), SimpleScore::ZERO);
}

// ============================================================================
// Grouping
// ============================================================================

#[test]
fn test_group_output_lives_while_group_is_non_empty() {
    let mut session = session(|factory: &Factory| {
        vec![factory
            .for_each::<LavishEntity>()
            .group_by(|e| e.entity_group.clone(), count())
            .penalize_with(SimpleScore::ONE, |_, n| *n as i64)
            .as_constraint("Group size")]
    });

    let ids: Vec<TupleId> = (0..3)
        .map(|i| insert_entity(&mut session, entity(&format!("e{}", i), "g", None, 0)))
        .collect();
    assert_eq!(session.scorers()[0].match_count(), 1);
    assert_eq!(session.score(), SimpleScore::of(-3));

    session.retract_fact(ENTITY, ids[0]).unwrap();
    session.retract_fact(ENTITY, ids[1]).unwrap();
    assert_eq!(session.scorers()[0].match_count(), 1);
    assert_eq!(session.score(), SimpleScore::of(-1));

    session.retract_fact(ENTITY, ids[2]).unwrap();
    assert_eq!(session.scorers()[0].match_count(), 0);
    assert_eq!(session.live_tuple_count(), 0);
}

#[test]
fn test_group_moves_member_between_keys() {
    let mut session = session(|factory: &Factory| {
        vec![factory
            .for_each::<LavishEntity>()
            .group_by(|e| e.entity_group.clone(), sum(|e: &LavishEntity| e.integer_property))
            .filter(|group, _| group == "g1")
            .penalize_with(SimpleScore::ONE, |_, total| *total)
            .as_constraint("Group 1 total")]
    });

    let a = insert_entity(&mut session, entity("a", "g1", None, 4));
    insert_entity(&mut session, entity("b", "g1", None, 5));
    assert_eq!(session.score(), SimpleScore::of(-9));

    session
        .update_fact(ENTITY, a, Arc::new(entity("a", "g2", None, 4)))
        .unwrap();
    assert_eq!(session.score(), SimpleScore::of(-5));
    assert_eq!(session.scorers()[0].match_count(), 1);
}

#[test]
fn test_regroup_suppresses_unchanged_results() {
    let scored = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&scored);
    let mut session = session(move |factory: &Factory| {
        let counter = Arc::clone(&counter);
        vec![factory
            .for_each::<LavishEntity>()
            .group_by(|e| e.value.clone(), sum(|e: &LavishEntity| e.integer_property))
            .group_by(|_, total| *total > 10, count())
            .penalize_with(SimpleScore::ONE, move |_, n| {
                counter.fetch_add(1, Ordering::SeqCst);
                *n as i64
            })
            .as_constraint("Large totals")]
    });

    let a = insert_entity(&mut session, entity("a", "g", Some("v"), 6));
    insert_entity(&mut session, entity("b", "g", Some("v"), 7));
    assert_eq!(session.score(), SimpleScore::of(-1));
    let before = scored.load(Ordering::SeqCst);

    // The sum moves from 13 to 15; the second level still sees one group
    // above 10.
    session
        .update_fact(ENTITY, a, Arc::new(entity("a", "g", Some("v"), 8)))
        .unwrap();

    assert_eq!(scored.load(Ordering::SeqCst), before);
    assert_eq!(session.score(), SimpleScore::of(-1));
}

#[test]
fn test_triple_regroup_suppresses_unchanged_results() {
    let scored = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&scored);
    let mut session = session(move |factory: &Factory| {
        let counter = Arc::clone(&counter);
        vec![factory
            .for_each::<LavishEntity>()
            .group_by(|e| e.value.clone(), sum(|e: &LavishEntity| e.integer_property))
            .group_by(|_, total| *total > 10, count())
            .group_by(|_, n| *n, count())
            .penalize_with(SimpleScore::ONE, move |_, groups| {
                counter.fetch_add(1, Ordering::SeqCst);
                *groups as i64
            })
            .as_constraint("Large total spread")]
    });

    let a = insert_entity(&mut session, entity("a", "g", Some("v"), 6));
    insert_entity(&mut session, entity("b", "g", Some("v"), 7));
    let c = insert_entity(&mut session, entity("c", "g", Some("w"), 20));
    // v = 13 and w = 20: one level-two group holding 2.
    assert_eq!(session.score(), SimpleScore::of(-1));
    let before = scored.load(Ordering::SeqCst);

    // v moves to 15: the first level changes, the second does not.
    session
        .update_fact(ENTITY, a, Arc::new(entity("a", "g", Some("v"), 8)))
        .unwrap();
    assert_eq!(scored.load(Ordering::SeqCst), before);
    assert_eq!(session.score(), SimpleScore::of(-1));

    // w drops to 5: two level-two groups of 1 each.
    session
        .update_fact(ENTITY, c, Arc::new(entity("c", "g", Some("w"), 5)))
        .unwrap();
    assert_eq!(session.score(), SimpleScore::of(-2));
    assert_eq!(session.scorers()[0].match_count(), 1);
}

#[test]
fn test_unchanged_group_result_is_not_propagated() {
    let filtered = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&filtered);
    let mut session = session(move |factory: &Factory| {
        let counter = Arc::clone(&counter);
        vec![factory
            .for_each::<LavishEntity>()
            .group_by(|e| e.entity_group.clone(), sum(|e: &LavishEntity| e.integer_property))
            .filter(move |_, _| {
                counter.fetch_add(1, Ordering::SeqCst);
                true
            })
            .penalize_with(SimpleScore::ONE, |_, total| *total)
            .as_constraint("Group total")]
    });

    let a = insert_entity(&mut session, entity("a", "g", None, 3));
    let before = filtered.load(Ordering::SeqCst);

    // Same group and same sum: nothing observable changed.
    session
        .update_fact(ENTITY, a, Arc::new(entity("a", "g", Some("v"), 3)))
        .unwrap();
    assert_eq!(filtered.load(Ordering::SeqCst), before);

    session
        .update_fact(ENTITY, a, Arc::new(entity("a", "g", Some("v"), 4)))
        .unwrap();
    assert_eq!(filtered.load(Ordering::SeqCst), before + 1);
    assert_eq!(session.score(), SimpleScore::of(-4));
}

// ============================================================================
// Network shape
// ============================================================================

#[test]
fn test_zero_weight_constraint_is_pruned() {
    let provider = |factory: &Factory| {
        vec![
            factory
                .for_each::<LavishEntity>()
                .filter(|e| e.value.is_none())
                .penalize(SimpleScore::ONE)
                .as_constraint("Unassigned"),
            factory
                .for_each::<LavishValue>()
                .filter(|v| v.value_group == "vg0")
                .penalize(SimpleScore::ONE)
                .as_constraint("Disabled"),
        ]
    };
    let overrides = ConstraintWeightOverrides::from_pairs([("Disabled", SimpleScore::ZERO)]);

    let mut session = try_session(provider, overrides).unwrap();

    assert_eq!(session.node_count(), 1);
    assert_eq!(session.scorers().len(), 2);
    assert!(session.reads_class(ENTITY));
    assert!(!session.reads_class(VALUE));
    assert_eq!(
        session.insert_fact(VALUE, Arc::new(value("v", "vg0"))).unwrap(),
        None
    );
    assert_eq!(session.score(), SimpleScore::ZERO);
}

#[test]
fn test_shared_source_across_constraints() {
    let mut session = session(|factory: &Factory| {
        vec![
            factory
                .for_each::<LavishEntity>()
                .penalize(SimpleScore::ONE)
                .as_constraint("Every entity"),
            factory
                .for_each::<LavishEntity>()
                .reward(SimpleScore::of(2))
                .as_constraint("Every entity rewarded"),
        ]
    });

    insert_entity(&mut session, entity("a", "g", None, 0));

    assert_eq!(session.node_count(), 0);
    assert_eq!(session.score(), SimpleScore::of(1));
    assert_eq!(session.live_tuple_count(), 1);
}

#[test]
fn test_duplicate_constraint_name_is_config_error() {
    let provider = |factory: &Factory| {
        vec![
            factory
                .for_each::<LavishEntity>()
                .penalize(SimpleScore::ONE)
                .as_constraint("Same"),
            factory
                .for_each::<LavishValue>()
                .penalize(SimpleScore::ONE)
                .as_constraint("Same"),
        ]
    };

    assert_config_error(try_session(provider, ConstraintWeightOverrides::new()));
}

#[test]
fn test_same_name_in_other_package_is_allowed() {
    let provider = |factory: &Factory| {
        vec![
            factory
                .for_each::<LavishEntity>()
                .penalize(SimpleScore::ONE)
                .as_constraint_in("a", "Same"),
            factory
                .for_each::<LavishValue>()
                .penalize(SimpleScore::ONE)
                .as_constraint_in("b", "Same"),
        ]
    };

    assert!(try_session(provider, ConstraintWeightOverrides::new()).is_ok());
}

#[test]
fn test_unknown_fact_class_is_config_error() {
    let provider = |factory: &Factory| {
        vec![factory
            .for_each::<String>()
            .penalize(SimpleScore::ONE)
            .as_constraint("Strings")]
    };

    assert_config_error(try_session(provider, ConstraintWeightOverrides::new()));
}

#[test]
fn test_override_of_unknown_constraint_is_config_error() {
    let overrides = ConstraintWeightOverrides::from_pairs([("Missing", SimpleScore::of(3))]);

    assert_config_error(try_session(assigned, overrides));
}

// ============================================================================
// Round trip
// ============================================================================

fn everything(factory: &Factory) -> Vec<crate::Constraint<SimpleScore>> {
    vec![
        factory
            .for_each::<LavishEntity>()
            .join(
                factory.for_each::<LavishValue>(),
                equal(|e: &LavishEntity| e.value.clone(), |v: &LavishValue| Some(v.code.clone())),
            )
            .join(
                factory.for_each::<LavishValueGroup>(),
                crate::stream::joiner::equal_bi(
                    |_: &LavishEntity, v: &LavishValue| v.value_group.clone(),
                    |g: &LavishValueGroup| g.code.clone(),
                ),
            )
            .penalize(SimpleScore::ONE)
            .as_constraint("Entity value group"),
        factory
            .for_each::<LavishEntity>()
            .if_exists(
                factory.for_each::<LavishEntityGroup>(),
                equal(|e: &LavishEntity| e.entity_group.clone(), |g: &LavishEntityGroup| {
                    g.code.clone()
                }),
            )
            .group_by(|e| e.value.clone(), count())
            .group_by(|_, n| *n, count())
            .penalize_with(SimpleScore::ONE, |_, n| *n as i64)
            .as_constraint("Regrouped"),
        factory
            .for_each::<LavishEntity>()
            .map(|e| e.entity_group.clone())
            .distinct()
            .penalize(SimpleScore::ONE)
            .as_constraint("Distinct groups"),
        factory
            .for_each::<LavishValue>()
            .flatten_last(|v| v.code.chars().collect::<Vec<char>>())
            .filter(|c| c.is_ascii_digit())
            .reward(SimpleScore::ONE)
            .as_constraint("Digits"),
        factory
            .for_each_unique_pair::<LavishEntity, ()>(cross())
            .if_not_exists(
                factory.for_each::<LavishValue>(),
                crate::stream::joiner::equal_bi(
                    |a: &LavishEntity, _: &LavishEntity| a.value.clone(),
                    |v: &LavishValue| Some(v.code.clone()),
                ),
            )
            .penalize(SimpleScore::ONE)
            .as_constraint("Dangling pairs"),
    ]
}

#[test]
fn test_round_trip_to_empty() {
    let solution = generate_solution(2, 5, 2, 9);
    let mut session = session(everything);

    let mut handles: Vec<(usize, TupleId)> = Vec::new();
    for g in &solution.value_groups {
        handles.push((VALUE_GROUP, session.insert_fact(VALUE_GROUP, Arc::new(g.clone())).unwrap().unwrap()));
    }
    for v in &solution.values {
        handles.push((VALUE, insert_value(&mut session, v.clone())));
    }
    for g in &solution.entity_groups {
        handles.push((
            ENTITY_GROUP,
            session.insert_fact(ENTITY_GROUP, Arc::new(g.clone())).unwrap().unwrap(),
        ));
    }
    for e in &solution.entities {
        handles.push((ENTITY, insert_entity(&mut session, e.clone())));
    }
    assert_ne!(session.score(), SimpleScore::ZERO);

    // Interleave classes so exists and join nodes see both sides drain.
    handles.sort_by_key(|(_, id)| id.index() % 3);
    for (ordinal, id) in handles {
        session.retract_fact(ordinal, id).unwrap();
    }

    assert_eq!(session.score(), SimpleScore::ZERO);
    assert_eq!(session.live_tuple_count(), 0);
    assert!(session.scorers().iter().all(|s| s.match_count() == 0));
}
