//! Tests for score analysis types.

use super::analysis::*;
use streamforge_core::{ConstraintRef, HardSoftScore, SimpleScore};

#[derive(Clone, Debug, PartialEq)]
struct Nurse {
    id: i32,
    name: String,
}

fn nurse(id: i32, name: &str) -> Nurse {
    Nurse {
        id,
        name: name.to_string(),
    }
}

fn penalty(constraint: &ConstraintRef, score: i64, entities: &[&Nurse]) -> DetailedConstraintMatch<SimpleScore> {
    DetailedConstraintMatch::new(
        constraint.clone(),
        SimpleScore::of(score),
        ConstraintJustification::new(entities.iter().map(|n| EntityRef::new(*n)).collect()),
    )
}

#[test]
fn test_entity_ref_creation() {
    let entity_ref = EntityRef::new(&nurse(1, "Ann"));

    assert!(entity_ref.type_name.contains("Nurse"));
    assert_eq!(entity_ref.short_type_name(), "Nurse");
    assert!(entity_ref.display.contains("Ann"));
    assert!(entity_ref.display.contains('1'));
}

#[test]
fn test_entity_ref_downcast() {
    let entity_ref = EntityRef::new(&nurse(42, "Bea"));

    let recovered: Option<&Nurse> = entity_ref.as_entity();
    assert_eq!(recovered.map(|n| n.id), Some(42));
    assert!(entity_ref.as_entity::<String>().is_none());
}

#[test]
fn test_entity_ref_equality_is_by_value() {
    let ref1 = EntityRef::new(&nurse(1, "Ann"));
    let ref2 = EntityRef::new(&nurse(1, "Ann"));
    let ref3 = EntityRef::new(&nurse(2, "Cid"));

    assert_eq!(ref1, ref2);
    assert_ne!(ref1, ref3);
}

#[test]
fn test_entity_ref_with_display() {
    let entity_ref = EntityRef::with_display(&nurse(3, "Dee"), "nurse #3".to_string());

    assert_eq!(entity_ref.display, "nurse #3");
    assert_eq!(entity_ref.as_entity::<Nurse>().map(|n| n.name.as_str()), Some("Dee"));
}

#[test]
fn test_constraint_justification() {
    let just = ConstraintJustification::new(vec![
        EntityRef::new(&nurse(1, "Ann")),
        EntityRef::new(&nurse(2, "Bea")),
    ]);

    assert_eq!(just.entities.len(), 2);
    assert!(just.description.contains("Ann"));
    assert!(just.description.contains("Bea"));
}

#[test]
fn test_empty_justification() {
    let just = ConstraintJustification::new(Vec::new());
    assert_eq!(just.description, "No entities");
}

#[test]
fn test_indictment_map() {
    let constraint = ConstraintRef::new("", "Overlap");
    let ann = nurse(1, "Ann");
    let bea = nurse(2, "Bea");

    let map = IndictmentMap::from_matches(vec![
        penalty(&constraint, -1, &[&ann, &bea]),
        penalty(&constraint, -2, &[&ann]),
    ]);

    assert_eq!(map.len(), 2);

    let ann_indictment = map.get_entity(&ann).unwrap();
    assert_eq!(ann_indictment.match_count(), 2);
    assert_eq!(ann_indictment.score, SimpleScore::of(-3));
    assert_eq!(ann_indictment.constraint_count(), 1);
    assert_eq!(ann_indictment.violated_constraints(), vec![&constraint]);

    let bea_indictment = map.get(&EntityRef::new(&bea)).unwrap();
    assert_eq!(bea_indictment.score, SimpleScore::of(-1));
}

#[test]
fn test_indictment_counts_repeated_fact_once_per_match() {
    let constraint = ConstraintRef::new("", "Self pair");
    let ann = nurse(1, "Ann");

    let map = IndictmentMap::from_matches(vec![penalty(&constraint, -4, &[&ann, &ann])]);

    let indictment = map.get_entity(&ann).unwrap();
    assert_eq!(indictment.match_count(), 1);
    assert_eq!(indictment.score, SimpleScore::of(-4));
}

#[test]
fn test_worst_entities_order() {
    let constraint = ConstraintRef::new("", "Fatigue");
    let ann = nurse(1, "Ann");
    let bea = nurse(2, "Bea");
    let cid = nurse(3, "Cid");

    let map = IndictmentMap::from_matches(vec![
        penalty(&constraint, -1, &[&ann]),
        penalty(&constraint, -5, &[&bea]),
        penalty(&constraint, -1, &[&cid]),
    ]);

    let worst: Vec<&str> = map
        .worst_entities()
        .iter()
        .filter_map(|e| e.as_entity::<Nurse>())
        .map(|n| n.name.as_str())
        .collect();
    assert_eq!(worst, vec!["Bea", "Ann", "Cid"]);
}

#[test]
fn test_score_explanation() {
    let constraint = ConstraintRef::new("ward", "Understaffed");
    let quiet = ConstraintRef::new("ward", "Quiet");
    let ann = nurse(1, "Ann");

    let explanation = ScoreExplanation::new(
        SimpleScore::of(-3),
        vec![
            ConstraintAnalysis::new(
                constraint.clone(),
                SimpleScore::of(3),
                SimpleScore::of(-3),
                vec![penalty(&constraint, -3, &[&ann])],
            ),
            ConstraintAnalysis::new(quiet, SimpleScore::of(1), SimpleScore::ZERO, vec![]),
        ],
    );

    assert_eq!(explanation.score, SimpleScore::of(-3));
    assert_eq!(explanation.constraint_analyses.len(), 2);
    assert_eq!(explanation.non_zero_constraints().len(), 1);
    assert_eq!(explanation.total_match_count(), 1);
    assert_eq!(explanation.all_matches().len(), 1);
    assert_eq!(
        explanation
            .constraint("ward/Understaffed")
            .map(|a| a.match_count()),
        Some(1)
    );
    assert!(explanation.constraint("Understaffed").is_none());
}

#[test]
fn test_analysis_is_hard() {
    let hard = ConstraintAnalysis::new(
        ConstraintRef::new("", "Hard"),
        HardSoftScore::ONE_HARD,
        HardSoftScore::of_hard(-2),
        vec![],
    );
    let soft = ConstraintAnalysis::new(
        ConstraintRef::new("", "Soft"),
        HardSoftScore::ONE_SOFT,
        HardSoftScore::of_soft(-2),
        vec![],
    );
    let simple = ConstraintAnalysis::new(
        ConstraintRef::new("", "Simple"),
        SimpleScore::ONE,
        SimpleScore::ZERO,
        vec![],
    );

    assert!(hard.is_hard);
    assert!(!soft.is_hard);
    assert!(!simple.is_hard);
    assert_eq!(hard.name(), "Hard");
}
