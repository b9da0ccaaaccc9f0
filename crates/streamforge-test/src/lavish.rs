//! The "lavish" domain: every kind of fact reference a constraint may need.
//!
//! Entities belong to an entity group and point at a value; values belong
//! to a value group. References are by code, so facts stay plain values.
//!
//! # Example
//!
//! ```
//! use streamforge_test::lavish::{descriptor, generate_solution};
//!
//! let solution = generate_solution(2, 5, 1, 7);
//! assert_eq!(solution.value_groups.len(), 2);
//! assert_eq!(solution.values.len(), 5);
//! assert_eq!(solution.entity_groups.len(), 1);
//! assert_eq!(solution.entities.len(), 7);
//! assert!(descriptor().validate().is_ok());
//! ```

use streamforge_core::{PlanningSolution, SimpleScore, SolutionDescriptor};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LavishValueGroup {
    pub code: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LavishValue {
    pub code: String,
    pub value_group: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LavishEntityGroup {
    pub code: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LavishEntity {
    pub code: String,
    pub entity_group: String,
    /// Code of the assigned value, the planning variable.
    pub value: Option<String>,
    pub integer_property: i64,
}

#[derive(Clone, Debug)]
pub struct LavishSolution {
    pub value_groups: Vec<LavishValueGroup>,
    pub values: Vec<LavishValue>,
    pub entity_groups: Vec<LavishEntityGroup>,
    pub entities: Vec<LavishEntity>,
    pub score: Option<SimpleScore>,
}

impl PlanningSolution for LavishSolution {
    type Score = SimpleScore;

    fn score(&self) -> Option<Self::Score> {
        self.score
    }

    fn set_score(&mut self, score: Option<Self::Score>) {
        self.score = score;
    }
}

fn entities(s: &LavishSolution) -> &Vec<LavishEntity> {
    &s.entities
}

fn value_groups(s: &LavishSolution) -> &Vec<LavishValueGroup> {
    &s.value_groups
}

fn values(s: &LavishSolution) -> &Vec<LavishValue> {
    &s.values
}

fn entity_groups(s: &LavishSolution) -> &Vec<LavishEntityGroup> {
    &s.entity_groups
}

/// Entity class 0 is `LavishEntity`; problem-fact classes 0, 1 and 2 are
/// value groups, values and entity groups.
pub fn descriptor() -> SolutionDescriptor {
    SolutionDescriptor::new::<LavishSolution>("LavishSolution")
        .with_entity_class("LavishEntity", entities)
        .with_problem_fact_class("LavishValueGroup", value_groups)
        .with_problem_fact_class("LavishValue", values)
        .with_problem_fact_class("LavishEntityGroup", entity_groups)
}

/// Generates a solution with values and entities assigned round robin:
/// value `i` is in value group `i % value_group_count`, entity `i` is in
/// entity group `i % entity_group_count` and has value `i % value_count`.
pub fn generate_solution(
    value_group_count: usize,
    value_count: usize,
    entity_group_count: usize,
    entity_count: usize,
) -> LavishSolution {
    let value_groups: Vec<_> = (0..value_group_count)
        .map(|i| LavishValueGroup {
            code: format!("Generated ValueGroup {}", i),
        })
        .collect();
    let values: Vec<_> = (0..value_count)
        .map(|i| LavishValue {
            code: format!("Generated Value {}", i),
            value_group: value_groups[i % value_group_count].code.clone(),
        })
        .collect();
    let entity_groups: Vec<_> = (0..entity_group_count)
        .map(|i| LavishEntityGroup {
            code: format!("Generated EntityGroup {}", i),
        })
        .collect();
    let entities = (0..entity_count)
        .map(|i| LavishEntity {
            code: format!("Generated Entity {}", i),
            entity_group: entity_groups[i % entity_group_count].code.clone(),
            value: Some(values[i % value_count].code.clone()),
            integer_property: i as i64,
        })
        .collect();
    LavishSolution {
        value_groups,
        values,
        entity_groups,
        entities,
        score: None,
    }
}
