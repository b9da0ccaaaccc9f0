//! Tests for solution descriptors and fact extractors.

use std::any::TypeId;

use super::*;
use crate::error::StreamForgeError;

#[derive(Clone, Debug, PartialEq)]
struct Lesson {
    id: usize,
    room: Option<usize>,
}

#[derive(Clone, Debug, PartialEq)]
struct Room {
    id: usize,
}

#[derive(Clone, Debug)]
struct Timetable {
    lessons: Vec<Lesson>,
    rooms: Vec<Room>,
}

fn lessons(s: &Timetable) -> &Vec<Lesson> {
    &s.lessons
}

fn rooms(s: &Timetable) -> &Vec<Room> {
    &s.rooms
}

fn timetable() -> Timetable {
    Timetable {
        lessons: vec![
            Lesson { id: 0, room: None },
            Lesson {
                id: 1,
                room: Some(0),
            },
        ],
        rooms: vec![Room { id: 0 }],
    }
}

fn descriptor() -> SolutionDescriptor {
    SolutionDescriptor::new::<Timetable>("Timetable")
        .with_entity_class("Lesson", lessons)
        .with_problem_fact_class("Room", rooms)
}

#[test]
fn test_fact_class_lookup() {
    let descriptor = descriptor();
    assert_eq!(
        descriptor.find_fact_class(TypeId::of::<Lesson>()),
        Some(FactClass::entity(0))
    );
    assert_eq!(
        descriptor.find_fact_class(TypeId::of::<Room>()),
        Some(FactClass::problem_fact(0))
    );
    assert_eq!(descriptor.find_fact_class(TypeId::of::<String>()), None);
}

#[test]
fn test_class_ordinals_put_entities_first() {
    let descriptor = descriptor();
    assert_eq!(
        descriptor.fact_classes(),
        vec![FactClass::entity(0), FactClass::problem_fact(0)]
    );
    assert_eq!(descriptor.class_ordinal(FactClass::problem_fact(0)), 1);
    assert_eq!(descriptor.class_count(), 2);
}

#[test]
fn test_fact_count_and_clone() {
    let descriptor = descriptor();
    let solution = timetable();

    assert_eq!(descriptor.fact_count(FactClass::entity(0), &solution), Some(2));
    assert_eq!(
        descriptor.fact_count(FactClass::problem_fact(0), &solution),
        Some(1)
    );

    let fact = descriptor
        .clone_fact(FactClass::entity(0), &solution, 1)
        .unwrap();
    assert_eq!(
        fact.downcast_ref::<Lesson>(),
        Some(&Lesson {
            id: 1,
            room: Some(0)
        })
    );
    assert!(descriptor
        .clone_fact(FactClass::entity(0), &solution, 2)
        .is_none());
}

#[test]
fn test_extractor_rejects_wrong_solution_type() {
    let extractor = TypedFactExtractor::new(rooms);
    let not_a_timetable = 42_u32;
    assert_eq!(extractor.count(&not_a_timetable), None);
    assert!(extractor.get(&not_a_timetable, 0).is_none());
    assert_eq!(extractor.fact_type_id(), TypeId::of::<Room>());
}

#[test]
fn test_duplicate_registration_fails_validation() {
    let duplicated = SolutionDescriptor::new::<Timetable>("Timetable")
        .with_entity_class("Lesson", lessons)
        .with_problem_fact_class("LessonAgain", lessons);

    match duplicated.validate() {
        Err(StreamForgeError::Config(msg)) => assert!(msg.contains("LessonAgain")),
        other => panic!("expected config error, got {:?}", other),
    }
    assert!(descriptor().validate().is_ok());
}
