//! Shift scheduling fixtures with a hard/soft score.
//!
//! # Example
//!
//! ```
//! use streamforge_test::schedule::{descriptor, Schedule};
//!
//! let schedule = Schedule::sample();
//! assert_eq!(schedule.employees.len(), 3);
//! assert!(schedule.shifts.iter().any(|s| s.employee.is_none()));
//! assert!(descriptor().validate().is_ok());
//! ```

use streamforge_core::{HardSoftScore, PlanningSolution, SolutionDescriptor};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Employee {
    pub id: usize,
    pub name: String,
    pub unavailable_days: Vec<u32>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Shift {
    pub id: usize,
    pub day: u32,
    pub start: u32,
    pub end: u32,
    /// Id of the assigned employee, the planning variable.
    pub employee: Option<usize>,
}

impl Shift {
    pub fn new(id: usize, day: u32, start: u32, end: u32, employee: Option<usize>) -> Self {
        Self {
            id,
            day,
            start,
            end,
            employee,
        }
    }

    pub fn hours(&self) -> i64 {
        i64::from(self.end - self.start)
    }
}

#[derive(Clone, Debug)]
pub struct Schedule {
    pub employees: Vec<Employee>,
    pub shifts: Vec<Shift>,
    pub score: Option<HardSoftScore>,
}

impl Schedule {
    /// Three employees and six shifts over two days, with one overlap, one
    /// unavailable assignment and one unassigned shift.
    pub fn sample() -> Self {
        let employees = vec![
            Employee {
                id: 0,
                name: "Amy".to_string(),
                unavailable_days: vec![2],
            },
            Employee {
                id: 1,
                name: "Beth".to_string(),
                unavailable_days: vec![],
            },
            Employee {
                id: 2,
                name: "Carl".to_string(),
                unavailable_days: vec![1],
            },
        ];
        let shifts = vec![
            Shift::new(0, 1, 6, 14, Some(0)),
            Shift::new(1, 1, 12, 20, Some(0)),
            Shift::new(2, 1, 14, 22, Some(1)),
            Shift::new(3, 2, 6, 14, Some(0)),
            Shift::new(4, 2, 14, 22, Some(2)),
            Shift::new(5, 2, 22, 30, None),
        ];
        Self {
            employees,
            shifts,
            score: None,
        }
    }
}

impl PlanningSolution for Schedule {
    type Score = HardSoftScore;

    fn score(&self) -> Option<Self::Score> {
        self.score
    }

    fn set_score(&mut self, score: Option<Self::Score>) {
        self.score = score;
    }
}

fn shifts(s: &Schedule) -> &Vec<Shift> {
    &s.shifts
}

fn employees(s: &Schedule) -> &Vec<Employee> {
    &s.employees
}

/// Entity class 0 is `Shift`; problem-fact class 0 is `Employee`.
pub fn descriptor() -> SolutionDescriptor {
    SolutionDescriptor::new::<Schedule>("Schedule")
        .with_entity_class("Shift", shifts)
        .with_problem_fact_class("Employee", employees)
}
