//! Solution descriptor.
//!
//! Lists the fact classes a solution exposes to the scoring network. Entity
//! classes and problem-fact classes are indexed separately, in registration
//! order; the lifecycle hooks of a score director address a fact by
//! `(descriptor_index, fact_index)` within its kind.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;

use super::extractor::{FactExtractor, FactValue, TypedFactExtractor};
use crate::error::{Result, StreamForgeError};

/// Whether a fact class holds planning entities or problem facts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FactKind {
    Entity,
    ProblemFact,
}

/// Address of a registered fact class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FactClass {
    pub kind: FactKind,
    pub descriptor_index: usize,
}

impl FactClass {
    pub fn entity(descriptor_index: usize) -> Self {
        Self {
            kind: FactKind::Entity,
            descriptor_index,
        }
    }

    pub fn problem_fact(descriptor_index: usize) -> Self {
        Self {
            kind: FactKind::ProblemFact,
            descriptor_index,
        }
    }
}

/// Describes one fact class of a solution at runtime.
pub struct FactDescriptor {
    /// Name of the fact type, used in logs and error messages.
    pub type_name: &'static str,
    /// TypeId of the fact type.
    pub type_id: TypeId,
    /// Extractor for reading facts from a solution.
    pub extractor: Box<dyn FactExtractor>,
}

impl FactDescriptor {
    /// Creates a descriptor for the collection returned by `get_collection`.
    pub fn new<S, E>(type_name: &'static str, get_collection: fn(&S) -> &Vec<E>) -> Self
    where
        S: Send + Sync + 'static,
        E: Clone + Send + Sync + 'static,
    {
        Self {
            type_name,
            type_id: TypeId::of::<E>(),
            extractor: Box::new(TypedFactExtractor::new(get_collection)),
        }
    }
}

impl Clone for FactDescriptor {
    fn clone(&self) -> Self {
        Self {
            type_name: self.type_name,
            type_id: self.type_id,
            extractor: self.extractor.clone(),
        }
    }
}

impl fmt::Debug for FactDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FactDescriptor")
            .field("type_name", &self.type_name)
            .finish()
    }
}

/// Describes a planning solution at runtime.
///
/// # Example
///
/// ```
/// use std::any::TypeId;
/// use streamforge_core::{FactClass, SolutionDescriptor};
///
/// #[derive(Clone)]
/// struct Shift { employee: Option<usize> }
/// #[derive(Clone)]
/// struct Employee { name: String }
/// struct Schedule { shifts: Vec<Shift>, employees: Vec<Employee> }
///
/// fn shifts(s: &Schedule) -> &Vec<Shift> { &s.shifts }
/// fn employees(s: &Schedule) -> &Vec<Employee> { &s.employees }
///
/// let descriptor = SolutionDescriptor::new::<Schedule>("Schedule")
///     .with_entity_class("Shift", shifts)
///     .with_problem_fact_class("Employee", employees);
///
/// assert!(descriptor.validate().is_ok());
/// assert_eq!(descriptor.find_fact_class(TypeId::of::<Shift>()), Some(FactClass::entity(0)));
/// assert_eq!(descriptor.find_fact_class(TypeId::of::<Employee>()), Some(FactClass::problem_fact(0)));
/// ```
#[derive(Clone)]
pub struct SolutionDescriptor {
    /// Name of the solution type.
    pub type_name: &'static str,
    /// TypeId of the solution type.
    pub type_id: TypeId,
    /// Entity classes, indexed by entity descriptor index.
    pub entity_descriptors: Vec<FactDescriptor>,
    /// Problem-fact classes, indexed by problem-fact descriptor index.
    pub problem_fact_descriptors: Vec<FactDescriptor>,
    /// Index mapping fact TypeId to its class for O(1) lookup.
    fact_type_index: HashMap<TypeId, FactClass>,
    /// Type names registered more than once, reported by `validate`.
    duplicate_types: Vec<&'static str>,
}

impl SolutionDescriptor {
    /// Creates an empty descriptor for solution type `S`.
    pub fn new<S: 'static>(type_name: &'static str) -> Self {
        SolutionDescriptor {
            type_name,
            type_id: TypeId::of::<S>(),
            entity_descriptors: Vec::new(),
            problem_fact_descriptors: Vec::new(),
            fact_type_index: HashMap::new(),
            duplicate_types: Vec::new(),
        }
    }

    /// Adds an entity descriptor.
    pub fn with_entity(mut self, descriptor: FactDescriptor) -> Self {
        let class = FactClass::entity(self.entity_descriptors.len());
        self.index_type(&descriptor, class);
        self.entity_descriptors.push(descriptor);
        self
    }

    /// Adds a problem fact descriptor.
    pub fn with_problem_fact(mut self, descriptor: FactDescriptor) -> Self {
        let class = FactClass::problem_fact(self.problem_fact_descriptors.len());
        self.index_type(&descriptor, class);
        self.problem_fact_descriptors.push(descriptor);
        self
    }

    /// Registers an entity class read through `get_collection`.
    pub fn with_entity_class<S, E>(
        self,
        type_name: &'static str,
        get_collection: fn(&S) -> &Vec<E>,
    ) -> Self
    where
        S: Send + Sync + 'static,
        E: Clone + Send + Sync + 'static,
    {
        self.with_entity(FactDescriptor::new(type_name, get_collection))
    }

    /// Registers a problem-fact class read through `get_collection`.
    pub fn with_problem_fact_class<S, E>(
        self,
        type_name: &'static str,
        get_collection: fn(&S) -> &Vec<E>,
    ) -> Self
    where
        S: Send + Sync + 'static,
        E: Clone + Send + Sync + 'static,
    {
        self.with_problem_fact(FactDescriptor::new(type_name, get_collection))
    }

    fn index_type(&mut self, descriptor: &FactDescriptor, class: FactClass) {
        if self.fact_type_index.contains_key(&descriptor.type_id) {
            self.duplicate_types.push(descriptor.type_name);
        } else {
            self.fact_type_index.insert(descriptor.type_id, class);
        }
    }

    /// Checks that every fact type is registered once.
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = self.duplicate_types.first() {
            return Err(StreamForgeError::Config(format!(
                "fact type {} is registered more than once in solution {}",
                name, self.type_name
            )));
        }
        Ok(())
    }

    /// Finds the class of a fact type (O(1) lookup).
    pub fn find_fact_class(&self, type_id: TypeId) -> Option<FactClass> {
        self.fact_type_index.get(&type_id).copied()
    }

    /// Returns the descriptor of a class, if it exists.
    pub fn fact_descriptor(&self, class: FactClass) -> Option<&FactDescriptor> {
        match class.kind {
            FactKind::Entity => self.entity_descriptors.get(class.descriptor_index),
            FactKind::ProblemFact => self.problem_fact_descriptors.get(class.descriptor_index),
        }
    }

    /// Returns every class, entities first, each kind in registration order.
    pub fn fact_classes(&self) -> Vec<FactClass> {
        (0..self.entity_descriptors.len())
            .map(FactClass::entity)
            .chain((0..self.problem_fact_descriptors.len()).map(FactClass::problem_fact))
            .collect()
    }

    /// Returns the position of `class` in [`fact_classes`](Self::fact_classes).
    pub fn class_ordinal(&self, class: FactClass) -> usize {
        match class.kind {
            FactKind::Entity => class.descriptor_index,
            FactKind::ProblemFact => self.entity_descriptors.len() + class.descriptor_index,
        }
    }

    /// Returns the total number of registered classes.
    pub fn class_count(&self) -> usize {
        self.entity_descriptors.len() + self.problem_fact_descriptors.len()
    }

    /// Returns the number of facts of `class` in `solution`.
    pub fn fact_count(&self, class: FactClass, solution: &dyn Any) -> Option<usize> {
        self.fact_descriptor(class)?.extractor.count(solution)
    }

    /// Clones one fact of `class` out of `solution`.
    pub fn clone_fact(
        &self,
        class: FactClass,
        solution: &dyn Any,
        index: usize,
    ) -> Option<FactValue> {
        self.fact_descriptor(class)?
            .extractor
            .clone_fact(solution, index)
    }
}

impl fmt::Debug for SolutionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SolutionDescriptor")
            .field("type_name", &self.type_name)
            .field("entities", &self.entity_descriptors.len())
            .field("problem_facts", &self.problem_fact_descriptors.len())
            .finish()
    }
}
