//! Type-erased access to the fact collections of a solution.

use std::any::{Any, TypeId};
use std::fmt::Debug;
use std::sync::Arc;

/// A fact as seen by the scoring network: a shared, type-erased clone of the
/// domain object taken when the fact was inserted or last updated.
pub type FactValue = Arc<dyn Any + Send + Sync>;

/// Trait for extracting the facts of one class from a planning solution.
pub trait FactExtractor: Send + Sync {
    /// Returns the number of facts in the collection.
    fn count(&self, solution: &dyn Any) -> Option<usize>;

    /// Gets a reference to a fact by index.
    fn get<'a>(&self, solution: &'a dyn Any, index: usize) -> Option<&'a dyn Any>;

    /// Clones a fact into a shared value for insertion into the scoring network.
    fn clone_fact(&self, solution: &dyn Any, index: usize) -> Option<FactValue>;

    /// Returns the TypeId of the fact type.
    fn fact_type_id(&self) -> TypeId;

    /// Clone this extractor.
    fn clone_box(&self) -> Box<dyn FactExtractor>;
}

impl Clone for Box<dyn FactExtractor> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// A concrete fact extractor for a specific solution and fact type.
///
/// # Example
///
/// ```
/// use streamforge_core::{FactExtractor, TypedFactExtractor};
///
/// #[derive(Clone)]
/// struct Room { capacity: u32 }
/// struct Timetable { rooms: Vec<Room> }
///
/// fn rooms(s: &Timetable) -> &Vec<Room> {
///     &s.rooms
/// }
///
/// let extractor = TypedFactExtractor::new(rooms);
/// let timetable = Timetable { rooms: vec![Room { capacity: 30 }] };
///
/// assert_eq!(extractor.count(&timetable), Some(1));
/// let room = extractor.clone_fact(&timetable, 0).unwrap();
/// assert_eq!(room.downcast_ref::<Room>().unwrap().capacity, 30);
/// ```
pub struct TypedFactExtractor<S, E> {
    get_collection: fn(&S) -> &Vec<E>,
}

impl<S, E> TypedFactExtractor<S, E>
where
    S: 'static,
    E: 'static,
{
    /// Creates a new typed fact extractor.
    pub fn new(get_collection: fn(&S) -> &Vec<E>) -> Self {
        Self { get_collection }
    }
}

impl<S, E> FactExtractor for TypedFactExtractor<S, E>
where
    S: Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    fn count(&self, solution: &dyn Any) -> Option<usize> {
        let solution = solution.downcast_ref::<S>()?;
        Some((self.get_collection)(solution).len())
    }

    fn get<'a>(&self, solution: &'a dyn Any, index: usize) -> Option<&'a dyn Any> {
        let solution = solution.downcast_ref::<S>()?;
        (self.get_collection)(solution)
            .get(index)
            .map(|e| e as &dyn Any)
    }

    fn clone_fact(&self, solution: &dyn Any, index: usize) -> Option<FactValue> {
        let solution = solution.downcast_ref::<S>()?;
        let fact = (self.get_collection)(solution).get(index)?;
        Some(Arc::new(fact.clone()) as FactValue)
    }

    fn fact_type_id(&self) -> TypeId {
        TypeId::of::<E>()
    }

    fn clone_box(&self) -> Box<dyn FactExtractor> {
        Box::new(Self {
            get_collection: self.get_collection,
        })
    }
}

impl<S, E> Debug for TypedFactExtractor<S, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypedFactExtractor")
            .field("fact_type", &std::any::type_name::<E>())
            .finish()
    }
}
