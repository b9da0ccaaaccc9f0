// Joiners: matching conditions between a left tuple and a right fact.
//
// A joiner carries an equality key for each side, used to hash-index both
// inputs of a join or exists node, plus an optional filter checked on every
// pair that shares a key. Constructors are named by the arity of the left
// side: `equal` for a uni left, `equal_bi` for a bi left, and so on. The
// right side is always a uni stream.

mod comparison;
mod equal;
mod filtering;
mod overlapping;

#[cfg(test)]
mod tests;

use std::marker::PhantomData;

use crate::network::{PairPredicate, Tuple, TupleMapping};
use crate::stream::JoinKey;

pub use comparison::{
    greater_than, greater_than_bi, greater_than_or_equal, greater_than_or_equal_bi,
    greater_than_or_equal_tri, greater_than_tri, less_than, less_than_bi, less_than_or_equal,
    less_than_or_equal_bi, less_than_or_equal_tri, less_than_tri,
};
pub use equal::{cross, equal, equal_bi, equal_quad, equal_self, equal_tri};
pub use filtering::{filtering, filtering_bi, filtering_quad, filtering_tri};
pub use overlapping::{overlapping, overlapping_bi, overlapping_tri};

// Matching condition between left tuples of shape `L` and right facts of
// type `R`, indexed on keys of type `K`.
//
// `L` is the Rust tuple of the left element types: `(Lesson,)` for a uni
// left side, `(Lesson, Room)` for a bi one. A joiner built for one left
// arity therefore never type-checks against a stream of another.
pub struct Joiner<L, R, K> {
    pub(crate) left_key: TupleMapping<K>,
    pub(crate) right_key: TupleMapping<K>,
    pub(crate) filter: Option<PairPredicate>,
    _phantom: PhantomData<fn(&L, &R)>,
}

impl<L, R, K: JoinKey> Joiner<L, R, K> {
    pub(crate) fn new(
        left_key: TupleMapping<K>,
        right_key: TupleMapping<K>,
        filter: Option<PairPredicate>,
    ) -> Self {
        Self {
            left_key,
            right_key,
            filter,
            _phantom: PhantomData,
        }
    }

    // Combines two joiners: pairs must share both keys and pass both filters.
    pub fn and<K2: JoinKey>(self, other: Joiner<L, R, K2>) -> Joiner<L, R, (K, K2)> {
        let (left_a, left_b) = (self.left_key, other.left_key);
        let (right_a, right_b) = (self.right_key, other.right_key);
        let filter: Option<PairPredicate> = match (self.filter, other.filter) {
            (Some(a), Some(b)) => Some(Box::new(move |l: &Tuple, r: &Tuple| a(l, r) && b(l, r))),
            (a, None) => a,
            (None, b) => b,
        };
        Joiner::new(
            Box::new(move |t: &Tuple| (left_a(t), left_b(t))),
            Box::new(move |t: &Tuple| (right_a(t), right_b(t))),
            filter,
        )
    }

    // Whether pairs sharing a key are also checked by a filter.
    pub fn has_filter(&self) -> bool {
        self.filter.is_some()
    }
}

impl<L, R, K> std::fmt::Debug for Joiner<L, R, K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Joiner")
            .field("filtered", &self.filter.is_some())
            .finish()
    }
}

// Unit key shared by every tuple, for joiners that only filter.
pub(crate) fn unit_key() -> TupleMapping<()> {
    Box::new(|_: &Tuple| ())
}
