//! Filtering joiners: arbitrary pair predicates, checked after key matching.

use super::{unit_key, Joiner};
use crate::network::Tuple;

/// Matches a uni left side with a right fact when `predicate(a, b)` holds.
///
/// Filtering joiners have no key; combine them with an equality joiner
/// through [`Joiner::and`] to keep the join indexed.
pub fn filtering<A, B, P>(predicate: P) -> Joiner<(A,), B, ()>
where
    A: 'static,
    B: 'static,
    P: Fn(&A, &B) -> bool + Send + Sync + 'static,
{
    Joiner::new(
        unit_key(),
        unit_key(),
        Some(Box::new(move |l: &Tuple, r: &Tuple| {
            predicate(l.get::<A>(0), r.get::<B>(0))
        })),
    )
}

/// Bi left side `(a, b)`, right fact `c`.
pub fn filtering_bi<A, B, C, P>(predicate: P) -> Joiner<(A, B), C, ()>
where
    A: 'static,
    B: 'static,
    C: 'static,
    P: Fn(&A, &B, &C) -> bool + Send + Sync + 'static,
{
    Joiner::new(
        unit_key(),
        unit_key(),
        Some(Box::new(move |l: &Tuple, r: &Tuple| {
            predicate(l.get::<A>(0), l.get::<B>(1), r.get::<C>(0))
        })),
    )
}

/// Tri left side `(a, b, c)`, right fact `d`.
pub fn filtering_tri<A, B, C, D, P>(predicate: P) -> Joiner<(A, B, C), D, ()>
where
    A: 'static,
    B: 'static,
    C: 'static,
    D: 'static,
    P: Fn(&A, &B, &C, &D) -> bool + Send + Sync + 'static,
{
    Joiner::new(
        unit_key(),
        unit_key(),
        Some(Box::new(move |l: &Tuple, r: &Tuple| {
            predicate(l.get::<A>(0), l.get::<B>(1), l.get::<C>(2), r.get::<D>(0))
        })),
    )
}

/// Quad left side `(a, b, c, d)`, right fact `e`.
pub fn filtering_quad<A, B, C, D, E, P>(predicate: P) -> Joiner<(A, B, C, D), E, ()>
where
    A: 'static,
    B: 'static,
    C: 'static,
    D: 'static,
    E: 'static,
    P: Fn(&A, &B, &C, &D, &E) -> bool + Send + Sync + 'static,
{
    Joiner::new(
        unit_key(),
        unit_key(),
        Some(Box::new(move |l: &Tuple, r: &Tuple| {
            predicate(
                l.get::<A>(0),
                l.get::<B>(1),
                l.get::<C>(2),
                l.get::<D>(3),
                r.get::<E>(0),
            )
        })),
    )
}
