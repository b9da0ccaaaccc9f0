//! Hash-indexed equality joiners.

use super::{unit_key, Joiner};
use crate::network::Tuple;
use crate::stream::JoinKey;

/// Matches a uni left side with a right fact when `left(a) == right(b)`.
///
/// # Example
///
/// ```
/// use streamforge_scoring::stream::joiner::{equal, Joiner};
///
/// #[derive(Clone, Debug)]
/// struct Lesson { room_id: u32 }
/// #[derive(Clone, Debug)]
/// struct Room { id: u32 }
///
/// let in_room: Joiner<(Lesson,), Room, u32> = equal(|l: &Lesson| l.room_id, |r: &Room| r.id);
/// assert!(!in_room.has_filter());
/// ```
pub fn equal<A, B, K, Fa, Fb>(left: Fa, right: Fb) -> Joiner<(A,), B, K>
where
    A: 'static,
    B: 'static,
    K: JoinKey,
    Fa: Fn(&A) -> K + Send + Sync + 'static,
    Fb: Fn(&B) -> K + Send + Sync + 'static,
{
    Joiner::new(
        Box::new(move |t: &Tuple| left(t.get::<A>(0))),
        Box::new(move |t: &Tuple| right(t.get::<B>(0))),
        None,
    )
}

/// Self-join form of [`equal()`]: the same key on both sides.
pub fn equal_self<A, K, F>(key: F) -> Joiner<(A,), A, K>
where
    A: 'static,
    K: JoinKey,
    F: Fn(&A) -> K + Clone + Send + Sync + 'static,
{
    equal(key.clone(), key)
}

/// Matches a bi left side `(a, b)` with a right fact `c`.
pub fn equal_bi<A, B, C, K, Fl, Fr>(left: Fl, right: Fr) -> Joiner<(A, B), C, K>
where
    A: 'static,
    B: 'static,
    C: 'static,
    K: JoinKey,
    Fl: Fn(&A, &B) -> K + Send + Sync + 'static,
    Fr: Fn(&C) -> K + Send + Sync + 'static,
{
    Joiner::new(
        Box::new(move |t: &Tuple| left(t.get::<A>(0), t.get::<B>(1))),
        Box::new(move |t: &Tuple| right(t.get::<C>(0))),
        None,
    )
}

/// Matches a tri left side `(a, b, c)` with a right fact `d`.
pub fn equal_tri<A, B, C, D, K, Fl, Fr>(left: Fl, right: Fr) -> Joiner<(A, B, C), D, K>
where
    A: 'static,
    B: 'static,
    C: 'static,
    D: 'static,
    K: JoinKey,
    Fl: Fn(&A, &B, &C) -> K + Send + Sync + 'static,
    Fr: Fn(&D) -> K + Send + Sync + 'static,
{
    Joiner::new(
        Box::new(move |t: &Tuple| left(t.get::<A>(0), t.get::<B>(1), t.get::<C>(2))),
        Box::new(move |t: &Tuple| right(t.get::<D>(0))),
        None,
    )
}

/// Matches a quad left side with a right fact; only used by
/// `if_exists`/`if_not_exists` on quad streams.
pub fn equal_quad<A, B, C, D, E, K, Fl, Fr>(left: Fl, right: Fr) -> Joiner<(A, B, C, D), E, K>
where
    A: 'static,
    B: 'static,
    C: 'static,
    D: 'static,
    E: 'static,
    K: JoinKey,
    Fl: Fn(&A, &B, &C, &D) -> K + Send + Sync + 'static,
    Fr: Fn(&E) -> K + Send + Sync + 'static,
{
    Joiner::new(
        Box::new(move |t: &Tuple| {
            left(
                t.get::<A>(0),
                t.get::<B>(1),
                t.get::<C>(2),
                t.get::<D>(3),
            )
        }),
        Box::new(move |t: &Tuple| right(t.get::<E>(0))),
        None,
    )
}

/// Matches every left tuple with every right fact.
pub fn cross<L, R>() -> Joiner<L, R, ()> {
    Joiner::new(unit_key(), unit_key(), None)
}
