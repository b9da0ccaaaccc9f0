//! Comparison joiners for less than / greater than matching.
//!
//! These are filters on the pairs of a join; they do not index. The plain
//! constructors take a uni left side; the `_bi` and `_tri` forms read the
//! left value from every element of a wider tuple.

use std::cmp::Ordering;

use super::{unit_key, Joiner};
use crate::network::Tuple;

fn compare<L, R, V, Fl, Fr>(left: Fl, right: Fr, accept: fn(Ordering) -> bool) -> Joiner<L, R, ()>
where
    V: Ord,
    Fl: Fn(&Tuple) -> V + Send + Sync + 'static,
    Fr: Fn(&Tuple) -> V + Send + Sync + 'static,
{
    Joiner::new(
        unit_key(),
        unit_key(),
        Some(Box::new(move |l: &Tuple, r: &Tuple| accept(left(l).cmp(&right(r))))),
    )
}

macro_rules! comparison_joiner {
    ($(#[$doc:meta])* $name:ident, $accept:path, [$($L:ident : $idx:tt),+]) => {
        $(#[$doc])*
        pub fn $name<$($L,)+ R, V, Fl, Fr>(left: Fl, right: Fr) -> Joiner<($($L,)+), R, ()>
        where
            $($L: 'static,)+
            R: 'static,
            V: Ord,
            Fl: Fn($(&$L),+) -> V + Send + Sync + 'static,
            Fr: Fn(&R) -> V + Send + Sync + 'static,
        {
            compare(
                move |t: &Tuple| left($(t.get::<$L>($idx)),+),
                move |t: &Tuple| right(t.get::<R>(0)),
                $accept,
            )
        }
    };
}

comparison_joiner!(
    /// Matches when `left(a) < right(b)`.
    ///
    /// # Example
    ///
    /// ```
    /// use streamforge_scoring::stream::joiner::{equal, less_than, Joiner};
    ///
    /// #[derive(Clone, Debug)]
    /// struct Task { worker: u32, start: i64, end: i64 }
    ///
    /// // Same worker, first task ends before the second one starts.
    /// let sequential: Joiner<(Task,), Task, (u32, ())> = equal(|t: &Task| t.worker, |t: &Task| t.worker)
    ///     .and(less_than(|t: &Task| t.end, |t: &Task| t.start));
    /// assert!(sequential.has_filter());
    /// ```
    less_than, Ordering::is_lt, [A: 0]
);
comparison_joiner!(
    /// Matches when `left(a, b) < right(c)`.
    less_than_bi, Ordering::is_lt, [A: 0, B: 1]
);
comparison_joiner!(
    less_than_tri, Ordering::is_lt, [A: 0, B: 1, C: 2]
);

comparison_joiner!(
    /// Matches when `left(a) <= right(b)`.
    less_than_or_equal, Ordering::is_le, [A: 0]
);
comparison_joiner!(less_than_or_equal_bi, Ordering::is_le, [A: 0, B: 1]);
comparison_joiner!(less_than_or_equal_tri, Ordering::is_le, [A: 0, B: 1, C: 2]);

comparison_joiner!(
    /// Matches when `left(a) > right(b)`.
    greater_than, Ordering::is_gt, [A: 0]
);
comparison_joiner!(greater_than_bi, Ordering::is_gt, [A: 0, B: 1]);
comparison_joiner!(greater_than_tri, Ordering::is_gt, [A: 0, B: 1, C: 2]);

comparison_joiner!(
    /// Matches when `left(a) >= right(b)`.
    greater_than_or_equal, Ordering::is_ge, [A: 0]
);
comparison_joiner!(greater_than_or_equal_bi, Ordering::is_ge, [A: 0, B: 1]);
comparison_joiner!(greater_than_or_equal_tri, Ordering::is_ge, [A: 0, B: 1, C: 2]);
