//! Overlapping joiner for interval overlap detection.

use super::{unit_key, Joiner};
use crate::network::Tuple;

macro_rules! overlapping_joiner {
    ($(#[$doc:meta])* $name:ident, [$($L:ident : $idx:tt),+]) => {
        $(#[$doc])*
        pub fn $name<$($L,)+ R, V, Fsl, Fel, Fsr, Fer>(
            start_left: Fsl,
            end_left: Fel,
            start_right: Fsr,
            end_right: Fer,
        ) -> Joiner<($($L,)+), R, ()>
        where
            $($L: 'static,)+
            R: 'static,
            V: Ord,
            Fsl: Fn($(&$L),+) -> V + Send + Sync + 'static,
            Fel: Fn($(&$L),+) -> V + Send + Sync + 'static,
            Fsr: Fn(&R) -> V + Send + Sync + 'static,
            Fer: Fn(&R) -> V + Send + Sync + 'static,
        {
            Joiner::new(
                unit_key(),
                unit_key(),
                Some(Box::new(move |l: &Tuple, r: &Tuple| {
                    let right = r.get::<R>(0);
                    start_left($(l.get::<$L>($idx)),+) < end_right(right)
                        && start_right(right) < end_left($(l.get::<$L>($idx)),+)
                })),
            )
        }
    };
}

overlapping_joiner!(
    /// Matches when the half-open intervals `[start_a, end_a)` and
    /// `[start_b, end_b)` overlap, i.e. `start_a < end_b && start_b < end_a`.
    ///
    /// Touching intervals do not overlap.
    overlapping, [A: 0]
);
overlapping_joiner!(
    /// [`overlapping()`] with the left interval read from a pair.
    overlapping_bi, [A: 0, B: 1]
);
overlapping_joiner!(
    /// [`overlapping()`] with the left interval read from a triple.
    overlapping_tri, [A: 0, B: 1, C: 2]
);
