//! Collectors for grouping and aggregating tuples.
//!
//! Every collector implements the [`Collector`] protocol: `supply` a fresh
//! container, `accumulate` an input and get back its retractor, `retract`
//! with that retractor, `finish` into a result. Multi-arity streams feed
//! collectors with the tuple elements as a Rust tuple, e.g. `&(A, B)`.

mod collection;
mod compose;
mod conditional;
mod count;
mod map;
mod min_max;
mod sum;
mod traits;


pub use collection::{
    to_list, to_set, to_sorted_set, SequencedValues, ToListCollector, ToSetCollector,
    ToSortedSetCollector,
};
pub use compose::{compose2, compose3, compose4, Compose2, Compose3, Compose4};
pub use conditional::{conditionally, ConditionalCollector};
pub use count::{count, count_distinct, CountCollector, CountDistinctCollector};
pub use map::{
    to_map, to_map_merged, to_sorted_map, SequencedMap, ToMapCollector, ToMergedMapCollector,
    ToSortedMapCollector,
};
pub use min_max::{max, max_by, min, min_by, ExtremumCollector};
pub use sum::{average, sum, AverageCollector, SumCollector};
pub use traits::Collector;

pub(crate) use count::Presence;
