//! Tests for joiner keys and filters, evaluated on bare tuples.

use std::sync::Arc;

use smallvec::smallvec;

use super::*;
use crate::network::{Facts, TupleArena, TupleId};

#[derive(Clone, Debug, PartialEq)]
struct Shift {
    employee: u32,
    start: u32,
    end: u32,
}

#[derive(Clone, Debug, PartialEq)]
struct Employee {
    id: u32,
}

fn shift(employee: u32, start: u32, end: u32) -> Shift {
    Shift {
        employee,
        start,
        end,
    }
}

fn uni<T: Send + Sync + 'static>(arena: &mut TupleArena, value: T) -> TupleId {
    arena.create(smallvec![Arc::new(value) as streamforge_core::FactValue])
}

fn tuple_of(arena: &mut TupleArena, facts: Facts) -> TupleId {
    arena.create(facts)
}

fn accepts<L, R, K: JoinKey>(joiner: &Joiner<L, R, K>, arena: &TupleArena, l: TupleId, r: TupleId) -> bool {
    let left = arena.get(l).unwrap();
    let right = arena.get(r).unwrap();
    (joiner.left_key)(left) == (joiner.right_key)(right)
        && joiner.filter.as_ref().map_or(true, |f| f(left, right))
}

// ============================================================================
// Equality joiners
// ============================================================================

#[test]
fn test_equal_keys() {
    let mut arena = TupleArena::new();
    let s = uni(&mut arena, shift(1, 0, 8));
    let amy = uni(&mut arena, Employee { id: 1 });
    let beth = uni(&mut arena, Employee { id: 2 });

    let joiner = equal(|s: &Shift| s.employee, |e: &Employee| e.id);

    assert!(!joiner.has_filter());
    assert!(accepts(&joiner, &arena, s, amy));
    assert!(!accepts(&joiner, &arena, s, beth));
}

#[test]
fn test_equal_self_uses_one_key() {
    let mut arena = TupleArena::new();
    let a = uni(&mut arena, shift(1, 0, 8));
    let b = uni(&mut arena, shift(1, 8, 16));
    let c = uni(&mut arena, shift(2, 0, 8));

    let joiner = equal_self(|s: &Shift| s.employee);

    assert!(accepts(&joiner, &arena, a, b));
    assert!(!accepts(&joiner, &arena, a, c));
}

#[test]
fn test_equal_bi_reads_both_left_elements() {
    let mut arena = TupleArena::new();
    let pair = tuple_of(
        &mut arena,
        smallvec![
            Arc::new(shift(1, 0, 8)) as streamforge_core::FactValue,
            Arc::new(Employee { id: 3 }) as streamforge_core::FactValue
        ],
    );
    let right = uni(&mut arena, 4u32);

    let joiner = equal_bi(|s: &Shift, e: &Employee| s.employee + e.id, |n: &u32| *n);

    assert!(accepts(&joiner, &arena, pair, right));
}

#[test]
fn test_cross_accepts_everything() {
    let mut arena = TupleArena::new();
    let s = uni(&mut arena, shift(1, 0, 8));
    let e = uni(&mut arena, Employee { id: 9 });

    let joiner: Joiner<(Shift,), Employee, ()> = cross();

    assert!(!joiner.has_filter());
    assert!(accepts(&joiner, &arena, s, e));
}

// ============================================================================
// Filtering joiners
// ============================================================================

#[test]
fn test_comparison_joiners() {
    let mut arena = TupleArena::new();
    let early = uni(&mut arena, shift(1, 0, 8));
    let late = uni(&mut arena, shift(1, 8, 16));

    let lt = less_than(|s: &Shift| s.start, |s: &Shift| s.start);
    let le = less_than_or_equal(|s: &Shift| s.end, |s: &Shift| s.start);
    let gt = greater_than(|s: &Shift| s.start, |s: &Shift| s.start);
    let ge = greater_than_or_equal(|s: &Shift| s.start, |s: &Shift| s.start);

    assert!(lt.has_filter());
    assert!(accepts(&lt, &arena, early, late));
    assert!(!accepts(&lt, &arena, late, early));
    assert!(!accepts(&lt, &arena, early, early));

    assert!(accepts(&le, &arena, early, late));
    assert!(!accepts(&le, &arena, late, early));

    assert!(accepts(&gt, &arena, late, early));
    assert!(!accepts(&gt, &arena, early, early));

    assert!(accepts(&ge, &arena, early, early));
    assert!(!accepts(&ge, &arena, early, late));
}

#[test]
fn test_overlapping_is_half_open() {
    let mut arena = TupleArena::new();
    let morning = uni(&mut arena, shift(1, 6, 14));
    let midday = uni(&mut arena, shift(1, 12, 20));
    let evening = uni(&mut arena, shift(1, 14, 22));

    let joiner = overlapping(
        |s: &Shift| s.start,
        |s: &Shift| s.end,
        |s: &Shift| s.start,
        |s: &Shift| s.end,
    );

    assert!(accepts(&joiner, &arena, morning, midday));
    assert!(accepts(&joiner, &arena, midday, morning));
    assert!(!accepts(&joiner, &arena, morning, evening));
}

#[test]
fn test_filtering_predicate() {
    let mut arena = TupleArena::new();
    let s = uni(&mut arena, shift(1, 0, 8));
    let amy = uni(&mut arena, Employee { id: 1 });
    let beth = uni(&mut arena, Employee { id: 2 });

    let joiner = filtering(|s: &Shift, e: &Employee| s.employee != e.id);

    assert!(joiner.has_filter());
    assert!(!accepts(&joiner, &arena, s, amy));
    assert!(accepts(&joiner, &arena, s, beth));
}

#[test]
fn test_filtering_tri_reads_every_element() {
    let mut arena = TupleArena::new();
    let left = tuple_of(
        &mut arena,
        smallvec![
            Arc::new(1u32) as streamforge_core::FactValue,
            Arc::new(2u32) as streamforge_core::FactValue,
            Arc::new(3u32) as streamforge_core::FactValue
        ],
    );
    let six = uni(&mut arena, 6u32);
    let seven = uni(&mut arena, 7u32);

    let joiner = filtering_tri(|a: &u32, b: &u32, c: &u32, d: &u32| a + b + c == *d);

    assert!(accepts(&joiner, &arena, left, six));
    assert!(!accepts(&joiner, &arena, left, seven));
}

#[test]
fn test_comparison_on_a_pair_reads_both_elements() {
    let mut arena = TupleArena::new();
    let pair = tuple_of(
        &mut arena,
        smallvec![
            Arc::new(shift(1, 0, 8)) as streamforge_core::FactValue,
            Arc::new(Employee { id: 1 }) as streamforge_core::FactValue
        ],
    );
    let next = uni(&mut arena, shift(1, 8, 16));
    let clash = uni(&mut arena, shift(1, 4, 12));

    let joiner = less_than_or_equal_bi(|s: &Shift, _: &Employee| s.end, |o: &Shift| o.start);
    let swapped = greater_than_bi(|s: &Shift, e: &Employee| s.start + e.id, |o: &Shift| o.start);

    assert!(accepts(&joiner, &arena, pair, next));
    assert!(!accepts(&joiner, &arena, pair, clash));
    assert!(!accepts(&swapped, &arena, pair, clash));
}

#[test]
fn test_overlapping_on_a_triple() {
    let mut arena = TupleArena::new();
    let triple = tuple_of(
        &mut arena,
        smallvec![
            Arc::new(shift(1, 6, 14)) as streamforge_core::FactValue,
            Arc::new(Employee { id: 1 }) as streamforge_core::FactValue,
            Arc::new(shift(1, 14, 22)) as streamforge_core::FactValue
        ],
    );
    let night = uni(&mut arena, shift(2, 20, 28));
    let morning = uni(&mut arena, shift(2, 0, 6));

    // Interval spanned by both shifts of the triple: [6, 22).
    let joiner = overlapping_tri(
        |a: &Shift, _: &Employee, _: &Shift| a.start,
        |_: &Shift, _: &Employee, b: &Shift| b.end,
        |s: &Shift| s.start,
        |s: &Shift| s.end,
    );

    assert!(accepts(&joiner, &arena, triple, night));
    assert!(!accepts(&joiner, &arena, triple, morning));
}

// ============================================================================
// Combination
// ============================================================================

#[test]
fn test_and_combines_keys_and_filters() {
    let mut arena = TupleArena::new();
    let early = uni(&mut arena, shift(1, 0, 8));
    let late_same = uni(&mut arena, shift(1, 8, 16));
    let late_other = uni(&mut arena, shift(2, 8, 16));

    let joiner = equal_self(|s: &Shift| s.employee)
        .and(less_than(|s: &Shift| s.start, |s: &Shift| s.start));

    assert!(joiner.has_filter());
    assert!(accepts(&joiner, &arena, early, late_same));
    assert!(!accepts(&joiner, &arena, late_same, early));
    assert!(!accepts(&joiner, &arena, early, late_other));
}

#[test]
fn test_and_of_two_filters_requires_both() {
    let mut arena = TupleArena::new();
    let a = uni(&mut arena, shift(1, 0, 8));
    let b = uni(&mut arena, shift(2, 4, 12));
    let c = uni(&mut arena, shift(2, 10, 12));

    let joiner = overlapping(
        |s: &Shift| s.start,
        |s: &Shift| s.end,
        |s: &Shift| s.start,
        |s: &Shift| s.end,
    )
    .and(filtering(|l: &Shift, r: &Shift| l.employee != r.employee));

    assert!(accepts(&joiner, &arena, a, b));
    assert!(!accepts(&joiner, &arena, a, c));
    assert!(!accepts(&joiner, &arena, b, c));
}
