//! Tests for score types.

use super::*;

mod simple_score {
    use super::*;

    #[test]
    fn test_feasibility() {
        assert!(SimpleScore::of(0).is_feasible());
        assert!(SimpleScore::of(10).is_feasible());
        assert!(!SimpleScore::of(-1).is_feasible());
    }

    #[test]
    fn test_arithmetic_round_trip() {
        let base = SimpleScore::of(-7);
        let delta = SimpleScore::of(-3);
        assert_eq!(base + delta - delta, base);
        assert_eq!(-base, SimpleScore::of(7));
    }

    #[test]
    fn test_scale_is_exact() {
        assert_eq!(SimpleScore::ONE.scale(-10), SimpleScore::of(-10));
        assert_eq!(SimpleScore::of(i64::MAX / 2).scale(2), SimpleScore::of(i64::MAX - 1));
    }

    #[test]
    fn test_parse() {
        assert_eq!(SimpleScore::parse("42").unwrap(), SimpleScore::of(42));
        assert_eq!(SimpleScore::parse("-10").unwrap(), SimpleScore::of(-10));
        assert_eq!(SimpleScore::parse("0init").unwrap(), SimpleScore::ZERO);
        assert!(SimpleScore::parse("abc").is_err());
    }
}

mod hard_soft_score {
    use super::*;
    use std::cmp::Ordering;

    #[test]
    fn test_comparison() {
        let infeasible = HardSoftScore::of(-1, 0);
        let feasible = HardSoftScore::of(0, -1000);
        assert!(feasible > infeasible);
        assert!(feasible.is_better_than(&infeasible));
        assert!(infeasible.is_worse_than(&feasible));
        assert_eq!(
            HardSoftScore::of(0, -50).compare(&HardSoftScore::of(0, -100)),
            Ordering::Greater
        );
    }

    #[test]
    fn test_levels() {
        let score = HardSoftScore::of(-2, -100);
        assert_eq!(score.to_level_numbers(), vec![-2, -100]);
        assert_eq!(HardSoftScore::from_level_numbers(&[-2, -100]), score);
        assert_eq!(HardSoftScore::level_label(0), ScoreLevel::Hard);
        assert_eq!(HardSoftScore::level_label(1), ScoreLevel::Soft);
        assert!(HardSoftScore::ONE_HARD.has_hard_component());
        assert!(!HardSoftScore::ONE_SOFT.has_hard_component());
    }

    #[test]
    fn test_parse_and_display() {
        let score = HardSoftScore::parse("-1hard/-20soft").unwrap();
        assert_eq!(score, HardSoftScore::of(-1, -20));
        assert_eq!(score.to_string(), "-1hard/-20soft");
        assert!(HardSoftScore::parse("-1hard").is_err());
        assert!(HardSoftScore::parse("-1hard/2soft/3soft").is_err());
        assert!(HardSoftScore::parse("-1/2soft").is_err());
    }

    #[test]
    fn test_scale_multiply_divide() {
        let score = HardSoftScore::of(2, -3);
        assert_eq!(score.scale(3), HardSoftScore::of(6, -9));
        assert_eq!(score.multiply(1.5), HardSoftScore::of(3, -5));
        assert_eq!(HardSoftScore::of(10, -10).divide(4.0), HardSoftScore::of(3, -3));
        assert_eq!(score.abs(), HardSoftScore::of(2, 3));
    }
}
