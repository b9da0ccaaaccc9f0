//! Two-level score: hard constraints before soft ones.

level_score! {
    /// A score whose hard level always outranks its soft level.
    ///
    /// Constraint weights are usually [`HardSoftScore::ONE_HARD`] or
    /// [`HardSoftScore::ONE_SOFT`], scaled by each match.
    ///
    /// ```
    /// use streamforge_core::{HardSoftScore, Score};
    ///
    /// let broken = HardSoftScore::ONE_HARD.scale(-1) + HardSoftScore::of_soft(-100);
    /// let feasible = HardSoftScore::of(0, -200);
    ///
    /// assert!(feasible > broken);
    /// assert_eq!(broken.to_string(), "-1hard/-100soft");
    /// ```
    HardSoftScore { hard: Hard, soft: Soft } => of,
    feasible(s) => s.hard >= 0
}

impl HardSoftScore {
    pub const ONE_HARD: HardSoftScore = HardSoftScore::of(1, 0);
    pub const ONE_SOFT: HardSoftScore = HardSoftScore::of(0, 1);

    #[inline]
    pub const fn of_hard(hard: i64) -> Self {
        HardSoftScore::of(hard, 0)
    }

    #[inline]
    pub const fn of_soft(soft: i64) -> Self {
        HardSoftScore::of(0, soft)
    }
}

impl_score_parse!(HardSoftScore { hard => "hard", soft => "soft" } => of);
