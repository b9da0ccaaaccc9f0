//! Single-level score.

use std::fmt;

use super::traits::{ParseableScore, ScoreParseError};

level_score! {
    /// A score with one integer level, for problems without hard constraints.
    ///
    /// # Examples
    ///
    /// ```
    /// use streamforge_core::{Score, SimpleScore};
    ///
    /// let total = SimpleScore::ZERO + SimpleScore::ONE.scale(-7);
    ///
    /// assert_eq!(total, SimpleScore::of(-7));
    /// assert!(total < SimpleScore::of(-3));
    /// assert!(!total.is_feasible());
    /// ```
    SimpleScore { score: Soft } => of,
    feasible(s) => s.score >= 0
}

impl SimpleScore {
    /// Weight of one unit.
    pub const ONE: SimpleScore = SimpleScore::of(1);
}

impl fmt::Display for SimpleScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.score)
    }
}

// Accepts "42" and the legacy "42init" form.
impl ParseableScore for SimpleScore {
    fn parse(s: &str) -> Result<Self, ScoreParseError> {
        let text = s.trim();
        let digits = text.strip_suffix("init").unwrap_or(text);
        match digits.parse::<i64>() {
            Ok(score) => Ok(SimpleScore::of(score)),
            Err(e) => Err(ScoreParseError {
                message: format!("Invalid SimpleScore '{}': {}", text, e),
            }),
        }
    }

    fn to_string_repr(&self) -> String {
        self.to_string()
    }
}

impl From<i64> for SimpleScore {
    fn from(score: i64) -> Self {
        SimpleScore::of(score)
    }
}
