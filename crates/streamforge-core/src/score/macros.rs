//! Declarative macros for the field-based score types.
//!
//! Every level of a score is an `i64`, so the struct, the arithmetic, the
//! ordering and the scaling impls are generated field by field.

/// Defines a score struct with one `i64` field per level and implements
/// [`Score`](crate::score::Score) for it.
///
/// Levels are listed highest priority first, each tagged with its
/// [`ScoreLevel`](crate::score::ScoreLevel). `feasible(s)` is the
/// feasibility test, with `s` bound to the score.
///
/// # Usage
/// ```ignore
/// level_score! {
///     /// Docs.
///     HardSoftScore { hard: Hard, soft: Soft } => of, feasible(s) => s.hard >= 0
/// }
/// ```
macro_rules! level_score {
    (
        $(#[$meta:meta])*
        $type:ident { $($field:ident : $kind:ident),+ } => $ctor:ident,
        feasible($s:ident) => $feasible:expr
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $type {
            $($field: i64),+
        }

        impl $type {
            /// The zero score.
            pub const ZERO: $type = $type { $($field: 0),+ };

            const LEVELS: &'static [$crate::score::ScoreLevel] =
                &[$($crate::score::ScoreLevel::$kind),+];

            /// Creates a score from its levels, highest priority first.
            #[inline]
            pub const fn $ctor($($field: i64),+) -> Self {
                $type { $($field),+ }
            }

            $(
                #[doc = concat!("Returns the ", stringify!($field), " level.")]
                #[inline]
                pub const fn $field(&self) -> i64 {
                    self.$field
                }
            )+
        }

        impl $crate::score::Score for $type {
            #[inline]
            fn is_feasible(&self) -> bool {
                let $s = self;
                $feasible
            }

            #[inline]
            fn zero() -> Self {
                $type::ZERO
            }

            #[inline]
            fn levels_count() -> usize {
                Self::LEVELS.len()
            }

            fn to_level_numbers(&self) -> Vec<i64> {
                vec![$(self.$field),+]
            }

            fn from_level_numbers(levels: &[i64]) -> Self {
                match levels {
                    [$($field),+] => $type::$ctor($(*$field),+),
                    _ => panic!(
                        "{} has {} levels, got {}",
                        stringify!($type),
                        Self::LEVELS.len(),
                        levels.len()
                    ),
                }
            }

            impl_score_scale!($type { $($field),+ } => $ctor);

            fn level_label(index: usize) -> $crate::score::ScoreLevel {
                match Self::LEVELS.get(index) {
                    Some(level) => *level,
                    None => panic!("{} has no level {}", stringify!($type), index),
                }
            }
        }

        impl_score_ops!($type { $($field),+ } => $ctor);

        impl std::fmt::Debug for $type {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                let levels: Vec<String> = vec![$(self.$field.to_string()),+];
                write!(f, "{}({})", stringify!($type), levels.join(", "))
            }
        }
    };
}

/// Generates `Ord`, `PartialOrd`, `Add`, `Sub` and `Neg` for a field-based score type.
///
/// Fields are listed highest priority first; the ordering is lexicographic
/// over that list. The constructor must accept fields in the same order.
///
/// # Usage
/// ```ignore
/// impl_score_ops!(HardSoftScore { hard, soft } => of);
/// ```
macro_rules! impl_score_ops {
    ($type:ident { $($field:ident),+ } => $ctor:ident) => {
        impl Ord for $type {
            fn cmp(&self, other: &Self) -> std::cmp::Ordering {
                std::cmp::Ordering::Equal
                    $(.then_with(|| self.$field.cmp(&other.$field)))+
            }
        }

        impl PartialOrd for $type {
            fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
                Some(self.cmp(other))
            }
        }

        impl std::ops::Add for $type {
            type Output = Self;

            fn add(self, other: Self) -> Self {
                $type::$ctor( $(self.$field + other.$field),+ )
            }
        }

        impl std::ops::Sub for $type {
            type Output = Self;

            fn sub(self, other: Self) -> Self {
                $type::$ctor( $(self.$field - other.$field),+ )
            }
        }

        impl std::ops::Neg for $type {
            type Output = Self;

            fn neg(self) -> Self {
                $type::$ctor( $(-self.$field),+ )
            }
        }
    };
}

/// Generates `scale`, `multiply`, `divide` and `abs` for the `Score` trait impl.
///
/// Intended to be used *inside* an `impl Score for Type { ... }` block.
///
/// # Usage
/// ```ignore
/// impl Score for HardSoftScore {
///     // ...other methods...
///     impl_score_scale!(HardSoftScore { hard, soft } => of);
/// }
/// ```
macro_rules! impl_score_scale {
    ($type:ident { $($field:ident),+ } => $ctor:ident) => {
        fn scale(&self, factor: i64) -> Self {
            $type::$ctor( $( self.$field * factor ),+ )
        }

        fn multiply(&self, multiplicand: f64) -> Self {
            $type::$ctor( $( (self.$field as f64 * multiplicand).round() as i64 ),+ )
        }

        fn divide(&self, divisor: f64) -> Self {
            $type::$ctor( $( (self.$field as f64 / divisor).round() as i64 ),+ )
        }

        fn abs(&self) -> Self {
            $type::$ctor( $( self.$field.abs() ),+ )
        }
    };
}

/// Generates `ParseableScore` for scores using the `"Xsuffix/Ysuffix"` format.
///
/// # Usage
/// ```ignore
/// impl_score_parse!(HardSoftScore { hard => "hard", soft => "soft" } => of);
/// ```
macro_rules! impl_score_parse {
    ($type:ident { $($field:ident => $suffix:literal),+ } => $ctor:ident) => {
        impl $crate::score::traits::ParseableScore for $type {
            fn parse(s: &str) -> Result<Self, $crate::score::traits::ScoreParseError> {
                let s = s.trim();
                let mut parts = s.split('/');
                $(
                    let $field = {
                        let part = parts.next().map(str::trim).ok_or_else(|| {
                            $crate::score::traits::ScoreParseError {
                                message: format!(
                                    "Invalid {} format '{}': missing '{}' part",
                                    stringify!($type), s, $suffix
                                ),
                            }
                        })?;
                        let num_str = part.strip_suffix($suffix).ok_or_else(|| {
                            $crate::score::traits::ScoreParseError {
                                message: format!(
                                    "{} part '{}' must end with '{}'",
                                    stringify!($field), part, $suffix
                                ),
                            }
                        })?;
                        num_str.parse::<i64>().map_err(|e| {
                            $crate::score::traits::ScoreParseError {
                                message: format!("Invalid {} score '{}': {}", $suffix, num_str, e),
                            }
                        })?
                    };
                )+
                if parts.next().is_some() {
                    return Err($crate::score::traits::ScoreParseError {
                        message: format!("Invalid {} format '{}': too many parts", stringify!($type), s),
                    });
                }
                Ok($type::$ctor( $($field),+ ))
            }

            fn to_string_repr(&self) -> String {
                let parts: Vec<String> = vec![ $(format!("{}{}", self.$field, $suffix)),+ ];
                parts.join("/")
            }
        }

        impl std::fmt::Display for $type {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&$crate::score::traits::ParseableScore::to_string_repr(self))
            }
        }
    };
}
