// Runtime constraint weight configuration.
//
// Overrides are keyed by the constraint's full name and replace the weight
// given in the constraint definition when the network is built.

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

use streamforge_config::ScoreDirectorConfig;
use streamforge_core::{ConstraintRef, ParseableScore, Result, Score, StreamForgeError};

// Holds runtime overrides for constraint weights.
//
// A weight of zero disables a constraint: its scorer is left unconnected and
// the nodes feeding only that constraint are pruned.
#[derive(Clone, PartialEq, Eq)]
pub struct ConstraintWeightOverrides<Sc: Score> {
    weights: HashMap<String, Sc>,
}

impl<Sc: Score> Debug for ConstraintWeightOverrides<Sc> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConstraintWeightOverrides")
            .field("count", &self.weights.len())
            .finish()
    }
}

impl<Sc: Score> Default for ConstraintWeightOverrides<Sc> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Sc: Score> ConstraintWeightOverrides<Sc> {
    pub fn new() -> Self {
        Self {
            weights: HashMap::new(),
        }
    }

    // Creates overrides from (full name, weight) pairs.
    pub fn from_pairs<I, N>(iter: I) -> Self
    where
        I: IntoIterator<Item = (N, Sc)>,
        N: Into<String>,
    {
        let weights = iter.into_iter().map(|(n, w)| (n.into(), w)).collect();
        Self { weights }
    }

    pub fn put<N: Into<String>>(&mut self, name: N, weight: Sc) {
        self.weights.insert(name.into(), weight);
    }

    pub fn remove(&mut self, name: &str) -> Option<Sc> {
        self.weights.remove(name)
    }

    // Gets the overridden weight, or returns the default if not overridden.
    pub fn get_or_default(&self, name: &str, default: Sc) -> Sc {
        self.weights.get(name).copied().unwrap_or(default)
    }

    pub fn get(&self, name: &str) -> Option<&Sc> {
        self.weights.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.weights.contains_key(name)
    }

    // Names that do not belong to any of the given constraints.
    pub(crate) fn unknown_names<'a>(&'a self, constraints: &[ConstraintRef]) -> Vec<&'a str> {
        let mut unknown: Vec<&str> = self
            .weights
            .keys()
            .filter(|name| !constraints.iter().any(|c| &c.full_name() == *name))
            .map(String::as_str)
            .collect();
        unknown.sort_unstable();
        unknown
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn clear(&mut self) {
        self.weights.clear();
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }
}

impl<Sc: Score + ParseableScore> ConstraintWeightOverrides<Sc> {
    // Parses the `constraint_weights` table of a director configuration.
    pub fn from_config(config: &ScoreDirectorConfig) -> Result<Self> {
        let mut overrides = Self::new();
        for (name, text) in &config.constraint_weights {
            let weight = Sc::parse(text).map_err(|e| {
                StreamForgeError::Config(format!(
                    "invalid weight {:?} for constraint {}: {}",
                    text, name, e
                ))
            })?;
            overrides.put(name.clone(), weight);
        }
        Ok(overrides)
    }
}

// Source of constraint weights consulted while building a network.
pub trait WeightProvider<Sc: Score>: Send + Sync {
    // Gets the weight for a constraint by full name.
    fn weight(&self, name: &str) -> Option<Sc>;

    fn weight_or_default(&self, name: &str, default: Sc) -> Sc {
        self.weight(name).unwrap_or(default)
    }
}

impl<Sc: Score> WeightProvider<Sc> for ConstraintWeightOverrides<Sc> {
    fn weight(&self, name: &str) -> Option<Sc> {
        self.get(name).copied()
    }
}

impl<Sc: Score> WeightProvider<Sc> for Arc<ConstraintWeightOverrides<Sc>> {
    fn weight(&self, name: &str) -> Option<Sc> {
        self.get(name).copied()
    }
}
