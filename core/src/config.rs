//! Build and query configuration.
//!
//! The same configuration value must be used to build an index and to query
//! it, otherwise stop-word removal on the query side drifts from the index.
//! [`SchoolIndex`](crate::SchoolIndex) owns its configuration to rule that out.

use crate::error::ConfigError;
use crate::tokenizer::tokenize;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Identifier of a school category such as "charter". Ids are contiguous from 0.
pub type CategoryId = usize;

pub const DEFAULT_SCHOOL_TERM_WEIGHT: f64 = 5.0;
pub const DEFAULT_CITY_TERM_WEIGHT: f64 = 1.0;
/// Multiplier applied to city terms whose posting list is shorter than average.
pub const DEFAULT_PENALTY_FACTOR: f64 = 0.8;
pub const DEFAULT_TOP_N: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Terms dropped from the name index and from queries.
    pub stop_words: HashSet<String>,
    /// Keyword → category id. A query ending in one of these keywords is a
    /// category-in-location query.
    pub categories: HashMap<String, CategoryId>,
    pub school_term_weight: f64,
    pub city_term_weight: f64,
    pub penalty_factor: f64,
    pub top_n: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            stop_words: HashSet::from(["school".to_string()]),
            categories: HashMap::from([("charter".to_string(), 0)]),
            school_term_weight: DEFAULT_SCHOOL_TERM_WEIGHT,
            city_term_weight: DEFAULT_CITY_TERM_WEIGHT,
            penalty_factor: DEFAULT_PENALTY_FACTOR,
            top_n: DEFAULT_TOP_N,
        }
    }
}

impl SearchConfig {
    /// Read a JSON config file. Fields left out of the file keep their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut f = File::open(path).with_context(|| format!("opening config {}", path.display()))?;
        let mut buf = String::new();
        f.read_to_string(&mut buf)?;
        let config: SearchConfig =
            serde_json::from_str(&buf).with_context(|| format!("parsing config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration before it is used to build an index.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ids: BTreeSet<CategoryId> = self.categories.values().copied().collect();
        if let Some(missing) = (0..self.categories.len()).find(|id| !ids.contains(id)) {
            return Err(ConfigError::CategoryIdGap(missing));
        }

        // Sorted so the reported keyword does not depend on hash order.
        let mut keywords: Vec<&String> = self.categories.keys().collect();
        keywords.sort();
        for keyword in keywords {
            if tokenize(keyword) != [keyword.as_str()] {
                return Err(ConfigError::InvalidKeyword(keyword.clone()));
            }
            if self.stop_words.contains(keyword) {
                return Err(ConfigError::KeywordIsStopWord(keyword.clone()));
            }
        }

        for (name, value) in [
            ("school_term_weight", self.school_term_weight),
            ("city_term_weight", self.city_term_weight),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::InvalidWeight { name, value });
            }
        }
        if !(self.penalty_factor > 0.0 && self.penalty_factor <= 1.0) {
            return Err(ConfigError::InvalidPenalty(self.penalty_factor));
        }
        if self.top_n == 0 {
            return Err(ConfigError::ZeroTopN);
        }
        Ok(())
    }

    /// Category id for `term`, if it is a configured keyword.
    pub fn category_of(&self, term: &str) -> Option<CategoryId> {
        self.categories.get(term).copied()
    }

    pub fn is_stop_word(&self, term: &str) -> bool {
        self.stop_words.contains(term)
    }
}
