//! Additive term scoring.
//!
//! Every occurrence of a document in a posting list credits that document
//! once, so a term repeated inside a field counts repeatedly.

use crate::DocId;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Per-query accumulator of document scores.
///
/// Remembers the order in which documents were first credited; the ranker
/// relies on it to break ties.
#[derive(Debug, Default, Clone)]
pub struct ScoreBoard {
    order: Vec<DocId>,
    scores: HashMap<DocId, f64>,
}

impl ScoreBoard {
    pub fn new() -> Self {
        Self::default()
    }

    fn credit(&mut self, doc_id: DocId, amount: f64) {
        match self.scores.entry(doc_id) {
            Entry::Occupied(mut e) => *e.get_mut() += amount,
            Entry::Vacant(e) => {
                e.insert(amount);
                self.order.push(doc_id);
            }
        }
    }

    /// Credit `weight` for every occurrence across all posting lists.
    pub fn add_name_scores<L: AsRef<[DocId]>>(&mut self, lists: &[L], weight: f64) {
        for &doc_id in lists.iter().flat_map(|list| list.as_ref()) {
            self.credit(doc_id, weight);
        }
    }

    /// Credit city matches. Lists shorter than the average list length are
    /// credited `weight * penalty_factor` per occurrence, the rest `weight`.
    /// A document's first credit follows the same rule as later ones.
    pub fn add_city_scores<L: AsRef<[DocId]>>(&mut self, lists: &[L], weight: f64, penalty_factor: f64) {
        let avg = average_len(lists);
        for list in lists {
            let list = list.as_ref();
            let amount = if (list.len() as f64) < avg { weight * penalty_factor } else { weight };
            for &doc_id in list {
                self.credit(doc_id, amount);
            }
        }
    }

    pub fn score(&self, doc_id: DocId) -> Option<f64> {
        self.scores.get(&doc_id).copied()
    }

    /// Entries in first-credit order.
    pub fn entries(&self) -> impl Iterator<Item = (DocId, f64)> + '_ {
        self.order.iter().map(move |doc_id| (*doc_id, self.scores[doc_id]))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Mean length of the posting lists, 0.0 when there are none.
pub fn average_len<L: AsRef<[DocId]>>(lists: &[L]) -> f64 {
    if lists.is_empty() {
        return 0.0;
    }
    let total: usize = lists.iter().map(|list| list.as_ref().len()).sum();
    total as f64 / lists.len() as f64
}
