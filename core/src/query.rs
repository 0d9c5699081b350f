use crate::config::{CategoryId, SearchConfig};
use crate::tokenizer::tokenize;

/// A query after tokenization, stop-word removal and category detection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalyzedQuery {
    /// Remaining terms. For a category query these are the location terms.
    pub terms: Vec<String>,
    /// Set when the last cleaned term is a category keyword; that keyword is
    /// then removed from `terms`.
    pub category: Option<CategoryId>,
}

impl AnalyzedQuery {
    pub fn is_category_query(&self) -> bool {
        self.category.is_some()
    }
}

pub fn analyze(query: &str, config: &SearchConfig) -> AnalyzedQuery {
    let mut terms: Vec<String> = tokenize(query)
        .into_iter()
        .filter(|term| !config.is_stop_word(term))
        .collect();
    let category = terms.last().and_then(|term| config.category_of(term));
    if category.is_some() {
        terms.pop();
    }
    AnalyzedQuery { terms, category }
}
