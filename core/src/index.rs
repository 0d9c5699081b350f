use crate::config::{CategoryId, SearchConfig};
use crate::error::ConfigError;
use crate::query::{self, AnalyzedQuery};
use crate::rank::rank;
use crate::score::ScoreBoard;
use crate::tokenizer::tokenize;
use crate::DocId;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::time::Instant;

pub const NAME_FIELD: &str = "SCHNAM05";
pub const CITY_FIELD: &str = "LCITY05";
pub const STATE_FIELD: &str = "LSTATE05";
pub const LOCALE_FIELD: &str = "MLOCALE";

/// A raw input row: column name → value.
pub type SchoolRecord = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct School {
    pub id: DocId,
    pub name: String,
    pub city: String,
    pub state: String,
    pub locale: Option<String>,
    /// Columns other than name, city, state and locale, passed through untouched.
    pub extra: BTreeMap<String, String>,
}

impl School {
    /// Missing name, city or state columns read as empty strings.
    pub fn from_record(id: DocId, mut record: SchoolRecord) -> Self {
        Self {
            id,
            name: record.remove(NAME_FIELD).unwrap_or_default(),
            city: record.remove(CITY_FIELD).unwrap_or_default(),
            state: record.remove(STATE_FIELD).unwrap_or_default(),
            locale: record.remove(LOCALE_FIELD),
            extra: record,
        }
    }
}

/// Term → posting list. Posting lists are in document id order and keep one
/// entry per occurrence of the term in a field.
#[derive(Debug, Default, Clone)]
pub struct InvertedIndex {
    postings: HashMap<String, Vec<DocId>>,
}

impl InvertedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, term: String, doc_id: DocId) {
        self.postings.entry(term).or_default().push(doc_id);
    }

    pub fn postings(&self, term: &str) -> Option<&[DocId]> {
        self.postings.get(term).map(Vec::as_slice)
    }

    pub fn contains(&self, term: &str) -> bool {
        self.postings.contains_key(term)
    }

    pub fn num_terms(&self) -> usize {
        self.postings.len()
    }

    pub fn terms(&self) -> impl Iterator<Item = &str> + '_ {
        self.postings.keys().map(String::as_str)
    }
}

/// Category id → documents whose name contains the category keyword.
/// Holds one list per configured category, empty when nothing matched.
#[derive(Debug, Default, Clone)]
pub struct CategoryIndex {
    lists: Vec<Vec<DocId>>,
}

impl CategoryIndex {
    fn with_categories(count: usize) -> Self {
        Self { lists: vec![Vec::new(); count] }
    }

    pub fn postings(&self, category: CategoryId) -> Option<&[DocId]> {
        self.lists.get(category).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }
}

/// Immutable search index over a fixed set of schools.
///
/// Built once by [`SchoolIndex::build`]; every query method takes `&self`, so a
/// built index can be shared across threads without locking.
#[derive(Debug, Clone)]
pub struct SchoolIndex {
    config: SearchConfig,
    schools: Vec<School>,
    names: InvertedIndex,
    cities: InvertedIndex,
    categories: CategoryIndex,
}

impl SchoolIndex {
    /// Assign ids in input order and index names, cities and categories.
    pub fn build<I>(records: I, config: SearchConfig) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = SchoolRecord>,
    {
        config.validate()?;
        let start = Instant::now();

        let schools: Vec<School> = records
            .into_iter()
            .enumerate()
            .map(|(i, record)| School::from_record(i as DocId, record))
            .collect();

        let mut names = InvertedIndex::new();
        let mut cities = InvertedIndex::new();
        let mut categories = CategoryIndex::with_categories(config.categories.len());

        for school in &schools {
            for term in tokenize(&school.city) {
                cities.push(term, school.id);
            }
            for term in tokenize(&school.name) {
                if config.is_stop_word(&term) {
                    continue;
                }
                if let Some(category) = config.category_of(&term) {
                    categories.lists[category].push(school.id);
                }
                names.push(term, school.id);
            }
        }

        tracing::info!(
            num_docs = schools.len(),
            name_terms = names.num_terms(),
            city_terms = cities.num_terms(),
            categories = categories.len(),
            elapsed_s = start.elapsed().as_secs_f64(),
            "built school index"
        );
        Ok(Self { config, schools, names, cities, categories })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.schools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schools.is_empty()
    }

    pub fn school(&self, doc_id: DocId) -> Option<&School> {
        self.schools.get(doc_id as usize)
    }

    pub fn schools(&self) -> &[School] {
        &self.schools
    }

    pub fn names(&self) -> &InvertedIndex {
        &self.names
    }

    pub fn cities(&self) -> &InvertedIndex {
        &self.cities
    }

    pub fn categories(&self) -> &CategoryIndex {
        &self.categories
    }

    pub fn analyze(&self, query: &str) -> AnalyzedQuery {
        query::analyze(query, &self.config)
    }

    /// Schools of `category` located in a city matching any of `location_terms`.
    pub fn search_category(&self, location_terms: &[String], category: CategoryId) -> BTreeSet<DocId> {
        let in_location: BTreeSet<DocId> = location_terms
            .iter()
            .filter_map(|term| self.cities.postings(term))
            .flatten()
            .copied()
            .collect();
        match self.categories.postings(category) {
            Some(members) => members.iter().copied().filter(|id| in_location.contains(id)).collect(),
            None => BTreeSet::new(),
        }
    }

    /// Score the analyzed terms against the name and city indices.
    pub fn score(&self, terms: &[String]) -> ScoreBoard {
        let name_lists: Vec<&[DocId]> = terms.iter().filter_map(|t| self.names.postings(t)).collect();
        let city_lists: Vec<&[DocId]> = terms.iter().filter_map(|t| self.cities.postings(t)).collect();

        let mut board = ScoreBoard::new();
        board.add_name_scores(&name_lists, self.config.school_term_weight);
        board.add_city_scores(&city_lists, self.config.city_term_weight, self.config.penalty_factor);
        board
    }

    /// Top results for `query`, limited by the configured top-N.
    pub fn search(&self, query: &str) -> Vec<DocId> {
        self.search_top(query, self.config.top_n)
    }

    /// Top `top_n` results for `query`. Category-in-location matches come
    /// first, in ascending id order, followed by the scored ranking.
    pub fn search_top(&self, query: &str, top_n: usize) -> Vec<DocId> {
        let analyzed = self.analyze(query);
        let special: Vec<DocId> = match analyzed.category {
            Some(category) => self.search_category(&analyzed.terms, category).into_iter().collect(),
            None => Vec::new(),
        };
        let board = self.score(&analyzed.terms);
        tracing::debug!(
            query,
            terms = ?analyzed.terms,
            category = ?analyzed.category,
            special = special.len(),
            scored = board.len(),
            "search"
        );
        rank(&board, special, top_n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, city: &str, state: &str) -> SchoolRecord {
        SchoolRecord::from([
            (NAME_FIELD.to_string(), name.to_string()),
            (CITY_FIELD.to_string(), city.to_string()),
            (STATE_FIELD.to_string(), state.to_string()),
        ])
    }

    fn build(records: Vec<SchoolRecord>) -> SchoolIndex {
        SchoolIndex::build(records, SearchConfig::default()).unwrap()
    }

    #[test]
    fn school_from_record_splits_known_fields() {
        let mut r = record("Lincoln High", "Springfield", "IL");
        r.insert(LOCALE_FIELD.into(), "3".into());
        r.insert("NCESSCH".into(), "170993000717".into());
        let school = School::from_record(4, r);
        assert_eq!(school.id, 4);
        assert_eq!(school.name, "Lincoln High");
        assert_eq!(school.locale.as_deref(), Some("3"));
        assert_eq!(school.extra.len(), 1);
        assert_eq!(school.extra["NCESSCH"], "170993000717");
    }

    #[test]
    fn stop_words_are_not_indexed_by_name() {
        let index = build(vec![record("School Of Arts School", "Dover", "DE")]);
        assert!(!index.names().contains("school"));
        assert_eq!(index.names().postings("arts"), Some(&[0][..]));
        assert_eq!(index.names().postings("of"), Some(&[0][..]));
    }

    #[test]
    fn repeated_terms_repeat_postings() {
        let index = build(vec![record("Lake Park Lake", "Lake Lake", "FL")]);
        assert_eq!(index.names().postings("lake"), Some(&[0, 0][..]));
        assert_eq!(index.cities().postings("lake"), Some(&[0, 0][..]));
    }

    #[test]
    fn category_keyword_also_lands_in_name_index() {
        let index = build(vec![
            record("Hope Charter School", "Dayton", "OH"),
            record("Hope Academy", "Dayton", "OH"),
        ]);
        assert_eq!(index.categories().postings(0), Some(&[0][..]));
        assert_eq!(index.names().postings("charter"), Some(&[0][..]));
        assert_eq!(index.names().postings("hope"), Some(&[0, 1][..]));
    }

    #[test]
    fn unmatched_category_has_empty_list() {
        let config = SearchConfig {
            categories: HashMap::from([("charter".to_string(), 0), ("magnet".to_string(), 1)]),
            ..SearchConfig::default()
        };
        let index = SchoolIndex::build(vec![record("Hope Academy", "Dayton", "OH")], config).unwrap();
        assert_eq!(index.categories().len(), 2);
        assert!(index.categories().postings(0).unwrap().is_empty());
        assert!(index.categories().postings(1).unwrap().is_empty());
        assert_eq!(index.categories().postings(2), None);
    }

    #[test]
    fn build_rejects_invalid_config() {
        let config = SearchConfig { top_n: 0, ..SearchConfig::default() };
        assert_eq!(SchoolIndex::build(Vec::<SchoolRecord>::new(), config).unwrap_err(), ConfigError::ZeroTopN);
    }

    #[test]
    fn category_search_intersects_location() {
        let index = build(vec![
            record("Hope Charter", "Dayton", "OH"),
            record("Life Charter", "Akron", "OH"),
            record("Dayton Academy", "Dayton", "OH"),
            record("Summit Charter", "Dayton", "OH"),
        ]);
        let terms = vec!["dayton".to_string(), "akron".to_string()];
        assert_eq!(index.search_category(&terms, 0), BTreeSet::from([0, 1, 3]));
        assert_eq!(index.search_category(&terms[..1], 0), BTreeSet::from([0, 3]));
        assert!(index.search_category(&[], 0).is_empty());
        assert!(index.search_category(&terms, 7).is_empty());
    }

    #[test]
    fn category_results_are_prepended_before_scored_results() {
        let index = build(vec![
            record("Dayton Academy", "Dayton", "OH"),
            record("Hope Charter", "Dayton", "OH"),
        ]);
        // "dayton": name list [0], city list [0, 1]. Scores 0 → 6, 1 → 1.
        assert_eq!(index.search_top("dayton charter", 10), vec![1, 0, 1]);
    }

    #[test]
    fn empty_query_has_no_results() {
        let index = build(vec![record("Hope Academy", "Dayton", "OH")]);
        assert!(index.search("").is_empty());
        assert!(index.search("school").is_empty());
        assert!(index.search("x y z").is_empty());
    }
}
