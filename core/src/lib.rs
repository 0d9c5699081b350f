pub mod config;
pub mod error;
pub mod index;
pub mod loader;
pub mod query;
pub mod rank;
pub mod score;
pub mod stats;
pub mod tokenizer;

pub use config::{CategoryId, SearchConfig};
pub use error::{ConfigError, LoadError};
pub use index::{CategoryIndex, InvertedIndex, School, SchoolIndex, SchoolRecord};
pub use query::AnalyzedQuery;
pub use score::ScoreBoard;

/// Position of a school in the corpus, assigned in input order starting at 0.
pub type DocId = u32;
