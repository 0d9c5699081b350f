use std::path::PathBuf;

/// Rejected search configuration. Raised before any index is built.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("category ids must be contiguous from 0, missing id {0}")]
    CategoryIdGap(usize),

    #[error("category keyword {0:?} is also a stop-word")]
    KeywordIsStopWord(String),

    /// The tokenizer can never emit this keyword, so the category would be unreachable.
    #[error("category keyword {0:?} is not a valid term")]
    InvalidKeyword(String),

    #[error("{name} must be positive and finite, got {value}")]
    InvalidWeight { name: &'static str, value: f64 },

    #[error("penalty factor must be in (0, 1], got {0}")]
    InvalidPenalty(f64),

    #[error("top_n must be at least 1")]
    ZeroTopN,
}

/// Failure while reading school records from a CSV source.
#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("required column {0:?} missing from header")]
    MissingColumn(&'static str),
}
