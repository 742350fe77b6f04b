use thiserror::Error;

pub type ClasspadResult<T> = Result<T, ClasspadError>;

#[derive(Error, Debug)]
pub enum ClasspadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Catalog parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Settings lookup failed: {0}")]
    Settings(#[from] SettingsError),

    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Failure of a single settings lookup.
///
/// Lookups are shared between every caller waiting on the same document, so
/// the error has to be cheap to clone.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    #[error("configuration request failed: {0}")]
    Query(String),

    #[error("client returned no configuration for the requested scope")]
    Missing,

    #[error("malformed settings: {0}")]
    Malformed(String),

    #[error("maxNumberOfProblems must be greater than zero")]
    ZeroProblemLimit,
}
