use thiserror::Error;

/// Boxed error returned by the collaborators (search client, loaders).
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum EsBuilderError {
    #[error("Invalid temporal value: {value}")]
    InvalidTemporalValue { value: String },
    #[error("Invalid sort direction: {0}")]
    InvalidDirection(String),
    // the search client's own error, untouched
    #[error(transparent)]
    Engine(BoxError),
    #[error("Persistence error: {0}")]
    Persistence(String),
    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, EsBuilderError>;

impl From<config::ConfigError> for EsBuilderError {
    fn from(e: config::ConfigError) -> Self { Self::Config(e.to_string()) }
}

impl EsBuilderError {
    pub(crate) fn temporal(value: impl ToString) -> Self {
        Self::InvalidTemporalValue { value: value.to_string() }
    }
}
