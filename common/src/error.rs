//! Error types for the shared search models.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("unknown content type: {0}")]
    UnknownContentType(String),

    #[error("unknown order field: {0}")]
    UnknownOrderField(String),

    #[error("unknown facet key: {0}")]
    UnknownFacetKey(String),

    #[error("facet filter must contain at least one value")]
    EmptyFacetFilter,

    #[error("invalid search config: {0}")]
    InvalidConfig(&'static str),

    #[error("failed to parse search config: {0}")]
    ConfigJson(#[from] serde_json::Error),
}
