use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("archetype data unavailable: {0}")]
    DataUnavailable(String),
    #[error("duplicate archetype name: {0}")]
    DuplicateName(String),
    #[error("invalid filter value: {0}")]
    InvalidFilter(String),
}
