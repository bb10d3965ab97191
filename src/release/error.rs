use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Release catalog not found: {0}")]
    NotFound(String),

    #[error("Invalid release catalog: {0}")]
    InvalidResponse(String),

    #[error("Cannot read release catalog: {0}")]
    Io(#[from] std::io::Error),
}
