use thiserror::Error;

#[derive(Debug, Error)]
pub enum UcsError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("UCS Manager returned error {code}: {description}")]
    Api { code: String, description: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid UCS Manager version: {0:?}")]
    InvalidVersion(String),
}
