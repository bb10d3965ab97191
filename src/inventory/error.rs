use thiserror::Error;

use crate::crypto::CryptoError;

#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("The {0} for the UCS domain cannot be blank")]
    EmptyField(&'static str),

    #[error("Invalid UCS domain address {0:?}: give an IP address or DNS name without http(s)")]
    InvalidAddress(String),

    #[error("A UCS domain with address {0} already exists in the config file")]
    AlreadyExists(String),

    #[error("UCS domain {0} does not exist in the config file")]
    NotFound(String),

    #[error("Password encryption failed: {0}")]
    Crypto(#[from] CryptoError),
}
