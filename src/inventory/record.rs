use serde::{Deserialize, Serialize};

/// A UCS Manager domain as stored in the config file
///
/// Field names on disk (`url`, `username`, `password`) match config files
/// written by earlier releases of the tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainRecord {
    /// IP address or DNS name of UCS Manager, without scheme
    #[serde(rename = "url")]
    pub address: String,
    pub username: String,
    /// Base64 AES-GCM ciphertext, see [`crate::crypto::PasswordCipher`]
    pub password: String,
}

impl DomainRecord {
    /// Returns true if this record is identified by `address`
    pub fn matches(&self, address: &str) -> bool {
        self.address.trim() == address.trim()
    }
}
