//! Client trait for talking to UCS Manager

#[cfg(test)]
use mockall::automock;

use crate::ucs::error::UcsError;

/// An authenticated UCS Manager session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    address: String,
    cookie: String,
}

impl Session {
    pub fn new(address: impl Into<String>, cookie: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            cookie: cookie.into(),
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn cookie(&self) -> &str {
        &self.cookie
    }
}

/// Trait for the UCS Manager calls used by the version check
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait UcsClient: Send + Sync {
    /// Opens a session on the domain at `address`
    async fn login(
        &self,
        address: &str,
        username: &str,
        password: &str,
    ) -> Result<Session, UcsError>;

    /// Returns the running system firmware version, e.g. `4.2(3d)`
    async fn firmware_version(&self, session: &Session) -> Result<String, UcsError>;

    /// Closes the session
    async fn logout(&self, session: Session) -> Result<(), UcsError>;
}
