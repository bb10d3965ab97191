//! UCS Manager test utilities

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use ucs_version::ucs::{Session, UcsClient, UcsError};

/// Mock UCS Manager client keyed by domain address
pub struct MockUcsClient {
    versions: HashMap<String, String>,
    logouts: Mutex<Vec<String>>,
}

impl MockUcsClient {
    pub fn new() -> Self {
        Self {
            versions: HashMap::new(),
            logouts: Mutex::new(Vec::new()),
        }
    }

    pub fn with_domain(mut self, address: &str, version: &str) -> Self {
        self.versions
            .insert(address.to_string(), version.to_string());
        self
    }

    /// Addresses logged out so far, in order
    pub fn logouts(&self) -> Vec<String> {
        self.logouts.lock().unwrap().clone()
    }
}

#[async_trait]
impl UcsClient for MockUcsClient {
    async fn login(
        &self,
        address: &str,
        _username: &str,
        _password: &str,
    ) -> Result<Session, UcsError> {
        if self.versions.contains_key(address) {
            Ok(Session::new(address, format!("cookie-{address}")))
        } else {
            Err(UcsError::InvalidResponse(format!("{address} unreachable")))
        }
    }

    async fn firmware_version(&self, session: &Session) -> Result<String, UcsError> {
        self.versions
            .get(session.address())
            .cloned()
            .ok_or_else(|| UcsError::InvalidResponse("no version".to_string()))
    }

    async fn logout(&self, session: Session) -> Result<(), UcsError> {
        self.logouts
            .lock()
            .unwrap()
            .push(session.address().to_string());
        Ok(())
    }
}
