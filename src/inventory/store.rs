//! In-memory domain inventory

use tracing::debug;

use crate::crypto::PasswordCipher;
use crate::inventory::error::InventoryError;
use crate::inventory::record::DomainRecord;

/// Ordered list of domains, unique by address
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    records: Vec<DomainRecord>,
    cipher: PasswordCipher,
}

impl Inventory {
    pub fn new(records: Vec<DomainRecord>, cipher: PasswordCipher) -> Self {
        debug!(systems = records.len(), "Located UCS domains in the config file");
        Self { records, cipher }
    }

    pub fn records(&self) -> &[DomainRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<DomainRecord> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, address: &str) -> bool {
        debug!(address = address.trim(), "Searching for UCS domain");
        self.records.iter().any(|r| r.matches(address))
    }

    pub fn get(&self, address: &str) -> Option<&DomainRecord> {
        self.records.iter().find(|r| r.matches(address))
    }

    /// Registers a new domain, encrypting its password
    pub fn add(
        &mut self,
        address: &str,
        username: &str,
        password: &str,
    ) -> Result<&DomainRecord, InventoryError> {
        let address = validate(address, username, password)?;

        if self.contains(address) {
            return Err(InventoryError::AlreadyExists(address.to_string()));
        }

        self.records.push(DomainRecord {
            address: address.to_string(),
            username: username.to_string(),
            password: self.cipher.encrypt(password)?,
        });

        // Just pushed, so the slice is non-empty
        Ok(&self.records[self.records.len() - 1])
    }

    /// Replaces the credentials of an existing domain
    pub fn update(
        &mut self,
        address: &str,
        username: &str,
        password: &str,
    ) -> Result<&DomainRecord, InventoryError> {
        let address = validate(address, username, password)?;
        let encrypted = self.cipher.encrypt(password)?;

        let record = self
            .records
            .iter_mut()
            .find(|r| r.matches(address))
            .ok_or_else(|| InventoryError::NotFound(address.to_string()))?;

        record.username = username.to_string();
        record.password = encrypted;

        Ok(&*record)
    }

    /// Removes every record with this address and returns them
    pub fn remove(&mut self, address: &str) -> Result<Vec<DomainRecord>, InventoryError> {
        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.records)
            .into_iter()
            .partition(|r| r.matches(address));
        self.records = kept;

        if removed.is_empty() {
            return Err(InventoryError::NotFound(address.trim().to_string()));
        }
        if removed.len() > 1 {
            debug!(
                address = address.trim(),
                count = removed.len(),
                "Removed duplicate UCS domain entries"
            );
        }
        Ok(removed)
    }
}

/// Checks credentials for add/update and returns the trimmed address
fn validate<'a>(
    address: &'a str,
    username: &str,
    password: &str,
) -> Result<&'a str, InventoryError> {
    let address = address.trim();

    if address.is_empty() {
        return Err(InventoryError::EmptyField("address"));
    }
    if username.trim().is_empty() {
        return Err(InventoryError::EmptyField("username"));
    }
    if password.is_empty() {
        return Err(InventoryError::EmptyField("password"));
    }
    if address.contains("://") || address.contains(char::is_whitespace) || address.contains('/') {
        return Err(InventoryError::InvalidAddress(address.to_string()));
    }

    Ok(address)
}
