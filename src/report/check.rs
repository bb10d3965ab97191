//! Sequential version collection

use thiserror::Error;
use tracing::{error, info, warn};

use crate::crypto::{CryptoError, PasswordCipher};
use crate::inventory::DomainRecord;
use crate::release::ReleaseCatalog;
use crate::report::DomainReport;
use crate::ucs::{UcsClient, UcsError};

#[derive(Debug, Error)]
pub enum CheckError {
    #[error("Cannot decrypt stored password: {0}")]
    Crypto(#[from] CryptoError),

    #[error(transparent)]
    Ucs(#[from] UcsError),
}

/// Connects to every domain in order and records its firmware version
///
/// A domain that fails at any step is logged and reported unreachable; the
/// remaining domains are still checked.
pub async fn check_domains<C: UcsClient + ?Sized>(
    records: &[DomainRecord],
    cipher: &PasswordCipher,
    client: &C,
) -> Vec<DomainReport> {
    let mut reports = Vec::with_capacity(records.len());

    for record in records {
        let address = record.address.trim();
        info!(address, "Attempting to connect to UCS domain");

        let report = match fetch_version(record, cipher, client).await {
            Ok(version) => {
                info!(address, version = %version, "Successfully connected to UCS domain");
                DomainReport {
                    address: address.to_string(),
                    reachable: true,
                    version: Some(version),
                    ..DomainReport::default()
                }
            }
            Err(e) => {
                error!(address, "Failed to connect to UCS domain: {}", e);
                DomainReport {
                    address: address.to_string(),
                    error: Some(e.to_string()),
                    ..DomainReport::default()
                }
            }
        };

        reports.push(report);
    }

    reports
}

async fn fetch_version<C: UcsClient + ?Sized>(
    record: &DomainRecord,
    cipher: &PasswordCipher,
    client: &C,
) -> Result<String, CheckError> {
    let password = cipher.decrypt(&record.password)?;
    let session = client
        .login(record.address.trim(), &record.username, &password)
        .await?;

    // Log out even when the version query failed
    let version = client.firmware_version(&session).await;
    if let Err(e) = client.logout(session).await {
        warn!(address = record.address.trim(), "Logout failed: {}", e);
    }

    Ok(version?.trim().to_string())
}

/// Fills deferred flag and suggested version for reachable domains
pub fn annotate<R: ReleaseCatalog + ?Sized>(reports: &mut [DomainReport], catalog: &R) {
    info!("Processing discovered UCS Manager versions");

    for report in reports.iter_mut().filter(|r| r.reachable) {
        let Some(version) = report.version.as_deref() else {
            continue;
        };

        info!(version, "Validating UCS version information");
        report.suggested_version = catalog.suggested_release(version);
        report.deferred = catalog.is_deferred(version);
    }
}
