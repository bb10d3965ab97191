//! Command handlers behind the CLI
//!
//! Each handler loads the config, applies one change or query, persists the
//! config when it changed, and writes user-facing output to `out`.

use std::io::Write;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::config::{AppConfig, ConfigStore};
use crate::crypto::PasswordCipher;
use crate::inventory::{DomainRecord, Inventory, InventoryError};
use crate::release::load_catalog;
use crate::report::{self, DomainReport};
use crate::ucs::UcsClient;

const MASKED_PASSWORD: &str = "********";

/// Output style for `show` and `run`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
}

/// Domain details safe to print
#[derive(Debug, Serialize)]
struct DomainView<'a> {
    address: &'a str,
    username: &'a str,
}

impl<'a> From<&'a DomainRecord> for DomainView<'a> {
    fn from(record: &'a DomainRecord) -> Self {
        Self {
            address: record.address.trim(),
            username: &record.username,
        }
    }
}

/// Reads the config file behind `store`
pub fn load_config<S: ConfigStore + ?Sized>(store: &S) -> Result<AppConfig> {
    store.load().context("cannot load configuration")
}

fn load<S: ConfigStore + ?Sized>(store: &S) -> Result<(AppConfig, Inventory)> {
    let config = load_config(store)?;
    let inventory = Inventory::new(config.ucs.systems.clone(), PasswordCipher::default());
    Ok((config, inventory))
}

fn persist<S: ConfigStore + ?Sized>(
    store: &S,
    mut config: AppConfig,
    inventory: Inventory,
) -> Result<()> {
    config.ucs.systems = inventory.into_records();
    store.save(&config).context("cannot save configuration")
}

/// Registers a new UCS domain
pub fn add<S: ConfigStore + ?Sized, W: Write>(
    store: &S,
    address: &str,
    username: &str,
    password: &str,
    out: &mut W,
) -> Result<()> {
    let (config, mut inventory) = load(store)?;

    let address = inventory
        .add(address, username, password)
        .inspect_err(|e| info!(address = address.trim(), "Cannot add UCS domain: {}", e))?
        .address
        .clone();
    persist(store, config, inventory)?;

    info!(address = %address, username, "New UCS domain has been added");
    writeln!(out, "New UCS domain {address} has been added successfully.")?;
    Ok(())
}

/// Replaces the credentials of a stored UCS domain
pub fn update<S: ConfigStore + ?Sized, W: Write>(
    store: &S,
    address: &str,
    username: &str,
    password: &str,
    out: &mut W,
) -> Result<()> {
    let (config, mut inventory) = load(store)?;

    let address = inventory
        .update(address, username, password)
        .inspect_err(|e| info!(address = address.trim(), "Cannot update UCS domain: {}", e))?
        .address
        .clone();
    persist(store, config, inventory)?;

    info!(address = %address, username, "UCS domain has been updated");
    writeln!(out, "UCS domain {address} has been updated successfully.")?;
    Ok(())
}

/// Removes a stored UCS domain
pub fn delete<S: ConfigStore + ?Sized, W: Write>(store: &S, address: &str, out: &mut W) -> Result<()> {
    let (config, mut inventory) = load(store)?;

    let removed = inventory
        .remove(address)
        .inspect_err(|e| info!(address = address.trim(), "Cannot delete UCS domain: {}", e))?;
    persist(store, config, inventory)?;

    let address = address.trim();
    info!(address, entries = removed.len(), "UCS domain has been deleted");
    writeln!(out, "UCS domain {address} has been deleted successfully.")?;
    Ok(())
}

/// Prints one stored UCS domain
pub fn show<S: ConfigStore + ?Sized, W: Write>(
    store: &S,
    address: &str,
    format: OutputFormat,
    out: &mut W,
) -> Result<()> {
    let (_, inventory) = load(store)?;

    let record = inventory
        .get(address)
        .ok_or_else(|| InventoryError::NotFound(address.trim().to_string()))?;

    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &DomainView::from(record))?;
            writeln!(out)?;
        }
        OutputFormat::Human => write_domain(out, record)?,
    }
    Ok(())
}

/// Prints every stored UCS domain
pub fn show_all<S: ConfigStore + ?Sized, W: Write>(
    store: &S,
    format: OutputFormat,
    out: &mut W,
) -> Result<()> {
    let (_, inventory) = load(store)?;

    match format {
        OutputFormat::Json => {
            let views: Vec<DomainView<'_>> =
                inventory.records().iter().map(DomainView::from).collect();
            serde_json::to_writer_pretty(&mut *out, &views)?;
            writeln!(out)?;
        }
        OutputFormat::Human if inventory.is_empty() => {
            writeln!(out, "No UCS domains found in the config file.")?;
        }
        OutputFormat::Human => {
            for (i, record) in inventory.records().iter().enumerate() {
                if i > 0 {
                    writeln!(out)?;
                }
                write_domain(out, record)?;
            }
        }
    }
    Ok(())
}

fn write_domain<W: Write>(out: &mut W, record: &DomainRecord) -> std::io::Result<()> {
    writeln!(out, "{:<12} {}", "UCS Domain:", record.address.trim())?;
    writeln!(out, "{:<12} {}", "Username:", record.username)?;
    writeln!(out, "{:<12} {}", "Password:", MASKED_PASSWORD)
}

/// Checks every stored domain and prints the version report
pub async fn run<C: UcsClient + ?Sized, W: Write>(
    config: &AppConfig,
    client: &C,
    format: OutputFormat,
    out: &mut W,
) -> Result<Vec<DomainReport>> {
    let inventory = Inventory::new(config.ucs.systems.clone(), PasswordCipher::default());

    if inventory.is_empty() {
        writeln!(
            out,
            "No UCS domains found in the config file. Add one with `ucs-version add ucs` and try again."
        )?;
        return Ok(Vec::new());
    }

    let mut reports =
        report::check_domains(inventory.records(), &PasswordCipher::default(), client).await;

    let catalog = load_catalog(
        config.catalog.source.as_deref(),
        Duration::from_secs(config.client.timeout_secs),
    )
    .await;
    report::annotate(&mut reports, &catalog);

    info!("Displaying UCS version information");
    match format {
        OutputFormat::Json => report::render_json(&reports, out)?,
        OutputFormat::Human => report::render_table(&reports, out)?,
    }

    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::path::Path;
    use std::sync::{Arc, Mutex};

    use crate::config::ConfigError;

    /// In-memory store that counts saves
    #[derive(Default)]
    struct MemoryStore {
        config: RefCell<AppConfig>,
        saves: RefCell<usize>,
    }

    impl ConfigStore for MemoryStore {
        fn load(&self) -> Result<AppConfig, ConfigError> {
            Ok(self.config.borrow().clone())
        }

        fn save(&self, config: &AppConfig) -> Result<(), ConfigError> {
            *self.config.borrow_mut() = config.clone();
            *self.saves.borrow_mut() += 1;
            Ok(())
        }

        fn path(&self) -> &Path {
            Path::new("memory.yaml")
        }
    }

    struct UnreadableStore;

    impl ConfigStore for UnreadableStore {
        fn load(&self) -> Result<AppConfig, ConfigError> {
            Err(ConfigError::Read {
                path: Path::new("broken.yaml").to_path_buf(),
                source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
            })
        }

        fn save(&self, _config: &AppConfig) -> Result<(), ConfigError> {
            Ok(())
        }

        fn path(&self) -> &Path {
            Path::new("broken.yaml")
        }
    }

    fn output(buf: Vec<u8>) -> String {
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn add_persists_new_domain() {
        let store = MemoryStore::default();
        let mut out = Vec::new();

        add(&store, "10.0.0.1", "admin", "secret", &mut out).unwrap();

        assert_eq!(*store.saves.borrow(), 1);
        let systems = store.config.borrow().ucs.systems.clone();
        assert_eq!(systems.len(), 1);
        assert_eq!(systems[0].address, "10.0.0.1");
        assert!(output(out).contains("added successfully"));
    }

    #[test]
    fn add_duplicate_does_not_save() {
        let store = MemoryStore::default();
        add(&store, "10.0.0.1", "admin", "secret", &mut Vec::new()).unwrap();

        let err = add(&store, "10.0.0.1", "admin", "secret", &mut Vec::new()).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<InventoryError>(),
            Some(InventoryError::AlreadyExists(_))
        ));
        assert_eq!(*store.saves.borrow(), 1);
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLogs {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn with_captured_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        let result = tracing::subscriber::with_default(subscriber, f);
        (result, logs.text())
    }

    #[test]
    fn rejected_changes_are_logged() {
        let store = MemoryStore::default();
        add(&store, "10.0.0.1", "admin", "secret", &mut Vec::new()).unwrap();

        let (results, logs) = with_captured_logs(|| {
            [
                add(&store, "10.0.0.1", "admin", "secret", &mut Vec::new()).is_err(),
                update(&store, "10.0.0.9", "admin", "secret", &mut Vec::new()).is_err(),
                delete(&store, "10.0.0.9", &mut Vec::new()).is_err(),
            ]
        });

        assert_eq!(results, [true, true, true]);
        assert!(logs.contains("Cannot add UCS domain"));
        assert!(logs.contains("Cannot update UCS domain"));
        assert!(logs.contains("Cannot delete UCS domain"));
        assert!(logs.contains("10.0.0.9"));
    }

    #[test]
    fn delete_last_domain_saves_empty_list() {
        let store = MemoryStore::default();
        add(&store, "10.0.0.1", "admin", "secret", &mut Vec::new()).unwrap();

        delete(&store, "10.0.0.1", &mut Vec::new()).unwrap();

        assert!(store.config.borrow().ucs.systems.is_empty());
        assert_eq!(*store.saves.borrow(), 2);
    }

    #[test]
    fn delete_removes_every_entry_for_address() {
        let store = MemoryStore::default();
        add(&store, "10.0.0.1", "admin", "secret", &mut Vec::new()).unwrap();
        add(&store, "10.0.0.2", "admin", "secret", &mut Vec::new()).unwrap();
        {
            let mut config = store.config.borrow_mut();
            let mut padded = config.ucs.systems[0].clone();
            padded.address = " 10.0.0.1 ".to_string();
            config.ucs.systems.push(padded);
        }
        let mut out = Vec::new();

        delete(&store, "10.0.0.1", &mut out).unwrap();

        let systems = store.config.borrow().ucs.systems.clone();
        assert_eq!(systems.len(), 1);
        assert_eq!(systems[0].address, "10.0.0.2");
        assert!(output(out).contains("UCS domain 10.0.0.1 has been deleted"));
    }

    #[test]
    fn update_unknown_domain_fails_without_saving() {
        let store = MemoryStore::default();

        let err = update(&store, "10.0.0.1", "admin", "secret", &mut Vec::new()).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<InventoryError>(),
            Some(InventoryError::NotFound(_))
        ));
        assert_eq!(*store.saves.borrow(), 0);
    }

    #[test]
    fn show_masks_password() {
        let store = MemoryStore::default();
        add(&store, "10.0.0.1", "admin", "secret", &mut Vec::new()).unwrap();
        let mut out = Vec::new();

        show(&store, "10.0.0.1", OutputFormat::Human, &mut out).unwrap();

        let text = output(out);
        assert!(text.contains("10.0.0.1"));
        assert!(text.contains("admin"));
        assert!(text.contains(MASKED_PASSWORD));
        assert!(!text.contains(&store.config.borrow().ucs.systems[0].password));
    }

    #[test]
    fn show_all_json_omits_password() {
        let store = MemoryStore::default();
        add(&store, "10.0.0.1", "admin", "secret", &mut Vec::new()).unwrap();
        add(&store, "10.0.0.2", "ops", "secret", &mut Vec::new()).unwrap();
        let mut out = Vec::new();

        show_all(&store, OutputFormat::Json, &mut out).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(
            value,
            serde_json::json!([
                { "address": "10.0.0.1", "username": "admin" },
                { "address": "10.0.0.2", "username": "ops" }
            ])
        );
    }

    #[test]
    fn show_all_reports_empty_inventory() {
        let store = MemoryStore::default();
        let mut out = Vec::new();

        show_all(&store, OutputFormat::Human, &mut out).unwrap();

        assert!(output(out).contains("No UCS domains"));
    }

    #[test]
    fn load_config_failure_names_the_step() {
        let err = load_config(&UnreadableStore).unwrap_err();

        assert_eq!(err.to_string(), "cannot load configuration");
        assert!(err.downcast_ref::<ConfigError>().is_some());
    }

    #[tokio::test]
    async fn run_with_empty_inventory_prints_hint() {
        let store = MemoryStore::default();
        let client = crate::ucs::client::MockUcsClient::new();
        let mut out = Vec::new();

        let reports = run(&store.load().unwrap(), &client, OutputFormat::Human, &mut out)
            .await
            .unwrap();

        assert!(reports.is_empty());
        assert!(output(out).contains("No UCS domains found"));
    }
}
