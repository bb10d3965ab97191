use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::inventory::DomainRecord;

// =============================================================================
// Constants
// =============================================================================

/// Application directory name used under the XDG config and data homes
pub const APP_DIR_NAME: &str = "ucs-version";

/// Default config file name
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Environment variable overriding the config file location
pub const CONFIG_ENV_VAR: &str = "UCS_VERSION_CONFIG";

/// Timeout for UCS Manager and catalog requests in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Scheme used when a stored address has none
pub const DEFAULT_SCHEME: &str = "https";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Cannot parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("Cannot serialize config: {0}")]
    Serialize(#[from] serde_yaml::Error),
}

/// Application configuration stored as YAML
///
/// Keys this tool does not know about are kept in `extra` so that a save
/// never drops settings written by someone else.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub ucs: UcsConfig,
    pub catalog: CatalogConfig,
    pub client: ClientConfig,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

/// Stored UCS domains
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct UcsConfig {
    pub systems: Vec<DomainRecord>,
}

/// Where the release-train document comes from
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct CatalogConfig {
    /// http(s) URL or local file path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// UCS Manager connection settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "snake_case")]
pub struct ClientConfig {
    /// Accept self-signed certificates, which UCS Manager ships with
    pub insecure: bool,
    pub timeout_secs: u64,
    pub scheme: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            insecure: true,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            scheme: DEFAULT_SCHEME.to_string(),
        }
    }
}

/// Loads and persists [`AppConfig`]
pub trait ConfigStore {
    fn load(&self) -> Result<AppConfig, ConfigError>;

    fn save(&self, config: &AppConfig) -> Result<(), ConfigError>;

    fn path(&self) -> &Path;
}

/// [`ConfigStore`] backed by a YAML file on disk
pub struct YamlConfigStore {
    path: PathBuf,
}

impl YamlConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ConfigStore for YamlConfigStore {
    fn load(&self) -> Result<AppConfig, ConfigError> {
        debug!(path = %self.path.display(), "Loading configuration file");

        if !self.path.exists() {
            info!(path = %self.path.display(), "Configuration file not found, starting empty");
            return Ok(AppConfig::default());
        }

        let content = std::fs::read_to_string(&self.path).map_err(|source| ConfigError::Read {
            path: self.path.clone(),
            source,
        })?;

        // An empty file is a valid, empty config
        if content.trim().is_empty() {
            return Ok(AppConfig::default());
        }

        let config = serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: self.path.clone(),
            source,
        })?;

        debug!("Configuration file read successfully");
        Ok(config)
    }

    fn save(&self, config: &AppConfig) -> Result<(), ConfigError> {
        info!(path = %self.path.display(), "Saving configuration file");

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let content = serde_yaml::to_string(config)?;
        std::fs::write(&self.path, content).map_err(|source| ConfigError::Write {
            path: self.path.clone(),
            source,
        })?;

        // Passwords are encrypted with a key baked into the binary, so keep
        // the file private as well
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))
                .map_err(|source| ConfigError::Write {
                    path: self.path.clone(),
                    source,
                })?;
        }

        debug!("Saving configuration file complete");
        Ok(())
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

/// Resolves the config file path.
/// An explicit path wins, then $UCS_VERSION_CONFIG, then
/// $XDG_CONFIG_HOME/ucs-version/config.yaml, then ~/.config/ucs-version/config.yaml,
/// or ./ucs-version/config.yaml if none of those are available.
pub fn config_path(explicit: Option<PathBuf>) -> PathBuf {
    explicit
        .or_else(|| std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from))
        .unwrap_or_else(|| {
            config_dir_with_env(std::env::var("XDG_CONFIG_HOME").ok(), dirs::home_dir())
                .join(CONFIG_FILE_NAME)
        })
}

/// Returns the path to the data directory for ucs-version.
/// Uses $XDG_DATA_HOME/ucs-version if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/ucs-version,
/// or ./ucs-version if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the directory holding per-run log directories.
pub fn log_dir() -> PathBuf {
    data_dir().join("logs")
}

fn config_dir_with_env(xdg_config_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    xdg_config_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".config")))
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join(APP_DIR_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    fn app_config_from_partial_yaml_uses_defaults_for_missing_fields() {
        let result = serde_yaml::from_str::<AppConfig>(
            r#"
ucs:
  systems:
    - url: 10.1.1.1
      username: admin
      password: c2VjcmV0
"#,
        )
        .unwrap();

        assert_eq!(result.ucs.systems.len(), 1);
        assert_eq!(result.ucs.systems[0].address, "10.1.1.1");
        assert_eq!(result.catalog, CatalogConfig::default());
        assert_eq!(result.client, ClientConfig::default());
    }

    #[test]
    fn app_config_from_full_yaml_parses_all_fields() {
        let result = serde_yaml::from_str::<AppConfig>(
            r#"
catalog:
  source: https://releases.example.com/ucsm.json
client:
  insecure: false
  timeout_secs: 5
  scheme: http
"#,
        )
        .unwrap();

        assert_eq!(
            result.catalog.source.as_deref(),
            Some("https://releases.example.com/ucsm.json")
        );
        assert_eq!(
            result.client,
            ClientConfig {
                insecure: false,
                timeout_secs: 5,
                scheme: "http".to_string(),
            }
        );
    }

    #[test]
    fn save_preserves_unknown_top_level_keys() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.yaml");
        std::fs::write(&path, "owner: ops-team\nucs:\n  systems: []\n").unwrap();

        let store = YamlConfigStore::new(&path);
        let config = store.load().unwrap();
        store.save(&config).unwrap();

        let reloaded = store.load().unwrap();
        assert_eq!(
            reloaded.extra.get("owner"),
            Some(&serde_yaml::Value::String("ops-team".to_string()))
        );
    }

    #[test]
    fn load_returns_default_when_file_is_missing() {
        let temp_dir = TempDir::new().unwrap();
        let store = YamlConfigStore::new(temp_dir.path().join("missing.yaml"));

        assert_eq!(store.load().unwrap(), AppConfig::default());
    }

    #[test]
    fn load_returns_parse_error_for_invalid_yaml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.yaml");
        std::fs::write(&path, "ucs: [unterminated").unwrap();

        let result = YamlConfigStore::new(&path).load();

        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn save_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested/dir/config.yaml");

        YamlConfigStore::new(&path)
            .save(&AppConfig::default())
            .unwrap();

        assert!(path.exists());
    }

    #[cfg(unix)]
    #[test]
    fn save_restricts_file_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.yaml");
        YamlConfigStore::new(&path)
            .save(&AppConfig::default())
            .unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    #[serial]
    fn config_path_prefers_explicit_path_over_env() {
        unsafe { std::env::set_var(CONFIG_ENV_VAR, "/tmp/from-env.yaml") };
        let path = config_path(Some(PathBuf::from("/tmp/explicit.yaml")));
        unsafe { std::env::remove_var(CONFIG_ENV_VAR) };

        assert_eq!(path, PathBuf::from("/tmp/explicit.yaml"));
    }

    #[test]
    #[serial]
    fn config_path_uses_env_when_no_explicit_path() {
        unsafe { std::env::set_var(CONFIG_ENV_VAR, "/tmp/from-env.yaml") };
        let path = config_path(None);
        unsafe { std::env::remove_var(CONFIG_ENV_VAR) };

        assert_eq!(path, PathBuf::from("/tmp/from-env.yaml"));
    }

    #[test]
    fn config_dir_with_env_uses_xdg_config_home_when_set() {
        let path = config_dir_with_env(
            Some("/tmp/test-config".to_string()),
            Some(PathBuf::from("/home/user")),
        );

        assert_eq!(path, PathBuf::from("/tmp/test-config/ucs-version"));
    }

    #[test]
    fn config_dir_with_env_falls_back_to_home_config() {
        let path = config_dir_with_env(None, Some(PathBuf::from("/home/user")));

        assert_eq!(path, PathBuf::from("/home/user/.config/ucs-version"));
    }

    #[test]
    fn data_dir_with_env_uses_xdg_data_home_when_set() {
        let path = data_dir_with_env(
            Some("/tmp/test-data".to_string()),
            Some(PathBuf::from("/home/user")),
        );

        assert_eq!(path, PathBuf::from("/tmp/test-data/ucs-version"));
    }

    #[test]
    fn data_dir_with_env_falls_back_to_home_local_share() {
        let path = data_dir_with_env(None, Some(PathBuf::from("/home/user")));

        assert_eq!(path, PathBuf::from("/home/user/.local/share/ucs-version"));
    }

    #[test]
    fn data_dir_with_env_falls_back_to_current_dir_when_no_dirs_available() {
        let path = data_dir_with_env(None, None);
        assert_eq!(path, PathBuf::from("./ucs-version"));
    }
}
