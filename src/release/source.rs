//! Loading the release document

use std::path::PathBuf;
use std::time::Duration;

use tracing::{info, warn};

use crate::release::catalog::ReleaseTrains;
use crate::release::error::CatalogError;

/// Where a release document lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    Url(String),
    File(PathBuf),
}

impl CatalogSource {
    /// `http://` and `https://` sources are URLs, anything else a file path
    pub fn parse(source: &str) -> Self {
        let source = source.trim();
        if source.starts_with("http://") || source.starts_with("https://") {
            Self::Url(source.to_string())
        } else {
            Self::File(PathBuf::from(source))
        }
    }

    pub async fn fetch(&self, client: &reqwest::Client) -> Result<ReleaseTrains, CatalogError> {
        let content = match self {
            Self::Url(url) => {
                let response = client.get(url).send().await?;
                let status = response.status();

                if status == reqwest::StatusCode::NOT_FOUND {
                    return Err(CatalogError::NotFound(url.clone()));
                }

                if !status.is_success() {
                    warn!("Release catalog returned status {}: {}", status, url);
                    return Err(CatalogError::InvalidResponse(format!(
                        "Unexpected status: {}",
                        status
                    )));
                }

                response.text().await?
            }
            Self::File(path) => {
                if !path.exists() {
                    return Err(CatalogError::NotFound(path.display().to_string()));
                }
                tokio::fs::read_to_string(path).await?
            }
        };

        ReleaseTrains::parse(&content).map_err(|e| {
            warn!("Failed to parse release catalog: {}", e);
            CatalogError::InvalidResponse(e)
        })
    }
}

/// Loads the release catalog from `source`
///
/// Missing or broken catalogs are logged and yield an empty catalog, so the
/// report still shows the versions that were collected.
pub async fn load_catalog(source: Option<&str>, timeout: Duration) -> ReleaseTrains {
    let Some(source) = source.filter(|s| !s.trim().is_empty()) else {
        warn!("No release catalog configured; deferred and suggested versions will be unknown");
        return ReleaseTrains::default();
    };

    info!(source, "Getting UCS version information from Cisco release data");

    let client = match reqwest::Client::builder()
        .user_agent("ucs-version")
        .timeout(timeout)
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            warn!("Failed to create HTTP client: {}", e);
            return ReleaseTrains::default();
        }
    };

    CatalogSource::parse(source)
        .fetch(&client)
        .await
        .inspect_err(|e| warn!(source, "Failed to load release catalog: {}", e))
        .unwrap_or_default()
}
