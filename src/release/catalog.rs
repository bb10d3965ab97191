//! Release-train lookups

use std::collections::{HashMap, HashSet};

use serde::Deserialize;
use tracing::debug;

use crate::ucs::FirmwareVersion;

/// Trait for looking up release recommendations for a UCS Manager version
pub trait ReleaseCatalog {
    /// Suggested release for the train `version` belongs to
    fn suggested_release(&self, version: &str) -> Option<String>;

    /// Whether `version` is deferred. `None` when the catalog cannot tell.
    fn is_deferred(&self, version: &str) -> Option<bool>;
}

/// One release train in the published document
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TrainInfo {
    /// `major.minor`, e.g. `4.2`
    pub train: String,
    /// Recommended release within the train, e.g. `4.2(3k)`
    pub suggested: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ReleaseDocument {
    trains: Vec<TrainInfo>,
    deferred: Vec<String>,
}

/// Release-train document loaded into lookup tables
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReleaseTrains {
    suggested: HashMap<String, String>,
    deferred: HashSet<String>,
}

impl ReleaseTrains {
    pub fn new(trains: Vec<TrainInfo>, deferred: Vec<String>) -> Self {
        Self {
            suggested: trains
                .into_iter()
                .map(|t| (t.train.trim().to_string(), t.suggested.trim().to_string()))
                .collect(),
            deferred: deferred.iter().map(|v| normalize(v)).collect(),
        }
    }

    /// Parses a JSON or YAML release document
    pub fn parse(content: &str) -> Result<Self, String> {
        // Documents starting with `{` are JSON, anything else YAML
        let document: ReleaseDocument = if content.trim_start().starts_with('{') {
            serde_json::from_str(content).map_err(|e| e.to_string())?
        } else {
            serde_yaml::from_str(content).map_err(|e| e.to_string())?
        };

        debug!(
            trains = document.trains.len(),
            deferred = document.deferred.len(),
            "Parsed release document"
        );

        Ok(Self::new(document.trains, document.deferred))
    }

    pub fn is_empty(&self) -> bool {
        self.suggested.is_empty() && self.deferred.is_empty()
    }
}

impl ReleaseCatalog for ReleaseTrains {
    fn suggested_release(&self, version: &str) -> Option<String> {
        let train = version.parse::<FirmwareVersion>().ok()?.train();
        self.suggested.get(&train).cloned()
    }

    fn is_deferred(&self, version: &str) -> Option<bool> {
        if self.is_empty() {
            return None;
        }
        Some(self.deferred.contains(&normalize(version)))
    }
}

/// Canonical form used for deferred-set membership
fn normalize(version: &str) -> String {
    version
        .parse::<FirmwareVersion>()
        .map(|v| v.to_string())
        .unwrap_or_else(|_| version.trim().to_string())
}
