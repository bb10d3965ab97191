//! Version report for the stored UCS domains
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Inventory  │────▶│    Check    │────▶│  Annotate   │────▶ render
//! │  (records)  │     │ (UcsClient) │     │  (catalog)  │
//! └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! - [`check`]: Connects to each domain in turn and collects its version
//! - [`render`]: Table and JSON output

pub mod check;
pub mod render;

use serde::Serialize;

pub use check::{CheckError, annotate, check_domains};
pub use render::{render_json, render_table};

/// Result of checking one UCS domain
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DomainReport {
    pub address: String,
    pub reachable: bool,
    pub version: Option<String>,
    pub deferred: Option<bool>,
    pub suggested_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
