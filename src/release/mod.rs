//! Cisco release-train data
//!
//! The catalog answers two questions about a UCS Manager version: is it a
//! deferred (recalled) release, and which release is suggested for its
//! train. The data itself is published elsewhere; this module only loads
//! and queries it.
//!
//! # Modules
//!
//! - [`catalog`]: `ReleaseCatalog` trait and the `ReleaseTrains` document
//! - [`error`]: Error types for loading the catalog
//! - [`source`]: Loading the document from a URL or a local file

pub mod catalog;
pub mod error;
pub mod source;

pub use catalog::{ReleaseCatalog, ReleaseTrains, TrainInfo};
pub use error::CatalogError;
pub use source::{CatalogSource, load_catalog};
