//! UCS Manager access
//!
//! Only the three XML API calls this tool needs are implemented: log in,
//! read the running system firmware version, log out.
//!
//! # Modules
//!
//! - [`client`]: `UcsClient` trait and the `Session` handle
//! - [`error`]: Error types for UCS Manager calls
//! - [`firmware`]: Parsing of UCS Manager version strings like `4.2(3d)`
//! - [`xml_api`]: `UcsClient` implementation over the XML API

pub mod client;
pub mod error;
pub mod firmware;
pub mod xml_api;

pub use client::{Session, UcsClient};
pub use error::UcsError;
pub use firmware::FirmwareVersion;
pub use xml_api::XmlApiClient;
