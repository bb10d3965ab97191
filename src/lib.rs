//! Inventory of Cisco UCS Manager domains and a firmware version check
//! against Cisco's published release trains.
//!
//! # Modules
//!
//! - [`commands`]: Handlers for the `add`, `update`, `delete`, `show` and `run` commands
//! - [`config`]: YAML config file, paths and connection settings
//! - [`crypto`]: Encryption of stored passwords
//! - [`inventory`]: The list of stored domains
//! - [`logging`]: Console and per-run file logging
//! - [`release`]: Release-train catalog lookups
//! - [`report`]: Version collection and report rendering
//! - [`ucs`]: UCS Manager XML API client

pub mod commands;
pub mod config;
pub mod crypto;
pub mod inventory;
pub mod logging;
pub mod release;
pub mod report;
pub mod ucs;
