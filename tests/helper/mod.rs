//! Shared helpers for integration tests

#![allow(dead_code)]

pub mod config;
pub mod ucs;

pub use config::{create_test_store, write_catalog};
pub use ucs::MockUcsClient;
