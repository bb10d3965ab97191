//! Locally persisted inventory of UCS Manager domains
//!
//! Records are identified by their address. The inventory is loaded from the
//! config file on start, mutated by a single command, and written back only
//! when that command changed it.
//!
//! # Modules
//!
//! - [`error`]: Error types for inventory operations
//! - [`record`]: The persisted `DomainRecord`
//! - [`store`]: In-memory `Inventory` with add / update / remove / lookup

pub mod error;
pub mod record;
pub mod store;

pub use error::InventoryError;
pub use record::DomainRecord;
pub use store::Inventory;
