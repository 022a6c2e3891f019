//! Deterministic hold rules and data types shared across host and clients.
//!
//! `hold-core` defines the canonical types (records, inventory, configuration)
//! and the pure admissibility rules every participant evaluates. Nothing here
//! is async or engine-aware; supporting crates depend on the types re-exported
//! below.
pub mod admission;
pub mod blacklist;
pub mod catalog;
pub mod config;
pub mod inventory;
pub mod locale;
pub mod record;

pub use admission::{
    Admission, AdmissionContext, CallerRole, DenyReason, OverrideMode, PermissionLevel, evaluate,
};
pub use blacklist::Blacklist;
pub use catalog::{ItemCatalog, ItemCategory, ItemDefinition};
pub use config::HoldConfig;
pub use inventory::Inventory;
pub use locale::{InteractHint, Lexicon, hint};
pub use record::{HeldItem, ItemKindId, ItemRecord};
