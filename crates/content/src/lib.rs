//! Data-driven content for the hold and loaders for its files.
//!
//! This crate houses the concrete catalog and locale data types and provides
//! loaders that turn files into them:
//! - Item catalogs (data-driven via RON)
//! - Hold configuration (data-driven via TOML)
//! - Locale message tables (data-driven via JSON, with fallback)
//!
//! Content is consumed by the session at assembly time and never appears in
//! replicated state.

pub mod catalog;
pub mod locale;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use catalog::CatalogData;
pub use locale::LocaleData;

#[cfg(feature = "loaders")]
pub use loaders::{CatalogLoader, ConfigLoader, LocaleLoader};
