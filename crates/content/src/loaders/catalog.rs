//! Item catalog loader.

use std::path::Path;

use hold_core::ItemDefinition;
use serde::{Deserialize, Serialize};

use crate::catalog::CatalogData;
use crate::loaders::{LoadResult, read_file};

/// Catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogFile {
    pub items: Vec<ItemDefinition>,
}

/// Loader for item catalogs from RON files.
pub struct CatalogLoader;

impl CatalogLoader {
    /// Load an item catalog from a RON file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the RON file containing a CatalogFile
    ///
    /// # Returns
    ///
    /// Returns an indexed CatalogData.
    pub fn load(path: &Path) -> LoadResult<CatalogData> {
        let content = read_file(path)?;
        let file: CatalogFile = ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse item catalog RON: {}", e))?;

        Ok(CatalogData::from_definitions(file.items))
    }
}
