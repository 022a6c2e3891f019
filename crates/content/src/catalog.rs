//! Indexed item catalog backed by loaded definitions.

use std::collections::HashMap;

use hold_core::{ItemCatalog, ItemDefinition, ItemKindId};

/// Concrete [`ItemCatalog`] built from a list of definitions.
///
/// Later definitions for the same kind override earlier ones, so content
/// packs can be layered.
#[derive(Clone, Debug, Default)]
pub struct CatalogData {
    definitions: Vec<ItemDefinition>,
    index: HashMap<ItemKindId, usize>,
}

impl CatalogData {
    pub fn from_definitions(definitions: Vec<ItemDefinition>) -> Self {
        let mut index = HashMap::with_capacity(definitions.len());
        for (position, definition) in definitions.iter().enumerate() {
            index.insert(definition.kind, position);
        }
        Self { definitions, index }
    }

    pub fn definitions(&self) -> &[ItemDefinition] {
        &self.definitions
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl ItemCatalog for CatalogData {
    fn definition(&self, kind: ItemKindId) -> Option<&ItemDefinition> {
        self.index
            .get(&kind)
            .and_then(|&position| self.definitions.get(position))
    }
}
