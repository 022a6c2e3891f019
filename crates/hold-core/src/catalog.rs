//! Item kind definitions and the lookup seam the rest of the system uses.

use crate::record::ItemKindId;

/// Read-only lookup of item kind definitions.
///
/// The authoritative process and every client resolve kinds through this
/// trait; concrete implementations are assembled by the embedder (content
/// files, test stubs).
pub trait ItemCatalog: Send + Sync {
    fn definition(&self, kind: ItemKindId) -> Option<&ItemDefinition>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemDefinition {
    pub kind: ItemKindId,
    /// Display name; also the string the blacklist matches against.
    pub name: String,
    pub is_scrap: bool,
    /// Kind declares extra save data (record `save_state` is meaningful).
    pub saves_state: bool,
    /// Kind has a valid spawn template and can re-enter the world.
    pub spawnable: bool,
    pub category: ItemCategory,
}

impl ItemDefinition {
    pub fn new(kind: ItemKindId, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            is_scrap: false,
            saves_state: false,
            spawnable: true,
            category: ItemCategory::Standard,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemCategory {
    Standard,
    /// Ragdoll-derived props are categorically excluded from storage.
    Ragdoll,
    Custom(u16),
}
