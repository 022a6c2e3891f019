use std::time::Duration;

use crate::admission::{OverrideMode, PermissionLevel};

/// Authority configuration for the hold.
///
/// Owned by an external settings surface; the core reads it and re-derives
/// the blacklist set whenever `blacklist` changes.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HoldConfig {
    /// Maximum number of stored records.
    pub capacity: u32,
    /// Comma-separated item names barred from storage.
    pub blacklist: String,
    pub permission: PermissionLevel,
    pub override_mode: OverrideMode,
    /// When set, deposits are only admissible while the session is in
    /// transit.
    pub require_in_transit: bool,
    /// Pacing between released-item events on withdrawal.
    pub spawn_delay_ms: u64,
    /// Treat the hold as no-loss: a wiped round keeps its contents.
    pub safe_container: bool,
    pub locale: String,
}

impl HoldConfig {
    pub const DEFAULT_CAPACITY: u32 = 30;
    pub const DEFAULT_SPAWN_DELAY_MS: u64 = 500;
    pub const DEFAULT_LOCALE: &'static str = "en";

    pub fn new() -> Self {
        Self {
            capacity: Self::DEFAULT_CAPACITY,
            blacklist: String::new(),
            permission: PermissionLevel::Everyone,
            override_mode: OverrideMode::None,
            require_in_transit: false,
            spawn_delay_ms: Self::DEFAULT_SPAWN_DELAY_MS,
            safe_container: false,
            locale: Self::DEFAULT_LOCALE.to_owned(),
        }
    }

    pub fn spawn_delay(&self) -> Duration {
        Duration::from_millis(self.spawn_delay_ms)
    }

    pub fn capacity(&self) -> usize {
        self.capacity as usize
    }
}

impl Default for HoldConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = HoldConfig::default();
        assert_eq!(config.capacity, 30);
        assert_eq!(config.permission, PermissionLevel::Everyone);
        assert_eq!(config.override_mode, OverrideMode::None);
        assert!(!config.require_in_transit);
        assert!(!config.safe_container);
        assert_eq!(config.spawn_delay(), Duration::from_millis(500));
        assert_eq!(config.locale, "en");
        assert!(config.blacklist.is_empty());
    }
}
