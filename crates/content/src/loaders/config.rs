//! Hold configuration loader.

use std::path::Path;

use hold_core::HoldConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for hold configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a TOML file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the TOML file containing a HoldConfig
    ///
    /// # Returns
    ///
    /// Returns a HoldConfig with unspecified fields defaulted.
    pub fn load(path: &Path) -> LoadResult<HoldConfig> {
        let content = read_file(path)?;
        let config: HoldConfig = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hold_core::PermissionLevel;
    use std::io::Write;

    #[test]
    fn partial_toml_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(
            br#"
capacity = 10
blacklist = "radio, jar"
permission = "HOST_ONLY"
"#,
        )
        .expect("write toml");

        let config = ConfigLoader::load(file.path()).expect("load config");
        assert_eq!(config.capacity, 10);
        assert_eq!(config.blacklist, "radio, jar");
        assert_eq!(config.permission, PermissionLevel::HostOnly);
        assert_eq!(config.spawn_delay_ms, HoldConfig::DEFAULT_SPAWN_DELAY_MS);
        assert_eq!(config.locale, HoldConfig::DEFAULT_LOCALE);
    }

    #[test]
    fn unknown_enum_value_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(br#"permission = "ADMINS_ONLY""#)
            .expect("write toml");

        let result = ConfigLoader::load(file.path());
        assert!(result.is_err());
    }
}
