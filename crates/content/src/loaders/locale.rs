//! Locale message loader.

use std::collections::HashMap;
use std::path::Path;

use hold_core::HoldConfig;

use crate::loaders::{LoadResult, read_file};
use crate::locale::LocaleData;

/// Loader for locale message tables from JSON files.
///
/// Each locale is one flat `{"KEY": "message"}` file named `<locale>.json`.
pub struct LocaleLoader;

impl LocaleLoader {
    /// Load one locale file.
    pub fn load(path: &Path) -> LoadResult<LocaleData> {
        let content = read_file(path)?;
        let messages: HashMap<String, String> = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse locale JSON: {}", e))?;

        Ok(LocaleData::from_map(messages))
    }

    /// Load `<locale>.json` from `dir`, falling back to the default locale
    /// when the requested file does not exist.
    pub fn load_locale(dir: &Path, locale: &str) -> LoadResult<LocaleData> {
        let requested = dir.join(format!("{locale}.json"));
        if requested.is_file() {
            return Self::load(&requested);
        }

        let fallback = dir.join(format!("{}.json", HoldConfig::DEFAULT_LOCALE));
        Self::load(&fallback).map_err(|e| {
            anyhow::anyhow!("Locale '{}' unavailable and fallback failed: {}", locale, e)
        })
    }
}
