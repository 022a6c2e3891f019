//! Loaded message tables implementing the lexicon surface.

use std::collections::HashMap;

use hold_core::Lexicon;

/// Concrete [`Lexicon`] backed by one locale's key/message map.
#[derive(Clone, Debug, Default)]
pub struct LocaleData {
    messages: HashMap<String, String>,
}

impl LocaleData {
    pub fn from_map(messages: HashMap<String, String>) -> Self {
        Self { messages }
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl Lexicon for LocaleData {
    fn resolve(&self, key: &str) -> Option<&str> {
        self.messages.get(key).map(String::as_str)
    }
}
