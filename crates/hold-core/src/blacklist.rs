//! Name-based exclusion list, parsed from operator configuration.

use std::collections::BTreeSet;

/// Set of item names barred from storage.
///
/// Parsed once whenever the configuration string changes and consulted on
/// every admissibility check. Matching is case-insensitive on both sides.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Blacklist {
    names: BTreeSet<String>,
}

impl Blacklist {
    /// Parses a comma-separated list of item names.
    ///
    /// Entries are trimmed and lowercased; empty entries are dropped, so
    /// `"radio, , jar"` and `"Radio,Jar"` produce the same set.
    pub fn parse(raw: &str) -> Self {
        let names = raw
            .split(',')
            .map(|entry| entry.trim().to_lowercase())
            .filter(|entry| !entry.is_empty())
            .collect();
        Self { names }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(&name.to_lowercase())
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_trims_and_lowercases() {
        let list = Blacklist::parse(" Radio , Extension ladder,");
        assert_eq!(list.len(), 2);
        assert!(list.contains("radio"));
        assert!(list.contains("RADIO"));
        assert!(list.contains("Extension Ladder"));
        assert!(!list.contains("jar"));
    }

    #[test]
    fn empty_entries_are_dropped() {
        let list = Blacklist::parse(" , ,, ");
        assert!(list.is_empty());
        assert!(!list.contains(""));
    }

    #[test]
    fn reparse_replaces_previous_set() {
        let first = Blacklist::parse("radio");
        let second = Blacklist::parse("jar");
        assert!(first.contains("radio"));
        assert!(!second.contains("radio"));
        assert!(second.contains("jar"));
    }
}
