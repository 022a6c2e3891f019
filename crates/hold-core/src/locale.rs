//! User-facing strings for admissibility outcomes.

use crate::admission::Admission;

/// Resolves symbolic message keys to localized text.
pub trait Lexicon: Send + Sync {
    fn resolve(&self, key: &str) -> Option<&str>;
}

/// Interaction affordance derived from an admissibility outcome.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InteractHint {
    pub interactable: bool,
    pub tooltip: String,
}

/// Builds the hint a client shows for `admission`.
///
/// Falls back to the raw message key when the lexicon has no entry, so a
/// missing translation degrades to something diagnosable instead of an
/// empty prompt.
pub fn hint(admission: Admission, lexicon: &dyn Lexicon) -> InteractHint {
    let key = admission.key();
    let tooltip = lexicon.resolve(key).unwrap_or(key).to_owned();
    InteractHint {
        interactable: admission.is_allowed(),
        tooltip,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admission::DenyReason;
    use std::collections::HashMap;

    struct StubLexicon(HashMap<&'static str, &'static str>);

    impl Lexicon for StubLexicon {
        fn resolve(&self, key: &str) -> Option<&str> {
            self.0.get(key).copied()
        }
    }

    fn lexicon() -> StubLexicon {
        let mut map = HashMap::new();
        map.insert("STORE_ITEM", "Store item");
        map.insert("CAPACITY_FULL", "The hold is full!");
        StubLexicon(map)
    }

    #[test]
    fn allowed_resolves_to_interactable_hint() {
        let hint = hint(Admission::Allowed, &lexicon());
        assert!(hint.interactable);
        assert_eq!(hint.tooltip, "Store item");
    }

    #[test]
    fn denied_resolves_to_blocked_hint() {
        let hint = hint(Admission::Denied(DenyReason::CapacityFull), &lexicon());
        assert!(!hint.interactable);
        assert_eq!(hint.tooltip, "The hold is full!");
    }

    #[test]
    fn missing_entry_falls_back_to_key() {
        let hint = hint(Admission::Denied(DenyReason::Blacklisted), &lexicon());
        assert!(!hint.interactable);
        assert_eq!(hint.tooltip, "BLACKLISTED");
    }
}
