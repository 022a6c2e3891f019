//! Serializable item records and the live-object snapshot they are built from.

/// Stable identity of an item *kind* (not an instance).
///
/// Two identical items share a kind id; the id is derived from the item's
/// definition, so it is stable across sessions for the same content set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ItemKindId(pub i32);

/// Snapshot of a live in-world object at the moment a deposit is attempted.
///
/// Captures everything the admissibility rules and record construction need,
/// so neither has to reach back into the engine's object model.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeldItem {
    pub kind: ItemKindId,
    /// Whether the kind is scrap; only scrap carries an economic value.
    pub is_scrap: bool,
    pub scrap_value: i32,
    /// Extra persisted state, present only when the kind declares save data.
    pub save_state: Option<i32>,
    /// Instance is in a terminal "used up" state (single-use items).
    pub used_up: bool,
    /// Instance was already carrying over from a previous round.
    pub persisted_through_rounds: bool,
}

impl HeldItem {
    pub fn new(kind: ItemKindId) -> Self {
        Self {
            kind,
            is_scrap: false,
            scrap_value: 0,
            save_state: None,
            used_up: false,
            persisted_through_rounds: false,
        }
    }

    pub fn scrap(kind: ItemKindId, value: i32) -> Self {
        Self {
            is_scrap: true,
            scrap_value: value,
            ..Self::new(kind)
        }
    }
}

/// One stored item as held by the authoritative store and carried on the wire.
///
/// Pure data: no behavior beyond construction. Constructed exactly once, at
/// deposit time, from a [`HeldItem`] snapshot; immutable afterwards (there is
/// no `&mut` API). Equality is structural over all fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemRecord {
    pub kind: ItemKindId,
    /// Economic value; zero for non-scrap kinds.
    pub value: i32,
    /// Opaque persisted blob; zero when the kind declares no save data.
    pub save_state: i32,
    pub persisted_through_rounds: bool,
}

impl ItemRecord {
    /// Builds the canonical record for a deposit.
    ///
    /// Value is only taken over for scrap kinds and save state only when the
    /// kind actually declares any, so records of plain items compare equal
    /// regardless of engine-side noise in the snapshot.
    pub fn from_held(held: &HeldItem) -> Self {
        Self {
            kind: held.kind,
            value: if held.is_scrap { held.scrap_value } else { 0 },
            save_state: held.save_state.unwrap_or(0),
            persisted_through_rounds: held.persisted_through_rounds,
        }
    }

    /// A fresh record identical to `self` but marked as carried over.
    ///
    /// Used when a round concludes: stored items survive into the next round
    /// as new record constructions, keeping the type itself immutable.
    pub fn carried_over(self) -> Self {
        Self {
            persisted_through_rounds: true,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_ignores_value_of_non_scrap() {
        let held = HeldItem {
            scrap_value: 55,
            ..HeldItem::new(ItemKindId(3))
        };
        let record = ItemRecord::from_held(&held);
        assert_eq!(record.value, 0);
    }

    #[test]
    fn record_takes_scrap_value_and_save_state() {
        let held = HeldItem {
            save_state: Some(7),
            ..HeldItem::scrap(ItemKindId(3), 55)
        };
        let record = ItemRecord::from_held(&held);
        assert_eq!(record.value, 55);
        assert_eq!(record.save_state, 7);
    }

    #[test]
    fn records_with_identical_fields_are_indistinguishable() {
        let a = ItemRecord::from_held(&HeldItem::scrap(ItemKindId(1), 10));
        let b = ItemRecord::from_held(&HeldItem::scrap(ItemKindId(1), 10));
        assert_eq!(a, b);
    }

    #[test]
    fn carried_over_only_touches_the_round_flag() {
        let record = ItemRecord::from_held(&HeldItem::scrap(ItemKindId(9), 31));
        let carried = record.carried_over();
        assert!(carried.persisted_through_rounds);
        assert_eq!(carried.kind, record.kind);
        assert_eq!(carried.value, record.value);
        assert_eq!(carried.save_state, record.save_state);
    }
}
