//! Deposit admissibility rules.
//!
//! One pure function decides whether a would-be deposit may proceed. It is
//! evaluated twice per real deposit: client-side as an advisory check that
//! drives the interaction hint, and host-side as the authoritative gate.
//! Both sides run the same rule order; only the context differs.

use crate::blacklist::Blacklist;
use crate::catalog::{ItemCatalog, ItemCategory};
use crate::record::HeldItem;

/// Which side of the session is asking.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum CallerRole {
    Host,
    Client,
}

/// Who is permitted to deposit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum PermissionLevel {
    #[default]
    Everyone,
    HostOnly,
    ClientsOnly,
    NoOne,
}

/// Debug override for the whole rule chain.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum OverrideMode {
    #[default]
    None,
    /// Force-allow any held candidate.
    Always,
    /// Force-deny everything.
    Never,
}

/// Why a deposit was denied. The static key feeds the lexicon.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::IntoStaticStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum DenyReason {
    NotHolding,
    ForceDisabled,
    PermissionDenied,
    LocationDenied,
    CapacityFull,
    Blacklisted,
    NotAllowed,
}

impl DenyReason {
    pub fn key(self) -> &'static str {
        self.into()
    }
}

/// Outcome of an admissibility check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Admission {
    Allowed,
    Denied(DenyReason),
}

impl Admission {
    pub fn is_allowed(self) -> bool {
        matches!(self, Admission::Allowed)
    }

    pub fn reason(self) -> Option<DenyReason> {
        match self {
            Admission::Allowed => None,
            Admission::Denied(reason) => Some(reason),
        }
    }

    /// Symbolic lexicon key for this outcome.
    pub fn key(self) -> &'static str {
        match self {
            Admission::Allowed => "STORE_ITEM",
            Admission::Denied(reason) => reason.key(),
        }
    }
}

/// Everything one admissibility check reads. Ephemeral, rebuilt per check.
pub struct AdmissionContext<'a> {
    pub role: CallerRole,
    pub occupancy: usize,
    pub capacity: usize,
    pub permission: PermissionLevel,
    pub override_mode: OverrideMode,
    /// Deposits are only legal while the session is in transit.
    pub require_in_transit: bool,
    pub in_transit: bool,
    pub blacklist: &'a Blacklist,
    pub catalog: &'a dyn ItemCatalog,
}

/// Decides whether `candidate` may be deposited under `ctx`.
///
/// Rules run in strict priority order and the first match wins, so any
/// context that violates several rules at once always reports the same
/// reason. Capacity compares with `>=`: lowering the limit below the
/// current occupancy closes the hold instead of re-opening it.
pub fn evaluate(ctx: &AdmissionContext<'_>, candidate: Option<&HeldItem>) -> Admission {
    let Some(held) = candidate else {
        return Admission::Denied(DenyReason::NotHolding);
    };

    match ctx.override_mode {
        OverrideMode::Never => return Admission::Denied(DenyReason::ForceDisabled),
        OverrideMode::Always => return Admission::Allowed,
        OverrideMode::None => {}
    }

    let role_permitted = match ctx.permission {
        PermissionLevel::Everyone => true,
        PermissionLevel::HostOnly => ctx.role == CallerRole::Host,
        PermissionLevel::ClientsOnly => ctx.role == CallerRole::Client,
        PermissionLevel::NoOne => false,
    };
    if !role_permitted {
        return Admission::Denied(DenyReason::PermissionDenied);
    }

    if ctx.require_in_transit && !ctx.in_transit {
        return Admission::Denied(DenyReason::LocationDenied);
    }

    if ctx.occupancy >= ctx.capacity {
        return Admission::Denied(DenyReason::CapacityFull);
    }

    let definition = ctx.catalog.definition(held.kind);

    if let Some(def) = definition {
        if ctx.blacklist.contains(&def.name) {
            return Admission::Denied(DenyReason::Blacklisted);
        }
    }

    let storable =
        definition.is_some_and(|def| def.spawnable && def.category != ItemCategory::Ragdoll);
    if !storable || held.used_up {
        return Admission::Denied(DenyReason::NotAllowed);
    }

    Admission::Allowed
}
