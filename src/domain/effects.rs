use chrono::{NaiveDate, Utc};
use sea_orm::prelude::DateTimeUtc;
use uuid::Uuid;

use crate::models::profiles::Roles;
use crate::models::{bookings, contracts, notifications, quotes, requests};

/// The user performing a transition, taken from the validated JWT.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: Uuid,
    pub role: Roles,
}

/// Which side of a two-party job an action belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Party {
    Buyer,
    Seller,
}

/// Where a contract came from. Exactly one origin per contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractOrigin {
    Quote { quote_id: Uuid, request_id: Uuid },
    Booking { booking_id: Uuid },
}

/// Everything needed to insert a fresh contract draft.
#[derive(Debug, Clone, PartialEq)]
pub struct NewContract {
    pub buyer_id: Uuid,
    pub seller_id: Uuid,
    pub origin: ContractOrigin,
    pub status: contracts::Status,
    pub warranty_days: i32,
    pub start_date: Option<NaiveDate>,
}

/// A declarative side effect produced by the lifecycle engine.
///
/// The engine never executes anything itself; the dispatcher interprets the
/// list in order. Status changes carry the status the engine read so the
/// store can apply them as compare-and-swap writes.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    SetRequestStatus {
        id: Uuid,
        from: requests::Status,
        to: requests::Status,
    },
    SetQuoteStatus {
        id: Uuid,
        from: quotes::Status,
        to: quotes::Status,
    },
    SetBookingStatus {
        id: Uuid,
        from: bookings::Status,
        to: bookings::Status,
        seller_response: Option<String>,
    },
    SetContractStatus {
        id: Uuid,
        from: contracts::Status,
        to: contracts::Status,
    },
    /// Record one party's signature and move the contract forward in a
    /// single conditional write.
    SignContract {
        id: Uuid,
        side: Party,
        at: DateTimeUtc,
        from: contracts::Status,
        to: contracts::Status,
    },
    AssignSeller {
        request_id: Uuid,
        seller_id: Uuid,
    },
    SetRequestCompletionFlag {
        request_id: Uuid,
        side: Party,
    },
    SetBookingCompletionFlag {
        booking_id: Uuid,
        side: Party,
    },
    CreateContract(NewContract),
    /// Delete a stale unsigned draft for another quote and insert a new one,
    /// atomically at the persistence boundary.
    ReplaceContractDraft {
        stale_contract_id: Uuid,
        new: NewContract,
    },
    /// Reject all live sibling quotes of an accepted quote. Only emitted when
    /// `LifecycleConfig::auto_reject_siblings` is on.
    RejectSiblingQuotes {
        request_id: Uuid,
        accepted_quote_id: Uuid,
    },
    Notify {
        user_id: Uuid,
        kind: notifications::Kind,
        content_id: Option<Uuid>,
    },
}

/// The successful result of a transition: a list of effects for the
/// dispatcher. An empty list means "allowed, nothing to persist" (pure
/// guard checks such as `edit`).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Transition {
    pub effects: Vec<Effect>,
}

impl Transition {
    pub fn new(effects: Vec<Effect>) -> Self {
        Self { effects }
    }

    pub fn none() -> Self {
        Self::default()
    }
}

/// Tunable lifecycle behavior, read once at startup.
#[derive(Debug, Clone, Copy)]
pub struct LifecycleConfig {
    /// Whether accepting a quote auto-rejects its live siblings. Off by
    /// default: siblings stay visible and the accept guard blocks them.
    pub auto_reject_siblings: bool,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            auto_reject_siblings: false,
        }
    }
}

impl LifecycleConfig {
    pub fn from_env() -> Self {
        let auto_reject_siblings = std::env::var("LIFECYCLE_AUTO_REJECT_SIBLINGS")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        Self {
            auto_reject_siblings,
        }
    }
}

/// Convenience for transition code: the current UTC instant.
pub fn now() -> DateTimeUtc {
    Utc::now()
}
