//! Transitions on contracts.
//!
//! A contract's status is a function of its signature timestamps, so the
//! signing transitions always move status and timestamp together in one
//! conditional write ([`Effect::SignContract`]).

use sea_orm::prelude::DateTimeUtc;

use crate::domain::effects::{Actor, Effect, Party, Transition};
use crate::domain::error::{DomainError, GuardViolation};
use crate::models::notifications::Kind;
use crate::models::{bookings, contracts, quotes, requests};

/// What the contract was created from, fetched by the caller so the engine
/// can flip the origin entity when the contract executes.
#[derive(Debug, Clone, Copy)]
pub enum Origin<'a> {
    Request {
        request: &'a requests::Model,
        quote: &'a quotes::Model,
    },
    Booking {
        booking: &'a bookings::Model,
    },
}

/// The buyer signs first: `draft`/`pending_buyer` → `pending_seller`.
pub fn buyer_sign(
    contract: &contracts::Model,
    actor: Actor,
    at: DateTimeUtc,
) -> Result<Transition, DomainError> {
    if actor.id != contract.buyer_id {
        return Err(GuardViolation::NotOwner.into());
    }
    if !contract.status.is_unsigned_draft() {
        return Err(GuardViolation::InvalidTransition.into());
    }

    Ok(Transition::new(vec![
        Effect::SignContract {
            id: contract.id,
            side: Party::Buyer,
            at,
            from: contract.status,
            to: contracts::Status::PendingSeller,
        },
        Effect::Notify {
            user_id: contract.seller_id,
            kind: Kind::ContractReady,
            content_id: Some(contract.id),
        },
    ]))
}

/// The seller countersigns: `pending_seller` → `executed`. Executing the
/// contract flips the origin request to `in_progress` (assigning the seller
/// and accepting the winning quote); a booking stays `accepted` and is
/// surfaced as active through its executed contract.
pub fn seller_sign(
    contract: &contracts::Model,
    origin: Origin<'_>,
    actor: Actor,
    at: DateTimeUtc,
) -> Result<Transition, DomainError> {
    if actor.id != contract.seller_id {
        return Err(GuardViolation::NotOwner.into());
    }
    if contract.status != contracts::Status::PendingSeller {
        return Err(GuardViolation::InvalidTransition.into());
    }
    // The origin may have been cancelled between the buyer's signature and
    // now; a countersign on a dead job must not execute the contract.
    match origin {
        Origin::Request { request, .. }
            if matches!(
                request.status,
                requests::Status::Cancelled | requests::Status::Completed
            ) =>
        {
            return Err(GuardViolation::InvalidTransition.into());
        }
        Origin::Booking { booking } if booking.status.is_terminal() => {
            return Err(GuardViolation::InvalidTransition.into());
        }
        _ => {}
    }

    let mut effects = vec![Effect::SignContract {
        id: contract.id,
        side: Party::Seller,
        at,
        from: contracts::Status::PendingSeller,
        to: contracts::Status::Executed,
    }];

    if let Origin::Request { request, quote } = origin {
        if quote.status != quotes::Status::Accepted {
            effects.push(Effect::SetQuoteStatus {
                id: quote.id,
                from: quote.status,
                to: quotes::Status::Accepted,
            });
        }
        if request.status == requests::Status::Open {
            effects.push(Effect::SetRequestStatus {
                id: request.id,
                from: requests::Status::Open,
                to: requests::Status::InProgress,
            });
            effects.push(Effect::AssignSeller {
                request_id: request.id,
                seller_id: contract.seller_id,
            });
        }
    }

    effects.push(Effect::Notify {
        user_id: contract.buyer_id,
        kind: Kind::ContractExecuted,
        content_id: Some(contract.id),
    });
    Ok(Transition::new(effects))
}

/// The seller declines a contract the buyer put in front of them.
pub fn reject(contract: &contracts::Model, actor: Actor) -> Result<Transition, DomainError> {
    if actor.id != contract.seller_id {
        return Err(GuardViolation::NotOwner.into());
    }
    void_transition(contract, contracts::Status::Rejected, contract.buyer_id)
}

/// Either party walks away before execution.
pub fn terminate(contract: &contracts::Model, actor: Actor) -> Result<Transition, DomainError> {
    let other_party = if actor.id == contract.buyer_id {
        contract.seller_id
    } else if actor.id == contract.seller_id {
        contract.buyer_id
    } else {
        return Err(GuardViolation::NotOwner.into());
    };
    let to = if actor.id == contract.buyer_id {
        contracts::Status::Cancelled
    } else {
        contracts::Status::Terminated
    };
    void_transition(contract, to, other_party)
}

fn void_transition(
    contract: &contracts::Model,
    to: contracts::Status,
    notify_user: uuid::Uuid,
) -> Result<Transition, DomainError> {
    if contract.status.is_terminal() || contract.status == contracts::Status::Executed {
        return Err(GuardViolation::InvalidTransition.into());
    }
    Ok(Transition::new(vec![
        Effect::SetContractStatus {
            id: contract.id,
            from: contract.status,
            to,
        },
        Effect::Notify {
            user_id: notify_user,
            kind: Kind::ContractVoided,
            content_id: Some(contract.id),
        },
    ]))
}

/// The executed ⇔ both-signatures invariant, checkable on any snapshot.
pub fn signatures_consistent(contract: &contracts::Model) -> bool {
    match contract.status {
        contracts::Status::Executed => {
            contract.signed_at_buyer.is_some() && contract.signed_at_seller.is_some()
        }
        contracts::Status::PendingSeller => {
            contract.signed_at_buyer.is_some() && contract.signed_at_seller.is_none()
        }
        contracts::Status::Draft | contracts::Status::PendingBuyer => {
            contract.signed_at_buyer.is_none()
        }
        // A voided contract keeps whatever signatures it had.
        _ => true,
    }
}
