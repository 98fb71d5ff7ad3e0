//! Transitions on buyer job requests.

use crate::domain::effects::{
    Actor, ContractOrigin, Effect, LifecycleConfig, NewContract, Party, Transition,
};
use crate::domain::error::{DomainError, GuardViolation};
use crate::domain::guards;
use crate::models::contracts::{self, ContractTerms};
use crate::models::notifications::Kind;
use crate::models::{quotes, requests};

pub const DEFAULT_WARRANTY_DAYS: i32 = 30;

/// A seller wants to submit a quote on `request`.
///
/// The request status is unchanged; the caller inserts the quote row after
/// this passes. Effects: notify the buyer.
pub fn submit_quote(
    request: &requests::Model,
    existing_quotes: &[quotes::Model],
    actor: Actor,
) -> Result<Transition, DomainError> {
    if request.status != requests::Status::Open || request.halted {
        return Err(GuardViolation::InvalidTransition.into());
    }
    if request.buyer_id == actor.id {
        return Err(GuardViolation::NotOwner.into());
    }
    if !guards::can_submit_quote(request, actor.id, existing_quotes) {
        return Err(GuardViolation::InvalidStateForEdit.into());
    }

    Ok(Transition::new(vec![Effect::Notify {
        user_id: request.buyer_id,
        kind: Kind::QuoteReceived,
        content_id: Some(request.id),
    }]))
}

/// The buyer accepts `quote`, creating a contract draft for it.
///
/// The request status stays `open` until the contract executes. If an
/// unsigned draft already exists for a *different* quote on this request it
/// is replaced atomically; a contract that any party has signed blocks the
/// acceptance with `AlreadyContracted`.
pub fn accept_quote(
    request: &requests::Model,
    quote: &quotes::Model,
    siblings: &[quotes::Model],
    existing_contract: Option<&contracts::Model>,
    terms: &ContractTerms,
    actor: Actor,
    cfg: LifecycleConfig,
) -> Result<Transition, DomainError> {
    if actor.id != request.buyer_id {
        return Err(GuardViolation::NotOwner.into());
    }
    if quote.request_id != request.id {
        return Err(DomainError::Validation(
            "quote does not belong to this request".into(),
        ));
    }

    // A draft nobody signed yet, created for another quote, is replaceable.
    // Anything further along blocks the acceptance.
    let replaceable = existing_contract.filter(|c| {
        !c.status.is_terminal() && c.status.is_unsigned_draft() && c.quote_id != Some(quote.id)
    });
    let blocking = if replaceable.is_some() {
        None
    } else {
        existing_contract
    };

    if !guards::can_accept_quote(request, quote, siblings, blocking) {
        if blocking.is_some_and(|c| !c.status.is_terminal()) {
            return Err(GuardViolation::AlreadyContracted.into());
        }
        if siblings
            .iter()
            .any(|q| q.id != quote.id && q.status == quotes::Status::Accepted)
        {
            return Err(GuardViolation::QuoteAlreadyAccepted.into());
        }
        return Err(GuardViolation::InvalidTransition.into());
    }

    let new = NewContract {
        buyer_id: request.buyer_id,
        seller_id: quote.seller_id,
        origin: ContractOrigin::Quote {
            quote_id: quote.id,
            request_id: request.id,
        },
        status: contracts::Status::PendingBuyer,
        warranty_days: terms.warranty_days.unwrap_or(DEFAULT_WARRANTY_DAYS),
        start_date: terms.start_date.or(quote.proposed_start_date),
    };

    let mut effects = Vec::new();
    match replaceable {
        Some(stale) => effects.push(Effect::ReplaceContractDraft {
            stale_contract_id: stale.id,
            new,
        }),
        None => effects.push(Effect::CreateContract(new)),
    }
    if cfg.auto_reject_siblings {
        effects.push(Effect::RejectSiblingQuotes {
            request_id: request.id,
            accepted_quote_id: quote.id,
        });
    }
    effects.push(Effect::Notify {
        user_id: quote.seller_id,
        kind: Kind::ContractReady,
        content_id: Some(quote.id),
    });

    Ok(Transition::new(effects))
}

/// Core-field edit check. Produces no effects; the handler applies the patch
/// through the store once this passes.
pub fn edit(
    request: &requests::Model,
    quotes: &[quotes::Model],
    actor: Actor,
) -> Result<Transition, DomainError> {
    if actor.id != request.buyer_id {
        return Err(GuardViolation::NotOwner.into());
    }
    if !guards::can_edit(request, quotes) {
        return Err(GuardViolation::InvalidStateForEdit.into());
    }
    Ok(Transition::none())
}

/// The buyer cancels an open request. A live contract nobody executed yet is
/// voided with it, so a pending signature cannot outlive the request.
pub fn cancel(
    request: &requests::Model,
    live_quotes: &[quotes::Model],
    contract: Option<&contracts::Model>,
    actor: Actor,
) -> Result<Transition, DomainError> {
    if actor.id != request.buyer_id {
        return Err(GuardViolation::NotOwner.into());
    }
    if request.status != requests::Status::Open {
        return Err(GuardViolation::InvalidTransition.into());
    }
    if contract.is_some_and(|c| c.status == contracts::Status::Executed) {
        return Err(GuardViolation::AlreadyContracted.into());
    }

    let mut effects = vec![Effect::SetRequestStatus {
        id: request.id,
        from: requests::Status::Open,
        to: requests::Status::Cancelled,
    }];
    if let Some(c) = contract.filter(|c| !c.status.is_terminal()) {
        effects.push(Effect::SetContractStatus {
            id: c.id,
            from: c.status,
            to: contracts::Status::Cancelled,
        });
    }
    for q in live_quotes.iter().filter(|q| q.status.is_live()) {
        effects.push(Effect::Notify {
            user_id: q.seller_id,
            kind: Kind::QuoteRejected,
            content_id: Some(q.id),
        });
    }
    Ok(Transition::new(effects))
}

/// Deletion guard for an open, uncontracted request. No effects; the handler
/// performs the delete.
pub fn delete(
    request: &requests::Model,
    existing_contract: Option<&contracts::Model>,
    actor: Actor,
) -> Result<Transition, DomainError> {
    if actor.id != request.buyer_id {
        return Err(GuardViolation::NotOwner.into());
    }
    if !guards::can_delete(request, existing_contract) {
        return Err(GuardViolation::InvalidStateForEdit.into());
    }
    Ok(Transition::none())
}

/// One side marks the job done. Requires an executed contract; the request
/// completes only once both sides have flagged.
pub fn mark_complete(
    request: &requests::Model,
    contract: Option<&contracts::Model>,
    side: Party,
    actor: Actor,
) -> Result<Transition, DomainError> {
    let expected_actor = match side {
        Party::Buyer => request.buyer_id,
        Party::Seller => request.assigned_seller_id.ok_or(GuardViolation::InvalidTransition)?,
    };
    if actor.id != expected_actor {
        return Err(GuardViolation::NotOwner.into());
    }
    if request.status != requests::Status::InProgress {
        return Err(GuardViolation::InvalidTransition.into());
    }
    let contract = contract.ok_or(GuardViolation::InvalidTransition)?;
    if contract.status != contracts::Status::Executed {
        return Err(GuardViolation::InvalidTransition.into());
    }

    let (already_flagged, other_flagged, other_user) = match side {
        Party::Buyer => (
            request.buyer_marked_complete,
            request.seller_marked_complete,
            contract.seller_id,
        ),
        Party::Seller => (
            request.seller_marked_complete,
            request.buyer_marked_complete,
            request.buyer_id,
        ),
    };
    if already_flagged {
        return Err(GuardViolation::InvalidTransition.into());
    }

    let mut effects = vec![Effect::SetRequestCompletionFlag {
        request_id: request.id,
        side,
    }];
    if other_flagged {
        effects.push(Effect::SetRequestStatus {
            id: request.id,
            from: requests::Status::InProgress,
            to: requests::Status::Completed,
        });
        effects.push(Effect::Notify {
            user_id: other_user,
            kind: Kind::JobCompleted,
            content_id: Some(request.id),
        });
    } else {
        effects.push(Effect::Notify {
            user_id: other_user,
            kind: Kind::CompletionRequested,
            content_id: Some(request.id),
        });
    }
    Ok(Transition::new(effects))
}

/// New-request validation: bilingual fields may be half-empty but at least
/// one title and one description must exist, and the budget range must be
/// coherent.
pub fn validate_new(input: &requests::CreateRequest) -> Result<(), DomainError> {
    if input.title_ar.as_deref().is_none_or(str::is_empty)
        && input.title_en.as_deref().is_none_or(str::is_empty)
    {
        return Err(DomainError::missing("title"));
    }
    if input.description_ar.as_deref().is_none_or(str::is_empty)
        && input.description_en.as_deref().is_none_or(str::is_empty)
    {
        return Err(DomainError::missing("description"));
    }
    if input.city.is_empty() {
        return Err(DomainError::missing("city"));
    }
    if let (Some(min), Some(max)) = (input.budget_min, input.budget_max)
        && min > max
    {
        return Err(DomainError::Validation(
            "budget_min must not exceed budget_max".into(),
        ));
    }
    Ok(())
}
