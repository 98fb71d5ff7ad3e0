//! Transitions on seller quotes.
//!
//! Acceptance lives in [`super::request::accept_quote`] because it is the
//! request that owns the decision; a quote flips to `accepted` only when its
//! contract executes (see [`super::contract::seller_sign`]).

use crate::domain::effects::{Actor, Effect, Transition};
use crate::domain::error::{DomainError, GuardViolation};
use crate::models::notifications::Kind;
use crate::models::{quotes, requests};

/// Reject a quote. The buyer rejects someone else's offer; the seller
/// withdraws their own. Rejected is terminal.
pub fn reject(
    quote: &quotes::Model,
    request: &requests::Model,
    actor: Actor,
) -> Result<Transition, DomainError> {
    let is_buyer = actor.id == request.buyer_id;
    let is_seller = actor.id == quote.seller_id;
    if !is_buyer && !is_seller {
        return Err(GuardViolation::NotOwner.into());
    }
    if quote.status.is_terminal() || quote.status == quotes::Status::Accepted {
        return Err(GuardViolation::InvalidTransition.into());
    }

    let other_party = if is_buyer { quote.seller_id } else { request.buyer_id };
    Ok(Transition::new(vec![
        Effect::SetQuoteStatus {
            id: quote.id,
            from: quote.status,
            to: quotes::Status::Rejected,
        },
        Effect::Notify {
            user_id: other_party,
            kind: Kind::QuoteRejected,
            content_id: Some(quote.id),
        },
    ]))
}

/// Either party counters on a pending or negotiating quote. The caller
/// inserts the negotiation row; the first counter moves the quote to
/// `negotiating`.
pub fn counter(
    quote: &quotes::Model,
    request: &requests::Model,
    actor: Actor,
) -> Result<Transition, DomainError> {
    let is_buyer = actor.id == request.buyer_id;
    let is_seller = actor.id == quote.seller_id;
    if !is_buyer && !is_seller {
        return Err(GuardViolation::NotOwner.into());
    }
    if !matches!(
        quote.status,
        quotes::Status::Pending | quotes::Status::Negotiating
    ) {
        return Err(GuardViolation::InvalidTransition.into());
    }

    let mut effects = Vec::new();
    if quote.status == quotes::Status::Pending {
        effects.push(Effect::SetQuoteStatus {
            id: quote.id,
            from: quotes::Status::Pending,
            to: quotes::Status::Negotiating,
        });
    }
    let other_party = if is_buyer { quote.seller_id } else { request.buyer_id };
    effects.push(Effect::Notify {
        user_id: other_party,
        kind: Kind::NegotiationMessage,
        content_id: Some(quote.id),
    });
    Ok(Transition::new(effects))
}

/// New-quote validation.
pub fn validate_new(input: &quotes::CreateQuote) -> Result<(), DomainError> {
    if input.proposal.trim().is_empty() {
        return Err(DomainError::missing("proposal"));
    }
    if input.price <= 0.0 {
        return Err(DomainError::Validation("price must be positive".into()));
    }
    if input.estimated_days <= 0 {
        return Err(DomainError::Validation(
            "estimated_days must be positive".into(),
        ));
    }
    Ok(())
}
