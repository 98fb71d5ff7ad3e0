//! Executes the effect list a lifecycle transition returns.
//!
//! Effects are interpreted in order. Status writes go through the store's
//! compare-and-swap helpers and their failures propagate — the business
//! state change must not be silently lost. Notification inserts are
//! fire-and-forget: a failure is logged and swallowed, never failing the
//! transition that produced it.

use sea_orm::DatabaseConnection;
use tracing::warn;
use uuid::Uuid;

use crate::db::{self, StoreError};
use crate::domain::effects::{ContractOrigin, Effect, NewContract, Party};
use crate::events::{DomainEvent, EventBus};
use crate::models::notifications::Kind;

pub async fn dispatch(
    db: &DatabaseConnection,
    bus: &EventBus,
    effects: Vec<Effect>,
) -> Result<(), StoreError> {
    for effect in effects {
        apply(db, bus, effect).await?;
    }
    Ok(())
}

async fn apply(db: &DatabaseConnection, bus: &EventBus, effect: Effect) -> Result<(), StoreError> {
    match effect {
        Effect::SetRequestStatus { id, from, to } => {
            db::requests::set_status(db, id, from, to).await?;
            bus.publish(DomainEvent::RequestChanged { request_id: id });
        }
        Effect::SetQuoteStatus { id, from, to } => {
            db::quotes::set_status(db, id, from, to).await?;
            if let Some(quote) = db::quotes::get_quote_by_id(db, id).await? {
                bus.publish(DomainEvent::QuoteChanged {
                    quote_id: id,
                    request_id: quote.request_id,
                });
            }
        }
        Effect::SetBookingStatus {
            id,
            from,
            to,
            seller_response,
        } => {
            db::bookings::set_status(db, id, from, to, seller_response).await?;
            bus.publish(DomainEvent::BookingChanged { booking_id: id });
        }
        Effect::SetContractStatus { id, from, to } => {
            db::contracts::set_status(db, id, from, to).await?;
            publish_contract_changed(db, bus, id).await?;
        }
        Effect::SignContract {
            id,
            side,
            at,
            from,
            to,
        } => {
            db::contracts::sign(db, id, side, at, from, to).await?;
            publish_contract_changed(db, bus, id).await?;
        }
        Effect::AssignSeller {
            request_id,
            seller_id,
        } => {
            db::requests::assign_seller(db, request_id, seller_id).await?;
            bus.publish(DomainEvent::RequestChanged { request_id });
        }
        Effect::SetRequestCompletionFlag { request_id, side } => {
            db::requests::set_completion_flag(db, request_id, side == Party::Buyer).await?;
            bus.publish(DomainEvent::RequestChanged { request_id });
        }
        Effect::SetBookingCompletionFlag { booking_id, side } => {
            db::bookings::set_completion_flag(db, booking_id, side == Party::Buyer).await?;
            bus.publish(DomainEvent::BookingChanged { booking_id });
        }
        Effect::CreateContract(new) => {
            let created = db::contracts::insert_contract(db, &new).await?;
            publish_new_contract(bus, created.id, &new);
        }
        Effect::ReplaceContractDraft {
            stale_contract_id,
            new,
        } => {
            let created = db::contracts::replace_draft(db, stale_contract_id, &new).await?;
            publish_new_contract(bus, created.id, &new);
        }
        Effect::RejectSiblingQuotes {
            request_id,
            accepted_quote_id,
        } => {
            let rejected =
                db::quotes::reject_siblings(db, request_id, accepted_quote_id).await?;
            if rejected > 0 {
                bus.publish(DomainEvent::RequestChanged { request_id });
            }
        }
        Effect::Notify {
            user_id,
            kind,
            content_id,
        } => {
            let (title, message) = notification_text(kind);
            match db::notifications::insert_notification(
                db,
                user_id,
                title.to_string(),
                message.to_string(),
                kind,
                content_id,
            )
            .await
            {
                Ok(_) => bus.publish(DomainEvent::NotificationCreated { user_id }),
                Err(e) => warn!(%user_id, ?kind, "failed to deliver notification: {e}"),
            }
        }
    }
    Ok(())
}

async fn publish_contract_changed(
    db: &DatabaseConnection,
    bus: &EventBus,
    contract_id: Uuid,
) -> Result<(), StoreError> {
    let contract = db::contracts::get_contract_by_id(db, contract_id).await?;
    bus.publish(DomainEvent::ContractChanged {
        contract_id,
        request_id: contract.as_ref().and_then(|c| c.request_id),
        booking_id: contract.as_ref().and_then(|c| c.booking_id),
    });
    Ok(())
}

fn publish_new_contract(bus: &EventBus, contract_id: Uuid, new: &NewContract) {
    let (request_id, booking_id) = match new.origin {
        ContractOrigin::Quote { request_id, .. } => (Some(request_id), None),
        ContractOrigin::Booking { booking_id } => (None, Some(booking_id)),
    };
    bus.publish(DomainEvent::ContractChanged {
        contract_id,
        request_id,
        booking_id,
    });
}

/// Fallback English copy. Clients localize from `kind`; these strings are
/// what e-mail digests and older app versions show.
fn notification_text(kind: Kind) -> (&'static str, &'static str) {
    match kind {
        Kind::QuoteReceived => ("New quote", "A seller sent a quote on your request."),
        Kind::QuoteAccepted => ("Quote accepted", "Your quote was accepted."),
        Kind::QuoteRejected => ("Quote closed", "A quote was rejected or withdrawn."),
        Kind::NegotiationMessage => ("New counter-offer", "You received a counter-offer."),
        Kind::BookingUpdate => ("Booking update", "Your booking status changed."),
        Kind::ContractReady => ("Contract ready", "A contract is waiting for your signature."),
        Kind::ContractExecuted => ("Contract signed", "Both parties signed; the job is on."),
        Kind::ContractVoided => ("Contract closed", "The contract was cancelled before execution."),
        Kind::CompletionRequested => (
            "Completion requested",
            "The other party marked the job as done. Please confirm.",
        ),
        Kind::JobCompleted => ("Job completed", "Both parties confirmed completion."),
    }
}
