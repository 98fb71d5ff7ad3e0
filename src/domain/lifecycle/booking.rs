//! Transitions on direct bookings.

use crate::domain::effects::{
    Actor, ContractOrigin, Effect, NewContract, Party, Transition,
};
use crate::domain::error::{DomainError, GuardViolation};
use crate::models::contracts;
use crate::models::notifications::Kind;
use crate::models::bookings::{self, SellerAction};

use super::request::DEFAULT_WARRANTY_DAYS;

/// The seller answers a booking that awaits them (`pending` or
/// `buyer_countered`). Accepting creates a contract draft for the buyer to
/// sign.
pub fn respond(
    booking: &bookings::Model,
    action: SellerAction,
    message: Option<String>,
    actor: Actor,
) -> Result<Transition, DomainError> {
    if actor.id != booking.seller_id {
        return Err(GuardViolation::NotOwner.into());
    }
    if !booking.status.awaits_seller() {
        return Err(GuardViolation::InvalidTransition.into());
    }

    let to = match action {
        SellerAction::Accept => bookings::Status::Accepted,
        SellerAction::Decline => bookings::Status::Declined,
        SellerAction::Counter => bookings::Status::CounterProposed,
    };

    let mut effects = vec![Effect::SetBookingStatus {
        id: booking.id,
        from: booking.status,
        to,
        seller_response: message,
    }];
    if action == SellerAction::Accept {
        effects.push(Effect::CreateContract(NewContract {
            buyer_id: booking.buyer_id,
            seller_id: booking.seller_id,
            origin: ContractOrigin::Booking {
                booking_id: booking.id,
            },
            status: contracts::Status::PendingBuyer,
            warranty_days: DEFAULT_WARRANTY_DAYS,
            start_date: booking.start_date,
        }));
    }
    effects.push(Effect::Notify {
        user_id: booking.buyer_id,
        kind: Kind::BookingUpdate,
        content_id: Some(booking.id),
    });
    Ok(Transition::new(effects))
}

/// The buyer counters a seller's counter-proposal, putting the ball back in
/// the seller's court.
pub fn buyer_counter(booking: &bookings::Model, actor: Actor) -> Result<Transition, DomainError> {
    if actor.id != booking.buyer_id {
        return Err(GuardViolation::NotOwner.into());
    }
    if booking.status != bookings::Status::CounterProposed {
        return Err(GuardViolation::InvalidTransition.into());
    }

    Ok(Transition::new(vec![
        Effect::SetBookingStatus {
            id: booking.id,
            from: bookings::Status::CounterProposed,
            to: bookings::Status::BuyerCountered,
            seller_response: None,
        },
        Effect::Notify {
            user_id: booking.seller_id,
            kind: Kind::BookingUpdate,
            content_id: Some(booking.id),
        },
    ]))
}

/// The buyer withdraws a booking that is not yet done. An accepted booking
/// may still be cancelled as long as its contract has not executed.
pub fn cancel(
    booking: &bookings::Model,
    contract: Option<&contracts::Model>,
    actor: Actor,
) -> Result<Transition, DomainError> {
    if actor.id != booking.buyer_id {
        return Err(GuardViolation::NotOwner.into());
    }
    if booking.status.is_terminal() {
        return Err(GuardViolation::InvalidTransition.into());
    }
    if contract.is_some_and(|c| c.status == contracts::Status::Executed) {
        return Err(GuardViolation::AlreadyContracted.into());
    }

    let mut effects = vec![Effect::SetBookingStatus {
        id: booking.id,
        from: booking.status,
        to: bookings::Status::Cancelled,
        seller_response: None,
    }];
    if let Some(c) = contract.filter(|c| !c.status.is_terminal()) {
        effects.push(Effect::SetContractStatus {
            id: c.id,
            from: c.status,
            to: contracts::Status::Cancelled,
        });
    }
    effects.push(Effect::Notify {
        user_id: booking.seller_id,
        kind: Kind::BookingUpdate,
        content_id: Some(booking.id),
    });
    Ok(Transition::new(effects))
}

/// One side marks the booked job done; the booking completes once both
/// sides have flagged. Requires an executed contract.
pub fn mark_complete(
    booking: &bookings::Model,
    contract: Option<&contracts::Model>,
    side: Party,
    actor: Actor,
) -> Result<Transition, DomainError> {
    let expected_actor = match side {
        Party::Buyer => booking.buyer_id,
        Party::Seller => booking.seller_id,
    };
    if actor.id != expected_actor {
        return Err(GuardViolation::NotOwner.into());
    }
    if booking.status != bookings::Status::Accepted {
        return Err(GuardViolation::InvalidTransition.into());
    }
    let contract = contract.ok_or(GuardViolation::InvalidTransition)?;
    if contract.status != contracts::Status::Executed {
        return Err(GuardViolation::InvalidTransition.into());
    }

    let (already_flagged, other_flagged, other_user) = match side {
        Party::Buyer => (
            booking.buyer_marked_complete,
            booking.seller_marked_complete,
            booking.seller_id,
        ),
        Party::Seller => (
            booking.seller_marked_complete,
            booking.buyer_marked_complete,
            booking.buyer_id,
        ),
    };
    if already_flagged {
        return Err(GuardViolation::InvalidTransition.into());
    }

    let mut effects = vec![Effect::SetBookingCompletionFlag {
        booking_id: booking.id,
        side,
    }];
    if other_flagged {
        effects.push(Effect::SetBookingStatus {
            id: booking.id,
            from: bookings::Status::Accepted,
            to: bookings::Status::Completed,
            seller_response: None,
        });
        effects.push(Effect::Notify {
            user_id: other_user,
            kind: Kind::JobCompleted,
            content_id: Some(booking.id),
        });
    } else {
        effects.push(Effect::Notify {
            user_id: other_user,
            kind: Kind::CompletionRequested,
            content_id: Some(booking.id),
        });
    }
    Ok(Transition::new(effects))
}

/// New-booking validation.
pub fn validate_new(input: &bookings::CreateBooking, buyer_id: uuid::Uuid) -> Result<(), DomainError> {
    if input.seller_id == buyer_id {
        return Err(DomainError::Validation(
            "cannot book your own services".into(),
        ));
    }
    if input.description.trim().is_empty() {
        return Err(DomainError::missing("description"));
    }
    if input.city.is_empty() {
        return Err(DomainError::missing("city"));
    }
    if let (Some(start), Some(end)) = (input.start_date, input.end_date)
        && start > end
    {
        return Err(DomainError::Validation(
            "start_date must not be after end_date".into(),
        ));
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
