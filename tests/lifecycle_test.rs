///! Integration tests for the request/quote/booking/contract lifecycle.
///!
///! These exercise the pure transition engine on entity snapshots: effects
///! are inspected directly instead of being dispatched, so no database is
///! needed.
///!
///! Run with: `cargo test --test lifecycle_test`
use chrono::Utc;
use uuid::Uuid;

use khidma_backend::domain::effects::{Actor, Effect, LifecycleConfig, Party};
use khidma_backend::domain::lifecycle::contract::{self, Origin, signatures_consistent};
use khidma_backend::domain::lifecycle::{booking, quote, request};
use khidma_backend::domain::{DomainError, GuardViolation};
use khidma_backend::models::bookings::{SellerAction, Status as BookingStatus};
use khidma_backend::models::contracts::{ContractTerms, Status as ContractStatus};
use khidma_backend::models::profiles::Roles;
use khidma_backend::models::quotes::Status as QuoteStatus;
use khidma_backend::models::requests::Status as RequestStatus;
use khidma_backend::testing::{booking_fixture, contract_fixture, quote_fixture, request_fixture};

fn buyer_of(request: &khidma_backend::models::requests::Model) -> Actor {
    Actor {
        id: request.buyer_id,
        role: Roles::Buyer,
    }
}

fn seller(id: Uuid) -> Actor {
    Actor {
        id,
        role: Roles::Seller,
    }
}

fn default_terms() -> ContractTerms {
    ContractTerms {
        warranty_days: None,
        start_date: None,
    }
}

#[test]
fn accept_quote_creates_pending_buyer_contract() {
    let req = request_fixture(RequestStatus::Open);
    let q = quote_fixture(req.id, QuoteStatus::Pending);

    let transition = request::accept_quote(
        &req,
        &q,
        std::slice::from_ref(&q),
        None,
        &default_terms(),
        buyer_of(&req),
        LifecycleConfig::default(),
    )
    .unwrap();

    let created = transition
        .effects
        .iter()
        .find_map(|e| match e {
            Effect::CreateContract(new) => Some(new),
            _ => None,
        })
        .expect("contract draft effect");
    assert_eq!(created.status, ContractStatus::PendingBuyer);
    assert_eq!(created.seller_id, q.seller_id);

    // The request itself stays open until the contract executes.
    assert!(
        !transition
            .effects
            .iter()
            .any(|e| matches!(e, Effect::SetRequestStatus { .. }))
    );
}

#[test]
fn accept_quote_replaces_unsigned_draft_for_other_quote() {
    let req = request_fixture(RequestStatus::Open);
    let first = quote_fixture(req.id, QuoteStatus::Pending);
    let second = quote_fixture(req.id, QuoteStatus::Pending);

    let mut draft = contract_fixture(req.buyer_id, first.seller_id, ContractStatus::PendingBuyer);
    draft.request_id = Some(req.id);
    draft.quote_id = Some(first.id);

    let transition = request::accept_quote(
        &req,
        &second,
        &[first.clone(), second.clone()],
        Some(&draft),
        &default_terms(),
        buyer_of(&req),
        LifecycleConfig::default(),
    )
    .unwrap();

    match &transition.effects[0] {
        Effect::ReplaceContractDraft {
            stale_contract_id,
            new,
        } => {
            assert_eq!(*stale_contract_id, draft.id);
            assert_eq!(new.seller_id, second.seller_id);
        }
        other => panic!("expected draft replacement, got {other:?}"),
    }
}

#[test]
fn accept_quote_blocked_once_any_party_signed() {
    let req = request_fixture(RequestStatus::Open);
    let first = quote_fixture(req.id, QuoteStatus::Pending);
    let second = quote_fixture(req.id, QuoteStatus::Pending);

    // Buyer already signed the first quote's contract, so it is no longer a
    // replaceable draft.
    let mut signed = contract_fixture(req.buyer_id, first.seller_id, ContractStatus::PendingSeller);
    signed.request_id = Some(req.id);
    signed.quote_id = Some(first.id);

    let err = request::accept_quote(
        &req,
        &second,
        &[first, second.clone()],
        Some(&signed),
        &default_terms(),
        buyer_of(&req),
        LifecycleConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Guard(GuardViolation::AlreadyContracted)
    ));
}

#[test]
fn accept_quote_blocked_by_accepted_sibling() {
    let req = request_fixture(RequestStatus::Open);
    let accepted = quote_fixture(req.id, QuoteStatus::Accepted);
    let challenger = quote_fixture(req.id, QuoteStatus::Pending);

    let err = request::accept_quote(
        &req,
        &challenger,
        &[accepted, challenger.clone()],
        None,
        &default_terms(),
        buyer_of(&req),
        LifecycleConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Guard(GuardViolation::QuoteAlreadyAccepted)
    ));
}

#[test]
fn sibling_auto_reject_is_config_gated() {
    let req = request_fixture(RequestStatus::Open);
    let q = quote_fixture(req.id, QuoteStatus::Pending);

    let without = request::accept_quote(
        &req,
        &q,
        std::slice::from_ref(&q),
        None,
        &default_terms(),
        buyer_of(&req),
        LifecycleConfig::default(),
    )
    .unwrap();
    assert!(
        !without
            .effects
            .iter()
            .any(|e| matches!(e, Effect::RejectSiblingQuotes { .. }))
    );

    let with = request::accept_quote(
        &req,
        &q,
        std::slice::from_ref(&q),
        None,
        &default_terms(),
        buyer_of(&req),
        LifecycleConfig {
            auto_reject_siblings: true,
        },
    )
    .unwrap();
    assert!(
        with.effects
            .iter()
            .any(|e| matches!(e, Effect::RejectSiblingQuotes { .. }))
    );
}

#[test]
fn edit_fails_with_invalid_state_once_quoted() {
    let req = request_fixture(RequestStatus::Open);
    let q = quote_fixture(req.id, QuoteStatus::Pending);

    let err = request::edit(&req, std::slice::from_ref(&q), buyer_of(&req)).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Guard(GuardViolation::InvalidStateForEdit)
    ));

    // All quotes rejected: the lock releases.
    let mut rejected = q;
    rejected.status = QuoteStatus::Rejected;
    assert!(request::edit(&req, &[rejected], buyer_of(&req)).is_ok());
}

#[test]
fn full_happy_path_executes_contract_and_starts_job() {
    let mut req = request_fixture(RequestStatus::Open);
    let q = quote_fixture(req.id, QuoteStatus::Pending);

    // Buyer accepts, draft appears.
    let accept = request::accept_quote(
        &req,
        &q,
        std::slice::from_ref(&q),
        None,
        &default_terms(),
        buyer_of(&req),
        LifecycleConfig::default(),
    )
    .unwrap();
    let new = accept
        .effects
        .iter()
        .find_map(|e| match e {
            Effect::CreateContract(new) => Some(new.clone()),
            _ => None,
        })
        .unwrap();

    // Materialize the draft as the store would.
    let mut contract = contract_fixture(new.buyer_id, new.seller_id, ContractStatus::PendingBuyer);
    contract.request_id = Some(req.id);
    contract.quote_id = Some(q.id);

    // Buyer signs.
    let buyer_sign = contract::buyer_sign(&contract, buyer_of(&req), Utc::now()).unwrap();
    match &buyer_sign.effects[0] {
        Effect::SignContract { side, to, .. } => {
            assert_eq!(*side, Party::Buyer);
            assert_eq!(*to, ContractStatus::PendingSeller);
        }
        other => panic!("expected signature effect, got {other:?}"),
    }
    contract.status = ContractStatus::PendingSeller;
    contract.signed_at_buyer = Some(Utc::now());
    assert!(signatures_consistent(&contract));

    // Seller countersigns: contract executes, request flips to in_progress,
    // quote flips to accepted, seller gets assigned.
    let seller_sign = contract::seller_sign(
        &contract,
        Origin::Request {
            request: &req,
            quote: &q,
        },
        seller(contract.seller_id),
        Utc::now(),
    )
    .unwrap();

    assert!(seller_sign.effects.iter().any(|e| matches!(
        e,
        Effect::SignContract {
            side: Party::Seller,
            to: ContractStatus::Executed,
            ..
        }
    )));
    assert!(seller_sign.effects.iter().any(|e| matches!(
        e,
        Effect::SetQuoteStatus {
            to: QuoteStatus::Accepted,
            ..
        }
    )));
    assert!(seller_sign.effects.iter().any(|e| matches!(
        e,
        Effect::SetRequestStatus {
            to: RequestStatus::InProgress,
            ..
        }
    )));
    assert!(
        seller_sign
            .effects
            .iter()
            .any(|e| matches!(e, Effect::AssignSeller { .. }))
    );

    contract.status = ContractStatus::Executed;
    contract.signed_at_seller = Some(Utc::now());
    assert!(signatures_consistent(&contract));

    // Both sides mark complete; the second flag completes the request.
    req.status = RequestStatus::InProgress;
    req.assigned_seller_id = Some(contract.seller_id);

    let first = request::mark_complete(&req, Some(&contract), Party::Buyer, buyer_of(&req)).unwrap();
    assert!(
        !first
            .effects
            .iter()
            .any(|e| matches!(e, Effect::SetRequestStatus { .. }))
    );
    req.buyer_marked_complete = true;

    let second = request::mark_complete(
        &req,
        Some(&contract),
        Party::Seller,
        seller(contract.seller_id),
    )
    .unwrap();
    assert!(second.effects.iter().any(|e| matches!(
        e,
        Effect::SetRequestStatus {
            to: RequestStatus::Completed,
            ..
        }
    )));
}

#[test]
fn seller_cannot_sign_before_buyer() {
    let contract = contract_fixture(Uuid::new_v4(), Uuid::new_v4(), ContractStatus::PendingBuyer);
    let req = request_fixture(RequestStatus::Open);
    let q = quote_fixture(req.id, QuoteStatus::Pending);

    let err = contract::seller_sign(
        &contract,
        Origin::Request {
            request: &req,
            quote: &q,
        },
        seller(contract.seller_id),
        Utc::now(),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Guard(GuardViolation::InvalidTransition)
    ));
}

#[test]
fn terminate_direction_depends_on_actor() {
    let buyer_id = Uuid::new_v4();
    let seller_id = Uuid::new_v4();
    let contract = contract_fixture(buyer_id, seller_id, ContractStatus::PendingSeller);

    let by_buyer = contract::terminate(
        &contract,
        Actor {
            id: buyer_id,
            role: Roles::Buyer,
        },
    )
    .unwrap();
    assert!(by_buyer.effects.iter().any(|e| matches!(
        e,
        Effect::SetContractStatus {
            to: ContractStatus::Cancelled,
            ..
        }
    )));

    let by_seller = contract::terminate(&contract, seller(seller_id)).unwrap();
    assert!(by_seller.effects.iter().any(|e| matches!(
        e,
        Effect::SetContractStatus {
            to: ContractStatus::Terminated,
            ..
        }
    )));
}

#[test]
fn executed_contract_cannot_be_terminated() {
    let contract = contract_fixture(Uuid::new_v4(), Uuid::new_v4(), ContractStatus::Executed);
    let err = contract::terminate(
        &contract,
        Actor {
            id: contract.buyer_id,
            role: Roles::Buyer,
        },
    )
    .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Guard(GuardViolation::InvalidTransition)
    ));
}

#[test]
fn quote_counter_moves_pending_to_negotiating_once() {
    let req = request_fixture(RequestStatus::Open);
    let q = quote_fixture(req.id, QuoteStatus::Pending);

    let first = quote::counter(&q, &req, buyer_of(&req)).unwrap();
    assert!(first.effects.iter().any(|e| matches!(
        e,
        Effect::SetQuoteStatus {
            to: QuoteStatus::Negotiating,
            ..
        }
    )));

    let mut negotiating = q;
    negotiating.status = QuoteStatus::Negotiating;
    let second = quote::counter(&negotiating, &req, seller(negotiating.seller_id)).unwrap();
    assert!(
        !second
            .effects
            .iter()
            .any(|e| matches!(e, Effect::SetQuoteStatus { .. }))
    );
}

#[test]
fn booking_accept_creates_contract_draft() {
    let b = booking_fixture(BookingStatus::Pending);

    let transition = booking::respond(
        &b,
        SellerAction::Accept,
        Some("Can start Sunday".to_string()),
        seller(b.seller_id),
    )
    .unwrap();

    assert!(transition.effects.iter().any(|e| matches!(
        e,
        Effect::SetBookingStatus {
            to: BookingStatus::Accepted,
            ..
        }
    )));
    let new = transition
        .effects
        .iter()
        .find_map(|e| match e {
            Effect::CreateContract(new) => Some(new),
            _ => None,
        })
        .expect("contract draft effect");
    assert_eq!(new.status, ContractStatus::PendingBuyer);
}

#[test]
fn booking_counter_round_trip() {
    let b = booking_fixture(BookingStatus::Pending);

    let countered = booking::respond(
        &b,
        SellerAction::Counter,
        Some("Double the price for same-day".to_string()),
        seller(b.seller_id),
    )
    .unwrap();
    assert!(countered.effects.iter().any(|e| matches!(
        e,
        Effect::SetBookingStatus {
            to: BookingStatus::CounterProposed,
            ..
        }
    )));

    let mut b2 = b;
    b2.status = BookingStatus::CounterProposed;
    let back = booking::buyer_counter(
        &b2,
        Actor {
            id: b2.buyer_id,
            role: Roles::Buyer,
        },
    )
    .unwrap();
    assert!(back.effects.iter().any(|e| matches!(
        e,
        Effect::SetBookingStatus {
            to: BookingStatus::BuyerCountered,
            ..
        }
    )));

    // Back in the seller's court.
    b2.status = BookingStatus::BuyerCountered;
    assert!(
        booking::respond(&b2, SellerAction::Accept, None, seller(b2.seller_id)).is_ok()
    );
}

#[test]
fn booking_cancel_blocked_after_execution() {
    let b = booking_fixture(BookingStatus::Accepted);
    let mut contract = contract_fixture(b.buyer_id, b.seller_id, ContractStatus::Executed);
    contract.booking_id = Some(b.id);

    let err = booking::cancel(
        &b,
        Some(&contract),
        Actor {
            id: b.buyer_id,
            role: Roles::Buyer,
        },
    )
    .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Guard(GuardViolation::AlreadyContracted)
    ));
}

#[test]
fn booking_cancel_voids_live_draft() {
    let b = booking_fixture(BookingStatus::Accepted);
    let mut contract = contract_fixture(b.buyer_id, b.seller_id, ContractStatus::PendingBuyer);
    contract.booking_id = Some(b.id);

    let transition = booking::cancel(
        &b,
        Some(&contract),
        Actor {
            id: b.buyer_id,
            role: Roles::Buyer,
        },
    )
    .unwrap();
    assert!(transition.effects.iter().any(|e| matches!(
        e,
        Effect::SetContractStatus {
            to: ContractStatus::Cancelled,
            ..
        }
    )));
}

#[test]
fn request_cancel_voids_live_contract_and_blocks_late_countersign() {
    let mut req = request_fixture(RequestStatus::Open);
    let q = quote_fixture(req.id, QuoteStatus::Pending);
    let mut contract = contract_fixture(req.buyer_id, q.seller_id, ContractStatus::PendingSeller);
    contract.request_id = Some(req.id);
    contract.quote_id = Some(q.id);

    // Cancelling the request must take the pending contract down with it.
    let transition = request::cancel(
        &req,
        std::slice::from_ref(&q),
        Some(&contract),
        buyer_of(&req),
    )
    .unwrap();
    assert!(transition.effects.iter().any(|e| matches!(
        e,
        Effect::SetContractStatus {
            to: ContractStatus::Cancelled,
            ..
        }
    )));

    // A countersign racing the cancellation sees the cancelled request and
    // is rejected instead of executing the contract.
    req.status = RequestStatus::Cancelled;
    let err = contract::seller_sign(
        &contract,
        Origin::Request {
            request: &req,
            quote: &q,
        },
        seller(contract.seller_id),
        Utc::now(),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Guard(GuardViolation::InvalidTransition)
    ));
}

#[test]
fn request_cancel_blocked_once_contract_executed() {
    let req = request_fixture(RequestStatus::Open);
    let q = quote_fixture(req.id, QuoteStatus::Accepted);
    let mut contract = contract_fixture(req.buyer_id, q.seller_id, ContractStatus::Executed);
    contract.request_id = Some(req.id);

    let err = request::cancel(
        &req,
        std::slice::from_ref(&q),
        Some(&contract),
        buyer_of(&req),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Guard(GuardViolation::AlreadyContracted)
    ));
}

#[test]
fn status_effects_carry_the_snapshot_status_for_cas() {
    // Every status effect records the status the engine read; the store
    // conditions its UPDATE on it, so a transition computed from a stale
    // snapshot matches zero rows instead of clobbering a concurrent write.
    let req = request_fixture(RequestStatus::Open);
    let q = quote_fixture(req.id, QuoteStatus::Negotiating);

    let transition = quote::reject(&q, &req, buyer_of(&req)).unwrap();
    match &transition.effects[0] {
        Effect::SetQuoteStatus { from, .. } => assert_eq!(*from, QuoteStatus::Negotiating),
        other => panic!("expected status effect, got {other:?}"),
    }

    let b = booking_fixture(BookingStatus::BuyerCountered);
    let transition = booking::respond(&b, SellerAction::Decline, None, seller(b.seller_id)).unwrap();
    match &transition.effects[0] {
        Effect::SetBookingStatus { from, .. } => assert_eq!(*from, BookingStatus::BuyerCountered),
        other => panic!("expected status effect, got {other:?}"),
    }
}

#[test]
fn non_owner_actions_are_forbidden() {
    let req = request_fixture(RequestStatus::Open);
    let q = quote_fixture(req.id, QuoteStatus::Pending);
    let stranger = Actor {
        id: Uuid::new_v4(),
        role: Roles::Buyer,
    };

    let err = request::cancel(&req, &[], None, stranger).unwrap_err();
    assert!(matches!(err, DomainError::Guard(GuardViolation::NotOwner)));

    let err = request::accept_quote(
        &req,
        &q,
        std::slice::from_ref(&q),
        None,
        &default_terms(),
        stranger,
        LifecycleConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, DomainError::Guard(GuardViolation::NotOwner)));
}
