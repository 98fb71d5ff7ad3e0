///! Integration tests for the derived-view builders: the four-step progress
///! tracker, the budget display rule, and the unified active-jobs list.
///!
///! Run with: `cargo test --test views_test`
use chrono::{Duration, Utc};

use khidma_backend::domain::views::{
    self, BUDGET_PLACEHOLDER, JobKind, active_jobs, budget_display, progress_step,
};
use khidma_backend::models::bookings::Status as BookingStatus;
use khidma_backend::models::contracts::Status as ContractStatus;
use khidma_backend::models::quotes::Status as QuoteStatus;
use khidma_backend::models::requests::Status as RequestStatus;
use khidma_backend::testing::{booking_fixture, contract_fixture, quote_fixture, request_fixture};

#[test]
fn progress_steps_track_the_lifecycle() {
    let req = request_fixture(RequestStatus::Open);
    assert_eq!(progress_step(req.status, &[], None), 1);

    let q = quote_fixture(req.id, QuoteStatus::Pending);
    assert_eq!(progress_step(req.status, std::slice::from_ref(&q), None), 2);

    // A contract draft alone does not advance the step.
    let draft = contract_fixture(req.buyer_id, q.seller_id, ContractStatus::PendingBuyer);
    assert_eq!(
        progress_step(req.status, std::slice::from_ref(&q), Some(&draft)),
        2
    );

    let executed = contract_fixture(req.buyer_id, q.seller_id, ContractStatus::Executed);
    assert_eq!(
        progress_step(req.status, std::slice::from_ref(&q), Some(&executed)),
        3
    );
    assert_eq!(
        progress_step(RequestStatus::InProgress, std::slice::from_ref(&q), Some(&executed)),
        3
    );
    assert_eq!(
        progress_step(RequestStatus::Completed, std::slice::from_ref(&q), Some(&executed)),
        4
    );
}

#[test]
fn progress_never_regresses_when_the_last_quote_is_rejected() {
    let req = request_fixture(RequestStatus::Open);
    let mut q = quote_fixture(req.id, QuoteStatus::Pending);
    let before = progress_step(req.status, std::slice::from_ref(&q), None);
    assert_eq!(before, 2);

    // Rejecting the only quote must not drop the tracker back to step 1.
    q.status = QuoteStatus::Rejected;
    let after = progress_step(req.status, std::slice::from_ref(&q), None);
    assert!(after >= before);
    assert_eq!(after, 2);
}

#[test]
fn progress_is_monotonic_through_the_lifecycle() {
    let req = request_fixture(RequestStatus::Open);
    let q = quote_fixture(req.id, QuoteStatus::Pending);
    let executed = contract_fixture(req.buyer_id, q.seller_id, ContractStatus::Executed);

    let steps = [
        progress_step(RequestStatus::Open, &[], None),
        progress_step(RequestStatus::Open, std::slice::from_ref(&q), None),
        progress_step(RequestStatus::InProgress, std::slice::from_ref(&q), Some(&executed)),
        progress_step(RequestStatus::Completed, std::slice::from_ref(&q), Some(&executed)),
    ];
    assert_eq!(steps, [1, 2, 3, 4]);
    assert!(steps.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn budget_display_covers_all_bound_combinations() {
    assert_eq!(budget_display(Some(100.0), Some(500.0)), "100-500");
    assert_eq!(budget_display(Some(100.0), None), "≥100");
    assert_eq!(budget_display(None, Some(500.0)), "≤500");
    assert_eq!(budget_display(None, None), BUDGET_PLACEHOLDER);
}

#[test]
fn active_jobs_merges_requests_and_executed_bookings() {
    let mut req = request_fixture(RequestStatus::InProgress);
    req.created_at = Utc::now() - Duration::hours(2);

    // Open requests never show up.
    let open = request_fixture(RequestStatus::Open);

    let booking = booking_fixture(BookingStatus::Accepted);
    let executed = {
        let mut c = contract_fixture(booking.buyer_id, booking.seller_id, ContractStatus::Executed);
        c.booking_id = Some(booking.id);
        c
    };

    // An accepted booking whose contract has not executed stays out.
    let pending_booking = booking_fixture(BookingStatus::Accepted);
    let unsigned = contract_fixture(
        pending_booking.buyer_id,
        pending_booking.seller_id,
        ContractStatus::PendingBuyer,
    );

    let jobs = active_jobs(
        &[req.clone(), open],
        &[(booking.clone(), executed), (pending_booking, unsigned)],
    );

    assert_eq!(jobs.len(), 2);
    // Newest first: the booking fixture was created after the request.
    assert_eq!(jobs[0].kind, JobKind::Booking);
    assert_eq!(jobs[0].id, booking.id);
    assert_eq!(jobs[1].kind, JobKind::Request);
    assert_eq!(jobs[1].id, req.id);
}

#[test]
fn active_job_titles_fall_back_across_languages() {
    let mut req = request_fixture(RequestStatus::InProgress);
    req.title_en = None;

    let jobs = views::active_jobs(std::slice::from_ref(&req), &[]);
    assert_eq!(jobs[0].title, req.title_ar.clone().unwrap());

    req.title_ar = None;
    let jobs = views::active_jobs(std::slice::from_ref(&req), &[]);
    assert_eq!(jobs[0].title, "Untitled request");
}

#[test]
fn booking_titles_are_truncated_descriptions() {
    let mut booking = booking_fixture(BookingStatus::Accepted);
    booking.description = "x".repeat(200);
    let contract = {
        let mut c = contract_fixture(booking.buyer_id, booking.seller_id, ContractStatus::Executed);
        c.booking_id = Some(booking.id);
        c
    };

    let jobs = active_jobs(&[], &[(booking, contract)]);
    assert_eq!(jobs[0].title.chars().count(), 80);
}
