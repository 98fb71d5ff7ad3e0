//! Pure UI-facing aggregates computed from entity snapshots.

use sea_orm::prelude::DateTimeUtc;
use serde::Serialize;
use uuid::Uuid;

use crate::models::requests::Categories;
use crate::models::{bookings, contracts, quotes, requests};

/// Shown when a budget bound is absent on both sides.
pub const BUDGET_PLACEHOLDER: &str = "—";

/// Progress step for the four-step job tracker:
/// 1 = posted, 2 = at least one quote ever received, 3 = contract executed /
/// job in progress, 4 = completed.
///
/// Monotonic non-decreasing for a given request absent a cancellation:
/// rejected quotes keep counting at step 2, and an executed contract pins
/// the step at 3 until completion. Callers pass the full quote history, not
/// just the live ones.
pub fn progress_step(
    status: requests::Status,
    quotes: &[quotes::Model],
    contract: Option<&contracts::Model>,
) -> u8 {
    if status == requests::Status::Completed {
        return 4;
    }
    if status == requests::Status::InProgress
        || contract.is_some_and(|c| c.status == contracts::Status::Executed)
    {
        return 3;
    }
    if !quotes.is_empty() {
        return 2;
    }
    1
}

/// Budget display rule: both bounds → "min-max", only min → "≥min",
/// only max → "≤max", neither → placeholder.
pub fn budget_display(min: Option<f64>, max: Option<f64>) -> String {
    match (min, max) {
        (Some(min), Some(max)) => format!("{min}-{max}"),
        (Some(min), None) => format!("≥{min}"),
        (None, Some(max)) => format!("≤{max}"),
        (None, None) => BUDGET_PLACEHOLDER.to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    Request,
    Booking,
}

/// One entry in the unified "active jobs" list.
#[derive(Debug, Clone, Serialize)]
pub struct ActiveJob {
    pub id: Uuid,
    pub kind: JobKind,
    pub category: Categories,
    pub title: String,
    pub city: String,
    pub counterparty_id: Option<Uuid>,
    pub budget: String,
    pub created_at: DateTimeUtc,
}

/// Merge in-progress requests with bookings whose contract has executed into
/// one list, newest first.
pub fn active_jobs(
    requests: &[requests::Model],
    bookings: &[(bookings::Model, contracts::Model)],
) -> Vec<ActiveJob> {
    let mut jobs: Vec<ActiveJob> = requests
        .iter()
        .filter(|r| r.status == requests::Status::InProgress)
        .map(|r| ActiveJob {
            id: r.id,
            kind: JobKind::Request,
            category: r.category,
            title: request_title(r),
            city: r.city.clone(),
            counterparty_id: r.assigned_seller_id,
            budget: budget_display(r.budget_min, r.budget_max),
            created_at: r.created_at,
        })
        .collect();

    jobs.extend(
        bookings
            .iter()
            .filter(|(b, c)| {
                b.status == bookings::Status::Accepted
                    && c.status == contracts::Status::Executed
            })
            .map(|(b, _)| ActiveJob {
                id: b.id,
                kind: JobKind::Booking,
                category: b.category,
                title: b.description.chars().take(80).collect(),
                city: b.city.clone(),
                counterparty_id: Some(b.seller_id),
                budget: budget_display(b.budget_min, b.budget_max),
                created_at: b.created_at,
            }),
    );

    jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    jobs
}

/// Prefer the English title, fall back to Arabic, then to a fixed label.
fn request_title(r: &requests::Model) -> String {
    r.title_en
        .clone()
        .or_else(|| r.title_ar.clone())
        .unwrap_or_else(|| "Untitled request".to_string())
}
