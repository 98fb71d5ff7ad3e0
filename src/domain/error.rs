use thiserror::Error;
use uuid::Uuid;

/// Reason codes for business-rule rejections.
///
/// Every rejected transition carries one of these; the HTTP layer maps them
/// to specific user-facing messages, never a generic failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GuardViolation {
    #[error("a non-terminal contract already exists for this job")]
    AlreadyContracted,
    #[error("you are not a party to this entity")]
    NotOwner,
    #[error("the current state does not allow this edit")]
    InvalidStateForEdit,
    #[error("missing required field: {0}")]
    MissingRequiredField(&'static str),
    #[error("another quote on this request is already accepted")]
    QuoteAlreadyAccepted,
    #[error("this transition is not allowed from the current status")]
    InvalidTransition,
}

/// The domain error taxonomy.
///
/// The lifecycle engine returns `Guard`/`Validation` for expected
/// business-rule violations and never panics on them. `StaleState` and
/// `NotFound` originate at the persistence boundary when a compare-and-swap
/// write loses a race or the row is gone.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error(transparent)]
    Guard(#[from] GuardViolation),
    #[error("{entity} {id} changed concurrently, refetch and retry")]
    StaleState { entity: &'static str, id: Uuid },
    #[error("{entity} {id} is no longer available")]
    NotFound { entity: &'static str, id: Uuid },
    #[error("internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn missing(field: &'static str) -> Self {
        DomainError::Guard(GuardViolation::MissingRequiredField(field))
    }
}
