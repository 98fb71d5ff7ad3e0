//! The lifecycle engine: pure `(entity, event, actor) -> Transition` functions.
//!
//! Every legal status change in the system is encoded here. Functions take
//! snapshots the caller already fetched, validate via the guard layer, and
//! return a list of declarative [`Effect`](super::effects::Effect)s for the
//! dispatcher. Business-rule violations come back as
//! [`DomainError::Guard`](super::error::DomainError); the engine never
//! touches the store and never panics on expected input.

pub mod booking;
pub mod contract;
pub mod quote;
pub mod request;
