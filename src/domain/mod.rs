//! The domain layer: lifecycle engine, guards, and derived views.
//!
//! Nothing in this module performs I/O. Handlers fetch snapshots through
//! [`crate::db`], call into here, and hand the resulting effect list to
//! [`crate::dispatch`].

pub mod effects;
pub mod error;
pub mod guards;
pub mod lifecycle;
pub mod views;

pub use effects::{Actor, Effect, LifecycleConfig, Party, Transition};
pub use error::{DomainError, GuardViolation};
