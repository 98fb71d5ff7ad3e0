pub mod bookings;
pub mod contracts;
pub mod drafts;
pub mod negotiations;
pub mod notifications;
pub mod profiles;
pub mod quotes;
pub mod request_photos;
pub mod requests;

use sea_orm::{Database, DatabaseConnection, DbErr};
use std::env;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::DomainError;

/// Create a SeaORM database connection pool from the `DATABASE_URL` env var.
pub async fn create_pool() -> DatabaseConnection {
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    Database::connect(&database_url)
        .await
        .expect("Failed to connect to database")
}

/// Errors surfaced by the entity store.
///
/// `StaleState` means a compare-and-swap status write matched zero rows:
/// someone else moved the entity first. Callers refetch and retry once, then
/// give up.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Db(#[from] DbErr),
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: Uuid },
    #[error("{entity} {id} was modified concurrently")]
    StaleState { entity: &'static str, id: Uuid },
}

impl From<StoreError> for DomainError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, id } => DomainError::NotFound { entity, id },
            StoreError::StaleState { entity, id } => DomainError::StaleState { entity, id },
            StoreError::Db(e) => DomainError::Internal(format!("storage failure: {e}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_failures_convert_to_internal_not_validation() {
        let err: DomainError = StoreError::Db(DbErr::Custom("connection reset".into())).into();
        assert!(matches!(err, DomainError::Internal(_)));
    }

    #[test]
    fn stale_state_survives_the_domain_conversion() {
        let id = Uuid::new_v4();
        let err: DomainError = StoreError::StaleState {
            entity: "contract",
            id,
        }
        .into();
        assert_eq!(
            err,
            DomainError::StaleState {
                entity: "contract",
                id
            }
        );
    }
}
