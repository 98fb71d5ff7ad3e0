use sea_orm::*;
use uuid::Uuid;

use super::StoreError;
use crate::domain::effects::{ContractOrigin, NewContract, Party};
use crate::models::contracts::{self, Status};

fn active_from_new(input: &NewContract) -> contracts::ActiveModel {
    let (request_id, quote_id, booking_id) = match input.origin {
        ContractOrigin::Quote {
            quote_id,
            request_id,
        } => (Some(request_id), Some(quote_id), None),
        ContractOrigin::Booking { booking_id } => (None, None, Some(booking_id)),
    };

    contracts::ActiveModel {
        id: Set(Uuid::new_v4()),
        buyer_id: Set(input.buyer_id),
        seller_id: Set(input.seller_id),
        request_id: Set(request_id),
        quote_id: Set(quote_id),
        booking_id: Set(booking_id),
        status: Set(input.status),
        signed_at_buyer: Set(None),
        signed_at_seller: Set(None),
        warranty_days: Set(input.warranty_days),
        start_date: Set(input.start_date),
        created_at: Set(chrono::Utc::now()),
        updated_at: Set(None),
    }
}

/// A unique-violation on insert means the partial index caught a concurrent
/// accept creating the live contract first; surface it as the stale path so
/// the caller's refetch-and-retry covers it.
fn map_insert_err(input: &NewContract, e: DbErr) -> StoreError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            let id = match input.origin {
                ContractOrigin::Quote { request_id, .. } => request_id,
                ContractOrigin::Booking { booking_id } => booking_id,
            };
            StoreError::StaleState {
                entity: "contract",
                id,
            }
        }
        _ => StoreError::Db(e),
    }
}

/// Insert a fresh contract draft.
pub async fn insert_contract(
    db: &DatabaseConnection,
    input: &NewContract,
) -> Result<contracts::Model, StoreError> {
    active_from_new(input)
        .insert(db)
        .await
        .map_err(|e| map_insert_err(input, e))
}

/// Replace a stale unsigned draft with a new one, atomically.
///
/// The delete is conditioned on the stale draft still being unsigned, so a
/// buyer-sign racing with the switch makes the whole transaction fail rather
/// than silently dropping a signed contract. The partial unique index on
/// `request_id` is the backstop against duplicate live contracts.
pub async fn replace_draft(
    db: &DatabaseConnection,
    stale_contract_id: Uuid,
    input: &NewContract,
) -> Result<contracts::Model, StoreError> {
    let txn = db.begin().await?;

    let deleted = contracts::Entity::delete_many()
        .filter(contracts::Column::Id.eq(stale_contract_id))
        .filter(contracts::Column::Status.is_in([Status::Draft, Status::PendingBuyer]))
        .exec(&txn)
        .await?;
    if deleted.rows_affected == 0 {
        txn.rollback().await?;
        return Err(StoreError::StaleState {
            entity: "contract",
            id: stale_contract_id,
        });
    }

    let created = active_from_new(input)
        .insert(&txn)
        .await
        .map_err(|e| map_insert_err(input, e))?;
    txn.commit().await?;
    Ok(created)
}

/// Fetch a single contract by ID.
pub async fn get_contract_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<contracts::Model>, DbErr> {
    contracts::Entity::find_by_id(id).one(db).await
}

/// The live (non-terminal) contract for a request, if any. At most one
/// exists by invariant.
pub async fn find_live_for_request(
    db: &DatabaseConnection,
    request_id: Uuid,
) -> Result<Option<contracts::Model>, DbErr> {
    contracts::Entity::find()
        .filter(contracts::Column::RequestId.eq(request_id))
        .filter(contracts::Column::Status.is_not_in([
            Status::Cancelled,
            Status::Terminated,
            Status::Rejected,
        ]))
        .one(db)
        .await
}

/// The live (non-terminal) contract for a booking, if any.
pub async fn find_live_for_booking(
    db: &DatabaseConnection,
    booking_id: Uuid,
) -> Result<Option<contracts::Model>, DbErr> {
    contracts::Entity::find()
        .filter(contracts::Column::BookingId.eq(booking_id))
        .filter(contracts::Column::Status.is_not_in([
            Status::Cancelled,
            Status::Terminated,
            Status::Rejected,
        ]))
        .one(db)
        .await
}

/// All contracts where the user is a party, newest first.
pub async fn list_for_user(
    db: &DatabaseConnection,
    user_id: Uuid,
) -> Result<Vec<contracts::Model>, DbErr> {
    contracts::Entity::find()
        .filter(
            Condition::any()
                .add(contracts::Column::BuyerId.eq(user_id))
                .add(contracts::Column::SellerId.eq(user_id)),
        )
        .order_by_desc(contracts::Column::CreatedAt)
        .all(db)
        .await
}

/// Compare-and-swap status change (for void transitions).
pub async fn set_status(
    db: &DatabaseConnection,
    id: Uuid,
    from: Status,
    to: Status,
) -> Result<(), StoreError> {
    let result = contracts::Entity::update_many()
        .set(contracts::ActiveModel {
            status: Set(to),
            updated_at: Set(Some(chrono::Utc::now())),
            ..Default::default()
        })
        .filter(contracts::Column::Id.eq(id))
        .filter(contracts::Column::Status.eq(from))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(StoreError::StaleState {
            entity: "contract",
            id,
        });
    }
    Ok(())
}

/// Record one party's signature and advance the status in a single
/// conditional write, keeping status a function of the timestamps.
pub async fn sign(
    db: &DatabaseConnection,
    id: Uuid,
    side: Party,
    at: sea_orm::prelude::DateTimeUtc,
    from: Status,
    to: Status,
) -> Result<(), StoreError> {
    let patch = match side {
        Party::Buyer => contracts::ActiveModel {
            status: Set(to),
            signed_at_buyer: Set(Some(at)),
            updated_at: Set(Some(chrono::Utc::now())),
            ..Default::default()
        },
        Party::Seller => contracts::ActiveModel {
            status: Set(to),
            signed_at_seller: Set(Some(at)),
            updated_at: Set(Some(chrono::Utc::now())),
            ..Default::default()
        },
    };

    let result = contracts::Entity::update_many()
        .set(patch)
        .filter(contracts::Column::Id.eq(id))
        .filter(contracts::Column::Status.eq(from))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(StoreError::StaleState {
            entity: "contract",
            id,
        });
    }
    Ok(())
}
