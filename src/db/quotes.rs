use sea_orm::*;
use uuid::Uuid;

use super::StoreError;
use crate::models::quotes::{self, CreateQuote, Status};

/// Insert a new pending quote from a seller.
pub async fn insert_quote(
    db: &DatabaseConnection,
    input: CreateQuote,
    request_id: Uuid,
    seller_id: Uuid,
) -> Result<quotes::Model, DbErr> {
    let new_quote = quotes::ActiveModel {
        id: Set(Uuid::new_v4()),
        request_id: Set(request_id),
        seller_id: Set(seller_id),
        price: Set(input.price),
        estimated_days: Set(input.estimated_days),
        proposal: Set(input.proposal),
        proposed_start_date: Set(input.proposed_start_date),
        status: Set(Status::Pending),
        created_at: Set(chrono::Utc::now()),
        updated_at: Set(None),
    };

    new_quote.insert(db).await
}

/// Fetch a single quote by ID.
pub async fn get_quote_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<quotes::Model>, DbErr> {
    quotes::Entity::find_by_id(id).one(db).await
}

/// All quotes on a request, oldest first.
pub async fn list_by_request(
    db: &DatabaseConnection,
    request_id: Uuid,
) -> Result<Vec<quotes::Model>, DbErr> {
    quotes::Entity::find()
        .filter(quotes::Column::RequestId.eq(request_id))
        .order_by_asc(quotes::Column::CreatedAt)
        .all(db)
        .await
}

/// All quotes a seller has submitted.
pub async fn list_by_seller(
    db: &DatabaseConnection,
    seller_id: Uuid,
) -> Result<Vec<quotes::Model>, DbErr> {
    quotes::Entity::find()
        .filter(quotes::Column::SellerId.eq(seller_id))
        .order_by_desc(quotes::Column::CreatedAt)
        .all(db)
        .await
}

/// Compare-and-swap status change.
pub async fn set_status(
    db: &DatabaseConnection,
    id: Uuid,
    from: Status,
    to: Status,
) -> Result<(), StoreError> {
    let result = quotes::Entity::update_many()
        .set(quotes::ActiveModel {
            status: Set(to),
            updated_at: Set(Some(chrono::Utc::now())),
            ..Default::default()
        })
        .filter(quotes::Column::Id.eq(id))
        .filter(quotes::Column::Status.eq(from))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(StoreError::StaleState { entity: "quote", id });
    }
    Ok(())
}

/// Reject every live sibling of an accepted quote in one statement.
pub async fn reject_siblings(
    db: &DatabaseConnection,
    request_id: Uuid,
    accepted_quote_id: Uuid,
) -> Result<u64, DbErr> {
    let result = quotes::Entity::update_many()
        .set(quotes::ActiveModel {
            status: Set(Status::Rejected),
            updated_at: Set(Some(chrono::Utc::now())),
            ..Default::default()
        })
        .filter(quotes::Column::RequestId.eq(request_id))
        .filter(quotes::Column::Id.ne(accepted_quote_id))
        .filter(quotes::Column::Status.is_in([Status::Pending, Status::Negotiating]))
        .exec(db)
        .await?;

    Ok(result.rows_affected)
}
