use sea_orm::*;
use uuid::Uuid;

use crate::models::negotiations;

/// Record one counter-offer on a quote.
pub async fn insert_negotiation(
    db: &DatabaseConnection,
    quote_id: Uuid,
    author_id: Uuid,
    price: Option<f64>,
    message: String,
) -> Result<negotiations::Model, DbErr> {
    let new_negotiation = negotiations::ActiveModel {
        id: Set(Uuid::new_v4()),
        quote_id: Set(quote_id),
        author_id: Set(author_id),
        price: Set(price),
        message: Set(message),
        created_at: Set(chrono::Utc::now()),
    };

    new_negotiation.insert(db).await
}

/// The full back-and-forth on a quote, oldest first.
pub async fn list_by_quote(
    db: &DatabaseConnection,
    quote_id: Uuid,
) -> Result<Vec<negotiations::Model>, DbErr> {
    negotiations::Entity::find()
        .filter(negotiations::Column::QuoteId.eq(quote_id))
        .order_by_asc(negotiations::Column::CreatedAt)
        .all(db)
        .await
}
