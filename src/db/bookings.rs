use sea_orm::*;
use uuid::Uuid;

use super::StoreError;
use crate::models::bookings::{self, CreateBooking, Status};

/// Insert a new pending booking addressed to a specific seller.
pub async fn insert_booking(
    db: &DatabaseConnection,
    input: CreateBooking,
    buyer_id: Uuid,
) -> Result<bookings::Model, DbErr> {
    let new_booking = bookings::ActiveModel {
        id: Set(Uuid::new_v4()),
        buyer_id: Set(buyer_id),
        seller_id: Set(input.seller_id),
        category: Set(input.category),
        description: Set(input.description),
        start_date: Set(input.start_date),
        end_date: Set(input.end_date),
        time_window: Set(input.time_window),
        budget_min: Set(input.budget_min),
        budget_max: Set(input.budget_max),
        city: Set(input.city),
        address: Set(input.address),
        status: Set(Status::Pending),
        seller_response: Set(None),
        buyer_marked_complete: Set(false),
        seller_marked_complete: Set(false),
        created_at: Set(chrono::Utc::now()),
        updated_at: Set(None),
    };

    new_booking.insert(db).await
}

/// Fetch a single booking by ID.
pub async fn get_booking_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<bookings::Model>, DbErr> {
    bookings::Entity::find_by_id(id).one(db).await
}

/// Bookings the user created.
pub async fn list_by_buyer(
    db: &DatabaseConnection,
    buyer_id: Uuid,
) -> Result<Vec<bookings::Model>, DbErr> {
    bookings::Entity::find()
        .filter(bookings::Column::BuyerId.eq(buyer_id))
        .order_by_desc(bookings::Column::CreatedAt)
        .all(db)
        .await
}

/// Bookings addressed to the seller.
pub async fn list_by_seller(
    db: &DatabaseConnection,
    seller_id: Uuid,
) -> Result<Vec<bookings::Model>, DbErr> {
    bookings::Entity::find()
        .filter(bookings::Column::SellerId.eq(seller_id))
        .order_by_desc(bookings::Column::CreatedAt)
        .all(db)
        .await
}

/// Compare-and-swap status change, optionally recording the seller's reply.
pub async fn set_status(
    db: &DatabaseConnection,
    id: Uuid,
    from: Status,
    to: Status,
    seller_response: Option<String>,
) -> Result<(), StoreError> {
    let mut patch = bookings::ActiveModel {
        status: Set(to),
        updated_at: Set(Some(chrono::Utc::now())),
        ..Default::default()
    };
    if let Some(response) = seller_response {
        patch.seller_response = Set(Some(response));
    }

    let result = bookings::Entity::update_many()
        .set(patch)
        .filter(bookings::Column::Id.eq(id))
        .filter(bookings::Column::Status.eq(from))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(StoreError::StaleState {
            entity: "booking",
            id,
        });
    }
    Ok(())
}

/// Patch the terms a buyer revised while countering. Status is changed
/// separately through `set_status`.
pub async fn apply_buyer_counter(
    db: &DatabaseConnection,
    id: Uuid,
    input: &crate::models::bookings::BuyerCounter,
) -> Result<(), DbErr> {
    let mut patch = bookings::ActiveModel {
        updated_at: Set(Some(chrono::Utc::now())),
        ..Default::default()
    };
    if let Some(start_date) = input.start_date {
        patch.start_date = Set(Some(start_date));
    }
    if let Some(end_date) = input.end_date {
        patch.end_date = Set(Some(end_date));
    }
    if let Some(budget_min) = input.budget_min {
        patch.budget_min = Set(Some(budget_min));
    }
    if let Some(budget_max) = input.budget_max {
        patch.budget_max = Set(Some(budget_max));
    }

    bookings::Entity::update_many()
        .set(patch)
        .filter(bookings::Column::Id.eq(id))
        .exec(db)
        .await?;
    Ok(())
}

/// Set one side's completion flag.
pub async fn set_completion_flag(
    db: &DatabaseConnection,
    id: Uuid,
    buyer_side: bool,
) -> Result<(), StoreError> {
    let patch = if buyer_side {
        bookings::ActiveModel {
            buyer_marked_complete: Set(true),
            updated_at: Set(Some(chrono::Utc::now())),
            ..Default::default()
        }
    } else {
        bookings::ActiveModel {
            seller_marked_complete: Set(true),
            updated_at: Set(Some(chrono::Utc::now())),
            ..Default::default()
        }
    };

    let result = bookings::Entity::update_many()
        .set(patch)
        .filter(bookings::Column::Id.eq(id))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(StoreError::NotFound {
            entity: "booking",
            id,
        });
    }
    Ok(())
}
