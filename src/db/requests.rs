use sea_orm::*;
use uuid::Uuid;

use super::StoreError;
use crate::models::requests::{self, CreateRequest, RequestListQuery, Status, UpdateRequest};

/// Insert a new open request for a buyer.
pub async fn insert_request(
    db: &DatabaseConnection,
    input: CreateRequest,
    buyer_id: Uuid,
) -> Result<requests::Model, DbErr> {
    let new_request = requests::ActiveModel {
        id: Set(Uuid::new_v4()),
        buyer_id: Set(buyer_id),
        category: Set(input.category),
        title_ar: Set(input.title_ar),
        title_en: Set(input.title_en),
        description_ar: Set(input.description_ar),
        description_en: Set(input.description_en),
        urgency: Set(input.urgency.unwrap_or(requests::Urgency::Medium)),
        city: Set(input.city),
        address: Set(input.address),
        preferred_date: Set(input.preferred_date),
        time_window: Set(input.time_window),
        budget_min: Set(input.budget_min),
        budget_max: Set(input.budget_max),
        status: Set(Status::Open),
        assigned_seller_id: Set(None),
        halted: Set(false),
        buyer_marked_complete: Set(false),
        seller_marked_complete: Set(false),
        created_at: Set(chrono::Utc::now()),
        updated_at: Set(None),
    };

    new_request.insert(db).await
}

/// Fetch a single request by ID.
pub async fn get_request_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<requests::Model>, DbErr> {
    requests::Entity::find_by_id(id).one(db).await
}

/// Browse requests, newest first, with optional category/city/status filters.
pub async fn list_requests(
    db: &DatabaseConnection,
    query: &RequestListQuery,
) -> Result<Vec<requests::Model>, DbErr> {
    let mut find = requests::Entity::find();
    if let Some(category) = query.category {
        find = find.filter(requests::Column::Category.eq(category));
    }
    if let Some(city) = &query.city {
        find = find.filter(requests::Column::City.eq(city.clone()));
    }
    if let Some(status) = query.status {
        find = find.filter(requests::Column::Status.eq(status));
    }
    find.order_by_desc(requests::Column::CreatedAt)
        .limit(query.limit())
        .all(db)
        .await
}

/// All requests posted by one buyer.
pub async fn list_by_buyer(
    db: &DatabaseConnection,
    buyer_id: Uuid,
) -> Result<Vec<requests::Model>, DbErr> {
    requests::Entity::find()
        .filter(requests::Column::BuyerId.eq(buyer_id))
        .order_by_desc(requests::Column::CreatedAt)
        .all(db)
        .await
}

/// In-progress requests where this seller is assigned.
pub async fn list_assigned_to_seller(
    db: &DatabaseConnection,
    seller_id: Uuid,
) -> Result<Vec<requests::Model>, DbErr> {
    requests::Entity::find()
        .filter(requests::Column::AssignedSellerId.eq(seller_id))
        .order_by_desc(requests::Column::CreatedAt)
        .all(db)
        .await
}

/// Apply a core-field patch. The caller must have passed the edit guard.
pub async fn update_request(
    db: &DatabaseConnection,
    id: Uuid,
    input: UpdateRequest,
) -> Result<requests::Model, DbErr> {
    let request = requests::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DbErr::RecordNotFound("Request not found".to_string()))?;

    let mut active: requests::ActiveModel = request.into();

    if let Some(category) = input.category {
        active.category = Set(category);
    }
    if let Some(title_ar) = input.title_ar {
        active.title_ar = Set(Some(title_ar));
    }
    if let Some(title_en) = input.title_en {
        active.title_en = Set(Some(title_en));
    }
    if let Some(description_ar) = input.description_ar {
        active.description_ar = Set(Some(description_ar));
    }
    if let Some(description_en) = input.description_en {
        active.description_en = Set(Some(description_en));
    }
    if let Some(urgency) = input.urgency {
        active.urgency = Set(urgency);
    }
    if let Some(city) = input.city {
        active.city = Set(city);
    }
    if let Some(address) = input.address {
        active.address = Set(Some(address));
    }
    if let Some(preferred_date) = input.preferred_date {
        active.preferred_date = Set(Some(preferred_date));
    }
    if let Some(time_window) = input.time_window {
        active.time_window = Set(Some(time_window));
    }
    if let Some(budget_min) = input.budget_min {
        active.budget_min = Set(Some(budget_min));
    }
    if let Some(budget_max) = input.budget_max {
        active.budget_max = Set(Some(budget_max));
    }
    active.updated_at = Set(Some(chrono::Utc::now()));

    active.update(db).await
}

/// Compare-and-swap status change: only applies if the row still holds the
/// status the caller read.
pub async fn set_status(
    db: &DatabaseConnection,
    id: Uuid,
    from: Status,
    to: Status,
) -> Result<(), StoreError> {
    let result = requests::Entity::update_many()
        .set(requests::ActiveModel {
            status: Set(to),
            updated_at: Set(Some(chrono::Utc::now())),
            ..Default::default()
        })
        .filter(requests::Column::Id.eq(id))
        .filter(requests::Column::Status.eq(from))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(StoreError::StaleState {
            entity: "request",
            id,
        });
    }
    Ok(())
}

/// Record which seller won the job.
pub async fn assign_seller(
    db: &DatabaseConnection,
    id: Uuid,
    seller_id: Uuid,
) -> Result<(), StoreError> {
    let result = requests::Entity::update_many()
        .set(requests::ActiveModel {
            assigned_seller_id: Set(Some(seller_id)),
            updated_at: Set(Some(chrono::Utc::now())),
            ..Default::default()
        })
        .filter(requests::Column::Id.eq(id))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(StoreError::NotFound {
            entity: "request",
            id,
        });
    }
    Ok(())
}

/// Set one side's completion flag.
pub async fn set_completion_flag(
    db: &DatabaseConnection,
    id: Uuid,
    buyer_side: bool,
) -> Result<(), StoreError> {
    let patch = if buyer_side {
        requests::ActiveModel {
            buyer_marked_complete: Set(true),
            updated_at: Set(Some(chrono::Utc::now())),
            ..Default::default()
        }
    } else {
        requests::ActiveModel {
            seller_marked_complete: Set(true),
            updated_at: Set(Some(chrono::Utc::now())),
            ..Default::default()
        }
    };

    let result = requests::Entity::update_many()
        .set(patch)
        .filter(requests::Column::Id.eq(id))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(StoreError::NotFound {
            entity: "request",
            id,
        });
    }
    Ok(())
}

/// Delete a request. Only valid after the delete guard has passed.
pub async fn delete_request(db: &DatabaseConnection, id: Uuid) -> Result<DeleteResult, DbErr> {
    requests::Entity::delete_by_id(id).exec(db).await
}
