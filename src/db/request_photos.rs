use sea_orm::*;
use uuid::Uuid;

use crate::models::request_photos;

/// Attach an uploaded photo URL at the end of the request's photo list.
pub async fn add_photo(
    db: &DatabaseConnection,
    request_id: Uuid,
    url: String,
) -> Result<request_photos::Model, DbErr> {
    let next_position = request_photos::Entity::find()
        .filter(request_photos::Column::RequestId.eq(request_id))
        .count(db)
        .await? as i32;

    let new_photo = request_photos::ActiveModel {
        id: Set(Uuid::new_v4()),
        request_id: Set(request_id),
        url: Set(url),
        position: Set(next_position),
        created_at: Set(chrono::Utc::now()),
    };

    new_photo.insert(db).await
}

/// Photos for a request in display order.
pub async fn list_by_request(
    db: &DatabaseConnection,
    request_id: Uuid,
) -> Result<Vec<request_photos::Model>, DbErr> {
    request_photos::Entity::find()
        .filter(request_photos::Column::RequestId.eq(request_id))
        .order_by_asc(request_photos::Column::Position)
        .all(db)
        .await
}

/// Remove one photo.
pub async fn delete_photo(db: &DatabaseConnection, id: Uuid) -> Result<DeleteResult, DbErr> {
    request_photos::Entity::delete_by_id(id).exec(db).await
}
