use sea_orm::*;
use uuid::Uuid;

use crate::models::notifications::{self, Kind};

/// Insert one notification row. Called by the dispatcher only.
pub async fn insert_notification(
    db: &DatabaseConnection,
    user_id: Uuid,
    title: String,
    message: String,
    kind: Kind,
    content_id: Option<Uuid>,
) -> Result<notifications::Model, DbErr> {
    let new_notification = notifications::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        title: Set(title),
        message: Set(message),
        kind: Set(kind),
        content_id: Set(content_id),
        read: Set(false),
        created_at: Set(chrono::Utc::now()),
    };

    new_notification.insert(db).await
}

/// A user's notifications, newest first.
pub async fn list_for_user(
    db: &DatabaseConnection,
    user_id: Uuid,
    limit: u64,
) -> Result<Vec<notifications::Model>, DbErr> {
    notifications::Entity::find()
        .filter(notifications::Column::UserId.eq(user_id))
        .order_by_desc(notifications::Column::CreatedAt)
        .limit(limit)
        .all(db)
        .await
}

/// Mark one notification as read (scoped to its owner).
pub async fn mark_read(
    db: &DatabaseConnection,
    id: Uuid,
    user_id: Uuid,
) -> Result<u64, DbErr> {
    let result = notifications::Entity::update_many()
        .set(notifications::ActiveModel {
            read: Set(true),
            ..Default::default()
        })
        .filter(notifications::Column::Id.eq(id))
        .filter(notifications::Column::UserId.eq(user_id))
        .exec(db)
        .await?;

    Ok(result.rows_affected)
}

/// Mark everything read for a user.
pub async fn mark_all_read(db: &DatabaseConnection, user_id: Uuid) -> Result<u64, DbErr> {
    let result = notifications::Entity::update_many()
        .set(notifications::ActiveModel {
            read: Set(true),
            ..Default::default()
        })
        .filter(notifications::Column::UserId.eq(user_id))
        .filter(notifications::Column::Read.eq(false))
        .exec(db)
        .await?;

    Ok(result.rows_affected)
}
