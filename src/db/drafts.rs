use chrono::{Duration, Utc};
use sea_orm::*;
use uuid::Uuid;

use crate::models::drafts::{self, SaveDraft};

/// Save (create or overwrite) a draft for its owner.
pub async fn upsert_draft(
    db: &DatabaseConnection,
    id: Option<Uuid>,
    owner_id: Uuid,
    input: SaveDraft,
) -> Result<drafts::Model, DbErr> {
    if let Some(id) = id
        && let Some(existing) = drafts::Entity::find_by_id(id).one(db).await?
    {
        if existing.owner_id != owner_id {
            return Err(DbErr::RecordNotFound("Draft not found".to_string()));
        }
        let mut active: drafts::ActiveModel = existing.into();
        active.payload = Set(input.payload);
        active.updated_at = Set(Utc::now());
        return active.update(db).await;
    }

    let new_draft = drafts::ActiveModel {
        id: Set(id.unwrap_or_else(Uuid::new_v4)),
        owner_id: Set(owner_id),
        kind: Set(input.kind),
        payload: Set(input.payload),
        created_at: Set(Utc::now()),
        updated_at: Set(Utc::now()),
    };
    new_draft.insert(db).await
}

/// List an owner's drafts, purging anything untouched beyond the TTL first.
/// There is no background worker; abandonment is enforced lazily here.
pub async fn list_for_owner(
    db: &DatabaseConnection,
    owner_id: Uuid,
    ttl_days: i64,
) -> Result<Vec<drafts::Model>, DbErr> {
    let cutoff = Utc::now() - Duration::days(ttl_days);
    drafts::Entity::delete_many()
        .filter(drafts::Column::OwnerId.eq(owner_id))
        .filter(drafts::Column::UpdatedAt.lt(cutoff))
        .exec(db)
        .await?;

    drafts::Entity::find()
        .filter(drafts::Column::OwnerId.eq(owner_id))
        .order_by_desc(drafts::Column::UpdatedAt)
        .all(db)
        .await
}

/// Delete a draft, e.g. once the form it backed was submitted.
pub async fn delete_draft(
    db: &DatabaseConnection,
    id: Uuid,
    owner_id: Uuid,
) -> Result<DeleteResult, DbErr> {
    drafts::Entity::delete_many()
        .filter(drafts::Column::Id.eq(id))
        .filter(drafts::Column::OwnerId.eq(owner_id))
        .exec(db)
        .await
}
