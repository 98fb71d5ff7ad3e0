use sea_orm::*;
use uuid::Uuid;

use crate::models::profiles::{self, CompleteProfile, CreateProfileFromAuth};

/// Create a profile from Supabase Auth JWT claims (called by auth middleware).
pub async fn find_or_create_from_auth(
    db: &DatabaseConnection,
    input: CreateProfileFromAuth,
) -> Result<profiles::Model, DbErr> {
    // Try to find the profile first (by Supabase auth UUID).
    if let Some(existing) = profiles::Entity::find_by_id(input.id).one(db).await? {
        return Ok(existing);
    }

    // First request from this user — create from JWT claims.
    let new_profile = profiles::ActiveModel {
        id: Set(input.id),
        email: Set(input.email),
        username: Set(None),
        display_name: Set(input.display_name),
        avatar_url: Set(input.avatar_url),
        phone: Set(None),
        city: Set(None),
        auth_provider: Set(input.auth_provider),
        role: Set(input.role),
        created_at: Set(chrono::Utc::now()),
        updated_at: Set(None),
    };

    new_profile.insert(db).await
}

/// Fetch a single profile by ID.
pub async fn get_profile_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<profiles::Model>, DbErr> {
    profiles::Entity::find_by_id(id).one(db).await
}

/// Complete a profile after first login (username, role, contact details).
pub async fn complete_profile(
    db: &DatabaseConnection,
    id: Uuid,
    input: CompleteProfile,
) -> Result<profiles::Model, DbErr> {
    let profile = profiles::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DbErr::RecordNotFound("Profile not found".to_string()))?;

    let mut active: profiles::ActiveModel = profile.into();

    if let Some(username) = input.username {
        active.username = Set(Some(username));
    }
    if let Some(role) = input.role {
        active.role = Set(role);
    }
    if let Some(display_name) = input.display_name {
        active.display_name = Set(Some(display_name));
    }
    if let Some(avatar_url) = input.avatar_url {
        active.avatar_url = Set(Some(avatar_url));
    }
    if let Some(phone) = input.phone {
        active.phone = Set(Some(phone));
    }
    if let Some(city) = input.city {
        active.city = Set(Some(city));
    }
    active.updated_at = Set(Some(chrono::Utc::now()));

    active.update(db).await
}

/// List sellers in a city, for the direct-booking flow.
pub async fn list_sellers(
    db: &DatabaseConnection,
    city: Option<String>,
    limit: u64,
) -> Result<Vec<profiles::Model>, DbErr> {
    let mut query = profiles::Entity::find()
        .filter(profiles::Column::Role.eq(profiles::Roles::Seller));
    if let Some(city) = city {
        query = query.filter(profiles::Column::City.eq(city));
    }
    query
        .order_by_desc(profiles::Column::CreatedAt)
        .limit(limit)
        .all(db)
        .await
}
