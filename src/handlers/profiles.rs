use actix_web::{HttpResponse, Responder, web};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::middleware::AuthenticatedUser;
use crate::cache::{CacheConfig, RedisCache, keys};
use crate::db::profiles as profile_db;
use crate::models::profiles::ProfileResponse;

/// GET /api/profiles/{id} — public profile view (requires authentication).
pub async fn get_profile(
    _user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<Arc<RedisCache>>,
    cache_cfg: web::Data<CacheConfig>,
    path: web::Path<Uuid>,
) -> impl Responder {
    let id = path.into_inner();
    let cache_key = keys::profile(&id.to_string());

    if let Ok(Some(cached)) = cache.get::<ProfileResponse>(&cache_key).await {
        return HttpResponse::Ok().json(cached);
    }

    match profile_db::get_profile_by_id(db.get_ref(), id).await {
        Ok(Some(profile)) => {
            let response = ProfileResponse::from(profile);
            let _ = cache
                .set(&cache_key, &response, Some(cache_cfg.profile_ttl.as_secs()))
                .await;
            HttpResponse::Ok().json(response)
        }
        Ok(None) => HttpResponse::NotFound().json(serde_json::json!({
            "error": format!("Profile {id} not found"),
        })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Database error: {e}"),
        })),
    }
}

#[derive(Debug, Deserialize)]
pub struct SellerListQuery {
    pub city: Option<String>,
    pub limit: Option<u64>,
}

/// GET /api/profiles/sellers — browse sellers for the direct-booking flow.
pub async fn list_sellers(
    _user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    query: web::Query<SellerListQuery>,
) -> impl Responder {
    let limit = query.limit.unwrap_or(20).min(100);
    match profile_db::list_sellers(db.get_ref(), query.city.clone(), limit).await {
        Ok(sellers) => {
            let response: Vec<ProfileResponse> =
                sellers.into_iter().map(ProfileResponse::from).collect();
            HttpResponse::Ok().json(response)
        }
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Database error: {e}"),
        })),
    }
}
