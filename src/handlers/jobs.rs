use actix_web::{HttpResponse, Responder, web};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::middleware::AuthenticatedUser;
use crate::cache::{CacheConfig, RedisCache, keys};
use crate::db::{bookings as booking_db, contracts as contract_db, quotes as quote_db,
    requests as request_db};
use crate::domain::views::{self, ActiveJob};
use crate::handlers::db_error_response;
use crate::models::bookings;

/// GET /api/me/active-jobs — in-progress requests and executed-contract
/// bookings, both sides, merged newest first.
///
/// Cached per user on a short TTL; the invalidator cannot enumerate per-user
/// keys so staleness is bounded by the TTL alone.
pub async fn active_jobs(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<Arc<RedisCache>>,
    cache_cfg: web::Data<CacheConfig>,
) -> impl Responder {
    let cache_key = keys::active_jobs(&user.0.id.to_string());
    if let Ok(Some(cached)) = cache.get::<Vec<serde_json::Value>>(&cache_key).await {
        return HttpResponse::Ok().json(cached);
    }

    let mut requests = match request_db::list_by_buyer(db.get_ref(), user.0.id).await {
        Ok(requests) => requests,
        Err(e) => return db_error_response(&e),
    };
    match request_db::list_assigned_to_seller(db.get_ref(), user.0.id).await {
        Ok(assigned) => requests.extend(assigned),
        Err(e) => return db_error_response(&e),
    }

    let mut raw_bookings = match booking_db::list_by_buyer(db.get_ref(), user.0.id).await {
        Ok(bookings) => bookings,
        Err(e) => return db_error_response(&e),
    };
    match booking_db::list_by_seller(db.get_ref(), user.0.id).await {
        Ok(received) => raw_bookings.extend(received),
        Err(e) => return db_error_response(&e),
    }

    // Only accepted bookings can have an executed contract, so skip the
    // contract lookup for the rest.
    let mut paired = Vec::new();
    for booking in raw_bookings
        .into_iter()
        .filter(|b| b.status == bookings::Status::Accepted)
    {
        match contract_db::find_live_for_booking(db.get_ref(), booking.id).await {
            Ok(Some(contract)) => paired.push((booking, contract)),
            Ok(None) => {}
            Err(e) => return db_error_response(&e),
        }
    }

    let jobs: Vec<ActiveJob> = views::active_jobs(&requests, &paired);
    let _ = cache
        .set(&cache_key, &jobs, Some(cache_cfg.active_jobs_ttl.as_secs()))
        .await;
    HttpResponse::Ok().json(jobs)
}

/// GET /api/requests/{id}/progress — the four-step tracker for one request.
pub async fn request_progress(
    _user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> impl Responder {
    let id = path.into_inner();

    let request = match request_db::get_request_by_id(db.get_ref(), id).await {
        Ok(Some(request)) => request,
        Ok(None) => {
            return HttpResponse::NotFound().json(serde_json::json!({
                "error": format!("Request {id} not found"),
            }));
        }
        Err(e) => return db_error_response(&e),
    };
    let quotes = match quote_db::list_by_request(db.get_ref(), id).await {
        Ok(quotes) => quotes,
        Err(e) => return db_error_response(&e),
    };
    let contract = match contract_db::find_live_for_request(db.get_ref(), id).await {
        Ok(contract) => contract,
        Err(e) => return db_error_response(&e),
    };

    HttpResponse::Ok().json(serde_json::json!({
        "request_id": id,
        "step": views::progress_step(request.status, &quotes, contract.as_ref()),
        "status": request.status,
    }))
}
