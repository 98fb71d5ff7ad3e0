use actix_web::{HttpResponse, Responder, web};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::authorization::verify_request_owner;
use crate::auth::middleware::AuthenticatedUser;
use crate::cache::{CacheConfig, RedisCache, keys};
use crate::db::{self, contracts as contract_db, quotes as quote_db, requests as request_db};
use crate::dispatch;
use crate::domain::lifecycle::request as lifecycle;
use crate::domain::views;
use crate::domain::Party;
use crate::events::{DomainEvent, EventBus};
use crate::handlers::{db_error_response, domain_error_response};
use crate::models::{quotes, request_photos, requests};
use crate::storage::StorageClient;

/// Everything the request detail screen needs in one payload.
#[derive(Debug, Serialize)]
pub struct RequestDetail {
    #[serde(flatten)]
    pub request: requests::Model,
    pub quotes: Vec<quotes::Model>,
    pub photos: Vec<request_photos::Model>,
    pub progress_step: u8,
    pub budget_display: String,
}

/// POST /api/requests — buyer posts a new job request.
pub async fn create_request(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    bus: web::Data<EventBus>,
    body: web::Json<requests::CreateRequest>,
) -> impl Responder {
    let input = body.into_inner();
    if let Err(e) = lifecycle::validate_new(&input) {
        return domain_error_response(&e);
    }

    match request_db::insert_request(db.get_ref(), input, user.0.id).await {
        Ok(request) => {
            bus.publish(DomainEvent::RequestChanged {
                request_id: request.id,
            });
            HttpResponse::Created().json(request)
        }
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Failed to create request: {e}"),
        })),
    }
}

/// GET /api/requests — browse open requests (sellers' marketplace feed).
pub async fn list_requests(
    _user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<Arc<RedisCache>>,
    cache_cfg: web::Data<CacheConfig>,
    query: web::Query<requests::RequestListQuery>,
) -> impl Responder {
    let query = query.into_inner();
    let unfiltered =
        query.category.is_none() && query.city.is_none() && query.status.is_none();

    // Only the plain newest-first feed is cached; filtered views go straight
    // to the database.
    if unfiltered
        && let Ok(Some(cached)) = cache.get::<serde_json::Value>(&keys::request_list()).await
    {
        return HttpResponse::Ok().json(cached);
    }

    match request_db::list_requests(db.get_ref(), &query).await {
        Ok(requests) => {
            if unfiltered {
                let _ = cache
                    .set(
                        &keys::request_list(),
                        &requests,
                        Some(cache_cfg.request_list_ttl.as_secs()),
                    )
                    .await;
            }
            HttpResponse::Ok().json(requests)
        }
        Err(e) => db_error_response(&e),
    }
}

/// GET /api/requests/mine — the buyer's own requests.
pub async fn my_requests(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> impl Responder {
    match request_db::list_by_buyer(db.get_ref(), user.0.id).await {
        Ok(requests) => HttpResponse::Ok().json(requests),
        Err(e) => db_error_response(&e),
    }
}

/// GET /api/requests/{id} — request detail with quotes, photos and progress.
pub async fn get_request(
    _user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<Arc<RedisCache>>,
    cache_cfg: web::Data<CacheConfig>,
    path: web::Path<Uuid>,
) -> impl Responder {
    let id = path.into_inner();
    let cache_key = keys::request(&id.to_string());

    if let Ok(Some(cached)) = cache.get::<serde_json::Value>(&cache_key).await {
        return HttpResponse::Ok().json(cached);
    }

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
    let photos = match db::request_photos::list_by_request(db.get_ref(), id).await {
        Ok(photos) => photos,
        Err(e) => return db_error_response(&e),
    };
    let contract = match contract_db::find_live_for_request(db.get_ref(), id).await {
        Ok(contract) => contract,
        Err(e) => return db_error_response(&e),
    };

    let detail = RequestDetail {
        progress_step: views::progress_step(request.status, &quotes, contract.as_ref()),
        budget_display: views::budget_display(request.budget_min, request.budget_max),
        request,
        quotes,
        photos,
    };
    let _ = cache
        .set(&cache_key, &detail, Some(cache_cfg.request_ttl.as_secs()))
        .await;
    HttpResponse::Ok().json(detail)
}

/// PUT /api/requests/{id} — edit core fields. Blocked once any live quote
/// exists.
pub async fn update_request(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    bus: web::Data<EventBus>,
    path: web::Path<Uuid>,
    body: web::Json<requests::UpdateRequest>,
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

    if let Err(e) = lifecycle::edit(&request, &quotes, user.actor()) {
        return domain_error_response(&e);
    }

    match request_db::update_request(db.get_ref(), id, body.into_inner()).await {
        Ok(updated) => {
            bus.publish(DomainEvent::RequestChanged { request_id: id });
            HttpResponse::Ok().json(updated)
        }
        Err(e) => db_error_response(&e),
    }
}

/// DELETE /api/requests/{id} — gated to open requests with no live contract.
pub async fn delete_request(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    bus: web::Data<EventBus>,
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
    let contract = match contract_db::find_live_for_request(db.get_ref(), id).await {
        Ok(contract) => contract,
        Err(e) => return db_error_response(&e),
    };

    if let Err(e) = lifecycle::delete(&request, contract.as_ref(), user.actor()) {
        return domain_error_response(&e);
    }

    match request_db::delete_request(db.get_ref(), id).await {
        Ok(result) if result.rows_affected > 0 => {
            bus.publish(DomainEvent::RequestChanged { request_id: id });
            HttpResponse::Ok().json(serde_json::json!({
                "message": format!("Request {id} deleted"),
            }))
        }
        Ok(_) => HttpResponse::NotFound().json(serde_json::json!({
            "error": format!("Request {id} not found"),
        })),
        Err(e) => db_error_response(&e),
    }
}

/// POST /api/requests/{id}/cancel — buyer withdraws an open request.
pub async fn cancel_request(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    bus: web::Data<EventBus>,
    path: web::Path<Uuid>,
) -> impl Responder {
    let id = path.into_inner();

    let request = match verify_request_owner(db.get_ref(), id, user.0.id).await {
        Ok(request) => request,
        Err(response) => return response,
    };
    let quotes = match quote_db::list_by_request(db.get_ref(), id).await {
        Ok(quotes) => quotes,
        Err(e) => return db_error_response(&e),
    };
    let contract = match contract_db::find_live_for_request(db.get_ref(), id).await {
        Ok(contract) => contract,
        Err(e) => return db_error_response(&e),
    };

    let transition = match lifecycle::cancel(&request, &quotes, contract.as_ref(), user.actor()) {
        Ok(transition) => transition,
        Err(e) => return domain_error_response(&e),
    };

    match dispatch::dispatch(db.get_ref(), bus.get_ref(), transition.effects).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "message": format!("Request {id} cancelled"),
        })),
        Err(e) => domain_error_response(&e.into()),
    }
}

/// POST /api/requests/{id}/complete — either party marks the job done; the
/// request completes once both have.
pub async fn mark_complete(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    bus: web::Data<EventBus>,
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
    let contract = match contract_db::find_live_for_request(db.get_ref(), id).await {
        Ok(contract) => contract,
        Err(e) => return db_error_response(&e),
    };

    let side = if user.0.id == request.buyer_id {
        Party::Buyer
    } else {
        Party::Seller
    };

    let transition =
        match lifecycle::mark_complete(&request, contract.as_ref(), side, user.actor()) {
            Ok(transition) => transition,
            Err(e) => return domain_error_response(&e),
        };

    match dispatch::dispatch(db.get_ref(), bus.get_ref(), transition.effects).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "message": "Completion recorded",
        })),
        Err(e) => domain_error_response(&e.into()),
    }
}

#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    pub filename: String,
}

/// POST /api/requests/{id}/photos?filename=… — upload one photo and attach
/// its public URL to the request.
pub async fn upload_photo(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    bus: web::Data<EventBus>,
    storage: web::Data<StorageClient>,
    path: web::Path<Uuid>,
    query: web::Query<UploadQuery>,
    bytes: web::Bytes,
) -> impl Responder {
    let id = path.into_inner();

    if let Err(response) = verify_request_owner(db.get_ref(), id, user.0.id).await {
        return response;
    }

    let object_path = format!("{id}/{}", query.filename);
    let url = match storage
        .upload(&object_path, bytes.to_vec(), "image/jpeg")
        .await
    {
        Ok(url) => url,
        Err(e) => {
            return HttpResponse::BadGateway().json(serde_json::json!({
                "error": format!("Photo upload failed: {e}"),
            }));
        }
    };

    match db::request_photos::add_photo(db.get_ref(), id, url).await {
        Ok(photo) => {
            bus.publish(DomainEvent::RequestChanged { request_id: id });
            HttpResponse::Created().json(photo)
        }
        Err(e) => db_error_response(&e),
    }
}

/// DELETE /api/requests/{id}/photos/{photo_id} — detach a photo. The object
/// stays in the bucket; orphans are swept out of band.
pub async fn delete_photo(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    bus: web::Data<EventBus>,
    path: web::Path<(Uuid, Uuid)>,
) -> impl Responder {
    let (request_id, photo_id) = path.into_inner();

    if let Err(response) = verify_request_owner(db.get_ref(), request_id, user.0.id).await {
        return response;
    }

    match db::request_photos::delete_photo(db.get_ref(), photo_id).await {
        Ok(result) if result.rows_affected > 0 => {
            bus.publish(DomainEvent::RequestChanged { request_id });
            HttpResponse::Ok().json(serde_json::json!({
                "message": "Photo removed",
            }))
        }
        Ok(_) => HttpResponse::NotFound().json(serde_json::json!({
            "error": format!("Photo {photo_id} not found"),
        })),
        Err(e) => db_error_response(&e),
    }
}
