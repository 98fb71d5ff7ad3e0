use actix_web::{HttpResponse, Responder, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::authorization::verify_contract_party;
use crate::auth::middleware::AuthenticatedUser;
use crate::db::{bookings as booking_db, quotes as quote_db, requests as request_db};
use crate::db::contracts as contract_db;
use crate::dispatch;
use crate::domain::effects::now;
use crate::domain::lifecycle::contract::{self as lifecycle, Origin};
use crate::events::EventBus;
use crate::handlers::{db_error_response, domain_error_response};
use crate::models::contracts;

/// GET /api/contracts — all contracts the user is a party to.
pub async fn my_contracts(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> impl Responder {
    match contract_db::list_for_user(db.get_ref(), user.0.id).await {
        Ok(contracts) => HttpResponse::Ok().json(contracts),
        Err(e) => db_error_response(&e),
    }
}

/// GET /api/contracts/{id}
pub async fn get_contract(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> impl Responder {
    match verify_contract_party(db.get_ref(), path.into_inner(), user.0.id).await {
        Ok(contract) => HttpResponse::Ok().json(contract),
        Err(response) => response,
    }
}

/// POST /api/contracts/{id}/sign — whichever party calls, the engine picks
/// the right signing transition. The seller countersigning executes the
/// contract and flips its origin entity.
pub async fn sign(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    bus: web::Data<EventBus>,
    path: web::Path<Uuid>,
) -> impl Responder {
    let id = path.into_inner();

    let contract = match verify_contract_party(db.get_ref(), id, user.0.id).await {
        Ok(contract) => contract,
        Err(response) => return response,
    };

    let transition = if user.0.id == contract.buyer_id {
        lifecycle::buyer_sign(&contract, user.actor(), now())
    } else {
        let origin = match fetch_origin(db.get_ref(), &contract).await {
            Ok(origin) => origin,
            Err(response) => return response,
        };
        let origin_ref = match &origin {
            FetchedOrigin::Request { request, quote } => Origin::Request { request, quote },
            FetchedOrigin::Booking { booking } => Origin::Booking { booking },
        };
        lifecycle::seller_sign(&contract, origin_ref, user.actor(), now())
    };

    let transition = match transition {
        Ok(transition) => transition,
        Err(e) => return domain_error_response(&e),
    };

    match dispatch::dispatch(db.get_ref(), bus.get_ref(), transition.effects).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "message": format!("Contract {id} signed"),
        })),
        Err(e) => domain_error_response(&e.into()),
    }
}

/// POST /api/contracts/{id}/reject — the seller declines a draft.
pub async fn reject(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    bus: web::Data<EventBus>,
    path: web::Path<Uuid>,
) -> impl Responder {
    let id = path.into_inner();

    let contract = match verify_contract_party(db.get_ref(), id, user.0.id).await {
        Ok(contract) => contract,
        Err(response) => return response,
    };

    let transition = match lifecycle::reject(&contract, user.actor()) {
        Ok(transition) => transition,
        Err(e) => return domain_error_response(&e),
    };

    match dispatch::dispatch(db.get_ref(), bus.get_ref(), transition.effects).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "message": format!("Contract {id} rejected"),
        })),
        Err(e) => domain_error_response(&e.into()),
    }
}

/// POST /api/contracts/{id}/terminate — either party walks away before
/// execution.
pub async fn terminate(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    bus: web::Data<EventBus>,
    path: web::Path<Uuid>,
) -> impl Responder {
    let id = path.into_inner();

    let contract = match verify_contract_party(db.get_ref(), id, user.0.id).await {
        Ok(contract) => contract,
        Err(response) => return response,
    };

    let transition = match lifecycle::terminate(&contract, user.actor()) {
        Ok(transition) => transition,
        Err(e) => return domain_error_response(&e),
    };

    match dispatch::dispatch(db.get_ref(), bus.get_ref(), transition.effects).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "message": format!("Contract {id} terminated"),
        })),
        Err(e) => domain_error_response(&e.into()),
    }
}

/// Owned snapshot of a contract's origin, so the lifecycle engine can borrow
/// into it.
enum FetchedOrigin {
    Request {
        request: crate::models::requests::Model,
        quote: crate::models::quotes::Model,
    },
    Booking {
        booking: crate::models::bookings::Model,
    },
}

async fn fetch_origin(
    db: &DatabaseConnection,
    contract: &contracts::Model,
) -> Result<FetchedOrigin, HttpResponse> {
    if let (Some(request_id), Some(quote_id)) = (contract.request_id, contract.quote_id) {
        let request = request_db::get_request_by_id(db, request_id)
            .await
            .map_err(|e| db_error_response(&e))?
            .ok_or_else(|| {
                HttpResponse::NotFound().json(serde_json::json!({
                    "error": format!("Request {request_id} not found"),
                }))
            })?;
        let quote = quote_db::get_quote_by_id(db, quote_id)
            .await
            .map_err(|e| db_error_response(&e))?
            .ok_or_else(|| {
                HttpResponse::NotFound().json(serde_json::json!({
                    "error": format!("Quote {quote_id} not found"),
                }))
            })?;
        return Ok(FetchedOrigin::Request { request, quote });
    }

    if let Some(booking_id) = contract.booking_id {
        let booking = booking_db::get_booking_by_id(db, booking_id)
            .await
            .map_err(|e| db_error_response(&e))?
            .ok_or_else(|| {
                HttpResponse::NotFound().json(serde_json::json!({
                    "error": format!("Booking {booking_id} not found"),
                }))
            })?;
        return Ok(FetchedOrigin::Booking { booking });
    }

    Err(HttpResponse::InternalServerError().json(serde_json::json!({
        "error": "Contract has no origin",
    })))
}
