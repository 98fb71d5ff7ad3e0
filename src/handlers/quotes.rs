use actix_web::{HttpResponse, Responder, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::middleware::AuthenticatedUser;
use crate::db::{
    StoreError, contracts as contract_db, negotiations as negotiation_db, quotes as quote_db,
    requests as request_db,
};
use crate::dispatch;
use crate::domain::LifecycleConfig;
use crate::domain::lifecycle::{quote as lifecycle, request as request_lifecycle};
use crate::events::EventBus;
use crate::handlers::{db_error_response, domain_error_response};
use crate::models::contracts::ContractTerms;
use crate::models::quotes::{self, CounterOffer, CreateQuote};
use crate::models::requests;

async fn fetch_request(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<requests::Model, HttpResponse> {
    match request_db::get_request_by_id(db, id).await {
        Ok(Some(request)) => Ok(request),
        Ok(None) => Err(HttpResponse::NotFound().json(serde_json::json!({
            "error": format!("Request {id} not found"),
        }))),
        Err(e) => Err(db_error_response(&e)),
    }
}

async fn fetch_quote(db: &DatabaseConnection, id: Uuid) -> Result<quotes::Model, HttpResponse> {
    match quote_db::get_quote_by_id(db, id).await {
        Ok(Some(quote)) => Ok(quote),
        Ok(None) => Err(HttpResponse::NotFound().json(serde_json::json!({
            "error": format!("Quote {id} not found"),
        }))),
        Err(e) => Err(db_error_response(&e)),
    }
}

/// POST /api/requests/{id}/quotes — a seller submits an offer.
pub async fn submit_quote(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    bus: web::Data<EventBus>,
    path: web::Path<Uuid>,
    body: web::Json<CreateQuote>,
) -> impl Responder {
    let request_id = path.into_inner();
    let input = body.into_inner();

    if let Err(e) = lifecycle::validate_new(&input) {
        return domain_error_response(&e);
    }

    let request = match fetch_request(db.get_ref(), request_id).await {
        Ok(request) => request,
        Err(response) => return response,
    };
    let existing = match quote_db::list_by_request(db.get_ref(), request_id).await {
        Ok(quotes) => quotes,
        Err(e) => return db_error_response(&e),
    };

    let transition = match request_lifecycle::submit_quote(&request, &existing, user.actor()) {
        Ok(transition) => transition,
        Err(e) => return domain_error_response(&e),
    };

    let quote = match quote_db::insert_quote(db.get_ref(), input, request_id, user.0.id).await {
        Ok(quote) => quote,
        Err(e) => return db_error_response(&e),
    };

    match dispatch::dispatch(db.get_ref(), bus.get_ref(), transition.effects).await {
        Ok(()) => HttpResponse::Created().json(quote),
        Err(e) => domain_error_response(&e.into()),
    }
}

/// GET /api/requests/{id}/quotes — all quotes on a request, oldest first.
pub async fn list_for_request(
    _user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> impl Responder {
    match quote_db::list_by_request(db.get_ref(), path.into_inner()).await {
        Ok(quotes) => HttpResponse::Ok().json(quotes),
        Err(e) => db_error_response(&e),
    }
}

/// GET /api/quotes/mine — everything this seller has quoted on.
pub async fn my_quotes(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> impl Responder {
    match quote_db::list_by_seller(db.get_ref(), user.0.id).await {
        Ok(quotes) => HttpResponse::Ok().json(quotes),
        Err(e) => db_error_response(&e),
    }
}

/// POST /api/quotes/{id}/accept — buyer accepts a quote, producing a
/// contract draft (or replacing an unsigned one from an earlier pick).
///
/// A stale compare-and-swap is retried once with fresh state before giving
/// the client a conflict.
pub async fn accept_quote(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    bus: web::Data<EventBus>,
    cfg: web::Data<LifecycleConfig>,
    path: web::Path<Uuid>,
    body: web::Json<ContractTerms>,
) -> impl Responder {
    let quote_id = path.into_inner();
    let terms = body.into_inner();

    for attempt in 0..2 {
        let quote = match fetch_quote(db.get_ref(), quote_id).await {
            Ok(quote) => quote,
            Err(response) => return response,
        };
        let request = match fetch_request(db.get_ref(), quote.request_id).await {
            Ok(request) => request,
            Err(response) => return response,
        };
        let siblings = match quote_db::list_by_request(db.get_ref(), request.id).await {
            Ok(quotes) => quotes,
            Err(e) => return db_error_response(&e),
        };
        let contract = match contract_db::find_live_for_request(db.get_ref(), request.id).await {
            Ok(contract) => contract,
            Err(e) => return db_error_response(&e),
        };

        let transition = match request_lifecycle::accept_quote(
            &request,
            &quote,
            &siblings,
            contract.as_ref(),
            &terms,
            user.actor(),
            *cfg.get_ref(),
        ) {
            Ok(transition) => transition,
            Err(e) => return domain_error_response(&e),
        };

        match dispatch::dispatch(db.get_ref(), bus.get_ref(), transition.effects).await {
            Ok(()) => {
                return HttpResponse::Ok().json(serde_json::json!({
                    "message": "Quote accepted, contract draft created",
                }));
            }
            Err(StoreError::StaleState { .. }) if attempt == 0 => {
                tracing::debug!(quote_id = %quote_id, "stale accept, retrying with fresh state");
                continue;
            }
            Err(e) => return domain_error_response(&e.into()),
        }
    }

    HttpResponse::Conflict().json(serde_json::json!({
        "error": "Quote state changed concurrently, please retry",
        "code": "stale_state",
    }))
}

/// POST /api/quotes/{id}/reject — buyer rejects the offer or seller
/// withdraws it.
pub async fn reject_quote(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    bus: web::Data<EventBus>,
    path: web::Path<Uuid>,
) -> impl Responder {
    let quote_id = path.into_inner();

    let quote = match fetch_quote(db.get_ref(), quote_id).await {
        Ok(quote) => quote,
        Err(response) => return response,
    };
    let request = match fetch_request(db.get_ref(), quote.request_id).await {
        Ok(request) => request,
        Err(response) => return response,
    };

    let transition = match lifecycle::reject(&quote, &request, user.actor()) {
        Ok(transition) => transition,
        Err(e) => return domain_error_response(&e),
    };

    match dispatch::dispatch(db.get_ref(), bus.get_ref(), transition.effects).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "message": format!("Quote {quote_id} rejected"),
        })),
        Err(e) => domain_error_response(&e.into()),
    }
}

/// POST /api/quotes/{id}/counter — either party records a counter-offer.
pub async fn counter_offer(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    bus: web::Data<EventBus>,
    path: web::Path<Uuid>,
    body: web::Json<CounterOffer>,
) -> impl Responder {
    let quote_id = path.into_inner();
    let input = body.into_inner();

    if input.message.trim().is_empty() {
        return HttpResponse::UnprocessableEntity().json(serde_json::json!({
            "error": "message is required",
            "code": "validation",
        }));
    }

    let quote = match fetch_quote(db.get_ref(), quote_id).await {
        Ok(quote) => quote,
        Err(response) => return response,
    };
    let request = match fetch_request(db.get_ref(), quote.request_id).await {
        Ok(request) => request,
        Err(response) => return response,
    };

    let transition = match lifecycle::counter(&quote, &request, user.actor()) {
        Ok(transition) => transition,
        Err(e) => return domain_error_response(&e),
    };

    let negotiation = match negotiation_db::insert_negotiation(
        db.get_ref(),
        quote_id,
        user.0.id,
        input.price,
        input.message,
    )
    .await
    {
        Ok(negotiation) => negotiation,
        Err(e) => return db_error_response(&e),
    };

    match dispatch::dispatch(db.get_ref(), bus.get_ref(), transition.effects).await {
        Ok(()) => HttpResponse::Created().json(negotiation),
        Err(e) => domain_error_response(&e.into()),
    }
}

/// GET /api/quotes/{id}/negotiations — the counter-offer history.
pub async fn list_negotiations(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> impl Responder {
    let quote_id = path.into_inner();

    let quote = match fetch_quote(db.get_ref(), quote_id).await {
        Ok(quote) => quote,
        Err(response) => return response,
    };
    let request = match fetch_request(db.get_ref(), quote.request_id).await {
        Ok(request) => request,
        Err(response) => return response,
    };
    if user.0.id != quote.seller_id && user.0.id != request.buyer_id {
        return HttpResponse::Forbidden().json(serde_json::json!({
            "error": "Only the negotiating parties can view this thread",
        }));
    }

    match negotiation_db::list_by_quote(db.get_ref(), quote_id).await {
        Ok(negotiations) => HttpResponse::Ok().json(negotiations),
        Err(e) => db_error_response(&e),
    }
}
