use actix_web::{HttpResponse, Responder, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::middleware::AuthenticatedUser;
use crate::db::{bookings as booking_db, contracts as contract_db};
use crate::dispatch;
use crate::domain::lifecycle::booking as lifecycle;
use crate::domain::{Party, guards};
use crate::events::{DomainEvent, EventBus};
use crate::handlers::{db_error_response, domain_error_response};
use crate::models::bookings::{self, BuyerCounter, CreateBooking, SellerResponse};
use crate::models::notifications::Kind;

async fn fetch_booking(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<bookings::Model, HttpResponse> {
    match booking_db::get_booking_by_id(db, id).await {
        Ok(Some(booking)) => Ok(booking),
        Ok(None) => Err(HttpResponse::NotFound().json(serde_json::json!({
            "error": format!("Booking {id} not found"),
        }))),
        Err(e) => Err(db_error_response(&e)),
    }
}

/// POST /api/bookings — buyer books a specific seller directly.
pub async fn create_booking(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    bus: web::Data<EventBus>,
    body: web::Json<CreateBooking>,
) -> impl Responder {
    let input = body.into_inner();

    if let Err(e) = lifecycle::validate_new(&input, user.0.id) {
        return domain_error_response(&e);
    }

    let seller_id = input.seller_id;
    match booking_db::insert_booking(db.get_ref(), input, user.0.id).await {
        Ok(booking) => {
            bus.publish(DomainEvent::BookingChanged {
                booking_id: booking.id,
            });
            let notify = vec![crate::domain::Effect::Notify {
                user_id: seller_id,
                kind: Kind::BookingUpdate,
                content_id: Some(booking.id),
            }];
            if let Err(e) = dispatch::dispatch(db.get_ref(), bus.get_ref(), notify).await {
                return domain_error_response(&e.into());
            }
            HttpResponse::Created().json(booking)
        }
        Err(e) => db_error_response(&e),
    }
}

/// GET /api/bookings — both sides of the user's bookings.
pub async fn my_bookings(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> impl Responder {
    let sent = match booking_db::list_by_buyer(db.get_ref(), user.0.id).await {
        Ok(bookings) => bookings,
        Err(e) => return db_error_response(&e),
    };
    let received = match booking_db::list_by_seller(db.get_ref(), user.0.id).await {
        Ok(bookings) => bookings,
        Err(e) => return db_error_response(&e),
    };
    HttpResponse::Ok().json(serde_json::json!({
        "sent": sent,
        "received": received,
    }))
}

/// GET /api/bookings/{id} — visible to the two parties only.
pub async fn get_booking(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> impl Responder {
    let booking = match fetch_booking(db.get_ref(), path.into_inner()).await {
        Ok(booking) => booking,
        Err(response) => return response,
    };
    if !guards::is_booking_party(&booking, user.0.id) {
        return HttpResponse::Forbidden().json(serde_json::json!({
            "error": "Only the booking parties can view it",
        }));
    }
    HttpResponse::Ok().json(booking)
}

/// POST /api/bookings/{id}/respond — seller accepts, declines, or counters.
pub async fn respond(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    bus: web::Data<EventBus>,
    path: web::Path<Uuid>,
    body: web::Json<SellerResponse>,
) -> impl Responder {
    let id = path.into_inner();
    let input = body.into_inner();

    let booking = match fetch_booking(db.get_ref(), id).await {
        Ok(booking) => booking,
        Err(response) => return response,
    };

    let transition = match lifecycle::respond(&booking, input.action, input.message, user.actor())
    {
        Ok(transition) => transition,
        Err(e) => return domain_error_response(&e),
    };

    match dispatch::dispatch(db.get_ref(), bus.get_ref(), transition.effects).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "message": format!("Booking {id} updated"),
        })),
        Err(e) => domain_error_response(&e.into()),
    }
}

/// POST /api/bookings/{id}/counter — buyer counters the seller's
/// counter-proposal with revised terms.
pub async fn buyer_counter(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    bus: web::Data<EventBus>,
    path: web::Path<Uuid>,
    body: web::Json<BuyerCounter>,
) -> impl Responder {
    let id = path.into_inner();
    let input = body.into_inner();

    let booking = match fetch_booking(db.get_ref(), id).await {
        Ok(booking) => booking,
        Err(response) => return response,
    };

    let transition = match lifecycle::buyer_counter(&booking, user.actor()) {
        Ok(transition) => transition,
        Err(e) => return domain_error_response(&e),
    };

    if let Err(e) = booking_db::apply_buyer_counter(db.get_ref(), id, &input).await {
        return db_error_response(&e);
    }

    match dispatch::dispatch(db.get_ref(), bus.get_ref(), transition.effects).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "message": format!("Counter recorded on booking {id}"),
        })),
        Err(e) => domain_error_response(&e.into()),
    }
}

/// POST /api/bookings/{id}/cancel — buyer withdraws; voids any live
/// contract that has not executed.
pub async fn cancel_booking(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    bus: web::Data<EventBus>,
    path: web::Path<Uuid>,
) -> impl Responder {
    let id = path.into_inner();

    let booking = match fetch_booking(db.get_ref(), id).await {
        Ok(booking) => booking,
        Err(response) => return response,
    };
    let contract = match contract_db::find_live_for_booking(db.get_ref(), id).await {
        Ok(contract) => contract,
        Err(e) => return db_error_response(&e),
    };

    let transition = match lifecycle::cancel(&booking, contract.as_ref(), user.actor()) {
        Ok(transition) => transition,
        Err(e) => return domain_error_response(&e),
    };

    match dispatch::dispatch(db.get_ref(), bus.get_ref(), transition.effects).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "message": format!("Booking {id} cancelled"),
        })),
        Err(e) => domain_error_response(&e.into()),
    }
}

/// POST /api/bookings/{id}/complete — either party marks the booked job
/// done; the booking completes once both have.
pub async fn mark_complete(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    bus: web::Data<EventBus>,
    path: web::Path<Uuid>,
) -> impl Responder {
    let id = path.into_inner();

    let booking = match fetch_booking(db.get_ref(), id).await {
        Ok(booking) => booking,
        Err(response) => return response,
    };
    let contract = match contract_db::find_live_for_booking(db.get_ref(), id).await {
        Ok(contract) => contract,
        Err(e) => return db_error_response(&e),
    };

    let side = if user.0.id == booking.buyer_id {
        Party::Buyer
    } else {
        Party::Seller
    };

    let transition =
        match lifecycle::mark_complete(&booking, contract.as_ref(), side, user.actor()) {
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
