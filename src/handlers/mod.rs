pub mod auth;
pub mod bookings;
pub mod contracts;
pub mod drafts;
pub mod jobs;
pub mod notifications;
pub mod profiles;
pub mod quotes;
pub mod requests;

use actix_web::{HttpResponse, web};

use crate::domain::{DomainError, GuardViolation};

/// Map a domain error to its HTTP shape. Guard violations get a stable
/// machine-readable code so clients can show the specific message.
pub(crate) fn domain_error_response(err: &DomainError) -> HttpResponse {
    match err {
        DomainError::Validation(msg) => HttpResponse::UnprocessableEntity().json(
            serde_json::json!({ "error": msg, "code": "validation" }),
        ),
        DomainError::Guard(GuardViolation::NotOwner) => HttpResponse::Forbidden().json(
            serde_json::json!({ "error": GuardViolation::NotOwner.to_string(), "code": "not_owner" }),
        ),
        DomainError::Guard(violation) => HttpResponse::Conflict().json(serde_json::json!({
            "error": violation.to_string(),
            "code": guard_code(violation),
        })),
        DomainError::StaleState { .. } => HttpResponse::Conflict().json(serde_json::json!({
            "error": err.to_string(),
            "code": "stale_state",
        })),
        DomainError::NotFound { .. } => HttpResponse::NotFound().json(serde_json::json!({
            "error": err.to_string(),
            "code": "not_found",
        })),
        DomainError::Internal(_) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": err.to_string(),
            "code": "internal",
        })),
    }
}

fn guard_code(violation: &GuardViolation) -> &'static str {
    match violation {
        GuardViolation::AlreadyContracted => "already_contracted",
        GuardViolation::NotOwner => "not_owner",
        GuardViolation::InvalidStateForEdit => "invalid_state_for_edit",
        GuardViolation::MissingRequiredField(_) => "missing_required_field",
        GuardViolation::QuoteAlreadyAccepted => "quote_already_accepted",
        GuardViolation::InvalidTransition => "invalid_transition",
    }
}

pub(crate) fn db_error_response(e: &sea_orm::DbErr) -> HttpResponse {
    HttpResponse::InternalServerError().json(serde_json::json!({
        "error": format!("Database error: {e}"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use uuid::Uuid;

    #[test]
    fn domain_errors_map_to_their_http_statuses() {
        let cases = [
            (
                domain_error_response(&DomainError::Validation("bad input".into())),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                domain_error_response(&DomainError::Guard(GuardViolation::NotOwner)),
                StatusCode::FORBIDDEN,
            ),
            (
                domain_error_response(&DomainError::Guard(GuardViolation::AlreadyContracted)),
                StatusCode::CONFLICT,
            ),
            (
                domain_error_response(&DomainError::StaleState {
                    entity: "contract",
                    id: Uuid::new_v4(),
                }),
                StatusCode::CONFLICT,
            ),
            (
                domain_error_response(&DomainError::NotFound {
                    entity: "request",
                    id: Uuid::new_v4(),
                }),
                StatusCode::NOT_FOUND,
            ),
            (
                domain_error_response(&DomainError::Internal("storage failure".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (response, expected) in cases {
            assert_eq!(response.status(), expected);
        }
    }
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    // ── Auth routes (protected by JWT via the AuthenticatedUser extractor) ──
    cfg.service(
        web::scope("/auth")
            .route("/me", web::get().to(auth::me))
            .route("/complete-profile", web::post().to(auth::complete_profile)),
    );

    // ── Profiles ──
    cfg.service(
        web::scope("/profiles")
            .route("/sellers", web::get().to(profiles::list_sellers))
            .route("/{id}", web::get().to(profiles::get_profile)),
    );

    // ── Requests and their quotes/photos ──
    cfg.service(
        web::scope("/requests")
            .route("", web::get().to(requests::list_requests))
            .route("", web::post().to(requests::create_request))
            .route("/mine", web::get().to(requests::my_requests))
            .route("/{id}", web::get().to(requests::get_request))
            .route("/{id}", web::put().to(requests::update_request))
            .route("/{id}", web::delete().to(requests::delete_request))
            .route("/{id}/cancel", web::post().to(requests::cancel_request))
            .route("/{id}/complete", web::post().to(requests::mark_complete))
            .route("/{id}/progress", web::get().to(jobs::request_progress))
            .route("/{id}/photos", web::post().to(requests::upload_photo))
            .route(
                "/{id}/photos/{photo_id}",
                web::delete().to(requests::delete_photo),
            )
            .route("/{id}/quotes", web::get().to(quotes::list_for_request))
            .route("/{id}/quotes", web::post().to(quotes::submit_quote)),
    );

    // ── Quotes ──
    cfg.service(
        web::scope("/quotes")
            .route("/mine", web::get().to(quotes::my_quotes))
            .route("/{id}/accept", web::post().to(quotes::accept_quote))
            .route("/{id}/reject", web::post().to(quotes::reject_quote))
            .route("/{id}/counter", web::post().to(quotes::counter_offer))
            .route("/{id}/negotiations", web::get().to(quotes::list_negotiations)),
    );

    // ── Bookings ──
    cfg.service(
        web::scope("/bookings")
            .route("", web::get().to(bookings::my_bookings))
            .route("", web::post().to(bookings::create_booking))
            .route("/{id}", web::get().to(bookings::get_booking))
            .route("/{id}/respond", web::post().to(bookings::respond))
            .route("/{id}/counter", web::post().to(bookings::buyer_counter))
            .route("/{id}/cancel", web::post().to(bookings::cancel_booking))
            .route("/{id}/complete", web::post().to(bookings::mark_complete)),
    );

    // ── Contracts ──
    cfg.service(
        web::scope("/contracts")
            .route("", web::get().to(contracts::my_contracts))
            .route("/{id}", web::get().to(contracts::get_contract))
            .route("/{id}/sign", web::post().to(contracts::sign))
            .route("/{id}/reject", web::post().to(contracts::reject))
            .route("/{id}/terminate", web::post().to(contracts::terminate)),
    );

    // ── Notifications ──
    cfg.service(
        web::scope("/notifications")
            .route("", web::get().to(notifications::list))
            .route("/read-all", web::post().to(notifications::mark_all_read))
            .route("/{id}/read", web::post().to(notifications::mark_read)),
    );

    // ── Drafts ──
    cfg.service(
        web::scope("/drafts")
            .route("", web::get().to(drafts::list))
            .route("", web::post().to(drafts::save))
            .route("/{id}", web::put().to(drafts::update))
            .route("/{id}", web::delete().to(drafts::delete)),
    );

    // ── Unified active-jobs view ──
    cfg.service(web::resource("/me/active-jobs").route(web::get().to(jobs::active_jobs)));
}
