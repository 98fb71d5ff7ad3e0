use actix_web::{HttpResponse, Responder, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::middleware::AuthenticatedUser;
use crate::db::drafts as draft_db;
use crate::handlers::db_error_response;
use crate::models::drafts::SaveDraft;

/// Drafts untouched this long are purged on the next listing.
const DRAFT_TTL_DAYS: i64 = 30;

/// GET /api/drafts — the caller's saved form drafts.
pub async fn list(user: AuthenticatedUser, db: web::Data<DatabaseConnection>) -> impl Responder {
    match draft_db::list_for_owner(db.get_ref(), user.0.id, DRAFT_TTL_DAYS).await {
        Ok(drafts) => HttpResponse::Ok().json(drafts),
        Err(e) => db_error_response(&e),
    }
}

/// POST /api/drafts — save a new draft.
pub async fn save(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    body: web::Json<SaveDraft>,
) -> impl Responder {
    match draft_db::upsert_draft(db.get_ref(), None, user.0.id, body.into_inner()).await {
        Ok(draft) => HttpResponse::Created().json(draft),
        Err(e) => db_error_response(&e),
    }
}

/// PUT /api/drafts/{id} — overwrite an existing draft's payload.
pub async fn update(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<SaveDraft>,
) -> impl Responder {
    let id = path.into_inner();
    match draft_db::upsert_draft(db.get_ref(), Some(id), user.0.id, body.into_inner()).await {
        Ok(draft) => HttpResponse::Ok().json(draft),
        Err(sea_orm::DbErr::RecordNotFound(_)) => {
            HttpResponse::NotFound().json(serde_json::json!({
                "error": format!("Draft {id} not found"),
            }))
        }
        Err(e) => db_error_response(&e),
    }
}

/// DELETE /api/drafts/{id} — e.g. after the form it backed was submitted.
pub async fn delete(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> impl Responder {
    let id = path.into_inner();
    match draft_db::delete_draft(db.get_ref(), id, user.0.id).await {
        Ok(result) if result.rows_affected > 0 => HttpResponse::Ok().json(serde_json::json!({
            "message": format!("Draft {id} deleted"),
        })),
        Ok(_) => HttpResponse::NotFound().json(serde_json::json!({
            "error": format!("Draft {id} not found"),
        })),
        Err(e) => db_error_response(&e),
    }
}
