use actix_web::{HttpResponse, Responder, web};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::middleware::AuthenticatedUser;
use crate::db::notifications as notification_db;
use crate::handlers::db_error_response;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<u64>,
}

/// GET /api/notifications — the caller's notifications, newest first.
pub async fn list(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    query: web::Query<ListQuery>,
) -> impl Responder {
    let limit = query.limit.unwrap_or(50).min(200);
    match notification_db::list_for_user(db.get_ref(), user.0.id, limit).await {
        Ok(notifications) => HttpResponse::Ok().json(notifications),
        Err(e) => db_error_response(&e),
    }
}

/// POST /api/notifications/{id}/read
pub async fn mark_read(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> impl Responder {
    let id = path.into_inner();
    match notification_db::mark_read(db.get_ref(), id, user.0.id).await {
        Ok(0) => HttpResponse::NotFound().json(serde_json::json!({
            "error": format!("Notification {id} not found"),
        })),
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "message": "Notification marked read",
        })),
        Err(e) => db_error_response(&e),
    }
}

/// POST /api/notifications/read-all
pub async fn mark_all_read(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> impl Responder {
    match notification_db::mark_all_read(db.get_ref(), user.0.id).await {
        Ok(count) => HttpResponse::Ok().json(serde_json::json!({
            "marked_read": count,
        })),
        Err(e) => db_error_response(&e),
    }
}
