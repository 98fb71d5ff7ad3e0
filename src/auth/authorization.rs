use actix_web::HttpResponse;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::db::contracts as contract_db;
use crate::db::requests as request_db;
use crate::domain::guards;
use crate::models::{contracts, requests};

/// Fetch a contract and ensure `user_id` is one of its parties.
pub async fn verify_contract_party(
    db: &DatabaseConnection,
    contract_id: Uuid,
    user_id: Uuid,
) -> Result<contracts::Model, HttpResponse> {
    let contract = contract_db::get_contract_by_id(db, contract_id)
        .await
        .map_err(|e| {
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Database error: {e}"),
            }))
        })?
        .ok_or_else(|| {
            HttpResponse::NotFound().json(serde_json::json!({
                "error": format!("Contract {contract_id} not found"),
            }))
        })?;

    if !guards::is_contract_party(&contract, user_id) {
        return Err(HttpResponse::Forbidden().json(serde_json::json!({
            "error": "You are not a party to this contract",
        })));
    }

    Ok(contract)
}

/// Fetch a request and ensure `user_id` is the posting buyer.
pub async fn verify_request_owner(
    db: &DatabaseConnection,
    request_id: Uuid,
    user_id: Uuid,
) -> Result<requests::Model, HttpResponse> {
    let request = request_db::get_request_by_id(db, request_id)
        .await
        .map_err(|e| {
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Database error: {e}"),
            }))
        })?
        .ok_or_else(|| {
            HttpResponse::NotFound().json(serde_json::json!({
                "error": format!("Request {request_id} not found"),
            }))
        })?;

    if request.buyer_id != user_id {
        return Err(HttpResponse::Forbidden().json(serde_json::json!({
            "error": "You do not own this request",
        })));
    }

    Ok(request)
}
