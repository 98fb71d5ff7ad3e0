use actix_web::FromRequest;
use actix_web::{Error, HttpRequest, dev::Payload, web};
use sea_orm::DatabaseConnection;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::auth::jwks::JwksCache;
use crate::db::profiles::find_or_create_from_auth;
use crate::domain::Actor;
use crate::models::profiles::{self, CreateProfileFromAuth, Roles};

/// Extractor: a validated Supabase user with a profile row in our database.
pub struct AuthenticatedUser(pub profiles::Model);

impl AuthenticatedUser {
    /// The actor handed to lifecycle transitions.
    pub fn actor(&self) -> Actor {
        Actor {
            id: self.0.id,
            role: self.0.role,
        }
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            // 1. Extract the Bearer token from the Authorization header.
            let auth_header = req
                .headers()
                .get("Authorization")
                .and_then(|v| v.to_str().ok())
                .ok_or_else(|| {
                    actix_web::error::ErrorUnauthorized("Missing Authorization header")
                })?;

            let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
                actix_web::error::ErrorUnauthorized("Authorization header must be: Bearer <token>")
            })?;

            // 2. Validate the JWT against the project's JWKS.
            let jwks_cache = req.app_data::<web::Data<Arc<JwksCache>>>().ok_or_else(|| {
                actix_web::error::ErrorInternalServerError("JWKS cache not configured")
            })?;

            // Projects created before the Supabase key rotation sign with a
            // shared HS256 secret instead of publishing a JWKS.
            let claims = match jwks_cache.validate_token(token).await {
                Ok(td) => td.claims,
                Err(jwks_err) => match std::env::var("SUPABASE_JWT_SECRET") {
                    Ok(secret) => crate::auth::jwt::validate_hs256(token, &secret)
                        .map_err(actix_web::error::ErrorUnauthorized)?,
                    Err(_) => {
                        return Err(actix_web::error::ErrorUnauthorized(format!(
                            "Invalid token: {jwks_err}"
                        )));
                    }
                },
            };

            // 3. Extract user info from claims.
            let user_id = claims
                .user_id()
                .map_err(actix_web::error::ErrorUnauthorized)?;

            let email = claims
                .user_email()
                .ok_or_else(|| actix_web::error::ErrorUnauthorized("No email in token claims"))?;

            // 4. Get the database connection.
            let db = req
                .app_data::<web::Data<DatabaseConnection>>()
                .ok_or_else(|| {
                    actix_web::error::ErrorInternalServerError("Database not configured")
                })?;

            // 5. Find or create the profile. New users start as buyers and
            //    switch role via complete-profile.
            let profile = find_or_create_from_auth(
                db.get_ref(),
                CreateProfileFromAuth {
                    id: user_id,
                    email,
                    display_name: claims.display_name(),
                    avatar_url: claims.avatar_url(),
                    auth_provider: "supabase".to_string(),
                    role: Roles::Buyer,
                },
            )
            .await
            .map_err(|e| {
                actix_web::error::ErrorInternalServerError(format!("Database error: {e}"))
            })?;

            Ok(AuthenticatedUser(profile))
        })
    }
}
