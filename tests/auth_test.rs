///! Integration test for JWT auth validation.
///!
///! Mints a JWT locally using the same HS256 secret the server would use,
///! then validates it through `validate_hs256`. No running server or
///! database is needed.
///!
///! Run with: `cargo test --test auth_test`
use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use uuid::Uuid;

use khidma_backend::auth::jwt::{Claims, UserMetadata, validate_hs256};

/// A fake secret for testing — never use the real one in tests committed to git.
const TEST_SECRET: &str = "test-secret-at-least-256-bits-long-for-hs256-xxxxxxx";

/// Helper: mint a JWT signed with HS256 using the test secret.
fn mint_test_token(sub: &str, email: &str, full_name: &str) -> String {
    let now = Utc::now().timestamp() as usize;

    let claims = Claims {
        sub: sub.to_string(),
        exp: now + 3600, // 1 hour from now
        iat: Some(now),
        iss: Some("https://example.supabase.co/auth/v1".to_string()),
        email: Some(email.to_string()),
        role: Some("authenticated".to_string()),
        user_metadata: Some(UserMetadata {
            full_name: Some(full_name.to_string()),
            name: None,
            avatar_url: Some("https://example.com/avatar.png".to_string()),
            picture: None,
            email: Some(email.to_string()),
            email_verified: Some(true),
        }),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .expect("failed to encode test token")
}

#[test]
fn valid_token_roundtrips_claims() {
    let user_id = Uuid::new_v4();
    let token = mint_test_token(&user_id.to_string(), "fatima@example.com", "Fatima A.");

    let claims = validate_hs256(&token, TEST_SECRET).expect("token should validate");
    assert_eq!(claims.user_id().unwrap(), user_id);
    assert_eq!(claims.user_email().as_deref(), Some("fatima@example.com"));
    assert_eq!(claims.display_name().as_deref(), Some("Fatima A."));
}

#[test]
fn wrong_secret_is_rejected() {
    let token = mint_test_token(&Uuid::new_v4().to_string(), "x@example.com", "X");
    assert!(validate_hs256(&token, "another-secret-entirely-wrong-for-this-token").is_err());
}

#[test]
fn expired_token_is_rejected() {
    let past = (Utc::now().timestamp() - 7200) as usize;
    let claims = Claims {
        sub: Uuid::new_v4().to_string(),
        exp: past + 3600, // expired an hour ago
        iat: Some(past),
        iss: None,
        email: None,
        role: None,
        user_metadata: None,
    };
    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .unwrap();

    assert!(validate_hs256(&token, TEST_SECRET).is_err());
}

#[test]
fn garbage_in_sub_claim_fails_user_id() {
    let token = mint_test_token("not-a-uuid", "y@example.com", "Y");
    let claims = validate_hs256(&token, TEST_SECRET).expect("signature is still valid");
    assert!(claims.user_id().is_err());
}
