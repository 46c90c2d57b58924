use axum::{
    extract::{FromRequestParts, Query},
    http::{StatusCode, request::Parts},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::Deserialize;
use util::config;

use crate::auth::claims::{AuthUser, Claims};

#[derive(Deserialize)]
struct TokenQuery {
    token: Option<String>,
}

/// Decodes and verifies an HS256 token against the configured secret.
pub fn decode_token(token: &str) -> Option<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config::jwt_secret().as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .ok()
    .map(|data| data.claims)
}

/// Extracts `AuthUser` from a Bearer `Authorization` header.
///
/// Browsers cannot set headers on a WebSocket handshake, so a `?token=` query
/// parameter is accepted as a fallback.
///
/// # Errors
/// - `401 Unauthorized` if no token is supplied or it is invalid or expired.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(AuthUser(claims)) = parts.extensions.get::<AuthUser>() {
            return Ok(AuthUser(claims.clone()));
        }

        let token = match TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state).await {
            Ok(TypedHeader(Authorization(bearer))) => bearer.token().to_owned(),
            Err(_) => Query::<TokenQuery>::from_request_parts(parts, state)
                .await
                .ok()
                .and_then(|Query(q)| q.token)
                .ok_or((StatusCode::UNAUTHORIZED, "Missing or invalid Authorization header"))?,
        };

        decode_token(&token)
            .map(AuthUser)
            .ok_or((StatusCode::UNAUTHORIZED, "Invalid or expired token"))
    }
}
