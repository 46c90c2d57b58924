//! Role gates applied with `route_layer(from_fn(...))`.
//!
//! Each guard authenticates the request, inserts the `AuthUser` into the
//! request extensions for downstream handlers, and checks the global role.
//! Course-level ownership is checked by the handlers themselves.

use crate::auth::claims::{AuthUser, Claims};
use crate::response::{ApiResponse, Empty};
use axum::{
    Json,
    body::Body,
    extract::FromRequestParts,
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};

type GuardRejection = (StatusCode, Json<ApiResponse<Empty>>);

/// Helper to extract, validate user from request extensions and insert the back into the request
async fn extract_and_insert_authuser(
    req: Request<Body>,
) -> Result<(Request<Body>, AuthUser), GuardRejection> {
    let (mut parts, body) = req.into_parts();
    let user = AuthUser::from_request_parts(&mut parts, &())
        .await
        .map_err(|_| {
            (
                StatusCode::UNAUTHORIZED,
                Json(ApiResponse::error("Authentication required")),
            )
        })?;

    let mut req = Request::from_parts(parts, body);
    req.extensions_mut().insert(user.clone());
    Ok((req, user))
}

async fn allow_if(
    req: Request<Body>,
    next: Next,
    allowed: fn(&Claims) -> bool,
    failure_msg: &str,
) -> Result<Response, GuardRejection> {
    let (req, user) = extract_and_insert_authuser(req).await?;

    if !allowed(&user.0) {
        tracing::debug!(user_id = user.0.sub, role = %user.0.role, "Role gate refused request");
        return Err((StatusCode::FORBIDDEN, Json(ApiResponse::error(failure_msg))));
    }

    Ok(next.run(req).await)
}

/// Basic guard to ensure the request is authenticated.
pub async fn allow_authenticated(
    req: Request<Body>,
    next: Next,
) -> Result<Response, GuardRejection> {
    let (req, _user) = extract_and_insert_authuser(req).await?;

    Ok(next.run(req).await)
}

/// Admin-only guard.
pub async fn allow_admin(req: Request<Body>, next: Next) -> Result<Response, GuardRejection> {
    allow_if(req, next, Claims::is_admin, "Admin access required").await
}

/// Teachers, and admins acting on their behalf.
pub async fn allow_teacher(req: Request<Body>, next: Next) -> Result<Response, GuardRejection> {
    allow_if(
        req,
        next,
        |claims| claims.is_teacher() || claims.is_admin(),
        "Teacher access required",
    )
    .await
}

/// Student-only guard.
pub async fn allow_student(req: Request<Body>, next: Next) -> Result<Response, GuardRejection> {
    allow_if(req, next, Claims::is_student, "Student access required").await
}
