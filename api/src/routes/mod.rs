//! HTTP route entry point for `/api/...`.
//!
//! Route groups:
//! - `/health` → health check (public)
//! - `/auth` → register, login, current user
//! - `/users` → account administration (admin)
//! - `/courses` → courses, memberships, sessions, statistics (authenticated)
//! - `/attendance` → codes, submissions, fraud checks, validation, justification review
//! - `/me` → student views (student)
//! - `/admin` → system overview (admin)

use axum::{Router, middleware::from_fn};
use util::state::AppState;

use crate::auth::guards::{allow_admin, allow_authenticated, allow_student};
use crate::routes::{
    admin::admin_routes, attendance::attendance_routes, auth::auth_routes,
    courses::courses_routes, health::health_routes, me::me_routes, users::users_routes,
};

pub mod admin;
pub mod attendance;
pub mod auth;
pub mod common;
pub mod courses;
pub mod health;
pub mod me;
pub mod users;

/// Builds the router for every HTTP endpoint under `/api`.
///
/// Role gates are applied per group with `route_layer` so unknown paths
/// still fall through to a plain 404.
pub fn routes(app_state: AppState) -> Router<AppState> {
    Router::new()
        .nest("/health", health_routes())
        .nest("/auth", auth_routes())
        .nest("/users", users_routes().route_layer(from_fn(allow_admin)))
        .nest(
            "/courses",
            courses_routes().route_layer(from_fn(allow_authenticated)),
        )
        .nest("/attendance", attendance_routes())
        .nest("/me", me_routes().route_layer(from_fn(allow_student)))
        .nest("/admin", admin_routes().route_layer(from_fn(allow_admin)))
        .with_state(app_state)
}
