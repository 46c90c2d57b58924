use api::{auth::generate_jwt, routes::routes, ws::ws_routes};
use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode},
};
use chrono::{NaiveTime, Utc};
use db::models::{class_session, course, course_teacher, enrollment, user};
use db::test_utils::setup_test_db;
use serde_json::Value;
use tower::ServiceExt;
use util::config::AppConfig;
use util::state::AppState;
use util::time;
use util::ws::WebSocketManager;

/// Router over a fresh in-memory database, without the connect-info logger.
///
/// Random fraud flags are disabled so verdicts depend on geolocation only.
pub async fn make_test_app() -> (Router, AppState) {
    AppConfig::set_jwt_secret("test-secret");
    AppConfig::set_fraud_random_rate(0.0);

    let db = setup_test_db().await;
    let state = AppState::new(db, WebSocketManager::new());
    let router = Router::new()
        .nest("/api", routes(state.clone()))
        .nest("/ws", ws_routes(state.clone()))
        .with_state(state.clone());

    (router, state)
}

pub fn token_for(user: &user::Model) -> String {
    generate_jwt(user.id, user.role).unwrap().0
}

/// Sends one request and returns the status with the parsed JSON body.
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        req = req.header("Authorization", format!("Bearer {token}"));
    }
    let req = match body {
        Some(json) => req
            .header("Content-Type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => req.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

pub struct Fixture {
    pub admin: user::Model,
    pub teacher: user::Model,
    pub other_teacher: user::Model,
    pub student: user::Model,
    pub outsider: user::Model,
    pub course: course::Model,
    /// Runs all day today, so codes can be issued for it.
    pub session: class_session::Model,
}

/// One course taught by `prof.silva` with `student1` enrolled; `prof.costa`
/// and `student9` are unrelated to it.
pub async fn fixture(state: &AppState) -> Fixture {
    let db = state.db();
    let admin = user::Model::create(db, "admin", "admin@school.edu", "password123", user::Role::Admin)
        .await
        .unwrap();
    let teacher = user::Model::create(db, "prof.silva", "silva@school.edu", "password123", user::Role::Teacher)
        .await
        .unwrap();
    let other_teacher =
        user::Model::create(db, "prof.costa", "costa@school.edu", "password123", user::Role::Teacher)
            .await
            .unwrap();
    let student = user::Model::create(db, "student1", "s1@school.edu", "password123", user::Role::Student)
        .await
        .unwrap();
    let outsider = user::Model::create(db, "student9", "s9@school.edu", "password123", user::Role::Student)
        .await
        .unwrap();

    let course = course::Model::create(db, "Web Development", "DWFS001", Some("Full stack"))
        .await
        .unwrap();
    course_teacher::Model::assign(db, course.id, teacher.id).await.unwrap();
    enrollment::Model::enroll(db, student.id, course.id).await.unwrap();

    let today = time::to_local(Utc::now()).date();
    let session = class_session::Model::create(
        db,
        course.id,
        today,
        NaiveTime::from_hms_opt(0, 0, 0).unwrap(),
        NaiveTime::from_hms_opt(23, 59, 59).unwrap(),
    )
    .await
    .unwrap();

    Fixture {
        admin,
        teacher,
        other_teacher,
        student,
        outsider,
        course,
        session,
    }
}
