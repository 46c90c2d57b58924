#[cfg(test)]
mod tests {
    use crate::helpers::{fixture, make_test_app, send, token_for};
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    #[tokio::test]
    async fn register_creates_a_student_with_a_token() {
        let (app, _) = make_test_app().await;

        let (status, json) = send(
            &app,
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({ "username": "student7", "email": "s7@school.edu", "password": "password123" })),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["username"], "student7");
        assert_eq!(json["data"]["role"], "student");
        let token = json["data"]["token"].as_str().unwrap();

        let (status, me) = send(&app, Method::GET, "/api/auth/me", Some(token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(me["data"]["email"], "s7@school.edu");
        assert!(me["data"].get("password_hash").is_none());
    }

    #[tokio::test]
    async fn register_rejects_invalid_and_duplicate_accounts() {
        let (app, state) = make_test_app().await;
        fixture(&state).await;

        let (status, json) = send(
            &app,
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({ "username": "ok-name", "email": "not-an-email", "password": "short" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            json["message"],
            "Invalid email format; Password must be at least 8 characters"
        );

        let (status, json) = send(
            &app,
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({ "username": "student1", "email": "new@school.edu", "password": "password123" })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json["success"], false);
    }

    #[tokio::test]
    async fn login_checks_the_password() {
        let (app, state) = make_test_app().await;
        fixture(&state).await;

        let (status, json) = send(
            &app,
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "username": "prof.silva", "password": "password123" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["role"], "teacher");
        assert!(json["data"]["token"].as_str().is_some());

        let (status, json) = send(
            &app,
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "username": "prof.silva", "password": "wrong-password" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["message"], "Invalid username or password");
    }

    #[tokio::test]
    async fn guards_reject_missing_tokens_and_wrong_roles() {
        let (app, state) = make_test_app().await;
        let f = fixture(&state).await;

        let (status, json) = send(&app, Method::GET, "/api/users", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["message"], "Authentication required");

        let (status, json) =
            send(&app, Method::GET, "/api/users", Some(&token_for(&f.teacher)), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json["message"], "Admin access required");

        let (status, json) = send(
            &app,
            Method::GET,
            "/api/attendance/dashboard",
            Some(&token_for(&f.student)),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json["message"], "Teacher access required");

        let (status, _) = send(
            &app,
            Method::GET,
            "/api/me/calendar",
            Some("not-a-jwt"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn admin_manages_users() {
        let (app, state) = make_test_app().await;
        let f = fixture(&state).await;
        let admin = token_for(&f.admin);

        let (status, json) =
            send(&app, Method::GET, "/api/users?role=teacher", Some(&admin), None).await;
        assert_eq!(status, StatusCode::OK);
        let names: Vec<&str> = json["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|u| u["username"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["prof.costa", "prof.silva"]);

        let (status, json) = send(
            &app,
            Method::PUT,
            &format!("/api/users/{}", f.outsider.id),
            Some(&admin),
            Some(json!({ "role": "teacher" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["role"], "teacher");

        let (status, _) = send(
            &app,
            Method::DELETE,
            &format!("/api/users/{}", f.admin.id),
            Some(&admin),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(
            &app,
            Method::DELETE,
            &format!("/api/users/{}", f.outsider.id),
            Some(&admin),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(
            &app,
            Method::GET,
            &format!("/api/users/{}", f.outsider.id),
            Some(&admin),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
