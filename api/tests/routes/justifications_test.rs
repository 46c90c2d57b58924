#[cfg(test)]
mod tests {
    use crate::helpers::{fixture, make_test_app, send, token_for};
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    #[tokio::test]
    async fn student_submits_and_teacher_reviews_once() {
        let (app, state) = make_test_app().await;
        let f = fixture(&state).await;
        let student = token_for(&f.student);
        let teacher = token_for(&f.teacher);

        let body = json!({
            "class_session_id": f.session.id,
            "description": "Medical appointment",
            "justification_type": "late_arrival",
        });
        let (status, json) =
            send(&app, Method::POST, "/api/me/justifications", Some(&student), Some(body.clone()))
                .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["data"]["status"], "pending");
        assert_eq!(json["data"]["justification_type"], "late_arrival");
        let id = json["data"]["id"].as_i64().unwrap();

        let (status, _) =
            send(&app, Method::POST, "/api/me/justifications", Some(&student), Some(body)).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, json) = send(
            &app,
            Method::GET,
            "/api/attendance/justifications?status=pending",
            Some(&teacher),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"].as_array().unwrap().len(), 1);

        let (_, json) = send(
            &app,
            Method::GET,
            "/api/attendance/justifications",
            Some(&token_for(&f.other_teacher)),
            None,
        )
        .await;
        assert!(json["data"].as_array().unwrap().is_empty());

        let uri = format!("/api/attendance/justifications/{id}");
        let (status, _) = send(
            &app,
            Method::PUT,
            &uri,
            Some(&token_for(&f.other_teacher)),
            Some(json!({ "status": "approved" })),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, json) = send(
            &app,
            Method::PUT,
            &uri,
            Some(&teacher),
            Some(json!({ "status": "approved", "teacher_comment": "Certificate received." })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["status"], "approved");
        assert_eq!(json["data"]["reviewed_by"], f.teacher.id);

        let (status, json) = send(
            &app,
            Method::PUT,
            &uri,
            Some(&teacher),
            Some(json!({ "status": "rejected" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "Justification has already been reviewed.");

        let (_, json) = send(
            &app,
            Method::GET,
            "/api/attendance/justifications?status=pending",
            Some(&teacher),
            None,
        )
        .await;
        assert!(json["data"].as_array().unwrap().is_empty());

        let (_, json) =
            send(&app, Method::GET, "/api/me/justifications", Some(&student), None).await;
        assert_eq!(json["data"][0]["teacher_comment"], "Certificate received.");
    }

    #[tokio::test]
    async fn justification_input_is_checked() {
        let (app, state) = make_test_app().await;
        let f = fixture(&state).await;

        let (status, json) = send(
            &app,
            Method::POST,
            "/api/me/justifications",
            Some(&token_for(&f.student)),
            Some(json!({ "class_session_id": f.session.id, "description": "x".repeat(501) })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "Description must be at most 500 characters.");

        let (status, json) = send(
            &app,
            Method::POST,
            "/api/me/justifications",
            Some(&token_for(&f.outsider)),
            Some(json!({ "class_session_id": f.session.id, "description": "Sick" })),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json["message"], "You are not enrolled in this course.");

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/me/justifications",
            Some(&token_for(&f.student)),
            Some(json!({ "class_session_id": 9999, "description": "Sick" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
