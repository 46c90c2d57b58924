#[cfg(test)]
mod tests {
    use crate::helpers::{fixture, make_test_app, send, token_for};
    use axum::http::{Method, StatusCode};
    use chrono::{Duration, NaiveTime, Utc};
    use db::models::{attendance_code, attendance_record, class_session};
    use sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, Set};
    use serde_json::{Value, json};

    async fn generate(app: &axum::Router, token: &str, session_id: i64) -> (StatusCode, Value) {
        send(
            app,
            Method::POST,
            "/api/attendance/codes",
            Some(token),
            Some(json!({ "class_session_id": session_id })),
        )
        .await
    }

    async fn submit(app: &axum::Router, token: &str, body: Value) -> (StatusCode, Value) {
        send(app, Method::POST, "/api/attendance/submit", Some(token), Some(body)).await
    }

    #[tokio::test]
    async fn code_submission_then_duplicate_is_informational() {
        let (app, state) = make_test_app().await;
        let f = fixture(&state).await;
        let teacher = token_for(&f.teacher);
        let student = token_for(&f.student);

        let (status, json) = generate(&app, &teacher, f.session.id).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["data"]["status"], "active");
        let code = json["data"]["code"].as_str().unwrap().to_string();
        assert_eq!(code.len(), 6);

        let (status, json) = submit(
            &app,
            &student,
            json!({ "code": format!("  {}  ", code.to_lowercase()), "simulated_ip": "192.168.1.20", "latitude": 41.5369, "longitude": -8.4239 }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["data"]["status"], "success");
        assert_eq!(json["data"]["record"]["is_present"], false);
        assert_eq!(json["data"]["record"]["simulated_ip"], "192.168.1.20");

        let (status, json) = submit(&app, &student, json!({ "code": code })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["status"], "info");
        assert_eq!(
            json["message"],
            "You have already submitted attendance for this class."
        );

        let rows = attendance_record::Entity::find()
            .count(state.db())
            .await
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[tokio::test]
    async fn submission_rejections() {
        let (app, state) = make_test_app().await;
        let f = fixture(&state).await;
        let teacher = token_for(&f.teacher);
        let student = token_for(&f.student);

        let (status, json) = submit(&app, &student, json!({ "code": "   " })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "Attendance code is required.");

        let (status, json) = submit(&app, &student, json!({ "code": "ZZZZZZ" })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "Invalid attendance code.");

        let (_, json) = generate(&app, &teacher, f.session.id).await;
        let code = json["data"]["code"].as_str().unwrap().to_string();

        let (status, json) =
            submit(&app, &token_for(&f.outsider), json!({ "code": code })).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json["message"], "You are not enrolled in this course.");

        // Telemetry never masks a code failure
        let (status, json) =
            submit(&app, &student, json!({ "code": "", "simulated_ip": "not-an-ip" })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "Attendance code is required.");

        let stored = attendance_code::Model::find_for_session(state.db(), f.session.id)
            .await
            .unwrap()
            .unwrap();
        let mut expired: attendance_code::ActiveModel = stored.into();
        expired.expires_at = Set(Utc::now() - Duration::minutes(1));
        expired.update(state.db()).await.unwrap();

        let (status, json) = submit(&app, &student, json!({ "code": code })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "Attendance code has expired.");
    }

    #[tokio::test]
    async fn submission_accepts_legacy_field_names_and_raw_ip() {
        let (app, state) = make_test_app().await;
        let f = fixture(&state).await;
        let (_, json) = generate(&app, &token_for(&f.teacher), f.session.id).await;
        let code = json["data"]["code"].as_str().unwrap().to_lowercase();

        let (status, json) = submit(
            &app,
            &token_for(&f.student),
            json!({
                "attendance_code": code,
                "simulated_ip": " lab-proxy-7 ",
                "simulated_latitude": 41.5369,
                "simulated_longitude": -8.4239,
            }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["data"]["status"], "success");
        assert_eq!(json["data"]["record"]["simulated_ip"], "lab-proxy-7");
        assert_eq!(json["data"]["record"]["latitude"], 41.5369);
    }

    #[tokio::test]
    async fn regenerating_invalidates_the_previous_code() {
        let (app, state) = make_test_app().await;
        let f = fixture(&state).await;
        let teacher = token_for(&f.teacher);

        let (_, first) = generate(&app, &teacher, f.session.id).await;
        let (_, second) = generate(&app, &teacher, f.session.id).await;
        let old = first["data"]["code"].as_str().unwrap();
        let new = second["data"]["code"].as_str().unwrap();

        let codes = attendance_code::Entity::find().count(state.db()).await.unwrap();
        assert_eq!(codes, 1);

        if old != new {
            let (status, json) =
                submit(&app, &token_for(&f.student), json!({ "code": old })).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(json["message"], "Invalid attendance code.");
        }

        let (status, json) = send(
            &app,
            Method::GET,
            "/api/attendance/codes/current",
            Some(&teacher),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["status"], "active");
        assert_eq!(json["data"]["code"]["code"], new);
        assert_eq!(json["data"]["session"]["id"], f.session.id);
    }

    #[tokio::test]
    async fn code_generation_is_limited_to_own_sessions_today() {
        let (app, state) = make_test_app().await;
        let f = fixture(&state).await;

        let (status, _) = generate(&app, &token_for(&f.other_teacher), f.session.id).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = generate(&app, &token_for(&f.teacher), 9999).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let yesterday = class_session::Model::create(
            state.db(),
            f.course.id,
            f.session.date - Duration::days(1),
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
        )
        .await
        .unwrap();
        let (status, json) = generate(&app, &token_for(&f.teacher), yesterday.id).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            json["message"],
            "Cannot generate code for past or non-today class."
        );

        let (status, _) = generate(&app, &token_for(&f.admin), f.session.id).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    #[tokio::test]
    async fn only_the_course_teacher_validates_and_checks_fraud() {
        let (app, state) = make_test_app().await;
        let f = fixture(&state).await;
        let teacher = token_for(&f.teacher);
        let other = token_for(&f.other_teacher);

        let (_, json) = generate(&app, &teacher, f.session.id).await;
        let code = json["data"]["code"].as_str().unwrap().to_string();
        let (_, json) = submit(
            &app,
            &token_for(&f.student),
            json!({ "code": code, "latitude": 42.0, "longitude": -8.4239 }),
        )
        .await;
        let record_id = json["data"]["record"]["id"].as_i64().unwrap();

        let fraud_uri = format!(
            "/api/attendance/sessions/{}/records/{record_id}/fraud-check",
            f.session.id
        );
        let validate_uri = format!("/api/attendance/records/{record_id}/validate");

        let (status, _) = send(&app, Method::POST, &fraud_uri, Some(&other), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        let (status, json) = send(&app, Method::POST, &validate_uri, Some(&other), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json["message"], "Permission denied.");

        let (status, json) = send(&app, Method::POST, &fraud_uri, Some(&teacher), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["fraud_check"]["is_fraudulent"], true);
        assert_eq!(
            json["data"]["fraud_check"]["explanation"],
            "Geolocation is outside the expected classroom area."
        );
        assert_eq!(json["data"]["record"]["is_fraudulent"], true);

        let wrong_session = format!(
            "/api/attendance/sessions/{}/records/{record_id}/fraud-check",
            f.session.id + 1
        );
        let (status, _) = send(&app, Method::POST, &wrong_session, Some(&teacher), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, json) = send(&app, Method::POST, &validate_uri, Some(&teacher), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["is_present"], true);
        assert_eq!(json["data"]["validated_by"], f.teacher.id);

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/attendance/records/9999/validate",
            Some(&teacher),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn dashboard_and_submissions_show_the_live_session() {
        let (app, state) = make_test_app().await;
        let f = fixture(&state).await;
        let teacher = token_for(&f.teacher);

        let (_, json) = generate(&app, &teacher, f.session.id).await;
        let code = json["data"]["code"].as_str().unwrap().to_string();
        submit(&app, &token_for(&f.student), json!({ "code": code })).await;

        let (status, json) =
            send(&app, Method::GET, "/api/attendance/dashboard", Some(&teacher), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["selected_session_id"], f.session.id);
        assert_eq!(json["data"]["code"]["code"], code);
        assert_eq!(json["data"]["submissions"].as_array().unwrap().len(), 1);
        assert_eq!(
            json["data"]["submissions"][0]["student_username"],
            "student1"
        );
        assert_eq!(
            json["data"]["known_valid_locations"][0]["latitude"],
            41.5369
        );

        let uri = format!("/api/attendance/sessions/{}/submissions", f.session.id);
        let (status, json) = send(&app, Method::GET, &uri, Some(&teacher), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["session"]["course_code"], "DWFS001");
        assert_eq!(json["data"]["submissions"].as_array().unwrap().len(), 1);

        let (status, _) =
            send(&app, Method::GET, &uri, Some(&token_for(&f.other_teacher)), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }
}
