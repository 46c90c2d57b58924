#[cfg(test)]
mod tests {
    use crate::helpers::{fixture, make_test_app, send, token_for};
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    #[tokio::test]
    async fn course_listing_is_scoped_by_role() {
        let (app, state) = make_test_app().await;
        let f = fixture(&state).await;

        let (status, json) = send(
            &app,
            Method::POST,
            "/api/courses",
            Some(&token_for(&f.admin)),
            Some(json!({ "name": "Data Structures", "code": "DSA002" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (_, json_admin) =
            send(&app, Method::GET, "/api/courses", Some(&token_for(&f.admin)), None).await;
        assert_eq!(json_admin["data"].as_array().unwrap().len(), 2);

        let (_, json_teacher) =
            send(&app, Method::GET, "/api/courses", Some(&token_for(&f.teacher)), None).await;
        assert_eq!(json_teacher["data"].as_array().unwrap().len(), 1);
        assert_eq!(json_teacher["data"][0]["code"], "DWFS001");

        let (_, json_outsider) =
            send(&app, Method::GET, "/api/courses", Some(&token_for(&f.outsider)), None).await;
        assert!(json_outsider["data"].as_array().unwrap().is_empty());

        let new_id = json["data"]["id"].as_i64().unwrap();
        let (status, _) = send(
            &app,
            Method::GET,
            &format!("/api/courses/{new_id}"),
            Some(&token_for(&f.student)),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn only_admins_change_courses_and_memberships() {
        let (app, state) = make_test_app().await;
        let f = fixture(&state).await;
        let admin = token_for(&f.admin);

        let (status, json) = send(
            &app,
            Method::POST,
            "/api/courses",
            Some(&token_for(&f.teacher)),
            Some(json!({ "name": "Hacking", "code": "CSF003" })),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json["message"], "Admin access required");

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/courses",
            Some(&admin),
            Some(json!({ "name": "Duplicate", "code": "DWFS001" })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let teachers_uri = format!("/api/courses/{}/teachers", f.course.id);
        let (status, json) = send(
            &app,
            Method::POST,
            &teachers_uri,
            Some(&admin),
            Some(json!({ "user_id": f.student.id })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "User is not a teacher");

        let (status, _) = send(
            &app,
            Method::POST,
            &teachers_uri,
            Some(&admin),
            Some(json!({ "user_id": f.other_teacher.id })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, json) = send(
            &app,
            Method::GET,
            &format!("/api/courses/{}", f.course.id),
            Some(&token_for(&f.other_teacher)),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["teachers"].as_array().unwrap().len(), 2);

        let enroll_uri = format!("/api/courses/{}/enrollments", f.course.id);
        let (status, _) = send(
            &app,
            Method::POST,
            &enroll_uri,
            Some(&admin),
            Some(json!({ "user_id": f.student.id })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = send(
            &app,
            Method::POST,
            &enroll_uri,
            Some(&admin),
            Some(json!({ "user_id": f.outsider.id })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, json) =
            send(&app, Method::GET, &enroll_uri, Some(&token_for(&f.teacher)), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"].as_array().unwrap().len(), 2);

        let (status, _) =
            send(&app, Method::GET, &enroll_uri, Some(&token_for(&f.student)), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = send(
            &app,
            Method::DELETE,
            &format!("{enroll_uri}/{}", f.outsider.id),
            Some(&admin),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn teachers_schedule_sessions_of_their_courses() {
        let (app, state) = make_test_app().await;
        let f = fixture(&state).await;
        let teacher = token_for(&f.teacher);
        let sessions_uri = format!("/api/courses/{}/sessions", f.course.id);

        let (status, json) = send(
            &app,
            Method::POST,
            &sessions_uri,
            Some(&teacher),
            Some(json!({ "date": "2030-01-07", "start_time": "14:00:00", "end_time": "17:00:00" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["data"]["course_code"], "DWFS001");
        let session_id = json["data"]["id"].as_i64().unwrap();

        let (status, _) = send(
            &app,
            Method::POST,
            &sessions_uri,
            Some(&teacher),
            Some(json!({ "date": "2030-01-07", "start_time": "14:00:00", "end_time": "16:00:00" })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, json) = send(
            &app,
            Method::PUT,
            &format!("{sessions_uri}/{session_id}"),
            Some(&teacher),
            Some(json!({ "end_time": "13:00:00" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "End time must be after start time.");

        let (status, _) = send(
            &app,
            Method::POST,
            &sessions_uri,
            Some(&token_for(&f.other_teacher)),
            Some(json!({ "date": "2030-01-08", "start_time": "09:00:00", "end_time": "12:00:00" })),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, json) =
            send(&app, Method::GET, &sessions_uri, Some(&token_for(&f.student)), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"].as_array().unwrap().len(), 2);

        let (status, _) = send(
            &app,
            Method::DELETE,
            &format!("{sessions_uri}/{session_id}"),
            Some(&teacher),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, json) = send(
            &app,
            Method::GET,
            &format!("/api/courses/{}/stats", f.course.id),
            Some(&teacher),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["students"][0]["username"], "student1");
    }

    #[tokio::test]
    async fn admin_overview_counts_rows() {
        let (app, state) = make_test_app().await;
        let f = fixture(&state).await;

        let (status, json) =
            send(&app, Method::GET, "/api/admin/overview", Some(&token_for(&f.admin)), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["users"], 5);
        assert_eq!(json["data"]["courses"], 1);
        assert_eq!(json["data"]["class_sessions"], 1);
        assert_eq!(json["data"]["attendance_records"], 0);

        let (status, _) =
            send(&app, Method::GET, "/api/admin/overview", Some(&token_for(&f.teacher)), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }
}
