#[cfg(test)]
mod tests {
    use crate::helpers::{fixture, make_test_app, send, token_for};
    use axum::http::{Method, StatusCode};
    use chrono::{Duration, NaiveTime, Utc};
    use db::models::attendance_record::{self, Telemetry};
    use db::models::{attendance_code, class_session};

    #[tokio::test]
    async fn classes_views_list_todays_session() {
        let (app, state) = make_test_app().await;
        let f = fixture(&state).await;
        let student = token_for(&f.student);

        for uri in ["/api/me/classes/current", "/api/me/classes/today", "/api/me/classes/weekly"] {
            let (status, json) = send(&app, Method::GET, uri, Some(&student), None).await;
            assert_eq!(status, StatusCode::OK, "{uri}");
            assert_eq!(json["data"][0]["id"], f.session.id, "{uri}");
            assert_eq!(json["data"][0]["course_name"], "Web Development", "{uri}");
        }

        let (_, json) = send(
            &app,
            Method::GET,
            "/api/me/classes/today",
            Some(&token_for(&f.outsider)),
            None,
        )
        .await;
        assert!(json["data"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn calendar_lists_upcoming_sessions() {
        let (app, state) = make_test_app().await;
        let f = fixture(&state).await;

        let (status, json) = send(
            &app,
            Method::GET,
            "/api/me/calendar",
            Some(&token_for(&f.student)),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let events = json["data"].as_array().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0]["title"], "Web Development");
        assert_eq!(
            events[0]["start"],
            format!("{}T00:00:00", f.session.date.format("%Y-%m-%d"))
        );
        assert_eq!(
            events[0]["end"],
            format!("{}T23:59:59", f.session.date.format("%Y-%m-%d"))
        );
    }

    #[tokio::test]
    async fn history_reports_present_pending_and_absent() {
        let (app, state) = make_test_app().await;
        let f = fixture(&state).await;
        let db = state.db();

        let day = |n: i64| f.session.date - Duration::days(n);
        let nine = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap();
        let present = class_session::Model::create(db, f.course.id, day(3), nine, noon).await.unwrap();
        let pending = class_session::Model::create(db, f.course.id, day(2), nine, noon).await.unwrap();
        let absent = class_session::Model::create(db, f.course.id, day(1), nine, noon).await.unwrap();

        let now = Utc::now();
        for session in [&present, &pending] {
            let code = attendance_code::Model::generate(db, session.id, Some(f.teacher.id), now, Duration::minutes(10))
                .await
                .unwrap();
            attendance_record::Model::submit(db, f.student.id, &code.code, Telemetry::default(), now)
                .await
                .unwrap();
        }
        let record = attendance_record::Model::find_for(db, present.id, f.student.id)
            .await
            .unwrap()
            .unwrap();
        attendance_record::Model::validate(db, record.id, &f.teacher, now)
            .await
            .unwrap();

        let (status, json) = send(
            &app,
            Method::GET,
            "/api/me/attendance/history",
            Some(&token_for(&f.student)),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let history = json["data"].as_array().unwrap();
        let statuses: Vec<(i64, &str)> = history
            .iter()
            .map(|h| (h["session_id"].as_i64().unwrap(), h["status"].as_str().unwrap()))
            .collect();
        assert_eq!(
            statuses,
            vec![
                (absent.id, "absent"),
                (pending.id, "pending"),
                (present.id, "present"),
            ]
        );
    }
}
