#[cfg(test)]
mod tests {
    use crate::helpers::{connect_ws, fixture, make_test_app, next_event, send, spawn_server, token_for};
    use axum::http::{Method, StatusCode};
    use futures::SinkExt;
    use serde_json::json;
    use tokio_tungstenite::connect_async;
    use tokio_tungstenite::tungstenite::{Error, Message, client::IntoClientRequest};

    #[tokio::test]
    async fn unauthenticated_socket_is_refused() {
        let (app, _) = make_test_app().await;
        let addr = spawn_server(app).await;

        let req = format!("ws://{addr}/ws/notifications")
            .into_client_request()
            .unwrap();
        match connect_async(req).await {
            Ok(_) => panic!("Unauthenticated user should not connect"),
            Err(Error::Http(resp)) => {
                assert_eq!(resp.status(), 401);
                let body = std::str::from_utf8(resp.body().as_ref().unwrap()).unwrap();
                let json: serde_json::Value = serde_json::from_str(body).unwrap();
                assert_eq!(json["message"], "Authentication required");
            }
            Err(e) => panic!("Unexpected error: {e:?}"),
        }
    }

    #[tokio::test]
    async fn socket_announces_groups_and_answers_pings() {
        let (app, state) = make_test_app().await;
        let f = fixture(&state).await;
        let addr = spawn_server(app).await.to_string();

        let (mut ws, _) = connect_ws(&addr, "notifications", &token_for(&f.teacher))
            .await
            .unwrap();
        let hello = next_event(&mut ws).await;
        assert_eq!(hello["type"], "connected");
        assert_eq!(hello["user_id"], f.teacher.id);
        assert_eq!(
            hello["groups"],
            json!([
                format!("user_{}_notifications", f.teacher.id),
                format!("teacher_{}_general_notifications", f.teacher.id),
                format!("class_session_{}_notifications", f.session.id),
            ])
        );

        ws.send(Message::Text(json!({ "type": "ping" }).to_string().into()))
            .await
            .unwrap();
        let pong = next_event(&mut ws).await;
        assert_eq!(pong["event"], "pong");

        ws.send(Message::Text(json!({ "type": "groups" }).to_string().into()))
            .await
            .unwrap();
        let groups = next_event(&mut ws).await;
        assert_eq!(groups["type"], "groups");
        assert_eq!(groups["groups"], hello["groups"]);

        ws.close(None).await.unwrap();
    }

    #[tokio::test]
    async fn attendance_flow_is_pushed_to_the_right_groups() {
        let (app, state) = make_test_app().await;
        let f = fixture(&state).await;
        let addr = spawn_server(app.clone()).await.to_string();
        let teacher = token_for(&f.teacher);
        let student = token_for(&f.student);

        let (mut teacher_ws, _) = connect_ws(&addr, "notifications", &teacher).await.unwrap();
        next_event(&mut teacher_ws).await;

        let (status, json) = send(
            &app,
            Method::POST,
            "/api/attendance/codes",
            Some(&teacher),
            Some(json!({ "class_session_id": f.session.id })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let code = json["data"]["code"].as_str().unwrap().to_string();

        let generated = next_event(&mut teacher_ws).await;
        assert_eq!(generated["type"], "event");
        assert_eq!(generated["event"], "code_generated_for_teacher");
        assert_eq!(
            generated["topic"],
            format!("teacher_{}_general_notifications", f.teacher.id)
        );
        assert_eq!(generated["payload"]["context"]["code"], code);
        assert_eq!(generated["payload"]["context"]["course_code"], "DWFS001");

        let (status, json) = send(
            &app,
            Method::POST,
            "/api/attendance/submit",
            Some(&student),
            Some(json!({ "code": code })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let record_id = json["data"]["record"]["id"].as_i64().unwrap();

        let submitted = next_event(&mut teacher_ws).await;
        assert_eq!(submitted["event"], "student_submitted");
        assert_eq!(
            submitted["topic"],
            format!("class_session_{}_notifications", f.session.id)
        );
        assert_eq!(submitted["payload"]["context"]["student_username"], "student1");
        assert_eq!(submitted["payload"]["context"]["record_id"], record_id);

        let (mut student_ws, _) = connect_ws(&addr, "notifications", &student).await.unwrap();
        next_event(&mut student_ws).await;

        let (status, _) = send(
            &app,
            Method::POST,
            &format!("/api/attendance/records/{record_id}/validate"),
            Some(&teacher),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let validated = next_event(&mut student_ws).await;
        assert_eq!(validated["event"], "attendance_validated");
        assert_eq!(
            validated["topic"],
            format!("user_{}_notifications", f.student.id)
        );
        assert_eq!(
            validated["payload"]["message"],
            "Your attendance has been validated."
        );
        assert_eq!(validated["payload"]["context"]["validated_by"], f.teacher.id);
    }

    #[tokio::test]
    async fn justification_review_notifies_the_student() {
        let (app, state) = make_test_app().await;
        let f = fixture(&state).await;
        let addr = spawn_server(app.clone()).await.to_string();
        let student = token_for(&f.student);

        let (_, json) = send(
            &app,
            Method::POST,
            "/api/me/justifications",
            Some(&student),
            Some(json!({ "class_session_id": f.session.id, "description": "Flu" })),
        )
        .await;
        let id = json["data"]["id"].as_i64().unwrap();

        let (mut ws, _) = connect_ws(&addr, "notifications", &student).await.unwrap();
        next_event(&mut ws).await;

        send(
            &app,
            Method::PUT,
            &format!("/api/attendance/justifications/{id}"),
            Some(&token_for(&f.teacher)),
            Some(json!({ "status": "rejected", "teacher_comment": "No certificate." })),
        )
        .await;

        let reviewed = next_event(&mut ws).await;
        assert_eq!(reviewed["event"], "justification_reviewed");
        assert_eq!(reviewed["payload"]["message"], "Your justification was rejected.");
        assert_eq!(reviewed["payload"]["context"]["justification_id"], id);
        assert_eq!(reviewed["payload"]["context"]["teacher_comment"], "No certificate.");
    }

    #[tokio::test]
    async fn session_stream_is_limited_to_its_teachers() {
        let (app, state) = make_test_app().await;
        let f = fixture(&state).await;
        let addr = spawn_server(app).await.to_string();
        let path = format!("attendance/sessions/{}", f.session.id);

        let (mut ws, _) = connect_ws(&addr, &path, &token_for(&f.teacher)).await.unwrap();
        let hello = next_event(&mut ws).await;
        assert_eq!(
            hello["groups"],
            json!([format!("class_session_{}_notifications", f.session.id)])
        );

        match connect_ws(&addr, &path, &token_for(&f.other_teacher)).await {
            Ok(_) => panic!("A teacher of another course should not connect"),
            Err(Error::Http(resp)) => assert_eq!(resp.status(), 403),
            Err(e) => panic!("Unexpected error: {e:?}"),
        }
    }
}
