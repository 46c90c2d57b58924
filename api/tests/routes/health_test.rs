#[cfg(test)]
mod tests {
    use crate::helpers::{make_test_app, send};
    use axum::http::{Method, StatusCode};

    #[tokio::test]
    async fn health_check_returns_ok_json() {
        let (app, _) = make_test_app().await;

        let (status, json) = send(&app, Method::GET, "/api/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        assert_eq!(json["data"], "OK");
        assert_eq!(json["message"], "Health check passed");
    }
}
