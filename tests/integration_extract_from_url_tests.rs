//! URL-based extraction: the document is fetched over HTTP and then runs
//! through the same pipeline as an upload. Fetch failures degrade to the
//! same "all fields missing" response instead of a server error.

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use formaudit::{
        build_router,
        test_helpers::{
            create_test_config, create_test_state, create_test_state_with_config, minimal_pdf,
            synthetic_page, StaticRasterizer, StaticRecognizer,
        },
        AppState,
    };
    use std::sync::Arc;
    use tower::util::ServiceExt;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ALL_FIELDS: [&str; 6] = [
        "name",
        "boss_name",
        "date",
        "employee_id",
        "reason",
        "doctor_signature",
    ];

    fn signed_form_state() -> Arc<AppState> {
        create_test_state(
            StaticRasterizer::new(synthetic_page(800, 1000, 200)),
            StaticRecognizer::new(
                "Name: A\nManager: B\nDate: today\nEmployee ID: 7\nReason: checkup",
                vec![],
            ),
        )
    }

    async fn post_url(state: Arc<AppState>, body: String) -> (StatusCode, Vec<u8>) {
        let response = build_router(state)
            .oneshot(
                axum::http::Request::builder()
                    .method("POST")
                    .uri("/extract_from_url")
                    .header("Content-Type", "application/json")
                    .body(axum::body::Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, body.to_vec())
    }

    async fn post_file_url(state: Arc<AppState>, url: &str) -> (StatusCode, serde_json::Value) {
        let request = serde_json::json!({ "file_url": url }).to_string();
        let (status, body) = post_url(state, request).await;
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_fetched_pdf_runs_the_pipeline() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/forms/signed.pdf"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("Content-Type", "application/pdf")
                    .set_body_bytes(minimal_pdf("signed")),
            )
            .expect(1)
            .mount(&server)
            .await;

        let url = format!("{}/forms/signed.pdf", server.uri());
        let (status, body) = post_file_url(signed_form_state(), &url).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!({ "missing_fields": [] }));
    }

    #[tokio::test]
    async fn test_http_error_degrades_to_all_missing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let url = format!("{}/forms/gone.pdf", server.uri());
        let (status, body) = post_file_url(signed_form_state(), &url).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["missing_fields"], serde_json::json!(ALL_FIELDS));
        assert!(body["error"].as_str().unwrap().contains("404"), "got: {}", body);
    }

    #[tokio::test]
    async fn test_non_pdf_download_degrades_to_all_missing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>login page</html>"))
            .mount(&server)
            .await;

        let url = format!("{}/forms/redirected.pdf", server.uri());
        let (status, body) = post_file_url(signed_form_state(), &url).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["missing_fields"], serde_json::json!(ALL_FIELDS));
        assert!(body["error"].as_str().unwrap().contains("not a PDF"), "got: {}", body);
    }

    #[tokio::test]
    async fn test_download_over_size_limit_degrades_to_all_missing() {
        let server = MockServer::start().await;
        let mut oversized = minimal_pdf("signed");
        oversized.resize(1024 * 1024 + 1, b' ');
        Mock::given(method("GET"))
            .and(path("/forms/huge.pdf"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("Content-Type", "application/pdf")
                    .set_body_bytes(oversized),
            )
            .mount(&server)
            .await;

        let mut config = create_test_config();
        config.max_file_size_mb = 1;
        let state = create_test_state_with_config(
            config,
            StaticRasterizer::new(synthetic_page(800, 1000, 200)),
            StaticRecognizer::new("Name: A\nManager: B\nDate: today\nEmployee ID: 7\nReason: checkup", vec![]),
        );

        let url = format!("{}/forms/huge.pdf", server.uri());
        let (status, body) = post_file_url(state, &url).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["missing_fields"], serde_json::json!(ALL_FIELDS));
        assert!(body["error"].as_str().unwrap().contains("byte limit"), "got: {}", body);
    }

    #[tokio::test]
    async fn test_unreachable_host_degrades_to_all_missing() {
        // Port 9 (discard) is essentially never listening
        let (status, body) = post_file_url(signed_form_state(), "http://127.0.0.1:9/form.pdf").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["missing_fields"], serde_json::json!(ALL_FIELDS));
        assert!(body["error"].as_str().is_some());
    }

    #[tokio::test]
    async fn test_invalid_url_degrades_to_all_missing() {
        let (status, body) = post_file_url(signed_form_state(), "file:///etc/passwd").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["missing_fields"], serde_json::json!(ALL_FIELDS));
        assert!(body["error"].as_str().unwrap().contains("unsupported scheme"));
    }

    #[tokio::test]
    async fn test_missing_file_url_is_rejected() {
        let (status, _) = post_url(signed_form_state(), "{\"url\": \"http://x\"}".to_string()).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, _) = post_url(signed_form_state(), "not json".to_string()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
