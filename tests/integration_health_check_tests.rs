use axum::http::StatusCode;
use formaudit::{
    build_router,
    test_helpers::{create_test_state, synthetic_page, StaticRasterizer, StaticRecognizer},
};
use tower::util::ServiceExt;

async fn get_json(uri: &str) -> (StatusCode, serde_json::Value) {
    let state = create_test_state(
        StaticRasterizer::new(synthetic_page(10, 10, 0)),
        StaticRecognizer::new("", vec![]),
    );

    let response = build_router(state)
        .oneshot(
            axum::http::Request::builder()
                .method("GET")
                .uri(uri)
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_health_endpoint_responds() {
    let (status, body) = get_json("/api/health").await;

    assert_eq!(status, StatusCode::OK, "Health endpoint should return 200 OK");
    assert_eq!(body["status"], "ok", "Health status should be 'ok'");
    assert_eq!(body["signature_strategy"], "full_page");
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let (status, body) = get_json("/api-docs/openapi.json").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["info"]["title"], "PDFExtractionAPI");
    assert_eq!(body["info"]["version"], "1.0.0");
    assert!(body["paths"]["/extract"]["post"].is_object());
    assert!(body["paths"]["/extract_from_url"]["post"].is_object());
}
