use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::{
    models::{ErrorResponse, ExtractFromUrlRequest, ExtractResponse},
    AppState,
};

/// Multipart field that carries the PDF.
const FILE_FIELD: &str = "file";

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/extract", post(extract_fields))
        .route("/extract_from_url", post(extract_from_url))
}

/// Multipart upload form, documented for OpenAPI only
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct UploadForm {
    #[schema(value_type = String, format = Binary)]
    file: Vec<u8>,
}

#[utoipa::path(
    post,
    path = "/extract",
    tag = "extraction",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Missing fields; includes `error` when the document could not be processed", body = ExtractResponse),
        (status = 400, description = "Bad request - no file part or malformed multipart body", body = ErrorResponse),
        (status = 413, description = "Upload exceeds the configured size limit", body = ErrorResponse)
    )
)]
pub async fn extract_fields(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<ExtractResponse>, (StatusCode, Json<ErrorResponse>)> {
    let mut pdf_bytes = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or("<unnamed>").to_string();
        let data = field.bytes().await.map_err(multipart_error)?;
        tracing::info!("Received upload '{}' ({} bytes)", filename, data.len());
        pdf_bytes = Some(data);
        break;
    }

    let pdf_bytes = pdf_bytes.ok_or_else(|| bad_request(format!("Missing '{}' field in upload", FILE_FIELD)))?;

    Ok(Json(state.analyzer.analyze_bytes(&pdf_bytes).await))
}

#[utoipa::path(
    post,
    path = "/extract_from_url",
    tag = "extraction",
    request_body = ExtractFromUrlRequest,
    responses(
        (status = 200, description = "Missing fields; includes `error` when the document could not be fetched or processed", body = ExtractResponse),
        (status = 400, description = "Bad request - body is not valid JSON"),
        (status = 422, description = "JSON body is missing `file_url`")
    )
)]
pub async fn extract_from_url(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ExtractFromUrlRequest>,
) -> Json<ExtractResponse> {
    tracing::info!("Checking document at {}", request.file_url);
    Json(state.analyzer.analyze_url(&request.file_url).await)
}

/// Keep the status axum assigns, so an oversized body stays a 413.
fn multipart_error(e: MultipartError) -> (StatusCode, Json<ErrorResponse>) {
    tracing::warn!("Rejected multipart upload: {}", e);
    (e.status(), Json(ErrorResponse { error: e.body_text() }))
}

fn bad_request(message: String) -> (StatusCode, Json<ErrorResponse>) {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse { error: message }))
}
