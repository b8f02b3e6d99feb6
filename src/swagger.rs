use axum::Router;
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    models::{ErrorResponse, ExtractFromUrlRequest, ExtractResponse, HealthResponse},
    routes::extract::UploadForm,
    AppState,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::extract::extract_fields,
        crate::routes::extract::extract_from_url,
        crate::routes::health::health_check,
    ),
    components(
        schemas(
            ExtractResponse, ExtractFromUrlRequest, HealthResponse, ErrorResponse, UploadForm
        )
    ),
    tags(
        (name = "extraction", description = "Missing-field detection for uploaded or linked PDFs"),
        (name = "health", description = "Service health"),
    ),
    info(
        title = "PDFExtractionAPI",
        version = "1.0.0",
        description = "API to detect missing fields in medical justification PDFs"
    )
)]
pub struct ApiDoc;

pub fn create_swagger_router() -> Router<Arc<AppState>> {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .into()
}
