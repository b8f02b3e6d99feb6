use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Result of checking one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ExtractResponse {
    /// Identifiers of required fields that were not found, in configured order
    pub missing_fields: Vec<String>,
    /// Present when the document could not be processed; every field is then reported missing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExtractResponse {
    pub fn missing(missing_fields: Vec<String>) -> Self {
        Self {
            missing_fields,
            error: None,
        }
    }

    pub fn failed(missing_fields: Vec<String>, error: impl Into<String>) -> Self {
        Self {
            missing_fields,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ExtractFromUrlRequest {
    /// HTTP or HTTPS URL of the PDF to check
    pub file_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    /// Whether this build includes the tesseract engine
    pub ocr_enabled: bool,
    pub signature_strategy: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_is_omitted_when_absent() {
        let json = serde_json::to_value(ExtractResponse::missing(vec!["date".into()])).unwrap();
        assert_eq!(json, serde_json::json!({"missing_fields": ["date"]}));
    }

    #[test]
    fn test_error_is_serialized_when_present() {
        let json = serde_json::to_value(ExtractResponse::failed(vec![], "boom")).unwrap();
        assert_eq!(json, serde_json::json!({"missing_fields": [], "error": "boom"}));
    }
}
