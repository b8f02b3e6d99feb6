//! Document analysis: rasterize → recognize → check fields → detect signature.
//!
//! Every failure between receiving bytes and having OCR output degrades to
//! a response listing every required field as missing, with the error text
//! attached. Upload and URL input follow the same policy.

pub mod fields;
pub mod signature;

use std::sync::Arc;
use std::time::Instant;

use image::DynamicImage;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::ExtractionError;
use crate::models::ExtractResponse;
use crate::ocr::{TesseractRecognizer, TextRecognizer};
use crate::services::download::DocumentFetcher;
use crate::services::ensure_pdf;
use crate::services::rasterizer::{PdftoppmRasterizer, Rasterizer};

use fields::{default_field_rules, missing_fields, FieldRule};
use signature::{detect_signature, SignatureConfig};

/// Field id reported when no signature ink is found.
pub const SIGNATURE_FIELD: &str = "doctor_signature";

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    pub field_rules: Vec<FieldRule>,
    pub signature: SignatureConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            field_rules: default_field_rules(),
            signature: SignatureConfig::default(),
        }
    }
}

impl AnalysisConfig {
    /// Every field id this configuration can report, in response order.
    pub fn required_fields(&self) -> Vec<String> {
        self.field_rules
            .iter()
            .map(|rule| rule.id.clone())
            .chain(std::iter::once(SIGNATURE_FIELD.to_string()))
            .collect()
    }

    /// Combine text and signature results for one recognized page.
    pub fn evaluate_page(&self, image: &DynamicImage, ocr: &crate::ocr::OcrOutput) -> Vec<String> {
        let mut missing = missing_fields(&ocr.text, &self.field_rules);

        let verdict = detect_signature(image, &ocr.words, &self.signature);
        if !verdict.present {
            missing.push(SIGNATURE_FIELD.to_string());
        }

        missing
    }
}

pub struct DocumentAnalyzer {
    config: Arc<AnalysisConfig>,
    rasterizer: Arc<dyn Rasterizer>,
    recognizer: Arc<dyn TextRecognizer>,
    fetcher: DocumentFetcher,
}

impl DocumentAnalyzer {
    pub fn new(
        config: AnalysisConfig,
        rasterizer: Arc<dyn Rasterizer>,
        recognizer: Arc<dyn TextRecognizer>,
        fetcher: DocumentFetcher,
    ) -> Self {
        Self {
            config: Arc::new(config),
            rasterizer,
            recognizer,
            fetcher,
        }
    }

    /// Analyzer backed by pdftoppm and tesseract, as configured.
    pub fn from_config(config: &Config) -> Result<Self, ExtractionError> {
        Ok(Self::new(
            config.analysis.clone(),
            Arc::new(PdftoppmRasterizer::new(config.render_dpi)),
            Arc::new(TesseractRecognizer::new(config.ocr_language.clone())),
            DocumentFetcher::new(config.download_timeout_seconds, config.max_file_size_bytes())?,
        ))
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn required_fields(&self) -> Vec<String> {
        self.config.required_fields()
    }

    /// Check an uploaded document.
    pub async fn analyze_bytes(&self, bytes: &[u8]) -> ExtractResponse {
        let started = Instant::now();
        let response = self.build_response(self.try_analyze(bytes).await);
        info!(
            "Checked {} byte document in {}ms: {} missing",
            bytes.len(),
            started.elapsed().as_millis(),
            response.missing_fields.len()
        );
        response
    }

    /// Fetch a document and check it. Fetch errors degrade like bad input.
    pub async fn analyze_url(&self, url: &str) -> ExtractResponse {
        match self.fetcher.fetch(url).await {
            Ok(bytes) => self.analyze_bytes(&bytes).await,
            Err(e) => self.build_response(Err(e)),
        }
    }

    /// Run the pipeline. `Ok(None)` means the document has no pages.
    pub async fn try_analyze(&self, bytes: &[u8]) -> Result<Option<Vec<String>>, ExtractionError> {
        ensure_pdf(bytes)?;

        let page = match self.rasterizer.first_page(bytes).await? {
            Some(page) => page,
            None => return Ok(None),
        };
        debug!(
            "Rasterized first page with {}: {}x{}",
            self.rasterizer.backend_name(),
            page.width(),
            page.height()
        );

        let recognizer = Arc::clone(&self.recognizer);
        let config = Arc::clone(&self.config);

        let missing = tokio::task::spawn_blocking(move || -> Result<Vec<String>, ExtractionError> {
            let ocr = recognizer.recognize(&page)?;
            debug!(
                "{} produced {} chars and {} word boxes",
                recognizer.engine_name(),
                ocr.text.len(),
                ocr.words.len()
            );
            Ok(config.evaluate_page(&page, &ocr))
        })
        .await
        .map_err(|e| ExtractionError::Internal(format!("Analysis task panicked: {}", e)))??;

        Ok(Some(missing))
    }

    fn build_response(&self, result: Result<Option<Vec<String>>, ExtractionError>) -> ExtractResponse {
        match result {
            Ok(Some(missing)) => ExtractResponse::missing(missing),
            Ok(None) => {
                warn!("Document has no pages; reporting every field missing");
                ExtractResponse::missing(self.required_fields())
            }
            Err(e) => {
                warn!("Document could not be processed: {}", e);
                ExtractResponse::failed(self.required_fields(), e.to_string())
            }
        }
    }
}
