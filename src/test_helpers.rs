/*!
 * Test Helpers and Utilities
 *
 * Stand-in rasterizers and recognizers so the pipeline and HTTP layer can be
 * exercised without poppler or tesseract installed, plus builders for
 * synthetic pages, PDFs and multipart bodies.
 */

use async_trait::async_trait;
use image::{DynamicImage, GrayImage, Luma};
use std::sync::Arc;

use crate::{
    analysis::{AnalysisConfig, DocumentAnalyzer},
    config::Config,
    error::ExtractionError,
    ocr::{error::OcrError, OcrOutput, OcrWord, TextRecognizer},
    services::{download::DocumentFetcher, rasterizer::Rasterizer},
    AppState,
};

pub const TEST_BOUNDARY: &str = "formaudit-test-boundary";

/// Rasterizer that ignores its input and returns a fixed page.
pub struct StaticRasterizer {
    page: Option<DynamicImage>,
}

impl StaticRasterizer {
    pub fn new(page: DynamicImage) -> Self {
        Self { page: Some(page) }
    }

    /// Behaves like a document with zero pages
    pub fn empty() -> Self {
        Self { page: None }
    }
}

#[async_trait]
impl Rasterizer for StaticRasterizer {
    async fn first_page(&self, _pdf: &[u8]) -> Result<Option<DynamicImage>, ExtractionError> {
        Ok(self.page.clone())
    }

    fn backend_name(&self) -> &'static str {
        "static"
    }
}

/// Rasterizer that always fails, like a corrupt PDF would.
pub struct FailingRasterizer {
    pub details: String,
}

#[async_trait]
impl Rasterizer for FailingRasterizer {
    async fn first_page(&self, _pdf: &[u8]) -> Result<Option<DynamicImage>, ExtractionError> {
        Err(ExtractionError::RasterizationFailed {
            details: self.details.clone(),
        })
    }

    fn backend_name(&self) -> &'static str {
        "failing"
    }
}

/// Recognizer that returns a fixed result for any image.
pub struct StaticRecognizer {
    output: Result<OcrOutput, String>,
}

impl StaticRecognizer {
    pub fn new(text: &str, words: Vec<OcrWord>) -> Self {
        Self {
            output: Ok(OcrOutput {
                text: text.to_string(),
                words,
            }),
        }
    }

    pub fn failing(details: &str) -> Self {
        Self {
            output: Err(details.to_string()),
        }
    }
}

impl TextRecognizer for StaticRecognizer {
    fn recognize(&self, _image: &DynamicImage) -> Result<OcrOutput, OcrError> {
        self.output
            .clone()
            .map_err(|details| OcrError::RecognitionFailed { details })
    }

    fn engine_name(&self) -> &'static str {
        "static"
    }
}

/// Creates a test configuration with sensible defaults
pub fn create_test_config() -> Config {
    Config {
        server_address: "127.0.0.1:0".to_string(),
        ocr_language: "eng".to_string(),
        render_dpi: 200,
        max_file_size_mb: 5,
        download_timeout_seconds: 5,
        analysis: AnalysisConfig::default(),
    }
}

pub fn create_test_analyzer(
    config: &Config,
    rasterizer: impl Rasterizer + 'static,
    recognizer: impl TextRecognizer + 'static,
) -> DocumentAnalyzer {
    DocumentAnalyzer::new(
        config.analysis.clone(),
        Arc::new(rasterizer),
        Arc::new(recognizer),
        DocumentFetcher::new(config.download_timeout_seconds, config.max_file_size_bytes()).expect("Failed to build test fetcher"),
    )
}

pub fn create_test_state(
    rasterizer: impl Rasterizer + 'static,
    recognizer: impl TextRecognizer + 'static,
) -> Arc<AppState> {
    create_test_state_with_config(create_test_config(), rasterizer, recognizer)
}

/// Creates a test AppState with a custom configuration
pub fn create_test_state_with_config(
    config: Config,
    rasterizer: impl Rasterizer + 'static,
    recognizer: impl TextRecognizer + 'static,
) -> Arc<AppState> {
    let analyzer = create_test_analyzer(&config, rasterizer, recognizer);
    Arc::new(AppState { config, analyzer })
}

/// White page, optionally with a horizontal 4px-high stroke of `stroke_len`
/// pixels near the bottom right.
pub fn synthetic_page(width: u32, height: u32, stroke_len: u32) -> DynamicImage {
    let mut page = GrayImage::from_pixel(width, height, Luma([255u8]));
    let y0 = height * 3 / 4;
    let x0 = width / 2;
    for x in x0..(x0 + stroke_len).min(width) {
        for y in y0..(y0 + 4).min(height) {
            page.put_pixel(x, y, Luma([15u8]));
        }
    }
    DynamicImage::ImageLuma8(page)
}

/// Minimal single-page PDF with one line of Helvetica text.
pub fn minimal_pdf(text_content: &str) -> Vec<u8> {
    let stream_content = format!("BT\n/F1 12 Tf\n100 700 Td\n({}) Tj\nET", text_content);

    format!(
        "%PDF-1.4\n\
        1 0 obj\n<< /Type /Catalog /Pages 2 0 R >>\nendobj\n\
        2 0 obj\n<< /Type /Pages /Kids [3 0 R] /Count 1 >>\nendobj\n\
        3 0 obj\n<< /Type /Page /Parent 2 0 R /Resources << /Font << /F1 4 0 R >> >> /MediaBox [0 0 612 792] /Contents 5 0 R >>\nendobj\n\
        4 0 obj\n<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>\nendobj\n\
        5 0 obj\n<< /Length {} >>\nstream\n{}\nendstream\nendobj\n\
        trailer\n<< /Size 6 /Root 1 0 R >>\n%%EOF",
        stream_content.len(),
        stream_content
    )
    .into_bytes()
}

/// Multipart body with a single file part, delimited by [`TEST_BOUNDARY`].
pub fn multipart_body(field_name: &str, filename: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", TEST_BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field_name, filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/pdf\r\n\r\n");
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", TEST_BOUNDARY).as_bytes());
    body
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={}", TEST_BOUNDARY)
}

/// Word box helper for recognizer fixtures
pub fn ocr_word(text: &str, confidence: f32, left: i32, top: i32, width: u32, height: u32) -> OcrWord {
    OcrWord {
        text: text.to_string(),
        confidence,
        left,
        top,
        width,
        height,
    }
}
