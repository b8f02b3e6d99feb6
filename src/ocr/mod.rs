pub mod error;
pub mod tsv;

use image::DynamicImage;

use crate::ocr::error::OcrError;

pub use tsv::{parse_tsv, UNPARSABLE_CONFIDENCE};

#[cfg(feature = "ocr")]
use tesseract::Tesseract;
#[cfg(feature = "ocr")]
use tracing::debug;

/// A single recognized word with its bounding box in page pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct OcrWord {
    pub text: String,
    /// Engine confidence on a 0-100 scale, or [`UNPARSABLE_CONFIDENCE`]
    pub confidence: f32,
    pub left: i32,
    pub top: i32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OcrOutput {
    /// Plain page text
    pub text: String,
    /// Word records in reading order
    pub words: Vec<OcrWord>,
}

/// Produces page text and word boxes from a raster image.
///
/// Implementations are called from a blocking thread, never from the async
/// runtime directly.
pub trait TextRecognizer: Send + Sync {
    fn recognize(&self, image: &DynamicImage) -> Result<OcrOutput, OcrError>;

    /// Human-readable engine name used in logs
    fn engine_name(&self) -> &'static str;
}

pub struct TesseractRecognizer {
    language: String,
}

impl TesseractRecognizer {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }
}

impl Default for TesseractRecognizer {
    fn default() -> Self {
        Self::new("eng")
    }
}

impl TextRecognizer for TesseractRecognizer {
    fn recognize(&self, image: &DynamicImage) -> Result<OcrOutput, OcrError> {
        #[cfg(feature = "ocr")]
        {
            // Tesseract reads from a path, so hand it a PNG in a scratch file
            let scratch = tempfile::Builder::new()
                .prefix("formaudit_page_")
                .suffix(".png")
                .tempfile()
                .map_err(|e| OcrError::InitializationFailed {
                    details: format!("Failed to create scratch image: {}", e),
                })?;
            image
                .save_with_format(scratch.path(), image::ImageFormat::Png)
                .map_err(|e| OcrError::InvalidImageFormat {
                    details: e.to_string(),
                })?;
            let image_path = scratch.path().to_string_lossy().to_string();

            let mut tesseract = Tesseract::new(None, Some(self.language.as_str()))
                .map_err(|e| OcrError::InitializationFailed {
                    details: e.to_string(),
                })?
                .set_image(&image_path)
                .map_err(|e| OcrError::InvalidImageFormat {
                    details: e.to_string(),
                })?;

            let text = tesseract.get_text().map_err(|e| OcrError::RecognitionFailed {
                details: format!("Failed to extract text: {}", e),
            })?;
            let tsv = tesseract.get_tsv_text(0).map_err(|e| OcrError::RecognitionFailed {
                details: format!("Failed to extract word boxes: {}", e),
            })?;

            let words = parse_tsv(&tsv);
            debug!(
                "Tesseract recognized {} chars, {} words",
                text.len(),
                words.len()
            );

            Ok(OcrOutput { text, words })
        }

        #[cfg(not(feature = "ocr"))]
        {
            let _ = image;
            Err(OcrError::TesseractNotInstalled)
        }
    }

    fn engine_name(&self) -> &'static str {
        "tesseract"
    }
}
