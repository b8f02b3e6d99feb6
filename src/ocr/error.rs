use thiserror::Error;

#[derive(Error, Debug)]
pub enum OcrError {
    #[error("Tesseract is not available in this build. Rebuild with the 'ocr' feature and install tesseract-ocr")]
    TesseractNotInstalled,

    #[error("OCR engine initialization failed: {details}")]
    InitializationFailed { details: String },

    #[error("Text recognition failed: {details}")]
    RecognitionFailed { details: String },

    #[error("Invalid image format: {details}")]
    InvalidImageFormat { details: String },
}

