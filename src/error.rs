//! Errors raised while turning request input into an analyzable page.
//!
//! None of these reach the caller as a failed HTTP status. The analyzer
//! converts every variant into an "all fields missing" result carrying the
//! error's display text.

use thiserror::Error;

use crate::ocr::error::OcrError;

#[derive(Debug, Error)]
pub enum ExtractionError {
    // ── Input errors ──────────────────────────────────────────────────────
    #[error("Input is not a PDF document (detected type: {detected})")]
    NotAPdf { detected: String },

    #[error("Invalid document URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Failed to download '{url}': {reason}")]
    DownloadFailed { url: String, reason: String },

    #[error("Download timed out after {secs}s for '{url}'")]
    DownloadTimeout { url: String, secs: u64 },

    // ── Rasterization errors ──────────────────────────────────────────────
    #[error("pdftoppm is not available. Install poppler-utils: 'apt-get install poppler-utils' or 'brew install poppler'")]
    RasterizerNotAvailable,

    #[error("Unable to get page count or render the first page: {details}")]
    RasterizationFailed { details: String },

    // ── OCR errors ────────────────────────────────────────────────────────
    #[error(transparent)]
    Ocr(#[from] OcrError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}
