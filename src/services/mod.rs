pub mod download;
pub mod rasterizer;

use crate::error::ExtractionError;

/// Window in which a PDF reader looks for the `%PDF-` header.
const HEADER_SEARCH_WINDOW: usize = 1024;

const PDF_HEADER: &[u8] = b"%PDF-";

/// Reject input that does not carry a PDF header before rendering it.
///
/// The header may follow leading bytes such as a BOM or blank lines, as
/// long as it starts within the first 1024 bytes.
pub fn ensure_pdf(bytes: &[u8]) -> Result<(), ExtractionError> {
    if bytes.is_empty() {
        return Err(ExtractionError::NotAPdf {
            detected: "empty input".to_string(),
        });
    }

    let window_len = HEADER_SEARCH_WINDOW + PDF_HEADER.len() - 1;
    let window = &bytes[..bytes.len().min(window_len)];
    if window.windows(PDF_HEADER.len()).any(|w| w == PDF_HEADER) {
        return Ok(());
    }

    let detected = infer::get(bytes)
        .map(|kind| kind.mime_type().to_string())
        .unwrap_or_else(|| "unknown".to_string());
    Err(ExtractionError::NotAPdf { detected })
}
