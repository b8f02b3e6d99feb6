//! First-page rasterization.
//!
//! The default implementation shells out to poppler's `pdftoppm`, the same
//! renderer the page-to-image OCR path has always relied on. Only page 1 is
//! rendered, straight to a single PNG inside a per-call temp directory that
//! is removed when the call returns.

use async_trait::async_trait;
use image::DynamicImage;
use std::path::Path;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::ExtractionError;

/// Renders the first page of a PDF.
#[async_trait]
pub trait Rasterizer: Send + Sync {
    /// `Ok(None)` means the document parsed but has no pages.
    async fn first_page(&self, pdf: &[u8]) -> Result<Option<DynamicImage>, ExtractionError>;

    /// Human-readable backend name used in logs
    fn backend_name(&self) -> &'static str;
}

pub struct PdftoppmRasterizer {
    dpi: u32,
}

impl PdftoppmRasterizer {
    pub fn new(dpi: u32) -> Self {
        Self { dpi }
    }

    pub fn dpi(&self) -> u32 {
        self.dpi
    }

    /// Check whether `pdftoppm` can be executed on this host.
    pub async fn is_available() -> bool {
        match Command::new("pdftoppm").arg("-v").output().await {
            Ok(_) => true,
            Err(e) => {
                debug!("pdftoppm not available: {}", e);
                false
            }
        }
    }
}

impl Default for PdftoppmRasterizer {
    fn default() -> Self {
        Self::new(200)
    }
}

#[async_trait]
impl Rasterizer for PdftoppmRasterizer {
    async fn first_page(&self, pdf: &[u8]) -> Result<Option<DynamicImage>, ExtractionError> {
        let work_dir = tempfile::Builder::new().prefix("formaudit_").tempdir()?;
        let input_path = work_dir.path().join("input.pdf");
        let output_prefix = work_dir.path().join("page");

        tokio::fs::write(&input_path, pdf).await?;

        let output = Command::new("pdftoppm")
            .arg("-f")
            .arg("1")
            .arg("-l")
            .arg("1")
            .arg("-r")
            .arg(self.dpi.to_string())
            .arg("-png")
            .arg("-singlefile")
            .arg(&input_path)
            .arg(&output_prefix)
            .output()
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => ExtractionError::RasterizerNotAvailable,
                _ => ExtractionError::Io(e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            if is_empty_document_message(&stderr) {
                debug!("pdftoppm reports an empty page range: {}", stderr);
                return Ok(None);
            }
            return Err(ExtractionError::RasterizationFailed {
                details: if stderr.is_empty() {
                    format!("pdftoppm exited with {}", output.status)
                } else {
                    stderr
                },
            });
        }

        let page_path = output_prefix.with_extension("png");
        if !page_path.exists() {
            warn!("pdftoppm succeeded but produced no page image");
            return Ok(None);
        }

        let image = load_page_image(&page_path).await?;
        debug!(
            "Rendered first page at {} DPI → {}x{} px",
            self.dpi,
            image.width(),
            image.height()
        );

        Ok(Some(image))
    }

    fn backend_name(&self) -> &'static str {
        "pdftoppm"
    }
}

/// A zero-page document makes pdftoppm reject the `-f 1 -l 1` range.
fn is_empty_document_message(stderr: &str) -> bool {
    stderr.contains("Wrong page range")
}

async fn load_page_image(path: &Path) -> Result<DynamicImage, ExtractionError> {
    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || image::open(&path))
        .await
        .map_err(|e| ExtractionError::Internal(format!("Page decode task panicked: {}", e)))?
        .map_err(|e| ExtractionError::RasterizationFailed {
            details: format!("Failed to decode rendered page: {}", e),
        })
}
