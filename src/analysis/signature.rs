//! Handwritten signature detection.
//!
//! Signatures are treated as "ink that is not text". The full-page strategy
//! paints every confidently recognized word white, thresholds what is left,
//! cleans speckle noise with a 3×3 opening and counts the surviving ink.
//! The region strategy skips text removal entirely and only counts dark
//! pixels inside the bottom-right block where the signature usually sits.

use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use image::{imageops, DynamicImage, GrayImage, Luma};
use imageproc::{
    contrast::{threshold, ThresholdType},
    distance_transform::Norm,
    drawing::draw_filled_rect_mut,
    morphology::open,
    rect::Rect,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ocr::OcrWord;

/// Words recognized at or above this confidence (0-100) are erased as print.
pub const DEFAULT_MIN_WORD_CONFIDENCE: f32 = 60.0;
/// Pixels with intensity at or below this value count as ink.
pub const DEFAULT_INK_BRIGHTNESS_CUTOFF: u8 = 200;
/// Ink floor for the full-page strategy.
pub const DEFAULT_MIN_INK_PIXELS: usize = 300;
/// Ink floor for the region strategy. The crop is much smaller than a page.
pub const DEFAULT_REGION_MIN_INK_PIXELS: usize = 50;

/// Structuring element radius for the opening; L∞ radius 1 is a 3×3 square.
const OPENING_RADIUS: u8 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignatureStrategy {
    /// Erase confident text on the whole page, then count remaining ink
    FullPage,
    /// Count raw ink inside a fixed bottom-right region
    Region,
}

impl fmt::Display for SignatureStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignatureStrategy::FullPage => write!(f, "full_page"),
            SignatureStrategy::Region => write!(f, "region"),
        }
    }
}

impl FromStr for SignatureStrategy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "full_page" | "fullpage" => Ok(SignatureStrategy::FullPage),
            "region" => Ok(SignatureStrategy::Region),
            other => Err(anyhow!(
                "Unknown signature strategy '{}' (expected 'full_page' or 'region')",
                other
            )),
        }
    }
}

/// Page-relative bounds of the signature block, as fractions of height/width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignatureRegion {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

impl Default for SignatureRegion {
    fn default() -> Self {
        Self {
            top: 0.60,
            bottom: 0.95,
            left: 0.40,
            right: 0.95,
        }
    }
}

impl SignatureRegion {
    /// Pixel rectangle `(x, y, width, height)` for an image of the given size.
    fn pixel_bounds(&self, width: u32, height: u32) -> (u32, u32, u32, u32) {
        let y0 = (height as f64 * self.top) as u32;
        let y1 = (height as f64 * self.bottom) as u32;
        let x0 = (width as f64 * self.left) as u32;
        let x1 = (width as f64 * self.right) as u32;
        (x0, y0, x1.saturating_sub(x0), y1.saturating_sub(y0))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignatureConfig {
    pub strategy: SignatureStrategy,
    pub min_word_confidence: f32,
    pub ink_brightness_cutoff: u8,
    pub min_ink_pixels: usize,
    pub region_min_ink_pixels: usize,
    pub region: SignatureRegion,
}

impl Default for SignatureConfig {
    fn default() -> Self {
        Self {
            strategy: SignatureStrategy::FullPage,
            min_word_confidence: DEFAULT_MIN_WORD_CONFIDENCE,
            ink_brightness_cutoff: DEFAULT_INK_BRIGHTNESS_CUTOFF,
            min_ink_pixels: DEFAULT_MIN_INK_PIXELS,
            region_min_ink_pixels: DEFAULT_REGION_MIN_INK_PIXELS,
            region: SignatureRegion::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignatureVerdict {
    pub present: bool,
    pub ink_pixels: usize,
}

pub fn detect_signature(
    image: &DynamicImage,
    words: &[OcrWord],
    config: &SignatureConfig,
) -> SignatureVerdict {
    let gray = image.to_luma8();

    let (ink_pixels, floor) = match config.strategy {
        SignatureStrategy::FullPage => {
            let erased = erase_confident_text(&gray, words, config.min_word_confidence);
            let ink = threshold(&erased, config.ink_brightness_cutoff, ThresholdType::BinaryInverted);
            let cleaned = open(&ink, Norm::LInf, OPENING_RADIUS);
            (count_foreground(&cleaned), config.min_ink_pixels)
        }
        SignatureStrategy::Region => {
            let (x, y, w, h) = config.region.pixel_bounds(gray.width(), gray.height());
            let ink_pixels = if w == 0 || h == 0 {
                0
            } else {
                let crop = imageops::crop_imm(&gray, x, y, w, h).to_image();
                let ink = threshold(&crop, config.ink_brightness_cutoff, ThresholdType::BinaryInverted);
                count_foreground(&ink)
            };
            (ink_pixels, config.region_min_ink_pixels)
        }
    };

    debug!(
        "Signature check ({}): {} ink pixels, floor {}",
        config.strategy, ink_pixels, floor
    );

    SignatureVerdict {
        present: ink_pixels >= floor,
        ink_pixels,
    }
}

/// Paint the bounding box of every confident, non-blank word white.
///
/// Boxes are inclusive of both corners and clipped to the image.
pub fn erase_confident_text(gray: &GrayImage, words: &[OcrWord], min_confidence: f32) -> GrayImage {
    let mut erased = gray.clone();

    for word in words {
        if word.text.trim().is_empty() || word.confidence < min_confidence {
            continue;
        }
        if let Some(rect) = clipped_box(word, gray.width(), gray.height()) {
            draw_filled_rect_mut(&mut erased, rect, Luma([255u8]));
        }
    }

    erased
}

/// Inclusive word box intersected with the page, or `None` when they do not
/// overlap. Computed in `i64` so extreme TSV geometry cannot overflow.
fn clipped_box(word: &OcrWord, page_width: u32, page_height: u32) -> Option<Rect> {
    let (left, right) = clip_span(word.left, word.width, page_width)?;
    let (top, bottom) = clip_span(word.top, word.height, page_height)?;
    Some(Rect::at(left as i32, top as i32).of_size((right - left) as u32, (bottom - top) as u32))
}

/// Half-open `[start, end)` of an inclusive span of `len + 1` pixels, clipped to `[0, limit)`.
fn clip_span(start: i32, len: u32, limit: u32) -> Option<(i64, i64)> {
    let begin = i64::from(start).max(0);
    let end = (i64::from(start) + i64::from(len) + 1).min(i64::from(limit));
    (end > begin).then_some((begin, end))
}

fn count_foreground(image: &GrayImage) -> usize {
    image.pixels().filter(|p| p[0] > 0).count()
}
