/*!
 * Tesseract TSV parsing
 *
 * Converts the engine's tab-separated layout dump into word records. Columns:
 * level, page_num, block_num, par_num, line_num, word_num, left, top, width,
 * height, conf, text. Only level 5 rows are words.
 */

use tracing::debug;

use super::OcrWord;

/// Confidence assigned when the engine's value is not a number. Negative, so
/// the word stays below any erase threshold and is kept as potential ink.
pub const UNPARSABLE_CONFIDENCE: f32 = -1.0;

const WORD_LEVEL: u32 = 5;
const MIN_COLUMNS: usize = 11;

pub fn parse_tsv(tsv: &str) -> Vec<OcrWord> {
    tsv.lines().filter_map(parse_row).collect()
}

fn parse_row(line: &str) -> Option<OcrWord> {
    let columns: Vec<&str> = line.split('\t').collect();
    if columns.len() < MIN_COLUMNS {
        return None;
    }

    // Skips the header row as well as block/paragraph/line rows
    let level = columns[0].trim().parse::<u32>().ok()?;
    if level != WORD_LEVEL {
        return None;
    }

    let geometry = (
        columns[6].trim().parse::<i32>(),
        columns[7].trim().parse::<i32>(),
        columns[8].trim().parse::<u32>(),
        columns[9].trim().parse::<u32>(),
    );
    let (left, top, width, height) = match geometry {
        (Ok(l), Ok(t), Ok(w), Ok(h)) => (l, t, w, h),
        _ => {
            debug!("Skipping OCR row with malformed geometry: {}", line);
            return None;
        }
    };

    let confidence = columns[10]
        .trim()
        .parse::<f32>()
        .ok()
        .filter(|c| c.is_finite())
        .unwrap_or(UNPARSABLE_CONFIDENCE);

    let text = columns.get(11).map(|t| t.to_string()).unwrap_or_default();

    Some(OcrWord {
        text,
        confidence,
        left,
        top,
        width,
        height,
    })
}
