use anyhow::{anyhow, Context, Result};
use std::env;
use std::str::FromStr;
use tracing::{debug, info};

use crate::analysis::fields::{default_field_rules, FieldRule};
use crate::analysis::signature::{SignatureConfig, SignatureStrategy};
use crate::analysis::AnalysisConfig;

#[derive(Clone, Debug)]
pub struct Config {
    pub server_address: String,

    // OCR / rasterization
    pub ocr_language: String,
    pub render_dpi: u32,

    // Request limits
    pub max_file_size_mb: usize,
    pub download_timeout_seconds: u64,

    // Analysis
    pub analysis: AnalysisConfig,
}

const BYTES_PER_MB: usize = 1024 * 1024;

impl Config {
    /// Size cap shared by uploads and URL downloads.
    pub fn max_file_size_bytes(&self) -> usize {
        self.max_file_size_mb.saturating_mul(BYTES_PER_MB)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_address: "0.0.0.0:8000".to_string(),
            ocr_language: "eng".to_string(),
            render_dpi: 200,
            max_file_size_mb: 50,
            download_timeout_seconds: 30,
            analysis: AnalysisConfig::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        match dotenvy::dotenv() {
            Ok(path) => info!("Loaded environment variables from {}", path.display()),
            Err(_) => debug!("No .env file found, using environment variables only"),
        }

        let defaults = Config::default();

        let server_address = env::var("SERVER_ADDRESS").unwrap_or(defaults.server_address);
        let ocr_language = env::var("OCR_LANGUAGE").unwrap_or(defaults.ocr_language);
        let render_dpi = parse_env("RENDER_DPI", defaults.render_dpi)?;
        let max_file_size_mb = parse_env("MAX_FILE_SIZE_MB", defaults.max_file_size_mb)?;
        let download_timeout_seconds =
            parse_env("DOWNLOAD_TIMEOUT_SECONDS", defaults.download_timeout_seconds)?;

        if render_dpi == 0 {
            return Err(anyhow!("RENDER_DPI must be greater than zero"));
        }
        if max_file_size_mb == 0 || max_file_size_mb.checked_mul(BYTES_PER_MB).is_none() {
            return Err(anyhow!(
                "MAX_FILE_SIZE_MB must be between 1 and {}",
                usize::MAX / BYTES_PER_MB
            ));
        }

        let base = defaults.analysis.signature;
        let strategy = match env::var("SIGNATURE_STRATEGY") {
            Ok(value) => value.parse::<SignatureStrategy>()?,
            Err(_) => base.strategy,
        };
        let signature = SignatureConfig {
            strategy,
            min_word_confidence: parse_env("MIN_WORD_CONFIDENCE", base.min_word_confidence)?,
            ink_brightness_cutoff: parse_env("INK_BRIGHTNESS_CUTOFF", base.ink_brightness_cutoff)?,
            min_ink_pixels: parse_env("MIN_INK_PIXELS", base.min_ink_pixels)?,
            region_min_ink_pixels: parse_env("REGION_MIN_INK_PIXELS", base.region_min_ink_pixels)?,
            region: base.region,
        };

        let field_rules = match env::var("FIELD_RULES_PATH") {
            Ok(path) => load_field_rules(&path)?,
            Err(_) => default_field_rules(),
        };

        let config = Config {
            server_address,
            ocr_language,
            render_dpi,
            max_file_size_mb,
            download_timeout_seconds,
            analysis: AnalysisConfig {
                field_rules,
                signature,
            },
        };

        info!("Configuration:");
        info!("   SERVER_ADDRESS: {}", config.server_address);
        info!("   OCR_LANGUAGE: {}", config.ocr_language);
        info!("   RENDER_DPI: {}", config.render_dpi);
        info!("   MAX_FILE_SIZE_MB: {}", config.max_file_size_mb);
        info!("   DOWNLOAD_TIMEOUT_SECONDS: {}", config.download_timeout_seconds);
        info!("   SIGNATURE_STRATEGY: {}", config.analysis.signature.strategy);
        info!(
            "   REQUIRED_FIELDS: {}",
            config.analysis.required_fields().join(", ")
        );

        Ok(config)
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow!("Invalid value '{}' for {}: {}", raw, key, e)),
        Err(_) => Ok(default),
    }
}

/// Read field rules from a JSON file of `[{"id": .., "keywords": [..]}]`.
pub fn load_field_rules(path: &str) -> Result<Vec<FieldRule>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read field rules from {}", path))?;
    let rules: Vec<FieldRule> = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse field rules in {}", path))?;

    if rules.is_empty() {
        return Err(anyhow!("Field rules file {} contains no rules", path));
    }

    Ok(rules.into_iter().map(FieldRule::normalized).collect())
}
