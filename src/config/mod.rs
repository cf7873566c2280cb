//! Configuration
//!
//! Grouping thresholds and provider settings stored in TOML format. Every
//! key is optional; missing keys fall back to the defaults below.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::MenuLensError;
use crate::grouping::{
    DEFAULT_COLUMN_SPAN_THRESHOLD, DEFAULT_LINE_THRESHOLD, DEFAULT_PROXIMITY_MAX_DISTANCE,
};
use crate::ocr::{Provider, DEFAULT_CONFIDENCE};

/// Default confidence floor for the optional filter
pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.7;

/// Top-level settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Provider and confidence settings
    pub ocr: OcrConfig,
    /// Line and item grouping settings
    pub grouping: GroupingConfig,
    /// Auxiliary layout heuristics
    pub layout: LayoutConfig,
}

/// Provider and confidence settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Payload shape to expect
    pub provider: Provider,
    /// Drop fragments below `min_confidence` before grouping
    pub filter_low_confidence: bool,
    /// Confidence floor (0.0 - 1.0)
    pub min_confidence: f64,
    /// Confidence assigned when the provider omits one
    pub default_confidence: f64,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            provider: Provider::CloudVision,
            filter_low_confidence: true,
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            default_confidence: DEFAULT_CONFIDENCE,
        }
    }
}

/// Line and item grouping settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupingConfig {
    /// Max vertical distance (px) from a line's anchor to join that line
    pub line_threshold: f64,
}

impl Default for GroupingConfig {
    fn default() -> Self {
        Self {
            line_threshold: DEFAULT_LINE_THRESHOLD,
        }
    }
}

/// Auxiliary layout heuristics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Max center-to-center distance (px) for proximity clustering
    pub proximity_max_distance: f64,
    /// Horizontal span (px) above which a page reads as two columns
    pub column_span_threshold: f64,
    /// Attach proximity clusters to scan results
    pub include_clusters: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            proximity_max_distance: DEFAULT_PROXIMITY_MAX_DISTANCE,
            column_span_threshold: DEFAULT_COLUMN_SPAN_THRESHOLD,
            include_clusters: false,
        }
    }
}

impl AppConfig {
    /// Check every value is in range
    pub fn validate(&self) -> std::result::Result<(), MenuLensError> {
        check_unit("ocr.min_confidence", self.ocr.min_confidence)?;
        check_unit("ocr.default_confidence", self.ocr.default_confidence)?;
        check_pixels("grouping.line_threshold", self.grouping.line_threshold)?;
        check_pixels("layout.proximity_max_distance", self.layout.proximity_max_distance)?;
        check_pixels("layout.column_span_threshold", self.layout.column_span_threshold)?;
        Ok(())
    }
}

fn check_unit(field: &'static str, value: f64) -> std::result::Result<(), MenuLensError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(MenuLensError::invalid_config(
            field,
            format!("{value} is outside [0, 1]"),
        ));
    }
    Ok(())
}

fn check_pixels(field: &'static str, value: f64) -> std::result::Result<(), MenuLensError> {
    if !value.is_finite() || value < 0.0 {
        return Err(MenuLensError::invalid_config(
            field,
            format!("{value} must be a non-negative pixel distance"),
        ));
    }
    Ok(())
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {:?}", path))?;
    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file {:?}", path))?;
    config.validate()?;
    Ok(config)
}

/// Save configuration to file
pub fn save_config(config: &AppConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Location of the user's config file (`<config dir>/config.toml`)
pub fn default_config_path() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "menulens", "MenuLens")
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

    Ok(proj_dirs.config_dir().join("config.toml"))
}
