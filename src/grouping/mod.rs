//! Menu item reconstruction
//!
//! Turns an unordered set of OCR fragments into ordered menu items:
//! - Line grouping by y proximity, left-to-right within a line
//! - Price detection marking item boundaries
//! - Segmentation of lines into items at those boundaries
//! - Assembly of each item's text, box, confidence and price
//!
//! Proximity clustering and structure detection are auxiliary heuristics
//! that sit beside this path.
//!
//! Every call is pure and synchronous. A [`MenuPipeline`] holds only its
//! configuration, so one instance can process independent scans in parallel.

pub mod assemble;
pub mod cluster;
pub mod lines;
pub mod price;
pub mod segment;
pub mod structure;

pub use assemble::{assemble, GroupedMenuItem};
pub use cluster::{cluster_by_proximity, DEFAULT_PROXIMITY_MAX_DISTANCE};
pub use lines::{group_into_lines, Line, DEFAULT_LINE_THRESHOLD};
pub use price::{contains_price, detect_prices, extract_price};
pub use segment::{segment_lines, MenuItemGroup};
pub use structure::{detect_menu_structure, MenuStructure, DEFAULT_COLUMN_SPAN_THRESHOLD};

use rayon::prelude::*;
use serde::Serialize;
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::error::Result;
use crate::ocr::{filter_low_confidence, Normalizer, OcrResult, TextFragment};

/// Group fragments into menu items with the given line threshold.
///
/// No confidence filtering is applied. Empty input yields no items.
pub fn group_text_blocks(fragments: &[TextFragment], line_threshold: f64) -> Vec<GroupedMenuItem> {
    if fragments.is_empty() {
        return Vec::new();
    }

    let lines = group_into_lines(fragments, line_threshold);
    let boundaries = detect_prices(&lines);
    debug!(
        "Grouped {} fragments into {} lines, {} with prices",
        fragments.len(),
        lines.len(),
        boundaries.len()
    );

    let groups = segment_lines(lines, &boundaries);
    groups.iter().filter_map(assemble).collect()
}

/// Outcome of processing one scan
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    /// Menu items in reading order
    pub items: Vec<GroupedMenuItem>,
    /// Number of items
    pub item_count: usize,
    /// Fragments that reached grouping
    pub fragment_count: usize,
    /// Fragments removed by the confidence filter
    pub dropped_fragments: usize,
    /// Mean confidence of the fragments that reached grouping
    pub confidence: f64,
    /// Advisory layout metadata
    pub structure: MenuStructure,
    /// Proximity clusters, when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clusters: Option<Vec<Vec<TextFragment>>>,
    /// Processing time in milliseconds
    pub processing_time_ms: u64,
}

impl ScanResult {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Configured normalize → filter → group pipeline
#[derive(Debug, Clone)]
pub struct MenuPipeline {
    config: AppConfig,
    normalizer: Normalizer,
}

impl MenuPipeline {
    /// Create a pipeline, rejecting out-of-range settings
    pub fn new(config: AppConfig) -> Result<Self> {
        config.validate()?;
        let normalizer = Normalizer::new(config.ocr.provider)
            .with_default_confidence(config.ocr.default_confidence);

        Ok(Self { config, normalizer })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Group fragments (no filtering) with the configured line threshold
    pub fn group_fragments(&self, fragments: &[TextFragment]) -> Vec<GroupedMenuItem> {
        group_text_blocks(fragments, self.config.grouping.line_threshold)
    }

    /// Filter (if enabled) and group a normalized result
    pub fn process(&self, result: &OcrResult) -> ScanResult {
        let start = Instant::now();

        let mut kept = if self.config.ocr.filter_low_confidence {
            filter_low_confidence(result, self.config.ocr.min_confidence)
        } else {
            result.clone()
        };
        kept.recompute_confidence();

        let dropped = result.fragments.len() - kept.fragments.len();
        if kept.is_empty() && !result.is_empty() {
            warn!(
                "All {} fragments fell below confidence {:.2}",
                result.fragments.len(),
                self.config.ocr.min_confidence
            );
        }

        let items = self.group_fragments(&kept.fragments);
        let structure = self.structure(&kept.fragments);
        let clusters = self
            .config
            .layout
            .include_clusters
            .then(|| self.cluster(&kept.fragments));

        let processing_time = start.elapsed();
        info!(
            "Reconstructed {} menu items from {} fragments ({} dropped) in {:?}",
            items.len(),
            kept.fragments.len(),
            dropped,
            processing_time
        );

        ScanResult {
            item_count: items.len(),
            items,
            fragment_count: kept.fragments.len(),
            dropped_fragments: dropped,
            confidence: kept.confidence,
            structure,
            clusters,
            processing_time_ms: processing_time.as_millis() as u64,
        }
    }

    /// Normalize a provider payload, then [`process`](Self::process) it
    pub fn process_payload(&self, payload: &Value) -> Result<ScanResult> {
        let result = self.normalizer.normalize(payload)?;
        Ok(self.process(&result))
    }

    /// Process independent payloads in parallel; output order matches input
    pub fn process_batch(&self, payloads: &[Value]) -> Vec<Result<ScanResult>> {
        debug!("Processing batch of {} payloads", payloads.len());
        payloads
            .par_iter()
            .map(|payload| self.process_payload(payload))
            .collect()
    }

    /// Proximity clusters with the configured distance
    pub fn cluster(&self, fragments: &[TextFragment]) -> Vec<Vec<TextFragment>> {
        cluster_by_proximity(fragments, self.config.layout.proximity_max_distance)
    }

    /// Column layout signal with the configured span threshold
    pub fn structure(&self, fragments: &[TextFragment]) -> MenuStructure {
        detect_menu_structure(fragments, self.config.layout.column_span_threshold)
    }
}

impl Default for MenuPipeline {
    fn default() -> Self {
        let config = AppConfig::default();
        let normalizer = Normalizer::new(config.ocr.provider)
            .with_default_confidence(config.ocr.default_confidence);
        Self { config, normalizer }
    }
}
