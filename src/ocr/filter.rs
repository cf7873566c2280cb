//! Confidence filtering
//!
//! Optional pre-pass that drops fragments the recognizer was unsure about.

use tracing::debug;

use super::{OcrResult, TextFragment};

/// Keep fragments with `confidence >= min_confidence`, preserving order.
///
/// Retained fragments are returned unchanged.
pub fn filter_fragments(fragments: &[TextFragment], min_confidence: f64) -> Vec<TextFragment> {
    let kept: Vec<TextFragment> = fragments
        .iter()
        .filter(|f| f.confidence >= min_confidence)
        .cloned()
        .collect();

    debug!(
        "Confidence filter (min {:.2}): kept {} of {} fragments",
        min_confidence,
        kept.len(),
        fragments.len()
    );

    kept
}

/// Filter the fragments of a whole result.
///
/// `full_text` and `confidence` are carried over as-is; call
/// [`OcrResult::recompute_confidence`] if the mean of the kept fragments is
/// needed.
pub fn filter_low_confidence(result: &OcrResult, min_confidence: f64) -> OcrResult {
    OcrResult {
        full_text: result.full_text.clone(),
        fragments: filter_fragments(&result.fragments, min_confidence),
        confidence: result.confidence,
    }
}

/// Arithmetic mean of fragment confidences, `None` when empty
pub fn mean_confidence(fragments: &[TextFragment]) -> Option<f64> {
    if fragments.is_empty() {
        return None;
    }
    let sum: f64 = fragments.iter().map(|f| f.confidence).sum();
    Some(sum / fragments.len() as f64)
}
