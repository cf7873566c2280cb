//! OCR data model
//!
//! Provider-agnostic text fragments as produced by the normalizer. Everything
//! downstream of [`normalize`] only ever sees these types.

pub mod filter;
pub mod normalize;

pub use filter::{filter_fragments, filter_low_confidence, mean_confidence};
pub use normalize::{normalize, Normalizer, Provider, DEFAULT_CONFIDENCE};

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in pixel space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge (x + width)
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge (y + height)
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Center point (x, y)
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Euclidean distance between the centers of two boxes
    pub fn center_distance(&self, other: &BoundingBox) -> f64 {
        let (ax, ay) = self.center();
        let (bx, by) = other.center();
        (bx - ax).hypot(by - ay)
    }

    /// Whether `other` lies entirely inside this box
    pub fn contains(&self, other: &BoundingBox) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Minimal rectangle covering every box, or `None` for an empty iterator
    pub fn union<'a, I>(boxes: I) -> Option<BoundingBox>
    where
        I: IntoIterator<Item = &'a BoundingBox>,
    {
        let mut iter = boxes.into_iter();
        let first = iter.next()?;

        let (mut min_x, mut min_y) = (first.x, first.y);
        let (mut max_x, mut max_y) = (first.right(), first.bottom());
        for b in iter {
            min_x = min_x.min(b.x);
            min_y = min_y.min(b.y);
            max_x = max_x.max(b.right());
            max_y = max_y.max(b.bottom());
        }

        Some(BoundingBox::new(min_x, min_y, max_x - min_x, max_y - min_y))
    }

    /// Envelope of a polygon's vertices
    pub fn from_polygon(polygon: &[(f64, f64)]) -> BoundingBox {
        if polygon.is_empty() {
            return BoundingBox::default();
        }

        let min_x = polygon.iter().map(|p| p.0).fold(f64::INFINITY, f64::min);
        let min_y = polygon.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
        let max_x = polygon.iter().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max);
        let max_y = polygon.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);

        BoundingBox::new(min_x, min_y, max_x - min_x, max_y - min_y)
    }
}

/// One recognized token or phrase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextFragment {
    /// Recognized text
    pub text: String,
    /// Box in pixel space
    pub bounding_box: BoundingBox,
    /// Recognition confidence (0.0 - 1.0)
    pub confidence: f64,
}

impl TextFragment {
    pub fn new(text: impl Into<String>, bounding_box: BoundingBox, confidence: f64) -> Self {
        Self {
            text: text.into(),
            bounding_box,
            confidence,
        }
    }
}

/// Normalized output of one recognition call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OcrResult {
    /// Whole-page text, when the provider supplies an aggregate entry
    pub full_text: String,
    /// Per-token fragments
    pub fragments: Vec<TextFragment>,
    /// Mean fragment confidence (0.0 when there are no fragments)
    pub confidence: f64,
}

impl OcrResult {
    /// Build a result from fragments, computing the mean confidence
    pub fn from_fragments(full_text: impl Into<String>, fragments: Vec<TextFragment>) -> Self {
        let confidence = mean_confidence(&fragments).unwrap_or(0.0);
        Self {
            full_text: full_text.into(),
            fragments,
            confidence,
        }
    }

    /// Boxes of every fragment, in fragment order
    pub fn bounding_boxes(&self) -> Vec<BoundingBox> {
        self.fragments.iter().map(|f| f.bounding_box).collect()
    }

    /// Recompute `confidence` from the current fragments
    pub fn recompute_confidence(&mut self) {
        self.confidence = mean_confidence(&self.fragments).unwrap_or(0.0);
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}

#[cfg(test)]
pub(crate) fn fragment(text: &str, x: f64, y: f64, confidence: f64) -> TextFragment {
    TextFragment::new(text, BoundingBox::new(x, y, 40.0, 10.0), confidence)
}
