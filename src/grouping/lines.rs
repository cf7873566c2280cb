//! Line grouping
//!
//! Clusters fragments into horizontal text rows by the y coordinate of their
//! box tops, then orders each row left to right.
//!
//! A line is anchored at its first (topmost) fragment and the anchor is never
//! re-averaged. A run of fragments that each drift slightly lower than the
//! previous one keeps joining the line for as long as it stays within the
//! threshold of the anchor, which can produce one over-tall line.

use std::cmp::Ordering;

use serde::Serialize;

use crate::ocr::{BoundingBox, TextFragment};

/// Default vertical tolerance in pixels
pub const DEFAULT_LINE_THRESHOLD: f64 = 15.0;

/// Fragments judged to lie on the same horizontal row, ordered by `x`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Line {
    anchor_y: f64,
    fragments: Vec<TextFragment>,
}

impl Line {
    fn open(anchor: TextFragment) -> Self {
        Self {
            anchor_y: anchor.bounding_box.y,
            fragments: vec![anchor],
        }
    }

    fn close(mut self) -> Self {
        self.fragments.sort_by(reading_order_x);
        self
    }

    /// Box-top of the fragment that opened the line
    pub fn anchor_y(&self) -> f64 {
        self.anchor_y
    }

    pub fn fragments(&self) -> &[TextFragment] {
        &self.fragments
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Member texts joined by single spaces
    pub fn text(&self) -> String {
        self.fragments
            .iter()
            .map(|f| f.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn bounding_box(&self) -> Option<BoundingBox> {
        BoundingBox::union(self.fragments.iter().map(|f| &f.bounding_box))
    }
}

/// Group fragments into lines, top to bottom.
///
/// A fragment joins the open line when `|y - anchor_y| <= threshold`,
/// otherwise it closes that line and opens a new one anchored at itself.
pub fn group_into_lines(fragments: &[TextFragment], threshold: f64) -> Vec<Line> {
    let mut sorted = fragments.to_vec();
    sorted.sort_by(reading_order_y);

    let mut lines = Vec::new();
    let mut sorted = sorted.into_iter();
    let Some(first) = sorted.next() else {
        return lines;
    };

    let mut current = Line::open(first);
    for fragment in sorted {
        if (fragment.bounding_box.y - current.anchor_y).abs() <= threshold {
            current.fragments.push(fragment);
        } else {
            lines.push(current.close());
            current = Line::open(fragment);
        }
    }
    lines.push(current.close());

    lines
}

// y first; the remaining keys only break ties so the result does not depend
// on input order
fn reading_order_y(a: &TextFragment, b: &TextFragment) -> Ordering {
    a.bounding_box
        .y
        .total_cmp(&b.bounding_box.y)
        .then_with(|| a.bounding_box.x.total_cmp(&b.bounding_box.x))
        .then_with(|| tie_break(a, b))
}

fn reading_order_x(a: &TextFragment, b: &TextFragment) -> Ordering {
    a.bounding_box
        .x
        .total_cmp(&b.bounding_box.x)
        .then_with(|| a.bounding_box.y.total_cmp(&b.bounding_box.y))
        .then_with(|| tie_break(a, b))
}

fn tie_break(a: &TextFragment, b: &TextFragment) -> Ordering {
    a.text
        .cmp(&b.text)
        .then_with(|| a.bounding_box.width.total_cmp(&b.bounding_box.width))
        .then_with(|| a.bounding_box.height.total_cmp(&b.bounding_box.height))
        .then_with(|| a.confidence.total_cmp(&b.confidence))
}
