//! Menu structure detection
//!
//! Advisory layout metadata for renderers. Grouping does not consume it.

use serde::{Deserialize, Serialize};

use crate::ocr::TextFragment;

/// Default horizontal span above which a page is treated as two columns
pub const DEFAULT_COLUMN_SPAN_THRESHOLD: f64 = 500.0;

/// Layout signal for a page of fragments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuStructure {
    pub has_columns: bool,
    pub column_count: usize,
    /// Section headings; always empty for now
    pub sections: Vec<String>,
}

impl Default for MenuStructure {
    fn default() -> Self {
        Self {
            has_columns: false,
            column_count: 1,
            sections: Vec::new(),
        }
    }
}

/// Report two columns when box left edges span more than `span_threshold`
pub fn detect_menu_structure(fragments: &[TextFragment], span_threshold: f64) -> MenuStructure {
    let xs = fragments.iter().map(|f| f.bounding_box.x);
    let (min_x, max_x) = xs.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), x| {
        (lo.min(x), hi.max(x))
    });

    if fragments.is_empty() || max_x - min_x <= span_threshold {
        return MenuStructure::default();
    }

    // TODO: detect section headings (all-caps or larger-font lines without prices)
    MenuStructure {
        has_columns: true,
        column_count: 2,
        sections: Vec::new(),
    }
}
