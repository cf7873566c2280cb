//! Item assembly
//!
//! Merges the lines of a [`MenuItemGroup`] into one output record.

use serde::{Deserialize, Serialize};

use super::price::extract_price;
use super::segment::MenuItemGroup;
use crate::ocr::{BoundingBox, TextFragment};

/// One recovered menu entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupedMenuItem {
    /// Sequential within one grouping call, starting at 0
    pub id: usize,
    /// Lines joined by `\n`, fragments within a line by a space
    pub text: String,
    /// Union of every member fragment's box
    pub bounding_box: BoundingBox,
    /// Mean of member fragment confidences
    pub confidence: f64,
    /// First price found in `text`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
}

/// Assemble a group into a menu item.
///
/// Returns `None` only for a group without fragments, which segmentation
/// never produces.
pub fn assemble(group: &MenuItemGroup) -> Option<GroupedMenuItem> {
    debug_assert!(!group.is_empty(), "segmenter produced an empty group");

    let fragments: Vec<&TextFragment> = group
        .lines()
        .iter()
        .flat_map(|line| line.fragments())
        .collect();

    let bounding_box = BoundingBox::union(fragments.iter().map(|f| &f.bounding_box))?;
    let confidence = fragments.iter().map(|f| f.confidence).sum::<f64>() / fragments.len() as f64;

    let text = group
        .lines()
        .iter()
        .map(|line| line.text())
        .collect::<Vec<_>>()
        .join("\n");
    let price = extract_price(&text);

    Some(GroupedMenuItem {
        id: group.id(),
        text,
        bounding_box,
        confidence,
        price,
    })
}

impl GroupedMenuItem {
    /// Text without the extracted price, trimmed
    pub fn name(&self) -> String {
        match &self.price {
            Some(price) => self.text.replacen(price.as_str(), "", 1).trim().to_string(),
            None => self.text.trim().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grouping::lines::{group_into_lines, DEFAULT_LINE_THRESHOLD};
    use crate::grouping::price::detect_prices;
    use crate::grouping::segment::segment_lines;
    use crate::ocr::fragment;

    fn assemble_all(fragments: &[TextFragment]) -> Vec<GroupedMenuItem> {
        let lines = group_into_lines(fragments, DEFAULT_LINE_THRESHOLD);
        let prices = detect_prices(&lines);
        segment_lines(lines, &prices)
            .iter()
            .filter_map(assemble)
            .collect()
    }

    #[test]
    fn test_assemble_multi_line_item() {
        let items = assemble_all(&[
            fragment("Pollo", 10.0, 10.0, 0.9),
            fragment("asado", 60.0, 12.0, 0.7),
            fragment("$12.00", 10.0, 40.0, 0.8),
        ]);

        assert_eq!(items.len(), 1);
        let item = &items[0];
        assert_eq!(item.id, 0);
        assert_eq!(item.text, "Pollo asado\n$12.00");
        assert_eq!(item.price.as_deref(), Some("$12.00"));
        assert!((item.confidence - 0.8).abs() < 1e-9);
        // x 10..100, y 10..50
        assert_eq!(item.bounding_box, BoundingBox::new(10.0, 10.0, 90.0, 40.0));
        assert_eq!(item.name(), "Pollo asado");
    }

    #[test]
    fn test_zero_size_box() {
        let items = assemble_all(&[TextFragment::new(
            "Agua",
            BoundingBox::new(3.0, 4.0, 0.0, 0.0),
            1.0,
        )]);

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].bounding_box, BoundingBox::new(3.0, 4.0, 0.0, 0.0));
        assert_eq!(items[0].price, None);
        assert_eq!(items[0].name(), "Agua");
    }

    #[test]
    fn test_json_omits_missing_price() {
        let items = assemble_all(&[fragment("Pan", 0.0, 0.0, 0.9)]);
        let json = serde_json::to_value(&items[0]).unwrap();

        assert_eq!(json["id"], 0);
        assert!(json.get("price").is_none());
        assert!(json.get("boundingBox").is_some());
    }
}
