//! Property-based tests for menu grouping
//!
//! Fragments are generated on a coarse grid so that lines, prices and ties
//! all occur often:
//! - Every fragment lands in exactly one line and one item
//! - Line grouping ignores input order
//! - Item confidence and box follow from member fragments
//! - A price line is always the last line of its item

use menu_lens::grouping::{
    contains_price, detect_prices, group_into_lines, group_text_blocks, segment_lines,
    DEFAULT_LINE_THRESHOLD,
};
use menu_lens::{BoundingBox, TextFragment};
use proptest::prelude::*;

/// Menu-like words, some of which are prices
fn word_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[A-Z][a-z]{2,8}",
        "[a-z]{2,6}",
        "\\$[0-9]{1,2}\\.[0-9]{2}",
        "[0-9]{1,2},[0-9]{2}€",
    ]
}

fn fragment_strategy() -> impl Strategy<Value = TextFragment> {
    (
        word_strategy(),
        0u32..20,
        0u32..30,
        1u32..80,
        1u32..30,
        0u32..=100,
    )
        .prop_map(|(text, col, row, width, height, confidence)| {
            TextFragment::new(
                text,
                BoundingBox::new(
                    col as f64 * 35.0,
                    row as f64 * 9.0,
                    width as f64,
                    height as f64,
                ),
                confidence as f64 / 100.0,
            )
        })
}

fn fragments_strategy() -> impl Strategy<Value = Vec<TextFragment>> {
    prop::collection::vec(fragment_strategy(), 1..40)
}

fn sorted_keys(fragments: &[TextFragment]) -> Vec<String> {
    let mut keys: Vec<String> = fragments.iter().map(|f| format!("{:?}", f)).collect();
    keys.sort();
    keys
}

#[cfg(test)]
mod proptest_tests {
    use super::*;

    proptest! {
        #[test]
        fn test_lines_partition_fragments(fragments in fragments_strategy()) {
            let lines = group_into_lines(&fragments, DEFAULT_LINE_THRESHOLD);

            let members: Vec<TextFragment> = lines
                .iter()
                .flat_map(|line| line.fragments().iter().cloned())
                .collect();
            prop_assert_eq!(sorted_keys(&members), sorted_keys(&fragments));
        }

        #[test]
        fn test_line_invariants(fragments in fragments_strategy()) {
            let lines = group_into_lines(&fragments, DEFAULT_LINE_THRESHOLD);

            for line in &lines {
                prop_assert!(!line.is_empty());
                for f in line.fragments() {
                    prop_assert!((f.bounding_box.y - line.anchor_y()).abs() <= DEFAULT_LINE_THRESHOLD);
                }
                for pair in line.fragments().windows(2) {
                    prop_assert!(pair[0].bounding_box.x <= pair[1].bounding_box.x);
                }
            }
            for pair in lines.windows(2) {
                prop_assert!(pair[0].anchor_y() < pair[1].anchor_y());
            }
        }

        #[test]
        fn test_lines_ignore_input_order(
            fragments in fragments_strategy(),
            seed in any::<u64>(),
        ) {
            let mut shuffled = fragments.clone();
            // Deterministic Fisher-Yates driven by the seed
            let mut state = seed;
            for i in (1..shuffled.len()).rev() {
                state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                let j = (state >> 33) as usize % (i + 1);
                shuffled.swap(i, j);
            }

            prop_assert_eq!(
                group_into_lines(&fragments, DEFAULT_LINE_THRESHOLD),
                group_into_lines(&shuffled, DEFAULT_LINE_THRESHOLD)
            );
        }

        #[test]
        fn test_items_partition_fragments(fragments in fragments_strategy()) {
            let lines = group_into_lines(&fragments, DEFAULT_LINE_THRESHOLD);
            let boundaries = detect_prices(&lines);
            let groups = segment_lines(lines, &boundaries);

            let members: Vec<TextFragment> = groups
                .iter()
                .flat_map(|g| g.lines().iter())
                .flat_map(|line| line.fragments().iter().cloned())
                .collect();
            prop_assert_eq!(sorted_keys(&members), sorted_keys(&fragments));

            for (index, group) in groups.iter().enumerate() {
                prop_assert_eq!(group.id(), index);
                prop_assert!(!group.lines().is_empty());
            }
        }

        #[test]
        fn test_boundary_law(fragments in fragments_strategy()) {
            let lines = group_into_lines(&fragments, DEFAULT_LINE_THRESHOLD);
            let boundaries = detect_prices(&lines);
            let groups = segment_lines(lines, &boundaries);

            let last = groups.len().saturating_sub(1);
            for (index, group) in groups.iter().enumerate() {
                let group_lines = group.lines();
                // Only the final line of an item may carry a price
                for line in &group_lines[..group_lines.len() - 1] {
                    prop_assert!(!contains_price(&line.text()));
                }
                // Every item but the trailing one ends on a price line
                if index < last {
                    let closing = &group_lines[group_lines.len() - 1];
                    prop_assert!(contains_price(&closing.text()));
                }
            }
        }

        #[test]
        fn test_item_confidence_and_box(fragments in fragments_strategy()) {
            let lines = group_into_lines(&fragments, DEFAULT_LINE_THRESHOLD);
            let boundaries = detect_prices(&lines);
            let groups = segment_lines(lines, &boundaries);
            let items = group_text_blocks(&fragments, DEFAULT_LINE_THRESHOLD);

            prop_assert_eq!(items.len(), groups.len());
            for (item, group) in items.iter().zip(&groups) {
                let members: Vec<&TextFragment> = group
                    .lines()
                    .iter()
                    .flat_map(|line| line.fragments())
                    .collect();

                let mean = members.iter().map(|f| f.confidence).sum::<f64>() / members.len() as f64;
                prop_assert!((item.confidence - mean).abs() < 1e-9);

                let min_x = members.iter().map(|f| f.bounding_box.x).fold(f64::INFINITY, f64::min);
                let min_y = members.iter().map(|f| f.bounding_box.y).fold(f64::INFINITY, f64::min);
                let max_x = members.iter().map(|f| f.bounding_box.right()).fold(f64::NEG_INFINITY, f64::max);
                let max_y = members.iter().map(|f| f.bounding_box.bottom()).fold(f64::NEG_INFINITY, f64::max);
                prop_assert_eq!(
                    item.bounding_box,
                    BoundingBox::new(min_x, min_y, max_x - min_x, max_y - min_y)
                );
                for f in &members {
                    prop_assert!(item.bounding_box.contains(&f.bounding_box));
                }
            }
        }
    }
}
