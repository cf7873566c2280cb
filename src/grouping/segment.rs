//! Item segmentation
//!
//! Walks lines in order with a single accumulator. A price line closes the
//! current item and is its last line; whatever is left at the end becomes a
//! final, priceless item.

use std::collections::BTreeSet;

use super::lines::Line;

/// Contiguous run of lines forming one menu entry
#[derive(Debug, Clone, PartialEq)]
pub struct MenuItemGroup {
    id: usize,
    lines: Vec<Line>,
}

impl MenuItemGroup {
    /// Sequential id, starting at 0 per segmentation call
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.iter().all(Line::is_empty)
    }
}

/// Split `lines` into item groups at the given boundary indices
pub fn segment_lines(lines: Vec<Line>, boundaries: &BTreeSet<usize>) -> Vec<MenuItemGroup> {
    let mut groups = Vec::new();
    let mut buffer: Vec<Line> = Vec::new();

    for (index, line) in lines.into_iter().enumerate() {
        buffer.push(line);

        if boundaries.contains(&index) {
            groups.push(MenuItemGroup {
                id: groups.len(),
                lines: std::mem::take(&mut buffer),
            });
        }
    }

    // Trailing item without a detected price
    if !buffer.is_empty() {
        groups.push(MenuItemGroup {
            id: groups.len(),
            lines: buffer,
        });
    }

    groups
}
