//! Outstanding-work extraction.
//!
//! Renders a card's incomplete check items as a display list, one item per
//! line with an arrow marker. The input is the same filtered item set the
//! progress computation uses, so separators never show up as todos.

use crate::types::CheckItem;

/// Line marker for outstanding items.
const TODO_MARKER: &str = "→";

/// Renders outstanding (incomplete) items as a multi-line display string.
///
/// Items are ordered by case-sensitive ascending name comparison. Returns
/// the empty string when nothing is outstanding.
#[must_use]
pub fn outstanding(items: &[&CheckItem]) -> String {
    let mut open: Vec<&str> = items
        .iter()
        .filter(|item| !item.is_complete())
        .map(|item| item.name.as_str())
        .collect();
    open.sort();

    open.iter()
        .map(|name| format!("{TODO_MARKER} {name}"))
        .collect::<Vec<_>>()
        .join("\n")
}
