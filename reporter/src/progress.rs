//! Checklist progress computation.
//!
//! A card's completion ratio is derived from its checklists. Two checklist
//! roles matter: a *Main* checklist (name starts with `main`) is the
//! authoritative progress source, and *Todo* checklists (name starts with
//! `todo`) enumerate outstanding work. Which items feed the computation is
//! governed by [`ChecklistScope`]; historical report variants disagreed on
//! the policy, so it is an explicit operator choice rather than a built-in
//! guess.
//!
//! Decorative separator items (`---` / `===`) are removed before anything is
//! counted.

use crate::types::{CheckItem, Checklist};

/// Checklist name prefix marking the authoritative progress source.
const MAIN_PREFIX: &str = "main";

/// Checklist name prefix marking outstanding-work checklists.
const TODO_PREFIX: &str = "todo";

/// Policy for selecting which checklist items feed the progress computation
/// and the outstanding-work listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChecklistScope {
    /// Union of Main- and Todo-checklist items, unconditionally.
    #[default]
    Union,

    /// Main-checklist items; Todo-checklist items only when the card has no
    /// Main checklist at all.
    MainFirst,
}

/// Completion and additional-work ratios for one card.
///
/// Both ratios are in `[0.0, 1.0]`, rounded to 2 decimal places. A card
/// with no countable items yields `0.0` for both; NaN never escapes this
/// type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChecklistProgress {
    pub progress: f64,
    pub additional_rate: f64,

    /// Items marked complete.
    pub completed: usize,

    /// Items counting toward the additional-work ratio.
    pub additional: usize,

    /// All countable items (separators excluded).
    pub total: usize,
}

impl ChecklistProgress {
    /// Computes ratios over an already-selected item set.
    #[must_use]
    pub fn compute(items: &[&CheckItem]) -> Self {
        let total = items.len();
        let completed = items.iter().filter(|i| i.is_complete()).count();
        let additional = items.iter().filter(|i| i.is_additional()).count();

        Self {
            progress: ratio(completed, total),
            additional_rate: ratio(additional, total),
            completed,
            additional,
            total,
        }
    }
}

/// Selects the check items that feed progress and todo extraction for one
/// card, per the configured scope. Separator items are filtered out.
#[must_use]
pub fn select_items(checklists: &[Checklist], scope: ChecklistScope) -> Vec<&CheckItem> {
    let main_lists: Vec<&Checklist> = checklists
        .iter()
        .filter(|cl| has_prefix(&cl.name, MAIN_PREFIX))
        .collect();
    let todo_lists: Vec<&Checklist> = checklists
        .iter()
        .filter(|cl| has_prefix(&cl.name, TODO_PREFIX))
        .collect();

    let selected: Vec<&Checklist> = match scope {
        ChecklistScope::Union => main_lists.into_iter().chain(todo_lists).collect(),
        ChecklistScope::MainFirst => {
            if main_lists.is_empty() {
                todo_lists
            } else {
                main_lists
            }
        }
    };

    selected
        .into_iter()
        .flat_map(|cl| cl.check_items.iter())
        .filter(|item| !item.is_separator())
        .collect()
}

/// Case-insensitive prefix match on a trimmed checklist name.
fn has_prefix(name: &str, prefix: &str) -> bool {
    name.trim().to_lowercase().starts_with(prefix)
}

/// `count / total` rounded to 2 decimals; `0.0` when the total is zero.
fn ratio(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round2(count as f64 / total as f64)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
