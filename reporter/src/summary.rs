//! Report aggregation and merging.
//!
//! Two views are produced from the per-board row sets:
//!
//! - A **flat listing**: every action row and every todo-summary row, each
//!   board group sorted by item name.
//! - A **rolled-up summary**: one row per `(project, item)` key, with the
//!   `done` and `todos` text fields accumulated across merges and a derived
//!   title line prefixed exactly once per field.
//!
//! Merging is append-only: existing text is never truncated, only prefixed
//! or appended with a newline separator. Sorting is stable, so rows with
//! equal item names keep their original relative order.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::{BoardRows, ReportRow};

/// Priority marker (`P1 `, `P12 `, ...) stripped from item names when
/// deriving the title line.
static PRIORITY_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"P\d+ ").expect("priority prefix pattern is valid"));

/// Builds the flat listing: each board's action rows sorted by item name,
/// concatenated in board processing order, followed by each board's
/// todo-summary rows likewise.
#[must_use]
pub fn flat_report(actions: &[BoardRows], todos: &[BoardRows]) -> Vec<ReportRow> {
    let mut out = Vec::new();
    for container in actions.iter().chain(todos) {
        let mut rows = container.rows.clone();
        sort_by_item_name(&mut rows);
        out.extend(rows);
    }
    out
}

/// Builds the rolled-up summary, one board group per todo container.
///
/// Action rows are first reduced across all boards by `(project, item)`,
/// their `done` texts concatenated. Each board's todo-summary rows are then
/// folded into that board's reduced rows: a colliding todo row refreshes the
/// date and appends its todo text; a new key inserts the todo row as-is.
#[must_use]
pub fn summary_report(actions: &[BoardRows], todos: &[BoardRows]) -> Vec<BoardRows> {
    let mut reduced: Vec<ReportRow> = Vec::new();
    for container in actions {
        for row in &container.rows {
            merge_done(&mut reduced, row);
        }
    }
    for row in &mut reduced {
        let title = title_line(row, false);
        prefix_title_once(&mut row.done, &title);
    }

    let mut out = Vec::new();
    for container in todos {
        let mut rows: Vec<ReportRow> = reduced
            .iter()
            .filter(|r| r.board == container.board)
            .cloned()
            .collect();

        for todo in &container.rows {
            fold_todo(&mut rows, todo);
        }

        for row in &mut rows {
            let title = title_line(row, true);
            prefix_title_once(&mut row.todos, &title);
        }

        sort_by_item_name(&mut rows);
        out.push(BoardRows {
            board: container.board.clone(),
            rows,
        });
    }
    out
}

/// Sorts rows ascending by item name, case-insensitively. The sort is
/// stable: ties preserve the original relative order.
pub fn sort_by_item_name(rows: &mut [ReportRow]) {
    rows.sort_by(|a, b| a.item.to_lowercase().cmp(&b.item.to_lowercase()));
}

/// Merges an action row into the accumulator by `(project, item)`.
///
/// On collision the new `done` text is appended after a newline; otherwise
/// the row is inserted.
pub fn merge_done(acc: &mut Vec<ReportRow>, row: &ReportRow) {
    match acc.iter_mut().find(|r| r.key() == row.key()) {
        Some(existing) => {
            existing.done = format!("{}\n{}", existing.done, row.done);
        }
        None => acc.push(row.clone()),
    }
}

/// Folds a todo-summary row into the accumulator by `(project, item)`.
///
/// On collision the todo-summary's date wins (freshness) and its todo text
/// is appended after a newline, unless the exact same text was already
/// appended. A new key inserts the todo row carrying only todo content.
pub fn fold_todo(acc: &mut Vec<ReportRow>, todo: &ReportRow) {
    match acc.iter_mut().find(|r| r.key() == todo.key()) {
        Some(existing) => {
            existing.date = todo.date.clone();
            if !todo.todos.is_empty() && !existing.todos.contains(&todo.todos) {
                existing.todos = format!("{}\n{}", existing.todos, todo.todos);
            }
        }
        None => acc.push(todo.clone()),
    }
}

/// Derives the title line for a row: the item name with any priority marker
/// stripped, bracketed, optionally followed by the progress percentage.
#[must_use]
pub fn title_line(row: &ReportRow, show_progress: bool) -> String {
    let name = PRIORITY_PREFIX.replace(&row.item, "");
    let mut title = format!("[{name}]");
    if show_progress {
        let pct = (safe_ratio(row.progress) * 100.0).round() as i64;
        title.push_str(&format!(" progress {pct}%"));
    }
    title
}

/// Prefixes the title onto a text field exactly once.
///
/// Empty fields stay empty, and a field already containing the title is
/// left untouched, so repeated merges never duplicate the line.
pub fn prefix_title_once(field: &mut String, title: &str) {
    if !field.is_empty() && !field.contains(title) {
        *field = format!("{title}\n{field}");
    }
}

/// Treats a non-finite ratio as zero for display.
fn safe_ratio(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}
