//! Record types for the weekly board report.
//!
//! This module defines two families of types:
//!
//! - Wire records deserialized from the project-management REST API
//!   ([`Board`], [`Card`], [`Checklist`], [`Action`], ...). These are
//!   read-only snapshots taken once per run; unknown JSON fields are
//!   ignored.
//! - Report records produced by the aggregation pipeline ([`ReportRow`],
//!   [`BoardRows`]). Text fields default to the empty string and ratios
//!   default to `0.0`, so a row is always serializable.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// A top-level board, the root grouping unit of the report.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Board {
    pub id: String,
    pub name: String,
}

/// A label attached to a card. Label names drive card exclusion.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Label {
    pub name: String,
}

/// An open work item on a board.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: String,
    pub name: String,

    /// Identifier of the containing list (the card's "project").
    pub id_list: String,

    /// Checklist identifiers. A card without checklists carries no
    /// trackable work and is skipped by the todo pass.
    #[serde(default)]
    pub id_checklists: Vec<String>,

    #[serde(default)]
    pub labels: Vec<Label>,
}

/// A named list (column) within a board.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ListInfo {
    pub id: String,
    pub name: String,
}

/// A member assigned to a card or acting on it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub full_name: String,
}

/// Completion state of a single check item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckItemState {
    Complete,
    Incomplete,
}

/// One checkable sub-task within a checklist.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CheckItem {
    pub name: String,
    pub state: CheckItemState,
}

impl CheckItem {
    /// Returns true if this item is a decorative separator (`---` / `===`),
    /// excluded from all counts and never rendered as a todo.
    #[must_use]
    pub fn is_separator(&self) -> bool {
        let trimmed = self.name.trim();
        trimmed.starts_with("---") || trimmed.starts_with("===")
    }

    /// Returns true if this item counts toward the additional-work ratio
    /// (trimmed name starts with `+`). Additional items still count toward
    /// the item total.
    #[must_use]
    pub fn is_additional(&self) -> bool {
        self.name.trim().starts_with('+')
    }

    /// Returns true if this item is marked complete.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.state == CheckItemState::Complete
    }
}

/// A named group of check items on a card.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checklist {
    pub name: String,

    #[serde(default)]
    pub check_items: Vec<CheckItem>,
}

/// Activity-event kinds recognized by the report.
///
/// The feed may contain other kinds; they deserialize to [`ActionKind::Other`]
/// and are dropped by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionKind {
    UpdateCheckItemStateOnCard,
    CommentCard,
    #[serde(other)]
    Other,
}

/// Card reference carried inside an action's data envelope.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ActionCard {
    pub id: String,
    pub name: String,
}

/// Check-item reference carried by checklist-state-change actions.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ActionCheckItem {
    pub name: String,
    pub state: CheckItemState,
}

/// Kind-specific payload of an activity event.
///
/// `check_item` is present for checklist-state changes, `text` for comments.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionData {
    pub card: ActionCard,

    #[serde(default)]
    pub check_item: Option<ActionCheckItem>,

    #[serde(default)]
    pub text: Option<String>,
}

/// A timestamped activity event referencing a card and an acting member.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    pub id: String,

    #[serde(rename = "type")]
    pub kind: ActionKind,

    pub date: DateTime<Utc>,

    pub data: ActionData,

    pub member_creator: Member,
}

/// One normalized output record of the report.
///
/// Rows are keyed for merge purposes by `(project, item)`. The `done` and
/// `todos` fields accumulate text across merges and are only ever appended
/// to, never truncated.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub board: String,

    /// Containing list name, or a sentinel when the lookup failed.
    pub project: String,

    /// Card name.
    pub item: String,

    /// Acting or assigned member display name(s), comma-joined.
    pub member: String,

    /// Completion ratio in `[0.0, 1.0]`, rounded to 2 decimals.
    pub progress: f64,

    /// Additional-work ratio in `[0.0, 1.0]`, rounded to 2 decimals.
    pub additional_rate: f64,

    /// ISO date, `YYYY-MM-DD`.
    pub date: String,

    /// Narrative of completed or commented work, newline-concatenated.
    pub done: String,

    /// Outstanding-item listing, newline-concatenated.
    pub todos: String,
}

impl ReportRow {
    /// Merge key: rows with the same `(project, item)` pair are rolled up
    /// together in the summary view.
    #[must_use]
    pub fn key(&self) -> (&str, &str) {
        (&self.project, &self.item)
    }
}

/// Per-board accumulator: the rows one board contributed to a report pass.
///
/// A board whose fetch failed still contributes a container with an empty
/// row set, so both halves of the report cover the same board sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardRows {
    pub board: String,
    pub rows: Vec<ReportRow>,
}
