//! Activity-event classification and mapping.
//!
//! The board's raw action feed is narrowed twice before it reaches the
//! report: a date-window filter (strict on both bounds) and a kind filter
//! (only completed-checklist-item transitions, plus comments when the run
//! enables them). Each surviving event is mapped into one [`ReportRow`].

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use crate::types::{Action, ActionKind, CheckItemState, ReportRow};

/// Marker prefixed to completed-item narrative text.
const DONE_MARKER: &str = "✓";

/// Report date window with strict-exclusive bounds on both ends.
///
/// An event qualifies iff `start < timestamp < end`. The bounds sit at
/// midnight UTC so a run produces the same window on any host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportWindow {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl ReportWindow {
    /// Builds the window for a run executed on `today`: from `today` minus
    /// `offset_days` (exclusive) up to tomorrow (exclusive), which makes
    /// today's events the freshest ones included.
    #[must_use]
    pub fn ending_today(today: NaiveDate, offset_days: u32) -> Self {
        let start = (today - Duration::days(i64::from(offset_days))).and_time(NaiveTime::MIN);
        let end = (today + Duration::days(1)).and_time(NaiveTime::MIN);
        Self { start, end }
    }

    /// Strict containment check: boundary timestamps are excluded.
    #[must_use]
    pub fn contains(&self, timestamp: DateTime<Utc>) -> bool {
        let t = timestamp.naive_utc();
        self.start < t && t < self.end
    }
}

/// Decides whether an action contributes a report row.
///
/// Checklist-state changes qualify only when the resulting state is
/// complete; marking an item incomplete is not reported. Comments qualify
/// only when enabled for the run. Everything else is dropped.
#[must_use]
pub fn qualifies(action: &Action, include_comments: bool) -> bool {
    match action.kind {
        ActionKind::UpdateCheckItemStateOnCard => action
            .data
            .check_item
            .as_ref()
            .is_some_and(|item| item.state == CheckItemState::Complete),
        ActionKind::CommentCard => include_comments,
        ActionKind::Other => false,
    }
}

/// Maps a qualifying action to a report row.
///
/// `project` is the card's list name resolved at report-generation time (or
/// the [`missing_list_sentinel`] when the lookup failed) and `progress` is
/// the ratio previously computed for the card's todo-summary row, `0.0`
/// when the card was filtered out upstream.
#[must_use]
pub fn map_action(board: &str, action: &Action, project: String, progress: f64) -> ReportRow {
    let done = match action.kind {
        ActionKind::UpdateCheckItemStateOnCard => {
            let name = action
                .data
                .check_item
                .as_ref()
                .map(|item| item.name.as_str())
                .unwrap_or_default();
            format!("{DONE_MARKER} {name}")
        }
        ActionKind::CommentCard => {
            normalize_comment(action.data.text.as_deref().unwrap_or_default())
        }
        ActionKind::Other => String::new(),
    };

    ReportRow {
        board: board.to_string(),
        project,
        item: action.data.card.name.clone(),
        member: action.member_creator.full_name.clone(),
        progress,
        additional_rate: 0.0,
        date: format_date(action.date),
        done,
        todos: String::new(),
    }
}

/// Truncates a timestamp to the 10-character ISO date, `YYYY-MM-DD`.
#[must_use]
pub fn format_date(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d").to_string()
}

/// Sentinel project value substituted when a card's list lookup fails.
#[must_use]
pub fn missing_list_sentinel(card_name: &str) -> String {
    format!("no list found ({card_name})")
}

/// Normalizes comment text to start with a `- ` bullet.
fn normalize_comment(text: &str) -> String {
    if text.starts_with("- ") {
        text.to_string()
    } else {
        format!("- {text}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ActionCard, ActionCheckItem, ActionData, CheckItemState, Member};

    fn ts(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    fn completion_action(date: &str, item_state: CheckItemState) -> Action {
        Action {
            id: "a1".to_string(),
            kind: ActionKind::UpdateCheckItemStateOnCard,
            date: ts(date),
            data: ActionData {
                card: ActionCard {
                    id: "c1".to_string(),
                    name: "Design Review".to_string(),
                },
                check_item: Some(ActionCheckItem {
                    name: "collect feedback".to_string(),
                    state: item_state,
                }),
                text: None,
            },
            member_creator: Member {
                full_name: "Dana Kim".to_string(),
            },
        }
    }

    fn comment_action(text: &str) -> Action {
        Action {
            id: "a2".to_string(),
            kind: ActionKind::CommentCard,
            date: ts("2026-08-03T10:30:00Z"),
            data: ActionData {
                card: ActionCard {
                    id: "c1".to_string(),
                    name: "Design Review".to_string(),
                },
                check_item: None,
                text: Some(text.to_string()),
            },
            member_creator: Member {
                full_name: "Dana Kim".to_string(),
            },
        }
    }

    #[test]
    fn window_excludes_both_boundaries() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 8).unwrap();
        let window = ReportWindow::ending_today(today, 7);

        // Exactly on the start bound: excluded.
        assert!(!window.contains(ts("2026-08-01T00:00:00Z")));
        // Exactly on the end bound: excluded.
        assert!(!window.contains(ts("2026-08-09T00:00:00Z")));
        // Just inside either bound: included.
        assert!(window.contains(ts("2026-08-01T00:00:01Z")));
        assert!(window.contains(ts("2026-08-08T23:59:59Z")));
    }

    #[test]
    fn window_includes_today() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 8).unwrap();
        let window = ReportWindow::ending_today(today, 7);

        assert!(window.contains(ts("2026-08-08T12:00:00Z")));
    }

    #[test]
    fn completion_qualifies_only_when_complete() {
        let complete = completion_action("2026-08-03T10:30:00Z", CheckItemState::Complete);
        let incomplete = completion_action("2026-08-03T10:30:00Z", CheckItemState::Incomplete);

        assert!(qualifies(&complete, false));
        assert!(!qualifies(&incomplete, false));
    }

    #[test]
    fn comments_gated_by_run_flag() {
        let comment = comment_action("waiting on legal");

        assert!(qualifies(&comment, true));
        assert!(!qualifies(&comment, false));
    }

    #[test]
    fn unrecognized_kinds_never_qualify() {
        let mut action = comment_action("whatever");
        action.kind = ActionKind::Other;

        assert!(!qualifies(&action, true));
    }

    #[test]
    fn completion_maps_to_checked_done_text() {
        let action = completion_action("2026-08-03T10:30:00Z", CheckItemState::Complete);
        let row = map_action("Projects", &action, "Platform".to_string(), 0.75);

        assert_eq!(row.board, "Projects");
        assert_eq!(row.project, "Platform");
        assert_eq!(row.item, "Design Review");
        assert_eq!(row.member, "Dana Kim");
        assert_eq!(row.progress, 0.75);
        assert_eq!(row.additional_rate, 0.0);
        assert_eq!(row.date, "2026-08-03");
        assert_eq!(row.done, "✓ collect feedback");
        assert_eq!(row.todos, "");
    }

    #[test]
    fn comment_maps_to_bulleted_done_text() {
        let action = comment_action("waiting on legal");
        let row = map_action("Projects", &action, "Platform".to_string(), 0.0);

        assert_eq!(row.done, "- waiting on legal");
    }

    #[test]
    fn comment_already_bulleted_is_untouched() {
        let action = comment_action("- already a bullet");
        let row = map_action("Projects", &action, "Platform".to_string(), 0.0);

        assert_eq!(row.done, "- already a bullet");
    }

    #[test]
    fn date_is_truncated_to_ten_characters() {
        assert_eq!(format_date(ts("2026-08-03T23:59:59Z")), "2026-08-03");
        assert_eq!(format_date(ts("2026-08-03T23:59:59Z")).len(), 10);
    }

    #[test]
    fn sentinel_names_the_card() {
        assert_eq!(
            missing_list_sentinel("Design Review"),
            "no list found (Design Review)"
        );
    }
}
