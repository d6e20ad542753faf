//! Per-board report collection.
//!
//! For each selected board the pipeline runs two passes: the *todo* pass
//! (one summary row per eligible card, from its checklists and members) and
//! the *action* pass (one row per qualifying activity event). A fetch
//! failure in either pass is logged and that board contributes an empty
//! half; a failure inside a single card's sub-fetches aborts that board's
//! todo pass and is caught at the board level.
//!
//! Card sub-fetches fan out with a small bounded concurrency; the fan-out
//! preserves card order and every view is sorted after all fetches
//! complete, so concurrency never changes output order.

use std::collections::HashMap;

use chrono::NaiveDate;
use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use crate::actions::{map_action, missing_list_sentinel, qualifies, ReportWindow};
use crate::client::{BoardClient, ClientError};
use crate::config::Config;
use crate::progress::{select_items, ChecklistProgress, ChecklistScope};
use crate::todos::outstanding;
use crate::types::{Board, BoardRows, Card, ReportRow};

/// Cards whose sub-fetches run concurrently within one board.
const CARD_FETCH_CONCURRENCY: usize = 4;

/// Lists with this name prefix hold usage notes, not work items.
const NON_WORK_LIST_PREFIX: &str = "how to use";

/// Action type requested for checklist completions.
const COMPLETION_ACTION_TYPE: &str = "updateCheckItemStateOnCard";

/// Action types requested when comments are included.
const COMPLETION_AND_COMMENT_TYPES: &str = "updateCheckItemStateOnCard,commentCard";

/// Options for one report run.
#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    /// Date window for the action pass.
    pub window: ReportWindow,

    /// Whether card comments contribute report rows.
    pub include_comments: bool,

    /// Checklist-selection policy for progress and todos.
    pub scope: ChecklistScope,

    /// Run date, stamped onto todo-summary rows.
    pub today: NaiveDate,
}

/// The collected per-board row sets for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportData {
    /// Action rows, one container per selected board.
    pub actions: Vec<BoardRows>,

    /// Todo-summary rows, one container per selected board.
    pub todos: Vec<BoardRows>,
}

/// Fetches and classifies everything the report needs.
///
/// # Errors
///
/// Returns a [`ClientError`] only when the initial board listing fails;
/// all later failures are isolated per board.
pub async fn collect(
    client: &BoardClient,
    config: &Config,
    opts: &RunOptions,
) -> Result<ReportData, ClientError> {
    let boards = client.member_boards().await?;
    let selected: Vec<Board> = boards
        .into_iter()
        .filter(|b| config.board_selected(&b.name))
        .collect();

    info!(
        boards = ?selected.iter().map(|b| b.name.as_str()).collect::<Vec<_>>(),
        "Selected boards"
    );

    let mut actions = Vec::new();
    let mut todos = Vec::new();

    for board in &selected {
        let todo_rows = match board_todo_rows(client, config, board, opts).await {
            Ok(rows) => rows,
            Err(e) => {
                warn!(board = %board.name, error = %e, "Todo pass failed, continuing with empty set");
                Vec::new()
            }
        };

        let action_rows = match board_action_rows(client, board, &todo_rows, opts).await {
            Ok(rows) => rows,
            Err(e) => {
                warn!(board = %board.name, error = %e, "Action pass failed, continuing with empty set");
                Vec::new()
            }
        };

        actions.push(BoardRows {
            board: board.name.clone(),
            rows: action_rows,
        });
        todos.push(BoardRows {
            board: board.name.clone(),
            rows: todo_rows,
        });
    }

    Ok(ReportData { actions, todos })
}

/// Runs the todo pass for one board: one summary row per eligible card.
async fn board_todo_rows(
    client: &BoardClient,
    config: &Config,
    board: &Board,
    opts: &RunOptions,
) -> Result<Vec<ReportRow>, ClientError> {
    let cards = client.board_cards(&board.id).await?;
    info!(board = %board.name, cards = cards.len(), "Fetched open cards");

    let eligible: Vec<Card> = cards
        .into_iter()
        .filter(|card| card_eligible(card, config))
        .collect();

    let results: Vec<Result<Option<ReportRow>, ClientError>> = stream::iter(eligible)
        .map(|card| card_todo_row(client, &board.name, card, opts))
        .buffered(CARD_FETCH_CONCURRENCY)
        .collect()
        .await;

    let mut rows = Vec::new();
    for result in results {
        if let Some(row) = result? {
            rows.push(row);
        }
    }
    Ok(rows)
}

/// Card-level eligibility: must carry checklists and no excluded label.
fn card_eligible(card: &Card, config: &Config) -> bool {
    if card.id_checklists.is_empty() {
        debug!(card = %card.name, "Skipping card without checklists");
        return false;
    }
    if card.labels.iter().any(|l| config.label_excluded(&l.name)) {
        debug!(card = %card.name, "Skipping card with excluded label");
        return false;
    }
    true
}

/// Builds one todo-summary row for a card, or `None` when its list is a
/// non-work list.
async fn card_todo_row(
    client: &BoardClient,
    board_name: &str,
    card: Card,
    opts: &RunOptions,
) -> Result<Option<ReportRow>, ClientError> {
    let list = client.list(&card.id_list).await?;
    if list.name.to_lowercase().starts_with(NON_WORK_LIST_PREFIX) {
        return Ok(None);
    }

    let members = client.card_members(&card.id).await?;
    let checklists = client.card_checklists(&card.id).await?;

    let items = select_items(&checklists, opts.scope);
    let progress = ChecklistProgress::compute(&items);

    debug!(
        card = %card.name,
        completed = progress.completed,
        total = progress.total,
        additional = progress.additional,
        "Card progress"
    );

    let member = members
        .iter()
        .map(|m| m.full_name.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    Ok(Some(ReportRow {
        board: board_name.to_string(),
        project: list.name,
        item: card.name,
        member,
        progress: progress.progress,
        additional_rate: progress.additional_rate,
        date: opts.today.format("%Y-%m-%d").to_string(),
        done: String::new(),
        todos: outstanding(&items),
    }))
}

/// Runs the action pass for one board: one row per qualifying event.
///
/// List names are resolved through a per-board cache so a card referenced
/// by many events is looked up once; a failed lookup is cached too and
/// degrades to the sentinel project value.
async fn board_action_rows(
    client: &BoardClient,
    board: &Board,
    todo_rows: &[ReportRow],
    opts: &RunOptions,
) -> Result<Vec<ReportRow>, ClientError> {
    let action_types = if opts.include_comments {
        COMPLETION_AND_COMMENT_TYPES
    } else {
        COMPLETION_ACTION_TYPE
    };

    let feed = client.board_actions(&board.id, action_types).await?;
    info!(board = %board.name, actions = feed.len(), "Fetched action feed");

    let progress_by_item: HashMap<&str, f64> = todo_rows
        .iter()
        .map(|row| (row.item.as_str(), row.progress))
        .collect();

    let mut list_names: HashMap<String, Option<String>> = HashMap::new();
    let mut rows = Vec::new();

    for action in feed
        .iter()
        .filter(|a| opts.window.contains(a.date))
        .filter(|a| qualifies(a, opts.include_comments))
    {
        let card = &action.data.card;
        debug!(card = %card.name, kind = ?action.kind, "Mapping action");

        let resolved = match list_names.get(&card.id) {
            Some(cached) => cached.clone(),
            None => {
                let resolved = match client.card_list(&card.id).await {
                    Ok(list) => Some(list.name),
                    Err(e) => {
                        warn!(card = %card.name, error = %e, "List lookup failed, using sentinel");
                        None
                    }
                };
                list_names.insert(card.id.clone(), resolved.clone());
                resolved
            }
        };
        let project = resolved.unwrap_or_else(|| missing_list_sentinel(&card.name));

        let progress = progress_by_item
            .get(card.name.as_str())
            .copied()
            .unwrap_or(0.0);

        rows.push(map_action(&board.name, action, project, progress));
    }

    Ok(rows)
}
