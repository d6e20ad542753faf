//! Integration tests for the report pipeline against a mocked board API.
//!
//! These tests verify the end-to-end collection behavior: eligibility
//! filtering, progress computation, action classification, per-board error
//! isolation, and the list-lookup sentinel.

use chrono::NaiveDate;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use weekboard_reporter::actions::ReportWindow;
use weekboard_reporter::client::BoardClient;
use weekboard_reporter::config::Config;
use weekboard_reporter::pipeline::{collect, RunOptions};
use weekboard_reporter::progress::ChecklistScope;
use weekboard_reporter::summary::{flat_report, summary_report};

// =============================================================================
// Test Helpers
// =============================================================================

/// Run date all tests pin the window to.
fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 8, 8).unwrap()
}

fn test_options(include_comments: bool) -> RunOptions {
    RunOptions {
        window: ReportWindow::ending_today(today(), 7),
        include_comments,
        scope: ChecklistScope::Union,
        today: today(),
    }
}

fn test_config() -> Config {
    Config {
        api_key: "test-key".to_string(),
        api_token: "test-token".to_string(),
        base_url: String::new(),
        boards: vec!["projects".to_string()],
        exclude_labels: vec!["canceled".to_string(), "pending".to_string(), "done".to_string()],
    }
}

fn test_client(server: &MockServer) -> BoardClient {
    BoardClient::new(server.uri(), "test-key", "test-token").unwrap()
}

/// Mounts the board listing: one selected board, one ignored.
async fn mount_boards(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/members/me/boards"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "b1", "name": "Projects" },
            { "id": "b9", "name": "Archive" }
        ])))
        .mount(server)
        .await;
}

// =============================================================================
// End-to-End Scenarios
// =============================================================================

/// A card with a Main checklist of 4 items (3 complete) and a comment event
/// two days ago yields a todo row with progress 0.75 and a flat comment row
/// carrying the same progress.
#[tokio::test]
async fn design_review_scenario() {
    let server = MockServer::start().await;
    mount_boards(&server).await;

    Mock::given(method("GET"))
        .and(path("/boards/b1/cards"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": "c1",
                "name": "Design Review",
                "idList": "l1",
                "idChecklists": ["k1"],
                "labels": []
            }
        ])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/lists/l1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "id": "l1", "name": "Platform" })),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/cards/c1/members"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{ "fullName": "Dana Kim" }])),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/cards/c1/checklists"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "name": "Main",
                "checkItems": [
                    { "name": "draft proposal", "state": "complete" },
                    { "name": "collect feedback", "state": "complete" },
                    { "name": "revise draft", "state": "complete" },
                    { "name": "publish", "state": "incomplete" }
                ]
            }
        ])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/boards/b1/actions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": "a1",
                "type": "commentCard",
                "date": "2026-08-06T10:00:00.000Z",
                "data": {
                    "card": { "id": "c1", "name": "Design Review" },
                    "text": "looks good so far"
                },
                "memberCreator": { "fullName": "Lee Park" }
            }
        ])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/cards/c1/list"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "id": "l1", "name": "Platform" })),
        )
        .mount(&server)
        .await;

    let data = collect(&test_client(&server), &test_config(), &test_options(true))
        .await
        .unwrap();

    // One container each for the one selected board.
    assert_eq!(data.todos.len(), 1);
    assert_eq!(data.actions.len(), 1);

    let todo = &data.todos[0].rows[0];
    assert_eq!(todo.project, "Platform");
    assert_eq!(todo.item, "Design Review");
    assert_eq!(todo.member, "Dana Kim");
    assert_eq!(todo.progress, 0.75);
    assert_eq!(todo.date, "2026-08-08");
    assert_eq!(todo.todos, "→ publish");

    let action = &data.actions[0].rows[0];
    assert_eq!(action.member, "Lee Park");
    assert_eq!(action.done, "- looks good so far");
    assert_eq!(action.progress, 0.75);
    assert_eq!(action.date, "2026-08-06");

    let flat = flat_report(&data.actions, &data.todos);
    assert_eq!(flat.len(), 2);
}

/// A card without checklists is excluded from the todo pass; an action
/// referencing it falls back to progress 0.0.
#[tokio::test]
async fn zero_checklist_card_is_excluded() {
    let server = MockServer::start().await;
    mount_boards(&server).await;

    Mock::given(method("GET"))
        .and(path("/boards/b1/cards"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": "c2",
                "name": "Quick Fix",
                "idList": "l1",
                "idChecklists": [],
                "labels": []
            }
        ])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/boards/b1/actions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": "a1",
                "type": "updateCheckItemStateOnCard",
                "date": "2026-08-07T09:00:00.000Z",
                "data": {
                    "card": { "id": "c2", "name": "Quick Fix" },
                    "checkItem": { "name": "patch it", "state": "complete" }
                },
                "memberCreator": { "fullName": "Dana Kim" }
            }
        ])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/cards/c2/list"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "id": "l1", "name": "Platform" })),
        )
        .mount(&server)
        .await;

    let data = collect(&test_client(&server), &test_config(), &test_options(false))
        .await
        .unwrap();

    assert!(data.todos[0].rows.is_empty());

    let action = &data.actions[0].rows[0];
    assert_eq!(action.done, "✓ patch it");
    assert_eq!(action.progress, 0.0);
}

/// Events outside the strict window and non-complete transitions are
/// dropped by the classifier.
#[tokio::test]
async fn stale_and_incomplete_actions_are_filtered() {
    let server = MockServer::start().await;
    mount_boards(&server).await;

    Mock::given(method("GET"))
        .and(path("/boards/b1/cards"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/boards/b1/actions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": "a1",
                "type": "updateCheckItemStateOnCard",
                "date": "2026-07-20T09:00:00.000Z",
                "data": {
                    "card": { "id": "c1", "name": "Old Work" },
                    "checkItem": { "name": "ancient", "state": "complete" }
                },
                "memberCreator": { "fullName": "Dana Kim" }
            },
            {
                "id": "a2",
                "type": "updateCheckItemStateOnCard",
                "date": "2026-08-07T09:00:00.000Z",
                "data": {
                    "card": { "id": "c1", "name": "Current Work" },
                    "checkItem": { "name": "unchecked again", "state": "incomplete" }
                },
                "memberCreator": { "fullName": "Dana Kim" }
            }
        ])))
        .mount(&server)
        .await;

    let data = collect(&test_client(&server), &test_config(), &test_options(false))
        .await
        .unwrap();

    assert!(data.actions[0].rows.is_empty());
}

// =============================================================================
// Error Isolation
// =============================================================================

/// A failing card fetch leaves the board's todo half empty without
/// aborting the action pass or the run.
#[tokio::test]
async fn card_fetch_failure_is_isolated_per_board() {
    let server = MockServer::start().await;
    mount_boards(&server).await;

    Mock::given(method("GET"))
        .and(path("/boards/b1/cards"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/boards/b1/actions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": "a1",
                "type": "updateCheckItemStateOnCard",
                "date": "2026-08-07T09:00:00.000Z",
                "data": {
                    "card": { "id": "c1", "name": "Design Review" },
                    "checkItem": { "name": "collect feedback", "state": "complete" }
                },
                "memberCreator": { "fullName": "Dana Kim" }
            }
        ])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/cards/c1/list"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "id": "l1", "name": "Platform" })),
        )
        .mount(&server)
        .await;

    let data = collect(&test_client(&server), &test_config(), &test_options(false))
        .await
        .unwrap();

    // Both halves still contribute a container for the board.
    assert_eq!(data.todos.len(), 1);
    assert!(data.todos[0].rows.is_empty());
    assert_eq!(data.actions[0].rows.len(), 1);
}

/// A failing action fetch leaves the board's action half empty while the
/// todo half survives.
#[tokio::test]
async fn action_fetch_failure_is_isolated_per_board() {
    let server = MockServer::start().await;
    mount_boards(&server).await;

    Mock::given(method("GET"))
        .and(path("/boards/b1/cards"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": "c1",
                "name": "Design Review",
                "idList": "l1",
                "idChecklists": ["k1"],
                "labels": []
            }
        ])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/lists/l1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "id": "l1", "name": "Platform" })),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/cards/c1/members"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/cards/c1/checklists"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "name": "Todo",
                "checkItems": [
                    { "name": "start", "state": "incomplete" }
                ]
            }
        ])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/boards/b1/actions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let data = collect(&test_client(&server), &test_config(), &test_options(false))
        .await
        .unwrap();

    assert_eq!(data.todos[0].rows.len(), 1);
    assert!(data.actions[0].rows.is_empty());

    // The todo-only board still produces a summary group.
    let summary = summary_report(&data.actions, &data.todos);
    assert_eq!(summary.len(), 1);
    assert_eq!(summary[0].rows.len(), 1);
}

/// A failed list lookup degrades the action row's project to the sentinel
/// value instead of crashing the run.
#[tokio::test]
async fn failed_list_lookup_uses_sentinel() {
    let server = MockServer::start().await;
    mount_boards(&server).await;

    Mock::given(method("GET"))
        .and(path("/boards/b1/cards"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/boards/b1/actions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": "a1",
                "type": "updateCheckItemStateOnCard",
                "date": "2026-08-07T09:00:00.000Z",
                "data": {
                    "card": { "id": "c1", "name": "Orphan Card" },
                    "checkItem": { "name": "finish", "state": "complete" }
                },
                "memberCreator": { "fullName": "Dana Kim" }
            }
        ])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/cards/c1/list"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .mount(&server)
        .await;

    let data = collect(&test_client(&server), &test_config(), &test_options(false))
        .await
        .unwrap();

    let action = &data.actions[0].rows[0];
    assert_eq!(action.project, "no list found (Orphan Card)");
}

/// Cards in a "how to use" list never contribute todo rows.
#[tokio::test]
async fn how_to_use_lists_are_skipped() {
    let server = MockServer::start().await;
    mount_boards(&server).await;

    Mock::given(method("GET"))
        .and(path("/boards/b1/cards"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": "c1",
                "name": "Welcome",
                "idList": "l1",
                "idChecklists": ["k1"],
                "labels": []
            }
        ])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/lists/l1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            json!({ "id": "l1", "name": "How to use this board" }),
        ))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/boards/b1/actions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let data = collect(&test_client(&server), &test_config(), &test_options(false))
        .await
        .unwrap();

    assert!(data.todos[0].rows.is_empty());
}
