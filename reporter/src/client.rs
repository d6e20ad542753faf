//! Board service client for the weekboard reporter.
//!
//! This module provides a read-only client for the project-management REST
//! API: board listing, card listing, checklist and membership lookups, list
//! lookups, and the board action feed.
//!
//! # Architecture
//!
//! [`BoardClient`] wraps a pooled `reqwest::Client` with a fixed request
//! timeout and authenticates every request with static `key`/`token` query
//! parameters. Failures are mapped into [`ClientError`] so callers can
//! distinguish timeouts and connection failures from malformed responses.
//! The client never retries; error recovery is the pipeline's job.
//!
//! # Example
//!
//! ```rust,ignore
//! use weekboard_reporter::client::BoardClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = BoardClient::new("https://api.trello.com/1", "key", "token")?;
//!
//!     for board in client.member_boards().await? {
//!         println!("{} ({})", board.name, board.id);
//!     }
//!
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::types::{Action, Board, Card, Checklist, ListInfo, Member};

/// Timeout applied to every API request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors that can occur when talking to the board service.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The supplied credentials were rejected.
    #[error("unauthorized: invalid API key or token")]
    Unauthorized,

    /// The request timed out.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The service is unreachable.
    #[error("board service unavailable: {0}")]
    Unavailable(String),

    /// The service answered with an unexpected status or body.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Client configuration error, such as an invalid base URL.
    #[error("client configuration error: {0}")]
    Configuration(String),
}

/// Read-only client for the board service API.
///
/// The underlying `reqwest::Client` pools connections and is cheap to clone.
#[derive(Debug, Clone)]
pub struct BoardClient {
    http_client: Client,
    base_url: String,
    api_key: String,
    api_token: String,
}

impl BoardClient {
    /// Creates a new board service client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - API base URL (e.g., `https://api.trello.com/1`)
    /// * `api_key` - static API key
    /// * `api_token` - static API token
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Configuration`] if the HTTP client cannot be
    /// created.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        api_token: impl Into<String>,
    ) -> Result<Self, ClientError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        let http_client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| {
                ClientError::Configuration(format!("failed to create HTTP client: {e}"))
            })?;

        Ok(Self {
            http_client,
            base_url,
            api_key: api_key.into(),
            api_token: api_token.into(),
        })
    }

    /// Lists all boards visible to the credentials.
    pub async fn member_boards(&self) -> Result<Vec<Board>, ClientError> {
        self.get_json("/members/me/boards", &[("fields", "name,url")])
            .await
    }

    /// Lists a board's open cards.
    pub async fn board_cards(&self, board_id: &str) -> Result<Vec<Card>, ClientError> {
        self.get_json(&format!("/boards/{board_id}/cards"), &[("filter", "open")])
            .await
    }

    /// Fetches a board's action feed, filtered server-side to the given
    /// comma-separated action types.
    pub async fn board_actions(
        &self,
        board_id: &str,
        action_types: &str,
    ) -> Result<Vec<Action>, ClientError> {
        self.get_json(
            &format!("/boards/{board_id}/actions"),
            &[("filter", action_types)],
        )
        .await
    }

    /// Fetches a card's checklists with their check items.
    pub async fn card_checklists(&self, card_id: &str) -> Result<Vec<Checklist>, ClientError> {
        self.get_json(&format!("/cards/{card_id}/checklists"), &[])
            .await
    }

    /// Fetches the members assigned to a card.
    pub async fn card_members(&self, card_id: &str) -> Result<Vec<Member>, ClientError> {
        self.get_json(&format!("/cards/{card_id}/members"), &[])
            .await
    }

    /// Resolves the list currently containing a card.
    ///
    /// This is a point-in-time lookup at report-generation time, not the
    /// list at event time.
    pub async fn card_list(&self, card_id: &str) -> Result<ListInfo, ClientError> {
        self.get_json(&format!("/cards/{card_id}/list"), &[]).await
    }

    /// Fetches a list by its identifier.
    pub async fn list(&self, list_id: &str) -> Result<ListInfo, ClientError> {
        self.get_json(&format!("/lists/{list_id}"), &[]).await
    }

    /// Issues an authenticated GET request and decodes the JSON response.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ClientError> {
        let url = format!("{}{}", self.base_url, path);

        debug!(url = %url, "Fetching from board service");

        let response = self
            .http_client
            .get(&url)
            .query(query)
            .query(&[("key", &self.api_key), ("token", &self.api_token)])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ClientError::Timeout(REQUEST_TIMEOUT)
                } else if e.is_connect() {
                    ClientError::Unavailable(format!("connection failed: {e}"))
                } else {
                    ClientError::Unavailable(format!("request failed: {e}"))
                }
            })?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ClientError::Unauthorized);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::InvalidResponse(format!(
                "unexpected status {status}: {body}"
            )));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::InvalidResponse(format!("failed to decode response: {e}")))
    }
}
