//! Token inventory: the signed-in user's token list and change history, plus
//! token deletion. Same discipline as the session bootstrap — every network
//! call delivers through a channel the frame loop polls, and dropping the
//! inventory silently discards late responses.

use std::sync::Arc;

use log::{info, warn};

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::fetch_service::FetchService;
use crate::model::{TokenChangeRecord, TokenRecord};
use crate::session::FetchPhase;

type FetchResult<T> = Result<T, ApiError>;

/// Header echoing the session CSRF token on state-changing requests.
const CSRF_HEADER: &str = "X-CSRF-Token";

#[derive(Debug)]
pub struct TokenInventory {
    fetcher: Arc<dyn FetchService>,

    pub tokens: Vec<TokenRecord>,
    tokens_phase: FetchPhase,
    pending_tokens: Option<flume::Receiver<FetchResult<Vec<TokenRecord>>>>,

    pub history: Vec<TokenChangeRecord>,
    history_phase: FetchPhase,
    pending_history: Option<flume::Receiver<FetchResult<Vec<TokenChangeRecord>>>>,

    // Deletes can overlap (one per clicked row), so every in-flight delete
    // keeps its own receiver until poll drains it.
    pending_deletes: Vec<flume::Receiver<(String, FetchResult<()>)>>,
}

impl TokenInventory {
    pub fn new(fetcher: Arc<dyn FetchService>) -> Self {
        Self {
            fetcher,
            tokens: Vec::new(),
            tokens_phase: FetchPhase::Idle,
            pending_tokens: None,
            history: Vec::new(),
            history_phase: FetchPhase::Idle,
            pending_history: None,
            pending_deletes: Vec::new(),
        }
    }

    pub fn tokens_phase(&self) -> FetchPhase {
        self.tokens_phase
    }

    pub fn history_phase(&self) -> FetchPhase {
        self.history_phase
    }

    /// True while any request is in flight and the frame loop should keep
    /// polling.
    pub fn busy(&self) -> bool {
        self.pending_tokens.is_some()
            || self.pending_history.is_some()
            || !self.pending_deletes.is_empty()
    }

    /// Fetches the user's token list. A refresh while one is already in
    /// flight is dropped rather than queued.
    pub fn refresh(&mut self, config: &AppConfig, username: &str) {
        if self.pending_tokens.is_some() {
            return;
        }
        self.tokens_phase = FetchPhase::Fetching;

        let url = format!("{}/users/{username}/tokens", config.api_url());
        info!("token inventory: GET {url}");

        let (tx, rx) = flume::bounded(1);
        self.pending_tokens = Some(rx);
        self.fetcher.fetch(
            ehttp::Request::get(&url),
            Box::new(move |result| {
                let _ = tx.send(decode_list(result));
            }),
        );
    }

    /// Fetches the user's token change history (server-ordered, newest
    /// first; rendered exactly as delivered).
    pub fn load_history(&mut self, config: &AppConfig, username: &str) {
        if self.pending_history.is_some() {
            return;
        }
        self.history_phase = FetchPhase::Fetching;

        let url = format!("{}/users/{username}/token-change-history", config.api_url());
        info!("token inventory: GET {url}");

        let (tx, rx) = flume::bounded(1);
        self.pending_history = Some(rx);
        self.fetcher.fetch(
            ehttp::Request::get(&url),
            Box::new(move |result| {
                let _ = tx.send(decode_list(result));
            }),
        );
    }

    /// Deletes one token, echoing the session CSRF token. The caller owns
    /// confirmation; this issues the request immediately.
    pub fn delete(&mut self, config: &AppConfig, username: &str, key: &str, csrf: &str) {
        let url = format!("{}/users/{username}/tokens/{key}", config.api_url());
        info!("token inventory: DELETE {url}");

        let (tx, rx) = flume::bounded(1);
        self.pending_deletes.push(rx);

        let request = ehttp::Request {
            method: "DELETE".to_string(),
            url,
            body: Vec::new(),
            headers: ehttp::Headers::new(&[(CSRF_HEADER, csrf)]),
        };
        let key = key.to_string();
        self.fetcher.fetch(
            request,
            Box::new(move |result| {
                let outcome = decode_empty(result);
                let _ = tx.send((key, outcome));
            }),
        );
    }

    /// Drains any resolved requests. Failures go to `on_error`; a confirmed
    /// delete drops the row from the local list.
    ///
    /// A disconnected channel means the transport dropped the callback
    /// without answering; that request fails instead of staying pending (and
    /// keeping `busy` true) forever.
    pub fn poll(&mut self, on_error: &mut dyn FnMut(&ApiError)) {
        if let Some(rx) = self.pending_tokens.take() {
            match rx.try_recv() {
                Ok(Ok(tokens)) => {
                    self.tokens = tokens;
                    self.tokens_phase = FetchPhase::Ready;
                }
                Ok(Err(err)) => {
                    self.tokens_phase = FetchPhase::Failed;
                    warn!("token list fetch failed: {err}");
                    on_error(&err);
                }
                Err(flume::TryRecvError::Empty) => self.pending_tokens = Some(rx),
                Err(flume::TryRecvError::Disconnected) => {
                    self.tokens_phase = FetchPhase::Failed;
                    let err = abandoned();
                    warn!("token list fetch abandoned: {err}");
                    on_error(&err);
                }
            }
        }

        if let Some(rx) = self.pending_history.take() {
            match rx.try_recv() {
                Ok(Ok(history)) => {
                    self.history = history;
                    self.history_phase = FetchPhase::Ready;
                }
                Ok(Err(err)) => {
                    self.history_phase = FetchPhase::Failed;
                    warn!("change history fetch failed: {err}");
                    on_error(&err);
                }
                Err(flume::TryRecvError::Empty) => self.pending_history = Some(rx),
                Err(flume::TryRecvError::Disconnected) => {
                    self.history_phase = FetchPhase::Failed;
                    let err = abandoned();
                    warn!("change history fetch abandoned: {err}");
                    on_error(&err);
                }
            }
        }

        let mut still_pending = Vec::new();
        for rx in self.pending_deletes.drain(..) {
            match rx.try_recv() {
                Ok((key, Ok(()))) => {
                    self.tokens.retain(|t| t.token != key);
                    info!("token {key} deleted");
                }
                Ok((_, Err(err))) => {
                    warn!("token delete failed: {err}");
                    on_error(&err);
                }
                Err(flume::TryRecvError::Empty) => still_pending.push(rx),
                Err(flume::TryRecvError::Disconnected) => {
                    let err = abandoned();
                    warn!("token delete abandoned: {err}");
                    on_error(&err);
                }
            }
        }
        self.pending_deletes = still_pending;
    }
}

fn abandoned() -> ApiError {
    ApiError::Transport("no response delivered".to_string())
}

fn decode_list<T: serde::de::DeserializeOwned>(
    result: ehttp::Result<ehttp::Response>,
) -> FetchResult<Vec<T>> {
    let response = result.map_err(ApiError::Transport)?;
    if !response.ok {
        return Err(ApiError::Status(response.status));
    }
    serde_json::from_slice(&response.bytes).map_err(ApiError::decode)
}

fn decode_empty(result: ehttp::Result<ehttp::Response>) -> FetchResult<()> {
    let response = result.map_err(ApiError::Transport)?;
    if !response.ok {
        return Err(ApiError::Status(response.status));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch_service::{MockFetcher, json_response};

    fn config() -> AppConfig {
        AppConfig::new("http://example.test")
    }

    fn token_body() -> serde_json::Value {
        serde_json::json!([
            {
                "token": "gt-one",
                "token_name": "laptop",
                "scopes": ["read:all"],
                "created": 1_700_000_000,
            },
            {
                "token": "gt-two",
                "scopes": [],
                "created": 1_700_100_000,
                "expires": 1_731_536_000,
            },
        ])
    }

    #[test]
    fn refresh_loads_token_list() {
        let fetcher = Arc::new(MockFetcher::with_response(Ok(json_response(
            200,
            &token_body(),
        ))));
        let mut inventory = TokenInventory::new(fetcher.clone());

        inventory.refresh(&config(), "alice");
        assert_eq!(inventory.tokens_phase(), FetchPhase::Fetching);

        inventory.poll(&mut |_| panic!("unexpected error"));
        assert_eq!(inventory.tokens_phase(), FetchPhase::Ready);
        assert_eq!(inventory.tokens.len(), 2);
        assert_eq!(inventory.tokens[0].token, "gt-one");

        assert_eq!(
            fetcher.requests(),
            [(
                "GET".to_string(),
                "http://example.test/auth/api/v1/users/alice/tokens".to_string()
            )]
        );
    }

    #[test]
    fn history_failure_reports_and_keeps_rows_empty() {
        let fetcher = Arc::new(MockFetcher::with_response(Ok(json_response(
            403,
            &serde_json::json!({"detail": "forbidden"}),
        ))));
        let mut inventory = TokenInventory::new(fetcher);

        inventory.load_history(&config(), "alice");
        let mut errors = Vec::new();
        inventory.poll(&mut |err| errors.push(err.clone()));

        assert_eq!(errors, [ApiError::Status(403)]);
        assert_eq!(inventory.history_phase(), FetchPhase::Failed);
        assert!(inventory.history.is_empty());
    }

    #[test]
    fn delete_sends_csrf_and_drops_the_row() {
        let fetcher = Arc::new(MockFetcher::with_responses([
            Ok(json_response(200, &token_body())),
            Ok(json_response(204, &serde_json::json!(null))),
        ]));
        let mut inventory = TokenInventory::new(fetcher.clone());

        inventory.refresh(&config(), "alice");
        inventory.poll(&mut |_| {});
        assert_eq!(inventory.tokens.len(), 2);

        inventory.delete(&config(), "alice", "gt-one", "csrf-abc");
        inventory.poll(&mut |_| panic!("unexpected error"));

        assert_eq!(inventory.tokens.len(), 1);
        assert_eq!(inventory.tokens[0].token, "gt-two");
        assert_eq!(
            fetcher.requests().last().unwrap(),
            &(
                "DELETE".to_string(),
                "http://example.test/auth/api/v1/users/alice/tokens/gt-one".to_string()
            )
        );
        assert_eq!(
            fetcher.last_request_header(CSRF_HEADER).as_deref(),
            Some("csrf-abc")
        );
    }

    #[test]
    fn delete_failure_keeps_the_row() {
        let fetcher = Arc::new(MockFetcher::with_responses([
            Ok(json_response(200, &token_body())),
            Err("connection reset".to_string()),
        ]));
        let mut inventory = TokenInventory::new(fetcher);

        inventory.refresh(&config(), "alice");
        inventory.poll(&mut |_| {});

        inventory.delete(&config(), "alice", "gt-one", "csrf-abc");
        let mut errors = Vec::new();
        inventory.poll(&mut |err| errors.push(err.clone()));

        assert_eq!(errors.len(), 1);
        assert_eq!(inventory.tokens.len(), 2);
    }

    #[test]
    fn overlapping_deletes_resolve_independently() {
        let fetcher = Arc::new(MockFetcher::holding());
        let mut inventory = TokenInventory::new(fetcher.clone());
        inventory.tokens = serde_json::from_value(token_body()).unwrap();

        inventory.delete(&config(), "alice", "gt-one", "csrf-abc");
        inventory.delete(&config(), "alice", "gt-two", "csrf-abc");
        assert!(inventory.busy());

        // Oldest first: gt-one's request fails, gt-two's is confirmed.
        assert!(fetcher.deliver_next(Err("connection reset".to_string())));
        assert!(fetcher.deliver_next(Ok(json_response(204, &serde_json::json!(null)))));

        let mut errors = Vec::new();
        inventory.poll(&mut |err| errors.push(err.clone()));

        // Neither outcome is lost: the failure surfaces, the confirmed
        // delete drops its row, and the failed one keeps its row.
        assert_eq!(errors, [ApiError::Transport("connection reset".into())]);
        assert_eq!(inventory.tokens.len(), 1);
        assert_eq!(inventory.tokens[0].token, "gt-one");
        assert!(!inventory.busy());
    }

    #[test]
    fn abandoned_fetch_fails_instead_of_pending_forever() {
        let fetcher = Arc::new(MockFetcher::holding());
        let mut inventory = TokenInventory::new(fetcher.clone());

        inventory.refresh(&config(), "alice");
        assert!(fetcher.abandon_next());

        let mut errors = Vec::new();
        inventory.poll(&mut |err| errors.push(err.clone()));

        assert_eq!(errors.len(), 1);
        assert_eq!(inventory.tokens_phase(), FetchPhase::Failed);
        assert!(!inventory.busy());
    }

    #[test]
    fn refresh_while_in_flight_is_dropped() {
        let fetcher = Arc::new(MockFetcher::holding());
        let mut inventory = TokenInventory::new(fetcher.clone());

        inventory.refresh(&config(), "alice");
        inventory.refresh(&config(), "alice");
        assert_eq!(fetcher.requests().len(), 1);
    }

    #[test]
    fn response_after_drop_is_discarded() {
        let fetcher = Arc::new(MockFetcher::holding());
        let mut inventory = TokenInventory::new(fetcher.clone());
        inventory.refresh(&config(), "alice");

        drop(inventory);
        assert!(fetcher.deliver_next(Ok(json_response(200, &token_body()))));
    }
}
