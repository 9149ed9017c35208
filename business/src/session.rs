//! Session bootstrap: one fetch of `/login` per mounted instance, resolving
//! into the four pieces of session state every protected view depends on.

use std::sync::Arc;

use log::{info, warn};

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::fetch_service::FetchService;
use crate::model::{LoginResponse, ServerConfig};

/// Lifecycle of the bootstrap fetch.
///
/// `Fetching` is entered once, from `Idle`; both `Ready` and `Failed` are
/// terminal for the instance's lifetime. There is no retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchPhase {
    #[default]
    Idle,
    Fetching,
    Ready,
    Failed,
}

/// The session fields consumers read.
///
/// All four transition together: until the fetch resolves successfully they
/// all hold their defaults, and a consumer can never observe a partially
/// populated session.
#[derive(Debug, Clone, Default)]
pub struct SessionSnapshot {
    pub csrf: Option<String>,
    pub username: Option<String>,
    pub user_scopes: Vec<String>,
    pub config: ServerConfig,
}

type LoginResult = Result<LoginResponse, ApiError>;

/// Drives the `/login` fetch and owns the resulting snapshot.
///
/// The fetch callback delivers through a bounded channel that `poll` drains
/// each frame. Dropping the bootstrap drops the receiver, so a response that
/// arrives after the owner is gone is discarded by the failed `send` — no
/// state is ever mutated behind a dropped instance.
#[derive(Debug)]
pub struct SessionBootstrap {
    fetcher: Arc<dyn FetchService>,
    phase: FetchPhase,
    snapshot: SessionSnapshot,
    pending: Option<flume::Receiver<LoginResult>>,
}

impl SessionBootstrap {
    pub fn new(fetcher: Arc<dyn FetchService>) -> Self {
        Self {
            fetcher,
            phase: FetchPhase::default(),
            snapshot: SessionSnapshot::default(),
            pending: None,
        }
    }

    pub fn phase(&self) -> FetchPhase {
        self.phase
    }

    pub fn snapshot(&self) -> &SessionSnapshot {
        &self.snapshot
    }

    pub fn username(&self) -> Option<&str> {
        self.snapshot.username.as_deref()
    }

    pub fn csrf(&self) -> Option<&str> {
        self.snapshot.csrf.as_deref()
    }

    /// Issues the login fetch. Only the first call does anything; the fetch
    /// is never re-issued for the lifetime of this instance, however often
    /// the frame loop calls this.
    pub fn start(&mut self, config: &AppConfig) {
        if self.phase != FetchPhase::Idle {
            return;
        }
        self.phase = FetchPhase::Fetching;

        let url = format!("{}/login", config.api_url());
        info!("session bootstrap: GET {url}");

        let (tx, rx) = flume::bounded(1);
        self.pending = Some(rx);

        let request = ehttp::Request::get(&url);
        self.fetcher.fetch(
            request,
            Box::new(move |result| {
                let outcome = decode_login(result);
                // Receiver gone means the owner was dropped mid-flight; the
                // late response must be ignored, not applied.
                let _ = tx.send(outcome);
            }),
        );
    }

    /// Drains a resolved fetch, if any. On success all four session fields
    /// become visible in the same call; on failure `on_error` fires exactly
    /// once and the snapshot stays at its defaults.
    ///
    /// Returns true on the poll that transitions to `Ready`.
    pub fn poll(&mut self, on_error: &mut dyn FnMut(&ApiError)) -> bool {
        let Some(rx) = &self.pending else {
            return false;
        };
        let outcome = match rx.try_recv() {
            Ok(outcome) => outcome,
            Err(flume::TryRecvError::Empty) => return false,
            // Transport dropped the callback without answering; fail instead
            // of staying pending (and keeping `busy` true) forever.
            Err(flume::TryRecvError::Disconnected) => {
                Err(ApiError::Transport("no response delivered".to_string()))
            }
        };
        self.pending = None;

        match outcome {
            Ok(login) => {
                self.snapshot = SessionSnapshot {
                    csrf: Some(login.csrf),
                    username: Some(login.username),
                    user_scopes: login.scopes,
                    config: login.config,
                };
                self.phase = FetchPhase::Ready;
                info!(
                    "session ready for {}",
                    self.snapshot.username.as_deref().unwrap_or_default()
                );
                true
            }
            Err(err) => {
                self.phase = FetchPhase::Failed;
                warn!("session bootstrap failed: {err}");
                on_error(&err);
                false
            }
        }
    }

    /// True while a fetch is in flight and the frame loop should keep
    /// polling.
    pub fn busy(&self) -> bool {
        self.pending.is_some()
    }
}

fn decode_login(result: ehttp::Result<ehttp::Response>) -> LoginResult {
    let response = result.map_err(ApiError::Transport)?;
    if !response.ok {
        return Err(ApiError::Status(response.status));
    }
    serde_json::from_slice(&response.bytes).map_err(ApiError::decode)
}
