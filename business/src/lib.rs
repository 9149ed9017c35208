//! Business layer for the tokenview client.
//!
//! UI code stays "dumb": it reads state, renders, and forwards user actions.
//! Everything with behavior lives here:
//! - wire models for tokens, token change history, and the login payload
//! - column model builders that decide table shape per view
//! - the session bootstrap and token inventory state machines
//! - the `FetchService` seam over HTTP so tests can swap the transport

mod columns;
mod config;
mod error;
mod fetch_service;
mod format;
mod inventory;
mod model;
mod session;

pub use columns::{CellContent, ColumnSpec, ColumnWidth, token_change_columns, token_columns};
pub use config::AppConfig;
pub use error::ApiError;
pub use fetch_service::{EhttpFetcher, FetchService};
pub use format::{format_timestamp, join_scopes, mask_token};
pub use inventory::TokenInventory;
pub use model::{LoginResponse, ServerConfig, TokenChangeRecord, TokenRecord};
pub use session::{FetchPhase, SessionBootstrap, SessionSnapshot};

#[cfg(any(test, feature = "test-utils"))]
pub use fetch_service::{MockFetcher, json_response};
