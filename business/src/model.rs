//! Wire types for the token service.
//!
//! Timestamps travel as epoch seconds, matching the service's v1 API. Optional
//! fields on change records are present only when that attribute changed in
//! the recorded event; absence means "unchanged", not "empty".

use chrono::serde::{ts_seconds, ts_seconds_option};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One token owned by the signed-in user. Identity is the `token` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    pub token: String,
    #[serde(default)]
    pub token_name: Option<String>,
    #[serde(default)]
    pub scopes: Vec<String>,
    #[serde(with = "ts_seconds")]
    pub created: DateTime<Utc>,
    #[serde(default, with = "ts_seconds_option")]
    pub expires: Option<DateTime<Utc>>,
}

/// One audit entry describing a historical mutation to a token.
///
/// The server returns these ordered by `event_time` descending; they are
/// rendered exactly in that order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenChangeRecord {
    #[serde(with = "ts_seconds")]
    pub event_time: DateTime<Utc>,
    pub action: String,
    pub actor: String,
    pub ip_address: String,
    pub token: String,
    #[serde(default)]
    pub token_name: Option<String>,
    #[serde(default)]
    pub old_token_name: Option<String>,
    #[serde(default)]
    pub scopes: Option<Vec<String>>,
    #[serde(default)]
    pub old_scopes: Option<Vec<String>>,
    #[serde(default, with = "ts_seconds_option")]
    pub expires: Option<DateTime<Utc>>,
    #[serde(default, with = "ts_seconds_option")]
    pub old_expires: Option<DateTime<Utc>>,
}

/// Server-supplied configuration delivered with the login payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Scopes the server will accept on new tokens.
    #[serde(default)]
    pub scopes: Vec<String>,
}

/// Body of `GET /login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub csrf: String,
    pub username: String,
    #[serde(default)]
    pub scopes: Vec<String>,
    #[serde(default)]
    pub config: ServerConfig,
}
