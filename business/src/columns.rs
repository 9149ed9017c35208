//! Column model builders for the token and token-change tables.
//!
//! A table's shape is an ordered `Vec<ColumnSpec<R>>`; order is part of the
//! contract (identity columns first, metadata last). Optional columns are
//! spliced at named positions inside the sequence, never appended, and the
//! delete action column on the token table is always the terminal column.
//!
//! Builders are total: flags are plain bools and every accessor is a total
//! function of its row.

use chrono::{DateTime, Utc};

use crate::format::{format_timestamp, join_scopes, mask_token};
use crate::model::{TokenChangeRecord, TokenRecord};

/// What a cell accessor produced. The UI decides how each variant is drawn;
/// `display` gives the plain-text reading used for everything but the delete
/// control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellContent {
    /// Nothing to show. Distinct from `Text("")` only in intent: an absent
    /// optional field on a change record renders as this.
    Empty,
    Text(String),
    /// An opaque token value, masked when displayed.
    Token(String),
    Timestamp {
        at: Option<DateTime<Utc>>,
        /// Missing expirations read "never"; other missing timestamps read
        /// as empty.
        expiration: bool,
    },
    /// The row-level delete control, carrying the row's token identifier.
    Delete { token: String },
}

impl CellContent {
    /// Plain-text rendering of the cell. The delete control has no text; the
    /// UI draws it as a button.
    pub fn display(&self, now: DateTime<Utc>) -> String {
        match self {
            Self::Empty | Self::Delete { .. } => String::new(),
            Self::Text(text) => text.clone(),
            Self::Token(token) => mask_token(token),
            Self::Timestamp { at, expiration } => format_timestamp(*at, now, *expiration),
        }
    }
}

/// Layout hint for one column; mapped onto `egui_extras::Column` by the UI.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColumnWidth {
    Exact(f32),
    /// Flexible column that takes leftover width, never narrower than `min`.
    Remainder { min: f32 },
}

/// One column of a table: header label, layout hint, and the accessor that
/// turns a row into cell content.
#[derive(Debug, Clone)]
pub struct ColumnSpec<R> {
    pub header: &'static str,
    pub width: ColumnWidth,
    pub cell: fn(&R) -> CellContent,
}

impl<R> ColumnSpec<R> {
    fn new(header: &'static str, width: ColumnWidth, cell: fn(&R) -> CellContent) -> Self {
        Self {
            header,
            width,
            cell,
        }
    }
}

fn scope_cell(scopes: Option<&[String]>) -> CellContent {
    // None means the event did not touch scopes; Some(&[]) means it cleared
    // them. Both read as empty text, but only None maps to Empty.
    match scopes {
        None => CellContent::Empty,
        Some(scopes) => CellContent::Text(join_scopes(scopes)),
    }
}

/// Columns for the token table.
///
/// Shape: `[Name?] Token Scopes Created Expires [delete]`. The optional Name
/// column is spliced at the head of the sequence; the delete column is always
/// last and its cell carries the row's token identifier for the caller's
/// delete callback.
pub fn token_columns(include_name: bool) -> Vec<ColumnSpec<TokenRecord>> {
    // Closure parameters are annotated: the accessors read row fields before
    // inference can pin `R` from the collection they land in.
    let mut columns: Vec<ColumnSpec<TokenRecord>> = Vec::with_capacity(6);
    if include_name {
        columns.push(ColumnSpec::new(
            "Name",
            ColumnWidth::Remainder { min: 90.0 },
            |row: &TokenRecord| match &row.token_name {
                Some(name) => CellContent::Text(name.clone()),
                None => CellContent::Empty,
            },
        ));
    }
    columns.extend([
        ColumnSpec::new("Token", ColumnWidth::Exact(110.0), |row: &TokenRecord| {
            CellContent::Token(row.token.clone())
        }),
        ColumnSpec::new(
            "Scopes",
            ColumnWidth::Remainder { min: 120.0 },
            |row: &TokenRecord| scope_cell(Some(&row.scopes)),
        ),
        ColumnSpec::new("Created", ColumnWidth::Exact(120.0), |row: &TokenRecord| {
            CellContent::Timestamp {
                at: Some(row.created),
                expiration: false,
            }
        }),
        ColumnSpec::new("Expires", ColumnWidth::Exact(120.0), |row: &TokenRecord| {
            CellContent::Timestamp {
                at: row.expires,
                expiration: true,
            }
        }),
        ColumnSpec::new("", ColumnWidth::Exact(36.0), |row: &TokenRecord| {
            CellContent::Delete {
                token: row.token.clone(),
            }
        }),
    ]);
    columns
}

/// Index at which the optional Token column lands in the change table,
/// immediately after the fixed identity prefix.
pub const CHANGE_TOKEN_COLUMN_INDEX: usize = 4;

/// Columns for the token-change (audit) table.
///
/// Shape: `Event Time, Action, Actor, IP Address, [Token?], Token Name,
/// Old Token Name, Scopes, Old Scopes, Expires, Old Expires`. The raw token
/// column only exists on explicit opt-in, spliced between the identity prefix
/// and the metadata suffix.
pub fn token_change_columns(include_token: bool) -> Vec<ColumnSpec<TokenChangeRecord>> {
    let mut columns: Vec<ColumnSpec<TokenChangeRecord>> = vec![
        ColumnSpec::new(
            "Event Time",
            ColumnWidth::Exact(120.0),
            |row: &TokenChangeRecord| CellContent::Timestamp {
                at: Some(row.event_time),
                expiration: false,
            },
        ),
        ColumnSpec::new(
            "Action",
            ColumnWidth::Exact(70.0),
            |row: &TokenChangeRecord| CellContent::Text(row.action.clone()),
        ),
        ColumnSpec::new(
            "Actor",
            ColumnWidth::Exact(90.0),
            |row: &TokenChangeRecord| CellContent::Text(row.actor.clone()),
        ),
        ColumnSpec::new(
            "IP Address",
            ColumnWidth::Exact(110.0),
            |row: &TokenChangeRecord| CellContent::Text(row.ip_address.clone()),
        ),
    ];
    debug_assert_eq!(columns.len(), CHANGE_TOKEN_COLUMN_INDEX);
    if include_token {
        columns.insert(
            CHANGE_TOKEN_COLUMN_INDEX,
            ColumnSpec::new(
                "Token",
                ColumnWidth::Exact(100.0),
                |row: &TokenChangeRecord| CellContent::Token(row.token.clone()),
            ),
        );
    }
    columns.extend([
        ColumnSpec::new(
            "Token Name",
            ColumnWidth::Remainder { min: 90.0 },
            |row: &TokenChangeRecord| match &row.token_name {
                Some(name) => CellContent::Text(name.clone()),
                None => CellContent::Empty,
            },
        ),
        ColumnSpec::new(
            "Old Token Name",
            ColumnWidth::Remainder { min: 90.0 },
            |row: &TokenChangeRecord| match &row.old_token_name {
                Some(name) => CellContent::Text(name.clone()),
                None => CellContent::Empty,
            },
        ),
        ColumnSpec::new(
            "Scopes",
            ColumnWidth::Remainder { min: 100.0 },
            |row: &TokenChangeRecord| scope_cell(row.scopes.as_deref()),
        ),
        ColumnSpec::new(
            "Old Scopes",
            ColumnWidth::Remainder { min: 100.0 },
            |row: &TokenChangeRecord| scope_cell(row.old_scopes.as_deref()),
        ),
        ColumnSpec::new(
            "Expires",
            ColumnWidth::Exact(110.0),
            |row: &TokenChangeRecord| CellContent::Timestamp {
                at: row.expires,
                expiration: false,
            },
        ),
        ColumnSpec::new(
            "Old Expires",
            ColumnWidth::Exact(110.0),
            |row: &TokenChangeRecord| CellContent::Timestamp {
                at: row.old_expires,
                expiration: false,
            },
        ),
    ]);
    columns
}
