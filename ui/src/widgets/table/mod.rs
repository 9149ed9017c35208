//! Table rendering for token and token-change views.
//!
//! One generic grid drives both tables: the business layer supplies an
//! ordered `ColumnSpec` sequence and the rows, this module walks them with
//! `egui_extras::TableBuilder`. Rows render in the exact order supplied — no
//! sorting, filtering, or pagination here.
//!
//! Empty-state asymmetry is deliberate and mirrors the views' needs: the
//! change table replaces itself with a "No results" line so an empty history
//! is unmistakable, while the token table keeps its header up for in-place
//! re-population.

mod cells;
mod header;

use chrono::{DateTime, Utc};
use egui::Ui;
use egui_extras::{Column, TableBuilder};
use tokenview_business::{
    ColumnSpec, ColumnWidth, TokenChangeRecord, TokenRecord, token_change_columns, token_columns,
};

use self::cells::render_cell;
use self::header::render_table_header;

const ROW_HEIGHT: f32 = 26.0;
const HEADER_HEIGHT: f32 = 24.0;

/// Renders the signed-in user's tokens.
///
/// Always draws the header, even with no rows. Clicking a row's delete
/// control invokes `on_delete` with that row's token identifier,
/// synchronously, and nothing else; confirmation and the actual request are
/// the caller's business.
pub fn token_table(
    ui: &mut Ui,
    rows: &[TokenRecord],
    include_name: bool,
    now: DateTime<Utc>,
    on_delete: &mut dyn FnMut(&str),
) {
    let columns = token_columns(include_name);
    data_table(ui, "token-table", &columns, rows, |r| &r.token, now, on_delete);
}

/// Renders a token change history.
///
/// An empty history renders the literal "No results" instead of an empty
/// grid.
pub fn token_change_table(
    ui: &mut Ui,
    rows: &[TokenChangeRecord],
    include_token: bool,
    now: DateTime<Utc>,
) {
    if rows.is_empty() {
        ui.label("No results");
        return;
    }
    let columns = token_change_columns(include_token);
    data_table(
        ui,
        "token-change-table",
        &columns,
        rows,
        |r| &r.token,
        now,
        &mut |_| {},
    );
}

/// Generic grid: header row plus one body row per record, cells dispatched
/// through each column's accessor.
fn data_table<R>(
    ui: &mut Ui,
    id_salt: &str,
    columns: &[ColumnSpec<R>],
    rows: &[R],
    row_key: fn(&R) -> &str,
    now: DateTime<Utc>,
    on_delete: &mut dyn FnMut(&str),
) {
    let mut builder = TableBuilder::new(ui).id_salt(id_salt).striped(true);
    for column in columns {
        builder = builder.column(match column.width {
            ColumnWidth::Exact(width) => Column::exact(width),
            ColumnWidth::Remainder { min } => Column::remainder().at_least(min),
        });
    }

    builder
        .header(HEADER_HEIGHT, |mut header| {
            render_table_header(&mut header, columns);
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, rows.len(), |mut row| {
                let index = row.index();
                let record = &rows[index];
                for column in columns {
                    let content = (column.cell)(record);
                    let on_delete = &mut *on_delete;
                    row.col(|ui| {
                        // Keyed by position + primary key; duplicates are the
                        // caller's responsibility.
                        ui.push_id((index, row_key(record)), |ui| {
                            render_cell(ui, &content, now, on_delete);
                        });
                    });
                }
            });
        });
}
