//! Header rendering for the token tables.

use egui::Ui;
use egui_extras::TableRow;
use tokenview_business::ColumnSpec;

/// Renders the header row with bold labels taken from the column specs.
#[inline]
pub fn render_table_header<R>(header: &mut TableRow<'_, '_>, columns: &[ColumnSpec<R>]) {
    for column in columns {
        header.col(|ui| {
            render_header_cell(ui, column.header);
        });
    }
}

#[inline]
fn render_header_cell(ui: &mut Ui, label: &str) {
    ui.strong(label);
}
