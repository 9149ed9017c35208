//! Cell rendering dispatched from `CellContent`.

use chrono::{DateTime, Utc};
use egui::{RichText, Ui};
use tokenview_business::CellContent;

/// Renders one cell. Delete cells become a button wired straight to
/// `on_delete`; everything else is the content's text reading, monospaced
/// for token values.
#[inline]
pub fn render_cell(
    ui: &mut Ui,
    content: &CellContent,
    now: DateTime<Utc>,
    on_delete: &mut dyn FnMut(&str),
) {
    match content {
        CellContent::Delete { token } => {
            if render_delete_button(ui).clicked() {
                on_delete(token);
            }
        }
        CellContent::Token(_) => {
            ui.label(RichText::new(content.display(now)).monospace());
        }
        CellContent::Empty => {}
        CellContent::Text(_) | CellContent::Timestamp { .. } => {
            ui.label(content.display(now));
        }
    }
}

#[inline]
fn render_delete_button(ui: &mut Ui) -> egui::Response {
    ui.button("🗑").on_hover_text("Delete token")
}
