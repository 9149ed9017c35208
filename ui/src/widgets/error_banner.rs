//! Banner collecting errors surfaced by fetch callbacks.
//!
//! Failures degrade to a visible message here; nothing throws into the render
//! path.

use egui::{Color32, Frame, Margin, RichText, Ui};

#[derive(Debug, Default)]
pub struct ErrorBanner {
    messages: Vec<String>,
}

impl ErrorBanner {
    pub fn push(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Renders one red bar per message with a dismiss control.
    pub fn show(&mut self, ui: &mut Ui) {
        let mut dismissed: Option<usize> = None;
        for (index, message) in self.messages.iter().enumerate() {
            Frame::NONE
                .fill(Color32::from_rgb(220, 53, 69))
                .inner_margin(Margin::symmetric(8, 4))
                .corner_radius(4.0)
                .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.label(RichText::new(message).color(Color32::WHITE));
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui.small_button("✖").on_hover_text("Dismiss").clicked() {
                                dismissed = Some(index);
                            }
                        });
                    });
                });
        }
        if let Some(index) = dismissed {
            self.messages.remove(index);
        }
        if !self.messages.is_empty() {
            ui.add_space(6.0);
        }
    }
}
