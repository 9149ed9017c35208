use std::time::Duration;

use chrono::Utc;
use tokenview_business::FetchPhase;

use crate::state::State;
use crate::widgets;

pub struct TokenviewApp {
    state: State,
}

impl TokenviewApp {
    pub fn new(state: State) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut State {
        &mut self.state
    }
}

impl eframe::App for TokenviewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let state = &mut self.state;

        // The session fetch fires on the first frame only; `start` is a no-op
        // afterwards, however often we repaint.
        state.session.start(&state.config);

        let errors = &mut state.errors;
        let became_ready = state.session.poll(&mut |err| errors.push(err.to_string()));
        let errors = &mut state.errors;
        state.inventory.poll(&mut |err| errors.push(err.to_string()));

        // A ready session names the user; only then can the token views load.
        if became_ready
            && let Some(username) = state.session.username().map(str::to_owned)
        {
            state.inventory.refresh(&state.config, &username);
            state.inventory.load_history(&state.config, &username);
        }

        if state.session.busy() || state.inventory.busy() {
            ctx.request_repaint_after(Duration::from_millis(50));
        }

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Token Management");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    match state.session.username() {
                        Some(username) => ui.label(format!("👤 {username}")),
                        None => ui.label("Not signed in"),
                    };
                });
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            state.errors.show(ui);

            let now = Utc::now();

            ui.heading("User Tokens");
            if state.inventory.tokens_phase() == FetchPhase::Fetching {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Loading tokens...");
                });
            }

            // The table reports the click; issuing the DELETE happens after
            // rendering so the row list is not mutated mid-walk.
            let mut requested_delete: Option<String> = None;
            widgets::token_table(ui, &state.inventory.tokens, true, now, &mut |token| {
                requested_delete = Some(token.to_string());
            });
            if let Some(key) = requested_delete
                && let (Some(username), Some(csrf)) = (
                    state.session.username().map(str::to_owned),
                    state.session.csrf().map(str::to_owned),
                )
            {
                state.inventory.delete(&state.config, &username, &key, &csrf);
            }

            ui.separator();
            ui.heading("Token Change History");
            if state.inventory.history_phase() == FetchPhase::Fetching {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Loading history...");
                });
            } else {
                widgets::token_change_table(ui, &state.inventory.history, true, now);
            }
        });
    }
}
