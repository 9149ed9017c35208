use std::sync::Arc;

use egui_kittest::Harness;
use tokenview_business::{AppConfig, MockFetcher, json_response};
use tokenview_ui::TokenviewApp;
use tokenview_ui::state::State;

/// Canned `/login` body used across tests.
#[allow(unused)]
pub fn login_body() -> serde_json::Value {
    serde_json::json!({
        "csrf": "csrf-abc",
        "username": "alice",
        "scopes": ["read"],
        "config": {"scopes": ["read", "write"]},
    })
}

/// Two user tokens: one named without expiry, one unnamed with expiry.
#[allow(unused)]
pub fn tokens_body() -> serde_json::Value {
    serde_json::json!([
        {
            "token": "gt-one-abcdef",
            "token_name": "laptop",
            "scopes": ["read:all"],
            "created": 1_700_000_000,
        },
        {
            "token": "gt-two-abcdef",
            "scopes": ["exec:notebook", "read:all"],
            "created": 1_700_100_000,
            "expires": 1_799_900_000,
        },
    ])
}

/// One scope-edit audit entry with an unchanged old_scopes field.
#[allow(unused)]
pub fn history_body() -> serde_json::Value {
    serde_json::json!([
        {
            "event_time": 1_700_200_000,
            "action": "edit",
            "actor": "alice",
            "ip_address": "192.0.2.4",
            "token": "gt-one-abcdef",
            "token_name": "laptop",
            "scopes": ["read:all", "user:token"],
        },
    ])
}

/// App harness backed by a `MockFetcher` that answers from `responses` in
/// order. The app issues login, then token list, then change history, so
/// canned responses follow that order.
#[allow(unused)]
pub fn mock_app_harness(
    responses: impl IntoIterator<Item = ehttp::Result<ehttp::Response>>,
) -> (Harness<'static, TokenviewApp>, Arc<MockFetcher>) {
    let fetcher = Arc::new(MockFetcher::with_responses(responses));
    let state = State::new(AppConfig::new("http://mock.test"), fetcher.clone());
    let harness = Harness::builder()
        .with_size(egui::Vec2::new(1500.0, 900.0))
        .build_eframe(|_| TokenviewApp::new(state));
    (harness, fetcher)
}

/// Harness whose app sees a fully loaded session, token list, and history.
#[allow(unused)]
pub fn loaded_app_harness() -> (Harness<'static, TokenviewApp>, Arc<MockFetcher>) {
    let (mut harness, fetcher) = mock_app_harness([
        Ok(json_response(200, &login_body())),
        Ok(json_response(200, &tokens_body())),
        Ok(json_response(200, &history_body())),
    ]);
    // Login resolves on the first frame, the token/history fetches on the
    // next; a third settles layout.
    for _ in 0..3 {
        harness.step();
    }
    (harness, fetcher)
}
