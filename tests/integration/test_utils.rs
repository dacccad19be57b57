#![allow(dead_code)]

use serde_json::{json, Value};
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use stockwatch::config::TelegramSettings;

/// 2024-06-03 09:15 IST
pub const FIRST_BAR_TS: i64 = 1_717_386_300;
pub const DAY: i64 = 86_400;

pub const BOT_TOKEN: &str = "123456:test-token";
pub const CHAT_ID: &str = "-1001234";

pub fn telegram_settings() -> TelegramSettings {
    TelegramSettings {
        bot_token: BOT_TOKEN.to_string(),
        chat_id: CHAT_ID.to_string(),
    }
}

pub fn send_message_path() -> String {
    format!("/bot{BOT_TOKEN}/sendMessage")
}

/// Chart payload with one bar per day; `None` closes become JSON nulls.
pub fn chart_body(closes: &[Option<f64>]) -> Value {
    let timestamps: Vec<i64> = (0..closes.len() as i64)
        .map(|i| FIRST_BAR_TS + i * DAY)
        .collect();
    let volume: Vec<Option<f64>> = closes.iter().map(|c| c.map(|_| 10_000.0)).collect();
    json!({
        "chart": {
            "result": [{
                "meta": { "currency": "INR", "symbol": "TEST.NS" },
                "timestamp": timestamps,
                "indicators": {
                    "quote": [{
                        "open": closes,
                        "high": closes,
                        "low": closes,
                        "close": closes,
                        "volume": volume
                    }]
                }
            }],
            "error": null
        }
    })
}

/// Chart payload carrying only the quote fields of `meta`.
pub fn quote_body(price: f64, previous_close: f64) -> Value {
    json!({
        "chart": {
            "result": [{
                "meta": {
                    "currency": "INR",
                    "regularMarketPrice": price,
                    "previousClose": previous_close,
                    "chartPreviousClose": previous_close
                },
                "timestamp": [],
                "indicators": { "quote": [{}] }
            }],
            "error": null
        }
    })
}

/// Index symbols such as `^NSEI`; the caret may arrive percent-encoded.
pub async fn mock_index(server: &MockServer, index: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path_regex(format!(r"^/v8/finance/chart/(\^|%5E){index}$")))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

pub fn rising_closes(count: usize) -> Vec<Option<f64>> {
    (0..count).map(|i| Some(100.0 + i as f64 * 0.5)).collect()
}

pub async fn mock_chart(server: &MockServer, symbol: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/v8/finance/chart/{symbol}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Fallback for any symbol without a specific mock.
pub async fn mock_unknown_symbols(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path_regex(r"^/v8/finance/chart/.+$"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "chart": {
                "result": null,
                "error": { "code": "Not Found", "description": "No data found, symbol may be delisted" }
            }
        })))
        .with_priority(10)
        .mount(server)
        .await;
}

pub async fn mock_telegram_ok(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(send_message_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true, "result": {} })))
        .with_priority(10)
        .mount(server)
        .await;
}

/// Form bodies of every request the server received.
pub async fn received_bodies(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .map(|request| String::from_utf8_lossy(&request.body).into_owned())
        .collect()
}
