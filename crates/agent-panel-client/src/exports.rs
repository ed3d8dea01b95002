//! Formatters exposed to page templates.

use agent_panel_core::format;
use agent_panel_core::state::Timestamp;
use wasm_bindgen::prelude::*;

use crate::locale;

/// Locale display string for an ISO-8601 timestamp. Unparseable input is
/// returned unchanged.
#[wasm_bindgen(js_name = formatDateTime)]
pub fn format_date_time(iso: &str) -> String {
    match Timestamp::parse(iso) {
        Some(ts) => locale::format_timestamp(&ts),
        None => iso.to_string(),
    }
}

#[wasm_bindgen(js_name = formatCurrency)]
pub fn format_currency(value: f64) -> String {
    format::format_currency(value)
}

#[wasm_bindgen(js_name = formatPercentage)]
pub fn format_percentage(value: f64) -> String {
    format::format_percentage(value)
}

#[wasm_bindgen(js_name = formatSignal)]
pub fn format_signal(signal: &str) -> String {
    format::format_signal(signal)
}

#[wasm_bindgen(js_name = getTechnicalSignalClass)]
pub fn technical_signal_class(signal: &str) -> String {
    format::classify_signal(signal).css_class().to_string()
}

#[wasm_bindgen(js_name = getSentimentClass)]
pub fn sentiment_class(sentiment: &str) -> String {
    format::classify_sentiment(sentiment).css_class().to_string()
}
