use agent_panel_core::state::Timestamp;

/// Format `ts` the way the browser would for the user's locale.
#[cfg(target_family = "wasm")]
pub fn format_timestamp(ts: &Timestamp) -> String {
    let date = js_sys::Date::new(&wasm_bindgen::JsValue::from_f64(ts.epoch_millis() as f64));
    String::from(date.to_locale_string("default", &wasm_bindgen::JsValue::UNDEFINED))
}

/// Native builds have no locale formatter; use local time in a fixed layout.
#[cfg(not(target_family = "wasm"))]
pub fn format_timestamp(ts: &Timestamp) -> String {
    agent_panel_core::format::format_timestamp(ts)
}
