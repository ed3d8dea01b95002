pub mod api;
pub mod app;
pub mod connection;
mod diag;
pub mod dispatch;
pub mod exports;
pub mod locale;
pub mod notify;
pub mod runtime;
pub mod sync;

#[cfg(target_family = "wasm")]
mod bridge;
#[cfg(target_family = "wasm")]
mod dom;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_support;

use wasm_bindgen::prelude::*;

/// WASM entry point.
#[wasm_bindgen(start)]
pub fn start() {
    #[cfg(target_family = "wasm")]
    {
        console_error_panic_hook::set_once();
        tracing_wasm::set_as_global_default();
        app::boot_page();
    }
}
