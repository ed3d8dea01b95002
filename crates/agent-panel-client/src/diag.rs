//! Browser console output for the DOM glue. Native builds type-check the
//! format arguments and print nothing; logic modules log through `tracing`.

#[cfg(target_family = "wasm")]
macro_rules! console_at {
    ($sink:ident, $($arg:tt)*) => {
        web_sys::console::$sink(&format!($($arg)*).into())
    };
}

#[cfg(not(target_family = "wasm"))]
macro_rules! console_at {
    ($sink:ident, $($arg:tt)*) => {{
        if false {
            let _ = format_args!($($arg)*);
        }
    }};
}

macro_rules! console_warn {
    ($($arg:tt)*) => {
        $crate::diag::console_at!(warn_1, $($arg)*)
    };
}

macro_rules! console_log {
    ($($arg:tt)*) => {
        $crate::diag::console_at!(log_1, $($arg)*)
    };
}

#[allow(unused_imports)]
pub(crate) use {console_at, console_log, console_warn};
