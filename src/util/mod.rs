pub(crate) fn now_ms() -> i64 {
    js_sys::Date::now().round() as i64
}

/// Current `window.location.pathname`, or `/` outside a browser window.
pub(crate) fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}
