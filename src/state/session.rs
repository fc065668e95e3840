use crate::storage::{load_last_activity, save_last_activity};
use crate::util::now_ms;
use leptos::ev;
use leptos::logging::log;
use leptos::prelude::*;
use leptos_dom::helpers::window_event_listener;
use wasm_bindgen::JsCast;

/// Activity timestamps are written at most this often.
const ACTIVITY_WRITE_INTERVAL_MS: i64 = 5_000;
const CHECK_INTERVAL_MS: i32 = 15_000;

/// A session with no recorded activity counts as fresh.
pub(crate) fn session_expired(last_activity_ms: Option<i64>, now_ms: i64, idle_ms: i64) -> bool {
    match last_activity_ms {
        Some(last) => now_ms.saturating_sub(last) >= idle_ms,
        None => false,
    }
}

pub(crate) fn should_record_activity(last_written_ms: i64, now_ms: i64) -> bool {
    now_ms.saturating_sub(last_written_ms) >= ACTIVITY_WRITE_INTERVAL_MS
}

/// Calls `on_expire` once the operator has been idle for `idle_ms`.
///
/// Activity is kept in localStorage so every open admin tab shares one clock.
/// Listeners and the timer live as long as the calling component.
pub(crate) fn use_idle_sign_out(idle_ms: i64, on_expire: Callback<()>) {
    let expired = StoredValue::new(false);

    let check = move || {
        if expired.get_value() {
            return;
        }
        if session_expired(load_last_activity(), now_ms(), idle_ms) {
            expired.set_value(true);
            log!("[session] idle for {} min; signing out", idle_ms / 60_000);
            on_expire.run(());
        }
    };

    check();
    if expired.get_value() {
        return;
    }

    let last_written = StoredValue::new(now_ms());
    save_last_activity(last_written.get_value());

    let touch = move || {
        let now = now_ms();
        if should_record_activity(last_written.get_value(), now) {
            last_written.set_value(now);
            save_last_activity(now);
        }
    };

    let handles = vec![
        window_event_listener(ev::pointerdown, move |_ev: web_sys::PointerEvent| touch()),
        window_event_listener(ev::keydown, move |_ev: web_sys::KeyboardEvent| touch()),
        window_event_listener(ev::scroll, move |_ev: web_sys::Event| touch()),
        window_event_listener(ev::focus, move |_ev: web_sys::FocusEvent| check()),
    ];

    let Some(win) = web_sys::window() else {
        on_cleanup(move || handles.into_iter().for_each(|h| h.remove()));
        return;
    };

    let cb = wasm_bindgen::closure::Closure::wrap(Box::new(check) as Box<dyn FnMut()>);
    let timer_id = win
        .set_interval_with_callback_and_timeout_and_arguments_0(
            cb.as_ref().unchecked_ref(),
            CHECK_INTERVAL_MS,
        )
        .unwrap_or(0);
    cb.forget();

    on_cleanup(move || {
        handles.into_iter().for_each(|h| h.remove());
        if let Some(win) = web_sys::window() {
            win.clear_interval_with_handle(timer_id);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    const THIRTY_MIN: i64 = 30 * 60_000;

    #[test]
    fn test_expiry_boundary() {
        assert!(!session_expired(Some(1_000), 1_000 + THIRTY_MIN - 1, THIRTY_MIN));
        assert!(session_expired(Some(1_000), 1_000 + THIRTY_MIN, THIRTY_MIN));
    }

    #[test]
    fn test_missing_activity_is_fresh() {
        assert!(!session_expired(None, i64::MAX, THIRTY_MIN));
    }

    #[test]
    fn test_clock_going_backwards_is_not_expiry() {
        assert!(!session_expired(Some(10_000), 5_000, THIRTY_MIN));
    }

    #[test]
    fn test_activity_writes_throttled() {
        assert!(!should_record_activity(0, ACTIVITY_WRITE_INTERVAL_MS - 1));
        assert!(should_record_activity(0, ACTIVITY_WRITE_INTERVAL_MS));
    }
}
