use crate::models::Language;
use serde::{Deserialize, Serialize};

pub(crate) const TOKEN_KEY: &str = "catalog_admin_token";
pub(crate) const LAST_ACTIVITY_KEY: &str = "catalog_admin_last_activity_ms";
pub(crate) const LANGUAGE_KEY: &str = "catalog_language";

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

pub(crate) fn load_json_from_storage<T: for<'de> Deserialize<'de>>(key: &str) -> Option<T> {
    let json = local_storage()?.get_item(key).ok().flatten()?;
    serde_json::from_str(&json).ok()
}

pub(crate) fn save_json_to_storage<T: Serialize>(key: &str, value: &T) {
    if let Ok(json) = serde_json::to_string(value) {
        if let Some(storage) = local_storage() {
            let _ = storage.set_item(key, &json);
        }
    }
}

pub(crate) fn remove_from_storage(key: &str) {
    if let Some(storage) = local_storage() {
        let _ = storage.remove_item(key);
    }
}

/// Drops everything that belongs to the admin session.
pub(crate) fn clear_session() {
    remove_from_storage(TOKEN_KEY);
    remove_from_storage(LAST_ACTIVITY_KEY);
}

pub(crate) fn load_last_activity() -> Option<i64> {
    load_json_from_storage(LAST_ACTIVITY_KEY)
}

pub(crate) fn save_last_activity(now_ms: i64) {
    save_json_to_storage(LAST_ACTIVITY_KEY, &now_ms);
}

pub(crate) fn load_language() -> Language {
    local_storage()
        .and_then(|s| s.get_item(LANGUAGE_KEY).ok().flatten())
        .and_then(|v| v.parse().ok())
        .unwrap_or_default()
}

pub(crate) fn save_language(language: Language) {
    if let Some(storage) = local_storage() {
        let _ = storage.set_item(LANGUAGE_KEY, language.as_ref());
    }
}
