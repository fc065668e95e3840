mod api;
mod app;
mod components;
mod editor;
mod models;
mod nav;
mod pages;
mod persistence;
mod state;
mod storage;
mod util;

use leptos::prelude::*;

pub use app::App;

// Needed for `#[wasm_bindgen(start)]` on the wasm entrypoint.
#[cfg(all(target_arch = "wasm32", not(test)))]
use wasm_bindgen::prelude::wasm_bindgen;

// Only register the WASM start function for normal builds (not for tests),
// otherwise wasm-bindgen-test will end up with multiple entry symbols.
#[cfg_attr(all(target_arch = "wasm32", not(test)), wasm_bindgen(start))]
pub fn main() {
    console_error_panic_hook::set_once();
    mount_to_body(App);
}

#[cfg(test)]
mod tests {
    use crate::models::{SiteNavigationConfig, StoredSiteConfig, SITE_NAV_CONFIG_KEY};
    use crate::persistence::decode_site_config;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_stored_document_contract_deserialize() {
        // Row shape returned by `GET /rest/v1/site_navigation_config?id=eq.main`.
        let json = r##"{
            "id": "main",
            "logo_url": "/images/acme.svg",
            "logo_size": 56,
            "favicon_url": "/acme.ico",
            "favicon_size": 16,
            "site_name": "Acme",
            "site_name_alt": "Acmé",
            "menu_items": [
                { "id": "home", "label": "Home", "label_alt": "Accueil", "href": "/", "order": 0 },
                {
                    "id": "products", "label": "Products", "href": "#", "order": 1,
                    "children": [
                        { "id": "pumps", "label": "Pumps", "href": "/products/pumps", "order": 0,
                          "icon": "data:image/png;base64,AAAA" }
                    ]
                }
            ],
            "updated_at": "2026-03-01T10:00:00+00:00"
        }"##;

        let config = decode_site_config(serde_json::from_str(json).expect("json")).expect("decode");
        assert_eq!(config.site_name, "Acme");
        assert_eq!(config.logo.size, 56);
        assert_eq!(config.favicon.src, "/acme.ico");
        assert_eq!(config.menu.ids(), vec!["home", "products", "pumps"]);
        assert_eq!(
            config.menu.find("pumps").and_then(|i| i.icon.clone()).as_deref(),
            Some("data:image/png;base64,AAAA")
        );
    }

    #[test]
    fn test_partial_document_falls_back_per_field() {
        let config = decode_site_config(serde_json::json!({ "id": "main", "menu_items": [] }))
            .expect("decode");
        let defaults = SiteNavigationConfig::default();
        assert_eq!(config.logo, defaults.logo);
        assert_eq!(config.site_name, defaults.site_name);
        assert!(config.menu.is_empty());
    }

    #[test]
    fn test_upsert_body_contract_serialize() {
        let stored = SiteNavigationConfig::default().to_stored(SITE_NAV_CONFIG_KEY);
        let v = serde_json::to_value(&stored).expect("serialize");
        assert_eq!(v["id"], "main");
        assert_eq!(v["logo_url"], "/images/logo.png");
        assert!(v["menu_items"].is_array());
        assert!(v.get("updated_at").is_none());

        let back: StoredSiteConfig = serde_json::from_value(v).expect("deserialize");
        assert_eq!(back.menu_items.len(), stored.menu_items.len());
    }
}

// WASM-only tests (run with `cargo test --target wasm32-unknown-unknown` + wasm-bindgen-test-runner)
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use crate::api::{ApiClient, EnvConfig};
    use crate::models::Language;
    use crate::storage::{
        clear_session, load_language, load_last_activity, save_language, save_last_activity,
    };
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_api_client_storage_roundtrip_token() {
        let env = EnvConfig::new();
        clear_session();

        let mut c = ApiClient::load_from_storage(&env);
        assert!(!c.is_authenticated());

        c.set_token("t1".to_string());
        c.save_to_storage();

        let c2 = ApiClient::load_from_storage(&env);
        assert_eq!(c2.token.as_deref(), Some("t1"));

        let mut c3 = ApiClient::load_from_storage(&env);
        c3.logout();
        assert!(ApiClient::load_from_storage(&env).token.is_none());
    }

    #[wasm_bindgen_test]
    fn test_last_activity_roundtrip() {
        save_last_activity(1234);
        assert_eq!(load_last_activity(), Some(1234));
        clear_session();
        assert_eq!(load_last_activity(), None);
    }

    #[wasm_bindgen_test]
    fn test_language_roundtrip() {
        save_language(Language::Secondary);
        assert_eq!(load_language(), Language::Secondary);
        save_language(Language::Primary);
        assert_eq!(load_language(), Language::Primary);
    }
}
