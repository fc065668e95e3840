mod session;

use crate::api::{ApiClient, EnvConfig};
use crate::models::Language;
use crate::storage::{load_language, save_language};
use leptos::prelude::*;

pub(crate) use session::use_idle_sign_out;

#[derive(Clone, Copy)]
pub(crate) struct AppState {
    pub env: StoredValue<EnvConfig>,
    pub api_client: RwSignal<ApiClient>,

    /// Which label variant public consumers display.
    pub language: RwSignal<Language>,

    /// One-off message for the sign-in page (e.g. why the session ended).
    pub notice: RwSignal<Option<String>>,
}

impl AppState {
    pub fn new() -> Self {
        let env = EnvConfig::new();
        let api_client = ApiClient::load_from_storage(&env);

        Self {
            env: StoredValue::new(env),
            api_client: RwSignal::new(api_client),
            language: RwSignal::new(load_language()),
            notice: RwSignal::new(None),
        }
    }

    pub fn sign_out(&self) {
        self.api_client.update(|c| c.logout());
    }

    pub fn set_language(&self, language: Language) {
        self.language.set(language);
        save_language(language);
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy)]
pub(crate) struct AppContext(pub AppState);
