use crate::storage::{clear_session, TOKEN_KEY};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum StoreErrorKind {
    NotFound,
    Unauthorized,
    /// Transport failure, including timeouts.
    Network,
    Http,
    Parse,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{message}")]
pub(crate) struct StoreError {
    pub kind: StoreErrorKind,
    pub message: String,
}

impl StoreError {
    pub fn new(kind: StoreErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    fn network(e: reqwest::Error) -> Self {
        if e.is_decode() {
            return Self::parse(e);
        }
        Self::new(StoreErrorKind::Network, e.to_string())
    }

    pub fn parse(e: impl std::fmt::Display) -> Self {
        Self::new(StoreErrorKind::Parse, e.to_string())
    }

    fn unauthorized() -> Self {
        Self::new(StoreErrorKind::Unauthorized, "Unauthorized")
    }

    fn from_status(status: reqwest::StatusCode, body: String, ctx: &str) -> Self {
        match status.as_u16() {
            401 => Self::unauthorized(),
            404 => Self::new(StoreErrorKind::NotFound, format!("{ctx}: not found")),
            _ => Self::new(StoreErrorKind::Http, format!("{ctx} ({status}): {body}")),
        }
    }

    /// Worth one more attempt.
    pub fn is_transient(&self) -> bool {
        self.kind == StoreErrorKind::Network
    }
}

pub(crate) type StoreResult<T> = Result<T, StoreError>;

const DEFAULT_API_URL: &str = "http://localhost:54321";
const DEFAULT_CONFIG_TABLE: &str = "site_navigation_config";
const DEFAULT_IDLE_TIMEOUT_MINUTES: u32 = 30;

#[cfg(not(target_arch = "wasm32"))]
const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(15);

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct EnvConfig {
    pub api_url: String,
    pub api_key: String,
    pub config_table: String,
    pub idle_timeout_minutes: u32,
}

impl EnvConfig {
    /// Reads `window.ENV`. Both `API_URL` and the lower-case `api_url` spellings
    /// are accepted for every key.
    pub fn new() -> Self {
        let env = web_sys::window()
            .and_then(|w| w.get("ENV"))
            .filter(|env| !env.is_undefined() && env.is_object());

        let Some(env) = env else {
            return Self::from_lookup(|_| None);
        };

        Self::from_lookup(|key| {
            let v = js_sys::Reflect::get(&env, &key.into()).ok()?;
            v.as_string().or_else(|| v.as_f64().map(|n| n.to_string()))
        })
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |upper: &str| {
            lookup(upper)
                .or_else(|| lookup(&upper.to_ascii_lowercase()))
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        let idle_timeout_minutes = get("IDLE_TIMEOUT_MINUTES")
            .and_then(|s| s.parse::<f64>().ok())
            .filter(|n| n.is_finite())
            .map(|n| n.max(1.0) as u32)
            .unwrap_or(DEFAULT_IDLE_TIMEOUT_MINUTES);

        Self {
            api_url: get("API_URL")
                .map(|s| s.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            api_key: get("API_KEY").unwrap_or_default(),
            config_table: get("CONFIG_TABLE").unwrap_or_else(|| DEFAULT_CONFIG_TABLE.to_string()),
            idle_timeout_minutes,
        }
    }

    pub fn idle_timeout_ms(&self) -> i64 {
        i64::from(self.idle_timeout_minutes) * 60_000
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct SignInResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub user: Option<Value>,
}

/// Remote home of the configuration document.
#[allow(async_fn_in_trait)]
pub(crate) trait ConfigStore {
    /// `Ok(None)` when no document is stored under `key`.
    async fn load(&self, key: &str) -> StoreResult<Option<Value>>;

    /// Creates or replaces the document stored under `key`.
    async fn save(&self, key: &str, document: &Value) -> StoreResult<()>;
}

#[derive(Clone, Debug)]
pub(crate) struct ApiClient {
    pub(crate) base_url: String,
    pub(crate) api_key: String,
    pub(crate) table: String,
    pub(crate) token: Option<String>,
}

impl ApiClient {
    pub fn new(env: &EnvConfig) -> Self {
        Self {
            base_url: env.api_url.clone(),
            api_key: env.api_key.clone(),
            table: env.config_table.clone(),
            token: None,
        }
    }

    pub fn load_from_storage(env: &EnvConfig) -> Self {
        let token = leptos::web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .and_then(|s| s.get_item(TOKEN_KEY).ok().flatten())
            .filter(|t| !t.trim().is_empty());

        Self {
            token,
            ..Self::new(env)
        }
    }

    pub fn save_to_storage(&self) {
        if let Some(storage) =
            leptos::web_sys::window().and_then(|w| w.local_storage().ok().flatten())
        {
            if let Some(token) = &self.token {
                let _ = storage.set_item(TOKEN_KEY, token);
            }
        }
    }

    pub fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }

    pub fn logout(&mut self) {
        self.token = None;
        clear_session();
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub(crate) fn config_url(&self, key: &str) -> String {
        format!(
            "{}/rest/v1/{}?id=eq.{}&select=*",
            self.base_url,
            urlencoding::encode(&self.table),
            urlencoding::encode(key)
        )
    }

    pub(crate) fn upsert_url(&self) -> String {
        format!(
            "{}/rest/v1/{}?on_conflict=id",
            self.base_url,
            urlencoding::encode(&self.table)
        )
    }

    pub(crate) fn sign_in_url(&self) -> String {
        format!("{}/auth/v1/token?grant_type=password", self.base_url)
    }

    fn http_client() -> StoreResult<reqwest::Client> {
        let builder = reqwest::Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(REQUEST_TIMEOUT);
        builder.build().map_err(StoreError::network)
    }

    /// The admin session when there is one, otherwise the anonymous key.
    fn bearer(&self) -> Option<&str> {
        Some(self.token.as_deref().unwrap_or(&self.api_key)).filter(|b| !b.is_empty())
    }

    /// `apikey` always identifies the project.
    fn with_auth_headers(&self, mut req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if !self.api_key.is_empty() {
            req = req.header("apikey", &self.api_key);
        }
        if let Some(bearer) = self.bearer() {
            req = req.header("Authorization", format!("Bearer {}", bearer));
        }
        req
    }

    async fn send(req: reqwest::RequestBuilder, ctx: &str) -> StoreResult<reqwest::Response> {
        let res = req.send().await.map_err(StoreError::network)?;
        let status = res.status();
        if status.is_success() {
            return Ok(res);
        }
        let body = res.text().await.unwrap_or_default();
        Err(StoreError::from_status(status, body, ctx))
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> StoreResult<SignInResponse> {
        let mut req = Self::http_client()?
            .post(self.sign_in_url())
            .json(&SignInRequest {
                email: email.trim().to_string(),
                password: password.to_string(),
            });
        if !self.api_key.is_empty() {
            req = req.header("apikey", &self.api_key);
        }

        let res = req.send().await.map_err(StoreError::network)?;
        let status = res.status();
        if status.is_success() {
            return res.json().await.map_err(StoreError::parse);
        }

        let body = res.text().await.unwrap_or_default();
        match status.as_u16() {
            400 | 401 | 403 => Err(StoreError::new(
                StoreErrorKind::Unauthorized,
                auth_error_message(&body),
            )),
            _ => Err(StoreError::from_status(status, body, "Sign in")),
        }
    }

    pub async fn load_document(&self, key: &str) -> StoreResult<Option<Value>> {
        let req = self.with_auth_headers(
            Self::http_client()?
                .get(self.config_url(key))
                .header("Accept", "application/json"),
        );
        let res = Self::send(req, "Load configuration").await?;
        let body: Value = res.json().await.map_err(StoreError::parse)?;
        first_document(body)
    }

    pub async fn save_document(&self, key: &str, document: &Value) -> StoreResult<()> {
        let mut document = document.clone();
        match document.as_object_mut() {
            Some(obj) => {
                obj.insert("id".to_string(), Value::String(key.to_string()));
            }
            None => return Err(StoreError::parse("configuration document must be an object")),
        }

        let req = self.with_auth_headers(
            Self::http_client()?
                .post(self.upsert_url())
                .header("Prefer", "resolution=merge-duplicates,return=minimal")
                .json(&document),
        );
        Self::send(req, "Save configuration").await?;
        Ok(())
    }
}

impl ConfigStore for ApiClient {
    async fn load(&self, key: &str) -> StoreResult<Option<Value>> {
        self.load_document(key).await
    }

    async fn save(&self, key: &str, document: &Value) -> StoreResult<()> {
        self.save_document(key, document).await
    }
}

/// A row-set response: `[]` means absent, otherwise the first row wins.
pub(crate) fn first_document(body: Value) -> StoreResult<Option<Value>> {
    match body {
        Value::Array(rows) => Ok(rows.into_iter().next()),
        Value::Null => Ok(None),
        other => Err(StoreError::parse(format!(
            "expected a list of documents, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Human-readable reason from an auth error body.
pub(crate) fn auth_error_message(body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    parsed
        .as_ref()
        .and_then(|v| {
            ["error_description", "msg", "message", "error"]
                .iter()
                .find_map(|k| v.get(*k).and_then(|m| m.as_str()))
        })
        .map(|s| s.to_string())
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                "Sign-in failed".to_string()
            } else {
                body.trim().to_string()
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn env() -> EnvConfig {
        EnvConfig::from_lookup(|k| match k {
            "API_URL" => Some("https://db.example.com/".to_string()),
            "api_key" => Some("anon".to_string()),
            _ => None,
        })
    }

    #[test]
    fn test_env_defaults() {
        let env = EnvConfig::from_lookup(|_| None);
        assert_eq!(env.api_url, DEFAULT_API_URL);
        assert_eq!(env.api_key, "");
        assert_eq!(env.config_table, DEFAULT_CONFIG_TABLE);
        assert_eq!(env.idle_timeout_minutes, 30);
        assert_eq!(env.idle_timeout_ms(), 30 * 60_000);
    }

    #[test]
    fn test_env_accepts_both_spellings() {
        let env = env();
        assert_eq!(env.api_url, "https://db.example.com");
        assert_eq!(env.api_key, "anon");
    }

    #[test]
    fn test_idle_timeout_clamped() {
        let env = EnvConfig::from_lookup(|k| (k == "IDLE_TIMEOUT_MINUTES").then(|| "0".to_string()));
        assert_eq!(env.idle_timeout_minutes, 1);

        let env = EnvConfig::from_lookup(|k| (k == "idle_timeout_minutes").then(|| "5".to_string()));
        assert_eq!(env.idle_timeout_minutes, 5);

        let env = EnvConfig::from_lookup(|k| (k == "IDLE_TIMEOUT_MINUTES").then(|| "soon".to_string()));
        assert_eq!(env.idle_timeout_minutes, 30);
    }

    #[test]
    fn test_request_urls() {
        let client = ApiClient::new(&env());
        assert_eq!(
            client.config_url("main"),
            "https://db.example.com/rest/v1/site_navigation_config?id=eq.main&select=*"
        );
        assert_eq!(
            client.config_url("a b&c"),
            "https://db.example.com/rest/v1/site_navigation_config?id=eq.a%20b%26c&select=*"
        );
        assert_eq!(
            client.upsert_url(),
            "https://db.example.com/rest/v1/site_navigation_config?on_conflict=id"
        );
        assert_eq!(
            client.sign_in_url(),
            "https://db.example.com/auth/v1/token?grant_type=password"
        );
    }

    #[test]
    fn test_first_document() {
        assert_eq!(first_document(json!([])), Ok(None));
        assert_eq!(first_document(Value::Null), Ok(None));
        assert_eq!(
            first_document(json!([{ "id": "main" }, { "id": "other" }])),
            Ok(Some(json!({ "id": "main" })))
        );

        let err = first_document(json!({ "id": "main" })).unwrap_err();
        assert_eq!(err.kind, StoreErrorKind::Parse);
    }

    #[test]
    fn test_status_mapping() {
        use reqwest::StatusCode;

        let e = StoreError::from_status(StatusCode::UNAUTHORIZED, String::new(), "Load");
        assert_eq!(e.kind, StoreErrorKind::Unauthorized);
        let e = StoreError::from_status(StatusCode::NOT_FOUND, String::new(), "Load");
        assert_eq!(e.kind, StoreErrorKind::NotFound);
        let e = StoreError::from_status(StatusCode::BAD_GATEWAY, "down".to_string(), "Load");
        assert_eq!(e.kind, StoreErrorKind::Http);
        assert_eq!(e.to_string(), "Load (502 Bad Gateway): down");
        assert!(!e.is_transient());
        assert!(StoreError::new(StoreErrorKind::Network, "timeout").is_transient());
    }

    #[test]
    fn test_sign_in_response_contract() {
        let body = r#"{
            "access_token": "jwt",
            "token_type": "bearer",
            "expires_in": 3600,
            "refresh_token": "r",
            "user": { "id": "u1", "email": "admin@example.com" }
        }"#;
        let res: SignInResponse = serde_json::from_str(body).expect("parse");
        assert_eq!(res.access_token, "jwt");
        assert_eq!(res.expires_in, Some(3600));

        let minimal: SignInResponse =
            serde_json::from_str(r#"{ "access_token": "jwt" }"#).expect("parse");
        assert_eq!(minimal.token_type, "");
        assert!(minimal.user.is_none());
    }

    #[test]
    fn test_auth_error_message() {
        assert_eq!(
            auth_error_message(r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#),
            "Invalid login credentials"
        );
        assert_eq!(auth_error_message(r#"{"msg":"Email not confirmed"}"#), "Email not confirmed");
        assert_eq!(auth_error_message("gateway timeout"), "gateway timeout");
        assert_eq!(auth_error_message(""), "Sign-in failed");
    }

    #[test]
    fn test_token_marks_session_authenticated() {
        let mut client = ApiClient::new(&env());
        assert!(!client.is_authenticated());
        client.set_token("jwt".to_string());
        assert!(client.is_authenticated());
    }

    #[test]
    fn test_anonymous_client_sends_api_key_as_bearer() {
        let mut client = ApiClient::new(&env());
        assert_eq!(client.bearer(), Some("anon"));

        client.set_token("expired-jwt".to_string());
        assert_eq!(client.bearer(), Some("expired-jwt"));

        // The public header builds a fresh client per load, so a stored admin
        // token never reaches its requests.
        assert_eq!(ApiClient::new(&env()).bearer(), Some("anon"));

        let no_key = ApiClient::new(&EnvConfig::from_lookup(|_| None));
        assert_eq!(no_key.bearer(), None);
    }
}
