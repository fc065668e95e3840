//! Loading and saving the singleton navigation document.

use crate::api::{ConfigStore, StoreError, StoreErrorKind, StoreResult};
use crate::models::{SiteNavigationConfig, StoredSiteConfig};
use leptos::logging::{error, log, warn};
use serde_json::Value;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum FallbackReason {
    /// Nothing stored under the key yet.
    Missing,
    Failed(StoreError),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ConfigSource {
    Stored,
    Default(FallbackReason),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct LoadedConfig {
    pub config: SiteNavigationConfig,
    pub source: ConfigSource,
}

impl LoadedConfig {
    #[cfg(test)]
    pub fn is_default(&self) -> bool {
        matches!(self.source, ConfigSource::Default(_))
    }

    /// Snapshot that edits are compared against. Only a missing document
    /// has none; a default shown after a failed load is not unsaved.
    pub fn baseline(&self) -> Option<SiteNavigationConfig> {
        match self.source {
            ConfigSource::Default(FallbackReason::Missing) => None,
            _ => Some(self.config.clone()),
        }
    }
}

pub(crate) fn decode_site_config(document: Value) -> StoreResult<SiteNavigationConfig> {
    let stored: StoredSiteConfig = serde_json::from_value(document).map_err(StoreError::parse)?;
    let (config, repairs) = SiteNavigationConfig::from_stored(stored);
    if !repairs.is_empty() {
        warn!(
            "[persistence] repaired {} menu item id(s): {:?}",
            repairs.len(),
            repairs
        );
    }
    Ok(config)
}

pub(crate) fn encode_site_config(config: &SiteNavigationConfig, key: &str) -> StoreResult<Value> {
    serde_json::to_value(config.to_stored(key)).map_err(StoreError::parse)
}

/// Never fails: anything that goes wrong yields the built-in default.
pub(crate) async fn load_site_config(store: &impl ConfigStore, key: &str) -> LoadedConfig {
    let fetched = match store.load(key).await {
        Ok(Some(doc)) => decode_site_config(doc).map_err(FallbackReason::Failed),
        Ok(None) => Err(FallbackReason::Missing),
        Err(e) if e.kind == StoreErrorKind::NotFound => Err(FallbackReason::Missing),
        Err(e) => Err(FallbackReason::Failed(e)),
    };

    match fetched {
        Ok(config) => LoadedConfig {
            config,
            source: ConfigSource::Stored,
        },
        Err(reason) => {
            match &reason {
                FallbackReason::Missing => {
                    log!("[persistence] no configuration stored under {key:?}; using default")
                }
                FallbackReason::Failed(e) => {
                    warn!("[persistence] load {key:?} failed ({:?}): {e}; using default", e.kind)
                }
            }
            LoadedConfig {
                config: SiteNavigationConfig::default(),
                source: ConfigSource::Default(reason),
            }
        }
    }
}

/// Writes the whole document. A transient failure is retried once.
pub(crate) async fn save_site_config(
    store: &impl ConfigStore,
    key: &str,
    config: &SiteNavigationConfig,
) -> StoreResult<()> {
    let document = encode_site_config(config, key)?;

    let result = match store.save(key, &document).await {
        Err(e) if e.is_transient() => {
            warn!("[persistence] save {key:?} failed ({e}); retrying once");
            store.save(key, &document).await
        }
        other => other,
    };

    result.map_err(|e| {
        error!("[persistence] save {key:?} failed ({:?}): {e}", e.kind);
        e
    })
}
