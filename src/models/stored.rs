use super::ids::fresh_id_avoiding;
use super::menu::{MenuItem, MenuTree};
use super::site_config::{ImageRef, SiteNavigationConfig};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

/// Persisted shape of one menu item (`menu_items` column, nested).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct StoredMenuItem {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub label: String,

    // Older documents were written by a camelCase client.
    #[serde(default, alias = "labelAlt")]
    pub label_alt: String,

    #[serde(default)]
    pub href: String,

    /// Written from array position; whatever a document carries is ignored.
    #[serde(default, skip_deserializing)]
    pub order: usize,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<StoredMenuItem>,
}

/// Persisted singleton document.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct StoredSiteConfig {
    pub id: String,

    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub logo_size: Option<u32>,

    #[serde(default)]
    pub favicon_url: Option<String>,
    #[serde(default)]
    pub favicon_size: Option<u32>,

    #[serde(default)]
    pub site_name: Option<String>,
    #[serde(default)]
    pub site_name_alt: Option<String>,

    #[serde(default, deserialize_with = "menu_items_lenient")]
    pub menu_items: Vec<StoredMenuItem>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// `menu_items` has been observed both as a JSON array and as a JSON string
/// holding the array (text column). Null means an empty menu.
fn menu_items_lenient<'de, D>(deserializer: D) -> Result<Vec<StoredMenuItem>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let raw = serde_json::Value::deserialize(deserializer)?;
    match raw {
        serde_json::Value::Null => Ok(vec![]),
        serde_json::Value::String(s) if s.trim().is_empty() => Ok(vec![]),
        serde_json::Value::String(s) => serde_json::from_str(&s).map_err(D::Error::custom),
        v @ serde_json::Value::Array(_) => serde_json::from_value(v).map_err(D::Error::custom),
        other => Err(D::Error::custom(format!(
            "menu_items must be an array, got {other}"
        ))),
    }
}

fn to_stored_items(items: &[Arc<MenuItem>]) -> Vec<StoredMenuItem> {
    items
        .iter()
        .enumerate()
        .map(|(order, item)| StoredMenuItem {
            id: item.id.clone(),
            label: item.label.clone(),
            label_alt: item.label_alt.clone(),
            href: item.href.clone(),
            order,
            icon: item.icon.clone(),
            children: to_stored_items(&item.children),
        })
        .collect()
}

/// Stored items to in-memory items. Empty or repeated ids get fresh ones; the
/// first occurrence of an id keeps it. Returns `(old, new)` for every repair.
fn from_stored_items(
    items: Vec<StoredMenuItem>,
    seen: &mut HashSet<String>,
    all_ids: &HashSet<String>,
    repairs: &mut Vec<(String, String)>,
) -> Vec<Arc<MenuItem>> {
    items
        .into_iter()
        .map(|stored| {
            let id = if stored.id.trim().is_empty() || seen.contains(&stored.id) {
                let fresh = fresh_id_avoiding(|c| all_ids.contains(c) || seen.contains(c));
                repairs.push((stored.id.clone(), fresh.clone()));
                fresh
            } else {
                stored.id
            };
            seen.insert(id.clone());

            let icon = stored.icon.filter(|s| !s.trim().is_empty());
            let children = from_stored_items(stored.children, seen, all_ids, repairs);

            Arc::new(MenuItem {
                id,
                label: stored.label,
                label_alt: stored.label_alt,
                href: stored.href,
                icon,
                children,
            })
        })
        .collect()
}

fn collect_stored_ids(items: &[StoredMenuItem], out: &mut HashSet<String>) {
    for item in items {
        out.insert(item.id.clone());
        collect_stored_ids(&item.children, out);
    }
}

impl MenuTree {
    pub(crate) fn to_stored(&self) -> Vec<StoredMenuItem> {
        to_stored_items(self.roots())
    }

    /// Builds a tree from its stored form, repairing ids so that the result
    /// always holds the global-uniqueness invariant.
    pub(crate) fn from_stored(items: Vec<StoredMenuItem>) -> (Self, Vec<(String, String)>) {
        let mut all_ids = HashSet::new();
        collect_stored_ids(&items, &mut all_ids);

        let mut seen = HashSet::new();
        let mut repairs = Vec::new();
        let roots = from_stored_items(items, &mut seen, &all_ids, &mut repairs);
        (MenuTree::from_shared(roots), repairs)
    }
}

impl SiteNavigationConfig {
    pub(crate) fn to_stored(&self, key: &str) -> StoredSiteConfig {
        StoredSiteConfig {
            id: key.to_string(),
            logo_url: Some(self.logo.src.clone()),
            logo_size: Some(self.logo.size),
            favicon_url: Some(self.favicon.src.clone()),
            favicon_size: Some(self.favicon.size),
            site_name: Some(self.site_name.clone()),
            site_name_alt: Some(self.site_name_alt.clone()),
            menu_items: self.menu.to_stored(),
            updated_at: None,
        }
    }

    /// Missing scalar fields fall back to the default configuration.
    pub(crate) fn from_stored(stored: StoredSiteConfig) -> (Self, Vec<(String, String)>) {
        let defaults = SiteNavigationConfig::default();
        let (menu, repairs) = MenuTree::from_stored(stored.menu_items);

        let config = SiteNavigationConfig {
            logo: ImageRef {
                src: stored.logo_url.unwrap_or(defaults.logo.src),
                size: stored.logo_size.filter(|s| *s > 0).unwrap_or(defaults.logo.size),
            },
            favicon: ImageRef {
                src: stored.favicon_url.unwrap_or(defaults.favicon.src),
                size: stored
                    .favicon_size
                    .filter(|s| *s > 0)
                    .unwrap_or(defaults.favicon.size),
            },
            site_name: stored.site_name.unwrap_or(defaults.site_name),
            site_name_alt: stored.site_name_alt.unwrap_or_default(),
            menu,
        };
        (config, repairs)
    }
}
