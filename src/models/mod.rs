mod ids;
mod menu;
mod site_config;
mod stored;

pub(crate) use ids::fresh_menu_item_id;
pub(crate) use menu::{Language, MenuItem, MenuTree, PLACEHOLDER_HREF};
pub(crate) use site_config::{SiteField, SiteNavigationConfig, SITE_NAV_CONFIG_KEY};
pub(crate) use stored::StoredSiteConfig;

#[cfg(test)]
pub(crate) use stored::StoredMenuItem;
