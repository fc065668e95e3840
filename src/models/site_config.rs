use super::menu::{Language, MenuItem, MenuTree};

/// Primary key of the singleton navigation document.
pub(crate) const SITE_NAV_CONFIG_KEY: &str = "main";

/// An image reference plus its display size in CSS pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ImageRef {
    pub src: String,
    pub size: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct SiteNavigationConfig {
    pub logo: ImageRef,
    pub favicon: ImageRef,
    pub site_name: String,
    pub site_name_alt: String,
    pub menu: MenuTree,
}

impl SiteNavigationConfig {
    pub fn display_name(&self, language: Language) -> &str {
        match language {
            Language::Secondary if !self.site_name_alt.trim().is_empty() => &self.site_name_alt,
            _ => &self.site_name,
        }
    }
}

/// Site-level scalar fields editable from the admin console.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SiteField {
    SiteName,
    SiteNameAlt,
    LogoSrc,
    LogoSize,
    FaviconSrc,
    FaviconSize,
}

impl SiteNavigationConfig {
    /// Returns a copy with one field replaced. Sizes that do not parse as a
    /// positive integer leave the previous size in place.
    pub fn with_field(&self, field: SiteField, value: &str) -> Self {
        let mut next = self.clone();
        let parse_size = |prev: u32| value.trim().parse::<u32>().ok().filter(|s| *s > 0).unwrap_or(prev);
        match field {
            SiteField::SiteName => next.site_name = value.to_string(),
            SiteField::SiteNameAlt => next.site_name_alt = value.to_string(),
            SiteField::LogoSrc => next.logo.src = value.to_string(),
            SiteField::LogoSize => next.logo.size = parse_size(next.logo.size),
            SiteField::FaviconSrc => next.favicon.src = value.to_string(),
            SiteField::FaviconSize => next.favicon.size = parse_size(next.favicon.size),
        }
        next
    }
}

impl Default for SiteNavigationConfig {
    /// Hard-coded fallback used when no document is stored or it cannot be read.
    fn default() -> Self {
        Self {
            logo: ImageRef {
                src: "/images/logo.png".to_string(),
                size: 40,
            },
            favicon: ImageRef {
                src: "/favicon.ico".to_string(),
                size: 32,
            },
            site_name: "Catalog".to_string(),
            site_name_alt: String::new(),
            menu: MenuTree::new(vec![
                MenuItem::new("home", "Home", "/"),
                MenuItem::new("products", "Products", "#")
                    .with_child(MenuItem::new("products-all", "All products", "/products")),
                MenuItem::new("partners", "Partners", "/#partners"),
                MenuItem::new("contact", "Contact", "/#contact"),
            ]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_menu_has_unique_ids() {
        let config = SiteNavigationConfig::default();
        assert!(!config.menu.is_empty());
        assert!(config.menu.duplicate_ids().is_empty());
    }

    #[test]
    fn test_with_field_rejects_bad_sizes() {
        let config = SiteNavigationConfig::default();
        let next = config.with_field(SiteField::LogoSize, "abc");
        assert_eq!(next.logo.size, config.logo.size);

        let next = config.with_field(SiteField::LogoSize, "0");
        assert_eq!(next.logo.size, config.logo.size);

        let next = config.with_field(SiteField::LogoSize, " 56 ");
        assert_eq!(next.logo.size, 56);
    }

    #[test]
    fn test_with_field_leaves_menu_untouched() {
        let config = SiteNavigationConfig::default();
        let next = config.with_field(SiteField::SiteNameAlt, "Katalog");
        assert_eq!(next.site_name_alt, "Katalog");
        assert_eq!(next.display_name(Language::Secondary), "Katalog");
        assert_eq!(next.menu, config.menu);
    }
}
