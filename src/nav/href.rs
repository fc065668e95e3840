use crate::models::PLACEHOLDER_HREF;

/// How the hosting page should treat a menu item's href.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum HrefKind {
    /// Parent-only entry; activating it never navigates.
    Placeholder,
    /// In-page anchor. An empty `path` means the current page.
    Anchor { path: String, fragment: String },
    External,
    Route,
}

impl HrefKind {
    pub fn classify(href: &str) -> Self {
        let href = href.trim();
        if href.is_empty() || href == PLACEHOLDER_HREF {
            return HrefKind::Placeholder;
        }

        let lower = href.to_ascii_lowercase();
        if ["http://", "https://", "mailto:", "tel:", "//"]
            .iter()
            .any(|p| lower.starts_with(p))
        {
            return HrefKind::External;
        }

        if let Some((path, fragment)) = href.split_once('#') {
            if fragment.is_empty() {
                return HrefKind::Route;
            }
            return HrefKind::Anchor {
                path: path.to_string(),
                fragment: fragment.to_string(),
            };
        }

        HrefKind::Route
    }

    pub fn is_navigable(&self) -> bool {
        !matches!(self, HrefKind::Placeholder)
    }
}

/// Route part of an href, without any trailing `#`.
pub(crate) fn route_path(href: &str) -> &str {
    let href = href.trim();
    href.split_once('#').map(|(p, _)| p).unwrap_or(href)
}

/// Whether an anchor's path points at the page currently shown.
pub(crate) fn is_same_page(anchor_path: &str, current_path: &str) -> bool {
    let norm = |p: &str| {
        let p = p.trim_end_matches('/');
        if p.is_empty() {
            "/".to_string()
        } else {
            p.to_string()
        }
    };
    anchor_path.is_empty() || norm(anchor_path) == norm(current_path)
}
