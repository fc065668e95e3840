use std::collections::HashSet;
use std::sync::Arc;

use strum::{AsRefStr, Display, EnumString};

/// Href given to freshly created items: "no navigation, parent-only".
pub(crate) const PLACEHOLDER_HREF: &str = "#";

/// Which of the two label variants a consumer displays.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Display, AsRefStr, EnumString)]
#[strum(serialize_all = "lowercase")]
pub(crate) enum Language {
    #[default]
    Primary,
    Secondary,
}

impl Language {
    pub fn toggled(self) -> Self {
        match self {
            Language::Primary => Language::Secondary,
            Language::Secondary => Language::Primary,
        }
    }
}

/// One entry of the navigation menu.
///
/// Sibling order is the position inside the parent's `children` (or the root
/// list). The persisted `order` ordinal is derived from that position when the
/// tree is written out and never stored here.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct MenuItem {
    pub id: String,
    pub label: String,
    pub label_alt: String,
    pub href: String,
    /// URL or inlined data URI; rendered as an `src` without interpretation.
    pub icon: Option<String>,
    pub children: Vec<Arc<MenuItem>>,
}

impl MenuItem {
    /// A leaf with empty labels and the placeholder href.
    pub fn blank(id: String) -> Self {
        Self {
            id,
            label: String::new(),
            label_alt: String::new(),
            href: PLACEHOLDER_HREF.to_string(),
            icon: None,
            children: vec![],
        }
    }

    pub fn new(id: impl Into<String>, label: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            label_alt: String::new(),
            href: href.into(),
            icon: None,
            children: vec![],
        }
    }

    #[cfg(test)]
    pub fn with_label_alt(mut self, label_alt: impl Into<String>) -> Self {
        self.label_alt = label_alt.into();
        self
    }

    pub fn with_child(mut self, child: MenuItem) -> Self {
        self.children.push(Arc::new(child));
        self
    }

    /// Same fields, different children. Used when rebuilding the path to an edit.
    pub fn with_children(&self, children: Vec<Arc<MenuItem>>) -> Self {
        Self {
            id: self.id.clone(),
            label: self.label.clone(),
            label_alt: self.label_alt.clone(),
            href: self.href.clone(),
            icon: self.icon.clone(),
            children,
        }
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn display_label(&self, language: Language) -> &str {
        match language {
            Language::Secondary if !self.label_alt.trim().is_empty() => &self.label_alt,
            _ => &self.label,
        }
    }
}

/// The ordered root sequence of the navigation menu.
///
/// Values are treated as immutable snapshots: editor operations build a new
/// tree and share every untouched subtree with the previous one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct MenuTree {
    roots: Vec<Arc<MenuItem>>,
}

impl MenuTree {
    pub fn new(roots: Vec<MenuItem>) -> Self {
        Self {
            roots: roots.into_iter().map(Arc::new).collect(),
        }
    }

    pub(crate) fn from_shared(roots: Vec<Arc<MenuItem>>) -> Self {
        Self { roots }
    }

    pub fn roots(&self) -> &[Arc<MenuItem>] {
        &self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Total node count at every depth.
    pub fn len(&self) -> usize {
        fn count(items: &[Arc<MenuItem>]) -> usize {
            items.iter().map(|i| 1 + count(&i.children)).sum()
        }
        count(&self.roots)
    }

    pub fn find(&self, id: &str) -> Option<&Arc<MenuItem>> {
        fn walk<'a>(items: &'a [Arc<MenuItem>], id: &str) -> Option<&'a Arc<MenuItem>> {
            for item in items {
                if item.id == id {
                    return Some(item);
                }
                if let Some(found) = walk(&item.children, id) {
                    return Some(found);
                }
            }
            None
        }
        walk(&self.roots, id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    /// Every id in pre-order.
    pub fn ids(&self) -> Vec<&str> {
        fn collect<'a>(items: &'a [Arc<MenuItem>], out: &mut Vec<&'a str>) {
            for item in items {
                out.push(item.id.as_str());
                collect(&item.children, out);
            }
        }
        let mut out = Vec::new();
        collect(&self.roots, &mut out);
        out
    }

    /// Ids that occur more than once, each reported once, in pre-order of their
    /// second occurrence.
    pub fn duplicate_ids(&self) -> Vec<String> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut dups: Vec<String> = Vec::new();
        for id in self.ids() {
            if !seen.insert(id) && !dups.iter().any(|d| d == id) {
                dups.push(id.to_string());
            }
        }
        dups
    }

    /// Root items are depth 0; every child is its parent's depth + 1.
    pub fn depth_of(&self, id: &str) -> Option<usize> {
        fn walk(items: &[Arc<MenuItem>], id: &str, depth: usize) -> Option<usize> {
            for item in items {
                if item.id == id {
                    return Some(depth);
                }
                if let Some(d) = walk(&item.children, id, depth + 1) {
                    return Some(d);
                }
            }
            None
        }
        walk(&self.roots, id, 0)
    }

    /// `(index, sibling count)` of the node inside its own sibling list.
    pub fn sibling_position(&self, id: &str) -> Option<(usize, usize)> {
        fn walk(items: &[Arc<MenuItem>], id: &str) -> Option<(usize, usize)> {
            if let Some(idx) = items.iter().position(|i| i.id == id) {
                return Some((idx, items.len()));
            }
            items.iter().find_map(|i| walk(&i.children, id))
        }
        walk(&self.roots, id)
    }

    /// The sibling list a node with `parent` would belong to (`None` = roots).
    pub fn children_of(&self, parent: Option<&str>) -> Option<&[Arc<MenuItem>]> {
        match parent {
            None => Some(&self.roots),
            Some(pid) => self.find(pid).map(|p| p.children.as_slice()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MenuTree {
        MenuTree::new(vec![
            MenuItem::new("home", "Home", "/"),
            MenuItem::new("products", "Products", "#")
                .with_child(
                    MenuItem::new("cat", "Categories", "#")
                        .with_child(MenuItem::new("pumps", "Pumps", "/products/pumps")),
                )
                .with_child(MenuItem::new("all", "All products", "/products")),
        ])
    }

    #[test]
    fn test_find_reaches_every_depth() {
        let tree = sample();
        assert_eq!(tree.find("pumps").map(|i| i.label.as_str()), Some("Pumps"));
        assert!(tree.find("missing").is_none());
        assert_eq!(tree.len(), 5);
    }

    #[test]
    fn test_ids_are_preorder() {
        let tree = sample();
        assert_eq!(tree.ids(), vec!["home", "products", "cat", "pumps", "all"]);
        assert!(tree.duplicate_ids().is_empty());
    }

    #[test]
    fn test_duplicate_ids_reported_once() {
        let tree = MenuTree::new(vec![
            MenuItem::new("a", "A", "/a").with_child(MenuItem::new("a", "A2", "/a2")),
            MenuItem::new("a", "A3", "/a3"),
        ]);
        assert_eq!(tree.duplicate_ids(), vec!["a".to_string()]);
    }

    #[test]
    fn test_depth_is_parent_plus_one() {
        let tree = sample();
        assert_eq!(tree.depth_of("home"), Some(0));
        assert_eq!(tree.depth_of("cat"), Some(1));
        assert_eq!(tree.depth_of("pumps"), Some(2));
        assert_eq!(tree.depth_of("nope"), None);
    }

    #[test]
    fn test_sibling_position() {
        let tree = sample();
        assert_eq!(tree.sibling_position("products"), Some((1, 2)));
        assert_eq!(tree.sibling_position("all"), Some((1, 2)));
        assert_eq!(tree.sibling_position("pumps"), Some((0, 1)));
    }

    #[test]
    fn test_display_label_falls_back_to_primary() {
        let item = MenuItem::new("1", "Products", "/products");
        assert_eq!(item.display_label(Language::Secondary), "Products");

        let item = item.with_label_alt("Produits");
        assert_eq!(item.display_label(Language::Secondary), "Produits");
        assert_eq!(item.display_label(Language::Primary), "Products");
    }

    #[test]
    fn test_language_parses_from_storage_value() {
        assert_eq!("secondary".parse::<Language>().ok(), Some(Language::Secondary));
        assert_eq!(Language::Primary.as_ref(), "primary");
        assert_eq!(Language::Primary.toggled(), Language::Secondary);
    }
}
