//! Pure menu-tree edits.
//!
//! Every operation takes a tree and returns a new one. Nodes on the path to
//! the edit are rebuilt; everything else is shared with the input through
//! `Arc`. A target id that does not exist leaves the tree structurally
//! unchanged.

use crate::models::{fresh_menu_item_id, MenuItem, MenuTree};
use std::sync::Arc;
use strum::{AsRefStr, Display, EnumString};

/// Scalar item fields the admin console edits in place.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, AsRefStr, EnumString)]
#[strum(serialize_all = "snake_case")]
pub(crate) enum MenuField {
    Label,
    LabelAlt,
    Href,
    /// An empty value clears the icon.
    Icon,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, AsRefStr, EnumString)]
#[strum(serialize_all = "snake_case")]
pub(crate) enum MoveDirection {
    #[strum(serialize = "earlier", serialize = "up")]
    Earlier,
    #[strum(serialize = "later", serialize = "down")]
    Later,
}

/// Fields applied by [`upsert_child_by_label`]; `None` leaves a field alone.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct MenuItemPatch {
    pub label_alt: Option<String>,
    pub href: Option<String>,
    pub icon: Option<String>,
}

impl MenuItemPatch {
    fn apply(&self, item: &MenuItem) -> MenuItem {
        let mut next = item.with_children(item.children.clone());
        if let Some(label_alt) = &self.label_alt {
            next.label_alt = label_alt.clone();
        }
        if let Some(href) = &self.href {
            next.href = href.clone();
        }
        if let Some(icon) = &self.icon {
            next.icon = non_empty(icon);
        }
        next
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Finds the sibling list holding `id` and replaces it with `rewrite(list, index)`.
///
/// Ancestors of that list are rebuilt around the new list. `None` means nothing
/// changed: either `id` is absent or `rewrite` declined.
fn rewrite_sibling_list<F>(
    items: &[Arc<MenuItem>],
    id: &str,
    rewrite: &mut F,
) -> Option<Vec<Arc<MenuItem>>>
where
    F: FnMut(&[Arc<MenuItem>], usize) -> Option<Vec<Arc<MenuItem>>>,
{
    if let Some(idx) = items.iter().position(|i| i.id == id) {
        return rewrite(items, idx);
    }

    for (idx, item) in items.iter().enumerate() {
        if let Some(children) = rewrite_sibling_list(&item.children, id, &mut *rewrite) {
            let mut next = items.to_vec();
            next[idx] = Arc::new(item.with_children(children));
            return Some(next);
        }
    }

    None
}

fn apply(tree: &MenuTree, rewritten: Option<Vec<Arc<MenuItem>>>) -> MenuTree {
    match rewritten {
        Some(roots) => MenuTree::from_shared(roots),
        None => tree.clone(),
    }
}

/// Replaces the node `id` with `f(node)`.
fn map_node(tree: &MenuTree, id: &str, f: impl Fn(&MenuItem) -> MenuItem) -> MenuTree {
    let rewritten = rewrite_sibling_list(tree.roots(), id, &mut |list, idx| {
        let mut next = list.to_vec();
        next[idx] = Arc::new(f(&list[idx]));
        Some(next)
    });
    apply(tree, rewritten)
}

pub(crate) fn update_field(tree: &MenuTree, id: &str, field: MenuField, value: &str) -> MenuTree {
    map_node(tree, id, |item| {
        let mut next = item.with_children(item.children.clone());
        match field {
            MenuField::Label => next.label = value.to_string(),
            MenuField::LabelAlt => next.label_alt = value.to_string(),
            MenuField::Href => next.href = value.to_string(),
            MenuField::Icon => next.icon = non_empty(value),
        }
        next
    })
}

/// Removes the node and its whole subtree.
pub(crate) fn delete_node(tree: &MenuTree, id: &str) -> MenuTree {
    let rewritten = rewrite_sibling_list(tree.roots(), id, &mut |list, idx| {
        let mut next = list.to_vec();
        next.remove(idx);
        Some(next)
    });
    apply(tree, rewritten)
}

/// Swaps the node with its neighbour; a no-op at either end of its list.
pub(crate) fn move_sibling(tree: &MenuTree, id: &str, direction: MoveDirection) -> MenuTree {
    let rewritten = rewrite_sibling_list(tree.roots(), id, &mut |list, idx| {
        let other = match direction {
            MoveDirection::Earlier => idx.checked_sub(1)?,
            MoveDirection::Later => Some(idx + 1).filter(|o| *o < list.len())?,
        };
        let mut next = list.to_vec();
        next.swap(idx, other);
        Some(next)
    });
    apply(tree, rewritten)
}

/// Appends a blank leaf to `parent_id`'s children.
pub(crate) fn add_child(tree: &MenuTree, parent_id: &str) -> MenuTree {
    if !tree.contains(parent_id) {
        return tree.clone();
    }

    let child = Arc::new(MenuItem::blank(fresh_menu_item_id(tree)));
    map_node(tree, parent_id, move |parent| {
        let mut children = parent.children.clone();
        children.push(Arc::clone(&child));
        parent.with_children(children)
    })
}

/// Appends a blank leaf to the root list.
pub(crate) fn add_root(tree: &MenuTree) -> MenuTree {
    let mut roots = tree.roots().to_vec();
    roots.push(Arc::new(MenuItem::blank(fresh_menu_item_id(tree))));
    MenuTree::from_shared(roots)
}

fn same_label(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

/// Patches the first child of `parent` (`None` = root list) labelled `label`,
/// or appends a new child carrying `label` and `patch` when there is none.
///
/// Labels match after trimming, ignoring case. Repeating a call is idempotent.
pub(crate) fn upsert_child_by_label(
    tree: &MenuTree,
    parent: Option<&str>,
    label: &str,
    patch: &MenuItemPatch,
) -> MenuTree {
    let Some(siblings) = tree.children_of(parent) else {
        return tree.clone();
    };

    if let Some(existing) = siblings.iter().find(|s| same_label(&s.label, label)) {
        let id = existing.id.clone();
        return map_node(tree, &id, |item| patch.apply(item));
    }

    let mut item = MenuItem::blank(fresh_menu_item_id(tree));
    item.label = label.trim().to_string();
    let item = Arc::new(patch.apply(&item));

    match parent {
        None => {
            let mut roots = tree.roots().to_vec();
            roots.push(item);
            MenuTree::from_shared(roots)
        }
        Some(pid) => map_node(tree, pid, move |p| {
            let mut children = p.children.clone();
            children.push(Arc::clone(&item));
            p.with_children(children)
        }),
    }
}
