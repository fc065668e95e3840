//! Touch-oriented menu: a vertical list where branches expand in place.

use crate::models::{Language, MenuItem, MenuTree};
use icons::ChevronDown;
use leptos::prelude::*;
use std::sync::Arc;
use tw_merge::tw_merge;

const INDENT_STEP_PX: u32 = 16;

/// Horizontal offset of a row at `depth`.
pub(crate) fn indent_px(depth: usize) -> u32 {
    INDENT_STEP_PX * depth as u32
}

/// Expanded branches as a chain, like [`super::dropdown::DropdownState`]:
/// expanding an item collapses its expanded sibling.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct AccordionState {
    expanded: Vec<String>,
}

impl AccordionState {
    pub fn is_expanded(&self, depth: usize, id: &str) -> bool {
        self.expanded.get(depth).map(String::as_str) == Some(id)
    }

    /// Collapsing a branch also collapses everything under it.
    pub fn toggle(&mut self, depth: usize, id: &str) {
        if self.is_expanded(depth, id) {
            self.expanded.truncate(depth);
            return;
        }
        if self.expanded.len() < depth {
            return;
        }
        self.expanded.truncate(depth);
        self.expanded.push(id.to_string());
    }

    pub fn collapse_all(&mut self) {
        self.expanded.clear();
    }

    pub fn prune(&mut self, tree: &MenuTree) {
        let mut level: &[Arc<MenuItem>] = tree.roots();
        for depth in 0..self.expanded.len() {
            let id = &self.expanded[depth];
            match level.iter().find(|i| &i.id == id && i.has_children()) {
                Some(item) => level = &item.children,
                None => {
                    self.expanded.truncate(depth);
                    return;
                }
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct AccordionRow {
    pub item: Arc<MenuItem>,
    pub depth: usize,
    pub expanded: bool,
}

/// Rows currently shown, in pre-order.
pub(crate) fn visible_rows(tree: &MenuTree, state: &AccordionState) -> Vec<AccordionRow> {
    fn walk(
        items: &[Arc<MenuItem>],
        depth: usize,
        state: &AccordionState,
        out: &mut Vec<AccordionRow>,
    ) {
        for item in items {
            let expanded = item.has_children() && state.is_expanded(depth, &item.id);
            out.push(AccordionRow {
                item: item.clone(),
                depth,
                expanded,
            });
            if expanded {
                walk(&item.children, depth + 1, state, out);
            }
        }
    }

    let mut out = Vec::new();
    walk(tree.roots(), 0, state, &mut out);
    out
}

#[component]
pub fn AccordionNav(
    #[prop(into)] tree: Signal<MenuTree>,
    #[prop(into)] language: Signal<Language>,
    on_navigate: Callback<String>,
    #[prop(optional, into)] class: String,
) -> impl IntoView {
    let state: RwSignal<AccordionState> = RwSignal::new(AccordionState::default());

    Effect::new(move |_| {
        tree.with(|t| state.update(|s| s.prune(t)));
    });

    let rows = Memo::new(move |_| tree.with(|t| state.with(|s| visible_rows(t, s))));

    let class = tw_merge!("flex flex-col", class);

    view! {
        <nav data-name="AccordionNav" class=class>
            <ul class="flex flex-col">
                {move || {
                    rows.get()
                        .into_iter()
                        .map(|row| {
                            view! {
                                <AccordionRowView
                                    row=row
                                    language=language
                                    state=state
                                    on_navigate=on_navigate
                                />
                            }
                        })
                        .collect_view()
                }}
            </ul>
        </nav>
    }
}

#[component]
fn AccordionRowView(
    row: AccordionRow,
    language: Signal<Language>,
    state: RwSignal<AccordionState>,
    on_navigate: Callback<String>,
) -> impl IntoView {
    let AccordionRow {
        item,
        depth,
        expanded,
    } = row;

    let href = item.href.clone();
    let nav_href = item.href.clone();
    let label_item = item.clone();
    let id = item.id.clone();

    let row_class = tw_merge!(
        "flex items-center justify-between",
        if depth > 0 { "border-l border-border" } else { "" }
    );

    let toggle = item.has_children().then(|| {
        let chevron = if expanded {
            "size-4 rotate-180 transition-transform"
        } else {
            "size-4 transition-transform"
        };
        view! {
            <button
                type="button"
                class="inline-flex size-9 items-center justify-center rounded-md hover:bg-accent"
                aria-label="Toggle section"
                aria-expanded=expanded.to_string()
                on:click=move |_| state.update(|s| s.toggle(depth, &id))
            >
                <ChevronDown class=chevron />
            </button>
        }
    });

    view! {
        <li style=format!("margin-left: {}px", indent_px(depth))>
            <div class=row_class>
                <a
                    href=href
                    class="flex flex-1 items-center gap-2 px-3 py-2 text-sm text-foreground hover:text-primary"
                    on:click=move |ev| {
                        ev.prevent_default();
                        on_navigate.run(nav_href.clone());
                    }
                >
                    {item.icon.clone().map(|src| view! { <img src=src alt="" class="size-4 object-contain" /> })}
                    <span>{move || label_item.display_label(language.get()).to_string()}</span>
                </a>
                {toggle}
            </div>
        </li>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tree() -> MenuTree {
        MenuTree::new(vec![
            MenuItem::new("home", "Home", "/"),
            MenuItem::new("products", "Products", "#")
                .with_child(
                    MenuItem::new("cat", "Categories", "#")
                        .with_child(MenuItem::new("pumps", "Pumps", "/products/pumps")),
                )
                .with_child(MenuItem::new("all", "All products", "/products")),
            MenuItem::new("contact", "Contact", "/#contact"),
        ])
    }

    fn row_ids(rows: &[AccordionRow]) -> Vec<(&str, usize)> {
        rows.iter().map(|r| (r.item.id.as_str(), r.depth)).collect()
    }

    #[test]
    fn test_collapsed_shows_roots_only() {
        let rows = visible_rows(&tree(), &AccordionState::default());
        assert_eq!(row_ids(&rows), vec![("home", 0), ("products", 0), ("contact", 0)]);
        assert!(rows.iter().all(|r| !r.expanded));
    }

    #[test]
    fn test_expanded_rows_are_preorder_with_depth() {
        let mut s = AccordionState::default();
        s.toggle(0, "products");
        s.toggle(1, "cat");

        let rows = visible_rows(&tree(), &s);
        assert_eq!(
            row_ids(&rows),
            vec![
                ("home", 0),
                ("products", 0),
                ("cat", 1),
                ("pumps", 2),
                ("all", 1),
                ("contact", 0),
            ]
        );
        assert!(rows[1].expanded);
        assert_eq!(indent_px(rows[3].depth), 2 * INDENT_STEP_PX);
    }

    #[test]
    fn test_collapsing_parent_hides_descendants() {
        let mut s = AccordionState::default();
        s.toggle(0, "products");
        s.toggle(1, "cat");
        s.toggle(0, "products");

        assert_eq!(s, AccordionState::default());
        assert_eq!(visible_rows(&tree(), &s).len(), 3);
    }

    #[test]
    fn test_leaf_is_never_marked_expanded() {
        let mut s = AccordionState::default();
        s.toggle(0, "home");
        let rows = visible_rows(&tree(), &s);
        assert_eq!(rows.len(), 3);
        assert!(!rows[0].expanded);
    }

    #[test]
    fn test_prune_drops_removed_branch() {
        use crate::editor::ops::delete_node;

        let mut s = AccordionState::default();
        s.toggle(0, "products");
        s.toggle(1, "cat");

        s.prune(&delete_node(&tree(), "products"));
        assert_eq!(s, AccordionState::default());

        s.toggle(0, "products");
        s.collapse_all();
        assert_eq!(s, AccordionState::default());
    }
}
