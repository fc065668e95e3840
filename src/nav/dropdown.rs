//! Pointer-oriented menu: nested flyout panels, one open entry per panel.

use super::href::HrefKind;
use crate::models::{Language, MenuItem, MenuTree};
use icons::{ChevronDown, ChevronRight};
use leptos::ev;
use leptos::prelude::*;
use leptos_dom::helpers::window_event_listener;
use std::sync::Arc;
use tw_merge::tw_merge;

/// Open flyouts as a chain: `open[d]` is the open entry among the items at depth `d`.
///
/// Only the chain can be visible at once, so one open id per depth is the
/// whole of the per-panel state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct DropdownState {
    open: Vec<String>,
}

impl DropdownState {
    pub fn open_at(&self, depth: usize) -> Option<&str> {
        self.open.get(depth).map(String::as_str)
    }

    pub fn is_open(&self, depth: usize, id: &str) -> bool {
        self.open_at(depth) == Some(id)
    }

    /// Opens `id`'s panel, closing its open sibling and anything below it.
    /// Ignored when the panel holding `id` is not open itself.
    pub fn open(&mut self, depth: usize, id: &str) {
        if self.open.len() < depth {
            return;
        }
        self.open.truncate(depth);
        self.open.push(id.to_string());
    }

    pub fn close(&mut self, depth: usize, id: &str) {
        if self.is_open(depth, id) {
            self.open.truncate(depth);
        }
    }

    pub fn close_all(&mut self) {
        self.open.clear();
    }

    /// Click/tap/Enter on an entry. Returns the href to navigate to, if any.
    ///
    /// Navigable entries close every panel. Placeholder entries only toggle
    /// their own panel.
    pub fn activate(&mut self, depth: usize, item: &MenuItem) -> Option<String> {
        if HrefKind::classify(&item.href).is_navigable() {
            self.close_all();
            return Some(item.href.clone());
        }

        if item.has_children() {
            if self.is_open(depth, &item.id) {
                self.close(depth, &item.id);
            } else {
                self.open(depth, &item.id);
            }
        }
        None
    }

    /// Drops open entries that no longer exist (or lost their children).
    pub fn prune(&mut self, tree: &MenuTree) {
        let mut level: &[Arc<MenuItem>] = tree.roots();
        for depth in 0..self.open.len() {
            let id = &self.open[depth];
            match level.iter().find(|i| &i.id == id && i.has_children()) {
                Some(item) => level = &item.children,
                None => {
                    self.open.truncate(depth);
                    return;
                }
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct DropdownPanel {
    pub parent_id: String,
    /// Depth of the items listed in this panel.
    #[allow(dead_code)]
    pub depth: usize,
    #[allow(dead_code)]
    pub items: Vec<Arc<MenuItem>>,
}

/// Panels currently shown, outermost first.
pub(crate) fn open_panels(tree: &MenuTree, state: &DropdownState) -> Vec<DropdownPanel> {
    let mut out = Vec::new();
    let mut level: &[Arc<MenuItem>] = tree.roots();
    let mut depth = 0;

    while let Some(open_id) = state.open_at(depth) {
        let Some(parent) = level.iter().find(|i| i.id == open_id && i.has_children()) else {
            break;
        };
        out.push(DropdownPanel {
            parent_id: parent.id.clone(),
            depth: depth + 1,
            items: parent.children.clone(),
        });
        level = &parent.children;
        depth += 1;
    }

    out
}

/// Where a panel sits relative to the entry that opened it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PanelPlacement {
    /// Under a top-bar entry.
    Below,
    /// To the side of the parent panel, so the two never overlap.
    Beside,
}

impl PanelPlacement {
    pub fn for_depth(depth: usize) -> Self {
        if depth == 0 {
            PanelPlacement::Below
        } else {
            PanelPlacement::Beside
        }
    }

    fn class(self) -> &'static str {
        match self {
            PanelPlacement::Below => "left-0 top-full mt-1",
            PanelPlacement::Beside => "left-full top-0 ml-1",
        }
    }
}

#[component]
pub fn DropdownNav(
    #[prop(into)] tree: Signal<MenuTree>,
    #[prop(into)] language: Signal<Language>,
    on_navigate: Callback<String>,
    #[prop(optional, into)] class: String,
) -> impl IntoView {
    let state: RwSignal<DropdownState> = RwSignal::new(DropdownState::default());

    Effect::new(move |_| {
        tree.with(|t| state.update(|s| s.prune(t)));
    });

    let esc = window_event_listener(ev::keydown, move |ev: web_sys::KeyboardEvent| {
        if ev.key() == "Escape" {
            state.update(DropdownState::close_all);
        }
    });
    on_cleanup(move || esc.remove());

    let root_ids = Memo::new(move |_| {
        tree.with(|t| t.roots().iter().map(|i| i.id.clone()).collect::<Vec<_>>())
    });

    let open_path = move || {
        tree.with(|t| {
            state.with(|s| {
                open_panels(t, s)
                    .into_iter()
                    .map(|p| p.parent_id)
                    .collect::<Vec<_>>()
                    .join(" ")
            })
        })
    };

    let class = tw_merge!("relative", class);

    view! {
        <nav data-name="DropdownNav" data-open=open_path class=class>
            <ul class="flex items-center gap-1" role="menubar">
                <For
                    each=move || root_ids.get()
                    key=|id| id.clone()
                    children=move |id| {
                        view! {
                            <DropdownEntry
                                item_id=id
                                depth=0
                                tree=tree
                                language=language
                                state=state
                                on_navigate=on_navigate
                            />
                        }
                    }
                />
            </ul>
        </nav>
    }
}

#[component]
fn DropdownEntry(
    item_id: String,
    depth: usize,
    tree: Signal<MenuTree>,
    language: Signal<Language>,
    state: RwSignal<DropdownState>,
    on_navigate: Callback<String>,
) -> impl IntoView {
    let id_sv = StoredValue::new(item_id);

    let item = Memo::new(move |_| tree.with(|t| t.find(&id_sv.get_value()).cloned()));
    let child_ids = Memo::new(move |_| {
        item.get()
            .map(|i| i.children.iter().map(|c| c.id.clone()).collect::<Vec<_>>())
            .unwrap_or_default()
    });

    let has_children = move || child_ids.with(|c| !c.is_empty());
    let is_open = move || state.with(|s| s.is_open(depth, &id_sv.get_value()));

    let open_panel = move || {
        if has_children() {
            state.update(|s| s.open(depth, &id_sv.get_value()));
        }
    };

    let on_click = move |ev: web_sys::MouseEvent| {
        ev.prevent_default();
        let Some(item) = item.get_untracked() else {
            return;
        };

        let mut target = None;
        state.update(|s| target = s.activate(depth, &item));
        if let Some(href) = target {
            on_navigate.run(href);
        }
    };

    let entry_class = if depth == 0 {
        "inline-flex items-center gap-1.5 rounded-md px-3 py-2 text-sm font-medium text-foreground hover:bg-accent hover:text-accent-foreground"
    } else {
        "flex w-full items-center gap-2 rounded-sm px-3 py-1.5 text-sm text-popover-foreground hover:bg-accent hover:text-accent-foreground"
    };

    let panel_class = tw_merge!(
        "absolute z-50 min-w-[180px] rounded-md border bg-card p-1 shadow-md",
        PanelPlacement::for_depth(depth).class()
    );

    view! {
        <li
            class="relative"
            role="none"
            on:mouseenter=move |_| open_panel()
            on:mouseleave=move |_| state.update(|s| s.close(depth, &id_sv.get_value()))
            on:focusin=move |_| open_panel()
        >
            <a
                href=move || item.get().map(|i| i.href.clone()).unwrap_or_default()
                class=entry_class
                role="menuitem"
                aria-haspopup=move || has_children().to_string()
                aria-expanded=move || is_open().to_string()
                on:click=on_click
            >
                {move || {
                    item.get()
                        .and_then(|i| i.icon.clone())
                        .map(|src| view! { <img src=src alt="" class="size-4 object-contain" /> })
                }}
                <span class="truncate">
                    {move || {
                        item.get()
                            .map(|i| i.display_label(language.get()).to_string())
                            .unwrap_or_default()
                    }}
                </span>
                <Show when=has_children fallback=|| ()>
                    {if depth == 0 {
                        view! { <ChevronDown class="size-3.5 opacity-70" /> }.into_any()
                    } else {
                        view! { <ChevronRight class="ml-auto size-3.5 opacity-70" /> }.into_any()
                    }}
                </Show>
            </a>

            <Show when=move || is_open() && has_children() fallback=|| ()>
                <ul class=panel_class.clone() role="menu">
                    <For
                        each=move || child_ids.get()
                        key=|id| id.clone()
                        children=move |id| {
                            view! {
                                <DropdownEntry
                                    item_id=id
                                    depth=depth + 1
                                    tree=tree
                                    language=language
                                    state=state
                                    on_navigate=on_navigate
                                />
                            }
                            .into_any()
                        }
                    />
                </ul>
            </Show>
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
            MenuItem::new("services", "Services", "#")
                .with_child(MenuItem::new("repair", "Repair", "/services/repair")),
        ])
    }

    #[test]
    fn test_one_open_sibling_per_panel() {
        let mut s = DropdownState::default();
        s.open(0, "products");
        s.open(1, "cat");
        assert!(s.is_open(1, "cat"));

        // Opening a sibling at the top closes the old branch entirely.
        s.open(0, "services");
        assert!(s.is_open(0, "services"));
        assert!(!s.is_open(0, "products"));
        assert_eq!(s.open_at(1), None);
    }

    #[test]
    fn test_open_ignored_when_parent_panel_closed() {
        let mut s = DropdownState::default();
        s.open(2, "pumps");
        assert_eq!(s, DropdownState::default());
    }

    #[test]
    fn test_leave_closes_only_that_branch() {
        let mut s = DropdownState::default();
        s.open(0, "products");
        s.open(1, "cat");
        s.close(1, "cat");
        assert!(s.is_open(0, "products"));
        assert_eq!(s.open_at(1), None);

        // Leaving an entry that is not open changes nothing.
        s.close(0, "services");
        assert!(s.is_open(0, "products"));
    }

    #[test]
    fn test_activate_navigable_closes_everything() {
        let t = tree();
        let mut s = DropdownState::default();
        s.open(0, "products");
        s.open(1, "cat");

        let pumps = t.find("pumps").expect("pumps");
        assert_eq!(s.activate(2, pumps), Some("/products/pumps".to_string()));
        assert_eq!(s, DropdownState::default());
    }

    #[test]
    fn test_activate_placeholder_toggles_panel() {
        let t = tree();
        let products = t.find("products").expect("products");
        let mut s = DropdownState::default();

        assert_eq!(s.activate(0, products), None);
        assert!(s.is_open(0, "products"));
        assert_eq!(s.activate(0, products), None);
        assert!(!s.is_open(0, "products"));
    }

    #[test]
    fn test_open_panels_follow_chain() {
        let t = tree();
        let mut s = DropdownState::default();
        s.open(0, "products");
        s.open(1, "cat");

        let panels = open_panels(&t, &s);
        assert_eq!(panels.len(), 2);
        assert_eq!(panels[0].parent_id, "products");
        assert_eq!(panels[0].depth, 1);
        let ids: Vec<_> = panels[0].items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["cat", "all"]);
        assert_eq!(panels[1].parent_id, "cat");
        assert_eq!(panels[1].depth, 2);
    }

    #[test]
    fn test_panels_follow_array_order_after_move() {
        use crate::editor::ops::{move_sibling, MoveDirection};

        let t = move_sibling(&tree(), "all", MoveDirection::Earlier);
        let mut s = DropdownState::default();
        s.open(0, "products");
        let panels = open_panels(&t, &s);
        let ids: Vec<_> = panels[0].items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["all", "cat"]);
    }

    #[test]
    fn test_prune_after_delete() {
        use crate::editor::ops::delete_node;

        let mut s = DropdownState::default();
        s.open(0, "products");
        s.open(1, "cat");

        let t = delete_node(&tree(), "cat");
        s.prune(&t);
        assert!(s.is_open(0, "products"));
        assert_eq!(s.open_at(1), None);
    }

    #[test]
    fn test_placement() {
        assert_eq!(PanelPlacement::for_depth(0), PanelPlacement::Below);
        assert_eq!(PanelPlacement::for_depth(1), PanelPlacement::Beside);
        assert_eq!(PanelPlacement::for_depth(3), PanelPlacement::Beside);
    }
}
