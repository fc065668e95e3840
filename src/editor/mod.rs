pub(crate) mod history;
pub(crate) mod ops;

use crate::components::ui::{Button, ButtonSize, ButtonVariant, Input};
use crate::models::{MenuItem, MenuTree};
use history::EditHistory;
use icons::{ArrowDown, ArrowUp, ChevronDown, ChevronRight, Plus, Trash2};
use leptos::prelude::*;
use std::sync::Arc;
use ops::{
    add_child, add_root, delete_node, move_sibling, update_field, upsert_child_by_label, MenuField,
    MenuItemPatch, MoveDirection,
};

/// Tree state plus undo, shared by every row of the editor.
///
/// Structural edits are recorded one by one. Text edits are recorded once per
/// focus session so that undo restores a whole field rather than one keystroke.
#[derive(Clone, Copy)]
pub(crate) struct MenuEditor {
    pub tree: RwSignal<MenuTree>,
    history: StoredValue<EditHistory>,
    can_undo: RwSignal<bool>,
    text_base: StoredValue<Option<MenuTree>>,
}

impl MenuEditor {
    pub fn new(tree: MenuTree) -> Self {
        Self {
            tree: RwSignal::new(tree),
            history: StoredValue::new(EditHistory::default()),
            can_undo: RwSignal::new(false),
            text_base: StoredValue::new(None),
        }
    }

    /// Replaces the tree and forgets all history (after a load).
    pub fn reset(&self, tree: MenuTree) {
        self.history.update_value(EditHistory::clear);
        self.text_base.set_value(None);
        self.can_undo.set(false);
        self.tree.set(tree);
    }

    pub fn can_undo(&self) -> Signal<bool> {
        self.can_undo.into()
    }

    pub fn apply(&self, edit: impl FnOnce(&MenuTree) -> MenuTree) {
        self.end_text_edit();
        let before = self.tree.get_untracked();
        let after = edit(&before);
        if after == before {
            return;
        }
        self.history.update_value(|h| h.record(&before, &after));
        self.can_undo.set(true);
        self.tree.set(after);
    }

    pub fn set_field(&self, id: &str, field: MenuField, value: &str) {
        let before = self.tree.get_untracked();
        let after = update_field(&before, id, field, value);
        if after != before {
            self.tree.set(after);
        }
    }

    pub fn begin_text_edit(&self) {
        self.text_base.set_value(Some(self.tree.get_untracked()));
    }

    pub fn end_text_edit(&self) {
        let Some(base) = self.text_base.try_update_value(Option::take).flatten() else {
            return;
        };
        let current = self.tree.get_untracked();
        if base != current {
            self.history.update_value(|h| h.record(&base, &current));
            self.can_undo.set(true);
        }
    }

    pub fn undo(&self) {
        self.end_text_edit();
        let mut restored = None;
        self.history.update_value(|h| restored = h.undo());
        if let Some(prev) = restored {
            self.tree.set(prev);
        }
        self.can_undo
            .set(self.history.with_value(EditHistory::can_undo));
    }
}

#[component]
pub fn MenuTreeEditor(editor: MenuEditor) -> impl IntoView {
    let root_ids = Memo::new(move |_| {
        editor
            .tree
            .with(|t| t.roots().iter().map(|i| i.id.clone()).collect::<Vec<_>>())
    });

    view! {
        <div data-name="MenuTreeEditor" class="flex flex-col gap-2">
            <Show
                when=move || !root_ids.with(Vec::is_empty)
                fallback=|| {
                    view! {
                        <div class="rounded-md border border-dashed px-3 py-6 text-center text-xs text-muted-foreground">
                            "The menu is empty."
                        </div>
                    }
                }
            >
                <ul class="flex flex-col gap-1">
                    <For
                        each=move || root_ids.get()
                        key=|id| id.clone()
                        children=move |id| view! { <MenuItemRow item_id=id depth=0 editor=editor /> }
                    />
                </ul>
            </Show>
            <Button
                variant=ButtonVariant::Outline
                size=ButtonSize::Sm
                on:click=move |_| editor.apply(add_root)
            >
                <Plus />
                "Add top-level item"
            </Button>
            <QuickAdd editor=editor />
        </div>
    }
}

/// `(id, indented label)` for every item, in pre-order.
fn parent_options(tree: &MenuTree) -> Vec<(String, String)> {
    fn walk(items: &[Arc<MenuItem>], depth: usize, out: &mut Vec<(String, String)>) {
        for item in items {
            let label = if item.label.trim().is_empty() {
                "(untitled)"
            } else {
                item.label.as_str()
            };
            out.push((item.id.clone(), format!("{}{}", "\u{a0}\u{a0}".repeat(depth), label)));
            walk(&item.children, depth + 1, out);
        }
    }
    let mut out = Vec::new();
    walk(tree.roots(), 0, &mut out);
    out
}

/// Adds an item by label under a chosen parent, or updates the link of the
/// sibling that already carries that label.
#[component]
fn QuickAdd(editor: MenuEditor) -> impl IntoView {
    let parent: RwSignal<String> = RwSignal::new(String::new());
    let label: RwSignal<String> = RwSignal::new(String::new());
    let href: RwSignal<String> = RwSignal::new(String::new());

    let options = Memo::new(move |_| editor.tree.with(parent_options));

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let label_val = label.get_untracked();
        if label_val.trim().is_empty() {
            return;
        }
        let parent_id = parent.get_untracked();
        let href_val = href.get_untracked();
        let patch = MenuItemPatch {
            href: (!href_val.trim().is_empty()).then(|| href_val.trim().to_string()),
            ..Default::default()
        };

        editor.apply(|t| {
            let parent = (!parent_id.is_empty()).then_some(parent_id.as_str());
            upsert_child_by_label(t, parent, &label_val, &patch)
        });
        label.set(String::new());
        href.set(String::new());
    };

    view! {
        <form class="flex flex-wrap items-center gap-2 border-t pt-3" on:submit=on_submit>
            <select
                class="border-input h-8 rounded-md border bg-transparent px-2 text-sm"
                aria-label="Parent"
                prop:value=move || parent.get()
                on:change=move |ev| parent.set(event_target_value(&ev))
            >
                <option value="">"Top level"</option>
                {move || {
                    options
                        .get()
                        .into_iter()
                        .map(|(id, text)| view! { <option value=id>{text}</option> })
                        .collect_view()
                }}
            </select>
            <Input
                class="h-8 w-40"
                placeholder="Label"
                aria_label="Quick add label"
                value=label
                on_input=Callback::new(move |v| label.set(v))
            />
            <Input
                class="h-8 w-48"
                placeholder="Link (optional)"
                aria_label="Quick add link"
                value=href
                on_input=Callback::new(move |v| href.set(v))
            />
            <Button variant=ButtonVariant::Outline size=ButtonSize::Sm>
                "Add or update"
            </Button>
        </form>
    }
}

#[component]
fn MenuItemRow(item_id: String, depth: usize, editor: MenuEditor) -> impl IntoView {
    let id_sv = StoredValue::new(item_id);
    let collapsed = RwSignal::new(false);
    let indent_px = depth * 18;

    let item = Memo::new(move |_| {
        editor
            .tree
            .with(|t| t.find(&id_sv.get_value()).cloned())
    });
    let position = Memo::new(move |_| {
        editor
            .tree
            .with(|t| t.sibling_position(&id_sv.get_value()))
    });
    let child_ids = Memo::new(move |_| {
        item.get()
            .map(|i| i.children.iter().map(|c| c.id.clone()).collect::<Vec<_>>())
            .unwrap_or_default()
    });
    let has_children = move || child_ids.with(|c| !c.is_empty());

    let field_value = move |field: MenuField| {
        Signal::derive(move || {
            item.with(|i| {
                i.as_ref()
                    .map(|i| match field {
                        MenuField::Label => i.label.clone(),
                        MenuField::LabelAlt => i.label_alt.clone(),
                        MenuField::Href => i.href.clone(),
                        MenuField::Icon => i.icon.clone().unwrap_or_default(),
                    })
                    .unwrap_or_default()
            })
        })
    };
    let on_field = move |field: MenuField| {
        Callback::new(move |v: String| editor.set_field(&id_sv.get_value(), field, &v))
    };
    let begin = Callback::new(move |_| editor.begin_text_edit());
    let end = Callback::new(move |_| editor.end_text_edit());

    let is_first = move || position.get().map(|(idx, _)| idx == 0).unwrap_or(true);
    let is_last = move || {
        position
            .get()
            .map(|(idx, len)| idx + 1 >= len)
            .unwrap_or(true)
    };

    view! {
        <li data-name="MenuItemRow" data-id=move || id_sv.get_value()>
            <div
                class="flex flex-wrap items-center gap-2 rounded-md border bg-card px-2 py-2"
                style=format!("margin-left: {}px", indent_px)
            >
                <Button
                    variant=ButtonVariant::Ghost
                    size=ButtonSize::Icon
                    attr:aria-label="Collapse"
                    attr:disabled=move || !has_children()
                    on:click=move |_| collapsed.update(|c| *c = !*c)
                >
                    {move || {
                        if has_children() && !collapsed.get() {
                            view! { <ChevronDown class="size-4" /> }.into_any()
                        } else {
                            view! { <ChevronRight class="size-4 opacity-60" /> }.into_any()
                        }
                    }}
                </Button>

                <Input
                    class="h-8 w-36"
                    placeholder="Label"
                    aria_label="Label"
                    name=MenuField::Label.to_string()
                    value=field_value(MenuField::Label)
                    on_input=on_field(MenuField::Label)
                    on_focus=begin
                    on_blur=end
                />
                <Input
                    class="h-8 w-36"
                    placeholder="Alternate label"
                    aria_label="Alternate label"
                    name=MenuField::LabelAlt.to_string()
                    value=field_value(MenuField::LabelAlt)
                    on_input=on_field(MenuField::LabelAlt)
                    on_focus=begin
                    on_blur=end
                />
                <Input
                    class="h-8 w-44"
                    placeholder="Link (# for none)"
                    aria_label="Link"
                    name=MenuField::Href.to_string()
                    value=field_value(MenuField::Href)
                    on_input=on_field(MenuField::Href)
                    on_focus=begin
                    on_blur=end
                />
                <Input
                    class="h-8 w-44"
                    placeholder="Icon URL"
                    aria_label="Icon URL"
                    name=MenuField::Icon.to_string()
                    value=field_value(MenuField::Icon)
                    on_input=on_field(MenuField::Icon)
                    on_focus=begin
                    on_blur=end
                />

                <div class="ml-auto flex items-center gap-1">
                    <Button
                        variant=ButtonVariant::Ghost
                        size=ButtonSize::Icon
                        attr:aria-label="Move up"
                        attr:disabled=is_first
                        on:click=move |_| {
                            editor.apply(|t| move_sibling(t, &id_sv.get_value(), MoveDirection::Earlier))
                        }
                    >
                        <ArrowUp />
                    </Button>
                    <Button
                        variant=ButtonVariant::Ghost
                        size=ButtonSize::Icon
                        attr:aria-label="Move down"
                        attr:disabled=is_last
                        on:click=move |_| {
                            editor.apply(|t| move_sibling(t, &id_sv.get_value(), MoveDirection::Later))
                        }
                    >
                        <ArrowDown />
                    </Button>
                    <Button
                        variant=ButtonVariant::Ghost
                        size=ButtonSize::Icon
                        attr:aria-label="Add child"
                        on:click=move |_| {
                            collapsed.set(false);
                            editor.apply(|t| add_child(t, &id_sv.get_value()));
                        }
                    >
                        <Plus />
                    </Button>
                    <Button
                        variant=ButtonVariant::Ghost
                        size=ButtonSize::Icon
                        class="text-destructive"
                        attr:aria-label="Delete"
                        on:click=move |_| editor.apply(|t| delete_node(t, &id_sv.get_value()))
                    >
                        <Trash2 />
                    </Button>
                </div>
            </div>

            <Show when=move || has_children() && !collapsed.get() fallback=|| ()>
                <ul class="mt-1 flex flex-col gap-1">
                    <For
                        each=move || child_ids.get()
                        key=|id| id.clone()
                        children=move |id| {
                            view! { <MenuItemRow item_id=id depth=depth + 1 editor=editor /> }
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
    use leptos::reactive::owner::Owner;
    use pretty_assertions::assert_eq;

    fn sample() -> MenuTree {
        MenuTree::new(vec![
            MenuItem::new("home", "Home", "/"),
            MenuItem::new("products", "Products", "#")
                .with_child(MenuItem::new("all", "All products", "/products")),
        ])
    }

    #[test]
    fn test_structural_edits_undo_one_at_a_time() {
        Owner::new().with(|| {
            let editor = MenuEditor::new(sample());
            editor.apply(add_root);
            editor.apply(|t| delete_node(t, "home"));
            assert_eq!(editor.tree.get_untracked().roots().len(), 2);

            editor.undo();
            assert_eq!(editor.tree.get_untracked().roots().len(), 3);
            editor.undo();
            assert_eq!(editor.tree.get_untracked(), sample());
            assert!(!editor.can_undo().get_untracked());
        });
    }

    #[test]
    fn test_text_edits_coalesce_per_focus() {
        Owner::new().with(|| {
            let editor = MenuEditor::new(sample());
            editor.begin_text_edit();
            editor.set_field("home", MenuField::Label, "H");
            editor.set_field("home", MenuField::Label, "Ho");
            editor.set_field("home", MenuField::Label, "Hom");
            editor.end_text_edit();

            assert_eq!(editor.tree.get_untracked().roots()[0].label, "Hom");
            editor.undo();
            assert_eq!(editor.tree.get_untracked(), sample());
            assert!(!editor.can_undo().get_untracked());
        });
    }

    #[test]
    fn test_noop_edit_not_recorded() {
        Owner::new().with(|| {
            let editor = MenuEditor::new(sample());
            editor.apply(|t| delete_node(t, "missing"));
            assert!(!editor.can_undo().get_untracked());
        });
    }

    #[test]
    fn test_reset_forgets_history() {
        Owner::new().with(|| {
            let editor = MenuEditor::new(MenuTree::default());
            editor.apply(add_root);
            editor.reset(sample());
            assert!(!editor.can_undo().get_untracked());
            assert_eq!(editor.tree.get_untracked(), sample());
        });
    }

    #[test]
    fn test_parent_options_are_indented_preorder() {
        let options = parent_options(&sample());
        assert_eq!(
            options,
            vec![
                ("home".to_string(), "Home".to_string()),
                ("products".to_string(), "Products".to_string()),
                ("all".to_string(), "\u{a0}\u{a0}All products".to_string()),
            ]
        );
    }
}
