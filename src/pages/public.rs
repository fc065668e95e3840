use crate::api::ApiClient;
use crate::components::ui::{Button, ButtonSize, ButtonVariant};
use crate::models::{SiteNavigationConfig, SITE_NAV_CONFIG_KEY};
use crate::nav::{is_same_page, route_path, AccordionNav, DropdownNav, HrefKind};
use crate::persistence::load_site_config;
use crate::state::AppContext;
use crate::util::current_path;
use icons::{Menu, X};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;
use wasm_bindgen::JsCast;

fn scroll_to_fragment(fragment: &str) {
    let Some(el) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(fragment))
    else {
        return;
    };
    let opts = web_sys::ScrollIntoViewOptions::new();
    opts.set_behavior(web_sys::ScrollBehavior::Smooth);
    el.scroll_into_view_with_scroll_into_view_options(&opts);
}

/// Points the document's `<link rel="icon">` at `href`, creating it if needed.
fn apply_favicon(href: &str) {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };

    let link = match document.query_selector("link[rel~='icon']") {
        Ok(Some(link)) => link,
        _ => {
            let Ok(link) = document.create_element("link") else {
                return;
            };
            let _ = link.set_attribute("rel", "icon");
            if let Ok(Some(head)) = document.query_selector("head") {
                let _ = head.append_child(&link);
            }
            link
        }
    };
    let _ = link.set_attribute("href", href);
}

/// How the public site follows a menu href.
///
/// Placeholders do nothing, external links leave the app, anchors on the
/// current page scroll, everything else goes through the router.
pub(crate) fn use_host_navigate() -> Callback<String> {
    let navigate = StoredValue::new(use_navigate());

    Callback::new(move |href: String| match HrefKind::classify(&href) {
        HrefKind::Placeholder => {}
        HrefKind::External => {
            if let Some(w) = web_sys::window() {
                let _ = w.location().set_href(href.trim());
            }
        }
        HrefKind::Route => navigate.get_value()(route_path(&href), Default::default()),
        HrefKind::Anchor { path, fragment } => {
            if is_same_page(&path, &current_path()) {
                scroll_to_fragment(&fragment);
                return;
            }
            navigate.get_value()(href.trim(), Default::default());
            // Let the new route render before looking for the target.
            let Some(w) = web_sys::window() else {
                return;
            };
            let _ = w.set_timeout_with_callback_and_timeout_and_arguments_0(
                wasm_bindgen::closure::Closure::once_into_js(move || scroll_to_fragment(&fragment))
                    .as_ref()
                    .unchecked_ref(),
                0,
            );
        }
    })
}

#[component]
pub fn SiteHeader() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let config: RwSignal<Option<SiteNavigationConfig>> = RwSignal::new(None);
    let drawer_open: RwSignal<bool> = RwSignal::new(false);
    let host_navigate = use_host_navigate();

    {
        // Anonymous: a stale admin token must not hide the public menu.
        let api_client = app_state.0.env.with_value(ApiClient::new);
        spawn_local(async move {
            let loaded = load_site_config(&api_client, SITE_NAV_CONFIG_KEY).await;
            apply_favicon(&loaded.config.favicon.src);
            config.set(Some(loaded.config));
        });
    }

    let tree = Signal::derive(move || {
        config.with(|c| c.as_ref().map(|c| c.menu.clone()).unwrap_or_default())
    });
    let language: Signal<_> = app_state.0.language.into();

    let on_navigate = Callback::new(move |href: String| {
        drawer_open.set(false);
        host_navigate.run(href);
    });

    let brand = move || {
        config.get().map(|c| {
            let name = c.display_name(language.get()).to_string();
            let size = c.logo.size;
            view! {
                <a href="/" class="flex items-center gap-2">
                    <img
                        src=c.logo.src.clone()
                        alt=name.clone()
                        style=format!("width: {size}px; height: {size}px")
                        class="object-contain"
                    />
                    <span class="text-base font-semibold text-foreground">{name}</span>
                </a>
            }
        })
    };

    view! {
        <header data-name="SiteHeader" class="sticky top-0 z-40 border-b bg-background/95 backdrop-blur">
            <div class="mx-auto flex max-w-6xl items-center justify-between gap-4 px-4 py-2">
                {brand}

                <DropdownNav
                    tree=tree
                    language=language
                    on_navigate=on_navigate
                    class="hidden md:flex"
                />

                <div class="flex items-center gap-1">
                    <Button
                        variant=ButtonVariant::Ghost
                        size=ButtonSize::Sm
                        attr:aria-label="Switch language"
                        on:click=move |_| app_state.0.set_language(language.get_untracked().toggled())
                    >
                        {move || language.get().toggled().to_string().to_uppercase()}
                    </Button>
                    <Button
                        variant=ButtonVariant::Ghost
                        size=ButtonSize::Icon
                        class="md:hidden"
                        attr:aria-label="Menu"
                        attr:aria-expanded=move || drawer_open.get().to_string()
                        on:click=move |_| drawer_open.update(|o| *o = !*o)
                    >
                        {move || {
                            if drawer_open.get() {
                                view! { <X class="size-5" /> }.into_any()
                            } else {
                                view! { <Menu class="size-5" /> }.into_any()
                            }
                        }}
                    </Button>
                </div>
            </div>

            <Show when=move || drawer_open.get() fallback=|| ()>
                <div class="border-t px-2 py-2 md:hidden">
                    <AccordionNav tree=tree language=language on_navigate=on_navigate />
                </div>
            </Show>
        </header>
    }
}

#[component]
pub fn PublicHome() -> impl IntoView {
    view! {
        <div class="min-h-screen bg-background">
            <SiteHeader />
            <main class="mx-auto max-w-6xl px-4 py-8" />
        </div>
    }
}
