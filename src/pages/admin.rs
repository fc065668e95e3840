use super::login::LoginPage;
use crate::api::StoreErrorKind;
use crate::components::ui::{
    Button, ButtonSize, ButtonVariant, Card, CardContent, CardDescription, CardHeader, CardTitle,
    ErrorAlert, Input, Label, Spinner,
};
use crate::editor::{MenuEditor, MenuTreeEditor};
use crate::models::{Language, MenuTree, SiteField, SiteNavigationConfig, SITE_NAV_CONFIG_KEY};
use crate::nav::{AccordionNav, DropdownNav};
use crate::persistence::{load_site_config, save_site_config, ConfigSource, FallbackReason};
use crate::state::{use_idle_sign_out, AppContext};
use leptos::prelude::*;
use leptos::task::spawn_local;

/// Admin routes render the sign-in form until there is a session.
#[component]
pub fn RequireAdmin(children: ChildrenFn) -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let is_authenticated = move || app_state.0.api_client.get().is_authenticated();

    view! {
        <Show when=is_authenticated fallback=move || view! { <LoginPage /> }>
            {children()}
        </Show>
    }
}

#[component]
pub fn NavigationAdminPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();

    // Site-level fields; the menu lives in the editor.
    let site: RwSignal<SiteNavigationConfig> = RwSignal::new(SiteNavigationConfig::default());
    let editor = MenuEditor::new(MenuTree::default());

    let saved: RwSignal<Option<SiteNavigationConfig>> = RwSignal::new(None);
    let loading: RwSignal<bool> = RwSignal::new(true);
    let saving: RwSignal<bool> = RwSignal::new(false);
    let load_notice: RwSignal<Option<String>> = RwSignal::new(None);
    let save_error: RwSignal<Option<String>> = RwSignal::new(None);
    let saved_flash: RwSignal<bool> = RwSignal::new(false);

    let preview_language: RwSignal<Language> = RwSignal::new(Language::Primary);
    let preview_target: RwSignal<Option<String>> = RwSignal::new(None);

    let current = Memo::new(move |_| SiteNavigationConfig {
        menu: editor.tree.get(),
        ..site.get()
    });
    let is_dirty = move || saved.with(|s| s.as_ref() != Some(&current.get()));

    use_idle_sign_out(
        app_state.0.env.with_value(|e| e.idle_timeout_ms()),
        Callback::new(move |_| {
            app_state
                .0
                .notice
                .set(Some("You were signed out after a period of inactivity.".to_string()));
            app_state.0.sign_out();
        }),
    );

    {
        let api_client = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            let loaded = load_site_config(&api_client, SITE_NAV_CONFIG_KEY).await;
            load_notice.set(match &loaded.source {
                ConfigSource::Stored => None,
                ConfigSource::Default(FallbackReason::Missing) => Some(
                    "No navigation has been saved yet; showing the built-in default.".to_string(),
                ),
                ConfigSource::Default(FallbackReason::Failed(e))
                    if e.kind == StoreErrorKind::Unauthorized =>
                {
                    app_state.0.notice.set(Some(
                        "Your session is no longer valid. Sign in again to edit the navigation."
                            .to_string(),
                    ));
                    app_state.0.sign_out();
                    return;
                }
                ConfigSource::Default(FallbackReason::Failed(e)) => Some(format!(
                    "Could not load the stored navigation ({e}); showing the built-in default."
                )),
            });
            editor.reset(loaded.config.menu.clone());
            site.set(loaded.config.clone());
            saved.set(loaded.baseline());
            loading.set(false);
        });
    }

    let on_save = move |_| {
        if saving.get_untracked() || !is_dirty() {
            return;
        }
        editor.end_text_edit();
        let config = current.get_untracked();
        let api_client = app_state.0.api_client.get_untracked();

        saving.set(true);
        save_error.set(None);
        saved_flash.set(false);

        spawn_local(async move {
            match save_site_config(&api_client, SITE_NAV_CONFIG_KEY, &config).await {
                Ok(()) => {
                    saved.set(Some(config));
                    load_notice.set(None);
                    saved_flash.set(true);
                }
                Err(e) if e.kind == StoreErrorKind::Unauthorized => {
                    app_state.0.notice.set(Some(
                        "Your session is no longer valid. Sign in again to save.".to_string(),
                    ));
                    app_state.0.sign_out();
                }
                Err(e) => save_error.set(Some(e.to_string())),
            }
            saving.set(false);
        });
    };

    let site_input = move |field: SiteField, label: &'static str, input_id: &'static str| {
        let value = Signal::derive(move || {
            site.with(|s| match field {
                SiteField::SiteName => s.site_name.clone(),
                SiteField::SiteNameAlt => s.site_name_alt.clone(),
                SiteField::LogoSrc => s.logo.src.clone(),
                SiteField::LogoSize => s.logo.size.to_string(),
                SiteField::FaviconSrc => s.favicon.src.clone(),
                SiteField::FaviconSize => s.favicon.size.to_string(),
            })
        });
        let is_size = matches!(field, SiteField::LogoSize | SiteField::FaviconSize);

        view! {
            <div class="flex flex-col gap-1.5">
                <Label html_for=input_id>{label}</Label>
                <Input
                    id=input_id
                    r#type=if is_size { "number" } else { "text" }
                    class="h-8 text-sm"
                    value=value
                    on_input=Callback::new(move |v: String| site.update(|s| *s = s.with_field(field, &v)))
                />
            </div>
        }
    };

    let on_navigate_preview = Callback::new(move |href: String| preview_target.set(Some(href)));

    view! {
        <div class="min-h-screen bg-background">
            <header class="border-b bg-card">
                <div class="mx-auto flex max-w-6xl items-center justify-between px-4 py-3">
                    <div class="flex items-center gap-3">
                        <a href="/" class="text-sm font-semibold text-foreground">"Site navigation"</a>
                        <Show when=is_dirty fallback=|| ()>
                            <span class="rounded-full bg-accent px-2 py-0.5 text-xs text-accent-foreground">
                                "Unsaved changes"
                            </span>
                        </Show>
                        <Show when=move || saved_flash.get() && !is_dirty() fallback=|| ()>
                            <span class="text-xs text-muted-foreground">"Saved"</span>
                        </Show>
                    </div>
                    <div class="flex items-center gap-2">
                        <Button
                            variant=ButtonVariant::Outline
                            size=ButtonSize::Sm
                            attr:disabled=move || !editor.can_undo().get()
                            on:click=move |_| editor.undo()
                        >
                            "Undo"
                        </Button>
                        <Button
                            size=ButtonSize::Sm
                            attr:disabled=move || saving.get() || loading.get() || !is_dirty()
                            on:click=on_save
                        >
                            <Show when=move || saving.get() fallback=|| ()>
                                <Spinner class="text-primary-foreground" />
                            </Show>
                            {move || if saving.get() { "Saving..." } else { "Save" }}
                        </Button>
                        <Button
                            variant=ButtonVariant::Ghost
                            size=ButtonSize::Sm
                            on:click=move |_| app_state.0.sign_out()
                        >
                            "Sign out"
                        </Button>
                    </div>
                </div>
            </header>

            <main class="mx-auto flex max-w-6xl flex-col gap-4 px-4 py-6">
                <ErrorAlert title="Save failed" message=save_error />

                {move || {
                    load_notice.get().map(|n| {
                        view! {
                            <div class="rounded-md border bg-muted px-3 py-2 text-xs text-muted-foreground">
                                {n}
                            </div>
                        }
                    })
                }}

                <Show
                    when=move || !loading.get()
                    fallback=|| {
                        view! {
                            <div class="flex items-center gap-2 text-xs text-muted-foreground">
                                <Spinner />
                                "Loading navigation..."
                            </div>
                        }
                    }
                >
                    <Card>
                        <CardHeader>
                            <CardTitle class="text-base">"Site"</CardTitle>
                            <CardDescription class="text-xs">
                                "Name in both languages, logo and favicon."
                            </CardDescription>
                        </CardHeader>
                        <CardContent>
                            <div class="grid gap-3 sm:grid-cols-2">
                                {site_input(SiteField::SiteName, "Site name", "site-name")}
                                {site_input(SiteField::SiteNameAlt, "Site name (alternate)", "site-name-alt")}
                                {site_input(SiteField::LogoSrc, "Logo URL", "logo-src")}
                                {site_input(SiteField::LogoSize, "Logo size (px)", "logo-size")}
                                {site_input(SiteField::FaviconSrc, "Favicon URL", "favicon-src")}
                                {site_input(SiteField::FaviconSize, "Favicon size (px)", "favicon-size")}
                            </div>
                        </CardContent>
                    </Card>

                    <Card>
                        <CardHeader>
                            <CardTitle class="text-base">"Menu"</CardTitle>
                            <CardDescription class="text-xs">
                                "Items with the link \"#\" only open their submenu."
                            </CardDescription>
                        </CardHeader>
                        <CardContent>
                            <MenuTreeEditor editor=editor />
                        </CardContent>
                    </Card>

                    <Card>
                        <CardHeader>
                            <CardTitle class="text-base">"Preview"</CardTitle>
                            <CardDescription class="text-xs">
                                {move || match preview_target.get() {
                                    Some(href) => format!("Would navigate to {href}"),
                                    None => "Links are reported here instead of followed.".to_string(),
                                }}
                            </CardDescription>
                        </CardHeader>
                        <CardContent>
                            <div class="flex flex-col gap-4">
                                <Button
                                    variant=ButtonVariant::Outline
                                    size=ButtonSize::Sm
                                    on:click=move |_| preview_language.update(|l| *l = l.toggled())
                                >
                                    {move || format!("Language: {}", preview_language.get())}
                                </Button>
                                <div class="rounded-md border px-2 py-2">
                                    <DropdownNav
                                        tree=editor.tree
                                        language=preview_language
                                        on_navigate=on_navigate_preview
                                    />
                                </div>
                                <div class="max-w-xs rounded-md border px-2 py-2">
                                    <AccordionNav
                                        tree=editor.tree
                                        language=preview_language
                                        on_navigate=on_navigate_preview
                                    />
                                </div>
                            </div>
                        </CardContent>
                    </Card>
                </Show>
            </main>
        </div>
    }
}
