use crate::components::ui::{
    Button, ButtonSize, Card, CardContent, CardDescription, CardHeader, CardTitle, ErrorAlert,
    Input, Label, Spinner,
};
use crate::state::AppContext;
use crate::storage::save_last_activity;
use crate::util::now_ms;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;

pub(crate) const ADMIN_HOME: &str = "/admin/navigation";

#[component]
pub fn LoginPage() -> impl IntoView {
    let email: RwSignal<String> = RwSignal::new(String::new());
    let password: RwSignal<String> = RwSignal::new(String::new());
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let loading: RwSignal<bool> = RwSignal::new(false);

    let app_state = expect_context::<AppContext>();
    let navigate = StoredValue::new(use_navigate());

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if loading.get_untracked() {
            return;
        }

        let email_val = email.get_untracked();
        let password_val = password.get_untracked();
        let mut api_client = app_state.0.api_client.get_untracked();

        loading.set(true);
        error.set(None);

        spawn_local(async move {
            match api_client.sign_in(&email_val, &password_val).await {
                Ok(response) => {
                    api_client.set_token(response.access_token);
                    api_client.save_to_storage();
                    save_last_activity(now_ms());
                    app_state.0.api_client.set(api_client);
                    app_state.0.notice.set(None);
                    password.set(String::new());
                    navigate.get_value()(ADMIN_HOME, Default::default());
                }
                Err(e) => {
                    error.set(Some(e.to_string()));
                }
            }
            loading.set(false);
        });
    };

    view! {
        <div class="min-h-screen bg-background">
            <div class="mx-auto flex min-h-screen w-full max-w-sm flex-col justify-center px-4 py-10">
                <div class="mb-6 flex items-center justify-center">
                    <a href="/" class="text-sm font-medium text-foreground">"Back to site"</a>
                </div>

                <Card>
                    <CardHeader>
                        <CardTitle class="text-lg">"Navigation admin"</CardTitle>
                        <CardDescription class="text-xs">"Sign in to edit the site menu."</CardDescription>
                    </CardHeader>

                    <CardContent>
                        <form class="flex flex-col gap-3" on:submit=on_submit>
                            {move || {
                                app_state.0.notice.get().map(|n| {
                                    view! {
                                        <div class="rounded-md border bg-muted px-3 py-2 text-xs text-muted-foreground">
                                            {n}
                                        </div>
                                    }
                                })
                            }}

                            <div class="flex flex-col gap-1.5">
                                <Label html_for="email">"Email"</Label>
                                <Input
                                    id="email"
                                    r#type="email"
                                    placeholder="admin@example.com"
                                    value=email
                                    on_input=Callback::new(move |v| email.set(v))
                                    required=true
                                    class="h-8 text-sm"
                                />
                            </div>

                            <div class="flex flex-col gap-1.5">
                                <Label html_for="password">"Password"</Label>
                                <Input
                                    id="password"
                                    r#type="password"
                                    placeholder="••••••••"
                                    value=password
                                    on_input=Callback::new(move |v| password.set(v))
                                    required=true
                                    class="h-8 text-sm"
                                />
                            </div>

                            <ErrorAlert title="Sign-in failed" message=error />

                            <Button
                                class="w-full"
                                size=ButtonSize::Sm
                                attr:disabled=move || loading.get()
                            >
                                <span class="inline-flex items-center gap-2">
                                    <Show when=move || loading.get() fallback=|| ()>
                                        <Spinner />
                                    </Show>
                                    {move || if loading.get() { "Signing in..." } else { "Sign in" }}
                                </span>
                            </Button>
                        </form>
                    </CardContent>
                </Card>
            </div>
        </div>
    }
}
