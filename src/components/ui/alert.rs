use leptos::prelude::*;
use leptos_ui::clx;

mod components {
    use super::*;
    clx! {Alert, div, "relative w-full rounded-lg border px-4 py-3 text-sm"}
    clx! {AlertTitle, h4, "mb-1 font-medium tracking-tight leading-none"}
    clx! {AlertDescription, p, "text-sm leading-relaxed"}
}

pub use components::*;

/// Destructive alert that is only rendered while `message` holds something.
#[component]
pub fn ErrorAlert(
    #[prop(into)] title: String,
    #[prop(into)] message: Signal<Option<String>>,
) -> impl IntoView {
    let title = StoredValue::new(title);

    move || {
        message.get().map(|m| {
            view! {
                <Alert class="border-destructive/30 bg-destructive/5 text-destructive" attr:role="alert">
                    <AlertTitle>{title.get_value()}</AlertTitle>
                    <AlertDescription>{m}</AlertDescription>
                </Alert>
            }
        })
    }
}
