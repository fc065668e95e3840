use crate::pages::{LoginPage, NavigationAdminPage, PublicHome, RequireAdmin};
use crate::state::{AppContext, AppState};
use leptos::prelude::*;
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;

#[component]
pub fn App() -> impl IntoView {
    provide_context(AppContext(AppState::new()));

    // Router hooks (used by the header and the sign-in flow) need a <Router> context.
    view! {
        <Router>
            <Routes fallback=|| view! { <div class="px-4 py-8 text-xs text-muted-foreground">"Not found"</div> }>
                <Route path=path!("admin/login") view=LoginPage />
                <Route path=path!("admin/navigation") view=move || view! {
                    <RequireAdmin>
                        <NavigationAdminPage />
                    </RequireAdmin>
                } />
                <Route path=path!("admin") view=move || view! {
                    <RequireAdmin>
                        <NavigationAdminPage />
                    </RequireAdmin>
                } />
                <Route path=path!("") view=PublicHome />
            </Routes>
        </Router>
    }
}
