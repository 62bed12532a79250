use desktop_runtime::{DesktopProvider, DesktopShell};
use leptos::*;
use leptos_meta::*;
use leptos_router::*;

#[component]
pub fn SiteApp() -> impl IntoView {
    provide_meta_context();

    view! {
        <Title text="RetroDesk" />
        <Meta name="description" content="A desktop shell with virtual desktops, window snapping, and keyboard shortcuts." />

        <Router>
            <main class="site-root">
                <Routes>
                    <Route path="" view=DesktopEntry />
                    <Route path="/*any" view=UnknownRoute />
                </Routes>
            </main>
        </Router>
    }
}

#[component]
pub fn DesktopEntry() -> impl IntoView {
    view! {
        <DesktopProvider>
            <DesktopShell />
        </DesktopProvider>
    }
}

#[component]
fn UnknownRoute() -> impl IntoView {
    view! {
        <section class="site-not-found">
            <h1>"Not found"</h1>
            <A href="/">"Back to the desktop"</A>
        </section>
    }
}
