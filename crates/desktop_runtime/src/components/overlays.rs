//! Transient overlays: snap preview, alt-tab switcher, and shell surfaces.

use super::*;
use crate::{
    model::{ShellSurface, WindowId},
    runtime_context::open_or_focus_app,
    shortcuts::focus_order,
    virtual_desktops::DesktopId,
};

#[component]
pub(super) fn SnapPreview() -> impl IntoView {
    let runtime = use_desktop_runtime();
    let preview = move || {
        runtime.snap.with(|engine| {
            engine.preview_zone().zip(engine.preview_rect())
        })
    };

    view! {
        {move || {
            preview().map(|(zone, rect)| {
                view! {
                    <div
                        class=format!("snap-preview snap-preview-{}", zone.css_id())
                        aria-hidden="true"
                        style=format!(
                            "left:{}px;top:{}px;width:{}px;height:{}px;",
                            rect.x,
                            rect.y,
                            rect.w,
                            rect.h
                        )
                    />
                }
            })
        }}
    }
}

#[component]
pub(super) fn AltTabOverlay() -> impl IntoView {
    let runtime = use_desktop_runtime();
    let entries = move || {
        let dispatcher = runtime.shortcuts.get();
        if !dispatcher.state().alt_tab_active {
            return Vec::new();
        }
        let state = runtime.state.get();
        let candidates = runtime.focus_candidates();
        let selected = dispatcher.alt_tab_preview(&candidates);
        focus_order(&candidates)
            .into_iter()
            .filter_map(|id| state.window(id).map(|win| (id, win.title.clone())))
            .map(|(id, title)| (id, title, Some(id) == selected))
            .collect::<Vec<_>>()
    };

    view! {
        <Show when=move || !entries().is_empty() fallback=|| ()>
            <ol class="alt-tab-overlay" role="listbox" aria-label="Switch windows">
                <For each=entries key=|(id, _, selected)| (id.0, *selected) let:entry>
                    <li
                        class=if entry.2 { "alt-tab-item selected" } else { "alt-tab-item" }
                        role="option"
                        aria-selected=entry.2.to_string()
                    >
                        {entry.1}
                    </li>
                </For>
            </ol>
        </Show>
    }
}

#[component]
pub(super) fn ShellSurfacePanel() -> impl IntoView {
    let runtime = use_desktop_runtime();
    let surface = move || runtime.state.with(|state| state.open_surface);

    view! {
        {move || match surface() {
            None => ().into_view(),
            Some(ShellSurface::StartMenu) => view! { <StartMenu /> }.into_view(),
            Some(ShellSurface::Search) => view! { <SearchPanel /> }.into_view(),
            Some(ShellSurface::TaskView) => view! { <TaskView /> }.into_view(),
            Some(ShellSurface::LockScreen) => view! { <LockScreen /> }.into_view(),
        }}
    }
}

#[component]
fn StartMenu() -> impl IntoView {
    let runtime = use_desktop_runtime();
    let apps = runtime.host.with_value(|host| host.registry().launcher_apps());

    view! {
        <nav
            class="shell-surface start-menu"
            aria-label="Start"
            on:mousedown=move |ev| ev.stop_propagation()
        >
            <ul>
                {apps
                    .into_iter()
                    .map(|app| {
                        let app_id = app.app_id;
                        view! {
                            <li>
                                <button on:click=move |_| {
                                    runtime.dispatch_action(DesktopAction::CloseSurfaces);
                                    open_or_focus_app(runtime, app_id);
                                }>{app.launcher_label}</button>
                            </li>
                        }
                    })
                    .collect_view()}
            </ul>
        </nav>
    }
}

#[component]
fn SearchPanel() -> impl IntoView {
    let runtime = use_desktop_runtime();
    let query = create_rw_signal(String::new());
    let matches = move || {
        let needle = query.get().to_lowercase();
        runtime.host.with_value(|host| {
            host.registry()
                .launcher_apps()
                .into_iter()
                .filter(|app| app.launcher_label.to_lowercase().contains(&needle))
                .collect::<Vec<_>>()
        })
    };

    view! {
        <div
            class="shell-surface search-panel"
            role="search"
            on:mousedown=move |ev| ev.stop_propagation()
        >
            <input
                type="search"
                placeholder="Search apps"
                prop:value=move || query.get()
                on:input=move |ev| query.set(event_target_value(&ev))
            />
            <ul>
                <For each=matches key=|app| app.app_id.slug() let:app>
                    <li>
                        <button on:click=move |_| {
                            runtime.dispatch_action(DesktopAction::CloseSurfaces);
                            open_or_focus_app(runtime, app.app_id);
                        }>{app.launcher_label}</button>
                    </li>
                </For>
            </ul>
        </div>
    }
}

#[component]
fn TaskView() -> impl IntoView {
    let runtime = use_desktop_runtime();
    let desktops = move || runtime.virtual_desktops();

    view! {
        <div
            class="shell-surface task-view"
            aria-label="Task view"
            on:mousedown=move |ev| ev.stop_propagation()
        >
            <For
                each=desktops
                key=|desktop| (desktop.id.0, desktop.name.clone(), desktop.window_ids.clone())
                let:desktop
            >
                {{
                    let desktop_id = desktop.id;
                    let windows = runtime.state.with_untracked(|state| {
                        desktop
                            .window_ids
                            .iter()
                            .filter_map(|id| state.window(*id))
                            .map(|win| (win.id, win.title.clone()))
                            .collect::<Vec<_>>()
                    });
                    view! {
                        <section class="task-view-desktop">
                            <button on:click=move |_| {
                                runtime.dispatch_action(DesktopAction::CloseSurfaces);
                                runtime.desktops.get_value().switch_desktop(desktop_id);
                            }>{desktop.name.clone()}</button>
                            <input
                                class="task-view-rename"
                                aria-label="Desktop name"
                                prop:value=desktop.name.clone()
                                on:change=move |ev| {
                                    runtime
                                        .desktops
                                        .get_value()
                                        .rename_desktop(desktop_id, event_target_value(&ev));
                                }
                            />
                            <ul>
                                {windows
                                    .into_iter()
                                    .map(|(window_id, title)| {
                                        view! {
                                            <li>
                                                <span>{title}</span>
                                                <MoveWindowButtons window_id=window_id from=desktop_id />
                                            </li>
                                        }
                                    })
                                    .collect_view()}
                            </ul>
                        </section>
                    }
                }}
            </For>
        </div>
    }
}

/// One button per other desktop, moving `window_id` there.
#[component]
fn MoveWindowButtons(window_id: WindowId, from: DesktopId) -> impl IntoView {
    let runtime = use_desktop_runtime();
    let targets = move || {
        runtime
            .virtual_desktops()
            .into_iter()
            .filter(|desktop| desktop.id != from)
            .collect::<Vec<_>>()
    };

    view! {
        <For each=targets key=|desktop| (desktop.id.0, desktop.name.clone()) let:target>
            {{
                let target_id = target.id;
                view! {
                    <button
                        class="task-view-move"
                        on:click=move |_| {
                            runtime
                                .desktops
                                .get_value()
                                .move_window_to_desktop(window_id, target_id);
                        }
                    >
                        {format!("Move to {}", target.name)}
                    </button>
                }
            }}
        </For>
    }
}

#[component]
fn LockScreen() -> impl IntoView {
    let runtime = use_desktop_runtime();

    view! {
        <div
            class="shell-surface lock-screen"
            role="dialog"
            aria-label="Locked"
            on:mousedown=move |ev| ev.stop_propagation()
            on:click=move |_| {
                runtime.dispatch_action(DesktopAction::ToggleSurface {
                    surface: ShellSurface::LockScreen,
                });
            }
        >
            <p>"Click to unlock"</p>
        </div>
    }
}
