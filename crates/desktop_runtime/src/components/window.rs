use super::*;
use crate::{
    host::window_primary_input_dom_id,
    model::{AppId, WindowId},
};

#[component]
pub(super) fn DesktopWindow(window_id: WindowId) -> impl IntoView {
    let runtime = use_desktop_runtime();

    let window = Signal::derive(move || {
        runtime
            .state
            .get()
            .windows
            .into_iter()
            .find(|w| w.id == window_id)
    });

    let focus = move |_: web_sys::MouseEvent| {
        let should_focus = window
            .get_untracked()
            .map(|w| !w.is_focused || w.minimized)
            .unwrap_or(false);
        if should_focus {
            runtime.dispatch_action(DesktopAction::FocusWindow { window_id });
        }
    };
    let begin_move = move |ev: web_sys::MouseEvent| {
        if ev.button() != 0 {
            return;
        }
        stop_mouse_event(&ev);
        let screen = runtime.host.with_value(|host| host.screen_size());
        runtime.snap.update(|engine| {
            engine.set_screen_size(screen);
            engine.cancel_drag();
        });
        runtime.dispatch_action(DesktopAction::BeginMove {
            window_id,
            pointer: pointer_from_mouse_event(&ev),
        });
    };
    let restore = move |_: web_sys::MouseEvent| {
        let snapped = window
            .get_untracked()
            .is_some_and(|w| w.restore_rect.is_some());
        if snapped {
            runtime.dispatch_action(DesktopAction::RestoreWindow { window_id });
        }
    };

    view! {
        <Show when=move || window.get().is_some() fallback=|| ()>
            {move || {
                window
                    .get()
                    .map(|win| {
                        let style = format!(
                            "left:{}px;top:{}px;width:{}px;height:{}px;z-index:{};",
                            win.rect.x,
                            win.rect.y,
                            win.rect.w,
                            win.rect.h,
                            win.z_index
                        );
                        let focused_class = if win.is_focused { " focused" } else { "" };
                        let minimized_class = if win.minimized { " minimized" } else { "" };
                        let maximized_class = if win.maximized { " maximized" } else { "" };

                        view! {
                            <section
                                class=format!(
                                    "desktop-window{}{}{}",
                                    focused_class,
                                    minimized_class,
                                    maximized_class
                                )
                                style=style
                                on:mousedown=focus
                                role="dialog"
                                aria-label=win.title.clone()
                            >
                                <header
                                    class="titlebar"
                                    on:mousedown=begin_move
                                    on:dblclick=restore
                                >
                                    <span class="titlebar-title">{win.title.clone()}</span>
                                    <div class="titlebar-controls">
                                        <button
                                            aria-label="Minimize window"
                                            on:mousedown=move |ev| stop_mouse_event(&ev)
                                            on:click=move |ev| {
                                                stop_mouse_event(&ev);
                                                runtime.dispatch_action(DesktopAction::MinimizeWindow {
                                                    window_id,
                                                });
                                            }
                                        >
                                            "_"
                                        </button>
                                        <button
                                            aria-label="Close window"
                                            on:mousedown=move |ev| stop_mouse_event(&ev)
                                            on:click=move |ev| {
                                                stop_mouse_event(&ev);
                                                runtime.dispatch_action(DesktopAction::CloseWindow {
                                                    window_id,
                                                });
                                            }
                                        >
                                            "×"
                                        </button>
                                    </div>
                                </header>
                                <div class="window-body">
                                    <WindowBody window_id=window_id app_id=win.app_id />
                                </div>
                            </section>
                        }
                            .into_view()
                    })
                    .unwrap_or_else(|| ().into_view())
            }}
        </Show>
    }
}

#[component]
fn WindowBody(window_id: WindowId, app_id: AppId) -> impl IntoView {
    let input_id = window_primary_input_dom_id(window_id);
    match app_id {
        AppId::Notepad => view! {
            <textarea id=input_id class="window-primary-input" spellcheck="false"></textarea>
        }
        .into_view(),
        AppId::Terminal => view! {
            <div class="terminal-body">
                <span class="terminal-prompt">"$ "</span>
                <input id=input_id class="window-primary-input" type="text" />
            </div>
        }
        .into_view(),
        AppId::Explorer | AppId::Settings | AppId::Calculator | AppId::TaskManager => view! {
            <p class="window-placeholder">{app_id.title()}</p>
        }
        .into_view(),
    }
}
