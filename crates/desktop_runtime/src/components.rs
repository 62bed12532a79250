//! Desktop shell UI composition and interaction surfaces.

mod desktop_switcher;
mod overlays;
mod shortcut_input;
mod window;

use leptos::*;

use self::{
    desktop_switcher::DesktopSwitcher,
    overlays::{AltTabOverlay, ShellSurfacePanel, SnapPreview},
    shortcut_input::install_shortcut_listeners,
    window::DesktopWindow,
};
use crate::{
    model::PointerPosition,
    reducer::DesktopAction,
    virtual_desktops::{DesktopTransition, SwitchDirection},
};

pub use crate::runtime_context::{use_desktop_runtime, DesktopProvider, DesktopRuntimeContext};

#[component]
/// Renders the desktop shell: windows on the active desktop, drag snapping, shortcuts, and the
/// desktop switcher.
pub fn DesktopShell() -> impl IntoView {
    let runtime = use_desktop_runtime();
    let state = runtime.state;

    install_shortcut_listeners(runtime);
    install_drag_listeners(runtime);

    let resize_listener = window_event_listener(ev::resize, move |_| {
        let screen = runtime.host.with_value(|host| host.screen_size());
        runtime.snap.update(|engine| engine.set_screen_size(screen));
    });
    on_cleanup(move || resize_listener.remove());

    let visible_windows = move || {
        state
            .get()
            .windows
            .into_iter()
            .filter(|win| !win.minimized && runtime.is_window_visible(win.id))
            .collect::<Vec<_>>()
    };
    let shell_class = move || {
        runtime.desktop_revision.with(|_| ());
        match runtime.desktops.get_value().transition() {
            DesktopTransition::Idle => "desktop-shell".to_string(),
            DesktopTransition::Transitioning {
                direction,
                committed,
                ..
            } => format!(
                "desktop-shell transitioning {} {}",
                match direction {
                    SwitchDirection::Forward => "forward",
                    SwitchDirection::Backward => "backward",
                },
                if committed { "entering" } else { "leaving" }
            ),
        }
    };

    view! {
        <div
            id="desktop-shell-root"
            class=shell_class
            tabindex="-1"
            on:mousedown=move |_| {
                if state.get_untracked().open_surface.is_some() {
                    runtime.dispatch_action(DesktopAction::CloseSurfaces);
                }
            }
        >
            <div class="desktop-window-layer">
                <For each=visible_windows key=|win| win.id.0 let:win>
                    <DesktopWindow window_id=win.id />
                </For>
            </div>
            <SnapPreview />
            <AltTabOverlay />
            <ShellSurfacePanel />
            <DesktopSwitcher />
        </div>
    }
}

/// Attaches window-level `mousemove`/`mouseup` listeners for exactly the lifetime of a drag.
fn install_drag_listeners(runtime: DesktopRuntimeContext) {
    let detach = store_value(None::<Box<dyn FnOnce()>>);
    let dragging = create_memo(move |_| runtime.interaction.with(|ui| ui.dragging.is_some()));

    create_effect(move |_| {
        if !dragging.get() {
            detach_drag_listeners(detach);
            return;
        }
        if detach.with_value(Option::is_some) {
            return;
        }

        let move_listener = window_event_listener(ev::mousemove, move |ev| {
            update_drag(runtime, pointer_from_mouse_event(&ev));
        });
        let up_listener = window_event_listener(ev::mouseup, move |ev| {
            end_drag(runtime, pointer_from_mouse_event(&ev));
        });
        detach.set_value(Some(Box::new(move || {
            move_listener.remove();
            up_listener.remove();
        })));
    });

    on_cleanup(move || detach_drag_listeners(detach));
}

fn detach_drag_listeners(detach: StoredValue<Option<Box<dyn FnOnce()>>>) {
    let mut pending = None;
    detach.update_value(|slot| pending = slot.take());
    if let Some(remove) = pending {
        remove();
    }
}

fn update_drag(runtime: DesktopRuntimeContext, pointer: PointerPosition) {
    runtime.dispatch_action(DesktopAction::UpdateMove { pointer });
    runtime.snap.update(|engine| {
        engine.handle_drag_move(pointer.x, pointer.y);
    });
}

fn end_drag(runtime: DesktopRuntimeContext, pointer: PointerPosition) {
    let mut engine = runtime.snap.get_untracked();
    let snap = engine.handle_drag_end(pointer.x, pointer.y);
    runtime.snap.set(engine);
    runtime.dispatch_action(DesktopAction::EndMove { snap });
}

fn stop_mouse_event(ev: &web_sys::MouseEvent) {
    ev.prevent_default();
    ev.stop_propagation();
}

fn pointer_from_mouse_event(ev: &web_sys::MouseEvent) -> PointerPosition {
    PointerPosition {
        x: ev.client_x(),
        y: ev.client_y(),
    }
}
