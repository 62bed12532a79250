//! Global keyboard listeners feeding the shortcut dispatcher.

use wasm_bindgen::JsCast;

use super::*;
use crate::{
    model::{AppId, ShellSurface, WindowId},
    runtime_context::open_or_focus_app,
    shortcuts::{FocusCandidate, KeyInput, KeyOutcome, ShortcutDispatcher, ShortcutHost},
};

/// [`ShortcutHost`] backed by the runtime reducer and the virtual desktop manager.
struct RuntimeShortcutHost {
    runtime: DesktopRuntimeContext,
}

impl ShortcutHost for RuntimeShortcutHost {
    fn windows(&self) -> Vec<FocusCandidate> {
        self.runtime.focus_candidates()
    }

    fn focus_window(&mut self, window_id: WindowId) {
        self.runtime
            .dispatch_action(DesktopAction::FocusWindow { window_id });
    }

    fn minimize_window(&mut self, window_id: WindowId) {
        self.runtime
            .dispatch_action(DesktopAction::MinimizeWindow { window_id });
    }

    fn close_window(&mut self, window_id: WindowId) {
        self.runtime
            .dispatch_action(DesktopAction::CloseWindow { window_id });
    }

    fn open_app(&mut self, app_id: AppId) -> bool {
        open_or_focus_app(self.runtime, app_id)
    }

    fn toggle_surface(&mut self, surface: ShellSurface) -> bool {
        self.runtime
            .dispatch_action(DesktopAction::ToggleSurface { surface });
        true
    }

    fn toggle_fullscreen(&mut self) {
        self.runtime.host.with_value(|host| host.toggle_fullscreen());
    }
}

fn is_editable_target(target: Option<web_sys::EventTarget>) -> bool {
    let Some(element) = target.and_then(|target| target.dyn_into::<web_sys::HtmlElement>().ok())
    else {
        return false;
    };
    matches!(
        element.tag_name().to_ascii_uppercase().as_str(),
        "INPUT" | "TEXTAREA" | "SELECT"
    ) || element.is_content_editable()
}

fn key_input_from_event(ev: &web_sys::KeyboardEvent) -> KeyInput {
    KeyInput {
        key: ev.key(),
        alt: ev.alt_key(),
        ctrl: ev.ctrl_key(),
        meta: ev.meta_key(),
        shift: ev.shift_key(),
        editable_target: is_editable_target(ev.target()),
    }
}

/// Runs `handle` against a copy of the dispatcher so host callbacks never observe a borrowed
/// signal, then publishes the new dispatcher state.
fn dispatch_key(
    runtime: DesktopRuntimeContext,
    ev: &web_sys::KeyboardEvent,
    handle: fn(&mut ShortcutDispatcher, &KeyInput, &mut dyn ShortcutHost) -> KeyOutcome,
) {
    let input = key_input_from_event(ev);
    let mut dispatcher = runtime.shortcuts.get_untracked();
    let mut host = RuntimeShortcutHost { runtime };
    let outcome = handle(&mut dispatcher, &input, &mut host);

    if runtime.shortcuts.with_untracked(|current| *current != dispatcher) {
        runtime.shortcuts.set(dispatcher);
    }
    if outcome == KeyOutcome::Handled {
        ev.prevent_default();
        ev.stop_propagation();
    }
}

/// Attaches the global `keydown`/`keyup` listeners; both are removed on cleanup.
pub(super) fn install_shortcut_listeners(runtime: DesktopRuntimeContext) {
    let keydown_listener = window_event_listener(ev::keydown, move |ev| {
        dispatch_key(runtime, &ev, ShortcutDispatcher::handle_key_down);
    });
    let keyup_listener = window_event_listener(ev::keyup, move |ev| {
        dispatch_key(runtime, &ev, ShortcutDispatcher::handle_key_up);
    });

    on_cleanup(move || {
        keydown_listener.remove();
        keyup_listener.remove();
    });
}
