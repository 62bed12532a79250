//! Global keyboard shortcuts and alt-tab focus cycling.
//!
//! The dispatcher is purely reactive: the shell forwards `keydown`/`keyup` events as
//! [`KeyInput`] values and the dispatcher acts through a [`ShortcutHost`]. It owns no timers and
//! reads the window list fresh on every event, so alt-tab selection always reflects the window
//! stack at the moment Alt is released.

use serde::{Deserialize, Serialize};

use crate::model::{AppId, ShellSurface, WindowId};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Keyboard event fields the dispatcher needs.
pub struct KeyInput {
    /// `KeyboardEvent.key` value, for example `"Tab"`, `"e"`, `"F11"`, `"Meta"`.
    pub key: String,
    pub alt: bool,
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
    /// The event target is a text input, textarea, select, or contenteditable element.
    pub editable_target: bool,
}

impl KeyInput {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    pub fn with_alt(mut self) -> Self {
        self.alt = true;
        self
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn with_meta(mut self) -> Self {
        self.meta = true;
        self
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn in_editable_target(mut self) -> Self {
        self.editable_target = true;
        self
    }

    fn is_letter(&self, letter: char) -> bool {
        let mut chars = self.key.chars();
        matches!((chars.next(), chars.next()), (Some(c), None) if c.eq_ignore_ascii_case(&letter))
    }

    fn is_meta_key(&self) -> bool {
        matches!(self.key.as_str(), "Meta" | "OS")
    }

    fn meta_only(&self) -> bool {
        self.meta && !self.ctrl && !self.alt
    }

    fn ctrl_alt(&self) -> bool {
        self.ctrl && self.alt && !self.meta
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The event matched a shortcut; the caller suppresses the browser default.
    Handled,
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Well-known launch targets reachable from the keyboard.
pub enum LaunchTarget {
    TaskManager,
    FileExplorer,
    Terminal,
    Settings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    CycleWindows,
    ToggleSurface(ShellSurface),
    OpenApp(LaunchTarget),
    ShowDesktop,
    CloseFrontmost,
    ToggleFullscreen,
}

/// Maps a key-down event to a shortcut. The first matching chord wins.
pub fn classify_chord(input: &KeyInput) -> Option<Shortcut> {
    let key = input.key.as_str();

    if input.alt && !input.ctrl && !input.meta && key == "Tab" {
        return Some(Shortcut::CycleWindows);
    }
    if input.is_meta_key() && !input.alt && !input.ctrl && !input.shift {
        return Some(Shortcut::ToggleSurface(ShellSurface::StartMenu));
    }
    if input.ctrl_alt() && key == "Delete" {
        return Some(Shortcut::OpenApp(LaunchTarget::TaskManager));
    }

    if input.meta_only() {
        let shortcut = if input.is_letter('d') {
            Some(Shortcut::ShowDesktop)
        } else if input.is_letter('e') {
            Some(Shortcut::OpenApp(LaunchTarget::FileExplorer))
        } else if input.is_letter('r') {
            Some(Shortcut::OpenApp(LaunchTarget::Terminal))
        } else if input.is_letter('i') {
            Some(Shortcut::OpenApp(LaunchTarget::Settings))
        } else if input.is_letter('s') {
            Some(Shortcut::ToggleSurface(ShellSurface::Search))
        } else if key == "Tab" {
            Some(Shortcut::ToggleSurface(ShellSurface::TaskView))
        } else if input.is_letter('l') {
            Some(Shortcut::ToggleSurface(ShellSurface::LockScreen))
        } else {
            None
        };
        if shortcut.is_some() {
            return shortcut;
        }
    }

    if input.ctrl_alt() && input.is_letter('t') {
        return Some(Shortcut::OpenApp(LaunchTarget::Terminal));
    }
    if input.ctrl && !input.alt && !input.meta && key == " " {
        return Some(Shortcut::ToggleSurface(ShellSurface::Search));
    }
    if input.alt && !input.ctrl && !input.meta && key == "F4" {
        return Some(Shortcut::CloseFrontmost);
    }
    if key == "F11" {
        return Some(Shortcut::ToggleFullscreen);
    }
    None
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// App ids opened by the keyboard launch targets.
pub struct ShortcutTargets {
    pub task_manager: AppId,
    pub file_explorer: AppId,
    pub terminal: AppId,
    pub settings: AppId,
}

impl Default for ShortcutTargets {
    fn default() -> Self {
        Self {
            task_manager: AppId::TaskManager,
            file_explorer: AppId::Explorer,
            terminal: AppId::Terminal,
            settings: AppId::Settings,
        }
    }
}

impl ShortcutTargets {
    pub fn resolve(&self, target: LaunchTarget) -> AppId {
        match target {
            LaunchTarget::TaskManager => self.task_manager,
            LaunchTarget::FileExplorer => self.file_explorer,
            LaunchTarget::Terminal => self.terminal,
            LaunchTarget::Settings => self.settings,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Window fields needed to compute focus order.
pub struct FocusCandidate {
    pub id: WindowId,
    pub z_index: u32,
    pub minimized: bool,
}

/// Non-minimized windows, frontmost first. Equal z-indices keep their input order.
pub fn focus_order(windows: &[FocusCandidate]) -> Vec<WindowId> {
    let mut focusable: Vec<&FocusCandidate> = windows.iter().filter(|w| !w.minimized).collect();
    focusable.sort_by(|a, b| b.z_index.cmp(&a.z_index));
    focusable.into_iter().map(|w| w.id).collect()
}

/// Shell operations the dispatcher invokes.
pub trait ShortcutHost {
    /// Windows on the active desktop, in host order.
    fn windows(&self) -> Vec<FocusCandidate>;
    fn focus_window(&mut self, window_id: WindowId);
    fn minimize_window(&mut self, window_id: WindowId);
    fn close_window(&mut self, window_id: WindowId);
    /// Opens or focuses `app_id`. Returns `false` when the app is not registered.
    fn open_app(&mut self, app_id: AppId) -> bool;
    /// Returns `false` when the surface is not available.
    fn toggle_surface(&mut self, surface: ShellSurface) -> bool;
    fn toggle_fullscreen(&mut self);
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShortcutDispatchState {
    pub alt_tab_active: bool,
    /// Position in the focus order; meaningful only while `alt_tab_active`.
    pub alt_tab_index: usize,
    /// Meta went down and no other key has been pressed since. Releasing Meta in this state
    /// toggles the launcher.
    pub meta_tap_pending: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShortcutDispatcher {
    state: ShortcutDispatchState,
    targets: ShortcutTargets,
}

impl ShortcutDispatcher {
    pub fn new(targets: ShortcutTargets) -> Self {
        Self {
            state: ShortcutDispatchState::default(),
            targets,
        }
    }

    pub fn state(&self) -> ShortcutDispatchState {
        self.state
    }

    /// Window the alt-tab cycle currently points at, for the switcher overlay.
    pub fn alt_tab_preview(&self, windows: &[FocusCandidate]) -> Option<WindowId> {
        if !self.state.alt_tab_active {
            return None;
        }
        focus_order(windows).get(self.state.alt_tab_index).copied()
    }

    /// Handles a key press. A bare Meta press only arms the launcher toggle, which fires on
    /// release unless another key goes down first.
    pub fn handle_key_down(&mut self, input: &KeyInput, host: &mut dyn ShortcutHost) -> KeyOutcome {
        let meta_tap = self.state.meta_tap_pending && input.is_meta_key();
        self.state.meta_tap_pending = meta_tap;
        if input.editable_target {
            return KeyOutcome::Ignored;
        }
        let Some(shortcut) = classify_chord(input) else {
            return KeyOutcome::Ignored;
        };

        match shortcut {
            Shortcut::ToggleSurface(ShellSurface::StartMenu) if input.is_meta_key() => {
                self.state.meta_tap_pending = true;
            }
            Shortcut::CycleWindows => {
                let len = focus_order(&host.windows()).len();
                if len >= 2 {
                    self.state.alt_tab_active = true;
                    self.state.alt_tab_index = (self.state.alt_tab_index + 1) % len;
                }
            }
            Shortcut::ToggleSurface(surface) => {
                if !host.toggle_surface(surface) {
                    leptos::logging::warn!("shortcut surface `{}` unavailable", surface.css_id());
                }
            }
            Shortcut::OpenApp(target) => {
                let app_id = self.targets.resolve(target);
                if !host.open_app(app_id) {
                    leptos::logging::warn!("shortcut app `{}` not registered", app_id.slug());
                }
            }
            Shortcut::ShowDesktop => {
                for window_id in focus_order(&host.windows()) {
                    host.minimize_window(window_id);
                }
            }
            Shortcut::CloseFrontmost => {
                if let Some(window_id) = focus_order(&host.windows()).first().copied() {
                    host.close_window(window_id);
                }
            }
            Shortcut::ToggleFullscreen => host.toggle_fullscreen(),
        }
        KeyOutcome::Handled
    }

    /// Resolves an alt-tab cycle when Alt is released and a Meta tap when Meta is released.
    ///
    /// Alt release is honoured even from editable targets so a cycle can always end.
    pub fn handle_key_up(&mut self, input: &KeyInput, host: &mut dyn ShortcutHost) -> KeyOutcome {
        if input.is_meta_key() {
            if !std::mem::take(&mut self.state.meta_tap_pending) {
                return KeyOutcome::Ignored;
            }
            if !host.toggle_surface(ShellSurface::StartMenu) {
                leptos::logging::warn!("shortcut surface `start-menu` unavailable");
            }
            return KeyOutcome::Handled;
        }
        if input.key != "Alt" || !self.state.alt_tab_active {
            return KeyOutcome::Ignored;
        }

        let index = self.state.alt_tab_index;
        self.state.alt_tab_active = false;
        self.state.alt_tab_index = 0;
        if let Some(window_id) = focus_order(&host.windows()).get(index).copied() {
            host.focus_window(window_id);
        }
        KeyOutcome::Handled
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum HostCall {
        Focus(WindowId),
        Minimize(WindowId),
        Close(WindowId),
        OpenApp(AppId),
        ToggleSurface(ShellSurface),
        ToggleFullscreen,
    }

    #[derive(Default)]
    struct RecordingHost {
        windows: Vec<FocusCandidate>,
        registered: Vec<AppId>,
        calls: Vec<HostCall>,
    }

    impl RecordingHost {
        fn with_windows(windows: &[(u64, u32, bool)]) -> Self {
            Self {
                windows: windows
                    .iter()
                    .map(|&(id, z_index, minimized)| FocusCandidate {
                        id: WindowId(id),
                        z_index,
                        minimized,
                    })
                    .collect(),
                registered: vec![AppId::Explorer, AppId::Terminal, AppId::Settings],
                calls: Vec::new(),
            }
        }
    }

    impl ShortcutHost for RecordingHost {
        fn windows(&self) -> Vec<FocusCandidate> {
            self.windows.clone()
        }

        fn focus_window(&mut self, window_id: WindowId) {
            self.calls.push(HostCall::Focus(window_id));
        }

        fn minimize_window(&mut self, window_id: WindowId) {
            self.calls.push(HostCall::Minimize(window_id));
        }

        fn close_window(&mut self, window_id: WindowId) {
            self.calls.push(HostCall::Close(window_id));
        }

        fn open_app(&mut self, app_id: AppId) -> bool {
            self.calls.push(HostCall::OpenApp(app_id));
            self.registered.contains(&app_id)
        }

        fn toggle_surface(&mut self, surface: ShellSurface) -> bool {
            self.calls.push(HostCall::ToggleSurface(surface));
            true
        }

        fn toggle_fullscreen(&mut self) {
            self.calls.push(HostCall::ToggleFullscreen);
        }
    }

    fn alt_tab() -> KeyInput {
        KeyInput::new("Tab").with_alt()
    }

    fn alt_up() -> KeyInput {
        KeyInput::new("Alt")
    }

    fn meta_down() -> KeyInput {
        KeyInput::new("Meta").with_meta()
    }

    fn meta_up() -> KeyInput {
        KeyInput::new("Meta")
    }

    #[test]
    fn chord_table_classification() {
        let cases = [
            (
                KeyInput::new("Meta").with_meta(),
                Some(Shortcut::ToggleSurface(ShellSurface::StartMenu)),
            ),
            (
                KeyInput::new("Delete").with_ctrl().with_alt(),
                Some(Shortcut::OpenApp(LaunchTarget::TaskManager)),
            ),
            (KeyInput::new("d").with_meta(), Some(Shortcut::ShowDesktop)),
            (
                KeyInput::new("E").with_meta().with_shift(),
                Some(Shortcut::OpenApp(LaunchTarget::FileExplorer)),
            ),
            (KeyInput::new("r").with_meta(), Some(Shortcut::OpenApp(LaunchTarget::Terminal))),
            (
                KeyInput::new("t").with_ctrl().with_alt(),
                Some(Shortcut::OpenApp(LaunchTarget::Terminal)),
            ),
            (KeyInput::new("i").with_meta(), Some(Shortcut::OpenApp(LaunchTarget::Settings))),
            (KeyInput::new("s").with_meta(), Some(Shortcut::ToggleSurface(ShellSurface::Search))),
            (KeyInput::new(" ").with_ctrl(), Some(Shortcut::ToggleSurface(ShellSurface::Search))),
            (
                KeyInput::new("Tab").with_meta(),
                Some(Shortcut::ToggleSurface(ShellSurface::TaskView)),
            ),
            (
                KeyInput::new("l").with_meta(),
                Some(Shortcut::ToggleSurface(ShellSurface::LockScreen)),
            ),
            (KeyInput::new("F4").with_alt(), Some(Shortcut::CloseFrontmost)),
            (KeyInput::new("F11"), Some(Shortcut::ToggleFullscreen)),
            (alt_tab(), Some(Shortcut::CycleWindows)),
            (KeyInput::new("e"), None),
            (KeyInput::new("Meta").with_meta().with_ctrl(), None),
            (KeyInput::new("Tab"), None),
        ];
        for (input, expected) in cases {
            assert_eq!(classify_chord(&input), expected, "{input:?}");
        }
    }

    #[test]
    fn focus_order_drops_minimized_and_is_stable() {
        let windows = RecordingHost::with_windows(&[
            (1, 2, false),
            (2, 5, false),
            (3, 9, true),
            (4, 2, false),
        ])
        .windows;
        assert_eq!(
            focus_order(&windows),
            vec![WindowId(2), WindowId(1), WindowId(4)]
        );
    }

    #[test]
    fn alt_tab_cycles_and_focuses_on_release() {
        let mut host = RecordingHost::with_windows(&[
            (1, 1, false),
            (2, 2, false),
            (3, 3, false),
        ]);
        let mut dispatcher = ShortcutDispatcher::default();

        assert_eq!(dispatcher.handle_key_down(&alt_tab(), &mut host), KeyOutcome::Handled);
        assert_eq!(dispatcher.state().alt_tab_index, 1);
        assert_eq!(dispatcher.alt_tab_preview(&host.windows), Some(WindowId(2)));
        dispatcher.handle_key_down(&alt_tab(), &mut host);
        assert_eq!(dispatcher.state().alt_tab_index, 2);

        assert_eq!(dispatcher.handle_key_up(&alt_up(), &mut host), KeyOutcome::Handled);
        assert_eq!(host.calls, vec![HostCall::Focus(WindowId(1))]);
        assert_eq!(dispatcher.state(), ShortcutDispatchState::default());
    }

    #[test]
    fn alt_tab_index_wraps_around() {
        let mut host = RecordingHost::with_windows(&[(1, 1, false), (2, 2, false)]);
        let mut dispatcher = ShortcutDispatcher::default();
        dispatcher.handle_key_down(&alt_tab(), &mut host);
        dispatcher.handle_key_down(&alt_tab(), &mut host);
        assert_eq!(dispatcher.state().alt_tab_index, 0);

        dispatcher.handle_key_up(&alt_up(), &mut host);
        assert_eq!(host.calls, vec![HostCall::Focus(WindowId(2))]);
    }

    #[test]
    fn release_uses_window_order_at_release_time() {
        let mut host = RecordingHost::with_windows(&[
            (1, 1, false),
            (2, 2, false),
            (3, 3, false),
        ]);
        let mut dispatcher = ShortcutDispatcher::default();
        dispatcher.handle_key_down(&alt_tab(), &mut host);
        dispatcher.handle_key_down(&alt_tab(), &mut host);

        host.windows[0].z_index = 10;
        dispatcher.handle_key_up(&alt_up(), &mut host);
        assert_eq!(host.calls, vec![HostCall::Focus(WindowId(2))]);
    }

    #[test]
    fn release_after_windows_vanish_is_a_noop() {
        let mut host = RecordingHost::with_windows(&[
            (1, 1, false),
            (2, 2, false),
            (3, 3, false),
        ]);
        let mut dispatcher = ShortcutDispatcher::default();
        dispatcher.handle_key_down(&alt_tab(), &mut host);
        dispatcher.handle_key_down(&alt_tab(), &mut host);

        host.windows.truncate(1);
        assert_eq!(dispatcher.handle_key_up(&alt_up(), &mut host), KeyOutcome::Handled);
        assert!(host.calls.is_empty());
        assert!(!dispatcher.state().alt_tab_active);
    }

    #[test]
    fn alt_tab_with_one_window_is_suppressed_without_cycling() {
        let mut host = RecordingHost::with_windows(&[(1, 1, false), (2, 2, true)]);
        let mut dispatcher = ShortcutDispatcher::default();
        assert_eq!(dispatcher.handle_key_down(&alt_tab(), &mut host), KeyOutcome::Handled);
        assert!(!dispatcher.state().alt_tab_active);
        assert_eq!(dispatcher.handle_key_up(&alt_up(), &mut host), KeyOutcome::Ignored);
        assert!(host.calls.is_empty());
    }

    #[test]
    fn other_keys_do_not_resolve_a_cycle() {
        let mut host = RecordingHost::with_windows(&[(1, 1, false), (2, 2, false)]);
        let mut dispatcher = ShortcutDispatcher::default();
        dispatcher.handle_key_down(&alt_tab(), &mut host);
        dispatcher.handle_key_up(&KeyInput::new("Tab").with_alt(), &mut host);
        assert!(dispatcher.state().alt_tab_active);
        assert!(host.calls.is_empty());
    }

    #[test]
    fn editable_targets_are_ignored() {
        let mut host = RecordingHost::with_windows(&[(1, 1, false), (2, 2, false)]);
        let mut dispatcher = ShortcutDispatcher::default();
        let input = KeyInput::new("e").with_meta().in_editable_target();
        assert_eq!(dispatcher.handle_key_down(&input, &mut host), KeyOutcome::Ignored);
        assert_eq!(
            dispatcher.handle_key_down(&alt_tab().in_editable_target(), &mut host),
            KeyOutcome::Ignored
        );
        assert!(host.calls.is_empty());
        assert!(!dispatcher.state().alt_tab_active);
    }

    #[test]
    fn show_desktop_minimizes_every_visible_window() {
        let mut host = RecordingHost::with_windows(&[(1, 1, false), (2, 3, true), (3, 2, false)]);
        let mut dispatcher = ShortcutDispatcher::default();
        let input = KeyInput::new("d").with_meta();
        assert_eq!(dispatcher.handle_key_down(&input, &mut host), KeyOutcome::Handled);
        assert_eq!(
            host.calls,
            vec![HostCall::Minimize(WindowId(3)), HostCall::Minimize(WindowId(1))]
        );
    }

    #[test]
    fn alt_f4_closes_frontmost_or_does_nothing() {
        let mut host = RecordingHost::with_windows(&[(1, 4, false), (2, 7, true), (3, 2, false)]);
        let mut dispatcher = ShortcutDispatcher::default();
        let input = KeyInput::new("F4").with_alt();
        dispatcher.handle_key_down(&input, &mut host);
        assert_eq!(host.calls, vec![HostCall::Close(WindowId(1))]);

        let mut empty = RecordingHost::default();
        assert_eq!(dispatcher.handle_key_down(&input, &mut empty), KeyOutcome::Handled);
        assert!(empty.calls.is_empty());
    }

    #[test]
    fn unregistered_app_is_still_handled() {
        let mut host = RecordingHost::with_windows(&[]);
        let mut dispatcher = ShortcutDispatcher::default();
        let input = KeyInput::new("Delete").with_ctrl().with_alt();
        assert_eq!(dispatcher.handle_key_down(&input, &mut host), KeyOutcome::Handled);
        assert_eq!(host.calls, vec![HostCall::OpenApp(AppId::TaskManager)]);
    }

    #[test]
    fn launch_targets_follow_configured_apps() {
        let mut host = RecordingHost::with_windows(&[]);
        let mut dispatcher = ShortcutDispatcher::new(ShortcutTargets {
            terminal: AppId::Notepad,
            ..ShortcutTargets::default()
        });
        dispatcher.handle_key_down(&KeyInput::new("r").with_meta(), &mut host);
        dispatcher.handle_key_down(&KeyInput::new("F11"), &mut host);
        dispatcher.handle_key_down(&KeyInput::new("Meta").with_meta(), &mut host);
        dispatcher.handle_key_up(&KeyInput::new("Meta"), &mut host);
        assert_eq!(
            host.calls,
            vec![
                HostCall::OpenApp(AppId::Notepad),
                HostCall::ToggleFullscreen,
                HostCall::ToggleSurface(ShellSurface::StartMenu),
            ]
        );
    }

    #[test]
    fn meta_chord_does_not_toggle_launcher() {
        let mut host = RecordingHost::with_windows(&[(1, 1, false)]);
        let mut dispatcher = ShortcutDispatcher::default();

        assert_eq!(dispatcher.handle_key_down(&meta_down(), &mut host), KeyOutcome::Handled);
        assert!(host.calls.is_empty());
        dispatcher.handle_key_down(&KeyInput::new("d").with_meta(), &mut host);
        assert_eq!(dispatcher.handle_key_up(&meta_up(), &mut host), KeyOutcome::Ignored);

        assert_eq!(host.calls, vec![HostCall::Minimize(WindowId(1))]);
        assert!(!dispatcher.state().meta_tap_pending);
    }

    #[test]
    fn meta_tap_toggles_launcher_on_release() {
        let mut host = RecordingHost::with_windows(&[]);
        let mut dispatcher = ShortcutDispatcher::default();

        dispatcher.handle_key_down(&meta_down(), &mut host);
        // Key repeat keeps the tap armed.
        dispatcher.handle_key_down(&meta_down(), &mut host);
        assert!(dispatcher.state().meta_tap_pending);
        assert_eq!(dispatcher.handle_key_up(&meta_up(), &mut host), KeyOutcome::Handled);
        assert_eq!(host.calls, vec![HostCall::ToggleSurface(ShellSurface::StartMenu)]);

        // Release without a preceding press does nothing.
        assert_eq!(dispatcher.handle_key_up(&meta_up(), &mut host), KeyOutcome::Ignored);
        assert_eq!(host.calls.len(), 1);
    }

    #[test]
    fn typing_in_a_field_while_meta_is_held_cancels_the_tap() {
        let mut host = RecordingHost::with_windows(&[]);
        let mut dispatcher = ShortcutDispatcher::default();

        dispatcher.handle_key_down(&meta_down(), &mut host);
        dispatcher.handle_key_down(&KeyInput::new("v").with_meta().in_editable_target(), &mut host);
        assert_eq!(dispatcher.handle_key_up(&meta_up(), &mut host), KeyOutcome::Ignored);
        assert!(host.calls.is_empty());
    }
}
