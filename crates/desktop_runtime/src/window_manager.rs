//! Shared window-stack transition helpers used by the desktop reducer.

use crate::model::{DesktopState, WindowId};

/// Minimum allowed managed window width.
pub const MIN_WINDOW_WIDTH: i32 = 220;
/// Minimum allowed managed window height.
pub const MIN_WINDOW_HEIGHT: i32 = 140;

/// Focuses and raises `window_id`, ensuring it is the top/focused non-minimized window.
///
/// Returns `false` when the window does not exist.
pub fn focus_window_internal(state: &mut DesktopState, window_id: WindowId) -> bool {
    let Some(index) = state.windows.iter().position(|w| w.id == window_id) else {
        return false;
    };

    let already_focused_top = index + 1 == state.windows.len()
        && state
            .windows
            .get(index)
            .map(|w| w.is_focused && !w.minimized)
            .unwrap_or(false);
    if already_focused_top {
        return true;
    }

    for window in &mut state.windows {
        window.is_focused = false;
    }
    let mut window = state.windows.remove(index);
    window.is_focused = true;
    window.minimized = false;
    state.windows.push(window);
    normalize_window_stack(state);
    true
}

/// Normalizes z-index ordering and focus invariants for all managed windows.
///
/// The `windows` vector is the stacking order: z-index is position + 1, and at most one
/// non-minimized window is focused (the topmost one when focus was lost).
pub fn normalize_window_stack(state: &mut DesktopState) {
    let mut has_focused = false;
    for (idx, window) in state.windows.iter_mut().enumerate() {
        window.z_index = (idx + 1) as u32;
        if window.minimized {
            window.is_focused = false;
        }
        if window.is_focused {
            if has_focused {
                window.is_focused = false;
            } else {
                has_focused = true;
            }
        }
    }

    if !has_focused {
        if let Some(last_non_minimized) = state.windows.iter_mut().rev().find(|w| !w.minimized) {
            last_non_minimized.is_focused = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AppId, WindowRecord, WindowRect};

    fn record(id: u64, minimized: bool) -> WindowRecord {
        WindowRecord {
            id: WindowId(id),
            app_id: AppId::Notepad,
            title: format!("Window {id}"),
            rect: WindowRect::default(),
            restore_rect: None,
            z_index: 0,
            is_focused: false,
            minimized,
            maximized: false,
        }
    }

    #[test]
    fn normalize_assigns_stack_positions_and_focuses_top_visible_window() {
        let mut state = DesktopState {
            windows: vec![record(1, false), record(2, false), record(3, true)],
            ..DesktopState::default()
        };

        normalize_window_stack(&mut state);

        let z: Vec<u32> = state.windows.iter().map(|w| w.z_index).collect();
        assert_eq!(z, vec![1, 2, 3]);
        assert_eq!(state.focused_window_id(), Some(WindowId(2)));
    }

    #[test]
    fn focus_raises_and_unminimizes() {
        let mut state = DesktopState {
            windows: vec![record(1, true), record(2, false)],
            ..DesktopState::default()
        };

        assert!(focus_window_internal(&mut state, WindowId(1)));
        let top = state.windows.last().expect("top window");
        assert_eq!(top.id, WindowId(1));
        assert!(!top.minimized);
        assert_eq!(top.z_index, 2);
        assert_eq!(state.focused_window_id(), Some(WindowId(1)));
    }

    #[test]
    fn focus_unknown_window_reports_false() {
        let mut state = DesktopState::default();
        assert!(!focus_window_internal(&mut state, WindowId(9)));
    }
}
