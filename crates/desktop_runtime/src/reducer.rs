//! Reducer actions, side-effect intents, and transition logic for the host window list.

use thiserror::Error;

use crate::{
    model::{
        AppId, DesktopState, DragSession, InteractionState, OpenWindowRequest, PointerPosition,
        ShellSurface, WindowId, WindowRecord, WindowRect, DEFAULT_WINDOW_HEIGHT,
        DEFAULT_WINDOW_WIDTH,
    },
    snap::{SnapPlacement, SnapZone},
    window_manager::{
        focus_window_internal, normalize_window_stack, MIN_WINDOW_HEIGHT, MIN_WINDOW_WIDTH,
    },
};

#[derive(Debug, Clone, PartialEq)]
/// Actions accepted by [`reduce_desktop`] to mutate [`DesktopState`].
pub enum DesktopAction {
    /// Open a new window using the supplied request.
    OpenWindow(OpenWindowRequest),
    /// Focus the most recent window of an app, or open one when none exists.
    ActivateApp {
        /// Application to bring forward.
        app_id: AppId,
    },
    /// Close a window by id.
    CloseWindow {
        /// Window to close.
        window_id: WindowId,
    },
    /// Focus (and raise) a window by id.
    FocusWindow {
        /// Window to focus.
        window_id: WindowId,
    },
    /// Minimize a window.
    MinimizeWindow {
        /// Window to minimize.
        window_id: WindowId,
    },
    /// Un-minimize a window, or return a snapped window to its floating geometry.
    RestoreWindow {
        /// Window to restore.
        window_id: WindowId,
    },
    /// Toggle a shell surface; opening one closes any other.
    ToggleSurface {
        /// Surface to toggle.
        surface: ShellSurface,
    },
    /// Close whichever shell surface is open.
    CloseSurfaces,
    /// Begin dragging a window.
    BeginMove {
        /// Window being dragged.
        window_id: WindowId,
        /// Pointer position at drag start.
        pointer: PointerPosition,
    },
    /// Update an in-progress window drag.
    UpdateMove {
        /// Current pointer position.
        pointer: PointerPosition,
    },
    /// End the active window drag, optionally applying a snap placement.
    EndMove {
        /// Placement resolved from the release position, if it hit a snap zone.
        snap: Option<SnapPlacement>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Side-effect intents emitted by [`reduce_desktop`] for the shell runtime to execute.
pub enum RuntimeEffect {
    /// Move focus into the newly focused window's primary input.
    FocusWindowInput(WindowId),
    /// Claim a newly opened window for the active virtual desktop.
    AssignToActiveDesktop(WindowId),
    /// Make sure the focused window is on the visible desktop (switching desktops if needed).
    RevealWindowDesktop(WindowId),
    /// Drop a closed window from every virtual desktop.
    ReleaseFromDesktops(WindowId),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Reducer errors for invalid actions (for example, referencing a missing window).
pub enum ReducerError {
    /// The target window id was not found in the current state.
    #[error("window not found")]
    WindowNotFound,
}

/// Applies a [`DesktopAction`] to the host window list and collects resulting side effects.
///
/// # Errors
///
/// Returns [`ReducerError::WindowNotFound`] when an action references a window that is not present.
pub fn reduce_desktop(
    state: &mut DesktopState,
    interaction: &mut InteractionState,
    action: DesktopAction,
) -> Result<Vec<RuntimeEffect>, ReducerError> {
    let mut effects = Vec::new();
    match action {
        DesktopAction::OpenWindow(req) => {
            let window_id = open_window(state, req);
            effects.push(RuntimeEffect::AssignToActiveDesktop(window_id));
            effects.push(RuntimeEffect::FocusWindowInput(window_id));
        }
        DesktopAction::ActivateApp { app_id } => {
            let existing = state
                .windows
                .iter()
                .rev()
                .find(|w| w.app_id == app_id)
                .map(|w| w.id);
            match existing {
                Some(window_id) => {
                    focus(state, window_id)?;
                    effects.push(RuntimeEffect::RevealWindowDesktop(window_id));
                    effects.push(RuntimeEffect::FocusWindowInput(window_id));
                }
                None => {
                    let window_id =
                        open_window(state, crate::apps::default_open_request(app_id));
                    effects.push(RuntimeEffect::AssignToActiveDesktop(window_id));
                    effects.push(RuntimeEffect::FocusWindowInput(window_id));
                }
            }
        }
        DesktopAction::CloseWindow { window_id } => {
            let before_len = state.windows.len();
            state.windows.retain(|w| w.id != window_id);
            if state.windows.len() == before_len {
                return Err(ReducerError::WindowNotFound);
            }
            if interaction
                .dragging
                .as_ref()
                .is_some_and(|session| session.window_id == window_id)
            {
                interaction.dragging = None;
            }
            effects.push(RuntimeEffect::ReleaseFromDesktops(window_id));
        }
        DesktopAction::FocusWindow { window_id } => {
            focus(state, window_id)?;
            effects.push(RuntimeEffect::RevealWindowDesktop(window_id));
            effects.push(RuntimeEffect::FocusWindowInput(window_id));
        }
        DesktopAction::MinimizeWindow { window_id } => {
            let window = find_window_mut(state, window_id)?;
            window.minimized = true;
            window.is_focused = false;
        }
        DesktopAction::RestoreWindow { window_id } => {
            let window = find_window_mut(state, window_id)?;
            if window.minimized {
                window.minimized = false;
            } else if let Some(restore_rect) = window.restore_rect.take() {
                window.rect = restore_rect;
                window.maximized = false;
            }
            focus(state, window_id)?;
            effects.push(RuntimeEffect::FocusWindowInput(window_id));
        }
        DesktopAction::ToggleSurface { surface } => {
            state.open_surface = if state.open_surface == Some(surface) {
                None
            } else {
                Some(surface)
            };
        }
        DesktopAction::CloseSurfaces => {
            state.open_surface = None;
        }
        DesktopAction::BeginMove { window_id, pointer } => {
            let rect_start = find_window_mut(state, window_id)?.rect;
            focus(state, window_id)?;
            interaction.dragging = Some(DragSession {
                window_id,
                pointer_start: pointer,
                rect_start,
            });
        }
        DesktopAction::UpdateMove { pointer } => {
            if let Some(session) = interaction.dragging.as_ref() {
                let dx = pointer.x - session.pointer_start.x;
                let dy = pointer.y - session.pointer_start.y;
                let rect_start = session.rect_start;
                let window = find_window_mut(state, session.window_id)?;
                // Dragging a maximized or snapped window peels it back to its floating size.
                let (w, h) = match window.restore_rect.take() {
                    Some(restore_rect) => (restore_rect.w, restore_rect.h),
                    None => (window.rect.w, window.rect.h),
                };
                window.rect = WindowRect {
                    w,
                    h,
                    ..rect_start.offset(dx, dy)
                };
                window.maximized = false;
            }
        }
        DesktopAction::EndMove { snap } => {
            let dragged = interaction.dragging.take();
            if let (Some(session), Some(placement)) = (dragged, snap) {
                let window = find_window_mut(state, session.window_id)?;
                if window.restore_rect.is_none() {
                    window.restore_rect = Some(window.rect);
                }
                window.rect = placement
                    .rect
                    .clamped_min(MIN_WINDOW_WIDTH, MIN_WINDOW_HEIGHT);
                window.maximized = placement.zone == SnapZone::Top;
                window.minimized = false;
            }
        }
    }

    normalize_window_stack(state);
    Ok(effects)
}

fn open_window(state: &mut DesktopState, req: OpenWindowRequest) -> WindowId {
    let window_id = next_window_id(state);
    let default_offset = ((window_id.0 as i32) - 1) % 8 * 24;
    let rect = req
        .rect
        .unwrap_or(WindowRect {
            x: 48 + default_offset,
            y: 64 + default_offset,
            w: DEFAULT_WINDOW_WIDTH,
            h: DEFAULT_WINDOW_HEIGHT,
        })
        .clamped_min(MIN_WINDOW_WIDTH, MIN_WINDOW_HEIGHT);
    state.windows.push(WindowRecord {
        id: window_id,
        app_id: req.app_id,
        title: req.title.unwrap_or_else(|| req.app_id.title().to_string()),
        rect,
        restore_rect: None,
        z_index: 0,
        is_focused: false,
        minimized: false,
        maximized: false,
    });
    focus_window_internal(state, window_id);
    state.open_surface = None;
    window_id
}

fn next_window_id(state: &mut DesktopState) -> WindowId {
    let id = WindowId(state.next_window_id);
    state.next_window_id = state.next_window_id.saturating_add(1);
    id
}

fn find_window_mut(
    state: &mut DesktopState,
    window_id: WindowId,
) -> Result<&mut WindowRecord, ReducerError> {
    state
        .windows
        .iter_mut()
        .find(|w| w.id == window_id)
        .ok_or(ReducerError::WindowNotFound)
}

fn focus(state: &mut DesktopState, window_id: WindowId) -> Result<(), ReducerError> {
    if focus_window_internal(state, window_id) {
        state.open_surface = None;
        Ok(())
    } else {
        Err(ReducerError::WindowNotFound)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn open(state: &mut DesktopState, interaction: &mut InteractionState, app_id: AppId) -> WindowId {
        reduce_desktop(
            state,
            interaction,
            DesktopAction::OpenWindow(OpenWindowRequest::new(app_id)),
        )
        .expect("open window");
        state.windows.last().expect("window").id
    }

    #[test]
    fn open_window_focuses_new_window_and_claims_active_desktop() {
        let mut state = DesktopState::default();
        let mut interaction = InteractionState::default();

        let first = open(&mut state, &mut interaction, AppId::Explorer);
        let effects = reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::OpenWindow(OpenWindowRequest::new(AppId::Notepad)),
        )
        .expect("open second");
        let second = state.windows.last().expect("window").id;

        assert_eq!(state.focused_window_id(), Some(second));
        assert_eq!(state.windows[0].id, first);
        assert_eq!(state.windows[1].z_index, 2);
        assert_eq!(
            effects,
            vec![
                RuntimeEffect::AssignToActiveDesktop(second),
                RuntimeEffect::FocusWindowInput(second),
            ]
        );
    }

    #[test]
    fn activate_app_focuses_existing_window_instead_of_opening() {
        let mut state = DesktopState::default();
        let mut interaction = InteractionState::default();

        let terminal = open(&mut state, &mut interaction, AppId::Terminal);
        let _notes = open(&mut state, &mut interaction, AppId::Notepad);
        reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::MinimizeWindow {
                window_id: terminal,
            },
        )
        .expect("minimize");

        let effects = reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::ActivateApp {
                app_id: AppId::Terminal,
            },
        )
        .expect("activate");

        assert_eq!(state.windows.len(), 2);
        assert_eq!(state.focused_window_id(), Some(terminal));
        assert!(effects.contains(&RuntimeEffect::RevealWindowDesktop(terminal)));
    }

    #[test]
    fn activate_app_opens_window_when_none_exists() {
        let mut state = DesktopState::default();
        let mut interaction = InteractionState::default();

        reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::ActivateApp {
                app_id: AppId::TaskManager,
            },
        )
        .expect("activate");

        assert_eq!(state.windows.len(), 1);
        assert_eq!(state.windows[0].app_id, AppId::TaskManager);
        assert_eq!(state.windows[0].title, "Task Manager");
    }

    #[test]
    fn close_window_releases_desktop_membership_and_refocuses() {
        let mut state = DesktopState::default();
        let mut interaction = InteractionState::default();

        let first = open(&mut state, &mut interaction, AppId::Explorer);
        let second = open(&mut state, &mut interaction, AppId::Terminal);

        let effects = reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::CloseWindow { window_id: second },
        )
        .expect("close");

        assert_eq!(effects, vec![RuntimeEffect::ReleaseFromDesktops(second)]);
        assert_eq!(state.focused_window_id(), Some(first));
        assert_eq!(
            reduce_desktop(
                &mut state,
                &mut interaction,
                DesktopAction::CloseWindow { window_id: second },
            ),
            Err(ReducerError::WindowNotFound)
        );
    }

    #[test]
    fn toggle_surface_replaces_and_closes() {
        let mut state = DesktopState::default();
        let mut interaction = InteractionState::default();

        for surface in [ShellSurface::StartMenu, ShellSurface::Search] {
            reduce_desktop(
                &mut state,
                &mut interaction,
                DesktopAction::ToggleSurface { surface },
            )
            .expect("toggle");
        }
        assert_eq!(state.open_surface, Some(ShellSurface::Search));

        reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::ToggleSurface {
                surface: ShellSurface::Search,
            },
        )
        .expect("toggle off");
        assert_eq!(state.open_surface, None);
    }

    #[test]
    fn drag_moves_window_and_snap_applies_placement() {
        let mut state = DesktopState::default();
        let mut interaction = InteractionState::default();
        let win = open(&mut state, &mut interaction, AppId::Terminal);
        let original = state.window(win).expect("window").rect;

        reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::BeginMove {
                window_id: win,
                pointer: PointerPosition { x: 10, y: 10 },
            },
        )
        .expect("begin");
        reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::UpdateMove {
                pointer: PointerPosition { x: 35, y: 50 },
            },
        )
        .expect("update");

        let moved = state.window(win).expect("window").rect;
        assert_eq!(moved.x, original.x + 25);
        assert_eq!(moved.y, original.y + 40);

        let snapped = WindowRect {
            x: 8,
            y: 56,
            w: 948,
            h: 1008,
        };
        reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::EndMove {
                snap: Some(SnapPlacement {
                    zone: SnapZone::Left,
                    rect: snapped,
                }),
            },
        )
        .expect("end");

        let record = state.window(win).expect("window");
        assert_eq!(record.rect, snapped);
        assert_eq!(record.restore_rect, Some(moved));
        assert!(!record.maximized);
        assert!(interaction.dragging.is_none());

        reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::RestoreWindow { window_id: win },
        )
        .expect("restore");
        assert_eq!(state.window(win).expect("window").rect, moved);
    }

    #[test]
    fn top_snap_marks_window_maximized() {
        let mut state = DesktopState::default();
        let mut interaction = InteractionState::default();
        let win = open(&mut state, &mut interaction, AppId::Explorer);

        reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::BeginMove {
                window_id: win,
                pointer: PointerPosition { x: 0, y: 0 },
            },
        )
        .expect("begin");
        reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::EndMove {
                snap: Some(SnapPlacement {
                    zone: SnapZone::Top,
                    rect: WindowRect {
                        x: 8,
                        y: 56,
                        w: 1904,
                        h: 1008,
                    },
                }),
            },
        )
        .expect("end");

        assert!(state.window(win).expect("window").maximized);
    }

    #[test]
    fn end_move_without_snap_keeps_dragged_geometry() {
        let mut state = DesktopState::default();
        let mut interaction = InteractionState::default();
        let win = open(&mut state, &mut interaction, AppId::Explorer);
        let before = state.window(win).expect("window").rect;

        reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::BeginMove {
                window_id: win,
                pointer: PointerPosition { x: 0, y: 0 },
            },
        )
        .expect("begin");
        reduce_desktop(
            &mut state,
            &mut interaction,
            DesktopAction::EndMove { snap: None },
        )
        .expect("end");

        let record = state.window(win).expect("window");
        assert_eq!(record.rect, before);
        assert_eq!(record.restore_rect, None);
    }
}
