//! Virtual desktop workspaces: membership, persistence, and the animated switch state machine.
//!
//! Each window belongs to at most one desktop. Only windows on the active desktop are visible;
//! windows on no desktop are hidden everywhere. Switching is a two-phase transition driven by the
//! injected [`Scheduler`]:
//!
//! ```text
//! Idle --switch--> Transitioning { committed: false }
//!      --commit delay--> Transitioning { committed: true } (active desktop updated)
//!      --settle delay--> Idle
//! ```
//!
//! A newer switch cancels the outstanding phase callbacks of the older one. Every callback also
//! carries the generation it was scheduled for, so a callback that slips past cancellation is
//! ignored. The manager never holds a state borrow while calling into the scheduler or the change
//! listener.

use std::{
    cell::RefCell,
    fmt,
    rc::{Rc, Weak},
    time::Duration,
};

use platform_host::{unix_time_ms_now, PrefsStore, Scheduler, TimerHandle};
use serde::{Deserialize, Serialize};

use crate::{
    config::TransitionTimings,
    model::WindowId,
    persistence::{self, LayoutSource},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
/// Stable virtual desktop identifier. Ids are never reused within a session.
pub struct DesktopId(pub u64);

/// Identifier of the desktop created when no valid persisted state exists.
pub const BOOTSTRAP_DESKTOP_ID: DesktopId = DesktopId(1);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtualDesktop {
    pub id: DesktopId,
    pub name: String,
    /// Member windows in insertion order.
    pub window_ids: Vec<WindowId>,
    pub created_at_ms: u64,
}

impl VirtualDesktop {
    pub fn bootstrap(created_at_ms: u64) -> Self {
        Self {
            id: BOOTSTRAP_DESKTOP_ID,
            name: "Desktop 1".to_string(),
            window_ids: Vec::new(),
            created_at_ms,
        }
    }

    pub fn contains(&self, window_id: WindowId) -> bool {
        self.window_ids.contains(&window_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchDirection {
    /// Target is later in desktop order than the desktop being left.
    Forward,
    Backward,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DesktopTransition {
    #[default]
    Idle,
    Transitioning {
        target: DesktopId,
        direction: SwitchDirection,
        /// Whether the active desktop has already been switched to `target`.
        committed: bool,
    },
}

impl DesktopTransition {
    pub fn target(self) -> Option<DesktopId> {
        match self {
            Self::Idle => None,
            Self::Transitioning { target, .. } => Some(target),
        }
    }

    pub fn direction(self) -> Option<SwitchDirection> {
        match self {
            Self::Idle => None,
            Self::Transitioning { direction, .. } => Some(direction),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TransitionPhase {
    Commit,
    Settle,
}

struct DesktopManagerState {
    desktops: Vec<VirtualDesktop>,
    active: DesktopId,
    next_desktop_id: u64,
    transition: DesktopTransition,
    generation: u64,
    pending_timers: Vec<TimerHandle>,
}

impl DesktopManagerState {
    fn index_of(&self, id: DesktopId) -> Option<usize> {
        self.desktops.iter().position(|desktop| desktop.id == id)
    }

    fn desktop_of(&self, window_id: WindowId) -> Option<&VirtualDesktop> {
        self.desktops.iter().find(|desktop| desktop.contains(window_id))
    }

    /// Ends any transition and returns the timers that must be cancelled.
    fn abort_transition(&mut self) -> Vec<TimerHandle> {
        self.transition = DesktopTransition::Idle;
        self.generation += 1;
        std::mem::take(&mut self.pending_timers)
    }
}

struct DesktopManagerInner {
    state: RefCell<DesktopManagerState>,
    store: Rc<dyn PrefsStore>,
    scheduler: Rc<dyn Scheduler>,
    timings: TransitionTimings,
    on_change: RefCell<Option<Rc<dyn Fn()>>>,
}

impl Drop for DesktopManagerInner {
    fn drop(&mut self) {
        for handle in self.state.get_mut().pending_timers.drain(..) {
            self.scheduler.cancel(handle);
        }
    }
}

#[derive(Clone)]
/// Shared handle to the virtual desktop manager.
///
/// Clones refer to the same manager. Pending phase callbacks hold only a weak reference; when the
/// last handle drops, outstanding callbacks are cancelled.
pub struct VirtualDesktopManager {
    inner: Rc<DesktopManagerInner>,
}

impl fmt::Debug for VirtualDesktopManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.borrow();
        f.debug_struct("VirtualDesktopManager")
            .field("desktops", &state.desktops)
            .field("active", &state.active)
            .field("transition", &state.transition)
            .finish()
    }
}

impl VirtualDesktopManager {
    /// Rehydrates from `store`, or bootstraps a single desktop when nothing valid is stored.
    ///
    /// A bootstrapped layout is written back immediately so a rejected record does not linger.
    pub fn load(
        store: Rc<dyn PrefsStore>,
        scheduler: Rc<dyn Scheduler>,
        timings: TransitionTimings,
    ) -> Self {
        let layout = persistence::load_desktop_layout(store.as_ref());
        let next_desktop_id = layout
            .desktops
            .iter()
            .map(|desktop| desktop.id.0)
            .max()
            .unwrap_or(0)
            .saturating_add(1);

        let manager = Self {
            inner: Rc::new(DesktopManagerInner {
                state: RefCell::new(DesktopManagerState {
                    desktops: layout.desktops,
                    active: layout.active,
                    next_desktop_id,
                    transition: DesktopTransition::Idle,
                    generation: 0,
                    pending_timers: Vec::new(),
                }),
                store,
                scheduler,
                timings,
                on_change: RefCell::new(None),
            }),
        };
        if layout.source == LayoutSource::Bootstrap {
            manager.persist();
        }
        manager
    }

    /// Registers the listener invoked after every observable state change.
    pub fn set_on_change(&self, callback: impl Fn() + 'static) {
        *self.inner.on_change.borrow_mut() = Some(Rc::new(callback));
    }

    pub fn desktops(&self) -> Vec<VirtualDesktop> {
        self.inner.state.borrow().desktops.clone()
    }

    pub fn desktop_count(&self) -> usize {
        self.inner.state.borrow().desktops.len()
    }

    pub fn active_desktop_id(&self) -> DesktopId {
        self.inner.state.borrow().active
    }

    pub fn active_desktop(&self) -> Option<VirtualDesktop> {
        let state = self.inner.state.borrow();
        state
            .index_of(state.active)
            .map(|index| state.desktops[index].clone())
    }

    pub fn transition(&self) -> DesktopTransition {
        self.inner.state.borrow().transition
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition() != DesktopTransition::Idle
    }

    pub fn transition_direction(&self) -> Option<SwitchDirection> {
        self.transition().direction()
    }

    /// Appends a new empty desktop. Blank names fall back to `Desktop N`.
    pub fn create_desktop(&self, name: Option<String>) -> DesktopId {
        let id = {
            let mut state = self.inner.state.borrow_mut();
            let id = DesktopId(state.next_desktop_id);
            state.next_desktop_id += 1;
            let name = name
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| format!("Desktop {}", state.desktops.len() + 1));
            state.desktops.push(VirtualDesktop {
                id,
                name,
                window_ids: Vec::new(),
                created_at_ms: unix_time_ms_now(),
            });
            id
        };
        self.persist();
        self.notify();
        id
    }

    /// Removes a desktop, moving its windows to the first remaining desktop in order.
    ///
    /// Fails for unknown ids and for the last remaining desktop. Deleting the pending target of a
    /// transition aborts the transition.
    pub fn delete_desktop(&self, id: DesktopId) -> bool {
        let stale_timers = {
            let mut guard = self.inner.state.borrow_mut();
            let state = &mut *guard;
            if state.desktops.len() <= 1 {
                return false;
            }
            let Some(index) = state.index_of(id) else {
                return false;
            };

            let removed = state.desktops.remove(index);
            let fallback = &mut state.desktops[0];
            for window_id in removed.window_ids {
                if !fallback.contains(window_id) {
                    fallback.window_ids.push(window_id);
                }
            }
            if state.active == id {
                state.active = fallback.id;
            }

            if state.transition.target() == Some(id) {
                state.abort_transition()
            } else {
                Vec::new()
            }
        };
        self.cancel_timers(stale_timers);
        self.persist();
        self.notify();
        true
    }

    pub fn rename_desktop(&self, id: DesktopId, name: impl Into<String>) -> bool {
        let name = name.into();
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        {
            let mut state = self.inner.state.borrow_mut();
            let Some(index) = state.index_of(id) else {
                return false;
            };
            state.desktops[index].name = name.to_string();
        }
        self.persist();
        self.notify();
        true
    }

    /// Starts an animated switch to `id`.
    ///
    /// Returns `false` only for unknown ids. Re-requesting the pending target changes nothing;
    /// requesting the currently active desktop cancels a pending switch.
    pub fn switch_desktop(&self, id: DesktopId) -> bool {
        let (stale_timers, started, changed) = {
            let mut state = self.inner.state.borrow_mut();
            let Some(target_index) = state.index_of(id) else {
                return false;
            };
            if state.transition.target() == Some(id) {
                return true;
            }

            if id == state.active {
                let was_transitioning = state.transition != DesktopTransition::Idle;
                (state.abort_transition(), None, was_transitioning)
            } else {
                let from_index = state.index_of(state.active).unwrap_or(0);
                let direction = if target_index > from_index {
                    SwitchDirection::Forward
                } else {
                    SwitchDirection::Backward
                };
                let stale = state.abort_transition();
                state.transition = DesktopTransition::Transitioning {
                    target: id,
                    direction,
                    committed: false,
                };
                (stale, Some(state.generation), true)
            }
        };

        self.cancel_timers(stale_timers);
        if let Some(generation) = started {
            self.schedule_phase(
                self.inner.timings.commit_delay(),
                generation,
                TransitionPhase::Commit,
            );
        }
        if changed {
            self.notify();
        }
        true
    }

    /// Switches to the desktop after the pending target (or the active one), wrapping around.
    pub fn switch_to_next_desktop(&self) -> bool {
        self.switch_relative(1)
    }

    /// Switches to the desktop before the pending target (or the active one), wrapping around.
    pub fn switch_to_previous_desktop(&self) -> bool {
        self.switch_relative(-1)
    }

    fn switch_relative(&self, step: isize) -> bool {
        let target = {
            let state = self.inner.state.borrow();
            let from = state.transition.target().unwrap_or(state.active);
            let len = state.desktops.len() as isize;
            let index = state.index_of(from).unwrap_or(0) as isize;
            state.desktops[(index + step).rem_euclid(len) as usize].id
        };
        self.switch_desktop(target)
    }

    /// Moves `window_id` to `target`, removing it from any other desktop first.
    pub fn move_window_to_desktop(&self, window_id: WindowId, target: DesktopId) -> bool {
        {
            let mut state = self.inner.state.borrow_mut();
            let Some(index) = state.index_of(target) else {
                return false;
            };
            for desktop in &mut state.desktops {
                desktop.window_ids.retain(|id| *id != window_id);
            }
            state.desktops[index].window_ids.push(window_id);
        }
        self.persist();
        self.notify();
        true
    }

    /// Adds an unassigned window to `desktop` (the active desktop when `None`).
    ///
    /// Adding a window to the desktop it already belongs to succeeds without changes. A window
    /// that belongs to a different desktop is rejected; use
    /// [`Self::move_window_to_desktop`] to reassign it.
    pub fn add_window_to_desktop(&self, window_id: WindowId, desktop: Option<DesktopId>) -> bool {
        {
            let mut state = self.inner.state.borrow_mut();
            let target = desktop.unwrap_or(state.active);
            let Some(index) = state.index_of(target) else {
                return false;
            };
            match state.desktop_of(window_id) {
                Some(owner) if owner.id == target => return true,
                Some(_) => return false,
                None => state.desktops[index].window_ids.push(window_id),
            }
        }
        self.persist();
        self.notify();
        true
    }

    /// Removes `window_id` from whichever desktop holds it. Returns whether it was assigned.
    pub fn remove_window_from_desktop(&self, window_id: WindowId) -> bool {
        let removed = {
            let mut state = self.inner.state.borrow_mut();
            let mut removed = false;
            for desktop in &mut state.desktops {
                let before = desktop.window_ids.len();
                desktop.window_ids.retain(|id| *id != window_id);
                removed |= desktop.window_ids.len() != before;
            }
            removed
        };
        if removed {
            self.persist();
            self.notify();
        }
        removed
    }

    /// Drops memberships for windows not in `live`. Returns whether anything was pruned.
    pub fn retain_windows(&self, live: &[WindowId]) -> bool {
        let pruned = {
            let mut state = self.inner.state.borrow_mut();
            let mut pruned = false;
            for desktop in &mut state.desktops {
                let before = desktop.window_ids.len();
                desktop.window_ids.retain(|id| live.contains(id));
                pruned |= desktop.window_ids.len() != before;
            }
            pruned
        };
        if pruned {
            self.persist();
            self.notify();
        }
        pruned
    }

    pub fn window_desktop(&self, window_id: WindowId) -> Option<VirtualDesktop> {
        self.inner.state.borrow().desktop_of(window_id).cloned()
    }

    /// Whether the window is a member of the active desktop. Unassigned windows never are.
    pub fn is_window_on_active_desktop(&self, window_id: WindowId) -> bool {
        let state = self.inner.state.borrow();
        state
            .desktop_of(window_id)
            .is_some_and(|desktop| desktop.id == state.active)
    }

    /// Number of member windows, or zero for unknown ids.
    pub fn desktop_window_count(&self, id: DesktopId) -> usize {
        let state = self.inner.state.borrow();
        state
            .index_of(id)
            .map(|index| state.desktops[index].window_ids.len())
            .unwrap_or(0)
    }

    /// Cancels every outstanding phase callback and drops any unfinished transition. The active
    /// desktop keeps whatever was last committed. Observers are not notified.
    pub fn teardown(&self) {
        let stale_timers = self.inner.state.borrow_mut().abort_transition();
        self.cancel_timers(stale_timers);
    }

    fn schedule_phase(&self, delay: Duration, generation: u64, phase: TransitionPhase) {
        let weak: Weak<DesktopManagerInner> = Rc::downgrade(&self.inner);
        let handle = self.inner.scheduler.schedule(
            delay,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    VirtualDesktopManager { inner }.run_phase(generation, phase);
                }
            }),
        );

        let mut state = self.inner.state.borrow_mut();
        if state.generation == generation && state.transition != DesktopTransition::Idle {
            state.pending_timers.push(handle);
        }
    }

    fn run_phase(&self, generation: u64, phase: TransitionPhase) {
        {
            let mut state = self.inner.state.borrow_mut();
            if state.generation != generation {
                return;
            }
            let DesktopTransition::Transitioning {
                target, direction, ..
            } = state.transition
            else {
                return;
            };

            match phase {
                TransitionPhase::Commit => {
                    if state.index_of(target).is_none() {
                        state.abort_transition();
                    } else {
                        state.active = target;
                        state.transition = DesktopTransition::Transitioning {
                            target,
                            direction,
                            committed: true,
                        };
                    }
                }
                TransitionPhase::Settle => {
                    state.transition = DesktopTransition::Idle;
                    state.pending_timers.clear();
                }
            }
        }

        if phase == TransitionPhase::Commit && self.is_transitioning() {
            leptos::logging::log!("switched to virtual desktop {}", self.active_desktop_id().0);
            self.persist();
            self.schedule_phase(
                self.inner.timings.settle_delay(),
                generation,
                TransitionPhase::Settle,
            );
        }
        self.notify();
    }

    fn cancel_timers(&self, handles: Vec<TimerHandle>) {
        for handle in handles {
            self.inner.scheduler.cancel(handle);
        }
    }

    fn persist(&self) {
        let state = self.inner.state.borrow();
        let saved = persistence::persist_desktop_layout(
            self.inner.store.as_ref(),
            &state.desktops,
            state.active,
        );
        if let Err(err) = saved {
            leptos::logging::warn!("virtual desktop persist failed: {err}");
        }
    }

    fn notify(&self) {
        let callback = self.inner.on_change.borrow().clone();
        if let Some(callback) = callback {
            callback();
        }
    }
}
