//! Host-side runtime helpers for executing reducer effects and querying browser environment state.
//!
//! Reducer effects that touch the virtual desktop manager or the DOM are executed here, behind a
//! typed boundary that tests and alternate hosts can replace.

mod host_ui;

use std::rc::Rc;

use leptos::logging;
use platform_host::{PrefsStore, Scheduler};
use platform_host_web::{host_strategy_name, prefs_store, scheduler};

use crate::{
    apps::AppRegistry,
    config::DesktopRuntimeConfig,
    model::WindowId,
    persistence,
    reducer::RuntimeEffect,
    runtime_context::DesktopRuntimeContext,
    snap::ScreenSize,
    virtual_desktops::VirtualDesktopManager,
};

pub use host_ui::window_primary_input_dom_id;

#[derive(Clone)]
/// Host service bundle for desktop runtime side effects.
pub struct DesktopHostContext {
    prefs: Rc<dyn PrefsStore>,
    scheduler: Rc<dyn Scheduler>,
    registry: AppRegistry,
    host_strategy_name: &'static str,
}

impl Default for DesktopHostContext {
    fn default() -> Self {
        Self::new(
            Rc::new(prefs_store()),
            Rc::new(scheduler()),
            AppRegistry::default(),
        )
    }
}

impl DesktopHostContext {
    /// Builds a host bundle from explicit services.
    pub fn new(
        prefs: Rc<dyn PrefsStore>,
        scheduler: Rc<dyn Scheduler>,
        registry: AppRegistry,
    ) -> Self {
        Self {
            prefs,
            scheduler,
            registry,
            host_strategy_name: host_strategy_name(),
        }
    }

    /// Returns the configured lightweight preference service.
    pub fn prefs_store(&self) -> Rc<dyn PrefsStore> {
        self.prefs.clone()
    }

    /// Returns the scheduler used for deferred runtime transitions.
    pub fn scheduler(&self) -> Rc<dyn Scheduler> {
        self.scheduler.clone()
    }

    /// Returns the applications this host can launch.
    pub fn registry(&self) -> &AppRegistry {
        &self.registry
    }

    /// Returns the stable name of the selected host strategy.
    pub fn host_strategy_name(&self) -> &'static str {
        self.host_strategy_name
    }

    /// Loads runtime tuning, falling back to defaults.
    pub fn load_config(&self) -> DesktopRuntimeConfig {
        persistence::load_runtime_config(self.prefs.as_ref())
    }

    /// Executes a single [`RuntimeEffect`] emitted by the reducer.
    pub fn run_runtime_effect(&self, runtime: DesktopRuntimeContext, effect: RuntimeEffect) {
        let desktops = runtime.desktops.get_value();
        match effect {
            RuntimeEffect::FocusWindowInput(window_id) => self.focus_window_input(window_id),
            RuntimeEffect::AssignToActiveDesktop(window_id) => {
                if !desktops.add_window_to_desktop(window_id, None) {
                    logging::warn!("window {} already belongs to a desktop", window_id.0);
                }
            }
            RuntimeEffect::RevealWindowDesktop(window_id) => {
                reveal_window_desktop(&desktops, window_id);
            }
            RuntimeEffect::ReleaseFromDesktops(window_id) => {
                desktops.remove_window_from_desktop(window_id);
            }
        }
    }

    /// Moves keyboard focus into a window's primary input, if it renders one.
    pub fn focus_window_input(&self, window_id: WindowId) {
        host_ui::focus_window_input(window_id);
    }

    /// Returns the current browser viewport size used for snap geometry.
    pub fn screen_size(&self) -> ScreenSize {
        host_ui::screen_size()
    }

    /// Toggles whole-page full-screen presentation.
    pub fn toggle_fullscreen(&self) {
        if let Err(err) = platform_host_web::toggle_fullscreen() {
            logging::warn!("fullscreen toggle failed: {err}");
        }
    }
}

/// Brings the desktop owning `window_id` into view, or claims the window for the active desktop
/// when it has none.
///
/// A window already on the active desktop leaves any pending switch untouched.
fn reveal_window_desktop(desktops: &VirtualDesktopManager, window_id: WindowId) {
    match desktops.window_desktop(window_id) {
        Some(desktop) if desktop.id != desktops.active_desktop_id() => {
            desktops.switch_desktop(desktop.id);
        }
        Some(_) => {}
        None => {
            desktops.add_window_to_desktop(window_id, None);
        }
    }
}
