//! Runtime provider and context wiring for the desktop shell.
//!
//! This module owns the long-lived reducer container, runtime effect queue, the virtual desktop
//! manager, the snap engine, and the shortcut dispatcher. All of them are built once here, with
//! host services injected, and torn down when the provider unmounts. UI composition stays in
//! [`crate::components`].
#![allow(clippy::clone_on_copy)]

use leptos::*;

use crate::{
    config::DesktopRuntimeConfig,
    effect_executor,
    host::DesktopHostContext,
    model::{AppId, DesktopState, InteractionState, WindowId},
    reducer::{reduce_desktop, DesktopAction, RuntimeEffect},
    shortcuts::{FocusCandidate, ShortcutDispatcher, ShortcutTargets},
    snap::SnapEngine,
    virtual_desktops::{VirtualDesktop, VirtualDesktopManager},
};

#[derive(Clone, Copy)]
/// Leptos context for reading desktop runtime state and dispatching [`DesktopAction`] values.
pub struct DesktopRuntimeContext {
    /// Host service bundle for executing runtime side effects and environment queries.
    pub host: StoredValue<DesktopHostContext>,
    /// Tuning loaded at startup.
    pub config: StoredValue<DesktopRuntimeConfig>,
    /// Reactive desktop state signal.
    pub state: RwSignal<DesktopState>,
    /// Reactive pointer/drag interaction state signal.
    pub interaction: RwSignal<InteractionState>,
    /// Queue of runtime effects emitted by the reducer and processed by the shell.
    pub effects: RwSignal<Vec<RuntimeEffect>>,
    /// Reducer dispatch callback.
    pub dispatch: Callback<DesktopAction>,
    /// Virtual desktop manager handle.
    pub desktops: StoredValue<VirtualDesktopManager>,
    /// Bumped whenever the virtual desktop manager reports a change.
    pub desktop_revision: RwSignal<u64>,
    /// Snap engine for the active drag.
    pub snap: RwSignal<SnapEngine>,
    /// Keyboard shortcut dispatcher and its alt-tab state.
    pub shortcuts: RwSignal<ShortcutDispatcher>,
}

impl DesktopRuntimeContext {
    /// Dispatches a reducer action through the runtime context callback.
    pub fn dispatch_action(&self, action: DesktopAction) {
        self.dispatch.call(action);
    }

    /// Desktop list, tracked reactively.
    pub fn virtual_desktops(&self) -> Vec<VirtualDesktop> {
        self.desktop_revision.with(|_| ());
        self.desktops.get_value().desktops()
    }

    /// Whether `window_id` should be drawn, tracked reactively.
    pub fn is_window_visible(&self, window_id: WindowId) -> bool {
        self.desktop_revision.with(|_| ());
        self.desktops
            .get_value()
            .is_window_on_active_desktop(window_id)
    }

    /// Focus candidates for windows on the active desktop, read without tracking.
    pub fn focus_candidates(&self) -> Vec<FocusCandidate> {
        let desktops = self.desktops.get_value();
        self.state
            .get_untracked()
            .windows
            .iter()
            .filter(|w| desktops.is_window_on_active_desktop(w.id))
            .map(|w| FocusCandidate {
                id: w.id,
                z_index: w.z_index,
                minimized: w.minimized,
            })
            .collect()
    }
}

fn install_runtime_orchestration(runtime: DesktopRuntimeContext) {
    let desktop_revision = runtime.desktop_revision;
    let manager = runtime.desktops.get_value();
    manager.set_on_change(move || desktop_revision.update(|revision| *revision += 1));
    manager.retain_windows(&runtime.state.get_untracked().window_ids());
    logging::log!(
        "desktop runtime ready: {} host, {} virtual desktop(s)",
        runtime.host.with_value(|host| host.host_strategy_name()),
        manager.desktop_count()
    );

    effect_executor::install(runtime);

    on_cleanup(move || {
        manager.teardown();
        manager.set_on_change(|| {});
    });
}

#[component]
/// Provides [`DesktopRuntimeContext`] to descendant components and boots persisted state.
pub fn DesktopProvider(
    /// Injected host bundle; defaults to the browser adapters.
    #[prop(optional)]
    host: Option<DesktopHostContext>,
    children: Children,
) -> impl IntoView {
    let host = host.unwrap_or_default();
    let config = host.load_config();
    let desktops = VirtualDesktopManager::load(
        host.prefs_store(),
        host.scheduler(),
        config.transitions,
    );
    let screen = host.screen_size();

    let host = store_value(host);
    let config = store_value(config);
    let state = create_rw_signal(DesktopState::default());
    let interaction = create_rw_signal(InteractionState::default());
    let effects = create_rw_signal(Vec::<RuntimeEffect>::new());
    let desktops = store_value(desktops);
    let desktop_revision = create_rw_signal(0_u64);
    let snap = create_rw_signal(SnapEngine::new(config.get_value().snap, screen));
    let shortcuts = create_rw_signal(ShortcutDispatcher::new(ShortcutTargets::default()));

    let dispatch = Callback::new(move |action: DesktopAction| {
        let mut desktop = state.get_untracked();
        let mut ui = interaction.get_untracked();
        let previous_desktop = desktop.clone();
        let previous_ui = ui.clone();

        match reduce_desktop(&mut desktop, &mut ui, action) {
            Ok(new_effects) => {
                if desktop != previous_desktop {
                    state.set(desktop);
                }
                if ui != previous_ui {
                    interaction.set(ui);
                }
                if !new_effects.is_empty() {
                    let mut queue = effects.get_untracked();
                    queue.extend(new_effects);
                    effects.set(queue);
                }
            }
            Err(err) => logging::warn!("desktop reducer error: {err}"),
        }
    });

    let runtime = DesktopRuntimeContext {
        host,
        config,
        state,
        interaction,
        effects,
        dispatch,
        desktops,
        desktop_revision,
        snap,
        shortcuts,
    };

    provide_context(runtime.clone());

    install_runtime_orchestration(runtime);

    children().into_view()
}

/// Returns the current [`DesktopRuntimeContext`].
///
/// # Panics
///
/// Panics if called outside [`DesktopProvider`].
pub fn use_desktop_runtime() -> DesktopRuntimeContext {
    use_context::<DesktopRuntimeContext>().expect("DesktopRuntimeContext not provided")
}

/// Opens `app_id` by focusing an existing window or creating a new one.
///
/// Returns `false` when the host does not register the app.
pub(crate) fn open_or_focus_app(runtime: DesktopRuntimeContext, app_id: AppId) -> bool {
    let registered = runtime
        .host
        .with_value(|host| host.registry().is_registered(app_id));
    if registered {
        runtime.dispatch_action(DesktopAction::ActivateApp { app_id });
    }
    registered
}
