//! Window-manager core for the browser desktop shell.
//!
//! The crate combines three engines with a Leptos host shell:
//!
//! - [`virtual_desktops`]: workspace membership, persistence, and the animated switch transition.
//! - [`snap`]: edge and corner snapping during window drags.
//! - [`shortcuts`]: global keyboard shortcuts and alt-tab focus cycling.
//!
//! The host shell ([`model`], [`reducer`], [`components`]) owns the authoritative window list and
//! wires the engines together inside [`DesktopProvider`].

pub mod apps;
pub mod components;
pub mod config;
mod effect_executor;
pub mod host;
pub mod model;
pub mod persistence;
pub mod reducer;
pub mod runtime_context;
pub mod shortcuts;
pub mod snap;
pub mod virtual_desktops;
pub mod window_manager;

pub use components::{use_desktop_runtime, DesktopProvider, DesktopRuntimeContext, DesktopShell};
pub use config::{DesktopRuntimeConfig, SnapConfig, TransitionTimings};
pub use host::DesktopHostContext;
pub use model::*;
pub use reducer::{reduce_desktop, DesktopAction, ReducerError, RuntimeEffect};
pub use shortcuts::{
    classify_chord, focus_order, FocusCandidate, KeyInput, KeyOutcome, Shortcut,
    ShortcutDispatcher, ShortcutHost, ShortcutTargets,
};
pub use snap::{ScreenSize, SnapEngine, SnapPlacement, SnapZone};
pub use virtual_desktops::{
    DesktopId, DesktopTransition, SwitchDirection, VirtualDesktop, VirtualDesktopManager,
};
