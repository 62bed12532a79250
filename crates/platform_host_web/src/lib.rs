//! Browser (`wasm32`) implementations of [`platform_host`] service contracts.
//!
//! This crate is the concrete browser-side host wiring layer for preference storage, deferred
//! callback scheduling, and page presentation (full-screen) control. Every browser call is gated
//! behind `target_arch = "wasm32"` so the crate also builds for native test runs.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

/// Compile-time host-strategy selection and concrete adapter factories for runtime wiring.
pub mod adapters;
pub mod presentation;
pub mod scheduler;
pub mod storage;

pub use adapters::{
    host_strategy_name, prefs_store, scheduler, selected_host_strategy, HostStrategy,
    PrefsStoreAdapter,
};
pub use presentation::toggle_fullscreen;
pub use scheduler::BrowserScheduler;
pub use storage::local_prefs::WebPrefsStore;
