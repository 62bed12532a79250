//! Typed host-domain contracts shared by the desktop runtime and browser adapters.
//!
//! This crate is the API-first boundary for platform services. It exposes the synchronous
//! preference storage contract, wall-clock helpers, and the cancellable scheduler used to drive
//! deferred runtime transitions. Concrete browser adapters live in `platform_host_web`.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod scheduler;
pub mod storage;
pub mod time;

pub use scheduler::{ManualScheduler, ScheduledTask, Scheduler, TimerHandle};
pub use storage::prefs::{
    load_pref_with, save_pref_with, MemoryPrefsStore, NoopPrefsStore, PrefsStore,
};
pub use time::unix_time_ms_now;
