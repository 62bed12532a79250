use platform_host::{NoopPrefsStore, PrefsStore};

use crate::{BrowserScheduler, WebPrefsStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Compile-time selected host strategy for `platform_host_web` adapters.
pub enum HostStrategy {
    /// Browser-backed adapters from `platform_host_web`.
    Browser,
    /// Placeholder adapters that keep state in memory only for the page lifetime.
    DesktopStub,
}

/// Returns the compile-time selected host strategy for the active build.
pub const fn selected_host_strategy() -> HostStrategy {
    #[cfg(feature = "desktop-host-stub")]
    {
        HostStrategy::DesktopStub
    }

    #[cfg(not(feature = "desktop-host-stub"))]
    {
        HostStrategy::Browser
    }
}

/// Returns the selected host strategy as a stable string token.
pub fn host_strategy_name() -> &'static str {
    match selected_host_strategy() {
        HostStrategy::Browser => "browser",
        HostStrategy::DesktopStub => "desktop-stub",
    }
}

/// Adapter enum that erases the concrete prefs backend behind [`PrefsStore`].
#[derive(Debug, Clone, Copy)]
pub enum PrefsStoreAdapter {
    /// Browser-backed localStorage prefs persistence.
    Browser(WebPrefsStore),
    /// No-op fallback used when durable storage is intentionally stubbed.
    DesktopStub(NoopPrefsStore),
}

impl PrefsStore for PrefsStoreAdapter {
    fn load_pref(&self, key: &str) -> Result<Option<String>, String> {
        match self {
            Self::Browser(store) => store.load_pref(key),
            Self::DesktopStub(store) => store.load_pref(key),
        }
    }

    fn save_pref(&self, key: &str, raw_json: &str) -> Result<(), String> {
        match self {
            Self::Browser(store) => store.save_pref(key, raw_json),
            Self::DesktopStub(store) => store.save_pref(key, raw_json),
        }
    }

    fn delete_pref(&self, key: &str) -> Result<(), String> {
        match self {
            Self::Browser(store) => store.delete_pref(key),
            Self::DesktopStub(store) => store.delete_pref(key),
        }
    }
}

/// Builds the prefs adapter for the compile-time selected host strategy.
pub fn prefs_store() -> PrefsStoreAdapter {
    match selected_host_strategy() {
        HostStrategy::Browser => PrefsStoreAdapter::Browser(WebPrefsStore),
        HostStrategy::DesktopStub => PrefsStoreAdapter::DesktopStub(NoopPrefsStore),
    }
}

/// Builds the deferred-callback scheduler used by runtime transitions.
pub fn scheduler() -> BrowserScheduler {
    BrowserScheduler
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_build_selects_browser_strategy() {
        #[cfg(not(feature = "desktop-host-stub"))]
        {
            assert_eq!(selected_host_strategy(), HostStrategy::Browser);
            assert_eq!(host_strategy_name(), "browser");
        }
    }

    #[test]
    fn native_prefs_adapter_is_empty_and_accepts_writes() {
        let store = prefs_store();
        assert_eq!(store.load_pref("missing").expect("load"), None);
        store.save_pref("key", "1").expect("save");
        store.delete_pref("key").expect("delete");
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn native_scheduler_runs_tasks_immediately() {
        use platform_host::Scheduler;
        use std::{cell::Cell, rc::Rc, time::Duration};

        let fired = Rc::new(Cell::new(false));
        let flag = fired.clone();
        scheduler().schedule(Duration::from_millis(500), Box::new(move || flag.set(true)));
        assert!(fired.get());
    }
}
