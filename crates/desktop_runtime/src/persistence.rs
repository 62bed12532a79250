//! Durable-storage adapters for virtual desktop state and runtime configuration.
//!
//! Desktop state lives under two stable keys: the versioned desktop list record and the active
//! desktop id. Both are written as whole snapshots. On load every record is validated; anything
//! that fails validation is discarded in favour of the bootstrap desktop.

use std::collections::HashSet;

use platform_host::{load_pref_with, save_pref_with, unix_time_ms_now, PrefsStore};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::{
    config::DesktopRuntimeConfig,
    model::WindowId,
    virtual_desktops::{DesktopId, VirtualDesktop},
};

pub const VIRTUAL_DESKTOPS_KEY: &str = "retrodesk.virtual_desktops.v1";
pub const ACTIVE_DESKTOP_KEY: &str = "retrodesk.active_desktop.v1";
pub const RUNTIME_CONFIG_KEY: &str = "retrodesk.runtime_config.v1";
pub const VIRTUAL_DESKTOPS_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtualDesktopRecord {
    pub schema_version: u32,
    pub desktops: Vec<VirtualDesktop>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Reasons a persisted desktop record is rejected.
pub enum DesktopRecordError {
    #[error("record is not valid JSON: {0}")]
    Malformed(String),
    #[error("record is missing a schema version")]
    MissingSchemaVersion,
    #[error("unsupported schema version {0}")]
    UnsupportedSchema(u64),
    #[error("record has no desktops")]
    Empty,
    #[error("desktop id {} appears more than once", .0 .0)]
    DuplicateDesktop(DesktopId),
    #[error("window {} is claimed more than once", .0 .0)]
    SharedWindow(WindowId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutSource {
    /// Rehydrated from a valid persisted record.
    Persisted,
    /// Fresh bootstrap state (nothing stored, or the stored record was rejected).
    Bootstrap,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesktopLayout {
    pub desktops: Vec<VirtualDesktop>,
    pub active: DesktopId,
    pub source: LayoutSource,
}

impl DesktopLayout {
    pub fn bootstrap() -> Self {
        let desktop = VirtualDesktop::bootstrap(unix_time_ms_now());
        Self {
            active: desktop.id,
            desktops: vec![desktop],
            source: LayoutSource::Bootstrap,
        }
    }
}

/// Parses and validates a raw desktop list record.
///
/// # Errors
///
/// Returns a [`DesktopRecordError`] describing the first validation failure.
pub fn decode_desktop_record(raw: &str) -> Result<Vec<VirtualDesktop>, DesktopRecordError> {
    let value: Value =
        serde_json::from_str(raw).map_err(|e| DesktopRecordError::Malformed(e.to_string()))?;
    let version = value
        .get("schema_version")
        .and_then(Value::as_u64)
        .ok_or(DesktopRecordError::MissingSchemaVersion)?;
    if version != u64::from(VIRTUAL_DESKTOPS_SCHEMA_VERSION) {
        return Err(DesktopRecordError::UnsupportedSchema(version));
    }

    let record: VirtualDesktopRecord =
        serde_json::from_value(value).map_err(|e| DesktopRecordError::Malformed(e.to_string()))?;
    validate_desktops(&record.desktops)?;
    Ok(record.desktops)
}

fn validate_desktops(desktops: &[VirtualDesktop]) -> Result<(), DesktopRecordError> {
    if desktops.is_empty() {
        return Err(DesktopRecordError::Empty);
    }

    let mut desktop_ids = HashSet::new();
    let mut window_ids = HashSet::new();
    for desktop in desktops {
        if !desktop_ids.insert(desktop.id) {
            return Err(DesktopRecordError::DuplicateDesktop(desktop.id));
        }
        for window_id in &desktop.window_ids {
            if !window_ids.insert(*window_id) {
                return Err(DesktopRecordError::SharedWindow(*window_id));
            }
        }
    }
    Ok(())
}

/// Loads the persisted desktop layout, falling back to the bootstrap desktop.
///
/// Never fails: corrupt or unreadable data is logged and discarded.
pub fn load_desktop_layout(store: &dyn PrefsStore) -> DesktopLayout {
    let desktops = match store.load_pref(VIRTUAL_DESKTOPS_KEY) {
        Ok(Some(raw)) => match decode_desktop_record(&raw) {
            Ok(desktops) => Some(desktops),
            Err(err) => {
                leptos::logging::warn!("discarding persisted virtual desktops: {err}");
                None
            }
        },
        Ok(None) => None,
        Err(err) => {
            leptos::logging::warn!("virtual desktop load failed: {err}");
            None
        }
    };
    let Some(desktops) = desktops else {
        return DesktopLayout::bootstrap();
    };

    let first = desktops[0].id;
    let active = match load_pref_with::<_, DesktopId>(store, ACTIVE_DESKTOP_KEY) {
        Ok(Some(id)) if desktops.iter().any(|desktop| desktop.id == id) => id,
        Ok(_) => first,
        Err(err) => {
            leptos::logging::warn!("discarding persisted active desktop: {err}");
            first
        }
    };

    DesktopLayout {
        desktops,
        active,
        source: LayoutSource::Persisted,
    }
}

/// Writes the full desktop list and the active id.
///
/// # Errors
///
/// Returns an error when serialization or a storage write fails.
pub fn persist_desktop_layout(
    store: &dyn PrefsStore,
    desktops: &[VirtualDesktop],
    active: DesktopId,
) -> Result<(), String> {
    let record = VirtualDesktopRecord {
        schema_version: VIRTUAL_DESKTOPS_SCHEMA_VERSION,
        desktops: desktops.to_vec(),
    };
    save_pref_with(store, VIRTUAL_DESKTOPS_KEY, &record)?;
    save_pref_with(store, ACTIVE_DESKTOP_KEY, &active)
}

/// Loads runtime tuning overrides, falling back to defaults.
pub fn load_runtime_config(store: &dyn PrefsStore) -> DesktopRuntimeConfig {
    match load_pref_with::<_, DesktopRuntimeConfig>(store, RUNTIME_CONFIG_KEY) {
        Ok(config) => config.unwrap_or_default(),
        Err(err) => {
            leptos::logging::warn!("runtime config load failed, using defaults: {err}");
            DesktopRuntimeConfig::default()
        }
    }
}
