//! Tunable runtime constants for snapping and desktop transitions.
//!
//! Every field has a default; persisted overrides are merged field-by-field through
//! `#[serde(default)]` so a partial record only changes what it names.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Geometry constants used by [`crate::snap::SnapEngine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapConfig {
    /// Distance from the left/right edge (or below the top bar) that counts as an edge hit.
    pub edge_threshold: i32,
    /// Side length of the square corner regions. Larger than `edge_threshold`.
    pub corner_size: i32,
    /// Height of the persistent status bar strip excluded from the usable area.
    pub top_bar_height: i32,
    /// Margin at the bottom of the screen excluded from the usable area.
    pub bottom_margin: i32,
    /// Gap kept around and between snapped windows.
    pub padding: i32,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            edge_threshold: 20,
            corner_size: 100,
            top_bar_height: 48,
            bottom_margin: 8,
            padding: 8,
        }
    }
}

/// Phase delays of the animated desktop switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionTimings {
    /// Delay between starting a switch and committing the active desktop.
    pub commit_delay_ms: u64,
    /// Delay between the commit and clearing the transition state.
    pub settle_delay_ms: u64,
}

impl TransitionTimings {
    pub fn commit_delay(self) -> Duration {
        Duration::from_millis(self.commit_delay_ms)
    }

    pub fn settle_delay(self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

impl Default for TransitionTimings {
    fn default() -> Self {
        Self {
            commit_delay_ms: 150,
            settle_delay_ms: 300,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DesktopRuntimeConfig {
    pub snap: SnapConfig,
    pub transitions: TransitionTimings,
}
