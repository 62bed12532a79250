//! Pointer-to-geometry resolution for window snapping.
//!
//! A drag is classified against the usable screen band (below the status bar, above the bottom
//! margin). Corner regions are tested before edges and are larger than the edge strips so
//! diagonal flicks land in corners. The engine keeps only the zone currently previewed.

use serde::{Deserialize, Serialize};

use crate::{config::SnapConfig, model::WindowRect};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SnapZone {
    Left,
    Right,
    Top,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl SnapZone {
    pub fn css_id(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Top => "top",
            Self::TopLeft => "top-left",
            Self::TopRight => "top-right",
            Self::BottomLeft => "bottom-left",
            Self::BottomRight => "bottom-right",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenSize {
    pub width: i32,
    pub height: i32,
}

impl Default for ScreenSize {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
        }
    }
}

/// Zone hit at drag release together with the geometry it resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapPlacement {
    pub zone: SnapZone,
    pub rect: WindowRect,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapEngine {
    config: SnapConfig,
    screen: ScreenSize,
    preview: Option<SnapZone>,
}

impl SnapEngine {
    pub fn new(config: SnapConfig, screen: ScreenSize) -> Self {
        Self {
            config,
            screen,
            preview: None,
        }
    }

    pub fn set_screen_size(&mut self, screen: ScreenSize) {
        self.screen = screen;
    }

    /// Zone currently highlighted for an in-progress drag.
    pub fn preview_zone(&self) -> Option<SnapZone> {
        self.preview
    }

    /// Geometry of the highlighted zone, for rendering the preview overlay.
    pub fn preview_rect(&self) -> Option<WindowRect> {
        self.preview.map(|zone| self.snap_dimensions(zone))
    }

    /// Classifies a pointer position. Corners win over edges.
    pub fn detect_snap_zone(&self, x: i32, y: i32) -> Option<SnapZone> {
        let SnapConfig {
            edge_threshold,
            corner_size,
            top_bar_height,
            bottom_margin,
            ..
        } = self.config;
        let width = self.screen.width;
        let usable_bottom = self.screen.height - bottom_margin;

        let near_left_corner = x < corner_size;
        let near_right_corner = x > width - corner_size;
        let near_top_corner = y < top_bar_height + corner_size;
        let near_bottom_corner = y > usable_bottom - corner_size;

        if near_top_corner && near_left_corner {
            return Some(SnapZone::TopLeft);
        }
        if near_top_corner && near_right_corner {
            return Some(SnapZone::TopRight);
        }
        if near_bottom_corner && near_left_corner {
            return Some(SnapZone::BottomLeft);
        }
        if near_bottom_corner && near_right_corner {
            return Some(SnapZone::BottomRight);
        }

        if x < edge_threshold {
            Some(SnapZone::Left)
        } else if x > width - edge_threshold {
            Some(SnapZone::Right)
        } else if y < top_bar_height + edge_threshold {
            Some(SnapZone::Top)
        } else {
            None
        }
    }

    /// Target rectangle for `zone`, tiling the usable area with `padding` around and between tiles.
    pub fn snap_dimensions(&self, zone: SnapZone) -> WindowRect {
        let SnapConfig {
            top_bar_height,
            bottom_margin,
            padding,
            ..
        } = self.config;
        let width = self.screen.width;
        let usable_height = (self.screen.height - top_bar_height - bottom_margin).max(0);
        let half_gap = padding / 2;

        let left_x = padding;
        let full_w = width - 2 * padding;
        let half_w = width / 2 - padding - half_gap;
        let right_x = width / 2 + half_gap;

        let top_y = top_bar_height + padding;
        let full_h = usable_height - 2 * padding;
        let half_h = usable_height / 2 - padding - half_gap;
        let bottom_y = top_bar_height + usable_height / 2 + half_gap;

        match zone {
            SnapZone::Left => WindowRect {
                x: left_x,
                y: top_y,
                w: half_w,
                h: full_h,
            },
            SnapZone::Right => WindowRect {
                x: right_x,
                y: top_y,
                w: half_w,
                h: full_h,
            },
            SnapZone::Top => WindowRect {
                x: left_x,
                y: top_y,
                w: full_w,
                h: full_h,
            },
            SnapZone::TopLeft => WindowRect {
                x: left_x,
                y: top_y,
                w: half_w,
                h: half_h,
            },
            SnapZone::TopRight => WindowRect {
                x: right_x,
                y: top_y,
                w: half_w,
                h: half_h,
            },
            SnapZone::BottomLeft => WindowRect {
                x: left_x,
                y: bottom_y,
                w: half_w,
                h: half_h,
            },
            SnapZone::BottomRight => WindowRect {
                x: right_x,
                y: bottom_y,
                w: half_w,
                h: half_h,
            },
        }
    }

    /// Updates and returns the preview zone for the current pointer position.
    pub fn handle_drag_move(&mut self, x: i32, y: i32) -> Option<SnapZone> {
        self.preview = self.detect_snap_zone(x, y);
        self.preview
    }

    /// Resolves the release position, clearing the preview.
    ///
    /// Returns the placement the caller should apply as the window's final geometry.
    pub fn handle_drag_end(&mut self, x: i32, y: i32) -> Option<SnapPlacement> {
        self.preview = None;
        self.detect_snap_zone(x, y).map(|zone| SnapPlacement {
            zone,
            rect: self.snap_dimensions(zone),
        })
    }

    /// Clears the preview for a drag that ended without a release position.
    pub fn cancel_drag(&mut self) {
        self.preview = None;
    }
}
