use serde::{Deserialize, Serialize};

pub const DEFAULT_WINDOW_WIDTH: i32 = 420;
pub const DEFAULT_WINDOW_HEIGHT: i32 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WindowId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AppId {
    TaskManager,
    Explorer,
    Terminal,
    Settings,
    Notepad,
    Calculator,
}

impl AppId {
    pub fn title(self) -> &'static str {
        match self {
            Self::TaskManager => "Task Manager",
            Self::Explorer => "File Explorer",
            Self::Terminal => "Terminal",
            Self::Settings => "Settings",
            Self::Notepad => "Notepad",
            Self::Calculator => "Calculator",
        }
    }

    /// Stable token used in DOM ids and persisted config.
    pub fn slug(self) -> &'static str {
        match self {
            Self::TaskManager => "task-manager",
            Self::Explorer => "file-explorer",
            Self::Terminal => "terminal",
            Self::Settings => "settings",
            Self::Notepad => "notepad",
            Self::Calculator => "calculator",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl WindowRect {
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }

    pub fn clamped_min(self, min_w: i32, min_h: i32) -> Self {
        Self {
            w: self.w.max(min_w),
            h: self.h.max(min_h),
            ..self
        }
    }
}

impl Default for WindowRect {
    fn default() -> Self {
        Self {
            x: 48,
            y: 64,
            w: DEFAULT_WINDOW_WIDTH,
            h: DEFAULT_WINDOW_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowRecord {
    pub id: WindowId,
    pub app_id: AppId,
    pub title: String,
    pub rect: WindowRect,
    pub restore_rect: Option<WindowRect>,
    pub z_index: u32,
    pub is_focused: bool,
    pub minimized: bool,
    pub maximized: bool,
}

/// Shell-level overlays that shortcuts and the taskbar can toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShellSurface {
    StartMenu,
    Search,
    TaskView,
    LockScreen,
}

impl ShellSurface {
    pub fn css_id(self) -> &'static str {
        match self {
            Self::StartMenu => "start-menu",
            Self::Search => "search",
            Self::TaskView => "task-view",
            Self::LockScreen => "lock-screen",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesktopState {
    pub next_window_id: u64,
    pub windows: Vec<WindowRecord>,
    pub open_surface: Option<ShellSurface>,
}

impl Default for DesktopState {
    fn default() -> Self {
        Self {
            next_window_id: 1,
            windows: Vec::new(),
            open_surface: None,
        }
    }
}

impl DesktopState {
    pub fn focused_window_id(&self) -> Option<WindowId> {
        self.windows.iter().find(|w| w.is_focused).map(|w| w.id)
    }

    pub fn window(&self, window_id: WindowId) -> Option<&WindowRecord> {
        self.windows.iter().find(|w| w.id == window_id)
    }

    pub fn window_ids(&self) -> Vec<WindowId> {
        self.windows.iter().map(|w| w.id).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenWindowRequest {
    pub app_id: AppId,
    pub title: Option<String>,
    pub rect: Option<WindowRect>,
}

impl OpenWindowRequest {
    pub fn new(app_id: AppId) -> Self {
        Self {
            app_id,
            title: None,
            rect: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointerPosition {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSession {
    pub window_id: WindowId,
    pub pointer_start: PointerPosition,
    pub rect_start: WindowRect,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InteractionState {
    pub dragging: Option<DragSession>,
}
