//! Built-in application catalog and lookup helpers.

use crate::model::{AppId, OpenWindowRequest, WindowRect};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppDescriptor {
    pub app_id: AppId,
    pub launcher_label: &'static str,
    pub show_in_launcher: bool,
}

const APP_REGISTRY: [AppDescriptor; 6] = [
    AppDescriptor {
        app_id: AppId::Explorer,
        launcher_label: "File Explorer",
        show_in_launcher: true,
    },
    AppDescriptor {
        app_id: AppId::Terminal,
        launcher_label: "Terminal",
        show_in_launcher: true,
    },
    AppDescriptor {
        app_id: AppId::Notepad,
        launcher_label: "Notepad",
        show_in_launcher: true,
    },
    AppDescriptor {
        app_id: AppId::Calculator,
        launcher_label: "Calculator",
        show_in_launcher: true,
    },
    AppDescriptor {
        app_id: AppId::Settings,
        launcher_label: "Settings",
        show_in_launcher: true,
    },
    AppDescriptor {
        app_id: AppId::TaskManager,
        launcher_label: "Task Manager",
        show_in_launcher: false,
    },
];

/// Set of applications the shell can launch.
///
/// Shortcuts that name an application not present here are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppRegistry {
    entries: Vec<AppDescriptor>,
}

impl Default for AppRegistry {
    fn default() -> Self {
        Self {
            entries: APP_REGISTRY.to_vec(),
        }
    }
}

impl AppRegistry {
    fn descriptor(&self, app_id: AppId) -> Option<&AppDescriptor> {
        self.entries.iter().find(|entry| entry.app_id == app_id)
    }

    pub fn is_registered(&self, app_id: AppId) -> bool {
        self.descriptor(app_id).is_some()
    }

    pub fn launcher_apps(&self) -> Vec<AppDescriptor> {
        self.entries
            .iter()
            .copied()
            .filter(|entry| entry.show_in_launcher)
            .collect()
    }
}

pub fn default_open_request(app_id: AppId) -> OpenWindowRequest {
    let mut req = OpenWindowRequest::new(app_id);
    match app_id {
        AppId::Calculator => {
            req.rect = Some(WindowRect {
                x: 72,
                y: 96,
                w: 320,
                h: 420,
            });
        }
        AppId::TaskManager => {
            req.rect = Some(WindowRect {
                x: 160,
                y: 120,
                w: 520,
                h: 380,
            });
        }
        _ => {}
    }
    req
}
