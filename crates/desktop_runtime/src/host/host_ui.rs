#[cfg(target_arch = "wasm32")]
use wasm_bindgen::{closure::Closure, JsCast};

use crate::{model::WindowId, snap::ScreenSize};

/// DOM id a window's primary text field renders so the shell can focus it.
pub fn window_primary_input_dom_id(window_id: WindowId) -> String {
    format!("window-primary-input-{}", window_id.0)
}

pub(super) fn focus_window_input(window_id: WindowId) {
    #[cfg(target_arch = "wasm32")]
    {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };
        let Some(element) = document.get_element_by_id(&window_primary_input_dom_id(window_id))
        else {
            return;
        };
        let Ok(element) = element.dyn_into::<web_sys::HtmlElement>() else {
            return;
        };
        let callback = Closure::once_into_js(move || {
            let _ = element.focus();
        });
        let _ = window
            .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), 0);
    }
    #[cfg(not(target_arch = "wasm32"))]
    let _ = window_id;
}

pub(super) fn screen_size() -> ScreenSize {
    #[cfg(target_arch = "wasm32")]
    {
        if let Some(window) = web_sys::window() {
            let width = window
                .inner_width()
                .ok()
                .and_then(|value| value.as_f64())
                .map(|value| value as i32)
                .unwrap_or(1024);
            let height = window
                .inner_height()
                .ok()
                .and_then(|value| value.as_f64())
                .map(|value| value as i32)
                .unwrap_or(768);

            return ScreenSize {
                width: width.max(320),
                height: height.max(240),
            };
        }
    }

    ScreenSize::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_input_dom_id_is_stable() {
        assert_eq!(
            window_primary_input_dom_id(WindowId(12)),
            "window-primary-input-12"
        );
    }
}
