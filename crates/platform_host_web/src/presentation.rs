//! Whole-page presentation controls.

/// Enters full-screen presentation for the document root, or leaves it when already active.
///
/// # Errors
///
/// Returns an error when the document is unavailable or the browser rejects the request (for
/// example outside a user gesture).
pub fn toggle_fullscreen() -> Result<(), String> {
    #[cfg(target_arch = "wasm32")]
    {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| "document unavailable".to_string())?;
        if document.fullscreen_element().is_some() {
            document.exit_fullscreen();
            return Ok(());
        }
        let root = document
            .document_element()
            .ok_or_else(|| "document element unavailable".to_string())?;
        root.request_fullscreen()
            .map_err(|e| format!("requestFullscreen failed: {e:?}"))
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        Ok(())
    }
}
