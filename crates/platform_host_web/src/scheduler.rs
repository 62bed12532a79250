//! `setTimeout`-backed [`Scheduler`] implementation.

#[cfg(target_arch = "wasm32")]
use std::{cell::RefCell, rc::Rc};
use std::time::Duration;

use platform_host::{ScheduledTask, Scheduler, TimerHandle};
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::{closure::Closure, JsCast};

#[derive(Debug, Clone, Copy, Default)]
/// Browser scheduler backed by `window.setTimeout` / `window.clearTimeout`.
///
/// When no browser timer is available (native builds, or a failed `setTimeout` call) the task runs
/// immediately so deferred phases still complete.
pub struct BrowserScheduler;

impl Scheduler for BrowserScheduler {
    fn schedule(&self, delay: Duration, task: ScheduledTask) -> TimerHandle {
        #[cfg(target_arch = "wasm32")]
        {
            let Some(window) = web_sys::window() else {
                task();
                return TimerHandle(0);
            };
            let slot = Rc::new(RefCell::new(Some(task)));
            let js_slot = slot.clone();
            let callback = Closure::once_into_js(move || {
                if let Some(task) = js_slot.borrow_mut().take() {
                    task();
                }
            });
            let timeout_ms = delay.as_millis().min(i32::MAX as u128) as i32;
            match window.set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.unchecked_ref(),
                timeout_ms,
            ) {
                Ok(id) => TimerHandle(id.max(0) as u64),
                Err(_) => {
                    let task = slot.borrow_mut().take();
                    if let Some(task) = task {
                        task();
                    }
                    TimerHandle(0)
                }
            }
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = delay;
            task();
            TimerHandle(0)
        }
    }

    fn cancel(&self, handle: TimerHandle) {
        #[cfg(target_arch = "wasm32")]
        {
            if handle.0 == 0 {
                return;
            }
            if let Some(window) = web_sys::window() {
                window.clear_timeout_with_handle(handle.0 as i32);
            }
        }

        #[cfg(not(target_arch = "wasm32"))]
        let _ = handle;
    }
}
