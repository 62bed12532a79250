//! Drains reducer-emitted [`RuntimeEffect`](crate::reducer::RuntimeEffect) batches in order.

use leptos::*;

use crate::runtime_context::DesktopRuntimeContext;

/// Runs every queued effect through the host bundle whenever the queue changes.
pub fn install(runtime: DesktopRuntimeContext) {
    create_effect(move |_| {
        let batch = runtime.effects.get();
        if batch.is_empty() {
            return;
        }

        // Effects dispatched while this batch runs land in a fresh queue.
        runtime.effects.set(Vec::new());

        let host = runtime.host.get_value();
        for effect in batch {
            host.run_runtime_effect(runtime, effect);
        }
    });
}
