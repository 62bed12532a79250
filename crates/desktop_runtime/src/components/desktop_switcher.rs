use super::*;

fn desktop_button_label(name: &str, window_count: usize) -> String {
    match window_count {
        0 => name.to_string(),
        1 => format!("{name} (1 window)"),
        count => format!("{name} ({count} windows)"),
    }
}

#[component]
/// Strip listing virtual desktops with their window counts.
pub(super) fn DesktopSwitcher() -> impl IntoView {
    let runtime = use_desktop_runtime();
    let desktops = move || runtime.virtual_desktops();
    let active = move || {
        runtime.desktop_revision.with(|_| ());
        runtime.desktops.get_value().active_desktop_id()
    };
    let pending = move || {
        runtime.desktop_revision.with(|_| ());
        runtime.desktops.get_value().transition().target()
    };
    let current_name = move || {
        runtime.desktop_revision.with(|_| ());
        runtime
            .desktops
            .get_value()
            .active_desktop()
            .map(|desktop| desktop.name)
            .unwrap_or_default()
    };
    let can_delete = move || {
        runtime.desktop_revision.with(|_| ());
        runtime.desktops.get_value().desktop_count() > 1
    };

    view! {
        <nav
            class="desktop-switcher"
            aria-label="Virtual desktops"
            on:mousedown=move |ev| ev.stop_propagation()
        >
            <button
                class="desktop-switcher-step"
                aria-label="Previous desktop"
                on:click=move |_| {
                    runtime.desktops.get_value().switch_to_previous_desktop();
                }
            >
                "‹"
            </button>
            <span class="desktop-switcher-current" aria-live="polite">
                {current_name}
            </span>
            <button
                class="desktop-switcher-step"
                aria-label="Next desktop"
                on:click=move |_| {
                    runtime.desktops.get_value().switch_to_next_desktop();
                }
            >
                "›"
            </button>
            <For
                each=desktops
                key=|desktop| (desktop.id.0, desktop.name.clone(), desktop.window_ids.len())
                let:desktop
            >
                {{
                    let desktop_id = desktop.id;
                    let window_count = runtime
                        .desktops
                        .with_value(|manager| manager.desktop_window_count(desktop_id));
                    let label = desktop_button_label(&desktop.name, window_count);
                    let class = move || {
                        let mut class = String::from("desktop-switcher-item");
                        if active() == desktop_id {
                            class.push_str(" active");
                        }
                        if pending() == Some(desktop_id) {
                            class.push_str(" pending");
                        }
                        class
                    };
                    view! {
                        <div class=class>
                            <button
                                class="desktop-switcher-select"
                                aria-label=label.clone()
                                on:click=move |_| {
                                    runtime.desktops.get_value().switch_desktop(desktop_id);
                                }
                            >
                                {label}
                            </button>
                            <Show when=can_delete fallback=|| ()>
                                <button
                                    class="desktop-switcher-remove"
                                    aria-label="Remove desktop"
                                    on:click=move |_| {
                                        runtime.desktops.get_value().delete_desktop(desktop_id);
                                    }
                                >
                                    "×"
                                </button>
                            </Show>
                        </div>
                    }
                }}
            </For>
            <button
                class="desktop-switcher-add"
                aria-label="New desktop"
                on:click=move |_| {
                    runtime.desktops.get_value().create_desktop(None);
                }
            >
                "+"
            </button>
        </nav>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn button_label_reports_window_count() {
        assert_eq!(desktop_button_label("Desktop 1", 0), "Desktop 1");
        assert_eq!(desktop_button_label("Desktop 1", 1), "Desktop 1 (1 window)");
        assert_eq!(desktop_button_label("Work", 3), "Work (3 windows)");
    }
}
