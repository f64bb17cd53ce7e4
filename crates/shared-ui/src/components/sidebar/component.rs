use dioxus::prelude::*;

// ─── Context ───────────────────────────────────────────────────────────

/// Whether the sidebar is expanded (mobile: visible).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SidebarState {
    pub open: bool,
}

/// Provides sidebar state to the shell and lays out sidebar plus inset.
#[component]
pub fn SidebarProvider(#[props(default = true)] default_open: bool, children: Element) -> Element {
    let state = use_signal(|| SidebarState { open: default_open });
    use_context_provider(|| state);

    rsx! {
        document::Link { rel: "stylesheet", href: asset!("./style.css") }
        div {
            class: "sidebar-provider",
            "data-sidebar-open": if (state)().open { "true" } else { "false" },
            {children}
        }
    }
}

fn use_sidebar() -> Signal<SidebarState> {
    use_context::<Signal<SidebarState>>()
}

// ─── Layout ────────────────────────────────────────────────────────────

/// The sidebar column. On narrow viewports a backdrop closes it.
#[component]
pub fn Sidebar(children: Element) -> Element {
    let mut state = use_sidebar();
    let is_open = (state)().open;

    rsx! {
        if is_open {
            div {
                class: "sidebar-backdrop",
                onclick: move |_| state.set(SidebarState { open: false }),
            }
        }
        aside {
            class: "sidebar",
            "data-state": if is_open { "open" } else { "closed" },
            {children}
        }
    }
}

/// Brand block at the top of the sidebar.
#[component]
pub fn SidebarHeader(title: String, #[props(default)] subtitle: String) -> Element {
    rsx! {
        div { class: "sidebar-header",
            div { class: "sidebar-brand", "{title}" }
            if !subtitle.is_empty() {
                div { class: "sidebar-brand-sub", "{subtitle}" }
            }
        }
    }
}

#[component]
pub fn SidebarContent(children: Element) -> Element {
    rsx! {
        nav { class: "sidebar-content",
            ul { class: "sidebar-menu", {children} }
        }
    }
}

#[component]
pub fn SidebarFooter(children: Element) -> Element {
    rsx! {
        div { class: "sidebar-footer", {children} }
    }
}

/// One navigation entry; the caller renders the link inside.
#[component]
pub fn SidebarMenuItem(#[props(default = false)] active: bool, children: Element) -> Element {
    rsx! {
        li {
            class: "sidebar-menu-item",
            "data-active": if active { "true" } else { "false" },
            {children}
        }
    }
}

/// Main content column next to the sidebar.
#[component]
pub fn SidebarInset(children: Element) -> Element {
    rsx! {
        div { class: "sidebar-inset", {children} }
    }
}

/// Hamburger button toggling the sidebar.
#[component]
pub fn SidebarTrigger() -> Element {
    let mut state = use_sidebar();
    rsx! {
        button {
            class: "sidebar-trigger",
            r#type: "button",
            aria_label: "Menu",
            onclick: move |_| {
                let open = (state)().open;
                state.set(SidebarState { open: !open });
            },
            "☰"
        }
    }
}
