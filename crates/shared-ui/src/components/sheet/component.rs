use dioxus::prelude::*;

/// Which edge of the screen the sheet slides in from.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SheetSide {
    #[default]
    Right,
    /// Centered modal panel.
    Center,
}

impl SheetSide {
    fn class(&self) -> &'static str {
        match self {
            SheetSide::Right => "right",
            SheetSide::Center => "center",
        }
    }
}

/// Sliding panel overlay. Clicking the backdrop closes it.
#[component]
pub fn Sheet(
    open: bool,
    on_close: EventHandler<()>,
    #[props(default)] side: SheetSide,
    children: Element,
) -> Element {
    if !open {
        return rsx! {};
    }

    rsx! {
        document::Link { rel: "stylesheet", href: asset!("./style.css") }
        div {
            class: "sheet-overlay",
            "data-open": "true",
            onclick: move |_| on_close.call(()),
            div {
                class: "sheet-panel",
                "data-side": side.class(),
                role: "dialog",
                "aria-modal": "true",
                onclick: move |evt| evt.stop_propagation(),
                {children}
            }
        }
    }
}

#[component]
pub fn SheetContent(
    #[props(extends = GlobalAttributes)] attributes: Vec<Attribute>,
    children: Element,
) -> Element {
    let base = vec![Attribute::new("class", "sheet-content", None, false)];
    let merged = dioxus_primitives::merge_attributes(vec![base, attributes]);

    rsx! {
        div {
            ..merged,
            {children}
        }
    }
}

/// Title row with the close button.
#[component]
pub fn SheetHeader(
    title: String,
    #[props(default)] description: String,
    on_close: EventHandler<()>,
) -> Element {
    rsx! {
        div { class: "sheet-header",
            div {
                h2 { class: "sheet-title", "{title}" }
                if !description.is_empty() {
                    p { class: "sheet-description", "{description}" }
                }
            }
            button {
                class: "sheet-close",
                r#type: "button",
                "aria-label": "Chiudi",
                title: "Chiudi",
                onclick: move |_| on_close.call(()),
                "\u{2715}"
            }
        }
    }
}

#[component]
pub fn SheetFooter(
    #[props(extends = GlobalAttributes)] attributes: Vec<Attribute>,
    children: Element,
) -> Element {
    let base = vec![Attribute::new("class", "sheet-footer", None, false)];
    let merged = dioxus_primitives::merge_attributes(vec![base, attributes]);

    rsx! {
        div {
            ..merged,
            {children}
        }
    }
}
