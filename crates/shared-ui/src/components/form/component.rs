use dioxus::prelude::*;

/// Form wrapper that prevents default submission and lays fields out on a
/// two-column grid.
#[component]
pub fn Form(
    #[props(default)] onsubmit: EventHandler<FormEvent>,
    #[props(extends = GlobalAttributes)] attributes: Vec<Attribute>,
    children: Element,
) -> Element {
    let base = vec![Attribute::new("class", "form", None, false)];
    let merged = dioxus_primitives::merge_attributes(vec![base, attributes]);

    rsx! {
        document::Link { rel: "stylesheet", href: asset!("./style.css") }
        form {
            onsubmit: move |evt| {
                evt.prevent_default();
                onsubmit.call(evt);
            },
            ..merged,
            {children}
        }
    }
}

/// Full-width section heading inside a `Form`.
#[component]
pub fn FormSection(title: String) -> Element {
    rsx! {
        div { class: "form-section", "{title}" }
    }
}

/// Full-width row, typically the action buttons.
#[component]
pub fn FormRow(children: Element) -> Element {
    rsx! {
        div { class: "form-row", {children} }
    }
}
