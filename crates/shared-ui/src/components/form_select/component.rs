use dioxus::prelude::*;

/// Native select with a label, for filters and form fields.
///
/// Children should be `option { value: "...", "Label" }` elements.
#[component]
pub fn FormSelect(
    #[props(default)] value: String,
    #[props(default)] onchange: Option<EventHandler<String>>,
    #[props(default)] label: String,
    #[props(default)] name: String,
    #[props(default = false)] disabled: bool,
    children: Element,
) -> Element {
    rsx! {
        document::Link { rel: "stylesheet", href: asset!("./style.css") }
        label { class: "form-select-wrapper",
            if !label.is_empty() {
                span { class: "form-select-label", "{label}" }
            }
            select {
                class: "form-select",
                name: name,
                value: value,
                disabled: disabled,
                onchange: move |evt| {
                    if let Some(handler) = &onchange {
                        handler.call(evt.value());
                    }
                },
                {children}
            }
        }
    }
}
