use dioxus::prelude::*;

/// Multi-line text field with a label.
#[component]
pub fn Textarea(
    #[props(default)] value: String,
    #[props(default)] on_input: EventHandler<String>,
    #[props(default)] placeholder: String,
    #[props(default)] label: String,
    #[props(default = 3)] rows: u32,
    #[props(default = false)] disabled: bool,
    #[props(extends = GlobalAttributes)] attributes: Vec<Attribute>,
) -> Element {
    let base = vec![Attribute::new("class", "textarea", None, false)];
    let merged = dioxus_primitives::merge_attributes(vec![base, attributes]);

    rsx! {
        document::Link { rel: "stylesheet", href: asset!("./style.css") }
        label { class: "textarea-wrapper",
            if !label.is_empty() {
                span { class: "textarea-label", "{label}" }
            }
            textarea {
                value: value,
                rows: "{rows}",
                placeholder: placeholder,
                disabled: disabled,
                oninput: move |evt| on_input.call(evt.value()),
                ..merged,
            }
        }
    }
}
