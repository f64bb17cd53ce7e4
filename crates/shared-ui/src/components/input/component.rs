use dioxus::prelude::*;

/// Labelled text input. `on_input` receives the raw value on every keystroke.
#[component]
pub fn Input(
    #[props(default)] value: String,
    #[props(default)] on_input: EventHandler<String>,
    #[props(default)] placeholder: String,
    #[props(default)] label: String,
    #[props(default = "text".to_string())] input_type: String,
    #[props(default)] name: String,
    #[props(default = false)] disabled: bool,
    #[props(extends = GlobalAttributes)] attributes: Vec<Attribute>,
) -> Element {
    let base = vec![Attribute::new("class", "input", None, false)];
    let merged = dioxus_primitives::merge_attributes(vec![base, attributes]);

    rsx! {
        document::Link { rel: "stylesheet", href: asset!("./style.css") }
        label { class: "input-wrapper",
            if !label.is_empty() {
                span { class: "input-label", "{label}" }
            }
            input {
                r#type: "{input_type}",
                name: name,
                value: value,
                placeholder: placeholder,
                disabled: disabled,
                oninput: move |evt| on_input.call(evt.value()),
                ..merged,
            }
        }
    }
}
