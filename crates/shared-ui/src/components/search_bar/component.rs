use dioxus::prelude::*;

/// Filter row above a list: search box, chips, selects, counters.
#[component]
pub fn SearchBar(children: Element) -> Element {
    rsx! {
        document::Link { rel: "stylesheet", href: asset!("./style.css") }
        div { class: "search-bar", role: "search",
            {children}
        }
    }
}

/// Free-text query box. The raw text goes to `on_input`; pages debounce it.
///
/// A clear button appears once something is typed.
#[component]
pub fn SearchInput(
    value: String,
    on_input: EventHandler<String>,
    #[props(default = "Cerca nome, tessera o quota…".to_string())] placeholder: String,
) -> Element {
    let has_text = !value.is_empty();

    rsx! {
        div { class: "search-input",
            span { class: "search-input-icon", "aria-hidden": "true", "⌕" }
            input {
                class: "search-input-field",
                r#type: "search",
                value: value,
                placeholder: placeholder,
                autocomplete: "off",
                oninput: move |evt| on_input.call(evt.value()),
            }
            if has_text {
                button {
                    class: "search-input-clear",
                    r#type: "button",
                    title: "Cancella ricerca",
                    onclick: move |_| on_input.call(String::new()),
                    "×"
                }
            }
        }
    }
}

/// Counter text pushed to the right end of a `SearchBar`.
#[component]
pub fn SearchBarMeta(children: Element) -> Element {
    rsx! {
        div { class: "search-bar-meta", {children} }
    }
}
