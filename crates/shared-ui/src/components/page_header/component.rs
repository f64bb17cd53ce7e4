use dioxus::prelude::*;

/// Page header container, wraps a title block and the page actions.
#[component]
pub fn PageHeader(children: Element) -> Element {
    rsx! {
        document::Link { rel: "stylesheet", href: asset!("./style.css") }
        div { class: "page-header",
            {children}
        }
    }
}

#[component]
pub fn PageTitle(#[props(default)] subtitle: String, children: Element) -> Element {
    rsx! {
        div { class: "page-title-block",
            h1 { class: "page-title", {children} }
            if !subtitle.is_empty() {
                p { class: "page-subtitle", "{subtitle}" }
            }
        }
    }
}

#[component]
pub fn PageActions(children: Element) -> Element {
    rsx! {
        div { class: "page-actions", {children} }
    }
}
