use dioxus::prelude::*;

/// Panel container.
#[component]
pub fn Card(
    #[props(extends = GlobalAttributes)] attributes: Vec<Attribute>,
    children: Element,
) -> Element {
    let base = vec![Attribute::new("class", "card", None, false)];
    let merged = dioxus_primitives::merge_attributes(vec![base, attributes]);

    rsx! {
        document::Link { rel: "stylesheet", href: asset!("./style.css") }
        div {
            ..merged,
            {children}
        }
    }
}

#[component]
pub fn CardHeader(
    title: String,
    #[props(default)] description: String,
    children: Element,
) -> Element {
    rsx! {
        div { class: "card-header",
            div {
                h3 { class: "card-title", "{title}" }
                if !description.is_empty() {
                    p { class: "card-description", "{description}" }
                }
            }
            div { class: "card-action", {children} }
        }
    }
}

#[component]
pub fn CardContent(
    #[props(extends = GlobalAttributes)] attributes: Vec<Attribute>,
    children: Element,
) -> Element {
    let base = vec![Attribute::new("class", "card-content", None, false)];
    let merged = dioxus_primitives::merge_attributes(vec![base, attributes]);

    rsx! {
        div {
            ..merged,
            {children}
        }
    }
}

/// Clickable KPI tile. `tone` colours the value (`danger`, `warn`, `info`).
#[component]
pub fn KpiCard(
    label: String,
    value: String,
    #[props(default)] tone: String,
    #[props(default = false)] active: bool,
    onclick: EventHandler<MouseEvent>,
) -> Element {
    rsx! {
        document::Link { rel: "stylesheet", href: asset!("./style.css") }
        button {
            r#type: "button",
            class: if active { "kpi-card active" } else { "kpi-card" },
            "aria-pressed": if active { "true" } else { "false" },
            onclick: move |evt| onclick.call(evt),
            div { class: "kpi-label", "{label}" }
            div { class: "kpi-value", "data-tone": "{tone}", "{value}" }
        }
    }
}

/// Grid holding the KPI tiles.
#[component]
pub fn KpiGrid(children: Element) -> Element {
    rsx! {
        div { class: "kpi-grid", {children} }
    }
}
