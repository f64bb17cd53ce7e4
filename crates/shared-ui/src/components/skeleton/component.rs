use dioxus::prelude::*;

/// Loading placeholder with animated pulse.
#[component]
pub fn Skeleton(#[props(extends = GlobalAttributes)] attributes: Vec<Attribute>) -> Element {
    let base = vec![Attribute::new("class", "skeleton", None, false)];
    let merged = dioxus_primitives::merge_attributes(vec![base, attributes]);

    rsx! {
        document::Link { rel: "stylesheet", href: asset!("./style.css") }
        div {
            ..merged,
        }
    }
}

/// A stack of skeleton lines sized like table rows.
#[component]
pub fn SkeletonRows(#[props(default = 5)] count: usize) -> Element {
    rsx! {
        div { class: "skeleton-rows",
            for i in 0..count {
                Skeleton { key: "{i}", class: "skeleton-row" }
            }
        }
    }
}
