use dioxus::prelude::*;
use dioxus_free_icons::icons::fa_solid_icons::{FaChevronLeft, FaChevronRight};
use dioxus_free_icons::Icon;

use crate::components::button::{Button, ButtonSize, ButtonVariant};

/// Prev/next controls around a "Pagina X / Y" indicator.
#[component]
pub fn Pagination(
    label: String,
    has_prev: bool,
    has_next: bool,
    on_prev: EventHandler<()>,
    on_next: EventHandler<()>,
) -> Element {
    rsx! {
        document::Link { rel: "stylesheet", href: asset!("./style.css") }
        div { class: "pagination",
            Button {
                variant: ButtonVariant::Ghost,
                size: ButtonSize::Tiny,
                disabled: !has_prev,
                aria_label: "Pagina precedente",
                onclick: move |_| on_prev.call(()),
                Icon { icon: FaChevronLeft, width: 12, height: 12 }
            }
            span { class: "pagination-info", "{label}" }
            Button {
                variant: ButtonVariant::Ghost,
                size: ButtonSize::Tiny,
                disabled: !has_next,
                aria_label: "Pagina successiva",
                onclick: move |_| on_next.call(()),
                Icon { icon: FaChevronRight, width: 12, height: 12 }
            }
        }
    }
}
