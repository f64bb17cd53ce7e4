use dioxus::prelude::*;
use dioxus_primitives::toast as prim;

pub use dioxus_primitives::toast::{use_toast, ToastOptions, Toasts};

/// Toast host; mount once around the router.
#[component]
pub fn ToastProvider(props: prim::ToastProviderProps) -> Element {
    rsx! {
        document::Link { rel: "stylesheet", href: asset!("./style.css") }
        prim::ToastProvider { ..props }
    }
}
