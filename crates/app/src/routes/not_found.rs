use dioxus::prelude::*;

use crate::routes::Route;

/// Unknown paths land on the dashboard.
#[component]
pub fn NotFound(route: Vec<String>) -> Element {
    use_effect(move || {
        navigator().replace(Route::Dashboard {});
    });

    let path = format!("/{}", route.join("/"));
    rsx! {
        div { class: "auth-guard-loading",
            p { "Pagina "
                code { "{path}" }
                " non trovata, apro la dashboard…"
            }
            Link { to: Route::Dashboard {}, "Vai alla dashboard" }
        }
    }
}
