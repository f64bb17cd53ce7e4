use dioxus::prelude::*;
use shared_types::AppConfig;

mod auth;
mod bridge;
mod format_helpers;
mod hooks;
mod routes;

use auth::AuthState;
use routes::Route;

const THEME: Asset = asset!("/assets/theme.css");

fn main() {
    #[cfg(feature = "server")]
    dioxus::serve(|| async move {
        server::config::load_config();
        server::health::record_start_time();
        if !server::backend::init_backend() {
            tracing::warn!("starting without a backend; every data request will fail");
        }

        let router = dioxus::server::router(App)
            .merge(server::health::health_router())
            .layer(axum::middleware::from_fn(
                server::auth::middleware::auth_middleware,
            ))
            .layer(tower_http::trace::TraceLayer::new_for_http())
            .layer(tower_http::request_id::PropagateRequestIdLayer::x_request_id())
            .layer(tower_http::request_id::SetRequestIdLayer::x_request_id(
                tower_http::request_id::MakeRequestUuid,
            ));
        Ok(router)
    });

    #[cfg(not(feature = "server"))]
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    // Flags and page sizes; defaults when the server cannot be reached.
    let config_resource =
        use_server_future(move || async move { server::api::get_app_config().await })?;

    let config = config_resource
        .read()
        .as_ref()
        .cloned()
        .unwrap_or(Ok(AppConfig::default()))
        .unwrap_or_default();

    use_context_provider(|| config);
    use_context_provider(AuthState::new);

    rsx! {
        document::Link { rel: "stylesheet", href: THEME }
        shared_ui::ToastProvider {
            SuspenseBoundary {
                fallback: |_| rsx! {
                    div { class: "auth-guard-loading",
                        p { "Carico…" }
                    }
                },
                Router::<Route> {}
            }
        }
    }
}
