use crate::auth::use_auth;
use crate::routes::Route;
use dioxus::prelude::*;
use shared_types::AppError;
use shared_ui::{use_toast, Button, Card, CardContent, CardHeader, Form, Input, ToastOptions};
use std::collections::HashMap;

/// Email and password sign-in. Visitors who already have a session go
/// straight to the dashboard.
#[component]
pub fn Login() -> Element {
    let mut auth = use_auth();
    let toast = use_toast();
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut error_msg = use_signal(|| Option::<String>::None);
    let mut field_errors = use_signal(HashMap::<String, String>::new);
    let mut loading = use_signal(|| false);

    let existing = use_server_future(move || async move { server::api::get_current_user().await })?;
    if let Some(Ok(Some(user))) = existing.read().as_ref().cloned() {
        if !auth.is_authenticated() {
            auth.set_user(user);
        }
    }

    use_effect(move || {
        if auth.is_authenticated() {
            navigator().replace(Route::Dashboard {});
        }
    });

    let handle_login = move |_: FormEvent| {
        if loading() {
            return;
        }
        loading.set(true);
        error_msg.set(None);
        field_errors.set(HashMap::new());

        spawn(async move {
            match server::api::login(email(), password()).await {
                Ok(user) => {
                    auth.set_user(user);
                    toast.success("Accesso effettuato".to_string(), ToastOptions::new());
                    navigator().replace(Route::Dashboard {});
                }
                Err(e) => {
                    let text = e.to_string();
                    let fields = AppError::parse_field_errors(&text);
                    if fields.is_empty() {
                        error_msg.set(Some(AppError::friendly_message(&text)));
                    } else {
                        field_errors.set(fields);
                    }
                }
            }
            loading.set(false);
        });
    };

    rsx! {
        document::Link { rel: "stylesheet", href: asset!("./login.css") }

        div { class: "auth-page",
            Card { class: "auth-card",
                CardHeader {
                    title: "TopDanceAcademy",
                    description: "Accedi per gestire soci, certificati e corsi",
                }
                CardContent {
                    if let Some(err) = error_msg() {
                        div { class: "auth-error", "{err}" }
                    }
                    Form { onsubmit: handle_login,
                        Input {
                            label: "Email",
                            input_type: "email",
                            name: "email",
                            value: email(),
                            on_input: move |v: String| email.set(v),
                        }
                        if let Some(msg) = field_errors.read().get("email") {
                            div { class: "field-error", "{msg}" }
                        }
                        Input {
                            label: "Password",
                            input_type: "password",
                            name: "password",
                            value: password(),
                            on_input: move |v: String| password.set(v),
                        }
                        if let Some(msg) = field_errors.read().get("password") {
                            div { class: "field-error", "{msg}" }
                        }
                        div { class: "form-row",
                            Button { button_type: "submit", disabled: loading(),
                                if loading() { "Accesso…" } else { "Entra" }
                            }
                        }
                    }
                }
            }
        }
    }
}
