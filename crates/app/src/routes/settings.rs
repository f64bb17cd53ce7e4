use dioxus::prelude::*;
use shared_types::AppConfig;
use shared_ui::{
    use_toast, Button, ButtonVariant, Card, CardContent, CardHeader, ConfirmDialog, PageHeader,
    PageTitle, ToastOptions,
};

use crate::auth::{report_error, use_auth};

/// Maintenance actions. Only the annual quota reset lives here for now.
#[component]
pub fn Settings() -> Element {
    let auth = use_auth();
    let toast = use_toast();
    let config: AppConfig = use_context();
    let mut confirm = use_signal(|| false);
    let mut running = use_signal(|| false);

    let handle_reset = move |_| {
        confirm.set(false);
        running.set(true);
        spawn(async move {
            match server::api::reset_annual_quotas().await {
                Ok(()) => {
                    tracing::info!("annual quotas reset");
                    toast.success("Quote annuali azzerate".to_string(), ToastOptions::new());
                }
                Err(e) => report_error(auth, toast, &e),
            }
            running.set(false);
        });
    };

    rsx! {
        div { class: "container",
            PageHeader {
                PageTitle { subtitle: "Operazioni di manutenzione", "Impostazioni" }
            }

            Card {
                CardHeader {
                    title: "Reset quote annuali",
                    description: "Azzera il numero di quota di tutti i soci all'inizio della nuova stagione.",
                }
                CardContent {
                    if config.features.quota_reset {
                        Button {
                            variant: ButtonVariant::Danger,
                            disabled: running(),
                            onclick: move |_| confirm.set(true),
                            if running() { "Reset in corso…" } else { "Resetta quote" }
                        }
                    } else {
                        p { class: "muted", "Funzione non abilitata in questa installazione." }
                    }
                }
            }
        }

        ConfirmDialog {
            open: confirm(),
            title: "Reset quote annuali",
            message: "Azzerare le quote di tutti i soci?",
            details: "L'operazione non può essere annullata.",
            confirm_label: "Sì, resetta",
            cancel_label: "Annulla",
            danger: true,
            on_confirm: handle_reset,
            on_cancel: move |_| confirm.set(false),
        }
    }
}
