use dioxus::prelude::*;
use shared_types::{AppConfig, CertChip, CertQuery, CertRow, CertSortKey, InfiniteList};
use shared_ui::{
    use_toast, Button, ButtonSize, ButtonVariant, Card, ChipButton, DataTable, DataTableBody,
    DataTableCell, DataTableColumn, DataTableHeader, DataTableMessage, DataTableRow, ListFooter,
    PageActions, PageHeader, PageTitle, SearchBar, SearchBarMeta, SearchInput,
};

use crate::auth::{report_error, use_auth};
use crate::bridge;
use crate::format_helpers::{or_dash, ruolo_label};
use crate::hooks::{use_debounced, use_infinite_scroll, SEARCH_DEBOUNCE_MS};
use crate::routes::dashboard::CertBadge;
use crate::routes::person_editor::{EditTarget, PersonEditor};

const SENTINEL: &str = "certificates-sentinel";

/// Certificate list with server-side sort and an expired-only toggle.
#[component]
pub fn Certificates() -> Element {
    let auth = use_auth();
    let toast = use_toast();
    let config: AppConfig = use_context();

    let mut cert_query = use_signal(CertQuery::default);
    let mut query_input = use_signal(String::new);
    let query = use_debounced(query_input, SEARCH_DEBOUNCE_MS);
    let page_size = config.paging.certificates_page as usize;
    let mut list = use_signal(move || InfiniteList::<CertRow>::new(page_size));
    let mut refresh = use_signal(|| 0u32);
    let mut editing = use_signal(|| Option::<EditTarget>::None);
    let mut exporting = use_signal(|| false);

    use_effect(move || {
        let q = query();
        if cert_query.peek().q != q {
            cert_query.write().q = q;
        }
    });

    let load_more = use_callback(move |_: ()| {
        let Some(ticket) = list.write().begin() else {
            return;
        };
        let current = cert_query.peek().clone();
        spawn(async move {
            let result = server::api::list_certificates(
                current,
                Some(page_size as i64),
                Some(ticket.offset as i64),
            )
            .await;
            match result {
                Ok(rows) => {
                    list.write().finish(ticket, rows);
                }
                Err(e) => {
                    if list.write().fail(ticket) {
                        report_error(auth, toast, &e);
                    }
                }
            }
        });
    });

    use_effect(move || {
        let _ = cert_query();
        let _ = refresh();
        list.write().reset();
        load_more.call(());
    });

    use_infinite_scroll(SENTINEL, load_more);

    let handle_export = move |_| {
        if exporting() {
            return;
        }
        exporting.set(true);
        let current = cert_query.peek().clone();
        spawn(async move {
            match server::api::export_certificates_xlsx(current).await {
                Ok(file) => bridge::download(&file).await,
                Err(e) => report_error(auth, toast, &e),
            }
            exporting.set(false);
        });
    };

    let sort_by = move |key: CertSortKey| {
        move |_: MouseEvent| {
            let next = cert_query.peek().sort.toggle(key);
            cert_query.write().sort = next;
        }
    };

    let current = cert_query.read().clone();
    let l = list.read();
    let rows: Vec<CertRow> = l.items().to_vec();
    let status = l.status_text();
    drop(l);
    let shown = rows.len();

    rsx! {
        div { class: "container",
            PageHeader {
                PageTitle { subtitle: "Scadenze dei certificati medici", "Certificati" }
                PageActions {
                    Button { onclick: handle_export, disabled: exporting(),
                        if exporting() { "Esporto…" } else { "Export Excel" }
                    }
                }
            }

            SearchBar {
                SearchInput {
                    value: query_input(),
                    placeholder: "Cerca nome, tessera o quota…",
                    on_input: move |v| query_input.set(v),
                }
                ChipButton {
                    active: current.only_expired,
                    onclick: move |_| {
                        let next = !cert_query.peek().only_expired;
                        cert_query.write().only_expired = next;
                    },
                    "Solo scaduti"
                }
                SearchBarMeta { "Mostrati: {shown}" }
            }

            Card {
                DataTable {
                    DataTableHeader {
                        DataTableColumn { onclick: sort_by(CertSortKey::DisplayName),
                            "{CertSortKey::DisplayName.header()}{current.sort.indicator(CertSortKey::DisplayName)}"
                        }
                        DataTableColumn { "Tessera" }
                        DataTableColumn { onclick: sort_by(CertSortKey::Scadenza),
                            "{CertSortKey::Scadenza.header()}{current.sort.indicator(CertSortKey::Scadenza)}"
                        }
                        DataTableColumn { align_right: true, onclick: sort_by(CertSortKey::GiorniRimanenti),
                            "{CertSortKey::GiorniRimanenti.header()}{current.sort.indicator(CertSortKey::GiorniRimanenti)}"
                        }
                        DataTableColumn { "Stato" }
                        DataTableColumn { "Corsi" }
                        DataTableColumn { "" }
                    }
                    DataTableBody {
                        if rows.is_empty() {
                            DataTableMessage { colspan: 7, message: status.clone() }
                        }
                        for row in rows {
                            DataTableRow { key: "{row.person_id}",
                                DataTableCell {
                                    div { class: "cell-title", "{row.display_name}" }
                                    div { class: "cell-sub", "{ruolo_label(row.ruolo.as_deref())}" }
                                }
                                DataTableCell { "{or_dash(row.nr_tessera.as_deref())}" }
                                DataTableCell { "{or_dash(row.scadenza_fmt.as_deref())}" }
                                DataTableCell { align_right: true,
                                    {row.giorni_rimanenti.map(|d| d.to_string()).unwrap_or_else(|| or_dash(None))}
                                }
                                DataTableCell {
                                    CertBadge { chip: CertChip::compact(row.giorni_rimanenti) }
                                }
                                DataTableCell { "{or_dash(Some(row.corsi_joined().as_str()))}" }
                                DataTableCell { align_right: true,
                                    Button {
                                        variant: ButtonVariant::Ghost,
                                        size: ButtonSize::Tiny,
                                        onclick: move |_| editing.set(Some(EditTarget::Existing(row.person_id))),
                                        "Modifica"
                                    }
                                }
                            }
                        }
                    }
                }
                ListFooter { status: status, sentinel_id: SENTINEL }
            }
        }

        if let Some(target) = editing() {
            PersonEditor {
                target: target,
                on_close: move |_| editing.set(None),
                on_saved: move |_| refresh += 1,
            }
        }
    }
}
