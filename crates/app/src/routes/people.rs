use dioxus::prelude::*;
use shared_types::{
    AppConfig, CertChip, CertStatus, InfiniteList, PeopleFilter, PersonSearchRow, Ruolo,
};
use shared_ui::{
    use_toast, Button, ButtonSize, ButtonVariant, Card, ChipButton, ChipGroup, ConfirmDialog,
    DataTable, DataTableBody, DataTableCell, DataTableColumn, DataTableHeader, DataTableMessage,
    DataTableRow, FormSelect, ListFooter, PageActions, PageHeader, PageTitle, SearchBar,
    SearchBarMeta, SearchInput, ToastOptions,
};
use uuid::Uuid;

use crate::auth::{report_error, use_auth};
use crate::bridge;
use crate::format_helpers::{contacts_line, or_dash, quota_label, ruolo_label};
use crate::hooks::{use_debounced, use_infinite_scroll, SEARCH_DEBOUNCE_MS};
use crate::routes::dashboard::CertBadge;
use crate::routes::person_editor::{EditTarget, PersonEditor};

const SENTINEL: &str = "people-sentinel";

/// Member list with backend filters and infinite scroll.
#[component]
pub fn People() -> Element {
    let auth = use_auth();
    let toast = use_toast();
    let config: AppConfig = use_context();

    let mut filter = use_signal(PeopleFilter::default);
    let mut query_input = use_signal(String::new);
    let query = use_debounced(query_input, SEARCH_DEBOUNCE_MS);
    let page_size = config.paging.people_page as usize;
    let mut list = use_signal(move || InfiniteList::<PersonSearchRow>::new(page_size));
    let mut refresh = use_signal(|| 0u32);
    let mut editing = use_signal(|| Option::<EditTarget>::None);
    let mut confirm_delete = use_signal(|| Option::<Uuid>::None);
    let mut confirm_backup = use_signal(|| false);
    let mut exporting = use_signal(|| false);

    let courses = use_resource(move || async move { server::api::list_courses().await });

    let total = use_resource(move || {
        let _ = refresh();
        async move { server::api::count_people(PeopleFilter::default()).await.ok() }
    });
    let matching = use_resource(move || {
        let f = filter();
        let _ = refresh();
        async move { server::api::count_people(f).await.ok() }
    });

    use_effect(move || {
        let q = query();
        if filter.peek().q != q {
            filter.write().q = q;
        }
    });

    let load_more = use_callback(move |_: ()| {
        let Some(ticket) = list.write().begin() else {
            return;
        };
        let f = filter.peek().clone();
        let limit = page_size as i64;
        spawn(async move {
            match server::api::list_people(f, Some(limit), Some(ticket.offset as i64)).await {
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

    // Any filter change or refresh starts over from the first page.
    use_effect(move || {
        let _ = filter();
        let _ = refresh();
        list.write().reset();
        load_more.call(());
    });

    use_infinite_scroll(SENTINEL, load_more);

    let handle_reset = move |_| {
        query_input.set(String::new());
        filter.set(PeopleFilter::default());
    };

    let handle_delete = move |_| {
        let Some(id) = confirm_delete() else {
            return;
        };
        confirm_delete.set(None);
        spawn(async move {
            match server::api::delete_person(id).await {
                Ok(()) => {
                    toast.success("Eliminato".to_string(), ToastOptions::new());
                    refresh += 1;
                }
                Err(e) => report_error(auth, toast, &e),
            }
        });
    };

    let handle_export = move |_| {
        if exporting() {
            return;
        }
        exporting.set(true);
        let f = filter.peek().clone();
        spawn(async move {
            match server::api::export_people_xlsx(f).await {
                Ok(file) => bridge::download(&file).await,
                Err(e) => report_error(auth, toast, &e),
            }
            exporting.set(false);
        });
    };

    let handle_backup = move |_| {
        confirm_backup.set(false);
        exporting.set(true);
        spawn(async move {
            match server::api::export_backup_json().await {
                Ok(file) => {
                    bridge::download(&file).await;
                    toast.success("Backup scaricato".to_string(), ToastOptions::new());
                }
                Err(e) => report_error(auth, toast, &e),
            }
            exporting.set(false);
        });
    };

    let current = filter.read().clone();
    let course_options: Vec<(i64, String)> = match &*courses.read() {
        Some(Ok(list)) => list
            .iter()
            .map(|c| (c.course.id, c.course.nome_corso.clone()))
            .collect(),
        _ => Vec::new(),
    };
    let total_label = total.read().clone().flatten().map(|n| n.to_string()).unwrap_or_else(|| "…".into());
    let matching_label = matching.read().clone().flatten().map(|n| n.to_string()).unwrap_or_else(|| "…".into());
    let selected_course = current.course_ids.first().map(|id| id.to_string()).unwrap_or_default();
    let selected_ruolo = current.ruolo.map(|r| r.as_db_str().to_string()).unwrap_or_default();

    let l = list.read();
    let rows: Vec<PersonSearchRow> = l.items().to_vec();
    let status = l.status_text();
    let empty = rows.is_empty();
    drop(l);

    rsx! {
        div { class: "container",
            PageHeader {
                PageTitle { subtitle: "Anagrafica soci", "Soci" }
                PageActions {
                    Button { variant: ButtonVariant::Ghost, onclick: handle_reset, "Reset" }
                    Button { variant: ButtonVariant::Ghost, onclick: handle_export, disabled: exporting(), "Export Excel" }
                    if config.features.backup_export {
                        Button {
                            variant: ButtonVariant::Ghost,
                            disabled: exporting(),
                            onclick: move |_| confirm_backup.set(true),
                            "Export DB"
                        }
                    }
                    Button { onclick: move |_| editing.set(Some(EditTarget::New)), "Nuovo Socio" }
                }
            }

            SearchBar {
                SearchInput {
                    value: query_input(),
                    placeholder: "Cerca nome, tessera o quota…",
                    on_input: move |v| query_input.set(v),
                }
                FormSelect {
                    value: selected_ruolo,
                    onchange: move |v: String| filter.write().ruolo = Ruolo::try_from(v.as_str()).ok(),
                    option { value: "", "Tutti i ruoli" }
                    for ruolo in Ruolo::ALL {
                        option { value: ruolo.as_db_str(), "{ruolo.label()}" }
                    }
                }
                FormSelect {
                    value: selected_course,
                    onchange: move |v: String| {
                        filter.write().course_ids = v.parse::<i64>().ok().into_iter().collect();
                    },
                    option { value: "", "Tutti i corsi" }
                    for (id, nome) in course_options {
                        option { key: "{id}", value: "{id}", "{nome}" }
                    }
                }
                SearchBarMeta { "Totale soci: {total_label} • Risultati: {matching_label}" }
            }

            ChipGroup {
                for status_chip in CertStatus::ALL {
                    ChipButton {
                        key: "{status_chip:?}",
                        active: current.statuses.contains(&status_chip),
                        onclick: move |_| filter.write().toggle_status(status_chip),
                        "{status_chip.label()}"
                    }
                }
            }

            Card {
                DataTable {
                    DataTableHeader {
                        DataTableColumn { "Socio" }
                        DataTableColumn { align_right: true, "Quota" }
                        DataTableColumn { "Tessera" }
                        DataTableColumn { "Contatti" }
                        DataTableColumn { "Certificato" }
                        DataTableColumn { "" }
                    }
                    DataTableBody {
                        if empty {
                            DataTableMessage { colspan: 6, message: status.clone() }
                        }
                        for row in rows {
                            DataTableRow { key: "{row.id}",
                                DataTableCell {
                                    div { class: "cell-title", "{row.display_name}" }
                                    div { class: "cell-sub",
                                        "{ruolo_label(row.ruolo.as_deref())}"
                                        if let Some(corso) = row.corso.as_deref() {
                                            " • {corso}"
                                        }
                                    }
                                }
                                DataTableCell { align_right: true, "{quota_label(row.nr_quota)}" }
                                DataTableCell { "{or_dash(row.nr_tessera.as_deref())}" }
                                DataTableCell { "{contacts_line(row.telefono.as_deref(), row.email.as_deref())}" }
                                DataTableCell {
                                    CertBadge { chip: CertChip::compact(row.giorni_rimanenti) }
                                }
                                DataTableCell { align_right: true,
                                    Button {
                                        variant: ButtonVariant::Ghost,
                                        size: ButtonSize::Tiny,
                                        onclick: move |_| editing.set(Some(EditTarget::Existing(row.id))),
                                        "Modifica"
                                    }
                                    Button {
                                        variant: ButtonVariant::GhostDanger,
                                        size: ButtonSize::Tiny,
                                        onclick: move |_| confirm_delete.set(Some(row.id)),
                                        "Elimina"
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

        ConfirmDialog {
            open: confirm_delete().is_some(),
            title: "Elimina socio",
            message: "Eliminare questa persona?",
            confirm_label: "Elimina",
            danger: true,
            on_confirm: handle_delete,
            on_cancel: move |_| confirm_delete.set(None),
        }

        ConfirmDialog {
            open: confirm_backup(),
            title: "Export DB",
            message: "Scaricare il backup completo del database in JSON?",
            details: "Include soci, contatti, tessere, certificati, corsi e iscrizioni.",
            confirm_label: "Scarica",
            on_confirm: handle_backup,
            on_cancel: move |_| confirm_backup.set(false),
        }
    }
}
