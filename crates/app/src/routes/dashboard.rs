use dioxus::prelude::*;
use shared_types::{CertChip, DashboardView, KpiKey, DEFAULT_PAGE_SIZE, PAGE_SIZES};
use shared_ui::{
    use_toast, Badge, BadgeVariant, Button, ButtonSize, ButtonVariant, Card, DataTable,
    DataTableBody, DataTableCell, DataTableColumn, DataTableHeader, DataTableMessage, DataTableRow,
    FormSelect, KpiCard, KpiGrid, PageActions, PageHeader, PageTitle, Pagination, SearchBar,
    SearchBarMeta, SearchInput,
};

use crate::auth::{report_error, use_auth};
use crate::bridge;
use crate::format_helpers::{consent_label, or_dash, quota_label, ruolo_label};
use crate::hooks::{use_debounced, SEARCH_DEBOUNCE_MS};
use crate::routes::person_editor::{EditTarget, PersonEditor};

/// Certificate overview: KPI tiles, local search and sort, explicit paging.
#[component]
pub fn Dashboard() -> Element {
    let auth = use_auth();
    let toast = use_toast();
    let mut view = use_signal(|| DashboardView::new(DEFAULT_PAGE_SIZE));
    let mut query_input = use_signal(String::new);
    let query = use_debounced(query_input, SEARCH_DEBOUNCE_MS);
    let mut reload = use_signal(|| 0u32);
    let mut loading = use_signal(|| true);
    let mut exporting = use_signal(|| false);
    let mut editing = use_signal(|| Option::<EditTarget>::None);

    use_effect(move || {
        let q = query();
        view.write().set_query(q);
    });

    let _rows = use_resource(move || {
        let _ = reload();
        async move {
            loading.set(true);
            match server::api::dashboard_rows().await {
                Ok(rows) => view.write().set_rows(rows),
                Err(e) => {
                    view.write().fail_load();
                    report_error(auth, toast, &e);
                }
            }
            loading.set(false);
        }
    });

    let handle_refresh = move |_| {
        query_input.set(String::new());
        view.write().clear_filters();
        reload += 1;
    };

    let handle_export = move |_| {
        if exporting() {
            return;
        }
        exporting.set(true);
        let (q, kpi, sort) = {
            let v = view.read();
            (v.query().to_string(), v.kpi(), v.sort())
        };
        spawn(async move {
            match server::api::export_dashboard_xlsx(q, kpi, sort).await {
                Ok(file) => bridge::download(&file).await,
                Err(e) => report_error(auth, toast, &e),
            }
            exporting.set(false);
        });
    };

    let v = view.read();
    let tally = v.tally();
    let (shown, all) = v.counts();
    let active_kpi = v.kpi();
    let sort = v.sort();
    let pager = *v.pager();
    let rows: Vec<_> = v.page_rows().into_iter().cloned().collect();
    let message = v.body_message(loading());
    let failed = v.load_failed();
    drop(v);

    rsx! {
        div { class: "container",
            PageHeader {
                PageTitle { subtitle: "Controllo certificati medici", "Dashboard" }
                PageActions {
                    Button { variant: ButtonVariant::Ghost, onclick: handle_refresh, "Aggiorna" }
                    Button { onclick: handle_export, disabled: exporting(),
                        if exporting() { "Esporto…" } else { "Export Excel" }
                    }
                }
            }

            KpiGrid {
                for key in KpiKey::ALL {
                    KpiCard {
                        key: "{key:?}",
                        label: key.label(),
                        value: tally.get(key).to_string(),
                        tone: key.tone().as_class(),
                        active: active_kpi == Some(key),
                        onclick: move |_| view.write().click_kpi(key),
                    }
                }
            }

            SearchBar {
                SearchInput {
                    value: query_input(),
                    placeholder: "Cerca nome, tessera o quota…",
                    on_input: move |v| query_input.set(v),
                }
                Button {
                    variant: ButtonVariant::Ghost,
                    onclick: move |_| view.write().toggle_sort(),
                    "{sort.button_label()}"
                }
                FormSelect {
                    value: pager.page_size().to_string(),
                    onchange: move |v: String| {
                        if let Ok(size) = v.parse::<usize>() {
                            view.write().set_page_size(size);
                        }
                    },
                    for size in PAGE_SIZES {
                        option { value: "{size}", "{size} per pagina" }
                    }
                }
                if failed {
                    SearchBarMeta { "Aggiornamento non riuscito · Risultati {shown} / {all}" }
                } else {
                    SearchBarMeta { "Risultati {shown} / {all}" }
                }
            }

            Card {
                DataTable {
                    DataTableHeader {
                        DataTableColumn { "Socio" }
                        DataTableColumn { align_right: true, "Quota" }
                        DataTableColumn { "Tessera" }
                        DataTableColumn { "Certificato" }
                        DataTableColumn { "WhatsApp" }
                        DataTableColumn { "Corsi" }
                        DataTableColumn { "" }
                    }
                    DataTableBody {
                        if let Some(message) = message {
                            DataTableMessage { colspan: 7, message: message.to_string() }
                        }
                        for row in rows {
                            DataTableRow { key: "{row.person_id}",
                                DataTableCell {
                                    div { class: "cell-title", "{row.display_name}" }
                                    div { class: "cell-sub", "{ruolo_label(row.ruolo.as_deref())}" }
                                }
                                DataTableCell { align_right: true, "{quota_label(row.nr_quota)}" }
                                DataTableCell { "{or_dash(row.nr_tessera.as_deref())}" }
                                DataTableCell {
                                    CertBadge { chip: CertChip::dashboard(row.giorni_rimanenti) }
                                }
                                DataTableCell { "{consent_label(row.consenso_whatsapp)}" }
                                DataTableCell {
                                    div { class: "chip-group",
                                        for course in row.corsi.iter() {
                                            Badge { key: "{course.id}", variant: BadgeVariant::Muted, "{course.nome}" }
                                        }
                                    }
                                }
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
            }

            Pagination {
                label: pager.label(),
                has_prev: pager.has_prev(),
                has_next: pager.has_next(),
                on_prev: move |_| view.write().prev_page(),
                on_next: move |_| view.write().next_page(),
            }
        }

        if let Some(target) = editing() {
            PersonEditor {
                target: target,
                on_close: move |_| editing.set(None),
                on_saved: move |_| reload += 1,
            }
        }
    }
}

/// Certificate chip coloured by tone.
#[component]
pub fn CertBadge(chip: CertChip) -> Element {
    rsx! {
        Badge { variant: BadgeVariant::from_tone(chip.tone.as_class()), "{chip.text}" }
    }
}
