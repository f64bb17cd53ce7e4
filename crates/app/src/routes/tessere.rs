use dioxus::prelude::*;
use shared_types::{AppConfig, InfiniteList, PersonSearchRow};
use shared_ui::{
    use_toast, Button, ButtonSize, ButtonVariant, Card, DataTable, DataTableBody, DataTableCell,
    DataTableColumn, DataTableHeader, DataTableMessage, DataTableRow, ListFooter, PageHeader,
    PageTitle, SearchBar, SearchBarMeta, SearchInput,
};

use crate::auth::{report_error, use_auth};
use crate::format_helpers::{contacts_line, or_dash, quota_label, ruolo_label};
use crate::hooks::{use_debounced, use_infinite_scroll, SEARCH_DEBOUNCE_MS};
use crate::routes::person_editor::{EditTarget, PersonEditor};

const SENTINEL: &str = "tessere-sentinel";

/// Membership cards ordered by quota number.
#[component]
pub fn Tessere() -> Element {
    let auth = use_auth();
    let toast = use_toast();
    let config: AppConfig = use_context();

    let mut query_input = use_signal(String::new);
    let query = use_debounced(query_input, SEARCH_DEBOUNCE_MS);
    let page_size = config.paging.tessere_page as usize;
    let mut list = use_signal(move || InfiniteList::<PersonSearchRow>::new(page_size));
    let mut refresh = use_signal(|| 0u32);
    let mut editing = use_signal(|| Option::<EditTarget>::None);

    let load_more = use_callback(move |_: ()| {
        let Some(ticket) = list.write().begin() else {
            return;
        };
        let q = query.peek().clone();
        spawn(async move {
            let result =
                server::api::list_tessere(q, Some(page_size as i64), Some(ticket.offset as i64)).await;
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
        let _ = query();
        let _ = refresh();
        list.write().reset();
        load_more.call(());
    });

    use_infinite_scroll(SENTINEL, load_more);

    let l = list.read();
    let rows: Vec<PersonSearchRow> = l.items().to_vec();
    let status = l.status_text();
    drop(l);
    let shown = rows.len();

    rsx! {
        div { class: "container",
            PageHeader {
                PageTitle { subtitle: "Tessere ordinate per numero di quota", "Tessere" }
            }

            SearchBar {
                SearchInput {
                    value: query_input(),
                    placeholder: "Cerca nome, tessera o quota…",
                    on_input: move |v| query_input.set(v),
                }
                SearchBarMeta { "Mostrati: {shown}" }
            }

            Card {
                DataTable { compact: true,
                    DataTableHeader {
                        DataTableColumn { align_right: true, "Quota" }
                        DataTableColumn { "Socio" }
                        DataTableColumn { "Tessera" }
                        DataTableColumn { "Contatti" }
                        DataTableColumn { "" }
                    }
                    DataTableBody {
                        if rows.is_empty() {
                            DataTableMessage { colspan: 5, message: status.clone() }
                        }
                        for row in rows {
                            DataTableRow { key: "{row.id}",
                                DataTableCell { align_right: true, "{quota_label(row.nr_quota)}" }
                                DataTableCell {
                                    div { class: "cell-title", "{row.display_name}" }
                                    div { class: "cell-sub", "{ruolo_label(row.ruolo.as_deref())}" }
                                }
                                DataTableCell { "{or_dash(row.nr_tessera.as_deref())}" }
                                DataTableCell { "{contacts_line(row.telefono.as_deref(), row.email.as_deref())}" }
                                DataTableCell { align_right: true,
                                    Button {
                                        variant: ButtonVariant::Ghost,
                                        size: ButtonSize::Tiny,
                                        onclick: move |_| editing.set(Some(EditTarget::Existing(row.id))),
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
