use dioxus::prelude::*;

/// Scrollable table wrapper.
#[component]
pub fn DataTable(#[props(default = false)] compact: bool, children: Element) -> Element {
    rsx! {
        document::Link { rel: "stylesheet", href: asset!("./style.css") }
        div { class: "data-table",
            table { class: if compact { "compact" } else { "" },
                {children}
            }
        }
    }
}

/// Table header section, wraps `th` elements in a `thead > tr`.
#[component]
pub fn DataTableHeader(children: Element) -> Element {
    rsx! {
        thead {
            tr { {children} }
        }
    }
}

#[component]
pub fn DataTableBody(children: Element) -> Element {
    rsx! {
        tbody { {children} }
    }
}

/// Column header cell. With `onclick` it renders as a sortable header.
#[component]
pub fn DataTableColumn(
    #[props(default)] onclick: Option<EventHandler<MouseEvent>>,
    #[props(default = false)] align_right: bool,
    children: Element,
) -> Element {
    let sortable = onclick.is_some();
    let class = match (sortable, align_right) {
        (true, true) => "sortable right",
        (true, false) => "sortable",
        (false, true) => "right",
        (false, false) => "",
    };
    rsx! {
        th {
            class: class,
            onclick: move |evt| {
                if let Some(handler) = &onclick {
                    handler.call(evt);
                }
            },
            {children}
        }
    }
}

#[component]
pub fn DataTableRow(
    #[props(default)] onclick: Option<EventHandler<MouseEvent>>,
    children: Element,
) -> Element {
    let has_click = onclick.is_some();
    rsx! {
        tr {
            class: if has_click { "data-table-row clickable" } else { "data-table-row" },
            onclick: move |evt| {
                if let Some(handler) = &onclick {
                    handler.call(evt);
                }
            },
            {children}
        }
    }
}

#[component]
pub fn DataTableCell(#[props(default = false)] align_right: bool, children: Element) -> Element {
    rsx! {
        td { class: if align_right { "right" } else { "" }, {children} }
    }
}

/// Single muted row spanning the table, for loading and empty states.
#[component]
pub fn DataTableMessage(colspan: u32, message: String) -> Element {
    rsx! {
        tr { class: "data-table-message",
            td { colspan: "{colspan}", "{message}" }
        }
    }
}

/// Status line under an infinite list plus the sentinel element the
/// scroll observer watches.
#[component]
pub fn ListFooter(status: String, sentinel_id: String, children: Element) -> Element {
    rsx! {
        div { class: "list-footer",
            span { class: "list-footer-status", "{status}" }
            {children}
            div { id: "{sentinel_id}", class: "list-sentinel" }
        }
    }
}
