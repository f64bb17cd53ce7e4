use dioxus::prelude::*;
use dioxus_primitives::alert_dialog as prim;

#[component]
pub fn AlertDialogRoot(mut props: prim::AlertDialogRootProps) -> Element {
    props.attributes.push(Attribute::new(
        "class",
        "alert-dialog-overlay",
        None,
        false,
    ));

    rsx! {
        document::Link { rel: "stylesheet", href: asset!("./style.css") }
        prim::AlertDialogRoot { ..props }
    }
}

#[component]
pub fn AlertDialogContent(mut props: prim::AlertDialogContentProps) -> Element {
    if props.class.is_none() {
        props.class = Some("alert-dialog-content".to_string());
    }

    rsx! {
        prim::AlertDialogContent { ..props }
    }
}

#[component]
pub fn AlertDialogTitle(mut props: prim::AlertDialogTitleProps) -> Element {
    props.attributes.push(Attribute::new(
        "class",
        "alert-dialog-title",
        None,
        false,
    ));

    rsx! {
        prim::AlertDialogTitle { ..props }
    }
}

#[component]
pub fn AlertDialogDescription(mut props: prim::AlertDialogDescriptionProps) -> Element {
    props.attributes.push(Attribute::new(
        "class",
        "alert-dialog-description",
        None,
        false,
    ));

    rsx! {
        prim::AlertDialogDescription { ..props }
    }
}

#[component]
pub fn AlertDialogActions(mut props: prim::AlertDialogActionsProps) -> Element {
    props.attributes.push(Attribute::new(
        "class",
        "alert-dialog-actions",
        None,
        false,
    ));

    rsx! {
        prim::AlertDialogActions { ..props }
    }
}

#[component]
pub fn AlertDialogAction(mut props: prim::AlertDialogActionProps) -> Element {
    props.attributes.push(Attribute::new(
        "class",
        "alert-dialog-action",
        None,
        false,
    ));

    rsx! {
        prim::AlertDialogAction { ..props }
    }
}

#[component]
pub fn AlertDialogCancel(mut props: prim::AlertDialogCancelProps) -> Element {
    props.attributes.push(Attribute::new(
        "class",
        "alert-dialog-cancel",
        None,
        false,
    ));

    rsx! {
        prim::AlertDialogCancel { ..props }
    }
}

/// Confirmation prompt for destructive operations.
///
/// `on_cancel` fires on the cancel button and on dismissal; neither path
/// calls `on_confirm`.
#[component]
pub fn ConfirmDialog(
    open: bool,
    title: String,
    message: String,
    #[props(default)] details: String,
    #[props(default = "Conferma".to_string())] confirm_label: String,
    #[props(default = "Annulla".to_string())] cancel_label: String,
    #[props(default = false)] danger: bool,
    on_confirm: EventHandler<()>,
    on_cancel: EventHandler<()>,
) -> Element {
    let content_class = if danger {
        "alert-dialog-content danger".to_string()
    } else {
        "alert-dialog-content".to_string()
    };

    rsx! {
        AlertDialogRoot {
            open: open,
            on_open_change: move |next: bool| {
                if !next {
                    on_cancel.call(());
                }
            },
            AlertDialogContent { class: content_class,
                AlertDialogTitle { "{title}" }
                AlertDialogDescription {
                    p { "{message}" }
                    if !details.is_empty() {
                        p { class: "alert-dialog-details", "{details}" }
                    }
                }
                AlertDialogActions {
                    AlertDialogCancel {
                        on_click: move |_| on_cancel.call(()),
                        "{cancel_label}"
                    }
                    AlertDialogAction {
                        on_click: move |_| on_confirm.call(()),
                        "{confirm_label}"
                    }
                }
            }
        }
    }
}
