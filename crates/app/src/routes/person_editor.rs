use dioxus::prelude::*;
use shared_types::{group_by_type, CertStatus, Course, PersonForm, Ruolo};
use shared_ui::{
    use_toast, Button, ButtonVariant, ConfirmDialog, Form, FormRow, FormSection, FormSelect, Input,
    Sheet, SheetContent, SheetFooter, SheetHeader, Textarea, ToastOptions,
};
use uuid::Uuid;

use crate::auth::{report_error, use_auth};

/// Which person the editor works on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EditTarget {
    New,
    Existing(Uuid),
}

impl EditTarget {
    fn id(&self) -> Option<Uuid> {
        match self {
            EditTarget::New => None,
            EditTarget::Existing(id) => Some(*id),
        }
    }
}

/// Sheet editing a person with contact, membership, certificate and courses.
///
/// Mount it only while open; it loads its own data. `on_saved` fires after a
/// successful save or delete, `on_close` on every dismissal.
#[component]
pub fn PersonEditor(target: EditTarget, on_close: EventHandler<()>, on_saved: EventHandler<()>) -> Element {
    let auth = use_auth();
    let toast = use_toast();
    let mut form = use_signal(PersonForm::new);
    let mut ready = use_signal(|| target == EditTarget::New);
    let mut saving = use_signal(|| false);
    let mut confirm_delete = use_signal(|| false);

    let courses = use_resource(move || async move {
        server::api::list_courses()
            .await
            .map(|list| list.into_iter().map(|c| c.course).collect::<Vec<Course>>())
    });

    use_future(move || async move {
        let EditTarget::Existing(id) = target else {
            return;
        };
        match server::api::get_person_full(id).await {
            Ok(full) => {
                form.set(PersonForm::from_full(&full));
                ready.set(true);
            }
            Err(e) => {
                report_error(auth, toast, &e);
                on_close.call(());
            }
        }
    });

    let handle_save = move |_: FormEvent| {
        if saving() {
            return;
        }
        // Validation failures never reach the backend.
        let save = match form().into_save(target.id()) {
            Ok(save) => save,
            Err(err) => {
                toast.error(err.message, ToastOptions::new());
                return;
            }
        };
        saving.set(true);
        spawn(async move {
            match server::api::save_person(save).await {
                Ok(_) => {
                    toast.success("Salvato".to_string(), ToastOptions::new());
                    on_saved.call(());
                    on_close.call(());
                }
                Err(e) => report_error(auth, toast, &e),
            }
            saving.set(false);
        });
    };

    let handle_delete = move |_| {
        confirm_delete.set(false);
        let Some(id) = target.id() else {
            return;
        };
        spawn(async move {
            match server::api::delete_person(id).await {
                Ok(()) => {
                    toast.success("Eliminato".to_string(), ToastOptions::new());
                    on_saved.call(());
                    on_close.call(());
                }
                Err(e) => report_error(auth, toast, &e),
            }
        });
    };

    let title = match target {
        EditTarget::New => "Nuovo socio",
        EditTarget::Existing(_) => "Modifica socio",
    };

    let course_groups = match &*courses.read() {
        Some(Ok(list)) => group_by_type(list)
            .into_iter()
            .map(|(tipo, items)| {
                let label = tipo.map(|t| t.label()).unwrap_or("Altri corsi");
                let items: Vec<(i64, String)> =
                    items.into_iter().map(|c| (c.id, c.nome_corso.clone())).collect();
                (label, items)
            })
            .collect::<Vec<_>>(),
        _ => Vec::new(),
    };

    let f = form.read().clone();
    let cert_hint = if f.esente {
        CertStatus::Esente.label()
    } else if f.scadenza.trim().is_empty() {
        CertStatus::Assente.label()
    } else {
        ""
    };

    rsx! {
        Sheet { open: true, on_close: move |_| on_close.call(()),
            SheetContent {
                SheetHeader { title: title, on_close: move |_| on_close.call(()) }

                if !ready() {
                    p { class: "muted", "Carico…" }
                } else {
                    Form { onsubmit: handle_save,
                        FormSection { title: "Socio" }
                        Input {
                            label: "Display name *",
                            value: f.display_name.clone(),
                            on_input: move |v| form.write().display_name = v,
                        }
                        Input {
                            label: "Nr quota",
                            input_type: "number",
                            value: f.nr_quota.clone(),
                            on_input: move |v| form.write().nr_quota = v,
                        }
                        FormSelect {
                            label: "Ruolo",
                            value: f.ruolo.clone(),
                            onchange: move |v| form.write().ruolo = v,
                            for ruolo in Ruolo::ALL {
                                option { value: ruolo.as_db_str(), "{ruolo.label()}" }
                            }
                        }
                        Input {
                            label: "Corso (nota)",
                            value: f.corso.clone(),
                            on_input: move |v| form.write().corso = v,
                        }

                        FormSection { title: "Contatti" }
                        Input {
                            label: "Telefono",
                            input_type: "tel",
                            value: f.telefono.clone(),
                            on_input: move |v| form.write().telefono = v,
                        }
                        Input {
                            label: "Email",
                            input_type: "email",
                            value: f.email.clone(),
                            on_input: move |v| form.write().email = v,
                        }
                        Input {
                            label: "Codice fiscale",
                            value: f.codice_fiscale.clone(),
                            on_input: move |v| form.write().codice_fiscale = v,
                        }
                        TriStateSelect {
                            label: "Consenso WhatsApp",
                            value: f.consenso_whatsapp.clone(),
                            onchange: move |v| form.write().consenso_whatsapp = v,
                        }

                        FormSection { title: "Tessera" }
                        Input {
                            label: "Nr tessera",
                            value: f.nr_tessera.clone(),
                            on_input: move |v| form.write().nr_tessera = v,
                        }
                        TriStateSelect {
                            label: "Safeguarding consegnato",
                            value: f.safeguarding.clone(),
                            onchange: move |v| form.write().safeguarding = v,
                        }
                        Textarea {
                            label: "Note",
                            value: f.note.clone(),
                            on_input: move |v| form.write().note = v,
                        }

                        FormSection { title: "Certificato" }
                        Input {
                            label: "Scadenza",
                            input_type: "date",
                            value: f.scadenza.clone(),
                            on_input: move |v| form.write().scadenza = v,
                        }
                        Input {
                            label: "Fonte",
                            value: f.fonte.clone(),
                            on_input: move |v| form.write().fonte = v,
                        }
                        label { class: "checkbox-row",
                            input {
                                r#type: "checkbox",
                                checked: f.esente,
                                onchange: move |evt| form.write().esente = evt.checked(),
                            }
                            span { "Esente dal certificato" }
                        }
                        if !cert_hint.is_empty() {
                            p { class: "muted", "Stato: {cert_hint}" }
                        }

                        FormSection { title: "Corsi" }
                        if course_groups.is_empty() {
                            p { class: "muted", "Nessun corso disponibile." }
                        }
                        for (label, items) in course_groups {
                            fieldset { key: "{label}", class: "course-group",
                                legend { "{label}" }
                                for (id, nome) in items {
                                    label { key: "{id}", class: "checkbox-row",
                                        input {
                                            r#type: "checkbox",
                                            checked: f.course_ids.contains(&id),
                                            onchange: move |_| form.write().toggle_course(id),
                                        }
                                        span { "{nome}" }
                                    }
                                }
                            }
                        }

                        FormRow {
                            SheetFooter {
                                if target != EditTarget::New {
                                    Button {
                                        variant: ButtonVariant::GhostDanger,
                                        onclick: move |_| confirm_delete.set(true),
                                        "Elimina"
                                    }
                                }
                                Button { variant: ButtonVariant::Ghost, onclick: move |_| on_close.call(()), "Annulla" }
                                Button { button_type: "submit", disabled: saving(),
                                    if saving() { "Salvataggio…" } else { "Salva" }
                                }
                            }
                        }
                    }
                }
            }
        }

        ConfirmDialog {
            open: confirm_delete(),
            title: "Elimina socio",
            message: "Eliminare questa persona?",
            details: "Contatti, tessera, certificato e iscrizioni ai corsi verranno rimossi.",
            confirm_label: "Elimina",
            danger: true,
            on_confirm: handle_delete,
            on_cancel: move |_| confirm_delete.set(false),
        }
    }
}

/// Sì / No / unknown select over the `""`, `"true"`, `"false"` encoding.
#[component]
fn TriStateSelect(label: String, value: String, onchange: EventHandler<String>) -> Element {
    rsx! {
        FormSelect {
            label: label,
            value: value,
            onchange: move |v| onchange.call(v),
            option { value: "", "—" }
            option { value: "true", "Sì" }
            option { value: "false", "No" }
        }
    }
}
