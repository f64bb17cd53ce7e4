use std::collections::HashMap;

use dioxus::prelude::*;
use shared_types::{filter_courses, Course, CourseForm, CourseWithCount, Person, PersonSearchRow, TipoCorso};
use shared_ui::{
    use_toast, Badge, BadgeVariant, Button, ButtonSize, ButtonVariant, Card, CardContent,
    ChipButton, ChipGroup, ConfirmDialog, Form, FormRow, FormSelect, Input, PageActions,
    PageHeader, PageTitle, SearchBar, SearchBarMeta, SearchInput, Sheet, SheetContent,
    SheetFooter, SheetHeader, SkeletonRows, Textarea, ToastOptions,
};
use uuid::Uuid;

use crate::auth::{report_error, use_auth};
use crate::format_helpers::{or_dash, quota_label, ruolo_label};
use crate::hooks::{use_debounced, SEARCH_DEBOUNCE_MS};

/// Pending destructive action on the courses page.
#[derive(Debug, Clone, PartialEq)]
enum PendingConfirm {
    RemoveParticipant { course_id: i64, person: Person },
    DeleteCourse(Course),
}

/// Course catalogue with per-course participants.
#[component]
pub fn Courses() -> Element {
    let auth = use_auth();
    let toast = use_toast();

    let mut tipo = use_signal(|| Option::<TipoCorso>::None);
    let mut query_input = use_signal(String::new);
    let query = use_debounced(query_input, SEARCH_DEBOUNCE_MS);
    let mut refresh = use_signal(|| 0u32);
    let mut expanded = use_signal(|| Option::<i64>::None);
    let mut participants = use_signal(HashMap::<i64, Vec<Person>>::new);
    let mut counts = use_signal(HashMap::<i64, i64>::new);
    let mut sheet = use_signal(|| Option::<Option<Course>>::None);
    let mut picker = use_signal(|| Option::<i64>::None);
    let mut pending = use_signal(|| Option::<PendingConfirm>::None);

    let courses = use_resource(move || {
        let _ = refresh();
        async move { server::api::list_courses().await }
    });

    // Participants are cached per course and fetched on first expansion.
    let load_participants = use_callback(move |course_id: i64| {
        spawn(async move {
            match server::api::list_course_participants(course_id).await {
                Ok(list) => {
                    counts.write().insert(course_id, list.len() as i64);
                    participants.write().insert(course_id, list);
                }
                Err(e) => report_error(auth, toast, &e),
            }
        });
    });

    let toggle_course = use_callback(move |course_id: i64| {
        if expanded() == Some(course_id) {
            expanded.set(None);
            return;
        }
        expanded.set(Some(course_id));
        if !participants.peek().contains_key(&course_id) {
            load_participants.call(course_id);
        }
    });

    let handle_confirm = move |_| {
        let Some(action) = pending() else {
            return;
        };
        pending.set(None);
        spawn(async move {
            match action {
                PendingConfirm::RemoveParticipant { course_id, person } => {
                    match server::api::remove_person_from_course(course_id, person.id).await {
                        Ok(()) => {
                            if let Some(list) = participants.write().get_mut(&course_id) {
                                list.retain(|p| p.id != person.id);
                            }
                            if let Ok(n) = server::api::course_participants_count(course_id).await {
                                counts.write().insert(course_id, n);
                            }
                            toast.success("Partecipante rimosso".to_string(), ToastOptions::new());
                        }
                        Err(e) => report_error(auth, toast, &e),
                    }
                }
                PendingConfirm::DeleteCourse(course) => match server::api::delete_course(course.id).await {
                    Ok(()) => {
                        participants.write().remove(&course.id);
                        counts.write().remove(&course.id);
                        if expanded() == Some(course.id) {
                            expanded.set(None);
                        }
                        toast.success("Corso eliminato".to_string(), ToastOptions::new());
                        refresh += 1;
                    }
                    Err(e) => report_error(auth, toast, &e),
                },
            }
        });
    };

    let (confirm_title, confirm_message, confirm_details) = match pending() {
        Some(PendingConfirm::RemoveParticipant { person, .. }) => (
            "Rimuovi partecipante",
            format!("Rimuovere {} dal corso?", person.display_name),
            String::new(),
        ),
        Some(PendingConfirm::DeleteCourse(course)) => (
            "Elimina corso",
            format!("Eliminare il corso \"{}\"?", course.nome_corso),
            "Le iscrizioni al corso verranno rimosse.".to_string(),
        ),
        None => ("", String::new(), String::new()),
    };

    let all: Vec<CourseWithCount> = match &*courses.read() {
        Some(Ok(list)) => list.clone(),
        Some(Err(e)) => {
            let text = shared_types::AppError::friendly_message(&e.to_string());
            return rsx! {
                div { class: "container",
                    PageHeader { PageTitle { "Corsi" } }
                    Card { CardContent { p { class: "muted", "{text}" } } }
                }
            };
        }
        None => Vec::new(),
    };
    let loading = courses.read().is_none();
    let active_tipo = tipo();
    let q = query();
    let visible: Vec<CourseWithCount> = filter_courses(&all, active_tipo, &q).into_iter().cloned().collect();
    let shown = visible.len();
    let total = all.len();
    let open_id = expanded();
    let cache = participants.read().clone();
    let live_counts = counts.read().clone();

    rsx! {
        div { class: "container",
            PageHeader {
                PageTitle { subtitle: "Corsi e partecipanti", "Corsi" }
                PageActions {
                    Button { onclick: move |_| sheet.set(Some(None)), "Nuovo corso" }
                }
            }

            SearchBar {
                SearchInput {
                    value: query_input(),
                    placeholder: "Cerca corso…",
                    on_input: move |v| query_input.set(v),
                }
                SearchBarMeta { "Corsi: {shown} / {total}" }
            }

            ChipGroup {
                ChipButton {
                    active: active_tipo.is_none(),
                    onclick: move |_| tipo.set(None),
                    "Tutti"
                }
                for t in TipoCorso::ALL {
                    ChipButton {
                        key: "{t:?}",
                        active: active_tipo == Some(t),
                        onclick: move |_| tipo.set(Some(t)),
                        "{t.label()}"
                    }
                }
            }

            if loading {
                SkeletonRows { count: 4 }
            } else if visible.is_empty() {
                Card { CardContent { p { class: "muted", "Nessun corso." } } }
            }

            div { class: "course-accordion",
                for entry in visible {
                    {
                        let course = entry.course.clone();
                        let id = course.id;
                        let is_open = open_id == Some(id);
                        let count = live_counts.get(&id).copied().unwrap_or(entry.participants_count);
                        let members = cache.get(&id).cloned();
                        let edit_course = course.clone();
                        let delete_course = course.clone();
                        rsx! {
                            Card { key: "{id}", class: "course-card",
                                div {
                                    class: "course-card-header",
                                    "data-open": if is_open { "true" } else { "false" },
                                    onclick: move |_| toggle_course.call(id),
                                    div { class: "course-card-title",
                                        span { class: "cell-title", "{course.nome_corso}" }
                                        if let Some(t) = course.tipo_corso {
                                            Badge { variant: BadgeVariant::Info, "{t.label()}" }
                                        }
                                        if course.attivo == Some(false) {
                                            Badge { variant: BadgeVariant::Muted, "Non attivo" }
                                        }
                                    }
                                    div { class: "cell-sub",
                                        "{count} partecipanti • Istruttori: {or_dash(course.istruttori.as_deref())}"
                                    }
                                }
                                if is_open {
                                    CardContent {
                                        if let Some(text) = course.descrizione.as_deref() {
                                            p { class: "muted", "{text}" }
                                        }
                                        div { class: "course-card-actions",
                                            Button {
                                                size: ButtonSize::Tiny,
                                                onclick: move |_| picker.set(Some(id)),
                                                "Aggiungi partecipanti"
                                            }
                                            Button {
                                                variant: ButtonVariant::Ghost,
                                                size: ButtonSize::Tiny,
                                                onclick: move |_| sheet.set(Some(Some(edit_course.clone()))),
                                                "Modifica"
                                            }
                                            Button {
                                                variant: ButtonVariant::GhostDanger,
                                                size: ButtonSize::Tiny,
                                                onclick: move |_| pending.set(Some(PendingConfirm::DeleteCourse(delete_course.clone()))),
                                                "Elimina"
                                            }
                                        }
                                        {match members {
                                            None => rsx! { SkeletonRows { count: 3 } },
                                            Some(list) if list.is_empty() => rsx! {
                                                p { class: "muted", "Nessun partecipante." }
                                            },
                                            Some(list) => rsx! {
                                                ul { class: "participant-list",
                                                    for person in list {
                                                        {
                                                            let target = person.clone();
                                                            rsx! {
                                                                ParticipantItem {
                                                                    key: "{person.id}",
                                                                    person: person,
                                                                    on_remove: move |_| pending.set(Some(PendingConfirm::RemoveParticipant {
                                                                        course_id: id,
                                                                        person: target.clone(),
                                                                    })),
                                                                }
                                                            }
                                                        }
                                                    }
                                                }
                                            },
                                        }}
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }

        if let Some(editing) = sheet() {
            CourseSheet {
                course: editing,
                on_close: move |_| sheet.set(None),
                on_saved: move |_| refresh += 1,
            }
        }

        if let Some(course_id) = picker() {
            AddParticipants {
                course_id: course_id,
                enrolled: cache.get(&course_id).map(|l| l.iter().map(|p| p.id).collect()).unwrap_or_default(),
                on_close: move |_| picker.set(None),
                on_added: move |_| {
                    load_participants.call(course_id);
                    refresh += 1;
                },
            }
        }

        ConfirmDialog {
            open: pending().is_some(),
            title: confirm_title,
            message: confirm_message,
            details: confirm_details,
            confirm_label: "Conferma",
            danger: true,
            on_confirm: handle_confirm,
            on_cancel: move |_| pending.set(None),
        }
    }
}

#[component]
fn ParticipantItem(person: Person, on_remove: EventHandler<()>) -> Element {
    rsx! {
        li { class: "participant",
            div {
                span { class: "cell-title", "{person.display_name}" }
                span { class: "cell-sub",
                    " Quota {quota_label(person.nr_quota)} • {ruolo_label(person.ruolo.as_deref())}"
                }
            }
            Button {
                variant: ButtonVariant::GhostDanger,
                size: ButtonSize::Tiny,
                onclick: move |_| on_remove.call(()),
                "Rimuovi"
            }
        }
    }
}

/// Create or edit one course. `course` is `None` for a new one.
#[component]
fn CourseSheet(course: Option<Course>, on_close: EventHandler<()>, on_saved: EventHandler<()>) -> Element {
    let auth = use_auth();
    let toast = use_toast();
    let id = course.as_ref().map(|c| c.id);
    let initial = course.as_ref().map(CourseForm::from_course).unwrap_or_default();
    let mut form = use_signal(move || initial);
    let mut saving = use_signal(|| false);

    let handle_save = move |_: FormEvent| {
        if saving() {
            return;
        }
        let save = match form().into_save(id) {
            Ok(save) => save,
            Err(err) => {
                toast.error(err.message, ToastOptions::new());
                return;
            }
        };
        saving.set(true);
        spawn(async move {
            match server::api::save_course(save).await {
                Ok(_) => {
                    toast.success("Corso salvato".to_string(), ToastOptions::new());
                    on_saved.call(());
                    on_close.call(());
                }
                Err(e) => report_error(auth, toast, &e),
            }
            saving.set(false);
        });
    };

    let title = if id.is_some() { "Modifica corso" } else { "Nuovo corso" };
    let f = form.read().clone();

    rsx! {
        Sheet { open: true, on_close: move |_| on_close.call(()),
            SheetContent {
                SheetHeader { title: title, on_close: move |_| on_close.call(()) }
                Form { onsubmit: handle_save,
                    Input {
                        label: "Nome corso *",
                        value: f.nome_corso.clone(),
                        on_input: move |v| form.write().nome_corso = v,
                    }
                    FormSelect {
                        label: "Tipo",
                        value: f.tipo_corso.clone(),
                        onchange: move |v| form.write().tipo_corso = v,
                        option { value: "", "—" }
                        for t in TipoCorso::ALL {
                            option { value: t.as_db_str(), "{t.label()}" }
                        }
                    }
                    Input {
                        label: "Istruttori",
                        value: f.istruttori.clone(),
                        on_input: move |v| form.write().istruttori = v,
                    }
                    Textarea {
                        label: "Descrizione",
                        value: f.descrizione.clone(),
                        on_input: move |v| form.write().descrizione = v,
                    }
                    label { class: "checkbox-row",
                        input {
                            r#type: "checkbox",
                            checked: f.attivo,
                            onchange: move |evt| form.write().attivo = evt.checked(),
                        }
                        span { "Attivo" }
                    }
                    FormRow {
                        SheetFooter {
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
}

/// People picker that enrolls the checked people in one course.
#[component]
fn AddParticipants(
    course_id: i64,
    enrolled: Vec<Uuid>,
    on_close: EventHandler<()>,
    on_added: EventHandler<()>,
) -> Element {
    let auth = use_auth();
    let toast = use_toast();
    let mut query_input = use_signal(String::new);
    let query = use_debounced(query_input, SEARCH_DEBOUNCE_MS);
    let mut selected = use_signal(Vec::<Uuid>::new);
    let mut saving = use_signal(|| false);

    let results = use_resource(move || {
        let q = query();
        async move { server::api::search_people(q).await }
    });

    let handle_add = move |_| {
        let ids = selected();
        if ids.is_empty() || saving() {
            return;
        }
        saving.set(true);
        spawn(async move {
            match server::api::add_people_to_course(course_id, ids).await {
                Ok(n) => {
                    toast.success(format!("{n} partecipanti aggiunti"), ToastOptions::new());
                    on_added.call(());
                    on_close.call(());
                }
                Err(e) => report_error(auth, toast, &e),
            }
            saving.set(false);
        });
    };

    let candidates: Vec<PersonSearchRow> = match &*results.read() {
        Some(Ok(rows)) => rows.iter().filter(|r| !enrolled.contains(&r.id)).cloned().collect(),
        _ => Vec::new(),
    };
    let searching = results.read().is_none();
    let chosen = selected.read().clone();
    let n = chosen.len();

    rsx! {
        Sheet { open: true, on_close: move |_| on_close.call(()),
            SheetContent {
                SheetHeader {
                    title: "Aggiungi partecipanti",
                    description: "Gli iscritti al corso sono esclusi dalla ricerca",
                    on_close: move |_| on_close.call(()),
                }
                SearchInput {
                    value: query_input(),
                    placeholder: "Cerca nome, tessera o quota…",
                    on_input: move |v| query_input.set(v),
                }
                if searching {
                    SkeletonRows { count: 5 }
                } else if candidates.is_empty() {
                    p { class: "muted", "Nessun risultato." }
                }
                ul { class: "picker-list",
                    for row in candidates {
                        li { key: "{row.id}",
                            label { class: "checkbox-row",
                                input {
                                    r#type: "checkbox",
                                    checked: chosen.contains(&row.id),
                                    onchange: move |_| {
                                        let mut ids = selected.write();
                                        if let Some(pos) = ids.iter().position(|id| *id == row.id) {
                                            ids.remove(pos);
                                        } else {
                                            ids.push(row.id);
                                        }
                                    },
                                }
                                span { "{row.display_name}" }
                                span { class: "cell-sub", " Quota {quota_label(row.nr_quota)}" }
                            }
                        }
                    }
                }
                SheetFooter {
                    Button { variant: ButtonVariant::Ghost, onclick: move |_| on_close.call(()), "Annulla" }
                    Button { onclick: handle_add, disabled: n == 0 || saving(),
                        "Aggiungi ({n})"
                    }
                }
            }
        }
    }
}
