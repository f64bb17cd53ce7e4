use pretty_assertions::assert_eq;
use server::repo::courses;
use shared_types::{filter_courses, AppErrorKind, CourseForm, TipoCorso};
use uuid::Uuid;

use crate::common::{enroll, fixture, seed_course, seed_person, SeedPerson};

#[tokio::test]
async fn list_carries_participant_counts() {
    let fx = fixture();
    seed_course(&fx.store, 1, "Salsa", "BALLO");
    seed_course(&fx.store, 2, "Boxe", "ARTI_MARZIALI");
    let a = seed_person(&fx.store, SeedPerson::named("A"));
    let b = seed_person(&fx.store, SeedPerson::named("B"));
    enroll(&fx.store, a, 1);
    enroll(&fx.store, b, 1);

    let list = courses::list_with_counts(&fx.store, &fx.token).await.unwrap();
    let summary: Vec<(String, i64)> = list
        .iter()
        .map(|c| (c.course.nome_corso.clone(), c.participants_count))
        .collect();
    assert_eq!(summary, vec![("Boxe".to_string(), 0), ("Salsa".to_string(), 2)]);
    assert_eq!(list[1].participants_label(), "2 partecipanti");

    let fighting = filter_courses(&list, Some(TipoCorso::ArtiMarziali), "");
    assert_eq!(fighting.len(), 1);
    assert!(filter_courses(&list, None, "sal").iter().all(|c| c.course.id == 1));
}

#[tokio::test]
async fn participants_are_read_in_two_steps() {
    let fx = fixture();
    seed_course(&fx.store, 1, "Salsa", "BALLO");
    let zeta = seed_person(&fx.store, SeedPerson::named("Zeta"));
    let alfa = seed_person(&fx.store, SeedPerson::named("Alfa"));
    seed_person(&fx.store, SeedPerson::named("Non iscritto"));
    enroll(&fx.store, zeta, 1);
    enroll(&fx.store, alfa, 1);
    fx.store.reset_calls();

    let people = courses::participants(&fx.store, &fx.token, 1).await.unwrap();
    let names: Vec<_> = people.iter().map(|p| p.display_name.as_str()).collect();
    assert_eq!(names, vec!["Alfa", "Zeta"]);
    assert_eq!(fx.store.calls(), 2);
}

#[tokio::test]
async fn empty_course_needs_a_single_read() {
    let fx = fixture();
    seed_course(&fx.store, 1, "Salsa", "BALLO");
    fx.store.reset_calls();

    assert!(courses::participants(&fx.store, &fx.token, 1).await.unwrap().is_empty());
    assert_eq!(fx.store.calls(), 1);
}

#[tokio::test]
async fn adding_existing_members_is_harmless() {
    let fx = fixture();
    seed_course(&fx.store, 1, "Salsa", "BALLO");
    let a = seed_person(&fx.store, SeedPerson::named("A"));
    let b = seed_person(&fx.store, SeedPerson::named("B"));
    enroll(&fx.store, a, 1);

    let added = courses::add_people(&fx.store, &fx.token, 1, &[a, b]).await.unwrap();
    assert_eq!(added, 2);
    assert_eq!(courses::participants_count(&fx.store, &fx.token, 1).await.unwrap(), 2);

    assert_eq!(courses::add_people(&fx.store, &fx.token, 1, &[]).await.unwrap(), 0);
}

#[tokio::test]
async fn enrolling_an_unknown_person_is_a_conflict() {
    let fx = fixture();
    seed_course(&fx.store, 1, "Salsa", "BALLO");

    let err = courses::add_people(&fx.store, &fx.token, 1, &[Uuid::new_v4()])
        .await
        .unwrap_err();
    assert_eq!(err.kind, AppErrorKind::Conflict);
}

#[tokio::test]
async fn remove_updates_the_count() {
    let fx = fixture();
    seed_course(&fx.store, 1, "Salsa", "BALLO");
    seed_course(&fx.store, 2, "Bachata", "BALLO");
    let a = seed_person(&fx.store, SeedPerson::named("A"));
    enroll(&fx.store, a, 1);
    enroll(&fx.store, a, 2);

    courses::remove_person(&fx.store, &fx.token, 1, a).await.unwrap();

    assert_eq!(courses::participants_count(&fx.store, &fx.token, 1).await.unwrap(), 0);
    assert_eq!(courses::participants_count(&fx.store, &fx.token, 2).await.unwrap(), 1);
}

#[tokio::test]
async fn save_creates_then_updates() {
    let fx = fixture();
    seed_course(&fx.store, 4, "Salsa", "BALLO");

    let form = CourseForm {
        nome_corso: " Yoga ".to_string(),
        tipo_corso: "FITNESS".to_string(),
        istruttori: "Marta".to_string(),
        ..CourseForm::default()
    };
    let id = courses::save(&fx.store, &fx.token, &form.into_save(None).unwrap())
        .await
        .unwrap();
    assert_eq!(id, 5);

    let list = courses::list_with_counts(&fx.store, &fx.token).await.unwrap();
    let yoga = list.iter().find(|c| c.course.id == id).unwrap();
    assert_eq!(yoga.course.nome_corso, "Yoga");
    assert_eq!(yoga.course.tipo_corso, Some(TipoCorso::Fitness));
    assert_eq!(yoga.course.descrizione, None);

    let mut edit = CourseForm::from_course(&yoga.course);
    edit.attivo = false;
    let same = courses::save(&fx.store, &fx.token, &edit.into_save(Some(id)).unwrap())
        .await
        .unwrap();
    assert_eq!(same, id);
    assert_eq!(fx.store.rows("courses").len(), 2);
}

#[test]
fn blank_course_name_is_rejected_locally() {
    let err = CourseForm::default().into_save(None).unwrap_err();
    assert_eq!(err.kind, AppErrorKind::ValidationError);
    assert!(err.field_errors.contains_key("nome_corso"));
}

#[tokio::test]
async fn delete_drops_enrolments() {
    let fx = fixture();
    seed_course(&fx.store, 1, "Salsa", "BALLO");
    seed_course(&fx.store, 2, "Bachata", "BALLO");
    let a = seed_person(&fx.store, SeedPerson::named("A"));
    enroll(&fx.store, a, 1);
    enroll(&fx.store, a, 2);

    courses::delete(&fx.store, &fx.token, 1).await.unwrap();

    let links = fx.store.rows("person_courses");
    assert_eq!(links.len(), 1);
    assert_eq!(links[0]["course_id"], serde_json::json!(2));
    assert_eq!(fx.store.rows("people").len(), 1);
}
