use pretty_assertions::assert_eq;
use serde_json::json;
use server::repo::people;
use shared_types::{AppErrorKind, PersonForm};

use crate::common::{enroll, fixture, rows_of, seed_course, seed_person, SeedPerson};

fn form(name: &str) -> PersonForm {
    PersonForm {
        display_name: name.to_string(),
        nr_quota: "12".to_string(),
        telefono: " 333 1234567 ".to_string(),
        consenso_whatsapp: "true".to_string(),
        nr_tessera: "T-12".to_string(),
        scadenza: "2025-06-30".to_string(),
        ..PersonForm::new()
    }
}

#[tokio::test]
async fn new_person_writes_every_row() {
    let fx = fixture();
    seed_course(&fx.store, 1, "Salsa", "BALLO");
    seed_course(&fx.store, 2, "Pilates", "FITNESS");

    let mut f = form("  Rossi Maria ");
    f.toggle_course(2);
    f.toggle_course(1);
    let save = f.into_save(None).unwrap();
    let id = people::save(&fx.store, &fx.token, &save).await.unwrap();

    let full = people::get_full(&fx.store, &fx.token, id).await.unwrap();
    assert_eq!(full.person.display_name, "Rossi Maria");
    assert_eq!(full.person.nr_quota, Some(12));
    assert_eq!(full.person.ruolo.as_deref(), Some("ALLIEVO"));
    let contact = full.contact.unwrap();
    assert_eq!(contact.telefono.as_deref(), Some("333 1234567"));
    assert_eq!(contact.email, None);
    assert_eq!(contact.consenso_whatsapp, Some(true));
    assert_eq!(full.membership.unwrap().nr_tessera.as_deref(), Some("T-12"));
    assert_eq!(
        full.certificate.unwrap().scadenza.map(|d| d.to_string()).as_deref(),
        Some("2025-06-30")
    );
    assert_eq!(full.course_ids, vec![1, 2]);
}

#[tokio::test]
async fn edit_reconciles_course_links() {
    let fx = fixture();
    for (id, nome) in [(1, "Salsa"), (2, "Bachata"), (3, "Kizomba")] {
        seed_course(&fx.store, id, nome, "BALLO");
    }
    let id = seed_person(&fx.store, SeedPerson::named("Verdi Anna"));
    enroll(&fx.store, id, 1);
    enroll(&fx.store, id, 2);

    let full = people::get_full(&fx.store, &fx.token, id).await.unwrap();
    let mut f = PersonForm::from_full(&full);
    f.toggle_course(1);
    f.toggle_course(3);
    let save = f.into_save(Some(id)).unwrap();
    assert_eq!(people::save(&fx.store, &fx.token, &save).await.unwrap(), id);

    assert_eq!(people::course_ids(&fx.store, &fx.token, id).await.unwrap(), vec![2, 3]);
    assert_eq!(fx.store.rows("people").len(), 1);
}

#[tokio::test]
async fn blank_fields_are_stored_as_null() {
    let fx = fixture();
    let id = seed_person(&fx.store, SeedPerson::named("Neri").quota(5).tessera("T-5"));

    let full = people::get_full(&fx.store, &fx.token, id).await.unwrap();
    let mut f = PersonForm::from_full(&full);
    f.nr_quota = "  ".to_string();
    f.nr_tessera = String::new();
    let save = f.into_save(Some(id)).unwrap();
    people::save(&fx.store, &fx.token, &save).await.unwrap();

    let person = &fx.store.rows("people")[0];
    assert_eq!(person["nr_quota"], json!(null));
    assert_eq!(rows_of(&fx.store, "memberships", id)[0]["nr_tessera"], json!(null));
}

#[tokio::test]
async fn invalid_form_never_reaches_the_backend() {
    let fx = fixture();
    fx.store.reset_calls();

    let err = form("   ").into_save(None).unwrap_err();
    assert_eq!(err.kind, AppErrorKind::ValidationError);
    assert!(err.field_errors.contains_key("display_name"));

    let mut bad_date = form("Bianchi");
    bad_date.scadenza = "fine giugno".to_string();
    let err = bad_date.into_save(None).unwrap_err();
    assert!(err.field_errors.contains_key("scadenza"));

    assert_eq!(fx.store.calls(), 0);
    assert!(fx.store.rows("people").is_empty());
}

#[tokio::test]
async fn delete_cascades_to_dependent_rows() {
    let fx = fixture();
    seed_course(&fx.store, 1, "Salsa", "BALLO");
    let gone = seed_person(&fx.store, SeedPerson::named("Da eliminare").expires_in(10));
    let kept = seed_person(&fx.store, SeedPerson::named("Resta").expires_in(10));
    enroll(&fx.store, gone, 1);
    enroll(&fx.store, kept, 1);

    people::delete(&fx.store, &fx.token, gone).await.unwrap();

    for table in ["contacts", "memberships", "certificates", "person_courses"] {
        assert!(rows_of(&fx.store, table, gone).is_empty(), "{table} still references the person");
        assert_eq!(rows_of(&fx.store, table, kept).len(), 1, "{table} lost an unrelated row");
    }
    let err = people::get_full(&fx.store, &fx.token, gone).await.unwrap_err();
    assert_eq!(err.kind, AppErrorKind::NotFound);
}

#[tokio::test]
async fn expired_session_is_rejected() {
    let fx = fixture();
    let stale = fx.store.issue_session(crate::common::EMAIL, -10).unwrap();

    let err = people::count(&fx.store, &stale.access_token, &Default::default(), true)
        .await
        .unwrap_err();
    assert_eq!(err.kind, AppErrorKind::Unauthorized);
}
