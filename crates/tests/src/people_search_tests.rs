use pretty_assertions::assert_eq;
use server::repo::people;
use shared_types::{CertStatus, PeopleFilter, Ruolo};

use crate::common::{enroll, fixture, seed_course, seed_person, SeedPerson};

fn names(rows: &[shared_types::PersonSearchRow]) -> Vec<String> {
    rows.iter().map(|r| r.display_name.clone()).collect()
}

fn filter(q: &str) -> PeopleFilter {
    PeopleFilter {
        q: q.to_string(),
        ..PeopleFilter::default()
    }
}

#[tokio::test]
async fn numeric_term_matches_quota_name_and_card() {
    let fx = fixture();
    seed_person(&fx.store, SeedPerson::named("Bianchi Luca").quota(43));
    seed_person(&fx.store, SeedPerson::named("Verdi Anna").quota(143).tessera("T-0043"));
    seed_person(&fx.store, SeedPerson::named("Sala 43 Marco").quota(7));
    seed_person(&fx.store, SeedPerson::named("Neri Paolo").quota(430));

    let rows = people::list_paged(&fx.store, &fx.token, &filter("43"), true, 60, 0)
        .await
        .unwrap();
    assert_eq!(names(&rows), vec!["Bianchi Luca", "Sala 43 Marco", "Verdi Anna"]);
}

#[tokio::test]
async fn numeric_search_off_ignores_quota() {
    let fx = fixture();
    seed_person(&fx.store, SeedPerson::named("Bianchi Luca").quota(43));
    seed_person(&fx.store, SeedPerson::named("Verdi Anna").tessera("T-0043"));

    let rows = people::list_paged(&fx.store, &fx.token, &filter("43"), false, 60, 0)
        .await
        .unwrap();
    assert_eq!(names(&rows), vec!["Verdi Anna"]);
}

#[tokio::test]
async fn mixed_term_never_matches_quota() {
    let fx = fixture();
    seed_person(&fx.store, SeedPerson::named("Rossi Maria").quota(4));
    seed_person(&fx.store, SeedPerson::named("Rossi 4 Giulia"));

    let rows = people::list_paged(&fx.store, &fx.token, &filter("rossi 4"), true, 60, 0)
        .await
        .unwrap();
    assert_eq!(names(&rows), vec!["Rossi 4 Giulia"]);
}

#[tokio::test]
async fn status_role_and_course_filters_compose() {
    let fx = fixture();
    seed_course(&fx.store, 1, "Salsa", "BALLO");
    seed_course(&fx.store, 2, "Pilates", "FITNESS");
    let expired = seed_person(&fx.store, SeedPerson::named("Alfa").expires_in(-3));
    let missing = seed_person(&fx.store, SeedPerson::named("Beta"));
    let valid = seed_person(&fx.store, SeedPerson::named("Gamma").expires_in(90));
    let staff = seed_person(
        &fx.store,
        SeedPerson::named("Delta").ruolo("COLLABORATORE").expires_in(-1),
    );
    enroll(&fx.store, expired, 1);
    enroll(&fx.store, missing, 2);
    enroll(&fx.store, valid, 1);
    enroll(&fx.store, staff, 1);

    let by_status = PeopleFilter {
        statuses: vec![CertStatus::Scaduto, CertStatus::Assente],
        ..PeopleFilter::default()
    };
    let rows = people::list_paged(&fx.store, &fx.token, &by_status, true, 60, 0)
        .await
        .unwrap();
    assert_eq!(names(&rows), vec!["Alfa", "Beta", "Delta"]);

    let narrowed = PeopleFilter {
        ruolo: Some(Ruolo::Allievo),
        course_ids: vec![1],
        ..by_status
    };
    let rows = people::list_paged(&fx.store, &fx.token, &narrowed, true, 60, 0)
        .await
        .unwrap();
    assert_eq!(names(&rows), vec!["Alfa"]);
    assert_eq!(
        people::count(&fx.store, &fx.token, &narrowed, true).await.unwrap(),
        1
    );
}

#[tokio::test]
async fn pages_are_contiguous_and_alphabetical() {
    let fx = fixture();
    for name in ["E", "B", "D", "A", "C"] {
        seed_person(&fx.store, SeedPerson::named(name));
    }
    let all = PeopleFilter::default();

    let first = people::list_paged(&fx.store, &fx.token, &all, true, 2, 0).await.unwrap();
    let second = people::list_paged(&fx.store, &fx.token, &all, true, 2, 2).await.unwrap();
    let last = people::list_paged(&fx.store, &fx.token, &all, true, 2, 4).await.unwrap();
    let past_end = people::list_paged(&fx.store, &fx.token, &all, true, 2, 6).await.unwrap();

    assert_eq!(names(&first), vec!["A", "B"]);
    assert_eq!(names(&second), vec!["C", "D"]);
    assert_eq!(names(&last), vec!["E"]);
    assert!(past_end.is_empty());
    assert_eq!(people::count(&fx.store, &fx.token, &all, true).await.unwrap(), 5);
}

#[tokio::test]
async fn tessere_order_by_quota_with_blanks_last() {
    let fx = fixture();
    seed_person(&fx.store, SeedPerson::named("Senza quota"));
    seed_person(&fx.store, SeedPerson::named("Dodici").quota(12));
    seed_person(&fx.store, SeedPerson::named("Tre").quota(3));

    let rows = people::list_by_quota_paged(&fx.store, &fx.token, "", true, 70, 0)
        .await
        .unwrap();
    assert_eq!(names(&rows), vec!["Tre", "Dodici", "Senza quota"]);
}

#[tokio::test]
async fn picker_search_is_capped() {
    let fx = fixture();
    for i in 0..5 {
        seed_person(&fx.store, SeedPerson::named(&format!("Rossi {i}")));
    }
    seed_person(&fx.store, SeedPerson::named("Verdi"));

    let rows = people::search(&fx.store, &fx.token, "rossi", true, 3).await.unwrap();
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|r| r.display_name.starts_with("Rossi")));
}

#[tokio::test]
async fn export_rows_spans_every_page() {
    let fx = fixture();
    for i in 0..7 {
        seed_person(&fx.store, SeedPerson::named(&format!("Socio {i:02}")));
    }

    let rows = people::export_rows(&fx.store, &fx.token, &PeopleFilter::default(), true, 3)
        .await
        .unwrap();
    assert_eq!(rows.len(), 7);
    assert_eq!(rows[0].display_name, "Socio 00");
    assert_eq!(rows[6].display_name, "Socio 06");
}

#[tokio::test]
async fn filtered_export_matches_the_filtered_count() {
    let fx = fixture();
    seed_person(&fx.store, SeedPerson::named("Rossi 4").expires_in(-2));
    seed_person(&fx.store, SeedPerson::named("Verdi").quota(4));
    seed_person(&fx.store, SeedPerson::named("Bianchi").tessera("T-0004").expires_in(-5));
    seed_person(&fx.store, SeedPerson::named("Neri 4").expires_in(90));
    seed_person(&fx.store, SeedPerson::named("Gialli").quota(4).expires_in(30));
    seed_person(&fx.store, SeedPerson::named("Blu").expires_in(-1));
    seed_person(&fx.store, SeedPerson::named("Socio 14"));
    seed_person(&fx.store, SeedPerson::named("Socio 24").expires_in(-30));
    seed_person(&fx.store, SeedPerson::named("Socio 34"));
    seed_person(&fx.store, SeedPerson::named("Socio 44").expires_in(-1));

    let narrowed = PeopleFilter {
        q: "4".to_string(),
        statuses: vec![CertStatus::Scaduto, CertStatus::Assente],
        ..PeopleFilter::default()
    };
    let rows = people::export_rows(&fx.store, &fx.token, &narrowed, true, 2)
        .await
        .unwrap();
    let total = people::count(&fx.store, &fx.token, &narrowed, true).await.unwrap();

    assert_eq!(rows.len() as i64, total);
    assert_eq!(
        names(&rows),
        vec!["Bianchi", "Rossi 4", "Socio 14", "Socio 24", "Socio 34", "Socio 44", "Verdi"]
    );
}

#[tokio::test]
async fn filter_syntax_alone_lists_everyone() {
    let fx = fixture();
    for name in ["Alfa", "Beta", "Gamma"] {
        seed_person(&fx.store, SeedPerson::named(name));
    }

    let everyone = people::list_paged(&fx.store, &fx.token, &PeopleFilter::default(), true, 60, 0)
        .await
        .unwrap();
    for q in ["*", "(", "%"] {
        let rows = people::list_paged(&fx.store, &fx.token, &filter(q), true, 60, 0)
            .await
            .unwrap();
        assert_eq!(names(&rows), names(&everyone), "query {q:?}");
    }
}
