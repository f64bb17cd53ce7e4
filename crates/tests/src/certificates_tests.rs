use pretty_assertions::assert_eq;
use server::repo::certificates;
use shared_types::{CertQuery, CertRow, CertSortKey, KpiTally, SortState};

use crate::common::{enroll, fixture, seed_course, seed_person, SeedPerson};

fn names(rows: &[CertRow]) -> Vec<&str> {
    rows.iter().map(|r| r.display_name.as_str()).collect()
}

fn seed_roster(fx: &crate::common::Fixture) {
    seed_person(&fx.store, SeedPerson::named("Alfa").expires_in(40));
    seed_person(&fx.store, SeedPerson::named("Beta").expires_in(-5));
    seed_person(&fx.store, SeedPerson::named("Gamma"));
    seed_person(&fx.store, SeedPerson::named("Delta").expires_in(3).quota(43));
    seed_person(&fx.store, SeedPerson::named("Epsilon").exempt());
}

#[tokio::test]
async fn dashboard_rows_carry_days_and_courses() {
    let fx = fixture();
    seed_course(&fx.store, 1, "Zumba", "FITNESS");
    seed_course(&fx.store, 2, "Bachata", "BALLO");
    let id = seed_person(&fx.store, SeedPerson::named("Rossi").expires_in(7));
    enroll(&fx.store, id, 1);
    enroll(&fx.store, id, 2);

    let rows = certificates::dashboard_rows(&fx.store, &fx.token, 600).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].giorni_rimanenti, Some(7));
    assert_eq!(rows[0].scadenza_fmt.as_deref(), Some("17/01/2025"));
    assert_eq!(rows[0].corsi_joined(), "Bachata, Zumba");
}

#[tokio::test]
async fn dashboard_rows_respect_the_cap() {
    let fx = fixture();
    for i in 0..5 {
        seed_person(&fx.store, SeedPerson::named(&format!("Socio {i}")));
    }
    let rows = certificates::dashboard_rows(&fx.store, &fx.token, 3).await.unwrap();
    assert_eq!(names(&rows), vec!["Socio 0", "Socio 1", "Socio 2"]);
}

#[tokio::test]
async fn kpi_tally_over_loaded_rows() {
    let fx = fixture();
    seed_roster(&fx);
    let rows = certificates::dashboard_rows(&fx.store, &fx.token, 600).await.unwrap();
    let tally = KpiTally::from_rows(&rows);
    // Exempt people have no expiry and count as missing on the dashboard.
    assert_eq!(tally.missing, 2);
    assert_eq!(tally.expired, 1);
    assert_eq!(tally.due7, 1);
}

#[tokio::test]
async fn sort_by_days_puts_blanks_last() {
    let fx = fixture();
    seed_roster(&fx);
    // Days remaining, ascending, is the initial sort.
    let query = CertQuery::default();
    assert_eq!(query.sort.key, CertSortKey::GiorniRimanenti);
    let rows = certificates::list_paged(&fx.store, &fx.token, &query, true, 70, 0)
        .await
        .unwrap();
    assert_eq!(names(&rows), vec!["Beta", "Delta", "Alfa", "Epsilon", "Gamma"]);

    let query = CertQuery {
        sort: query.sort.toggle(CertSortKey::GiorniRimanenti),
        ..query
    };
    let rows = certificates::list_paged(&fx.store, &fx.token, &query, true, 70, 0)
        .await
        .unwrap();
    assert_eq!(names(&rows), vec!["Alfa", "Delta", "Beta", "Epsilon", "Gamma"]);
}

#[tokio::test]
async fn only_expired_and_search_narrow_the_list() {
    let fx = fixture();
    seed_roster(&fx);

    let expired = CertQuery {
        only_expired: true,
        ..CertQuery::default()
    };
    let rows = certificates::list_paged(&fx.store, &fx.token, &expired, true, 70, 0)
        .await
        .unwrap();
    assert_eq!(names(&rows), vec!["Beta"]);

    let by_quota = CertQuery {
        q: "43".to_string(),
        ..CertQuery::default()
    };
    let rows = certificates::list_paged(&fx.store, &fx.token, &by_quota, true, 70, 0)
        .await
        .unwrap();
    assert_eq!(names(&rows), vec!["Delta"]);
}

#[tokio::test]
async fn export_keeps_list_order_across_pages() {
    let fx = fixture();
    for i in 0..9 {
        seed_person(&fx.store, SeedPerson::named(&format!("Socio {i}")).expires_in(i));
    }
    let query = CertQuery {
        sort: SortState {
            key: CertSortKey::Scadenza,
            ascending: false,
        },
        ..CertQuery::default()
    };

    let all = certificates::export_rows(&fx.store, &fx.token, &query, true, 4).await.unwrap();
    let listed = certificates::list_paged(&fx.store, &fx.token, &query, true, 70, 0)
        .await
        .unwrap();
    assert_eq!(all.len(), 9);
    assert_eq!(names(&all), names(&listed));
    assert_eq!(all[0].display_name, "Socio 8");
}
