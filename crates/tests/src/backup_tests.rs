use base64::Engine;
use pretty_assertions::assert_eq;
use serde_json::json;
use server::export::backup_file;
use server::repo::{backup, quotas};
use shared_types::{backup_filename, BackupDump};

use crate::common::{enroll, fixture, seed_course, seed_person, SeedPerson};

#[tokio::test]
async fn dump_holds_every_table_across_pages() {
    let fx = fixture();
    seed_course(&fx.store, 1, "Salsa", "BALLO");
    for i in 0..5 {
        let id = seed_person(&fx.store, SeedPerson::named(&format!("Socio {i}")).expires_in(i));
        enroll(&fx.store, id, 1);
    }

    let dump = backup::export_all(&fx.store, &fx.token, 2).await.unwrap();
    assert_eq!(dump.people.len(), 5);
    assert_eq!(dump.contacts.len(), 5);
    assert_eq!(dump.memberships.len(), 5);
    assert_eq!(dump.certificates.len(), 5);
    assert_eq!(dump.courses.len(), 1);
    assert_eq!(dump.person_courses.len(), 5);
    assert!(!dump.exported_at.is_empty());
}

#[tokio::test]
async fn backup_file_is_readable_json() {
    let fx = fixture();
    seed_person(&fx.store, SeedPerson::named("Rossi").quota(1));

    let dump = backup::export_all(&fx.store, &fx.token, 500).await.unwrap();
    let at = chrono::NaiveDate::from_ymd_opt(2025, 9, 1)
        .unwrap()
        .and_hms_opt(8, 30, 0)
        .unwrap();
    let file = backup_file(backup_filename(at), &dump).unwrap();

    assert_eq!(file.filename, "topdance_backup_2025-09-01T08-30-00.json");
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(&file.base64)
        .unwrap();
    let parsed: BackupDump = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(parsed, dump);
}

#[tokio::test]
async fn quota_reset_clears_every_number() {
    let fx = fixture();
    seed_person(&fx.store, SeedPerson::named("Uno").quota(1).tessera("T-1"));
    seed_person(&fx.store, SeedPerson::named("Due").quota(2));

    quotas::reset_annual(&fx.store, &fx.token).await.unwrap();

    let people = fx.store.rows("people");
    assert_eq!(people.len(), 2);
    assert!(people.iter().all(|p| p["nr_quota"] == json!(null)));
    assert_eq!(fx.store.rows("memberships")[0]["nr_tessera"], json!("T-1"));
}
