use serde_json::Value;
use shared_types::{AppError, BackupDump};

use super::paging::fetch_all_paged;
use crate::gateway::{Order, Select, Store};

async fn dump_table<S: Store>(
    store: &S,
    token: &str,
    table: &str,
    order: &[&str],
    page_size: i64,
) -> Result<Vec<Value>, AppError> {
    fetch_all_paged(page_size, move |limit, offset| {
        let select = order
            .iter()
            .fold(Select::from(table), |s, col| s.order(Order::asc(col)))
            .range(limit, offset);
        async move { store.select(token, &select).await.map(|f| f.rows) }
    })
    .await
}

/// Every row of every academy table, raw.
pub async fn export_all<S: Store>(store: &S, token: &str, page_size: i64) -> Result<BackupDump, AppError> {
    let (people, contacts, memberships, certificates, courses, person_courses) = tokio::try_join!(
        dump_table(store, token, "people", &["id"], page_size),
        dump_table(store, token, "contacts", &["person_id"], page_size),
        dump_table(store, token, "memberships", &["person_id"], page_size),
        dump_table(store, token, "certificates", &["person_id"], page_size),
        dump_table(store, token, "courses", &["id"], page_size),
        dump_table(store, token, "person_courses", &["person_id", "course_id"], page_size),
    )?;
    Ok(BackupDump {
        exported_at: chrono::Utc::now().to_rfc3339(),
        people,
        contacts,
        memberships,
        certificates,
        courses,
        person_courses,
    })
}
