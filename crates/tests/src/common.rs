use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::NaiveDate;
use serde_json::{json, Value};
use server::backend::{install_backend, Backend};
use server::gateway::{MemoryBackend, SessionTokens};
use tower::ServiceExt;
use uuid::Uuid;

pub const EMAIL: &str = "segreteria@topdance.it";
pub const PASSWORD: &str = "passo-a-due";

/// The date every view computes `giorni_rimanenti` against.
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 10).expect("valid date")
}

/// `today()` shifted by `days`, as the `YYYY-MM-DD` string the tables store.
pub fn day(days: i64) -> String {
    (today() + chrono::Duration::days(days))
        .format("%Y-%m-%d")
        .to_string()
}

/// A fresh in-memory backend plus a live session on it.
///
/// Each test owns its backend, so tests never see each other's rows.
pub struct Fixture {
    pub store: MemoryBackend,
    pub token: String,
}

pub fn fixture() -> Fixture {
    let store = MemoryBackend::new()
        .with_user(EMAIL, PASSWORD)
        .with_today(today());
    let token = store
        .issue_session(EMAIL, 3600)
        .expect("Failed to issue session")
        .access_token;
    Fixture { store, token }
}

/// Shape of a seeded person; everything but the name is optional.
#[derive(Debug, Clone, Default)]
pub struct SeedPerson<'a> {
    pub name: &'a str,
    pub quota: Option<i64>,
    pub ruolo: Option<&'a str>,
    pub tessera: Option<&'a str>,
    pub telefono: Option<&'a str>,
    pub scadenza: Option<String>,
    pub esente: bool,
}

impl<'a> SeedPerson<'a> {
    pub fn named(name: &'a str) -> Self {
        Self {
            name,
            ruolo: Some("ALLIEVO"),
            ..Self::default()
        }
    }

    pub fn quota(mut self, quota: i64) -> Self {
        self.quota = Some(quota);
        self
    }

    pub fn tessera(mut self, tessera: &'a str) -> Self {
        self.tessera = Some(tessera);
        self
    }

    pub fn ruolo(mut self, ruolo: &'a str) -> Self {
        self.ruolo = Some(ruolo);
        self
    }

    /// Certificate expiring `days` from `today()`; negative is expired.
    pub fn expires_in(mut self, days: i64) -> Self {
        self.scadenza = Some(day(days));
        self
    }

    pub fn exempt(mut self) -> Self {
        self.esente = true;
        self
    }
}

/// Insert a person with its contact, membership and certificate rows.
pub fn seed_person(store: &MemoryBackend, person: SeedPerson<'_>) -> Uuid {
    let id = Uuid::new_v4();
    store.seed(
        "people",
        json!({
            "id": id,
            "display_name": person.name,
            "nr_quota": person.quota,
            "ruolo": person.ruolo,
            "corso": null,
        }),
    );
    store.seed(
        "contacts",
        json!({
            "person_id": id,
            "telefono": person.telefono,
            "email": null,
            "codice_fiscale": null,
            "consenso_whatsapp": null,
        }),
    );
    store.seed(
        "memberships",
        json!({
            "person_id": id,
            "nr_tessera": person.tessera,
            "note": null,
            "safeguarding": null,
        }),
    );
    if person.scadenza.is_some() || person.esente {
        store.seed(
            "certificates",
            json!({
                "person_id": id,
                "scadenza": person.scadenza,
                "fonte": null,
                "esente": person.esente,
            }),
        );
    }
    id
}

pub fn seed_course(store: &MemoryBackend, id: i64, nome: &str, tipo: &str) {
    store.seed(
        "courses",
        json!({
            "id": id,
            "nome_corso": nome,
            "tipo_corso": tipo,
            "descrizione": null,
            "istruttori": null,
            "attivo": true,
        }),
    );
}

pub fn enroll(store: &MemoryBackend, person_id: Uuid, course_id: i64) {
    store.seed(
        "person_courses",
        json!({ "person_id": person_id, "course_id": course_id }),
    );
}

/// Rows of `table` whose `person_id` is `id`.
pub fn rows_of(store: &MemoryBackend, table: &str, id: Uuid) -> Vec<Value> {
    let id = json!(id);
    store
        .rows(table)
        .into_iter()
        .filter(|r| r.get("person_id") == Some(&id))
        .collect()
}

/// The process-wide backend the middleware and server functions resolve.
///
/// Installed once per test binary; only tests that go through the global
/// lookup use it.
pub fn shared_backend() -> &'static MemoryBackend {
    let backend = install_backend(Backend::Memory(
        MemoryBackend::new().with_user(EMAIL, PASSWORD),
    ));
    match backend {
        Backend::Memory(store) => store,
        Backend::Supabase(_) => panic!("a hosted backend is installed in the test process"),
    }
}

pub fn shared_session() -> SessionTokens {
    shared_backend()
        .issue_session(EMAIL, 3600)
        .expect("Failed to issue session")
}

/// GET a route with optional extra headers and return status plus body text.
pub async fn get(app: &Router, uri: &str, headers: &[(&str, &str)]) -> (StatusCode, String) {
    let mut builder = Request::builder().method("GET").uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    let req = builder.body(Body::empty()).expect("Failed to build request");
    send(app, req).await
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, String) {
    let response = app
        .clone()
        .oneshot(req)
        .await
        .expect("Failed to send request");

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    (status, String::from_utf8_lossy(&body_bytes).to_string())
}

/// Response headers of a GET, for cookie assertions.
pub async fn get_headers(
    app: &Router,
    uri: &str,
    headers: &[(&str, &str)],
) -> (StatusCode, Vec<String>) {
    let mut builder = Request::builder().method("GET").uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    let req = builder.body(Body::empty()).expect("Failed to build request");
    let response = app
        .clone()
        .oneshot(req)
        .await
        .expect("Failed to send request");
    let cookies = response
        .headers()
        .get_all(axum::http::header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok().map(str::to_string))
        .collect();
    (response.status(), cookies)
}
