//! In-process stand-in for the hosted backend.
//!
//! Holds the academy tables as JSON rows, evaluates [`Select`] filters with
//! PostgREST semantics, computes the read-only views from the base tables and
//! issues HS256 session tokens for a fixed set of credentials.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use std::sync::{Mutex, MutexGuard};

use chrono::{Local, NaiveDate, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use shared_types::{days_remaining, AppError, AuthUser, CertStatus};
use uuid::Uuid;

use super::query::Nulls;
use super::{Delete, Fetched, Filter, Identity, Order, Resolution, Select, SessionTokens, Store, Upsert};

/// Secret the in-memory backend signs its access tokens with.
pub const MEMORY_JWT_SECRET: &str = "topdance-memory-backend-secret";

const ACCESS_TTL_SECS: i64 = 3600;

const BASE_TABLES: [&str; 6] = [
    "people",
    "contacts",
    "memberships",
    "certificates",
    "courses",
    "person_courses",
];

fn primary_key(table: &str) -> &'static [&'static str] {
    match table {
        "contacts" | "memberships" | "certificates" => &["person_id"],
        "person_courses" => &["person_id", "course_id"],
        _ => &["id"],
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct MemoryClaims {
    sub: String,
    email: String,
    aud: String,
    role: String,
    session_id: String,
    iat: i64,
    exp: i64,
}

#[derive(Debug)]
struct Account {
    id: String,
    password: String,
}

#[derive(Debug)]
struct Data {
    tables: HashMap<String, Vec<Value>>,
    next_course_id: i64,
    today: NaiveDate,
    accounts: HashMap<String, Account>,
    /// Live access tokens and the email they belong to.
    sessions: HashMap<String, String>,
    /// Unused refresh tokens and the email they belong to.
    refresh_tokens: HashMap<String, String>,
}

/// Backend double used by the integration tests.
#[derive(Debug)]
pub struct MemoryBackend {
    data: Mutex<Data>,
    calls: AtomicUsize,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBackend {
    pub fn new() -> Self {
        let tables = BASE_TABLES
            .iter()
            .map(|t| (t.to_string(), Vec::new()))
            .collect();
        Self {
            data: Mutex::new(Data {
                tables,
                next_course_id: 1,
                today: Local::now().date_naive(),
                accounts: HashMap::new(),
                sessions: HashMap::new(),
                refresh_tokens: HashMap::new(),
            }),
            calls: AtomicUsize::new(0),
        }
    }

    /// Register a sign-in credential.
    pub fn with_user(self, email: &str, password: &str) -> Self {
        if let Ok(mut data) = self.data.lock() {
            data.accounts.insert(
                email.to_lowercase(),
                Account {
                    id: Uuid::new_v4().to_string(),
                    password: password.to_string(),
                },
            );
        }
        self
    }

    /// Pin the date the views compute `giorni_rimanenti` against.
    pub fn with_today(self, today: NaiveDate) -> Self {
        if let Ok(mut data) = self.data.lock() {
            data.today = today;
        }
        self
    }

    /// Number of Store calls served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(AtomicOrdering::SeqCst)
    }

    pub fn reset_calls(&self) {
        self.calls.store(0, AtomicOrdering::SeqCst);
    }

    /// Insert a row directly, bypassing auth and the call counter.
    pub fn seed(&self, table: &str, row: Value) {
        if let Ok(mut data) = self.data.lock() {
            let row = data.fill_defaults(table, row);
            data.tables.entry(table.to_string()).or_default().push(row);
        }
    }

    /// Snapshot of a base table.
    pub fn rows(&self, table: &str) -> Vec<Value> {
        self.data
            .lock()
            .ok()
            .and_then(|d| d.tables.get(table).cloned())
            .unwrap_or_default()
    }

    /// Issue a session directly; a negative `ttl_secs` yields an expired token.
    pub fn issue_session(&self, email: &str, ttl_secs: i64) -> Result<SessionTokens, AppError> {
        let mut data = self.lock()?;
        data.issue(email, ttl_secs)
    }

    /// Kill every session of the given access token, as a server-side revoke would.
    pub fn revoke(&self, access_token: &str) {
        if let Ok(mut data) = self.data.lock() {
            data.sessions.remove(access_token);
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Data>, AppError> {
        self.data
            .lock()
            .map_err(|_| AppError::internal("Stato del backend in memoria corrotto"))
    }

    fn count_call(&self) {
        self.calls.fetch_add(1, AtomicOrdering::SeqCst);
    }

    /// Lock the data after checking the bearer token.
    fn authorized(&self, token: &str) -> Result<MutexGuard<'_, Data>, AppError> {
        self.count_call();
        let data = self.lock()?;
        check_token(token)?;
        if !data.sessions.contains_key(token) {
            return Err(AppError::unauthorized("JWT expired"));
        }
        Ok(data)
    }
}

fn check_token(token: &str) -> Result<MemoryClaims, AppError> {
    let mut validation = Validation::default();
    validation.validate_aud = false;
    validation.leeway = 0;
    decode::<MemoryClaims>(
        token,
        &DecodingKey::from_secret(MEMORY_JWT_SECRET.as_bytes()),
        &validation,
    )
    .map(|d| d.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::unauthorized("JWT expired"),
        _ => AppError::unauthorized("invalid JWT"),
    })
}

impl Data {
    fn issue(&mut self, email: &str, ttl_secs: i64) -> Result<SessionTokens, AppError> {
        let email = email.to_lowercase();
        let account = self
            .accounts
            .get(&email)
            .ok_or_else(|| AppError::not_found("User not found"))?;
        let now = Utc::now().timestamp();
        let claims = MemoryClaims {
            sub: account.id.clone(),
            email: email.clone(),
            aud: "authenticated".to_string(),
            role: "authenticated".to_string(),
            session_id: Uuid::new_v4().to_string(),
            iat: now,
            exp: now + ttl_secs,
        };
        let access_token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(MEMORY_JWT_SECRET.as_bytes()),
        )
        .map_err(|e| AppError::internal(e.to_string()))?;
        let refresh_token = Uuid::new_v4().simple().to_string();
        let user = AuthUser {
            id: account.id.clone(),
            email: email.clone(),
        };
        self.sessions.insert(access_token.clone(), email.clone());
        self.refresh_tokens.insert(refresh_token.clone(), email);
        Ok(SessionTokens {
            access_token,
            refresh_token,
            expires_in: ttl_secs,
            user,
        })
    }

    fn table(&self, name: &str) -> Result<&Vec<Value>, AppError> {
        self.tables
            .get(name)
            .ok_or_else(|| AppError::not_found(format!("relation \"public.{name}\" does not exist")))
    }

    fn table_mut(&mut self, name: &str) -> Result<&mut Vec<Value>, AppError> {
        self.tables
            .get_mut(name)
            .ok_or_else(|| AppError::not_found(format!("relation \"public.{name}\" does not exist")))
    }

    fn fill_defaults(&mut self, table: &str, row: Value) -> Value {
        let mut row = match row {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        match table {
            "people" if !row.get("id").is_some_and(|v| !v.is_null()) => {
                row.insert("id".to_string(), json!(Uuid::new_v4()));
            }
            "courses" => match row.get("id").and_then(Value::as_i64) {
                Some(id) => self.next_course_id = self.next_course_id.max(id + 1),
                None => {
                    row.insert("id".to_string(), json!(self.next_course_id));
                    self.next_course_id += 1;
                }
            },
            _ => {}
        }
        Value::Object(row)
    }

    // -- views ------------------------------------------------------------

    fn rows_for(&self, name: &str) -> Result<Vec<Value>, AppError> {
        match name {
            "v_people_search" => Ok(self.people_search()),
            "v_cert_scadenze" => Ok(self.cert_scadenze()),
            "v_courses_counts" => Ok(self.courses_counts()),
            _ => self.table(name).cloned(),
        }
    }

    fn one_to_one(&self, table: &str, person_id: &Value) -> Option<&Value> {
        self.tables
            .get(table)?
            .iter()
            .find(|r| same(r.get("person_id"), Some(person_id)))
    }

    fn course_ids_of(&self, person_id: &Value) -> Vec<i64> {
        let ids: BTreeSet<i64> = self
            .tables
            .get("person_courses")
            .map(|links| {
                links
                    .iter()
                    .filter(|l| same(l.get("person_id"), Some(person_id)))
                    .filter_map(|l| l.get("course_id").and_then(Value::as_i64))
                    .collect()
            })
            .unwrap_or_default();
        ids.into_iter().collect()
    }

    fn certificate_of(&self, person_id: &Value) -> (Option<NaiveDate>, bool) {
        let cert = self.one_to_one("certificates", person_id);
        let scadenza = cert
            .and_then(|c| c.get("scadenza"))
            .and_then(Value::as_str)
            .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok());
        let esente = cert
            .and_then(|c| c.get("esente"))
            .and_then(Value::as_bool)
            .unwrap_or(false);
        (scadenza, esente)
    }

    fn people_search(&self) -> Vec<Value> {
        let people = self.tables.get("people").cloned().unwrap_or_default();
        people
            .iter()
            .map(|p| {
                let id = p.get("id").cloned().unwrap_or(Value::Null);
                let contact = self.one_to_one("contacts", &id);
                let membership = self.one_to_one("memberships", &id);
                let (scadenza, esente) = self.certificate_of(&id);
                let giorni = days_remaining(scadenza, self.today);
                json!({
                    "id": id,
                    "display_name": field(Some(p), "display_name"),
                    "nr_quota": field(Some(p), "nr_quota"),
                    "corso": field(Some(p), "corso"),
                    "ruolo": field(Some(p), "ruolo"),
                    "nr_tessera": field(membership, "nr_tessera"),
                    "telefono": field(contact, "telefono"),
                    "email": field(contact, "email"),
                    "consenso_whatsapp": field(contact, "consenso_whatsapp"),
                    "scadenza": scadenza,
                    "giorni_rimanenti": giorni,
                    "cert_stato": CertStatus::from_days(esente, giorni),
                    "course_ids": self.course_ids_of(&id),
                })
            })
            .collect()
    }

    fn cert_scadenze(&self) -> Vec<Value> {
        let people = self.tables.get("people").cloned().unwrap_or_default();
        let courses = self.tables.get("courses").cloned().unwrap_or_default();
        people
            .iter()
            .map(|p| {
                let id = p.get("id").cloned().unwrap_or(Value::Null);
                let contact = self.one_to_one("contacts", &id);
                let membership = self.one_to_one("memberships", &id);
                let (scadenza, esente) = self.certificate_of(&id);
                let giorni = days_remaining(scadenza, self.today);
                let mut corsi: Vec<(String, i64)> = self
                    .course_ids_of(&id)
                    .into_iter()
                    .filter_map(|cid| {
                        courses
                            .iter()
                            .find(|c| c.get("id").and_then(Value::as_i64) == Some(cid))
                            .map(|c| {
                                let nome = c.get("nome_corso").and_then(Value::as_str).unwrap_or("");
                                (nome.to_string(), cid)
                            })
                    })
                    .collect();
                corsi.sort();
                let corsi: Vec<Value> = corsi
                    .into_iter()
                    .map(|(nome, id)| json!({ "id": id, "nome": nome }))
                    .collect();
                json!({
                    "person_id": id,
                    "display_name": field(Some(p), "display_name"),
                    "ruolo": field(Some(p), "ruolo"),
                    "nr_quota": field(Some(p), "nr_quota"),
                    "nr_tessera": field(membership, "nr_tessera"),
                    "telefono": field(contact, "telefono"),
                    "email": field(contact, "email"),
                    "consenso_whatsapp": field(contact, "consenso_whatsapp"),
                    "scadenza": scadenza,
                    "scadenza_fmt": scadenza.map(|d| d.format("%d/%m/%Y").to_string()),
                    "giorni_rimanenti": giorni,
                    "cert_stato": CertStatus::from_days(esente, giorni),
                    "corsi": corsi,
                })
            })
            .collect()
    }

    fn courses_counts(&self) -> Vec<Value> {
        let links = self.tables.get("person_courses").cloned().unwrap_or_default();
        self.tables
            .get("courses")
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .map(|mut course| {
                let id = course.get("id").cloned();
                let count = links
                    .iter()
                    .filter(|l| same(l.get("course_id"), id.as_ref()))
                    .count();
                if let Value::Object(map) = &mut course {
                    map.insert("participants_count".to_string(), json!(count));
                }
                course
            })
            .collect()
    }

    // -- writes -----------------------------------------------------------

    fn check_references(&self, table: &str, row: &Value) -> Result<(), AppError> {
        let fk_violation = |what: &str| {
            AppError::conflict(format!(
                "insert or update on table \"{table}\" violates foreign key constraint on {what}"
            ))
        };
        if table != "people" && table != "courses" {
            let person = row.get("person_id");
            let exists = self
                .tables
                .get("people")
                .is_some_and(|ps| ps.iter().any(|p| same(p.get("id"), person)));
            if !exists {
                return Err(fk_violation("person_id"));
            }
        }
        if table == "person_courses" {
            let course = row.get("course_id");
            let exists = self
                .tables
                .get("courses")
                .is_some_and(|cs| cs.iter().any(|c| same(c.get("id"), course)));
            if !exists {
                return Err(fk_violation("course_id"));
            }
        }
        if table == "people" {
            let name = row.get("display_name").and_then(Value::as_str).unwrap_or("");
            if name.trim().is_empty() {
                return Err(AppError::bad_request(
                    "null value in column \"display_name\" violates not-null constraint",
                ));
            }
        }
        Ok(())
    }

    fn upsert(&mut self, upsert: &Upsert) -> Result<Vec<Value>, AppError> {
        self.table(&upsert.table)?;
        let keys: Vec<String> = match &upsert.on_conflict {
            Some(cols) => cols.split(',').map(|c| c.trim().to_string()).collect(),
            None => primary_key(&upsert.table).iter().map(|c| c.to_string()).collect(),
        };
        let mut written = Vec::new();
        for row in &upsert.rows {
            let existing = self.table(&upsert.table)?.iter().position(|r| {
                keys.iter()
                    .all(|k| row.get(k).is_some_and(|v| !v.is_null()) && same(r.get(k), row.get(k)))
            });
            match existing {
                Some(_) if upsert.resolution == Resolution::Ignore => {}
                Some(pos) => {
                    let mut merged = self.table(&upsert.table)?[pos].clone();
                    if let (Value::Object(target), Value::Object(source)) = (&mut merged, row) {
                        for (k, v) in source {
                            target.insert(k.clone(), v.clone());
                        }
                    }
                    self.check_references(&upsert.table, &merged)?;
                    self.table_mut(&upsert.table)?[pos] = merged.clone();
                    written.push(merged);
                }
                None => {
                    let row = self.fill_defaults(&upsert.table, row.clone());
                    self.check_references(&upsert.table, &row)?;
                    self.table_mut(&upsert.table)?.push(row.clone());
                    written.push(row);
                }
            }
        }
        Ok(if upsert.returning { written } else { Vec::new() })
    }

    fn delete(&mut self, delete: &Delete) -> Result<(), AppError> {
        if delete.filters.is_empty() {
            return Err(AppError::bad_request("DELETE requires a WHERE clause"));
        }
        let table = self.table_mut(&delete.table)?;
        let (removed, kept): (Vec<Value>, Vec<Value>) = table
            .drain(..)
            .partition(|r| delete.filters.iter().all(|f| matches(r, f)));
        *table = kept;

        let cascade: &[&str] = match delete.table.as_str() {
            "people" => &["contacts", "memberships", "certificates", "person_courses"],
            "courses" => &["person_courses"],
            _ => &[],
        };
        let fk = if delete.table == "people" {
            "person_id"
        } else {
            "course_id"
        };
        let ids: Vec<Value> = removed.iter().filter_map(|r| r.get("id").cloned()).collect();
        for dependent in cascade {
            if let Some(rows) = self.tables.get_mut(*dependent) {
                rows.retain(|r| !ids.iter().any(|id| same(r.get(fk), Some(id))));
            }
        }
        Ok(())
    }
}

fn field(row: Option<&Value>, key: &str) -> Value {
    row.and_then(|r| r.get(key)).cloned().unwrap_or(Value::Null)
}

// ---------------------------------------------------------------------------
// Filter evaluation
// ---------------------------------------------------------------------------

/// Text form of a cell as PostgREST compares it; `None` for SQL NULL.
fn cell_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

fn same(a: Option<&Value>, b: Option<&Value>) -> bool {
    match (cell_text(a), cell_text(b)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

fn compare_text(a: &str, b: &str) -> Ordering {
    match (a.parse::<f64>(), b.parse::<f64>()) {
        (Ok(x), Ok(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => a.to_lowercase().cmp(&b.to_lowercase()),
    }
}

/// `*` matches any run of characters; comparison is case-insensitive.
pub fn ilike(text: &str, pattern: &str) -> bool {
    let text: Vec<char> = text.to_lowercase().chars().collect();
    let pattern: Vec<char> = pattern.to_lowercase().chars().collect();
    let (mut t, mut p) = (0, 0);
    let mut star: Option<(usize, usize)> = None;
    while t < text.len() {
        if p < pattern.len() && pattern[p] != '*' && pattern[p] == text[t] {
            t += 1;
            p += 1;
        } else if p < pattern.len() && pattern[p] == '*' {
            star = Some((p, t));
            p += 1;
        } else if let Some((sp, st)) = star {
            p = sp + 1;
            t = st + 1;
            star = Some((sp, st + 1));
        } else {
            return false;
        }
    }
    pattern[p..].iter().all(|c| *c == '*')
}

fn array_texts(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items.iter().filter_map(|v| cell_text(Some(v))).collect(),
        _ => Vec::new(),
    }
}

fn matches(row: &Value, filter: &Filter) -> bool {
    let cell = row.get(filter.column());
    let text = cell_text(cell);
    let cmp = |v: &str, want: &[Ordering]| {
        text.as_deref()
            .is_some_and(|t| want.contains(&compare_text(t, v)))
    };
    match filter {
        Filter::Eq(_, v) => text.as_deref() == Some(v.as_str()),
        Filter::Neq(_, v) => text.as_deref().is_some_and(|t| t != v),
        Filter::Lt(_, v) => cmp(v, &[Ordering::Less]),
        Filter::Lte(_, v) => cmp(v, &[Ordering::Less, Ordering::Equal]),
        Filter::Gt(_, v) => cmp(v, &[Ordering::Greater]),
        Filter::Gte(_, v) => cmp(v, &[Ordering::Greater, Ordering::Equal]),
        Filter::Ilike(_, pattern) => text.as_deref().is_some_and(|t| ilike(t, pattern)),
        Filter::IsNull(_) => text.is_none(),
        Filter::NotNull(_) => text.is_some(),
        Filter::In(_, values) => text.as_ref().is_some_and(|t| values.contains(t)),
        Filter::Ov(_, values) => array_texts(cell).iter().any(|t| values.contains(t)),
        Filter::Cs(_, values) => {
            let items = array_texts(cell);
            values.iter().all(|v| items.contains(v))
        }
    }
}

fn compare_rows(a: &Value, b: &Value, orders: &[Order]) -> Ordering {
    for order in orders {
        let x = cell_text(a.get(&order.column));
        let y = cell_text(b.get(&order.column));
        // Postgres default: NULLS LAST ascending, NULLS FIRST descending.
        let nulls = order.nulls.unwrap_or(if order.ascending {
            Nulls::Last
        } else {
            Nulls::First
        });
        let ord = match (x, y) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => match nulls {
                Nulls::First => Ordering::Less,
                Nulls::Last => Ordering::Greater,
            },
            (Some(_), None) => match nulls {
                Nulls::First => Ordering::Greater,
                Nulls::Last => Ordering::Less,
            },
            (Some(x), Some(y)) => {
                let ord = compare_text(&x, &y);
                if order.ascending {
                    ord
                } else {
                    ord.reverse()
                }
            }
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

fn project(row: Value, columns: &str) -> Value {
    if columns.trim() == "*" {
        return row;
    }
    let wanted: Vec<&str> = columns.split(',').map(str::trim).collect();
    match row {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(k, _)| wanted.contains(&k.as_str()))
                .collect(),
        ),
        other => other,
    }
}

pub(crate) fn evaluate(rows: Vec<Value>, query: &Select) -> Fetched {
    let mut rows: Vec<Value> = rows
        .into_iter()
        .filter(|r| query.filters.iter().all(|f| matches(r, f)))
        .filter(|r| {
            query
                .or_groups
                .iter()
                .all(|group| group.iter().any(|f| matches(r, f)))
        })
        .collect();
    rows.sort_by(|a, b| compare_rows(a, b, &query.orders));
    let total = (query.count == super::Count::Exact).then_some(rows.len() as i64);
    if query.head {
        return Fetched {
            rows: Vec::new(),
            total,
        };
    }
    let offset = query.offset.unwrap_or(0).max(0) as usize;
    let limit = query.limit.map(|l| l.max(0) as usize).unwrap_or(usize::MAX);
    let rows = rows
        .into_iter()
        .skip(offset)
        .take(limit)
        .map(|r| project(r, &query.columns))
        .collect();
    Fetched { rows, total }
}

// ---------------------------------------------------------------------------
// Trait impls
// ---------------------------------------------------------------------------

impl Store for MemoryBackend {
    async fn select(&self, token: &str, query: &Select) -> Result<Fetched, AppError> {
        let data = self.authorized(token)?;
        let rows = data.rows_for(&query.table)?;
        Ok(evaluate(rows, query))
    }

    async fn upsert(&self, token: &str, upsert: &Upsert) -> Result<Vec<Value>, AppError> {
        let mut data = self.authorized(token)?;
        data.upsert(upsert)
    }

    async fn delete(&self, token: &str, delete: &Delete) -> Result<(), AppError> {
        let mut data = self.authorized(token)?;
        data.delete(delete)
    }

    async fn rpc(&self, token: &str, function: &str, _args: Value) -> Result<Value, AppError> {
        let mut data = self.authorized(token)?;
        match function {
            "reset_annual_quotas" => {
                for person in data.table_mut("people")? {
                    if let Value::Object(map) = person {
                        map.insert("nr_quota".to_string(), Value::Null);
                    }
                }
                Ok(Value::Null)
            }
            other => Err(AppError::not_found(format!(
                "Could not find the function public.{other} in the schema cache"
            ))),
        }
    }
}

impl Identity for MemoryBackend {
    async fn sign_in(&self, email: &str, password: &str) -> Result<SessionTokens, AppError> {
        let mut data = self.lock()?;
        let ok = data
            .accounts
            .get(&email.to_lowercase())
            .is_some_and(|a| a.password == password);
        if !ok {
            return Err(AppError::bad_request("Invalid login credentials"));
        }
        data.issue(email, ACCESS_TTL_SECS)
    }

    async fn refresh(&self, refresh_token: &str) -> Result<SessionTokens, AppError> {
        let mut data = self.lock()?;
        let email = data
            .refresh_tokens
            .remove(refresh_token)
            .ok_or_else(|| AppError::bad_request("Invalid Refresh Token: Refresh Token Not Found"))?;
        data.issue(&email, ACCESS_TTL_SECS)
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), AppError> {
        let mut data = self.lock()?;
        let email = data
            .sessions
            .remove(access_token)
            .ok_or_else(|| AppError::unauthorized("Auth session missing!"))?;
        data.refresh_tokens.retain(|_, e| *e != email);
        Ok(())
    }

    async fn user(&self, access_token: &str) -> Result<AuthUser, AppError> {
        let data = self.lock()?;
        let claims = check_token(access_token)?;
        if !data.sessions.contains_key(access_token) {
            return Err(AppError::unauthorized("Auth session missing!"));
        }
        Ok(AuthUser {
            id: claims.sub,
            email: claims.email,
        })
    }
}
