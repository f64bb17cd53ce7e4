use serde_json::Value;
use shared_types::{
    AppError, Certificate, Contact, CourseLinkDiff, Membership, PeopleFilter, Person, PersonFull,
    PersonSave, PersonSearchRow, SearchTerm,
};
use uuid::Uuid;

use super::paging::fetch_all_paged;
use super::search_group;
use crate::gateway::{decode_rows, Delete, Filter, Order, Select, Store, Upsert};

pub const SEARCH_VIEW: &str = "v_people_search";

fn to_json<T: serde::Serialize>(value: &T) -> Result<Value, AppError> {
    serde_json::to_value(value).map_err(|e| AppError::internal(e.to_string()))
}

/// The people view narrowed by every active filter, unordered and unpaged.
pub fn filtered(filter: &PeopleFilter, numeric: bool) -> Select {
    let mut select = Select::from(SEARCH_VIEW);
    if let Some(term) = filter.term() {
        select = select.or(search_group(&term, numeric));
    }
    if !filter.statuses.is_empty() {
        select = select.filter(Filter::is_in(
            "cert_stato",
            filter.statuses.iter().map(|s| s.as_db_str()),
        ));
    }
    if let Some(ruolo) = filter.ruolo {
        select = select.filter(Filter::eq("ruolo", ruolo.as_db_str()));
    }
    if !filter.course_ids.is_empty() {
        select = select.filter(Filter::overlaps("course_ids", filter.course_ids.iter()));
    }
    select
}

/// One page of the people list, alphabetical.
pub async fn list_paged<S: Store>(
    store: &S,
    token: &str,
    filter: &PeopleFilter,
    numeric: bool,
    limit: i64,
    offset: i64,
) -> Result<Vec<PersonSearchRow>, AppError> {
    let select = filtered(filter, numeric)
        .order(Order::asc("display_name"))
        .order(Order::asc("id"))
        .range(limit, offset);
    store.select(token, &select).await?.decode()
}

/// Exact number of people matching the filter.
pub async fn count<S: Store>(
    store: &S,
    token: &str,
    filter: &PeopleFilter,
    numeric: bool,
) -> Result<i64, AppError> {
    let select = filtered(filter, numeric).columns("id").head();
    Ok(store.select(token, &select).await?.total.unwrap_or(0))
}

/// Picker search: name or card contains `q`, at most `limit` rows.
pub async fn search<S: Store>(
    store: &S,
    token: &str,
    q: &str,
    numeric: bool,
    limit: i64,
) -> Result<Vec<PersonSearchRow>, AppError> {
    let filter = PeopleFilter {
        q: q.to_string(),
        ..PeopleFilter::default()
    };
    list_paged(store, token, &filter, numeric, limit, 0).await
}

/// One page of the membership-card list, ordered by quota number.
pub async fn list_by_quota_paged<S: Store>(
    store: &S,
    token: &str,
    q: &str,
    numeric: bool,
    limit: i64,
    offset: i64,
) -> Result<Vec<PersonSearchRow>, AppError> {
    let mut select = Select::from(SEARCH_VIEW);
    if let Some(term) = SearchTerm::parse(q) {
        select = select.or(search_group(&term, numeric));
    }
    let select = select
        .order(Order::asc("nr_quota").nulls_last())
        .order(Order::asc("display_name"))
        .range(limit, offset);
    store.select(token, &select).await?.decode()
}

fn by_person(table: &str, id: Uuid) -> Select {
    Select::from(table).filter(Filter::eq("person_id", id)).limit(1)
}

async fn first<S: Store, T: serde::de::DeserializeOwned>(
    store: &S,
    token: &str,
    select: Select,
) -> Result<Option<T>, AppError> {
    let rows = store.select(token, &select).await?.rows;
    Ok(decode_rows(rows)?.into_iter().next())
}

/// Current course ids of a person, ascending.
pub async fn course_ids<S: Store>(store: &S, token: &str, id: Uuid) -> Result<Vec<i64>, AppError> {
    let select = Select::from("person_courses")
        .columns("course_id")
        .filter(Filter::eq("person_id", id))
        .order(Order::asc("course_id"));
    let rows = store.select(token, &select).await?.rows;
    Ok(rows
        .iter()
        .filter_map(|r| r.get("course_id").and_then(Value::as_i64))
        .collect())
}

/// Person plus contact, membership, certificate and course ids, read in parallel.
pub async fn get_full<S: Store>(store: &S, token: &str, id: Uuid) -> Result<PersonFull, AppError> {
    let person_q = Select::from("people").filter(Filter::eq("id", id)).limit(1);
    let (person, contact, membership, certificate, course_ids) = tokio::try_join!(
        first::<S, Person>(store, token, person_q),
        first::<S, Contact>(store, token, by_person("contacts", id)),
        first::<S, Membership>(store, token, by_person("memberships", id)),
        first::<S, Certificate>(store, token, by_person("certificates", id)),
        course_ids(store, token, id),
    )?;
    let person = person.ok_or_else(|| AppError::not_found("Socio non trovato"))?;
    Ok(PersonFull {
        person,
        contact,
        membership,
        certificate,
        course_ids,
    })
}

/// Write a person and everything hanging off it; returns the person id.
///
/// The person row goes first so a new person gets its id, then the three 1:1
/// rows in parallel, then the course links are reconciled. A failure midway
/// leaves the earlier writes in place.
pub async fn save<S: Store>(store: &S, token: &str, save: &PersonSave) -> Result<Uuid, AppError> {
    let upsert = Upsert::into_table("people")
        .on_conflict("id")
        .row(to_json(&save.person)?)
        .returning();
    let written = store.upsert(token, &upsert).await?;
    let id = match save.person.id {
        Some(id) => id,
        None => written
            .first()
            .and_then(|r| r.get("id"))
            .and_then(Value::as_str)
            .and_then(|s| Uuid::parse_str(s).ok())
            .ok_or_else(|| AppError::internal("Il backend non ha restituito l'id del socio"))?,
    };

    let (contact, membership, certificate) = save.for_person(id);
    let contact = Upsert::into_table("contacts")
        .on_conflict("person_id")
        .row(to_json(&contact)?);
    let membership = Upsert::into_table("memberships")
        .on_conflict("person_id")
        .row(to_json(&membership)?);
    let certificate = Upsert::into_table("certificates")
        .on_conflict("person_id")
        .row(to_json(&certificate)?);
    tokio::try_join!(
        store.upsert(token, &contact),
        store.upsert(token, &membership),
        store.upsert(token, &certificate),
    )?;

    let current = course_ids(store, token, id).await?;
    sync_courses(store, token, id, &CourseLinkDiff::between(&current, &save.course_ids)).await?;
    Ok(id)
}

async fn sync_courses<S: Store>(
    store: &S,
    token: &str,
    id: Uuid,
    diff: &CourseLinkDiff,
) -> Result<(), AppError> {
    if !diff.add.is_empty() {
        let links = Upsert::into_table("person_courses")
            .on_conflict("person_id,course_id")
            .ignore_duplicates()
            .rows(
                diff.add
                    .iter()
                    .map(|course_id| serde_json::json!({ "person_id": id, "course_id": course_id })),
            );
        store.upsert(token, &links).await?;
    }
    if !diff.remove.is_empty() {
        let unlink = Delete::from("person_courses")
            .filter(Filter::eq("person_id", id))
            .filter(Filter::is_in("course_id", diff.remove.iter()));
        store.delete(token, &unlink).await?;
    }
    Ok(())
}

/// Delete a person; the backend cascades to the dependent rows.
pub async fn delete<S: Store>(store: &S, token: &str, id: Uuid) -> Result<(), AppError> {
    store
        .delete(token, &Delete::from("people").filter(Filter::eq("id", id)))
        .await
}

/// Every person matching the filter, across pages.
pub async fn export_rows<S: Store>(
    store: &S,
    token: &str,
    filter: &PeopleFilter,
    numeric: bool,
    page_size: i64,
) -> Result<Vec<PersonSearchRow>, AppError> {
    fetch_all_paged(page_size, move |limit, offset| {
        list_paged(store, token, filter, numeric, limit, offset)
    })
    .await
}
