use dioxus::prelude::*;
use shared_types::{ExportFile, PeopleFilter, PersonFull, PersonSave, PersonSearchRow};
use uuid::Uuid;

#[cfg(feature = "server")]
use crate::error_convert::ValidateRequest;

#[cfg(feature = "server")]
use super::auth::*;

/// One page of the people list.
#[cfg_attr(feature = "server", tracing::instrument)]
#[server]
pub async fn list_people(
    filter: PeopleFilter,
    limit: Option<i64>,
    offset: Option<i64>,
) -> Result<Vec<PersonSearchRow>, ServerFnError> {
    use crate::repo::people;
    use shared_types::normalize_pagination;

    let session = require_session()?;
    let page = normalize_pagination(limit, offset, crate::config::paging().people_page);
    people::list_paged(
        store()?,
        &session.access_token,
        &filter,
        numeric_search(),
        page.limit,
        page.offset,
    )
    .await
    .map_err(fail)
}

/// How many people match the filter; the empty filter gives the total.
#[cfg_attr(feature = "server", tracing::instrument)]
#[server]
pub async fn count_people(filter: PeopleFilter) -> Result<i64, ServerFnError> {
    let session = require_session()?;
    crate::repo::people::count(store()?, &session.access_token, &filter, numeric_search())
        .await
        .map_err(fail)
}

/// Picker search over every person.
#[cfg_attr(feature = "server", tracing::instrument)]
#[server]
pub async fn search_people(q: String) -> Result<Vec<PersonSearchRow>, ServerFnError> {
    let session = require_session()?;
    let limit = crate::config::paging().picker_limit;
    crate::repo::people::search(store()?, &session.access_token, &q, numeric_search(), limit)
        .await
        .map_err(fail)
}

/// One page of the membership-card list, by quota number.
#[cfg_attr(feature = "server", tracing::instrument)]
#[server]
pub async fn list_tessere(
    q: String,
    limit: Option<i64>,
    offset: Option<i64>,
) -> Result<Vec<PersonSearchRow>, ServerFnError> {
    use shared_types::normalize_pagination;

    let session = require_session()?;
    let page = normalize_pagination(limit, offset, crate::config::paging().tessere_page);
    crate::repo::people::list_by_quota_paged(
        store()?,
        &session.access_token,
        &q,
        numeric_search(),
        page.limit,
        page.offset,
    )
    .await
    .map_err(fail)
}

#[cfg_attr(feature = "server", tracing::instrument)]
#[server]
pub async fn get_person_full(id: Uuid) -> Result<PersonFull, ServerFnError> {
    let session = require_session()?;
    crate::repo::people::get_full(store()?, &session.access_token, id)
        .await
        .map_err(fail)
}

/// Create or update a person with contact, membership, certificate and courses.
#[cfg_attr(feature = "server", tracing::instrument(skip(save)))]
#[server]
pub async fn save_person(save: PersonSave) -> Result<Uuid, ServerFnError> {
    let session = require_session()?;
    save.validate_request().map_err(fail)?;

    let id = crate::repo::people::save(store()?, &session.access_token, &save)
        .await
        .map_err(fail)?;
    tracing::info!(person = %id, created = save.person.id.is_none(), "person saved");
    Ok(id)
}

#[cfg_attr(feature = "server", tracing::instrument)]
#[server]
pub async fn delete_person(id: Uuid) -> Result<(), ServerFnError> {
    let session = require_session()?;
    crate::repo::people::delete(store()?, &session.access_token, id)
        .await
        .map_err(fail)?;
    tracing::info!(person = %id, "person deleted");
    Ok(())
}

/// Every person matching the filter as xlsx, course ids resolved to names.
#[cfg_attr(feature = "server", tracing::instrument)]
#[server]
pub async fn export_people_xlsx(filter: PeopleFilter) -> Result<ExportFile, ServerFnError> {
    use crate::repo::{courses, people};
    use shared_types::{people_filename, people_sheet};
    use std::collections::HashMap;

    let session = require_session()?;
    let store = store()?;
    let token = session.access_token.as_str();
    let page_size = crate::config::paging().export_page;

    let (rows, course_list) = tokio::try_join!(
        people::export_rows(store, token, &filter, numeric_search(), page_size),
        courses::list_with_counts(store, token),
    )
    .map_err(fail)?;
    let names: HashMap<i64, String> = course_list
        .into_iter()
        .map(|c| (c.course.id, c.course.nome_corso))
        .collect();

    let sheet = people_sheet(&rows, &names);
    crate::export::xlsx_file(people_filename(today()), &sheet).map_err(fail)
}

/// Raw dump of every academy table as JSON.
#[cfg_attr(feature = "server", tracing::instrument)]
#[server]
pub async fn export_backup_json() -> Result<ExportFile, ServerFnError> {
    use crate::error_convert::AppErrorExt;
    use shared_types::{backup_filename, AppError};

    let session = require_session()?;
    if !crate::config::feature_flags().backup_export {
        return Err(AppError::forbidden("Backup non abilitato").into_server_fn_error());
    }
    let page_size = crate::config::paging().export_page;
    let dump = crate::repo::backup::export_all(store()?, &session.access_token, page_size)
        .await
        .map_err(fail)?;
    let filename = backup_filename(chrono::Local::now().naive_local());
    crate::export::backup_file(filename, &dump).map_err(fail)
}
