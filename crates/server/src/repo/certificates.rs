use shared_types::{AppError, CertQuery, CertRow, CertSortKey, SearchTerm};

use super::paging::fetch_all_paged;
use super::search_group;
use crate::gateway::{Filter, Order, Select, Store};

pub const EXPIRY_VIEW: &str = "v_cert_scadenze";

/// Every row the dashboard works on, alphabetical, capped at `limit`.
pub async fn dashboard_rows<S: Store>(store: &S, token: &str, limit: i64) -> Result<Vec<CertRow>, AppError> {
    let select = Select::from(EXPIRY_VIEW)
        .order(Order::asc("display_name"))
        .limit(limit);
    store.select(token, &select).await?.decode()
}

/// The certificates list for a query, sorted but unpaged.
pub fn sorted(query: &CertQuery, numeric: bool) -> Select {
    let mut select = Select::from(EXPIRY_VIEW);
    if let Some(term) = SearchTerm::parse(&query.q) {
        select = select.or(search_group(&term, numeric));
    }
    if query.only_expired {
        select = select.filter(Filter::lt("giorni_rimanenti", 0));
    }
    select = select.order(Order::by(query.sort.key.column(), query.sort.ascending).nulls_last());
    if query.sort.key != CertSortKey::DisplayName {
        select = select.order(Order::asc("display_name"));
    }
    select.order(Order::asc("person_id"))
}

pub async fn list_paged<S: Store>(
    store: &S,
    token: &str,
    query: &CertQuery,
    numeric: bool,
    limit: i64,
    offset: i64,
) -> Result<Vec<CertRow>, AppError> {
    let select = sorted(query, numeric).range(limit, offset);
    store.select(token, &select).await?.decode()
}

/// Every row matching the query, across pages, in list order.
pub async fn export_rows<S: Store>(
    store: &S,
    token: &str,
    query: &CertQuery,
    numeric: bool,
    page_size: i64,
) -> Result<Vec<CertRow>, AppError> {
    fetch_all_paged(page_size, move |limit, offset| {
        list_paged(store, token, query, numeric, limit, offset)
    })
    .await
}
