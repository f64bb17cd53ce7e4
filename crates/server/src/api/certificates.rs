use dioxus::prelude::*;
use shared_types::{CertQuery, CertRow, ExportFile};

#[cfg(feature = "server")]
use super::auth::*;

/// One page of the certificates list.
#[cfg_attr(feature = "server", tracing::instrument)]
#[server]
pub async fn list_certificates(
    query: CertQuery,
    limit: Option<i64>,
    offset: Option<i64>,
) -> Result<Vec<CertRow>, ServerFnError> {
    use shared_types::normalize_pagination;

    let session = require_session()?;
    let page = normalize_pagination(limit, offset, crate::config::paging().certificates_page);
    crate::repo::certificates::list_paged(
        store()?,
        &session.access_token,
        &query,
        numeric_search(),
        page.limit,
        page.offset,
    )
    .await
    .map_err(fail)
}

/// Every row of the current query as xlsx, in list order.
#[cfg_attr(feature = "server", tracing::instrument)]
#[server]
pub async fn export_certificates_xlsx(query: CertQuery) -> Result<ExportFile, ServerFnError> {
    use shared_types::{certificates_filename, certificates_sheet};

    let session = require_session()?;
    let page_size = crate::config::paging().export_page;
    let rows = crate::repo::certificates::export_rows(
        store()?,
        &session.access_token,
        &query,
        numeric_search(),
        page_size,
    )
    .await
    .map_err(fail)?;
    let sheet = certificates_sheet(&rows);
    crate::export::xlsx_file(certificates_filename(today()), &sheet).map_err(fail)
}
