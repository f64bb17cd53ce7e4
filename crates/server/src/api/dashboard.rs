use dioxus::prelude::*;
use shared_types::{CertRow, DashSort, ExportFile, KpiKey};

#[cfg(feature = "server")]
use super::auth::*;

/// Every certificate row the dashboard filters locally.
#[cfg_attr(feature = "server", tracing::instrument)]
#[server]
pub async fn dashboard_rows() -> Result<Vec<CertRow>, ServerFnError> {
    use crate::repo::certificates;

    let session = require_session()?;
    let limit = crate::config::paging().dashboard_rows;
    certificates::dashboard_rows(store()?, &session.access_token, limit)
        .await
        .map_err(fail)
}

/// The dashboard's full filtered set as xlsx, in display order.
#[cfg_attr(feature = "server", tracing::instrument)]
#[server]
pub async fn export_dashboard_xlsx(
    query: String,
    kpi: Option<KpiKey>,
    sort: DashSort,
) -> Result<ExportFile, ServerFnError> {
    use crate::repo::certificates;
    use shared_types::{dashboard_filename, dashboard_sheet, DashboardView};

    let session = require_session()?;
    let limit = crate::config::paging().dashboard_rows;
    let rows = certificates::dashboard_rows(store()?, &session.access_token, limit)
        .await
        .map_err(fail)?;

    let view = DashboardView::restored(rows, &query, kpi, sort);
    let sheet = dashboard_sheet(view.filtered());
    crate::export::xlsx_file(dashboard_filename(today()), &sheet).map_err(fail)
}
