use dioxus::prelude::*;

#[cfg(feature = "server")]
use super::auth::*;

/// Clear `nr_quota` on every person (start of a new season).
#[cfg_attr(feature = "server", tracing::instrument)]
#[server]
pub async fn reset_annual_quotas() -> Result<(), ServerFnError> {
    use crate::error_convert::AppErrorExt;
    use shared_types::AppError;

    let session = require_session()?;
    if !crate::config::feature_flags().quota_reset {
        return Err(AppError::forbidden("Reset quote non abilitato").into_server_fn_error());
    }
    crate::repo::quotas::reset_annual(store()?, &session.access_token)
        .await
        .map_err(fail)
}
