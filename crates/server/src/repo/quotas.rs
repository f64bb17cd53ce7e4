use serde_json::json;
use shared_types::AppError;

use crate::gateway::Store;

/// Clear `nr_quota` on every person through the backend function.
pub async fn reset_annual<S: Store>(store: &S, token: &str) -> Result<(), AppError> {
    store.rpc(token, "reset_annual_quotas", json!({})).await?;
    tracing::info!("annual quotas reset");
    Ok(())
}
