use serde_json::json;

use super::queries;
use super::transport::{GraphqlTransport, TransportError};
use super::types::{AccountRef, AccountsData, ConditionRecord, ConditionsData, PoliciesData, Policy};
use crate::fetch::Page;
use crate::retry::{run_with_retry, ExhaustionMode, RetryPolicy};

#[derive(Debug)]
pub enum ApiError {
    Transport(TransportError),
    Decode(String),
    Exhausted,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "transport: {e}"),
            Self::Decode(e) => write!(f, "decode: {e}"),
            Self::Exhausted => write!(f, "retry budget spent"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<TransportError> for ApiError {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

/// The walker's view of the alerts API: one discovery call plus one page
/// fetch per hierarchy level. `conditions_page` returns `Ok(None)` once the
/// retry budget for that page is spent, so a single bad policy can be skipped
/// without abandoning the walk.
#[async_trait::async_trait]
pub trait AlertsApi: Send + Sync {
    async fn accounts(&self) -> Result<Vec<AccountRef>, ApiError>;

    async fn policies_page(
        &self,
        account_id: i64,
        cursor: Option<String>,
    ) -> Result<Page<Policy>, ApiError>;

    async fn conditions_page(
        &self,
        account_id: i64,
        policy_id: &str,
        cursor: Option<String>,
    ) -> Result<Option<Page<ConditionRecord>>, ApiError>;
}

/// Production client: GraphQL transport wrapped in the retry policy. Account
/// and policy listings run in abort mode (exhaustion is fatal for the run);
/// condition pages run in skip mode.
pub struct AlertsClient<T: GraphqlTransport> {
    transport: T,
    retry: RetryPolicy,
}

impl<T: GraphqlTransport> AlertsClient<T> {
    pub fn new(transport: T, retry: RetryPolicy) -> Self {
        Self { transport, retry }
    }
}

#[async_trait::async_trait]
impl<T: GraphqlTransport> AlertsApi for AlertsClient<T> {
    async fn accounts(&self) -> Result<Vec<AccountRef>, ApiError> {
        let data = run_with_retry(&self.retry, ExhaustionMode::Abort, || {
            self.transport.execute(queries::ACCOUNTS, json!({}))
        })
        .await?
        .ok_or(ApiError::Exhausted)?;

        let decoded: AccountsData =
            serde_json::from_value(data).map_err(|e| ApiError::Decode(e.to_string()))?;
        Ok(decoded.actor.accounts)
    }

    async fn policies_page(
        &self,
        account_id: i64,
        cursor: Option<String>,
    ) -> Result<Page<Policy>, ApiError> {
        let variables = json!({ "accountId": account_id, "cursor": cursor });
        let data = run_with_retry(&self.retry, ExhaustionMode::Abort, || {
            self.transport.execute(queries::POLICIES, variables.clone())
        })
        .await?
        .ok_or(ApiError::Exhausted)?;

        let decoded: PoliciesData =
            serde_json::from_value(data).map_err(|e| ApiError::Decode(e.to_string()))?;
        Ok(decoded.into())
    }

    async fn conditions_page(
        &self,
        account_id: i64,
        policy_id: &str,
        cursor: Option<String>,
    ) -> Result<Option<Page<ConditionRecord>>, ApiError> {
        let variables = json!({
            "accountId": account_id,
            "policyId": policy_id,
            "cursor": cursor,
        });
        let data = run_with_retry(&self.retry, ExhaustionMode::Skip, || {
            self.transport
                .execute(queries::POLICY_CONDITIONS, variables.clone())
        })
        .await?;

        match data {
            None => Ok(None),
            Some(data) => {
                let decoded: ConditionsData =
                    serde_json::from_value(data).map_err(|e| ApiError::Decode(e.to_string()))?;
                Ok(Some(decoded.into()))
            }
        }
    }
}
