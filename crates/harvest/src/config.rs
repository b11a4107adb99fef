use crate::retry::RetryPolicy;

pub const DEFAULT_ENDPOINT: &str = "https://api.newrelic.com/graphql";

/// Everything a harvest run needs, built once up front and passed down.
pub struct HarvestConfig {
    pub endpoint: String,
    pub api_key: String,
    /// Restrict the walk to one account; `None` discovers every account the
    /// key can see.
    pub account_id: Option<i64>,
    pub retry: RetryPolicy,
}

impl HarvestConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: api_key.into(),
            account_id: None,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_account(mut self, account_id: i64) -> Self {
        self.account_id = Some(account_id);
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.api_key.is_empty() {
            return Err("api key must not be empty".into());
        }
        if self.endpoint.is_empty() {
            return Err("endpoint must not be empty".into());
        }
        if self.retry.max_attempts == 0 {
            return Err("retry.max_attempts must be > 0".into());
        }
        Ok(())
    }
}
