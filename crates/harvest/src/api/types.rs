//! Typed views of the NerdGraph response shapes. Each response is decoded
//! once at this boundary; a missing expected field is a decode error, not
//! something the traversal papers over.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::fetch::Page;

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AccountRef {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Policy {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Nrql {
    pub query: String,
}

/// A single NRQL alert condition as returned by the API, plus the injected
/// `policyName` back-reference. `policyName` is a denormalized copy of the
/// owning policy's display name, never a live link. Signal, expiration and any
/// fields a newer schema adds ride along in `extra` so JSON output keeps the
/// full API shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConditionRecord {
    pub id: String,
    pub name: String,
    pub enabled: bool,
    pub nrql: Nrql,
    #[serde(default)]
    pub terms: Vec<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy_name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ConditionRecord {
    /// Pair-report key, `<id>:<name>`.
    pub fn key(&self) -> String {
        format!("{}:{}", self.id, self.name)
    }
}

#[derive(Deserialize)]
pub(crate) struct AccountsData {
    pub actor: AccountsActor,
}

#[derive(Deserialize)]
pub(crate) struct AccountsActor {
    pub accounts: Vec<AccountRef>,
}

#[derive(Deserialize)]
pub(crate) struct PoliciesData {
    pub actor: PoliciesActor,
}

#[derive(Deserialize)]
pub(crate) struct PoliciesActor {
    pub account: PoliciesAccount,
}

#[derive(Deserialize)]
pub(crate) struct PoliciesAccount {
    pub alerts: PoliciesAlerts,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PoliciesAlerts {
    pub policies_search: PoliciesSearch,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PoliciesSearch {
    pub policies: Vec<Policy>,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

impl From<PoliciesData> for Page<Policy> {
    fn from(data: PoliciesData) -> Self {
        let search = data.actor.account.alerts.policies_search;
        Page {
            items: search.policies,
            next_cursor: search.next_cursor,
        }
    }
}

#[derive(Deserialize)]
pub(crate) struct ConditionsData {
    pub actor: ConditionsActor,
}

#[derive(Deserialize)]
pub(crate) struct ConditionsActor {
    pub account: ConditionsAccount,
}

#[derive(Deserialize)]
pub(crate) struct ConditionsAccount {
    pub alerts: ConditionsAlerts,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ConditionsAlerts {
    pub nrql_conditions_search: ConditionsSearch,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ConditionsSearch {
    pub nrql_conditions: Vec<ConditionRecord>,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

impl From<ConditionsData> for Page<ConditionRecord> {
    fn from(data: ConditionsData) -> Self {
        let search = data.actor.account.alerts.nrql_conditions_search;
        Page {
            items: search.nrql_conditions,
            next_cursor: search.next_cursor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_accounts() {
        let data: AccountsData = serde_json::from_value(json!({
            "actor": {"accounts": [{"id": 1, "name": "prod"}, {"id": 2}]}
        }))
        .unwrap();
        assert_eq!(data.actor.accounts.len(), 2);
        assert_eq!(data.actor.accounts[0].id, 1);
        assert!(data.actor.accounts[1].name.is_none());
    }

    #[test]
    fn decodes_policy_page_with_cursor() {
        let data: PoliciesData = serde_json::from_value(json!({
            "actor": {"account": {"alerts": {"policiesSearch": {
                "policies": [{"id": "10", "name": "Latency"}],
                "nextCursor": "abc"
            }}}}
        }))
        .unwrap();
        let page: Page<Policy> = data.into();
        assert_eq!(page.items[0].name, "Latency");
        assert_eq!(page.next_cursor.as_deref(), Some("abc"));
    }

    #[test]
    fn null_cursor_ends_the_sequence() {
        let data: PoliciesData = serde_json::from_value(json!({
            "actor": {"account": {"alerts": {"policiesSearch": {
                "policies": [],
                "nextCursor": null
            }}}}
        }))
        .unwrap();
        let page: Page<Policy> = data.into();
        assert!(page.next_cursor.is_none());
    }

    #[test]
    fn missing_expected_field_is_fatal() {
        // actor.account.alerts absent: an API contract violation must surface
        // as an error, never as a silently empty page.
        let result: Result<PoliciesData, _> = serde_json::from_value(json!({
            "actor": {"account": {}}
        }));
        assert!(result.is_err());
    }

    #[test]
    fn condition_keeps_unknown_fields_and_terms() {
        let data: ConditionsData = serde_json::from_value(json!({
            "actor": {"account": {"alerts": {"nrqlConditionsSearch": {
                "nrqlConditions": [{
                    "id": "77",
                    "name": "High error rate",
                    "enabled": true,
                    "nrql": {"query": "SELECT count(*) FROM TransactionError"},
                    "terms": [{"operator": "ABOVE", "threshold": 5.0}],
                    "signal": {"aggregationWindow": 60},
                    "expiration": {"expirationDuration": null}
                }],
                "nextCursor": null
            }}}}
        }))
        .unwrap();
        let page: Page<ConditionRecord> = data.into();
        let cond = &page.items[0];
        assert_eq!(cond.key(), "77:High error rate");
        assert!(cond.policy_name.is_none());
        assert_eq!(cond.terms[0]["operator"], "ABOVE");
        assert_eq!(cond.extra["signal"]["aggregationWindow"], 60);
    }

    #[test]
    fn serializes_back_with_injected_policy_name() {
        let mut cond = ConditionRecord {
            id: "1".into(),
            name: "c".into(),
            enabled: false,
            nrql: Nrql {
                query: "SELECT 1".into(),
            },
            terms: Vec::new(),
            policy_name: None,
            extra: Map::new(),
        };
        cond.policy_name = Some("Golden signals".into());
        let value = serde_json::to_value(&cond).unwrap();
        assert_eq!(value["policyName"], "Golden signals");
    }
}
