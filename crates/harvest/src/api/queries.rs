//! GraphQL documents sent to NerdGraph. Embedded as consts so a run never
//! depends on template files resolving at the working directory.

pub const ACCOUNTS: &str = "\
query {
  actor {
    accounts {
      id
      name
    }
  }
}";

pub const POLICIES: &str = "\
query ($accountId: Int!, $cursor: String) {
  actor {
    account(id: $accountId) {
      alerts {
        policiesSearch(cursor: $cursor) {
          policies {
            id
            name
          }
          nextCursor
        }
      }
    }
  }
}";

pub const POLICY_CONDITIONS: &str = "\
query ($accountId: Int!, $policyId: ID!, $cursor: String) {
  actor {
    account(id: $accountId) {
      alerts {
        nrqlConditionsSearch(searchCriteria: { policyId: $policyId }, cursor: $cursor) {
          nrqlConditions {
            id
            name
            enabled
            policyId
            nrql {
              query
            }
            signal {
              aggregationWindow
              aggregationMethod
              aggregationDelay
              aggregationTimer
              evaluationDelay
              fillOption
              fillValue
              slideBy
            }
            expiration {
              closeViolationsOnExpiration
              expirationDuration
              openViolationOnExpiration
            }
            terms {
              operator
              priority
              threshold
              thresholdDuration
              thresholdOccurrences
            }
          }
          nextCursor
        }
      }
    }
  }
}";
