use serde_json::Value;

/// One round trip to the GraphQL endpoint. The walker and client never talk
/// HTTP directly; tests swap in scripted transports.
#[async_trait::async_trait]
pub trait GraphqlTransport: Send + Sync {
    async fn execute(&self, document: &str, variables: Value) -> Result<Value, TransportError>;
}

#[derive(Debug)]
pub enum TransportError {
    Http(String),
    Status(u16),
    Query(String),
    Decode(String),
}

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http(e) => write!(f, "http: {e}"),
            Self::Status(code) => write!(f, "rejected with status {code}"),
            Self::Query(msg) => write!(f, "query: {msg}"),
            Self::Decode(e) => write!(f, "decode: {e}"),
        }
    }
}

impl std::error::Error for TransportError {}

pub struct HttpTransport {
    endpoint: String,
    api_key: String,
    http: reqwest::Client,
}

#[derive(serde::Serialize)]
struct QueryBody<'a> {
    query: &'a str,
    variables: &'a Value,
}

#[derive(serde::Deserialize)]
struct GraphqlResponse {
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GraphqlError>,
}

#[derive(serde::Deserialize)]
struct GraphqlError {
    message: String,
}

impl HttpTransport {
    pub fn new(endpoint: &str, api_key: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            api_key: api_key.to_string(),
            http: reqwest::Client::new(),
        }
    }
}

#[async_trait::async_trait]
impl GraphqlTransport for HttpTransport {
    async fn execute(&self, document: &str, variables: Value) -> Result<Value, TransportError> {
        let resp = self
            .http
            .post(&self.endpoint)
            .header("API-Key", &self.api_key)
            .json(&QueryBody {
                query: document,
                variables: &variables,
            })
            .send()
            .await
            .map_err(|e| TransportError::Http(e.to_string()))?;

        let status = resp.status().as_u16();
        if !(200..300).contains(&status) {
            return Err(TransportError::Status(status));
        }

        let body: GraphqlResponse = resp
            .json()
            .await
            .map_err(|e| TransportError::Decode(e.to_string()))?;

        if let Some(first) = body.errors.first() {
            return Err(TransportError::Query(first.message.clone()));
        }
        body.data
            .ok_or_else(|| TransportError::Decode("response carried no data".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_with_errors_is_a_query_error() {
        let raw = r#"{"data": null, "errors": [{"message": "rate limited"}]}"#;
        let body: GraphqlResponse = serde_json::from_str(raw).unwrap();
        assert!(body.data.is_none());
        assert_eq!(body.errors[0].message, "rate limited");
    }

    #[test]
    fn error_display() {
        assert!(TransportError::Status(503).to_string().contains("503"));
        assert!(TransportError::Query("boom".into()).to_string().contains("boom"));
    }

    #[test]
    fn body_serializes_query_and_variables() {
        let vars = serde_json::json!({"accountId": 1});
        let body = QueryBody {
            query: "query { actor { accounts { id } } }",
            variables: &vars,
        };
        let text = serde_json::to_string(&body).unwrap();
        assert!(text.contains("\"accountId\":1"));
        assert!(text.contains("actor"));
    }
}
