//! HTTP remedy source using reqwest

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::lookup::{LookupKind, NetworkError, RemedySource};
use crate::domain::remedy::{normalize_payload, LookupPayload};
use crate::domain::DomainError;

/// Configuration for the lookup API
#[derive(Debug, Clone)]
pub struct HttpSourceConfig {
    pub base_url: String,
    pub materia_medica_path: String,
    pub repertory_path: String,
    pub timeout: Duration,
    /// Bearer token sent with every request
    pub token: Option<String>,
}

impl Default for HttpSourceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            materia_medica_path: "/api/materia-medica/search".to_string(),
            repertory_path: "/api/repertory/search".to_string(),
            timeout: Duration::from_secs(15),
            token: None,
        }
    }
}

impl HttpSourceConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn path_for(&self, kind: LookupKind) -> &str {
        match kind {
            LookupKind::MateriaMedica => &self.materia_medica_path,
            LookupKind::Repertory => &self.repertory_path,
        }
    }
}

/// Remedy source backed by the search endpoints of the lookup API
#[derive(Debug, Clone)]
pub struct HttpRemedySource {
    client: reqwest::Client,
    url: String,
    token: Option<String>,
}

impl HttpRemedySource {
    pub fn new(config: &HttpSourceConfig, kind: LookupKind) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| DomainError::configuration(format!("Failed to build HTTP client: {}", e)))?;

        let url = format!(
            "{}{}",
            config.base_url.trim_end_matches('/'),
            config.path_for(kind)
        );

        Ok(Self {
            client,
            url,
            token: config.token.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Pulls a human readable message out of an error body
    fn error_message(status: reqwest::StatusCode, body: &str) -> String {
        let from_json = serde_json::from_str::<Value>(body).ok().and_then(|json| {
            ["message", "detail", "error"]
                .iter()
                .find_map(|field| json.get(field).and_then(Value::as_str).map(str::to_string))
        });

        match from_json {
            Some(message) => message,
            None if !body.trim().is_empty() => body.trim().to_string(),
            None => status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string(),
        }
    }
}

#[async_trait]
impl RemedySource for HttpRemedySource {
    async fn fetch(&self, query: &str) -> Result<LookupPayload, NetworkError> {
        let mut request = self.client.get(&self.url).query(&[("q", query)]);

        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| NetworkError::new(format!("Request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| NetworkError::new(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(NetworkError::with_status(
                status.as_u16(),
                Self::error_message(status, &body),
            ));
        }

        match serde_json::from_str::<Value>(&body) {
            Ok(json) => Ok(normalize_payload(json)),
            Err(_) => Ok(LookupPayload::Text(body)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn source(server: &MockServer, kind: LookupKind) -> HttpRemedySource {
        HttpRemedySource::new(&HttpSourceConfig::new(server.uri()), kind).unwrap()
    }

    #[test]
    fn test_url_per_kind() {
        let config = HttpSourceConfig::new("https://api.example.com/");

        let mm = HttpRemedySource::new(&config, LookupKind::MateriaMedica).unwrap();
        let rep = HttpRemedySource::new(&config, LookupKind::Repertory).unwrap();

        assert_eq!(mm.url(), "https://api.example.com/api/materia-medica/search");
        assert_eq!(rep.url(), "https://api.example.com/api/repertory/search");
    }

    #[test]
    fn test_error_message_fields() {
        let status = reqwest::StatusCode::NOT_FOUND;

        assert_eq!(
            HttpRemedySource::error_message(status, r#"{"detail":"No remedy"}"#),
            "No remedy"
        );
        assert_eq!(
            HttpRemedySource::error_message(status, r#"{"error":"gone"}"#),
            "gone"
        );
        assert_eq!(HttpRemedySource::error_message(status, "plain"), "plain");
        assert_eq!(HttpRemedySource::error_message(status, ""), "Not Found");
    }

    #[tokio::test]
    async fn test_fetch_normalizes_records() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/materia-medica/search"))
            .and(query_param("q", "arsenicum"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [{
                    "remedy": "Arsenicum album",
                    "keynotes": ["restlessness"],
                    "sources": ["Kent"]
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let payload = source(&server, LookupKind::MateriaMedica)
            .fetch("arsenicum")
            .await
            .unwrap();

        let records = payload.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Arsenicum album");
        assert_eq!(records[0].sources, vec!["Kent"]);
    }

    #[tokio::test]
    async fn test_fetch_sends_bearer_token() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/repertory/search"))
            .and(header("authorization", "Bearer secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"remedy": "Sepia"})))
            .expect(1)
            .mount(&server)
            .await;

        let config = HttpSourceConfig::new(server.uri()).with_token("secret");
        let payload = HttpRemedySource::new(&config, LookupKind::Repertory)
            .unwrap()
            .fetch("sepia")
            .await
            .unwrap();

        assert_eq!(payload.primary().unwrap().name, "Sepia");
    }

    #[tokio::test]
    async fn test_fetch_plain_text_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("No matching rubrics"))
            .mount(&server)
            .await;

        let payload = source(&server, LookupKind::Repertory)
            .fetch("fear of heights")
            .await
            .unwrap();

        assert_eq!(payload, LookupPayload::Text("No matching rubrics".to_string()));
    }

    #[tokio::test]
    async fn test_fetch_error_status() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(503).set_body_json(json!({"message": "Index rebuilding"})),
            )
            .mount(&server)
            .await;

        let error = source(&server, LookupKind::MateriaMedica)
            .fetch("sulphur")
            .await
            .unwrap_err();

        assert_eq!(error, NetworkError::with_status(503, "Index rebuilding"));
    }

    #[tokio::test]
    async fn test_fetch_connection_failure() {
        let config = HttpSourceConfig::new("http://127.0.0.1:1").with_timeout(Duration::from_secs(2));
        let error = HttpRemedySource::new(&config, LookupKind::MateriaMedica)
            .unwrap()
            .fetch("sulphur")
            .await
            .unwrap_err();

        assert_eq!(error.status, None);
        assert!(error.message.starts_with("Request failed"));
    }
}
