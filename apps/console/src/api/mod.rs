use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::config::AppConfig;
use crate::models::{EventMeta, HealthStatus, PredictRequest, PredictionResult};

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Clone)]
pub struct PolicyGameClient {
    inner: reqwest::Client,
    base_url: String,
}

impl PolicyGameClient {
    pub fn new(config: &AppConfig) -> ClientResult<Self> {
        let base_url = normalize_base_url(&config.api_base_url);

        #[allow(unused_mut)]
        let mut builder = reqwest::Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        {
            if let Some(timeout) = config.request_timeout {
                builder = builder.timeout(timeout);
            }
        }
        let client = builder.build()?;

        Ok(Self {
            inner: client,
            base_url,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get_event_ids(&self) -> ClientResult<Vec<String>> {
        let builder = self.request(Method::GET, "v1/events/ids");
        self.send(builder).await
    }

    pub async fn get_event_meta(&self, budget_id: &str) -> ClientResult<EventMeta> {
        let builder = self
            .request(Method::GET, "v1/events/meta")
            .query(&[("budget_id", budget_id)]);
        self.send(builder).await
    }

    pub async fn predict_budget(&self, query_text: &str) -> ClientResult<PredictionResult> {
        let payload = PredictRequest { query_text };
        let builder = self
            .request(Method::POST, "v1/budget/predict")
            .json(&payload);
        self.send(builder).await
    }

    pub async fn get_health(&self) -> ClientResult<HealthStatus> {
        let builder = self.request(Method::GET, "health");
        self.send(builder).await
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        self.inner.request(method, self.join_path(path))
    }

    fn join_path(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn send<T>(&self, builder: reqwest::RequestBuilder) -> ClientResult<T>
    where
        T: DeserializeOwned,
    {
        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;
        decode_response(status, &text)
    }
}

/// JSON when it parses, raw text otherwise; non-2xx becomes `Status`.
fn decode_response<T: DeserializeOwned>(status: StatusCode, text: &str) -> ClientResult<T> {
    let body = parse_body(text);

    if !status.is_success() {
        return Err(ClientError::Status { status, body });
    }

    Ok(serde_json::from_value(body)?)
}

fn parse_body(text: &str) -> Value {
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

fn normalize_base_url(input: &str) -> String {
    input.trim_end_matches('/').to_string()
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("unexpected status {status}: {body}")]
    Status { status: StatusCode, body: Value },
    #[error("API client not initialised")]
    NotInitialised,
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Transport(err) => err.status(),
            Self::Status { status, .. } => Some(*status),
            Self::Decode(_) | Self::NotInitialised => None,
        }
    }

    pub fn body(&self) -> Option<&Value> {
        match self {
            Self::Status { body, .. } => Some(body),
            _ => None,
        }
    }
}

/// Error payload the prediction panel renders verbatim.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ErrorPayload {
    pub status: Option<u16>,
    pub data: Value,
}

impl From<&ClientError> for ErrorPayload {
    fn from(err: &ClientError) -> Self {
        Self {
            status: err.status().map(|status| status.as_u16()),
            data: err
                .body()
                .cloned()
                .unwrap_or_else(|| Value::String(err.to_string())),
        }
    }
}

impl ErrorPayload {
    pub fn pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| format!("{self:?}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn base_url_loses_trailing_slashes() {
        assert_eq!(normalize_base_url("http://127.0.0.1:8000//"), "http://127.0.0.1:8000");
    }

    #[test]
    fn join_path_builds_endpoint_urls() {
        let client = PolicyGameClient::new(&AppConfig {
            api_base_url: "http://backend.test/".into(),
            ..AppConfig::default()
        })
        .unwrap();
        assert_eq!(client.join_path("v1/events/ids"), "http://backend.test/v1/events/ids");
        assert_eq!(client.join_path("/health"), "http://backend.test/health");
    }

    #[test]
    fn success_body_is_decoded() {
        let ids: Vec<String> = decode_response(StatusCode::OK, r#"["a","b","c"]"#).unwrap();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn prediction_body_is_decoded() {
        let body = r#"{"estimate_initial": 500000, "topk": [{"rank": 1, "name": "X", "similarity": 0.8, "initial_budget": 400000}]}"#;
        let result: PredictionResult = decode_response(StatusCode::OK, body).unwrap();
        assert_eq!(result.estimate_initial, Some(json!(500000)));
        assert_eq!(result.entries()[0].similarity, Some(0.8));
    }

    #[test]
    fn error_status_keeps_raw_text_body() {
        let err = decode_response::<PredictionResult>(StatusCode::INTERNAL_SERVER_ERROR, "boom")
            .unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));

        let payload = ErrorPayload::from(&err);
        assert_eq!(payload, ErrorPayload { status: Some(500), data: json!("boom") });
        let rendered = payload.pretty();
        assert!(rendered.contains("500"));
        assert!(rendered.contains("boom"));
    }

    #[test]
    fn error_status_parses_json_body() {
        let err = decode_response::<PredictionResult>(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"detail":"cannot estimate"}"#,
        )
        .unwrap_err();
        assert_eq!(err.body(), Some(&json!({"detail": "cannot estimate"})));
    }

    #[test]
    fn malformed_success_body_is_a_decode_error() {
        let err = decode_response::<Vec<String>>(StatusCode::OK, "not json").unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));

        let payload = ErrorPayload::from(&err);
        assert_eq!(payload.status, None);
        assert!(payload.data.as_str().unwrap().starts_with("decode error"));
    }
}
