use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use converter_core::config::{DEFAULT_API_BASE, DEFAULT_MODEL};
use converter_core::ConverterConfig;

use crate::service::{Result, ServiceError, TransformationService};

/// Chat-completions backed [`TransformationService`].
///
/// The role instruction goes out as the system message and the payload as
/// the user message. Requests are non-streaming.
pub struct OpenAIService {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
}

impl OpenAIService {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.0,
        }
    }

    pub fn from_config(config: &ConverterConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ServiceError::Auth("no API key configured".to_string()))?;

        Ok(Self::new(api_key)
            .with_base_url(config.api_base.clone())
            .with_model(config.model.clone())
            .with_temperature(config.temperature))
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request_body(&self, instruction: &str, payload: &str) -> serde_json::Value {
        serde_json::json!({
            "model": self.model,
            "temperature": self.temperature,
            "stream": false,
            "messages": [
                { "role": "system", "content": instruction },
                { "role": "user", "content": payload },
            ],
        })
    }
}

#[async_trait]
impl TransformationService for OpenAIService {
    async fn invoke(&self, instruction: &str, payload: &str) -> Result<String> {
        let body = self.build_request_body(instruction, payload);
        log::debug!(
            "POST {}/chat/completions model={} instruction={} chars payload={} chars",
            self.base_url,
            self.model,
            instruction.len(),
            payload.len()
        );

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            let text = response.text().await?;
            return Err(ServiceError::Auth(format!("HTTP {}: {}", status, text)));
        }
        if !status.is_success() {
            let text = response.text().await?;
            return Err(ServiceError::Api(format!("HTTP {}: {}", status, text)));
        }

        let text = response.text().await?;
        let completion: ChatCompletion = serde_json::from_str(&text)?;
        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or(ServiceError::EmptyChoices)?;

        Ok(choice.message.content.unwrap_or_default())
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn completion(content: serde_json::Value) -> serde_json::Value {
        serde_json::json!({
            "id": "chatcmpl-test",
            "object": "chat.completion",
            "created": 1234567890,
            "model": "gpt-4o",
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": content },
                "finish_reason": "stop"
            }]
        })
    }

    #[test]
    fn test_new_service_defaults() {
        let service = OpenAIService::new("test_key");
        assert_eq!(service.api_key, "test_key");
        assert_eq!(service.base_url, "https://api.openai.com/v1");
        assert_eq!(service.model, "gpt-4o");
        assert_eq!(service.temperature, 0.0);
    }

    #[test]
    fn test_with_base_url_trims_trailing_slash() {
        let service = OpenAIService::new("k").with_base_url("http://localhost:1234/v1/");
        assert_eq!(service.base_url, "http://localhost:1234/v1");
    }

    #[test]
    fn test_from_config_requires_api_key() {
        let config = ConverterConfig::default();
        assert!(matches!(
            OpenAIService::from_config(&config),
            Err(ServiceError::Auth(_))
        ));

        let config = ConverterConfig {
            api_key: Some("sk-test".to_string()),
            model: "gpt-4o-mini".to_string(),
            ..Default::default()
        };
        let service = OpenAIService::from_config(&config).expect("service");
        assert_eq!(service.model(), "gpt-4o-mini");
    }

    #[test]
    fn test_request_body_shape() {
        let service = OpenAIService::new("k").with_model("gpt-4o");
        let body = service.build_request_body("You are a parser", "SQL to parse:\nSELECT 1");

        assert_eq!(body["model"], "gpt-4o");
        assert_eq!(body["stream"], false);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], "You are a parser");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "SQL to parse:\nSELECT 1");
    }

    #[tokio::test]
    async fn test_invoke_returns_first_choice_content() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("Authorization", "Bearer sk-test"))
            .and(body_partial_json(serde_json::json!({ "stream": false })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(completion(serde_json::json!("SELECT 1"))),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let service = OpenAIService::new("sk-test").with_base_url(mock_server.uri());
        let reply = service.invoke("role", "payload").await.expect("invoke");

        assert_eq!(reply, "SELECT 1");
    }

    #[tokio::test]
    async fn test_null_content_becomes_empty_text() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(completion(serde_json::Value::Null)),
            )
            .mount(&mock_server)
            .await;

        let service = OpenAIService::new("sk-test").with_base_url(mock_server.uri());
        let reply = service.invoke("role", "payload").await.expect("invoke");

        assert!(reply.is_empty());
    }

    #[tokio::test]
    async fn test_server_error_maps_to_api_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(503).set_body_string(r#"{"error": "Service Unavailable"}"#),
            )
            .mount(&mock_server)
            .await;

        let service = OpenAIService::new("sk-test").with_base_url(mock_server.uri());
        let err = service.invoke("role", "payload").await.unwrap_err();

        assert!(matches!(err, ServiceError::Api(ref msg) if msg.contains("503")));
    }

    #[tokio::test]
    async fn test_unauthorized_maps_to_auth_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid key"))
            .mount(&mock_server)
            .await;

        let service = OpenAIService::new("bad").with_base_url(mock_server.uri());
        let err = service.invoke("role", "payload").await.unwrap_err();

        assert!(matches!(err, ServiceError::Auth(_)));
    }

    #[tokio::test]
    async fn test_missing_choices_is_an_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "choices": [] })),
            )
            .mount(&mock_server)
            .await;

        let service = OpenAIService::new("sk-test").with_base_url(mock_server.uri());
        let err = service.invoke("role", "payload").await.unwrap_err();

        assert!(matches!(err, ServiceError::EmptyChoices));
    }
}
