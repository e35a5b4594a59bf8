// src/provider/ollama.rs — Ollama chat provider

use async_trait::async_trait;
use std::time::Duration;

use super::ReplyGenerator;
use crate::core::types::ChatTurn;
use crate::infra::config::ModelConfig;
use crate::infra::errors::TripmateError;

pub struct OllamaProvider {
    base_url: String,
    model: String,
    temperature: Option<f32>,
    client: reqwest::Client,
}

impl OllamaProvider {
    pub fn new(base_url: Option<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: base_url
                .unwrap_or_else(|| "http://localhost:11434".into())
                .trim_end_matches('/')
                .to_string(),
            model: model.into(),
            temperature: None,
            client: reqwest::Client::new(),
        }
    }

    /// Provider with the configured endpoint, model and request timeout.
    pub fn from_config(config: &ModelConfig) -> Result<Self, TripmateError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| provider_error(format!("Cannot build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            temperature: config.temperature,
            ..Self::new(Some(config.base_url.clone()), config.name.clone())
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// List models installed on the server.
    pub async fn probe(&self) -> Result<Vec<String>, TripmateError> {
        let resp = self
            .client
            .get(format!("{}/api/tags", self.base_url))
            .timeout(Duration::from_secs(3))
            .send()
            .await
            .map_err(|e| provider_error(format!("Cannot reach Ollama: {}", e)))?;

        let body: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| provider_error(format!("Invalid Ollama response: {}", e)))?;

        Ok(body["models"]
            .as_array()
            .map(|models| {
                models
                    .iter()
                    .filter_map(|m| m["name"].as_str().map(|s| s.to_string()))
                    .collect()
            })
            .unwrap_or_default())
    }
}

fn provider_error(message: String) -> TripmateError {
    TripmateError::Provider {
        provider: "ollama".into(),
        message,
    }
}

/// Non-streaming `/api/chat` request body.
pub fn build_chat_body(
    model: &str,
    temperature: Option<f32>,
    history: &[ChatTurn],
) -> serde_json::Value {
    let messages: Vec<serde_json::Value> = history
        .iter()
        .map(|t| {
            serde_json::json!({
                "role": t.role().as_str(),
                "content": t.content(),
            })
        })
        .collect();

    let mut body = serde_json::json!({
        "model": model,
        "messages": messages,
        "stream": false,
    });

    if let Some(temp) = temperature {
        body["options"] = serde_json::json!({ "temperature": temp });
    }
    body
}

/// Pull the reply text out of a `/api/chat` response.
pub fn parse_chat_response(resp: &serde_json::Value) -> Result<String, TripmateError> {
    if let Some(err) = resp["error"].as_str() {
        return Err(provider_error(err.to_string()));
    }
    resp["message"]["content"]
        .as_str()
        .map(|s| s.to_string())
        .ok_or_else(|| provider_error("Response has no message content".into()))
}

#[async_trait]
impl ReplyGenerator for OllamaProvider {
    fn id(&self) -> &str {
        "ollama"
    }

    async fn complete(&self, history: &[ChatTurn]) -> Result<String, TripmateError> {
        let body = build_chat_body(&self.model, self.temperature, history);

        let response = self
            .client
            .post(format!("{}/api/chat", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| provider_error(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response.text().await.unwrap_or_default();
            return Err(provider_error(
                format!("HTTP {}: {}", status, error_body),
            ));
        }

        let resp: serde_json::Value = response
            .json()
            .await
            .map_err(|e| provider_error(format!("Failed to parse response: {}", e)))?;

        let content = parse_chat_response(&resp)?;
        tracing::debug!(
            model = %self.model,
            prompt_tokens = resp["prompt_eval_count"].as_u64().unwrap_or(0),
            output_tokens = resp["eval_count"].as_u64().unwrap_or(0),
            "ollama reply"
        );
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_chat_body_shape() {
        let history = vec![ChatTurn::assistant("Hi!"), ChatTurn::user("Best pho in Hanoi?")];
        let body = build_chat_body("gpt-oss:20b", None, &history);
        assert_eq!(
            body,
            serde_json::json!({
                "model": "gpt-oss:20b",
                "messages": [
                    {"role": "assistant", "content": "Hi!"},
                    {"role": "user", "content": "Best pho in Hanoi?"},
                ],
                "stream": false,
            })
        );
    }

    #[test]
    fn test_chat_body_temperature() {
        let body = build_chat_body("m", Some(0.5), &[]);
        assert_eq!(body["options"]["temperature"].as_f64(), Some(0.5));
    }

    #[test]
    fn test_parse_response() {
        let resp = serde_json::json!({
            "message": {"role": "assistant", "content": "Try Pho Thin."},
            "done": true,
        });
        assert_eq!(parse_chat_response(&resp).unwrap(), "Try Pho Thin.");
    }

    #[test]
    fn test_parse_error_response() {
        let resp = serde_json::json!({"error": "model 'x' not found"});
        let err = parse_chat_response(&resp).unwrap_err();
        assert!(err.to_string().contains("model 'x' not found"));
    }

    #[test]
    fn test_parse_missing_content() {
        let err = parse_chat_response(&serde_json::json!({"done": true})).unwrap_err();
        assert!(matches!(err, TripmateError::Provider { .. }));
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let p = OllamaProvider::new(Some("http://host:11434/".into()), "m");
        assert_eq!(p.base_url, "http://host:11434");
        assert_eq!(p.model(), "m");
    }

    #[test]
    fn test_from_config() {
        let config = ModelConfig {
            temperature: Some(0.3),
            ..Default::default()
        };
        let p = OllamaProvider::from_config(&config).unwrap();
        assert_eq!(p.base_url, "http://localhost:11434");
        assert_eq!(p.model(), "gpt-oss:20b");
        assert_eq!(p.temperature, Some(0.3));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_provider_error() {
        // Port 9 (discard) is essentially never serving HTTP locally.
        let p = OllamaProvider::new(Some("http://127.0.0.1:9".into()), "m");
        let err = p.complete(&[ChatTurn::user("hi")]).await.unwrap_err();
        assert!(matches!(err, TripmateError::Provider { .. }));
    }
}
