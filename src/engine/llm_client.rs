use std::time::Duration;

use anyhow::Context;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::engine::narrator::NarrativeError;

/// Connection settings for an OpenAI-compatible chat endpoint (LM Studio, Ollama, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub enabled: bool,
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub temperature: f32,
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "http://localhost:1234/v1".into(),
            model: "local-model".into(),
            api_key: None,
            temperature: 0.7,
            timeout_secs: 8,
        }
    }
}

#[derive(Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
}

#[derive(Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Deserialize)]
pub struct ChatCompletionResponse {
    pub choices: Vec<Choice>,
}

#[derive(Deserialize)]
pub struct Choice {
    pub message: ChatMessageResponse,
}

#[derive(Deserialize)]
pub struct ChatMessageResponse {
    pub content: Option<String>,
}

pub struct LlmClient {
    http: Client,
    config: LlmConfig,
}

impl LlmClient {
    pub fn new(config: LlmConfig) -> Result<Self, NarrativeError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// One system + user exchange; returns the first choice's text.
    pub fn complete(&self, system: &str, prompt: &str) -> Result<String, NarrativeError> {
        let req = ChatCompletionRequest {
            model: self.config.model.clone(),
            temperature: self.config.temperature,
            messages: vec![
                ChatMessage {
                    role: "system".into(),
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user".into(),
                    content: prompt.to_string(),
                },
            ],
        };

        let mut builder = self.http.post(self.endpoint("chat/completions")).json(&req);
        if let Some(key) = &self.config.api_key {
            builder = builder.bearer_auth(key);
        }

        let resp = builder.send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(NarrativeError::Status(status.as_u16()));
        }

        let body = resp.json::<ChatCompletionResponse>()?;
        body.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(NarrativeError::EmptyResponse)
    }

    pub fn test_connection(&self) -> anyhow::Result<String> {
        let resp: serde_json::Value = self
            .http
            .get(self.endpoint("models"))
            .send()
            .with_context(|| format!("cannot reach {}", self.config.base_url))?
            .error_for_status()
            .context("model listing refused")?
            .json()
            .context("model listing is not JSON")?;
        Ok(format!(
            "Connected ({} models available)",
            resp["data"].as_array().map(|a| a.len()).unwrap_or(0)
        ))
    }
}
