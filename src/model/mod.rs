use async_trait::async_trait;
use log::{debug, info};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use crate::config::Config;

#[cfg(test)]
pub mod mock;

/// Errors surfaced by a single completion call.
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API request failed (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Failed to extract content from response: {0}")]
    InvalidResponse(String),
}

/// A text-completion service: one prompt in, one block of text out.
#[async_trait]
pub trait Oracle: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, OracleError>;
}

#[derive(Debug, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "user")]
    User,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

// Client for an OpenAI-compatible chat completions endpoint
pub struct OpenAiOracle {
    base_url: String,
    api_key: String,
    model: String,
    client: Client,
}

impl OpenAiOracle {
    pub fn new(config: &Config) -> Self {
        info!("Using completion endpoint at: {} (model {})", config.base_url, config.model);

        Self {
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            client: Client::new(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }

    fn payload(&self, prompt: &str) -> Value {
        // Each call stands alone: a single user turn, no history.
        let messages = vec![Message {
            role: Role::User,
            content: prompt.to_string(),
        }];

        json!({
            "model": self.model,
            "messages": messages,
            "temperature": 0,
            "stream": false
        })
    }
}

#[async_trait]
impl Oracle for OpenAiOracle {
    async fn complete(&self, prompt: &str) -> Result<String, OracleError> {
        let payload = self.payload(prompt);
        info!("Sending completion request ({} prompt characters)", prompt.len());
        debug!("Payload: {}", payload);

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await?;
            return Err(OracleError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let response_json: Value = response.json().await?;
        debug!("Response JSON: {}", response_json);

        let content = extract_content(&response_json)?;
        info!("Response length: {} characters", content.len());
        Ok(content)
    }
}

fn extract_content(response_json: &Value) -> Result<String, OracleError> {
    response_json
        .get("choices")
        .and_then(|choices| choices.get(0))
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(|content| content.as_str())
        .map(str::to_string)
        .ok_or_else(|| OracleError::InvalidResponse(response_json.to_string()))
}
