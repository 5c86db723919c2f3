//! HTTP completion client for Gemini-style generateContent endpoints

use async_trait::async_trait;
use forge_core::{CompletionClient, ForgeError, Result};
use forge_types::{ChatMessage, ChatRole};
use reqwest::Client as ReqwestClient;

/// Thin transport to a `models/{model}:generateContent` API. The core
/// never sees this type; it talks to the `CompletionClient` port.
pub struct GeminiClient {
    http: ReqwestClient,
    base_url: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: ReqwestClient::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl CompletionClient for GeminiClient {
    async fn complete(&self, model: &str, messages: &[ChatMessage]) -> Result<String> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, model, self.api_key
        );

        let contents: Vec<serde_json::Value> = messages
            .iter()
            .map(|message| {
                serde_json::json!({
                    "role": match message.role {
                        ChatRole::User => "user",
                        ChatRole::Assistant => "model",
                    },
                    "parts": [{ "text": message.content }],
                })
            })
            .collect();

        let response = self
            .http
            .post(&url)
            .json(&serde_json::json!({ "contents": contents }))
            .send()
            .await
            .map_err(|e| ForgeError::Completion(format!("request failed: {e}")))?;

        let status = response.status();
        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ForgeError::Completion(format!("invalid response body: {e}")))?;

        if !status.is_success() {
            let message = body["error"]["message"]
                .as_str()
                .unwrap_or("unknown upstream error");
            return Err(ForgeError::Completion(format!(
                "upstream returned {status}: {message}"
            )));
        }

        body["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| ForgeError::Completion("response had no text part".to_string()))
    }
}
