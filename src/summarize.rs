use async_trait::async_trait;
use eyre::{Result, bail};
use log::debug;

use crate::config::LlmConfig;

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Turn a transcript into a summary
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, transcript: &str) -> Result<String>;
}

pub fn build_prompt(transcript: &str) -> String {
    format!("Summarize this text: {transcript}")
}

/// Chat-completion client for OpenRouter (or any OpenAI-compatible endpoint)
#[derive(Debug, Clone)]
pub struct OpenRouter {
    client: reqwest::Client,
    config: LlmConfig,
}

impl OpenRouter {
    pub fn new(client: reqwest::Client, config: LlmConfig) -> Self {
        Self { client, config }
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl Summarizer for OpenRouter {
    async fn summarize(&self, transcript: &str) -> Result<String> {
        let model = &self.config.model;
        debug!("Summarizing {} chars via {} with model {model}", transcript.len(), self.config.base_url);

        let body = serde_json::json!({
            "model": model,
            "messages": [
                {
                    "role": "user",
                    "content": build_prompt(transcript)
                }
            ]
        });

        let mut req = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&body);

        // Attribution headers are optional on OpenRouter
        if let Some(ref site_url) = self.config.site_url {
            req = req.header("HTTP-Referer", site_url);
        }
        if let Some(ref site_name) = self.config.site_name {
            req = req.header("X-Title", site_name);
        }

        let resp = req.send().await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            bail!("OpenRouter API returned {status}: {body}");
        }

        let json: serde_json::Value = resp.json().await?;
        extract_completion_text(&json)
    }
}

/// First choice's message content, surrounding whitespace removed
fn extract_completion_text(json: &serde_json::Value) -> Result<String> {
    if let Some(text) = json
        .get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|t| t.as_str())
    {
        return Ok(text.trim().to_string());
    }

    // OpenRouter reports upstream failures inside a 200 body
    if let Some(message) = json.get("error").and_then(|e| e.get("message")).and_then(|m| m.as_str()) {
        bail!("OpenRouter API error: {message}");
    }

    bail!("unexpected chat completion response format");
}
