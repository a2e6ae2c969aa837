//! Completion service client: trait seam + OpenRouter-compatible chat completions.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub const DEFAULT_COMPLETION_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_COMPLETION_MODEL: &str = "meta-llama/llama-4-scout:free";

/// A chat-completion backend.
///
/// `Ok(None)` means the service answered but produced no usable text;
/// `Err` means the call itself failed (transport, unparseable body).
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, system: &str, user: &str) -> Result<Option<String>>;
    /// Provider name for diagnostics.
    fn name(&self) -> &'static str;
}

#[derive(Serialize)]
struct Msg<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct Req<'a> {
    model: &'a str,
    messages: Vec<Msg<'a>>,
}

#[derive(Deserialize)]
struct Resp {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<ChoiceMsg>,
}

#[derive(Deserialize)]
struct ChoiceMsg {
    content: Option<String>,
}

/// First choice's message text, if it is non-empty.
fn primary_content(resp: Resp) -> Option<String> {
    resp.choices
        .into_iter()
        .next()
        .and_then(|c| c.message)
        .and_then(|m| m.content)
        .filter(|s| !s.is_empty())
}

/// Chat Completions over HTTP with bearer auth.
pub struct ChatCompletionClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl ChatCompletionClient {
    pub fn new(
        endpoint: String,
        api_key: String,
        model: String,
        timeout: Duration,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent("ai-discovery-digest/0.1")
            .connect_timeout(Duration::from_secs(10))
            .timeout(timeout)
            .build()
            .context("building completion http client")?;
        Ok(Self {
            http,
            endpoint,
            api_key,
            model,
        })
    }
}

#[async_trait]
impl CompletionClient for ChatCompletionClient {
    async fn complete(&self, system: &str, user: &str) -> Result<Option<String>> {
        let req = Req {
            model: &self.model,
            messages: vec![
                Msg {
                    role: "system",
                    content: system,
                },
                Msg {
                    role: "user",
                    content: user,
                },
            ],
        };

        let resp = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .header("HTTP-Referer", "https://yourdomain.com")
            .header("X-Title", "AI Discovery Agent")
            .json(&req)
            .send()
            .await
            .context("completion request")?;

        let status = resp.status();
        let body = resp.text().await.context("completion response body")?;
        if !status.is_success() {
            tracing::error!(%status, body = %truncate(&body, 300), "completion service error");
        }

        let parsed: Resp = serde_json::from_str(&body)
            .with_context(|| format!("completion response is not valid JSON (status {status})"))?;
        Ok(primary_content(parsed))
    }

    fn name(&self) -> &'static str {
        "openrouter"
    }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
