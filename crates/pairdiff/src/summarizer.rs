//! Summaries from a local OpenAI-compatible model server (e.g. GPT4All)

use crate::config::SummaryConfig;
use pairdiff_core::{build_prompt, SummarizeError, Summarizer};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use ureq::tls::{RootCerts, TlsConfig, TlsProvider};
use ureq::Agent;

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ReplyMessage>,
    /// Plain completion servers answer with `text` instead of `message`
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: String,
}

/// Summarizer backed by a `/chat/completions` endpoint
pub struct LocalModelSummarizer {
    agent: Agent,
    url: String,
    model: String,
    max_tokens: u32,
}

impl LocalModelSummarizer {
    pub fn new(config: &SummaryConfig) -> Self {
        let tls_config = TlsConfig::builder()
            .provider(TlsProvider::NativeTls)
            .root_certs(RootCerts::PlatformVerifier)
            .build();

        let agent: Agent = Agent::config_builder()
            .tls_config(tls_config)
            .timeout_global(Some(Duration::from_secs(config.timeout_secs)))
            .build()
            .into();

        Self {
            agent,
            url: format!("{}/chat/completions", config.endpoint.trim_end_matches('/')),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn request_body(&self, prompt: &str) -> Result<Vec<u8>, SummarizeError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: self.max_tokens,
            temperature: 0.2,
        };
        serde_json::to_vec(&request).map_err(|e| SummarizeError::Failed(format!("cannot encode request: {e}")))
    }
}

/// Extract the reply text from a chat completions response body
fn parse_reply(body: &str) -> Result<String, SummarizeError> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| SummarizeError::Failed(format!("malformed reply: {e}")))?;

    let text = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.map(|m| m.content).or(choice.text))
        .unwrap_or_default();

    let text = text.trim();
    if text.is_empty() {
        return Err(SummarizeError::Failed("empty reply".to_string()));
    }
    Ok(text.to_string())
}

impl Summarizer for LocalModelSummarizer {
    fn name(&self) -> &str {
        &self.model
    }

    fn summarize(&self, file: &str, digest: &str) -> Result<String, SummarizeError> {
        let body = self.request_body(&build_prompt(file, digest))?;
        tracing::debug!(url = %self.url, file, bytes = body.len(), "requesting summary");

        let mut response = self
            .agent
            .post(&self.url)
            .header("Content-Type", "application/json")
            .send(&body[..])
            .map_err(|e| SummarizeError::Unavailable(format!("{}: {e}", self.url)))?;

        let reply = response
            .body_mut()
            .read_to_string()
            .map_err(|e| SummarizeError::Failed(format!("cannot read reply: {e}")))?;

        parse_reply(&reply)
    }
}
