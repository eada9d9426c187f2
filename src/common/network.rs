use std::env;

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use serde_json::Value;
use thiserror::Error;

use crate::util::load_app_config;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind { OpenAi, Ollama }

/// Failures from the generator round trip. These must stay distinguishable
/// from "the model produced no file changes": a transport or API error is
/// shown to the user as its own conversational message, never swallowed
/// into an empty change set.
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("could not reach the generator: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("generator API error ({status}): {body}")]
    Api { status: reqwest::StatusCode, body: String },
    #[error("generator response carried no message content")]
    EmptyResponse,
    #[error("no OpenAI API key configured; run `webspark auth --set-openai-key` or set OPENAI_API_KEY")]
    MissingKey,
}

pub fn detect_provider() -> ProviderKind {
    let env_pick = env::var("WEBSPARK_PROVIDER").unwrap_or_default().to_lowercase();
    if env_pick == "ollama" { return ProviderKind::Ollama; }
    if env_pick == "openai" { return ProviderKind::OpenAi; }
    if let Ok(cfg) = load_app_config() {
        if let Some(p) = cfg.provider.as_deref() {
            if p.eq_ignore_ascii_case("ollama") { return ProviderKind::Ollama; }
            return ProviderKind::OpenAi;
        }
    }
    ProviderKind::OpenAi
}

pub fn default_client(timeout_secs: u64) -> Result<Client> {
    Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .context("create http client")
}

pub fn openai_chat_url() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

pub fn ollama_chat_url() -> String {
    let base = env::var("OLLAMA_BASE_URL").ok().filter(|s| !s.trim().is_empty()).or_else(|| {
        load_app_config().ok().and_then(|c| c.ollama_base_url)
    }).unwrap_or_else(|| "http://localhost:11434/v1".to_string());
    format!("{}/chat/completions", base.trim_end_matches('/'))
}

/// Pulls the assistant text out of an OpenAI-compatible Chat Completions
/// body. Both providers speak this shape.
pub fn parse_chat_text(body: &Value) -> Option<String> {
    body.get("choices")
        .and_then(|v| v.as_array())
        .and_then(|arr| arr.first())
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
}

/// Preflight check to validate the current provider configuration.
/// Sends a one-token generation and fails loudly on any non-success.
pub fn preflight_check(client: &Client, provider: ProviderKind, model: &str, api_key: Option<&str>) -> Result<()> {
    let (url, needs_key) = match provider {
        ProviderKind::OpenAi => (openai_chat_url(), true),
        ProviderKind::Ollama => (ollama_chat_url(), false),
    };

    let mut req = client.post(&url).json(&serde_json::json!({
        "model": model,
        "messages": [{"role": "system", "content": "ping"}, {"role": "user", "content": "ping"}],
        "stream": false,
        "max_tokens": 1
    }));
    if needs_key {
        let key = api_key.filter(|k| !k.trim().is_empty());
        match key {
            Some(k) => req = req.bearer_auth(k),
            None => anyhow::bail!("{}", GeneratorError::MissingKey),
        }
    }

    let resp = req.send().context("preflight request")?;
    if !resp.status().is_success() {
        let status = resp.status();
        let text = resp.text().unwrap_or_default();
        anyhow::bail!("preflight failed: {} {}", status, text);
    }
    Ok(())
}
