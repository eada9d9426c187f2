use std::path::PathBuf;

use serde::Serialize;
use serde_json::json;

use crate::cmd::chat::logging::debug_log;
use crate::common::network::{
    GeneratorError, ProviderKind, ollama_chat_url, openai_chat_url, parse_chat_text,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role { User, Assistant }

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        ChatMessage { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        ChatMessage { role: Role::Assistant, content: content.into() }
    }
}

const MAX_ATTEMPTS: u32 = 3;

/// One generator round trip: conversation in, free text out.
///
/// No schema is enforced on the reply beyond what the prompt asks for; the
/// caller hands whatever comes back to the artifact scanner. Transport
/// errors retry with backoff; API and empty-body failures surface
/// immediately so the session can show them as their own message.
pub fn send_chat(
    provider: ProviderKind,
    api_key: &str,
    model: &str,
    system_prompt: &str,
    history: &[ChatMessage],
    debug_file: &Option<PathBuf>,
) -> Result<String, GeneratorError> {
    if provider == ProviderKind::OpenAi && api_key.trim().is_empty() {
        return Err(GeneratorError::MissingKey);
    }

    let url = match provider {
        ProviderKind::OpenAi => openai_chat_url(),
        ProviderKind::Ollama => ollama_chat_url(),
    };

    let mut messages = vec![json!({"role": "system", "content": system_prompt})];
    for m in history {
        messages.push(serde_json::to_value(m).unwrap_or_default());
    }

    debug_log(debug_file, &format!("[ai] system prompt length: {} chars", system_prompt.len()));
    debug_log(debug_file, &format!("[ai] history length: {} messages", history.len()));

    let client = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(300))
        .build()?;

    let mut attempts = 0;
    let resp = loop {
        attempts += 1;
        debug_log(debug_file, &format!("[ai] request attempt {}/{}", attempts, MAX_ATTEMPTS));

        let mut req = client.post(&url).json(&json!({
            "model": model,
            "messages": messages,
            "stream": false
        }));
        if provider == ProviderKind::OpenAi {
            req = req.bearer_auth(api_key);
        }

        match req.send() {
            Ok(response) => break response,
            Err(e) => {
                if attempts >= MAX_ATTEMPTS {
                    return Err(GeneratorError::Transport(e));
                }
                debug_log(debug_file, &format!("[ai] attempt {} failed: {}, retrying...", attempts, e));
                std::thread::sleep(std::time::Duration::from_secs(2 * attempts as u64));
            }
        }
    };

    let status = resp.status();
    debug_log(debug_file, &format!("[ai] status: {}", status));
    if !status.is_success() {
        let body = resp.text().unwrap_or_default();
        return Err(GeneratorError::Api { status, body });
    }

    let body: serde_json::Value = resp.json()?;
    match parse_chat_text(&body) {
        Some(text) => {
            debug_log(debug_file, &format!("[ai] reply length: {} chars", text.len()));
            Ok(text)
        }
        None => Err(GeneratorError::EmptyResponse),
    }
}
