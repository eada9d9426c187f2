use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Optional OpenAI API key for chat sessions
    pub openai_api_key: Option<String>,
    /// Provider selection: "openai" or "ollama"
    #[serde(default)]
    pub provider: Option<String>,
    /// Base URL for Ollama when provider is "ollama"
    #[serde(default)]
    pub ollama_base_url: Option<String>,
    /// Default model for the chat command
    #[serde(default)]
    pub default_chat_model: Option<String>,
}

pub fn load_app_config() -> Result<AppConfig> {
    let cfg: AppConfig = confy::load("webspark", None).context("failed to load config")?;
    Ok(cfg)
}

pub fn save_app_config(cfg: &AppConfig) -> Result<()> {
    confy::store("webspark", None, cfg).context("failed to save config")?;
    Ok(())
}

use owo_colors::OwoColorize;
use supports_color::Stream;

pub fn color_enabled_stdout() -> bool {
    supports_color::on(Stream::Stdout).is_some()
}

pub fn sym_check(enabled: bool) -> String {
    if enabled { format!("{}", "✔".green().bold()) } else { "✔".to_string() }
}

pub fn sym_question(enabled: bool) -> String {
    if enabled { format!("{}", "?".cyan().bold()) } else { "?".to_string() }
}

/// Resolve an OpenAI API key from environment or stored config
pub fn get_openai_api_key_from_env_or_config() -> Option<String> {
    if let Ok(k) = std::env::var("OPENAI_API_KEY") {
        let k = k.trim().to_string();
        if !k.is_empty() {
            return Some(k);
        }
    }
    if let Ok(cfg) = load_app_config() {
        if let Some(k) = cfg.openai_api_key.as_ref() {
            if !k.trim().is_empty() {
                return Some(k.trim().to_string());
            }
        }
    }
    None
}

/// Persist an OpenAI API key into the local config (never written to the project)
pub fn set_openai_api_key_in_config(secret: &str) -> Result<()> {
    let mut cfg = load_app_config().unwrap_or_default();
    cfg.openai_api_key = Some(secret.trim().to_string());
    save_app_config(&cfg)
}

/// Remove any stored OpenAI API key from the local config
pub fn unset_openai_api_key_in_config() -> Result<()> {
    let mut cfg = load_app_config().unwrap_or_default();
    cfg.openai_api_key = None;
    save_app_config(&cfg)
}

/// Resolve the default chat model from persisted config or fall back.
pub fn get_default_chat_model() -> String {
    load_app_config()
        .ok()
        .and_then(|c| c.default_chat_model)
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| "gpt-4o-mini".to_string())
}
