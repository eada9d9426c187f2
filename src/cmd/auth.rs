use anyhow::Result;

use crate::common::network::{ProviderKind, detect_provider};
use crate::util::{
    get_openai_api_key_from_env_or_config, set_openai_api_key_in_config, sym_check, sym_question,
    unset_openai_api_key_in_config,
};

pub fn handle_auth(set_openai_key: bool, unset_openai_key: bool) -> Result<()> {
    let ce = crate::util::color_enabled_stdout();

    if set_openai_key {
        println!("Enter your OpenAI API key (or set OPENAI_API_KEY):");
        let key = match rpassword::read_password() {
            Ok(k) => {
                if k.trim().is_empty() {
                    std::env::var("OPENAI_API_KEY").unwrap_or_default()
                } else {
                    k
                }
            }
            Err(_) => std::env::var("OPENAI_API_KEY").unwrap_or_default(),
        };
        if key.trim().is_empty() {
            anyhow::bail!("OpenAI API key cannot be empty");
        }
        set_openai_api_key_in_config(&key)?;
        println!("{} OpenAI API key saved to local config.", sym_check(ce));
        return Ok(());
    }

    if unset_openai_key {
        unset_openai_api_key_in_config()?;
        println!("{} Removed stored OpenAI API key.", sym_check(ce));
        return Ok(());
    }

    // Status view
    match detect_provider() {
        ProviderKind::Ollama => {
            println!("{} Provider: ollama (no API key required).", sym_check(ce));
        }
        ProviderKind::OpenAi => match get_openai_api_key_from_env_or_config() {
            Some(key) => {
                let masked = if key.len() > 8 { format!("{}...", &key[..8]) } else { "...".to_string() };
                println!("{} OpenAI API key detected: {}", sym_check(ce), masked);
            }
            None => {
                println!(
                    "{} No OpenAI API key detected. Chat won't be available until a key is set.",
                    sym_question(ce)
                );
                println!("   You can set one with: webspark auth --set-openai-key");
            }
        },
    }
    Ok(())
}
