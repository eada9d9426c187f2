pub mod console;
pub mod logging;
pub mod network;
pub mod prompts;

use std::path::Path;

use anyhow::Result;

use crate::artifact::apply::{Applied, apply_changes_with_report};
use crate::artifact::parse::{parse_artifacts_with_stats, strip_artifacts};
use crate::cmd::chat::console::Console;
use crate::cmd::chat::logging::{debug_log, init_debug_logging};
use crate::cmd::chat::network::{ChatMessage, send_chat};
use crate::cmd::chat::prompts::build_system_prompt;
use crate::common::network::{ProviderKind, detect_provider};
use crate::config::load_config;
use crate::util::get_openai_api_key_from_env_or_config;
use crate::workspace::{self, ProjectFile};

const GREETING: &str = "Hello! I'm WebSpark AI. How can I help you improve your application today?";

/// Interactive chat session against the in-memory workspace.
///
/// One round trip at a time: the prompt blocks until the previous reply has
/// been parsed and reconciled, so no two reconciliation passes can overlap
/// against the same file collection.
pub fn handle_chat(cwd: String, model: String, debug: bool) -> Result<()> {
    let cwd_path = Path::new(&cwd);
    let cwd_abs = cwd_path.canonicalize().unwrap_or_else(|_| cwd_path.to_path_buf());

    let mut config = load_config(&cwd_abs.join("webspark.yaml"))?;
    if !model.is_empty() && model != config.chat.model {
        config.chat.model = model;
    }

    let debug_file = init_debug_logging(&cwd_abs, debug)?;
    let provider = detect_provider();
    let api_key = get_openai_api_key_from_env_or_config().unwrap_or_default();
    if provider == ProviderKind::OpenAi && api_key.is_empty() {
        anyhow::bail!(
            "no OpenAI API key configured; run `webspark auth --set-openai-key` or set OPENAI_API_KEY"
        );
    }

    let console = Console::new();
    let mut files = workspace::seed_files();
    let mut history: Vec<ChatMessage> = vec![ChatMessage::assistant(GREETING)];

    console.section(&format!("{} — chat", config.project.name));
    console.info(GREETING);
    console.hint("Type a request, or :help for session commands.");

    loop {
        let Some(line) = console.read_input() else { break };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(command) = line.strip_prefix(':') {
            if !run_session_command(command, &files, &console) {
                break;
            }
            continue;
        }

        history.push(ChatMessage::user(line));
        trim_history(&mut history, config.chat.max_history);

        let system_prompt = build_system_prompt(&files);
        let spinner = console.spinner("waiting for the model...");
        let reply = send_chat(
            provider,
            &api_key,
            &config.chat.model,
            &system_prompt,
            &history,
            &debug_file,
        );
        spinner.finish_and_clear();

        let raw = match reply {
            Ok(raw) => raw,
            Err(e) => {
                // A failed round trip is its own conversational message so
                // the user can tell it apart from "no file changes".
                console.error(&format!("{e}"));
                debug_log(&debug_file, &format!("[ai] round trip failed: {e}"));
                history.pop();
                continue;
            }
        };

        let (changes, stats) = parse_artifacts_with_stats(&raw);
        debug_log(&debug_file, &format!("[parse] {:?}", stats));
        if !stats.is_clean() {
            debug_log(
                &debug_file,
                &format!(
                    "[parse] skipped fragments: {} discarded actions, {} dangling artifact tags, {} dangling action tags",
                    stats.discarded, stats.dangling_artifact_tags, stats.dangling_action_tags
                ),
            );
        }

        let prose = strip_artifacts(&raw);
        if !prose.is_empty() {
            console.assistant(&prose);
        }

        if changes.is_empty() {
            if prose.is_empty() {
                console.hint("(the model sent no prose and no file changes)");
            }
        } else {
            let (next, outcomes) =
                apply_changes_with_report(&files, &changes, config.reconcile.identity);
            console.info(&format!(
                "{} file change{} applied:",
                outcomes.len(),
                if outcomes.len() == 1 { "" } else { "s" }
            ));
            for outcome in &outcomes {
                match &outcome.applied {
                    Applied::Created => console.file_created(&outcome.name),
                    Applied::Updated { previous } => {
                        console.file_updated(&outcome.name);
                        let current = workspace::find(&next, &outcome.name)
                            .map(|f| f.content.as_str())
                            .unwrap_or_default();
                        console.diff(previous, current);
                    }
                }
            }
            files = next;
        }

        history.push(ChatMessage::assistant(raw));
    }

    Ok(())
}

/// Handle a `:`-prefixed session command. Returns false when the session
/// should end.
fn run_session_command(command: &str, files: &[ProjectFile], console: &Console) -> bool {
    let words = shlex::split(command).unwrap_or_default();
    match words.first().map(|s| s.as_str()) {
        Some("quit") | Some("q") | Some("exit") => return false,
        Some("help") | None => {
            console.info(":files            list workspace files");
            console.info(":show <name>      print one file with highlighting");
            console.info(":export <dir>     write the workspace to disk");
            console.info(":quit             end the session");
        }
        Some("files") => {
            for f in files {
                console.info(&format!("  {:<24} {:>6} bytes", f.name, f.content.len()));
            }
        }
        Some("show") => match words.get(1) {
            Some(name) => match workspace::find(files, name) {
                Some(file) => console.show_file(file),
                None => console.warning(&format!("no file named '{}'; see :files", name)),
            },
            None => console.warning("usage: :show <name>"),
        },
        Some("export") => match words.get(1) {
            Some(dir) => match workspace::export_files(files, Path::new(dir)) {
                Ok(n) => console.info(&format!("wrote {} files to {}", n, dir)),
                Err(e) => console.error(&format!("export failed: {e:#}")),
            },
            None => console.warning("usage: :export <dir>"),
        },
        Some(other) => console.warning(&format!("unknown command ':{}'; try :help", other)),
    }
    true
}

fn trim_history(history: &mut Vec<ChatMessage>, max_history: usize) {
    if max_history > 0 && history.len() > max_history {
        let excess = history.len() - max_history;
        history.drain(..excess);
    }
}

/// Provider/model preflight for `webspark check`.
pub fn handle_check(cwd: String, model: String) -> Result<()> {
    let cwd_path = Path::new(&cwd);
    let cwd_abs = cwd_path.canonicalize().unwrap_or_else(|_| cwd_path.to_path_buf());
    let config = load_config(&cwd_abs.join("webspark.yaml"))?;

    let effective_model = if !model.is_empty() && model != config.chat.model {
        model
    } else {
        config.chat.model
    };

    let client = crate::common::network::default_client(10)?;
    let provider = detect_provider();
    let api_key = get_openai_api_key_from_env_or_config();
    crate::common::network::preflight_check(&client, provider, &effective_model, api_key.as_deref())?;
    println!("Chat preflight passed for model '{}'.", effective_model);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn history_trim_drops_oldest_turns() {
        let mut history: Vec<ChatMessage> =
            (0..10).map(|i| ChatMessage::user(format!("m{i}"))).collect();
        trim_history(&mut history, 4);
        assert_eq!(history.len(), 4);
        assert_eq!(history[0].content, "m6");
    }

    #[test]
    fn history_trim_is_noop_under_cap() {
        let mut history = vec![ChatMessage::user("only")];
        trim_history(&mut history, 40);
        assert_eq!(history.len(), 1);
    }

    // End-to-end shape of one reconciliation pass, short of the network:
    // raw model text in, updated workspace out.
    #[test]
    fn raw_reply_to_workspace_round() {
        let raw = "Tweaking the counter.\n<boltArtifact id=\"edit\" title=\"Edit\"><boltAction type=\"file\" filePath=\"src/App.tsx\">export default function App() { return null }</boltAction><boltAction type=\"file\" filePath=\"src/theme.css\">body { color: red }</boltAction></boltArtifact>";
        let files = workspace::seed_files();

        let (changes, stats) = parse_artifacts_with_stats(raw);
        assert!(stats.is_clean());
        assert_eq!(changes.len(), 2);
        assert_eq!(strip_artifacts(raw), "Tweaking the counter.");

        let (next, outcomes) = apply_changes_with_report(
            &files,
            &changes,
            crate::artifact::apply::FileIdentity::BareName,
        );
        assert_eq!(next.len(), files.len() + 1);
        assert!(matches!(outcomes[0].applied, Applied::Updated { .. }));
        assert!(matches!(outcomes[1].applied, Applied::Created));
        assert_eq!(
            workspace::find(&next, "App.tsx").unwrap().content,
            "export default function App() { return null }"
        );
    }
}
