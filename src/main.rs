mod artifact;
mod cmd;
mod common;
mod config;
mod util;
mod workspace;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "webspark", version, about = "Chat-driven web app prototyping", long_about = None, disable_help_subcommand = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new webspark project with scaffolded structure
    New {
        /// Project directory to create
        path: String,
        /// Also write the seed workspace files to disk
        #[arg(long)]
        template: bool,
    },
    /// Manage the stored OpenAI API key
    Auth {
        /// Prompt for and store an OpenAI API key
        #[arg(long)]
        set_openai_key: bool,
        /// Remove any stored OpenAI API key
        #[arg(long)]
        unset_openai_key: bool,
    },
    /// Start an interactive chat session against the in-memory workspace
    Chat {
        /// Working directory (where webspark.yaml lives)
        #[arg(long, default_value = ".")]
        cwd: String,
        /// Model override (default comes from webspark.yaml or config)
        #[arg(long, default_value = "")]
        model: String,
        /// Enable debug logging to .webspark.log
        #[arg(long)]
        debug: bool,
    },
    /// Verify the provider and model are reachable
    Check {
        /// Working directory (where webspark.yaml lives)
        #[arg(long, default_value = ".")]
        cwd: String,
        /// Model override
        #[arg(long, default_value = "")]
        model: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::New { path, template } => cmd::new::handle_new(path, template),
        Commands::Auth { set_openai_key, unset_openai_key } => {
            cmd::auth::handle_auth(set_openai_key, unset_openai_key)
        }
        Commands::Chat { cwd, model, debug } => cmd::chat::handle_chat(cwd, model, debug),
        Commands::Check { cwd, model } => cmd::chat::handle_check(cwd, model),
    }
}
