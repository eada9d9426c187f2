use std::fs;
use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::{WorkspaceConfig, save_config};
use crate::workspace;

pub fn handle_new(path: String, template: bool) -> Result<()> {
    let project_path = Path::new(&path);
    if project_path.exists() {
        anyhow::bail!("path already exists: {}", project_path.display());
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::with_template("{spinner} scaffolding project...").unwrap());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));

    fs::create_dir_all(project_path).with_context(|| "failed to create project dir")?;

    fs::write(project_path.join("README.md"), "# New Webspark Project\n")?;
    fs::write(project_path.join(".gitignore"), ".DS_Store\n/node_modules\n.env\n.webspark.log\n")?;

    let mut config = WorkspaceConfig::default();
    if let Some(name) = project_path.file_name().and_then(|n| n.to_str()) {
        config.project.name = name.to_string();
    }
    save_config(&config, &project_path.join("webspark.yaml"))?;

    // Optionally materialize the seed workspace so the starting point is
    // visible on disk.
    if template {
        workspace::export_files(&workspace::seed_files(), project_path)?;
    }

    // Initialize git repository
    Command::new("git").arg("init").current_dir(project_path).output().context("git init failed")?;
    Command::new("git").args(["add", "."]).current_dir(project_path).output().ok();
    Command::new("git").args(["commit", "-m", "chore: initial scaffold"]).current_dir(project_path).output().ok();

    pb.finish_with_message("done");
    println!("{} Created project at {}", "✔".green().bold(), project_path.display());

    Ok(())
}
