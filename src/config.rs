use std::path::PathBuf;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::artifact::apply::FileIdentity;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    pub project: ProjectConfig,
    pub chat: ChatConfig,
    #[serde(default)]
    pub reconcile: ReconcileConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    pub model: String,
    /// Oldest turns are dropped from the prompt beyond this many messages.
    #[serde(default = "default_max_history")]
    pub max_history: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReconcileConfig {
    /// How reconciled file changes are matched to workspace entries.
    #[serde(default)]
    pub identity: FileIdentity,
}

fn default_max_history() -> usize {
    40
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            project: ProjectConfig {
                name: "webspark-project".to_string(),
                description: "A webspark prototyping session".to_string(),
            },
            chat: ChatConfig {
                model: crate::util::get_default_chat_model(),
                max_history: default_max_history(),
            },
            reconcile: ReconcileConfig::default(),
        }
    }
}

pub fn load_config(config_path: &PathBuf) -> anyhow::Result<WorkspaceConfig> {
    if !config_path.exists() {
        return Ok(WorkspaceConfig::default());
    }

    let content = std::fs::read_to_string(config_path)
        .context("Failed to read webspark.yaml")?;

    let config: WorkspaceConfig = serde_yaml::from_str(&content)
        .context("Failed to parse webspark.yaml")?;

    Ok(config)
}

pub fn save_config(config: &WorkspaceConfig, config_path: &PathBuf) -> anyhow::Result<()> {
    let content = serde_yaml::to_string(config)
        .context("Failed to serialize config")?;

    std::fs::write(config_path, content)
        .context("Failed to write webspark.yaml")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config(&dir.path().join("webspark.yaml")).unwrap();
        assert_eq!(cfg.project.name, "webspark-project");
        assert_eq!(cfg.reconcile.identity, FileIdentity::BareName);
        assert_eq!(cfg.chat.max_history, 40);
    }

    #[test]
    fn yaml_overrides_model_and_identity() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("webspark.yaml");
        std::fs::write(
            &path,
            "project:\n  name: demo\n  description: d\nchat:\n  model: llama3\nreconcile:\n  identity: full-path\n",
        )
        .unwrap();
        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.chat.model, "llama3");
        assert_eq!(cfg.reconcile.identity, FileIdentity::FullPath);
    }

    #[test]
    fn round_trips_through_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("webspark.yaml");
        let cfg = WorkspaceConfig::default();
        save_config(&cfg, &path).unwrap();
        let loaded = load_config(&path).unwrap();
        assert_eq!(loaded.project.name, cfg.project.name);
    }
}
