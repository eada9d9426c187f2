use std::path::{Component, Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// One file in the working set. `name` is the workspace identity (a bare
/// file name by default, a normalized path in full-path mode) and is unique
/// within a collection; `content` is always the complete text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectFile {
    pub name: String,
    pub content: String,
}

pub fn find<'a>(files: &'a [ProjectFile], name: &str) -> Option<&'a ProjectFile> {
    files.iter().find(|f| f.name == name)
}

/// Writes the collection to `dir`, creating intermediate directories for
/// path-shaped names. Names that are absolute or contain parent traversal
/// are refused outright; the generator controls these strings, so they are
/// not trusted near the filesystem.
pub fn export_files(files: &[ProjectFile], dir: &Path) -> Result<usize> {
    for f in files {
        validate_export_name(&f.name)?;
    }

    std::fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    for f in files {
        let dest = dir.join(&f.name);
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create {}", parent.display()))?;
        }
        std::fs::write(&dest, &f.content).with_context(|| format!("write {}", dest.display()))?;
    }
    Ok(files.len())
}

fn validate_export_name(name: &str) -> Result<()> {
    let p = Path::new(name);
    if p.is_absolute() || name.contains(':') {
        anyhow::bail!("absolute path not allowed: {name}");
    }
    if p.components().any(|c| matches!(c, Component::ParentDir)) {
        anyhow::bail!("parent traversal not allowed: {name}");
    }
    if name.trim().is_empty() {
        anyhow::bail!("empty file name");
    }
    Ok(())
}

/// The Vite + React starter every session begins from.
pub fn seed_files() -> Vec<ProjectFile> {
    vec![
        ProjectFile {
            name: "App.tsx".to_string(),
            content: SEED_APP_TSX.trim_start().to_string(),
        },
        ProjectFile {
            name: "main.tsx".to_string(),
            content: SEED_MAIN_TSX.trim_start().to_string(),
        },
        ProjectFile {
            name: "index.css".to_string(),
            content: SEED_INDEX_CSS.trim_start().to_string(),
        },
        ProjectFile {
            name: "package.json".to_string(),
            content: SEED_PACKAGE_JSON.trim_start().to_string(),
        },
    ]
}

const SEED_APP_TSX: &str = r#"
import { useState } from 'react';
import reactLogo from './assets/react.svg';
import viteLogo from '/vite.svg';
import './App.css';

function App() {
  const [count, setCount] = useState(0);

  return (
    <>
      <div>
        <a href="https://vitejs.dev" target="_blank">
          <img src={viteLogo} className="logo" alt="Vite logo" />
        </a>
        <a href="https://react.dev" target="_blank">
          <img src={reactLogo} className="logo react" alt="React logo" />
        </a>
      </div>
      <h1>Vite + React</h1>
      <div className="card">
        <button onClick={() => setCount((count) => count + 1)}>
          count is {count}
        </button>
        <p>
          Edit <code>src/App.tsx</code> and save to test HMR
        </p>
      </div>
      <p className="read-the-docs">
        Click on the Vite and React logos to learn more
      </p>
    </>
  );
}

export default App;
"#;

const SEED_MAIN_TSX: &str = r#"
import React from 'react'
import ReactDOM from 'react-dom/client'
import App from './App.tsx'
import './index.css'

ReactDOM.createRoot(document.getElementById('root')!).render(
  <React.StrictMode>
    <App />
  </React.StrictMode>,
)
"#;

const SEED_INDEX_CSS: &str = r#"
@tailwind base;
@tailwind components;
@tailwind utilities;

:root {
  font-family: Inter, system-ui, Avenir, Helvetica, Arial, sans-serif;
  line-height: 1.5;
  font-weight: 400;

  color-scheme: light dark;
  color: rgba(255, 255, 255, 0.87);
  background-color: #242424;
}

body {
  margin: 0;
  display: flex;
  place-items: center;
  min-width: 320px;
  min-height: 100vh;
}
"#;

const SEED_PACKAGE_JSON: &str = r#"
{
  "name": "vite-react-typescript-starter",
  "private": true,
  "version": "0.0.0",
  "type": "module",
  "scripts": {
    "dev": "vite",
    "build": "vite build",
    "lint": "eslint .",
    "preview": "vite preview"
  },
  "dependencies": {
    "react": "^18.2.0",
    "react-dom": "^18.2.0"
  }
}
"#;
