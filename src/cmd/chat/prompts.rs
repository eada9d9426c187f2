use crate::workspace::ProjectFile;

/// Persona line shared across prompt variants.
pub const BASE_PROMPT: &str = "You are an expert full-stack web developer used to working with React, Vite, and Tailwind CSS. You are helping a user build a web application in an in-memory workspace.";

/// The markup contract handed to the generator. This text is the protocol:
/// its grammar is exactly what the artifact scanner consumes, so the two
/// must move together.
const ARTIFACT_CONTRACT: &str = r#"IMPORTANT: You must output your changes in a structured format that can be parsed programmatically.
Use the following XML-like structure for artifacts:

<boltArtifact id="project-import" title="Project Files">
  <boltAction type="file" filePath="src/App.tsx">
    // content of the file
  </boltAction>
  <boltAction type="file" filePath="src/components/SomeComponent.tsx">
    // content...
  </boltAction>
</boltArtifact>

Rules:
1. Always use <boltArtifact> and <boltAction> tags.
2. For 'filePath', use relative paths from the project root (e.g., 'src/App.tsx').
3. Provide the COMPLETE file content in the <boltAction>, do not use placeholders or diffs.
4. If you are creating a new file, simply specify the new filePath.
5. If you are deleting a file, you can't explicitly do that yet, so just empty it or ignore.
6. Be concise in your explanations outside the artifacts."#;

/// Build the system prompt for a chat round trip, embedding a snapshot of
/// the current workspace so the generator edits real content rather than
/// guessing at it.
pub fn build_system_prompt(files: &[ProjectFile]) -> String {
    format!(
        "{}\nYou will be given a user request and the current project files.\nYour goal is to update the code based on the user's request.\n\n{}\n\nCurrent project files:\n\n{}",
        BASE_PROMPT,
        ARTIFACT_CONTRACT,
        workspace_snapshot(files),
    )
}

fn workspace_snapshot(files: &[ProjectFile]) -> String {
    let mut snapshot = String::new();
    for f in files {
        snapshot.push_str(&format!("=== {} ===\n", f.name));
        snapshot.push_str(&f.content);
        if !f.content.ends_with('\n') {
            snapshot.push('\n');
        }
        snapshot.push('\n');
    }
    snapshot
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workspace::seed_files;

    #[test]
    fn system_prompt_carries_grammar_and_rules() {
        let prompt = build_system_prompt(&seed_files());
        assert!(prompt.contains("<boltArtifact"));
        assert!(prompt.contains("<boltAction type=\"file\""));
        assert!(prompt.contains("COMPLETE file content"));
        assert!(prompt.contains("can't explicitly do that yet"));
    }

    #[test]
    fn system_prompt_embeds_every_workspace_file() {
        let files = seed_files();
        let prompt = build_system_prompt(&files);
        for f in &files {
            assert!(prompt.contains(&format!("=== {} ===", f.name)));
        }
    }
}
