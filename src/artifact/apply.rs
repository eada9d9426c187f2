use serde::{Deserialize, Serialize};

use super::FileChange;
use crate::workspace::ProjectFile;

/// How a change's `file_path` is resolved to a workspace entry.
///
/// `BareName` is the historical behavior: only the final path segment is
/// compared, so `src/App.tsx` and `lib/App.tsx` collide. `FullPath` keys by
/// the normalized slash path instead. Configured per project via
/// `webspark.yaml`; bare-name stays the default for compatibility.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileIdentity {
    #[default]
    BareName,
    FullPath,
}

/// What the reconciler did with one change record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    Created,
    Updated { previous: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeOutcome {
    pub name: String,
    pub applied: Applied,
}

/// Merges parsed changes into the workspace, copy-on-write.
///
/// The input collection is never mutated; a new collection is returned.
/// Each change either replaces the content of the entry with the same
/// identity (keeping its position) or appends a new entry at the end.
/// Changes apply in sequence order, so within one call the last change
/// targeting a given identity wins. An empty change set returns an
/// equivalent copy.
pub fn apply_changes(
    current: &[ProjectFile],
    changes: &[FileChange],
    identity: FileIdentity,
) -> Vec<ProjectFile> {
    apply_changes_with_report(current, changes, identity).0
}

/// Same as [`apply_changes`] but also reports, per change, whether the
/// target was created or updated (with the content it replaced). The chat
/// surface uses the report to render per-file summaries and diffs.
pub fn apply_changes_with_report(
    current: &[ProjectFile],
    changes: &[FileChange],
    identity: FileIdentity,
) -> (Vec<ProjectFile>, Vec<ChangeOutcome>) {
    let mut next = current.to_vec();
    let mut outcomes = Vec::with_capacity(changes.len());

    for change in changes {
        let name = target_name(&change.file_path, identity);
        match next.iter_mut().find(|f| f.name == name) {
            Some(existing) => {
                outcomes.push(ChangeOutcome {
                    name: name.clone(),
                    applied: Applied::Updated {
                        previous: std::mem::replace(&mut existing.content, change.content.clone()),
                    },
                });
            }
            None => {
                next.push(ProjectFile {
                    name: name.clone(),
                    content: change.content.clone(),
                });
                outcomes.push(ChangeOutcome {
                    name,
                    applied: Applied::Created,
                });
            }
        }
    }

    (next, outcomes)
}

pub fn target_name(file_path: &str, identity: FileIdentity) -> String {
    match identity {
        FileIdentity::BareName => bare_name(file_path).to_string(),
        FileIdentity::FullPath => normalize_path(file_path),
    }
}

// Final path segment; the whole string when there is no `/` or the last
// segment is empty (a trailing slash).
fn bare_name(file_path: &str) -> &str {
    match file_path.rsplit('/').next() {
        Some(last) if !last.is_empty() => last,
        _ => file_path,
    }
}

fn normalize_path(file_path: &str) -> String {
    let segments: Vec<&str> = file_path
        .split('/')
        .filter(|s| !s.is_empty() && *s != ".")
        .collect();
    if segments.is_empty() {
        file_path.to_string()
    } else {
        segments.join("/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn file(name: &str, content: &str) -> ProjectFile {
        ProjectFile {
            name: name.to_string(),
            content: content.to_string(),
        }
    }

    fn change(path: &str, content: &str) -> FileChange {
        FileChange {
            file_path: path.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn updates_existing_entry_in_place() {
        let current = vec![file("App.tsx", "old")];
        let next = apply_changes(&current, &[change("src/App.tsx", "new")], FileIdentity::BareName);
        assert_eq!(next, vec![file("App.tsx", "new")]);
    }

    #[test]
    fn appends_unknown_entry() {
        let next = apply_changes(&[], &[change("src/New.tsx", "x")], FileIdentity::BareName);
        assert_eq!(next, vec![file("New.tsx", "x")]);
    }

    #[test]
    fn untargeted_entries_survive_unchanged() {
        let current = vec![file("App.tsx", "a"), file("index.css", "b")];
        let next = apply_changes(&current, &[change("App.tsx", "a2")], FileIdentity::BareName);
        assert_eq!(next, vec![file("App.tsx", "a2"), file("index.css", "b")]);
    }

    #[test]
    fn update_preserves_position_and_length() {
        let current = vec![file("a.txt", "1"), file("b.txt", "2"), file("c.txt", "3")];
        let next = apply_changes(&current, &[change("b.txt", "two")], FileIdentity::BareName);
        assert_eq!(next.len(), current.len());
        assert_eq!(next[1], file("b.txt", "two"));
    }

    #[test]
    fn last_write_wins_within_one_call() {
        let changes = [change("src/App.tsx", "first"), change("App.tsx", "second")];
        let next = apply_changes(&[], &changes, FileIdentity::BareName);
        assert_eq!(next, vec![file("App.tsx", "second")]);
    }

    #[test]
    fn input_collection_is_not_mutated() {
        let current = vec![file("App.tsx", "old")];
        let before = current.clone();
        let _ = apply_changes(&current, &[change("App.tsx", "new")], FileIdentity::BareName);
        assert_eq!(current, before);
    }

    #[test]
    fn empty_change_set_returns_equal_copy() {
        let current = vec![file("App.tsx", "old")];
        assert_eq!(apply_changes(&current, &[], FileIdentity::BareName), current);
    }

    #[test]
    fn bare_name_collapses_directories() {
        let changes = [change("src/App.tsx", "a"), change("lib/App.tsx", "b")];
        let next = apply_changes(&[], &changes, FileIdentity::BareName);
        assert_eq!(next, vec![file("App.tsx", "b")]);
    }

    #[test]
    fn full_path_keeps_directories_distinct() {
        let changes = [change("src/App.tsx", "a"), change("lib/App.tsx", "b")];
        let next = apply_changes(&[], &changes, FileIdentity::FullPath);
        assert_eq!(next, vec![file("src/App.tsx", "a"), file("lib/App.tsx", "b")]);
    }

    #[test]
    fn full_path_is_normalized() {
        let next = apply_changes(&[], &[change("./src//App.tsx", "a")], FileIdentity::FullPath);
        assert_eq!(next[0].name, "src/App.tsx");
    }

    #[test]
    fn trailing_slash_falls_back_to_whole_path() {
        assert_eq!(target_name("src/", FileIdentity::BareName), "src/");
        assert_eq!(target_name("plain.txt", FileIdentity::BareName), "plain.txt");
    }

    #[test]
    fn report_distinguishes_created_and_updated() {
        let current = vec![file("App.tsx", "old")];
        let changes = [change("App.tsx", "new"), change("extra.css", "body {}")];
        let (_, outcomes) = apply_changes_with_report(&current, &changes, FileIdentity::BareName);
        assert_eq!(
            outcomes,
            vec![
                ChangeOutcome {
                    name: "App.tsx".to_string(),
                    applied: Applied::Updated { previous: "old".to_string() },
                },
                ChangeOutcome {
                    name: "extra.css".to_string(),
                    applied: Applied::Created,
                },
            ]
        );
    }
}
