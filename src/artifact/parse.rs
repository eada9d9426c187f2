use once_cell::sync::Lazy;
use regex::Regex;

use super::FileChange;

// The generator is instructed, not guaranteed, to follow the artifact
// grammar, so everything here is fail-open: malformed markup yields fewer
// records, never an error. Only this one fixed grammar is matched; no
// general XML parsing.

static ARTIFACT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<boltArtifact[^>]*>(.*?)</boltArtifact>").expect("artifact regex")
});

// `type` and `filePath` are accepted in either order. Attribute values may
// not contain escaped quotes; an unescaped `"` inside a path terminates the
// attribute early. Documented limitation of the contract, not a defect.
static ACTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?is)<boltAction\s+(?:type="file"\s+filePath="([^"]*)"|filePath="([^"]*)"\s+type="file")\s*>(.*?)</boltAction>"#,
    )
    .expect("action regex")
});

static ARTIFACT_OPEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<boltArtifact\b").expect("artifact open regex"));
static ACTION_OPEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<boltAction\b").expect("action open regex"));

/// Counters describing what the scanner saw. These never influence the
/// public result; they only feed the session debug log so a silent no-op on
/// malformed markup can still be diagnosed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ParseStats {
    /// Well-formed artifact spans matched.
    pub artifacts: usize,
    /// Well-formed file actions matched inside those spans.
    pub actions: usize,
    /// Matched actions dropped for an empty path or empty trimmed content.
    pub discarded: usize,
    /// Opening artifact tags that never became a full span.
    pub dangling_artifact_tags: usize,
    /// Opening action tags that never became a matched action.
    pub dangling_action_tags: usize,
}

impl ParseStats {
    pub fn is_clean(&self) -> bool {
        self.discarded == 0 && self.dangling_artifact_tags == 0 && self.dangling_action_tags == 0
    }
}

/// Extracts all file changes from raw generator output.
///
/// Returns records in encounter order: artifact order, then action order
/// within each artifact. Later records for the same target deliberately
/// survive so that the reconciler's last-write-wins rule can apply. Text
/// with no artifact markup yields an empty vec; that is a normal outcome,
/// not an error.
pub fn parse_artifacts(raw: &str) -> Vec<FileChange> {
    parse_artifacts_with_stats(raw).0
}

/// Same as [`parse_artifacts`] but also reports scanner diagnostics.
pub fn parse_artifacts_with_stats(raw: &str) -> (Vec<FileChange>, ParseStats) {
    let mut changes = Vec::new();
    let mut stats = ParseStats::default();

    for artifact in ARTIFACT_RE.captures_iter(raw) {
        stats.artifacts += 1;
        let inner = artifact.get(1).map(|m| m.as_str()).unwrap_or_default();

        for action in ACTION_RE.captures_iter(inner) {
            stats.actions += 1;
            let file_path = action
                .get(1)
                .or_else(|| action.get(2))
                .map(|m| m.as_str().trim())
                .unwrap_or_default();
            let content = action.get(3).map(|m| m.as_str().trim()).unwrap_or_default();

            if file_path.is_empty() || content.is_empty() {
                stats.discarded += 1;
                continue;
            }

            changes.push(FileChange {
                file_path: file_path.to_string(),
                content: content.to_string(),
            });
        }
    }

    let artifact_opens = ARTIFACT_OPEN_RE.find_iter(raw).count();
    let action_opens = ACTION_OPEN_RE.find_iter(raw).count();
    stats.dangling_artifact_tags = artifact_opens.saturating_sub(stats.artifacts);
    stats.dangling_action_tags = action_opens.saturating_sub(stats.actions);

    (changes, stats)
}

/// Removes matched artifact spans from the raw text, leaving the
/// surrounding prose for display. Unterminated opening tags are left
/// untouched, same as the scanner ignores them.
pub fn strip_artifacts(raw: &str) -> String {
    ARTIFACT_RE.replace_all(raw, "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn single_artifact_single_action() {
        let raw = "Sure, here:\n<boltArtifact id=\"x\" title=\"y\"><boltAction type=\"file\" filePath=\"src/App.tsx\">console.log(1)</boltAction></boltArtifact>\nDone.";
        let changes = parse_artifacts(raw);
        assert_eq!(
            changes,
            vec![FileChange {
                file_path: "src/App.tsx".to_string(),
                content: "console.log(1)".to_string(),
            }]
        );
    }

    #[test]
    fn plain_prose_yields_nothing() {
        let (changes, stats) = parse_artifacts_with_stats("No markup here, just an answer.");
        assert_eq!(changes, Vec::new());
        assert!(stats.is_clean());
        assert_eq!(stats.artifacts, 0);
    }

    #[test]
    fn two_actions_preserve_order() {
        let raw = r#"<boltArtifact id="a" title="t">
<boltAction type="file" filePath="src/App.tsx">one</boltAction>
<boltAction type="file" filePath="src/index.css">two</boltAction>
</boltArtifact>"#;
        let changes = parse_artifacts(raw);
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].file_path, "src/App.tsx");
        assert_eq!(changes[1].file_path, "src/index.css");
    }

    #[test]
    fn adjacent_artifacts_not_merged() {
        let raw = concat!(
            r#"<boltArtifact id="1"><boltAction type="file" filePath="a.txt">a</boltAction></boltArtifact>"#,
            "between",
            r#"<boltArtifact id="2"><boltAction type="file" filePath="b.txt">b</boltAction></boltArtifact>"#,
        );
        let changes = parse_artifacts(raw);
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].file_path, "a.txt");
        assert_eq!(changes[1].file_path, "b.txt");
    }

    #[test]
    fn content_is_trimmed_and_multiline_kept() {
        let raw = "<boltArtifact><boltAction type=\"file\" filePath=\"src/main.tsx\">\n  line one\nline two\n</boltAction></boltArtifact>";
        let changes = parse_artifacts(raw);
        assert_eq!(changes[0].content, "line one\nline two");
    }

    #[test]
    fn empty_content_discarded() {
        let raw = "<boltArtifact><boltAction type=\"file\" filePath=\"a.txt\">   \n  </boltAction></boltArtifact>";
        let (changes, stats) = parse_artifacts_with_stats(raw);
        assert_eq!(changes, Vec::new());
        assert_eq!(stats.discarded, 1);
        assert_eq!(stats.actions, 1);
    }

    #[test]
    fn tag_case_is_ignored() {
        let raw = "<BOLTARTIFACT><boltaction type=\"file\" filePath=\"a.txt\">x</BOLTACTION></boltartifact>";
        let changes = parse_artifacts(raw);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].content, "x");
    }

    #[test]
    fn attribute_order_is_free() {
        let raw = "<boltArtifact><boltAction filePath=\"b.txt\" type=\"file\">y</boltAction></boltArtifact>";
        let changes = parse_artifacts(raw);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].file_path, "b.txt");
    }

    #[test]
    fn non_file_actions_skipped() {
        let raw = "<boltArtifact><boltAction type=\"shell\">npm install</boltAction><boltAction type=\"file\" filePath=\"a.txt\">x</boltAction></boltArtifact>";
        let (changes, stats) = parse_artifacts_with_stats(raw);
        assert_eq!(changes.len(), 1);
        assert_eq!(stats.dangling_action_tags, 1);
    }

    #[test]
    fn unterminated_artifact_skipped_entirely() {
        let raw = "<boltArtifact id=\"x\"><boltAction type=\"file\" filePath=\"a.txt\">x</boltAction>";
        let (changes, stats) = parse_artifacts_with_stats(raw);
        assert_eq!(changes, Vec::new());
        assert_eq!(stats.dangling_artifact_tags, 1);
        assert_eq!(stats.dangling_action_tags, 1);
    }

    #[test]
    fn parsing_is_deterministic() {
        let raw = "prose <boltArtifact><boltAction type=\"file\" filePath=\"a.txt\">x</boltAction></boltArtifact> more";
        assert_eq!(parse_artifacts(raw), parse_artifacts(raw));
    }

    #[test]
    fn strip_removes_spans_keeps_prose() {
        let raw = "Here you go:\n<boltArtifact><boltAction type=\"file\" filePath=\"a.txt\">x</boltAction></boltArtifact>\nAnything else?";
        assert_eq!(strip_artifacts(raw), "Here you go:\n\nAnything else?");
    }

    #[test]
    fn strip_leaves_plain_text_alone() {
        assert_eq!(strip_artifacts("just words"), "just words");
    }
}
