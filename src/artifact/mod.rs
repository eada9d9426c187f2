pub mod apply;
pub mod parse;

/// A single file edit extracted from generator output.
///
/// `content` is always the complete replacement text for the file, never a
/// partial diff; the prompt contract forbids the generator from emitting
/// diffs or placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    /// Slash-separated path as emitted by the generator, e.g. `src/App.tsx`.
    pub file_path: String,
    pub content: String,
}
