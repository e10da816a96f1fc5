/// Core domain types for lynks documents and link references.
use std::path::PathBuf;

/// Result of classifying one link target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatus {
    /// A network URL. Never checked for reachability.
    Remote,
    /// Points at an existing document.
    Resolved,
    /// Missing on disk, or points at a directory.
    Unresolved,
}

/// One `[label](target)` occurrence, classified at extraction time.
/// Stale after any rewrite of its document: re-extract, never patch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    /// Bracketed link text.
    pub label: String,
    /// Parenthesized target exactly as written.
    pub raw_target: String,
    /// Best-effort path the target was resolved to (the URL for remote links).
    pub resolved: PathBuf,
    /// Classification of `raw_target`.
    pub status: LinkStatus,
}

impl Reference {
    /// Last path segment of the raw target, used to pre-seed the fixer search.
    pub fn file_name(&self) -> &str {
        return self.raw_target.rsplit('/').next().unwrap_or(&self.raw_target);
    }

    /// The link exactly as it appears on disk.
    pub fn markdown(&self) -> String {
        return format!("[{}]({})", self.label, self.raw_target);
    }

    /// Single-line description shown in pickers and the lint report.
    pub fn title(&self) -> String {
        return format!("{} {} -> {}", self.label, self.raw_target, self.resolved.display());
    }

    /// True when the target could not be found locally.
    pub fn is_unresolved(&self) -> bool {
        return self.status == LinkStatus::Unresolved;
    }
}

/// One scanned markdown file and the flags derived from its references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Full text, only replaced by a confirmed repair.
    pub contents: String,
    /// At least one reference was extracted.
    pub has_links: bool,
    /// At least one extracted reference is unresolved.
    pub has_unresolved_links: bool,
    /// Identity of the document, stable for its lifetime.
    pub path: PathBuf,
}
