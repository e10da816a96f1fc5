use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use walkdir::WalkDir;

use crate::config::Config;
use crate::error::Error;
use crate::resolver;
use crate::types::{Document, Reference};

/// Suffix identifying scanned documents.
pub const DOC_SUFFIX: &str = ".md";

/// `[label](target)` on a single line, without nested brackets or parens.
#[allow(clippy::expect_used, reason = "hardcoded pattern is a compile-time invariant")]
static LINK_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| return Regex::new(r"\[([^\[\]\n]+)\]\(([^()\n]+)\)").expect("valid regex"));

/// Enumerate every markdown document under the configured root, skipping
/// ignored prefixes. Paths are normalized and sorted by file name per
/// directory, so the order is stable between runs.
///
/// Entries that cannot be read are skipped with a warning; only a root that
/// cannot be walked at all is an error.
///
/// # Errors
///
/// Returns `Error::Walk` if the root is missing or not a directory.
pub fn enumerate_documents(config: &Config) -> Result<Vec<PathBuf>, Error> {
    if !config.root.is_dir() {
        return Err(Error::Walk {
            reason: "not a directory".to_string(),
            root: config.root.clone(),
        });
    }

    let mut documents = Vec::new();
    for entry in WalkDir::new(&config.root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable entry");
                continue;
            },
        };
        let path = entry.path();
        if entry.file_type().is_dir() || !path.to_string_lossy().ends_with(DOC_SUFFIX) {
            continue;
        }

        let relative = path.strip_prefix(&config.root).unwrap_or(path);
        if !config.should_scan(&relative.to_string_lossy()) {
            continue;
        }
        documents.push(normalize_path(path));
    }

    tracing::debug!(count = documents.len(), root = %config.root.display(), "enumerated documents");
    return Ok(documents);
}

/// Extract every `[label](target)` reference from document text, classified
/// against the document at `source`. Image embeds and matches with an empty
/// label or target are skipped.
pub fn extract_references(config: &Config, source: &Path, contents: &str) -> Vec<Reference> {
    let mut references = Vec::new();

    for cap in LINK_PATTERN.captures_iter(contents) {
        let Some(whole) = cap.get(0) else { continue };
        let is_image = contents
            .get(..whole.start())
            .is_some_and(|before| return before.ends_with('!'));
        if is_image {
            continue;
        }

        let (Some(label), Some(target)) = (cap.get(1), cap.get(2)) else {
            continue;
        };
        if label.as_str().is_empty() || target.as_str().is_empty() {
            continue;
        }

        let (status, resolved) = resolver::classify(config, source, target.as_str());
        references.push(Reference {
            label: label.as_str().to_string(),
            raw_target: target.as_str().to_string(),
            resolved,
            status,
        });
    }

    return references;
}

/// Collapse `.` and `..` components in a path without touching the filesystem.
/// Preserves leading `..` when there is nothing left to pop.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut components: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        push_normalized_component(&mut components, component);
    }
    return components.iter().collect();
}

/// Handle a single path component during normalization.
/// Pops the last component for `..` when possible, preserves it otherwise.
fn push_normalized_component<'a>(components: &mut Vec<Component<'a>>, component: Component<'a>) {
    match component {
        Component::CurDir => {},
        Component::ParentDir => {
            let can_pop = matches!(
                components.last(),
                Some(c) if matches!(c, Component::Normal(_))
            );
            if can_pop {
                components.pop();
            } else if !matches!(components.last(), Some(Component::RootDir | Component::Prefix(_))) {
                components.push(component);
            }
        },
        other => components.push(other),
    }
    return;
}

/// Read a document and extract its references. Called on first open and
/// again after every rewrite; references are never carried over.
///
/// # Errors
///
/// Returns `Error::Read` if the file cannot be read.
pub fn read_document(config: &Config, path: &Path) -> Result<(Document, Vec<Reference>), Error> {
    let contents = std::fs::read_to_string(path).map_err(|e| return Error::read(path, e))?;
    let references = extract_references(config, path, &contents);
    let document = Document {
        contents,
        has_links: !references.is_empty(),
        has_unresolved_links: references.iter().any(Reference::is_unresolved),
        path: path.to_path_buf(),
    };
    tracing::debug!(
        path = %path.display(),
        links = references.len(),
        unresolved = document.has_unresolved_links,
        "read document"
    );
    return Ok((document, references));
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::config::ResolutionConfig;
    use crate::types::LinkStatus;

    fn config(root: &Path, ignore: &[&str]) -> Config {
        let ignore = ignore.iter().map(|s| s.to_string()).collect();
        Config::new(root, ResolutionConfig::default(), &BTreeMap::new(), ignore)
    }

    #[test]
    fn extracts_label_and_target() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("other.md"), "").unwrap();
        let config = config(dir.path(), &[]);
        let source = dir.path().join("doc.md");

        let refs = extract_references(&config, &source, "See [the other](other) and [web](https://x.dev).");
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].label, "the other");
        assert_eq!(refs[0].raw_target, "other");
        assert_eq!(refs[0].status, LinkStatus::Resolved);
        assert_eq!(refs[1].status, LinkStatus::Remote);
    }

    #[test]
    fn skips_images_empty_parts_and_multiline_matches() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path(), &[]);
        let source = dir.path().join("doc.md");

        let text = "![logo](logo.png)\n[](empty)\n[label]()\n[split\nlabel](x)\n[a [nested] b](c)";
        assert!(extract_references(&config, &source, text).is_empty());
    }

    #[test]
    fn link_at_line_start_is_found() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path(), &[]);
        let source = dir.path().join("doc.md");

        let refs = extract_references(&config, &source, "[foo](missing)\n  [bar](gone)");
        let labels: Vec<&str> = refs.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, ["foo", "bar"]);
        assert!(refs.iter().all(Reference::is_unresolved));
    }

    #[test]
    fn read_document_sets_flags() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.md");
        std::fs::write(&path, "[foo](missing)").unwrap();
        let config = config(dir.path(), &[]);

        let (document, refs) = read_document(&config, &path).unwrap();
        assert!(document.has_links);
        assert!(document.has_unresolved_links);
        assert_eq!(refs.len(), 1);
    }

    #[test]
    fn read_document_without_links() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.md");
        std::fs::write(&path, "# Just a heading\n").unwrap();
        let config = config(dir.path(), &[]);

        let (document, refs) = read_document(&config, &path).unwrap();
        assert!(!document.has_links);
        assert!(!document.has_unresolved_links);
        assert!(refs.is_empty());
    }

    #[test]
    fn read_missing_document_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path(), &[]);

        let err = read_document(&config, &dir.path().join("nope.md")).unwrap_err();
        assert!(matches!(err, Error::Read { .. }));
    }

    #[test]
    fn enumerates_markdown_and_honours_ignore() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join("guides")).unwrap();
        std::fs::create_dir_all(root.join("drafts")).unwrap();
        std::fs::write(root.join("b.md"), "").unwrap();
        std::fs::write(root.join("a.md"), "").unwrap();
        std::fs::write(root.join("notes.txt"), "").unwrap();
        std::fs::write(root.join("guides/setup.md"), "").unwrap();
        std::fs::write(root.join("drafts/wip.md"), "").unwrap();

        let docs = enumerate_documents(&config(root, &["drafts"])).unwrap();
        let expected: Vec<PathBuf> = ["a.md", "b.md", "guides/setup.md"]
            .iter()
            .map(|p| normalize_path(&root.join(p)))
            .collect();
        assert_eq!(docs, expected);
    }

    #[test]
    fn missing_root_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = enumerate_documents(&config(&dir.path().join("absent"), &[])).unwrap_err();
        assert!(matches!(err, Error::Walk { .. }));
    }

    #[test]
    fn normalize_collapses_dots() {
        assert_eq!(normalize_path(Path::new("./docs/../notes/./a.md")), PathBuf::from("notes/a.md"));
        assert_eq!(normalize_path(Path::new("../up/a.md")), PathBuf::from("../up/a.md"));
        assert_eq!(normalize_path(Path::new("/../a.md")), PathBuf::from("/a.md"));
    }
}
