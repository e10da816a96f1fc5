//! Repairing a link: compute the replacement text and persist the document.

use std::io::Write as _;
use std::path::Path;

use crate::alias::path_string;
use crate::config::Config;
use crate::error::Error;
use crate::strategy;
use crate::types::{Document, Reference};

/// Re-point `reference` at `replacement`, returning the document with its
/// first `[label](target)` occurrence rewritten. Later identical links are
/// left alone. Nothing is written to disk.
///
/// # Errors
///
/// Returns `Error::IncompatiblePaths` if the relative strategy cannot relate
/// the two documents.
pub fn repair(
    config: &Config,
    document: &Document,
    reference: &Reference,
    replacement: &Path,
) -> Result<Document, Error> {
    let to = path_string(replacement);
    let to_alias = config.aliases.apply(&to);
    let target = strategy::render_link(config.resolution, &document.path, &to, &to_alias)?;

    let old_link = reference.markdown();
    let new_link = format!("[{}]({target})", reference.label);
    tracing::info!(
        path = %document.path.display(),
        from = %old_link,
        to = %new_link,
        "repairing link"
    );

    return Ok(Document {
        contents: document.contents.replacen(&old_link, &new_link, 1),
        ..document.clone()
    });
}

/// Persist the whole document by writing a sibling temporary file and
/// renaming it over the original, so readers see the old or the new
/// contents and never a partial write. The original file's permissions
/// carry over to the replacement.
///
/// # Errors
///
/// Returns `Error::Write` naming the step (create, write, persist) that failed.
pub fn write_document(document: &Document) -> Result<(), Error> {
    let path = &document.path;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let write_error = |operation: &'static str| {
        return move |source: std::io::Error| {
            return Error::Write {
                operation,
                path: path.clone(),
                source,
            };
        };
    };

    let mut temp = tempfile::NamedTempFile::new_in(dir).map_err(write_error("create"))?;
    temp.write_all(document.contents.as_bytes()).map_err(write_error("write"))?;
    match std::fs::metadata(path) {
        Ok(existing) => {
            temp.as_file()
                .set_permissions(existing.permissions())
                .map_err(write_error("write"))?;
        },
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {},
        Err(e) => return Err(write_error("write")(e)),
    }
    temp.as_file().sync_all().map_err(write_error("write"))?;
    temp.persist(path).map_err(|e| return write_error("persist")(e.error))?;

    tracing::debug!(path = %path.display(), bytes = document.contents.len(), "wrote document");
    return Ok(());
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    use super::*;
    use crate::config::ResolutionConfig;
    use crate::strategy::Strategy;
    use crate::types::LinkStatus;

    fn document(path: &Path, contents: &str) -> Document {
        Document {
            contents: contents.to_string(),
            has_links: true,
            has_unresolved_links: true,
            path: path.to_path_buf(),
        }
    }

    fn broken(label: &str, target: &str) -> Reference {
        Reference {
            label: label.to_string(),
            raw_target: target.to_string(),
            resolved: PathBuf::from(format!("{target}.md")),
            status: LinkStatus::Unresolved,
        }
    }

    fn config(strategy: Strategy, keep_extension: bool, aliases: &[(&str, &str)]) -> Config {
        let aliases: BTreeMap<String, String> = aliases
            .iter()
            .map(|(public, physical)| (public.to_string(), physical.to_string()))
            .collect();
        Config::new("my-example", ResolutionConfig { keep_extension, strategy }, &aliases, Vec::new())
    }

    #[test]
    fn rewrites_only_the_first_occurrence() {
        let config = config(Strategy::Relative, false, &[]);
        let doc = document(
            Path::new("my-example/folder/file.md"),
            "[a](gone) then [a](gone) again",
        );

        let fixed = repair(&config, &doc, &broken("a", "gone"), Path::new("my-example/uncle/cousin.md")).unwrap();
        assert_eq!(fixed.contents, "[a](../uncle/cousin) then [a](gone) again");
        assert_eq!(fixed.path, doc.path);
    }

    #[test]
    fn root_strategy_uses_alias_form() {
        let config = config(Strategy::Root, true, &[("my-alias", "folder")]);
        let doc = document(Path::new("my-example/other/file.md"), "x [s](old) y");

        let fixed = repair(&config, &doc, &broken("s", "old"), Path::new("my-example/folder/sibling.md")).unwrap();
        assert_eq!(fixed.contents, "x [s](my-alias/sibling.md) y");
    }

    #[test]
    fn adjacent_text_is_untouched() {
        let config = config(Strategy::Relative, false, &[]);
        let doc = document(Path::new("my-example/folder/file.md"), "([s](old)).\n[other](old-two)\n");

        let fixed = repair(&config, &doc, &broken("s", "old"), Path::new("my-example/folder/new.md")).unwrap();
        assert_eq!(fixed.contents, "([s](new)).\n[other](old-two)\n");
    }

    #[test]
    fn write_replaces_contents_atomically() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.md");
        std::fs::write(&path, "old contents that are longer than the new ones").unwrap();

        write_document(&document(&path, "new")).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");

        let leftovers = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1, "temporary file should have been renamed away");
    }

    #[cfg(unix)]
    #[test]
    fn write_keeps_original_permissions() {
        use std::os::unix::fs::PermissionsExt as _;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.md");
        std::fs::write(&path, "old").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

        write_document(&document(&path, "new")).unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn write_into_missing_directory_fails_with_operation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent/doc.md");

        let err = write_document(&document(&path, "new")).unwrap_err();
        assert!(matches!(err, Error::Write { operation: "create", .. }));
    }
}
