//! Rendering a target document path back into link text.

use std::path::{Component, Path, PathBuf};

use crate::config::ResolutionConfig;
use crate::error::Error;
use crate::scanner::{DOC_SUFFIX, normalize_path};

/// How rewritten links address their target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Relative to the directory of the document containing the link.
    #[default]
    Relative,
    /// The root-joined path taken as-is.
    Root,
}

/// Compute the link text that should point from `from` to `to`.
///
/// `to_alias` is `to` after alias substitution; when it differs from `to`
/// the alias form is used verbatim under both strategies. Without
/// `keep_extension`, exactly one trailing `.md` is removed from the result.
///
/// # Errors
///
/// Returns `Error::IncompatiblePaths` if the relative strategy cannot place
/// both paths on a common absolute basis.
pub fn render_link(
    resolution: ResolutionConfig,
    from: &Path,
    to: &str,
    to_alias: &str,
) -> Result<String, Error> {
    let has_alias = to_alias != to;
    let link = if has_alias {
        to_alias.to_string()
    } else {
        match resolution.strategy {
            Strategy::Relative => relative_link(from, to)?,
            Strategy::Root => to.to_string(),
        }
    };

    if resolution.keep_extension {
        return Ok(link);
    }
    return Ok(strip_doc_suffix(&link).to_string());
}

/// Make a path absolute against the working directory and collapse dots.
///
/// # Errors
///
/// Returns `Error::IncompatiblePaths` if the working directory is unavailable.
fn absolute(path: &Path, from: &Path, to: &str) -> Result<PathBuf, Error> {
    let abs = std::path::absolute(path).map_err(|_err| {
        return Error::IncompatiblePaths {
            from: from.to_path_buf(),
            to: PathBuf::from(to),
        };
    })?;
    return Ok(normalize_path(&abs));
}

/// Walk two absolute paths past their shared prefix, then climb out of what
/// remains of `base` and descend into what remains of `target`.
fn diff_paths(base: &Path, target: &Path) -> Option<PathBuf> {
    let mut base_parts = base.components().peekable();
    let mut target_parts = target.components().peekable();

    // Different roots (e.g. Windows drives) have no common basis.
    let (Some(base_root), Some(target_root)) = (base_parts.peek(), target_parts.peek()) else {
        return None;
    };
    if base_root != target_root {
        return None;
    }

    while let (Some(b), Some(t)) = (base_parts.peek(), target_parts.peek()) {
        if b != t {
            break;
        }
        base_parts.next();
        target_parts.next();
    }

    let mut relative = PathBuf::new();
    for part in base_parts {
        if matches!(part, Component::Normal(_)) {
            relative.push("..");
        }
    }
    for part in target_parts {
        relative.push(part.as_os_str());
    }
    return Some(relative);
}

/// Relative path from the directory containing `from` to `to`.
///
/// # Errors
///
/// Returns `Error::IncompatiblePaths` if either path cannot be made absolute
/// or the two share no root.
fn relative_link(from: &Path, to: &str) -> Result<String, Error> {
    let dir = match from.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let abs_dir = absolute(dir, from, to)?;
    let abs_to = absolute(Path::new(to), from, to)?;

    let relative = diff_paths(&abs_dir, &abs_to).ok_or_else(|| {
        return Error::IncompatiblePaths {
            from: from.to_path_buf(),
            to: PathBuf::from(to),
        };
    })?;
    return Ok(crate::alias::path_string(&relative));
}

/// Remove one trailing document suffix, leaving interior segments alone.
fn strip_doc_suffix(link: &str) -> &str {
    return link.strip_suffix(DOC_SUFFIX).unwrap_or(link);
}
