//! Classification of raw link targets into resolved, unresolved, or remote.

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::scanner::{DOC_SUFFIX, normalize_path};
use crate::strategy::Strategy;
use crate::types::LinkStatus;

/// Explicit parent-directory traversal at the start of a target.
const PARENT_MARKER: &str = "../";

/// URL schemes that mark a link as remote.
const REMOTE_SCHEMES: [&str; 2] = ["http://", "https://"];

/// Classify `raw_target` as written inside the document at `source`.
///
/// Remote links are returned untouched and never checked. Local targets get
/// the document suffix, are placed relative to `source` or expanded through
/// the alias table, and then stat'd. The returned path is the attempted
/// candidate even when it is unresolved, so the operator can see what was
/// looked for.
pub fn classify(config: &Config, source: &Path, raw_target: &str) -> (LinkStatus, PathBuf) {
    if REMOTE_SCHEMES.iter().any(|scheme| return raw_target.starts_with(scheme)) {
        return (LinkStatus::Remote, PathBuf::from(raw_target));
    }

    let candidate = if raw_target.ends_with(DOC_SUFFIX) {
        raw_target.to_string()
    } else {
        format!("{raw_target}{DOC_SUFFIX}")
    };

    let path = locate_candidate(config, source, &candidate);
    let status = match std::fs::metadata(&path) {
        Ok(meta) if !meta.is_dir() => LinkStatus::Resolved,
        Ok(_) | Err(_) => LinkStatus::Unresolved,
    };
    tracing::trace!(source = %source.display(), raw_target, resolved = %path.display(), ?status, "classified link");
    return (status, path);
}

/// Turn a suffixed candidate into the path to stat.
///
/// `../` targets always climb from the source document's directory. Aliased
/// targets expand through the alias table. Anything else follows the
/// configured strategy: relative links live next to their document, root
/// links are already root-joined.
fn locate_candidate(config: &Config, source: &Path, candidate: &str) -> PathBuf {
    let source_dir = source.parent().unwrap_or_else(|| return Path::new(""));

    if candidate.starts_with(PARENT_MARKER) {
        return normalize_path(&source_dir.join(candidate));
    }

    let unaliased = config.aliases.unapply(candidate);
    if unaliased != candidate {
        return normalize_path(Path::new(&unaliased));
    }

    return match config.resolution.strategy {
        Strategy::Relative => normalize_path(&source_dir.join(candidate)),
        Strategy::Root => normalize_path(Path::new(candidate)),
    };
}
