//! Bidirectional mapping between public link prefixes and physical subpaths.

use std::collections::BTreeMap;
use std::path::Path;

use crate::scanner::normalize_path;

/// A public prefix standing in for a physical subpath under the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alias {
    /// Root-joined, normalized physical prefix (e.g. `docs/guides`).
    pub physical: String,
    /// Prefix as written in links (e.g. `@guide`).
    pub public: String,
}

/// All configured aliases, kept in two longest-prefix-first orders so both
/// directions pick a single deterministic match.
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    /// Sorted by physical prefix length, longest first.
    by_physical: Vec<Alias>,
    /// Sorted by public prefix length, longest first.
    by_public: Vec<Alias>,
}

impl AliasTable {
    /// Build the table from config `alias -> subpath` pairs rooted at `root`.
    pub fn new(root: &Path, aliases: &BTreeMap<String, String>) -> Self {
        let entries: Vec<Alias> = aliases
            .iter()
            .map(|(public, subpath)| {
                return Alias {
                    physical: path_string(&normalize_path(&root.join(subpath))),
                    public: public.trim_end_matches('/').to_string(),
                };
            })
            .collect();

        let mut by_physical = entries.clone();
        by_physical.sort_by(|a, b| {
            return b.physical.len().cmp(&a.physical.len()).then_with(|| return a.physical.cmp(&b.physical));
        });

        let mut by_public = entries;
        by_public.sort_by(|a, b| {
            return b.public.len().cmp(&a.public.len()).then_with(|| return a.public.cmp(&b.public));
        });

        return Self { by_physical, by_public };
    }

    /// Replace the longest physical prefix of `path` with its public alias.
    /// Paths outside every alias come back unchanged. An alias whose
    /// physical side is the working directory itself never matches here.
    pub fn apply(&self, path: &str) -> String {
        for alias in &self.by_physical {
            if let Some(rest) = strip_segment_prefix(path, &alias.physical) {
                let rest = rest.trim_start_matches('/');
                if rest.is_empty() {
                    return alias.public.clone();
                }
                return format!("{}/{rest}", alias.public);
            }
        }
        return path.to_string();
    }

    /// Replace the longest public prefix of `link` with its physical subpath,
    /// joined segment-wise. Links without an alias prefix come back unchanged.
    pub fn unapply(&self, link: &str) -> String {
        for alias in &self.by_public {
            if let Some(rest) = strip_segment_prefix(link, &alias.public) {
                let joined = Path::new(&alias.physical).join(rest.trim_start_matches('/'));
                return path_string(&normalize_path(&joined));
            }
        }
        return link.to_string();
    }
}

/// Forward-slash string form of a path, as it appears in link text.
pub fn path_string(path: &Path) -> String {
    return path.to_string_lossy().replace('\\', "/");
}

/// Strip `prefix` from `path` only on a segment boundary, so `docs/a` never
/// matches `docs/ab.md`. The remainder keeps its leading `/`, if any. An
/// empty prefix matches nothing.
pub fn strip_segment_prefix<'a>(path: &'a str, prefix: &str) -> Option<&'a str> {
    if prefix.is_empty() {
        return None;
    }
    let rest = path.strip_prefix(prefix)?;
    if rest.is_empty() || rest.starts_with('/') {
        return Some(rest);
    }
    return None;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(root: &str, pairs: &[(&str, &str)]) -> AliasTable {
        let aliases = pairs
            .iter()
            .map(|(public, physical)| (public.to_string(), physical.to_string()))
            .collect();
        AliasTable::new(Path::new(root), &aliases)
    }

    #[test]
    fn apply_substitutes_physical_prefix() {
        let aliases = table("my-example", &[("my-alias", "folder")]);
        assert_eq!(aliases.apply("my-example/folder/sibling.md"), "my-alias/sibling.md");
    }

    #[test]
    fn unapply_restores_physical_prefix() {
        let aliases = table("my-example", &[("my-alias", "folder")]);
        assert_eq!(aliases.unapply("my-alias/sibling.md"), "my-example/folder/sibling.md");
    }

    #[test]
    fn round_trips_for_paths_under_an_alias() {
        let aliases = table("./", &[("@g", "docs/guides"), ("@d", "docs"), ("~", "notes/")]);
        for path in ["docs/guides/a.md", "docs/b.md", "docs/guides/deep/c.md", "notes/d.md"] {
            assert_eq!(aliases.unapply(&aliases.apply(path)), path, "round trip of {path}");
        }
    }

    #[test]
    fn identity_outside_every_alias() {
        let aliases = table("./", &[("@g", "docs/guides")]);
        assert_eq!(aliases.apply("other/a.md"), "other/a.md");
        assert_eq!(aliases.unapply("other/a.md"), "other/a.md");
    }

    #[test]
    fn longest_physical_prefix_wins() {
        let aliases = table("./", &[("@d", "docs"), ("@g", "docs/guides")]);
        assert_eq!(aliases.apply("docs/guides/a.md"), "@g/a.md");
        assert_eq!(aliases.apply("docs/a.md"), "@d/a.md");
    }

    #[test]
    fn longest_public_prefix_wins() {
        let aliases = table("./", &[("@", "docs"), ("@api", "reference/api")]);
        assert_eq!(aliases.unapply("@api/users.md"), "reference/api/users.md");
    }

    #[test]
    fn prefix_only_matches_whole_segments() {
        let aliases = table("./", &[("@d", "docs/a")]);
        assert_eq!(aliases.apply("docs/ab.md"), "docs/ab.md");
        assert_eq!(aliases.unapply("@dx/file.md"), "@dx/file.md");
    }

    #[test]
    fn public_prefix_with_trailing_slash_keeps_the_boundary() {
        let aliases = table("./", &[("@g/", "guides")]);
        assert_eq!(aliases.unapply("@g/a.md"), "guides/a.md");
        assert_eq!(aliases.apply("guides/a.md"), "@g/a.md");
        assert_eq!(aliases.unapply(&aliases.apply("guides/deep/b.md")), "guides/deep/b.md");
    }

    #[test]
    fn alias_for_the_working_directory_joins_onto_it() {
        let aliases = table("./", &[("~", ".")]);
        assert_eq!(aliases.unapply("~/a.md"), "a.md");
        assert_eq!(aliases.unapply("~/notes/b.md"), "notes/b.md");
        assert_eq!(aliases.apply("a.md"), "a.md");
    }

    #[test]
    fn alias_for_the_configured_root_resolves_under_it() {
        let aliases = table("docs", &[("~", ".")]);
        assert_eq!(aliases.unapply("~/a.md"), "docs/a.md");
        assert_eq!(aliases.apply("docs/a.md"), "~/a.md");
    }

    #[test]
    fn dot_root_is_normalized_away() {
        let aliases = table("./", &[("@g", "./guides")]);
        assert_eq!(aliases.apply("guides/a.md"), "@g/a.md");
    }
}
