use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::alias::{AliasTable, path_string, strip_segment_prefix};
use crate::error::Error;
use crate::scanner::normalize_path;
use crate::strategy::Strategy;

/// Config file names probed in the working directory, in priority order.
const CONFIG_CANDIDATES: [&str; 2] = ["lynks.toml", "lynks.config.json"];

/// Project configuration loaded from `lynks.toml` or `lynks.config.json`.
/// Immutable for the lifetime of a session.
#[derive(Debug, Clone)]
pub struct Config {
    /// Public prefix to physical subpath mappings, rooted at `root`.
    pub aliases: AliasTable,
    /// Path prefixes (relative to `root`) skipped during enumeration.
    ignore: Vec<String>,
    /// How rewritten links are rendered.
    pub resolution: ResolutionConfig,
    /// Base directory for scanning and alias resolution.
    pub root: PathBuf,
}

/// Strategy selection for rendering a target path back into link text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolutionConfig {
    /// Keep the `.md` suffix in rewritten links.
    pub keep_extension: bool,
    /// Root-absolute or directory-relative links.
    pub strategy: Strategy,
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        return Self {
            keep_extension: true,
            strategy: Strategy::Relative,
        };
    }
}

/// Raw structure shared by the TOML and JSON config formats.
#[derive(serde::Deserialize, Default)]
struct RawConfig {
    #[serde(default)]
    aliases: BTreeMap<String, String>,
    #[serde(default)]
    ignore: Vec<String>,
    #[serde(default)]
    resolution: RawResolution,
    #[serde(default = "default_root")]
    root: String,
}

/// Raw `resolution` table. Keys are camelCase in both formats.
#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawResolution {
    #[serde(default = "default_keep_extension")]
    keep_extension: bool,
    #[serde(default)]
    strategy: Strategy,
}

impl Default for RawResolution {
    fn default() -> Self {
        return Self {
            keep_extension: default_keep_extension(),
            strategy: Strategy::default(),
        };
    }
}

impl Config {
    /// Load config for a session started in `dir`.
    ///
    /// An explicit path must exist. Without one, the first of
    /// `lynks.toml` / `lynks.config.json` found in `dir` is used, and
    /// defaults apply when neither exists. A file that exists but does not
    /// parse is an error; it never silently falls back to defaults.
    ///
    /// # Errors
    ///
    /// Returns `Error::Read` if the file cannot be read,
    /// or `Error::ConfigParse` if it is malformed.
    pub fn load(dir: &Path, explicit: Option<&Path>) -> Result<Self, Error> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let found = CONFIG_CANDIDATES
                    .iter()
                    .map(|name| return dir.join(name))
                    .find(|candidate| return candidate.is_file());
                let Some(found) = found else {
                    tracing::debug!("no config file found, using defaults");
                    return Ok(Self::from_raw(RawConfig {
                        root: default_root(),
                        ..RawConfig::default()
                    }));
                };
                found
            },
        };

        let content = std::fs::read_to_string(&path).map_err(|e| return Error::read(&path, e))?;
        let raw = parse_raw_config(&path, &content)?;
        tracing::debug!(config = %path.display(), root = %raw.root, "loaded config");
        return Ok(Self::from_raw(raw));
    }

    /// Build a config directly from its parts.
    pub fn new(
        root: impl Into<PathBuf>,
        resolution: ResolutionConfig,
        aliases: &BTreeMap<String, String>,
        ignore: Vec<String>,
    ) -> Self {
        let root = root.into();
        let ignore = ignore
            .into_iter()
            .map(|prefix| return path_string(&normalize_path(Path::new(&prefix))))
            .collect();
        return Self {
            aliases: AliasTable::new(&root, aliases),
            ignore,
            resolution,
            root,
        };
    }

    /// Check whether a document path (relative to the root) is outside every
    /// ignore prefix. Both sides are normalized and prefixes only match whole
    /// path segments.
    pub fn should_scan(&self, relative_path: &str) -> bool {
        let relative = path_string(&normalize_path(Path::new(relative_path)));
        return !self
            .ignore
            .iter()
            .any(|prefix| return strip_segment_prefix(&relative, prefix).is_some());
    }

    /// Convert the deserialized form into the runtime config.
    fn from_raw(raw: RawConfig) -> Self {
        let resolution = ResolutionConfig {
            keep_extension: raw.resolution.keep_extension,
            strategy: raw.resolution.strategy,
        };
        return Self::new(raw.root, resolution, &raw.aliases, raw.ignore);
    }
}

/// `keepExtension` defaults to true.
const fn default_keep_extension() -> bool {
    return true;
}

/// `root` defaults to the working directory.
fn default_root() -> String {
    return "./".to_string();
}

/// Pick the parser by file extension: `.json` is JSON, anything else TOML.
///
/// # Errors
///
/// Returns `Error::ConfigParse` naming the file and the parser message.
fn parse_raw_config(path: &Path, content: &str) -> Result<RawConfig, Error> {
    let is_json = path.extension().is_some_and(|ext| return ext == "json");
    let parsed = if is_json {
        serde_json::from_str(content).map_err(|e| return e.to_string())
    } else {
        toml::from_str(content).map_err(|e| return e.to_string())
    };
    return parsed.map_err(|reason| {
        return Error::ConfigParse {
            path: path.to_path_buf(),
            reason,
        };
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_no_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path(), None).unwrap();
        assert_eq!(config.root, PathBuf::from("./"));
        assert_eq!(config.resolution, ResolutionConfig::default());
        assert!(config.should_scan("anything.md"));
    }

    #[test]
    fn loads_json_config() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("lynks.config.json"),
            r#"{
                "root": "docs",
                "resolution": { "strategy": "root", "keepExtension": false },
                "ignore": ["drafts/"],
                "aliases": { "@guide": "guides" }
            }"#,
        )
        .unwrap();

        let config = Config::load(dir.path(), None).unwrap();
        assert_eq!(config.root, PathBuf::from("docs"));
        assert_eq!(config.resolution.strategy, Strategy::Root);
        assert!(!config.resolution.keep_extension);
        assert!(!config.should_scan("drafts/wip.md"));
        assert!(config.should_scan("guides/intro.md"));
        assert_eq!(config.aliases.apply("docs/guides/intro.md"), "@guide/intro.md");
    }

    #[test]
    fn ignore_prefixes_match_whole_segments_after_normalizing() {
        let ignore = vec!["drafts".to_string(), "./archive/".to_string(), "notes/../old".to_string()];
        let config = Config::new("./", ResolutionConfig::default(), &BTreeMap::new(), ignore);

        assert!(!config.should_scan("drafts/wip.md"));
        assert!(config.should_scan("drafts-final.md"));
        assert!(!config.should_scan("archive/2020/a.md"));
        assert!(!config.should_scan("./archive/b.md"));
        assert!(!config.should_scan("old/c.md"));
        assert!(config.should_scan("older/c.md"));
    }

    #[test]
    fn toml_config_takes_priority_and_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("lynks.toml"), "[resolution]\nstrategy = \"root\"\n").unwrap();
        std::fs::write(dir.path().join("lynks.config.json"), "{ not json").unwrap();

        let config = Config::load(dir.path(), None).unwrap();
        assert_eq!(config.resolution.strategy, Strategy::Root);
        assert!(config.resolution.keep_extension);
        assert_eq!(config.root, PathBuf::from("./"));
    }

    #[test]
    fn malformed_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("lynks.config.json"), "{ not json").unwrap();

        let err = Config::load(dir.path(), None).unwrap_err();
        assert!(matches!(err, Error::ConfigParse { .. }));
    }

    #[test]
    fn unknown_strategy_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[resolution]\nstrategy = \"sideways\"\n").unwrap();

        let err = Config::load(dir.path(), Some(&path)).unwrap_err();
        assert!(matches!(err, Error::ConfigParse { .. }));
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.toml");

        let err = Config::load(dir.path(), Some(&path)).unwrap_err();
        assert!(matches!(err, Error::Read { .. }));
    }
}
