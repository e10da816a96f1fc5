use crate::error::Error;

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Render an error as markdown with bold headings and print to stderr.
pub fn print_error(e: &Error) {
    let md = render_error(e);
    for line in md.lines() {
        if line.starts_with('#') {
            eprintln!("{BOLD}{line}{RESET}");
        } else {
            eprintln!("{line}");
        }
    }
    return;
}

/// Render an error as a structured markdown diagnostic: what happened and,
/// where the operator can do something about it, how to fix it.
pub fn render_error(e: &Error) -> String {
    return match e {
        Error::ConfigParse { path, reason } => format!("\
# Error: Invalid Config

Could not parse `{}`: {reason}

## Fix

Correct the file, or remove it to use the defaults.
", path.display()),

        Error::IncompatiblePaths { from, to } => format!("\
# Error: Incompatible Paths

Cannot express a link from `{}` to `{}`.

## Fix

Set `resolution.strategy = \"root\"` or add an alias covering the target.
", from.display(), to.display()),

        Error::Read { path, source } => format!("\
# Error: Read Failed

Could not read `{}`: {source}
", path.display()),

        Error::Terminal(e) => format!("\
# Error: Terminal

{e}

## Fix

Run `lynks` from an interactive terminal, or use `lynks lint`.
"),

        Error::Walk { reason, root } => render_walk(root, reason),

        Error::Write { operation, path, source } => format!("\
# Error: Write Failed

Could not {operation} `{}`: {source}

The original file is unchanged.
", path.display()),
    };
}

/// The configured root could not be scanned.
fn render_walk(root: &std::path::Path, reason: &str) -> String {
    return format!(
        "\
# Error: Cannot Scan Root

`{}`: {reason}

## Fix

Point `root` in `lynks.toml` at an existing directory.
",
        root.display()
    );
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn config_error_names_file_and_reason() {
        let md = render_error(&Error::ConfigParse {
            path: PathBuf::from("lynks.toml"),
            reason: "expected `=`".to_string(),
        });
        assert!(md.starts_with("# Error: Invalid Config"));
        assert!(md.contains("`lynks.toml`: expected `=`"));
    }

    #[test]
    fn write_error_names_operation() {
        let md = render_error(&Error::Write {
            operation: "persist",
            path: PathBuf::from("docs/a.md"),
            source: std::io::Error::other("disk full"),
        });
        assert!(md.contains("Could not persist `docs/a.md`: disk full"));
    }

    #[test]
    fn walk_error_suggests_root() {
        let md = render_error(&Error::Walk {
            reason: "not a directory".to_string(),
            root: PathBuf::from("nowhere"),
        });
        assert!(md.contains("`nowhere`: not a directory"));
        assert!(md.contains("## Fix"));
    }
}
