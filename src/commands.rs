//! CLI commands for lynks: the lint report and the interactive navigator.

use std::path::PathBuf;
use std::process::ExitCode;

use crate::config::Config;
use crate::error::Error;
use crate::scanner;
use crate::theme::{AnsiTheme, Role, Stylist};
use crate::tui;

/// Horizontal padding inside the summary box.
const BOX_PADDING: usize = 2;

/// Counts gathered by one lint pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct LintTotals {
    /// Documents read.
    files: usize,
    /// References extracted across all documents.
    links: usize,
    /// References classified as unresolved.
    unresolved: usize,
}

/// Open the interactive navigator over every document under the root.
///
/// # Errors
///
/// Returns errors from enumeration, the terminal, or any repair.
pub fn interactive(config: Config) -> Result<ExitCode, Error> {
    let documents = scanner::enumerate_documents(&config)?;
    tracing::info!(documents = documents.len(), "starting navigator");
    tui::run(config, documents)?;
    return Ok(ExitCode::SUCCESS);
}

/// Report unresolved references per document, then a summary box.
/// Exits 1 when anything is unresolved, 0 otherwise.
///
/// # Errors
///
/// Returns errors from enumeration or reading a document.
pub fn lint(config: &Config) -> Result<ExitCode, Error> {
    let documents = scanner::enumerate_documents(config)?;
    let (lines, totals) = lint_report(&AnsiTheme, config, &documents)?;
    for line in &lines {
        println!("{line}");
    }

    tracing::info!(
        files = totals.files,
        links = totals.links,
        unresolved = totals.unresolved,
        "lint finished"
    );
    if totals.unresolved > 0 {
        return Ok(ExitCode::FAILURE);
    }
    return Ok(ExitCode::SUCCESS);
}

/// Build the lint output for `documents`. Documents whose links all
/// resolve produce no section of their own.
///
/// # Errors
///
/// Returns `Error::Read` if any document cannot be read.
fn lint_report<S: Stylist<Output = String>>(
    stylist: &S,
    config: &Config,
    documents: &[PathBuf],
) -> Result<(Vec<String>, LintTotals), Error> {
    let mut lines = Vec::new();
    let mut totals = LintTotals {
        files: documents.len(),
        ..LintTotals::default()
    };

    for path in documents {
        let (document, references) = scanner::read_document(config, path)?;
        totals.links = totals.links.saturating_add(references.len());
        if !document.has_unresolved_links {
            continue;
        }

        lines.push(stylist.render(&format!(" {} ", document.path.display()), Role::Heading));
        lines.push(stylist.render("Unresolved links:", Role::Faded));
        for reference in references.iter().filter(|r| return r.is_unresolved()) {
            totals.unresolved = totals.unresolved.saturating_add(1);
            lines.push(stylist.render(&format!("  {}", reference.title()), Role::Warn));
        }
    }

    let verdict = if totals.unresolved > 0 {
        ("Found unresolved links".to_string(), Role::Alert)
    } else {
        (" No unresolved links! ".to_string(), Role::Heading)
    };
    let rows = [
        Some((" Summary ".to_string(), Role::Heading)),
        Some((format!("{} files checked", totals.files), Role::Primary)),
        Some((format!("{} links checked", totals.links), Role::Primary)),
        Some((format!("{} unresolved links found", totals.unresolved), Role::Primary)),
        None,
        Some(verdict),
    ];
    lines.extend(boxed(stylist, &rows));
    return Ok((lines, totals));
}

/// Draw `rows` inside a single-line border with one blank row above and
/// below. `None` is an empty row.
fn boxed<S: Stylist<Output = String>>(stylist: &S, rows: &[Option<(String, Role)>]) -> Vec<String> {
    let width = rows
        .iter()
        .flatten()
        .map(|(text, _)| return text.chars().count())
        .max()
        .unwrap_or(0);
    let inner = width.saturating_add(BOX_PADDING.saturating_mul(2));
    let margin = " ".repeat(BOX_PADDING);
    let blank = format!("│{}│", " ".repeat(inner));

    let mut lines = vec![format!("┌{}┐", "─".repeat(inner)), blank.clone()];
    for row in rows {
        let line = match row {
            Some((text, role)) => {
                let fill = " ".repeat(width.saturating_sub(text.chars().count()));
                format!("│{margin}{}{fill}{margin}│", stylist.render(text, *role))
            },
            None => blank.clone(),
        };
        lines.push(line);
    }
    lines.push(blank);
    lines.push(format!("└{}┘", "─".repeat(inner)));
    return lines;
}
