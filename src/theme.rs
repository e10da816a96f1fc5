//! Styling capability injected into pickers, views, and the lint report.
//!
//! Core code only names a [`Role`]; how a role looks is up to the
//! [`Stylist`] it is handed.

use colored::Colorize as _;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;

/// What a piece of text means, independent of how it is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Failure summary.
    Alert,
    /// Hints and secondary information.
    Faded,
    /// Section and picker headers.
    Heading,
    /// Default emphasis, file picker accent.
    Primary,
    /// Reference picker accent.
    Secondary,
    /// Unstyled body text.
    Text,
    /// Unresolved links, link fixer accent.
    Warn,
}

/// Renders text in a role. The output type is whatever the surface draws.
pub trait Stylist {
    /// Styled text for this surface.
    type Output;

    /// Style `text` for `role`.
    fn render(&self, text: &str, role: Role) -> Self::Output;
}

/// ANSI escapes for plain terminal output. Respects `NO_COLOR` through
/// `colored`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnsiTheme;

impl Stylist for AnsiTheme {
    type Output = String;

    fn render(&self, text: &str, role: Role) -> String {
        let styled = match role {
            Role::Alert => text.red().bold(),
            Role::Faded => text.bright_black(),
            Role::Heading => text.white().bold().on_blue(),
            Role::Primary => text.bright_blue(),
            Role::Secondary => text.cyan(),
            Role::Text => text.normal(),
            Role::Warn => text.yellow(),
        };
        return styled.to_string();
    }
}

/// Styles for the interactive ratatui views.
#[derive(Debug, Clone, Copy, Default)]
pub struct TuiTheme;

impl TuiTheme {
    /// Style backing each role.
    const fn style(role: Role) -> Style {
        let base = Style::new();
        return match role {
            Role::Alert => base.fg(Color::Red).add_modifier(Modifier::BOLD),
            Role::Faded => base.fg(Color::Gray),
            Role::Heading => base.fg(Color::White).bg(Color::Indexed(147)).add_modifier(Modifier::BOLD),
            Role::Primary => base.fg(Color::Indexed(147)),
            Role::Secondary => base.fg(Color::Indexed(32)),
            Role::Text => base,
            Role::Warn => base.fg(Color::Indexed(214)),
        };
    }
}

impl Stylist for TuiTheme {
    type Output = Span<'static>;

    fn render(&self, text: &str, role: Role) -> Span<'static> {
        let text = if role == Role::Heading { format!(" {text} ") } else { text.to_string() };
        return Span::styled(text, Self::style(role));
    }
}

/// Leaves text untouched.
#[cfg(test)]
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTheme;

#[cfg(test)]
impl Stylist for PlainTheme {
    type Output = String;

    fn render(&self, text: &str, _role: Role) -> String {
        return text.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_theme_is_identity() {
        assert_eq!(PlainTheme.render("abc", Role::Warn), "abc");
    }

    #[test]
    fn tui_heading_is_padded_and_bold() {
        let span = TuiTheme.render("Files", Role::Heading);
        assert_eq!(span.content, " Files ");
        assert!(span.style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn ansi_theme_keeps_text() {
        colored::control::set_override(false);
        assert_eq!(AnsiTheme.render("summary", Role::Alert), "summary");
    }
}
