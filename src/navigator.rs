//! Three-stage navigation: choose a document, choose one of its links,
//! choose the document the link should point at.
//!
//! The navigator is owned by the event loop and moved through every
//! transition. Confirming a fix rewrites the document on disk and re-reads
//! it before any of its links are shown again.

use std::path::PathBuf;

use crate::config::Config;
use crate::error::Error;
use crate::picker::{Key, Picker};
use crate::rewrite;
use crate::scanner;
use crate::theme::{Role, Stylist};
use crate::types::{Document, Reference};

/// Rows above the link picker: the "Links for" header.
const LINK_PICKER_HEADER_ROWS: usize = 1;

/// Rows above the link fixer: the "Fix links for" header, the link being
/// fixed, and a spacer.
const LINK_FIXER_HEADER_ROWS: usize = 3;

/// One discrete input to the navigator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// A key meant for the active picker.
    Key(Key),
    /// Leave immediately.
    Quit,
    /// The terminal now has `height` rows.
    Resize {
        /// Total terminal rows.
        height: usize,
    },
}

/// Whether the event loop should keep running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Draw and wait for the next event.
    Continue,
    /// Tear down the terminal and exit.
    Quit,
}

/// Which picker currently receives keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Choosing a replacement target for the selected link.
    LinkFixer,
    /// Choosing a link in the open document.
    LinkPicker,
    /// Choosing a document.
    FilePicker,
}

/// Navigation state across the three pickers.
#[derive(Debug, Clone)]
pub struct Navigator {
    /// Session config, never changed.
    config: Config,
    /// Document open in the link picker and fixer.
    document: Option<Document>,
    /// Every scanned document.
    file_picker: Picker<PathBuf>,
    /// Every scanned document, as repair candidates.
    link_fixer: Picker<PathBuf>,
    /// Links of the open document.
    link_picker: Picker<Reference>,
    /// Link being fixed.
    reference: Option<Reference>,
    /// Active picker.
    stage: Stage,
}

impl Navigator {
    /// Start in the file picker over `documents`.
    pub fn new(config: Config, documents: Vec<PathBuf>) -> Self {
        return Self {
            config,
            document: None,
            file_picker: Picker::new("File to check").accent(Role::Primary).with_items(documents.clone()),
            link_fixer: Picker::new("Fix link").accent(Role::Warn).with_items(documents),
            link_picker: Picker::new("Edit Link").accent(Role::Secondary),
            reference: None,
            stage: Stage::FilePicker,
        };
    }

    /// Document currently open, if any.
    #[cfg(test)]
    pub const fn document(&self) -> Option<&Document> {
        return self.document.as_ref();
    }

    /// Render the active stage as lines of styled fragments.
    pub fn lines<S: Stylist>(&self, stylist: &S) -> Vec<Vec<S::Output>> {
        return match self.stage {
            Stage::FilePicker => self.file_picker.view(stylist),
            Stage::LinkFixer => self.link_fixer_lines(stylist),
            Stage::LinkPicker => self.link_picker_lines(stylist),
        };
    }

    /// Links of the open document as currently filtered.
    #[cfg(test)]
    pub fn references(&self) -> impl Iterator<Item = &Reference> {
        return self.link_picker.filtered();
    }

    /// Active picker.
    pub const fn stage(&self) -> Stage {
        return self.stage;
    }

    /// Apply one event and return the next navigator.
    ///
    /// # Errors
    ///
    /// Returns `Error::Read`, `Error::Write`, or `Error::IncompatiblePaths`
    /// when opening a document or applying a fix fails. The session cannot
    /// continue past any of these.
    pub fn update(mut self, event: Event) -> Result<(Self, Flow), Error> {
        match event {
            Event::Quit => return Ok((self, Flow::Quit)),
            Event::Resize { height } => {
                self.file_picker = self.file_picker.resize(height);
                self.link_picker = self.link_picker.resize(height.saturating_sub(LINK_PICKER_HEADER_ROWS));
                self.link_fixer = self.link_fixer.resize(height.saturating_sub(LINK_FIXER_HEADER_ROWS));
                return Ok((self, Flow::Continue));
            },
            Event::Key(key) => {
                let next = match self.stage {
                    Stage::FilePicker => self.on_file_picker_key(key)?,
                    Stage::LinkFixer => self.on_link_fixer_key(key)?,
                    Stage::LinkPicker => self.on_link_picker_key(key),
                };
                return Ok((next, Flow::Continue));
            },
        }
    }

    /// Link being fixed, rewritten to `replacement`, persisted, and re-read.
    ///
    /// # Errors
    ///
    /// Returns errors from computing the link, writing, or re-reading.
    fn apply_fix(mut self, replacement: &std::path::Path) -> Result<Self, Error> {
        self.stage = Stage::LinkPicker;
        let (Some(document), Some(reference)) = (self.document.take(), self.reference.take()) else {
            return Ok(self);
        };

        let repaired = rewrite::repair(&self.config, &document, &reference, replacement)?;
        rewrite::write_document(&repaired)?;

        let (document, references) = scanner::read_document(&self.config, &repaired.path)?;
        self.document = Some(document);
        self.link_picker = self.link_picker.with_items(references);
        return Ok(self);
    }

    /// Header lines over the link fixer.
    fn link_fixer_lines<S: Stylist>(&self, stylist: &S) -> Vec<Vec<S::Output>> {
        let mut lines = vec![self.open_document_header(stylist, "Fix links for")];
        if let Some(reference) = &self.reference {
            lines.push(vec![stylist.render(&format!("    {}", reference.title()), Role::Secondary)]);
        }
        lines.push(Vec::new());
        lines.extend(self.link_fixer.view(stylist));
        return lines;
    }

    /// Header lines over the link picker, or a hint when there are no links.
    fn link_picker_lines<S: Stylist>(&self, stylist: &S) -> Vec<Vec<S::Output>> {
        let mut lines = vec![self.open_document_header(stylist, "Links for")];
        let has_links = self.document.as_ref().is_some_and(|d| return d.has_links);
        if has_links {
            lines.extend(self.link_picker.view(stylist));
        } else {
            lines.push(vec![stylist.render("No links found in file", Role::Faded)]);
            lines.push(vec![stylist.render("<esc> to go back to files", Role::Faded)]);
        }
        return lines;
    }

    /// File picker: selecting a document opens it.
    ///
    /// # Errors
    ///
    /// Returns `Error::Read` if the chosen document cannot be read.
    fn on_file_picker_key(mut self, key: Key) -> Result<Self, Error> {
        let (picker, selected) = self.file_picker.update(key);
        self.file_picker = picker;
        let Some(path) = selected else {
            return Ok(self);
        };

        let (document, references) = scanner::read_document(&self.config, &path)?;
        self.document = Some(document);
        self.link_picker = self.link_picker.with_query("").with_items(references);
        self.stage = Stage::LinkPicker;
        return Ok(self);
    }

    /// Link fixer: Esc goes back (ending any search on the way), selecting
    /// a document applies the fix.
    ///
    /// # Errors
    ///
    /// Returns errors from applying the fix.
    fn on_link_fixer_key(mut self, key: Key) -> Result<Self, Error> {
        if key == Key::Esc {
            self.link_fixer = self.link_fixer.update(Key::Esc).0;
            self.reference = None;
            self.stage = Stage::LinkPicker;
            return Ok(self);
        }

        let (picker, selected) = self.link_fixer.update(key);
        self.link_fixer = picker;
        return match selected {
            Some(replacement) => self.apply_fix(&replacement),
            None => Ok(self),
        };
    }

    /// Link picker: Esc goes back (ending any search on the way), selecting
    /// a link opens the fixer with its file name as the search.
    fn on_link_picker_key(mut self, key: Key) -> Self {
        if key == Key::Esc {
            self.link_picker = self.link_picker.update(Key::Esc).0;
            self.document = None;
            self.reference = None;
            self.stage = Stage::FilePicker;
            return self;
        }

        let (picker, selected) = self.link_picker.update(key);
        self.link_picker = picker;
        if let Some(reference) = selected {
            self.link_fixer = self.link_fixer.with_query(reference.file_name());
            self.reference = Some(reference);
            self.stage = Stage::LinkFixer;
        }
        return self;
    }

    /// "<label> <path>" header naming the open document.
    fn open_document_header<S: Stylist>(&self, stylist: &S, label: &str) -> Vec<S::Output> {
        let path = self
            .document
            .as_ref()
            .map(|d| return d.path.display().to_string())
            .unwrap_or_default();
        return vec![stylist.render(label, Role::Heading), stylist.render(&format!(" {path}"), Role::Primary)];
    }
}
