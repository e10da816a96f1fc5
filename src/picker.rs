//! Generic fuzzy-filterable list picker with a bounded viewport.
//!
//! The picker knows nothing about what it lists beyond [`Item`]. Every
//! handler consumes the picker and returns the next one; selection is the
//! only way an item leaves it.

use std::path::PathBuf;

use crate::theme::{Role, Stylist};
use crate::types::{LinkStatus, Reference};

/// Rows shown before the first resize.
const DEFAULT_CAPACITY: usize = 5;

/// Smallest viewport that can hold the cursor plus one row of context.
const MIN_CAPACITY: usize = 2;

/// Rows taken by the picker's own header.
const HEADER_ROWS: usize = 1;

/// Anything that can be listed in a picker.
pub trait Item {
    /// Text shown in the list and matched by search.
    fn title(&self) -> String;

    /// Role used when the item is not under the cursor.
    fn role(&self) -> Role {
        return Role::Text;
    }
}

impl Item for PathBuf {
    fn title(&self) -> String {
        return self.display().to_string();
    }
}

impl Item for Reference {
    fn role(&self) -> Role {
        return match self.status {
            LinkStatus::Remote | LinkStatus::Resolved => Role::Secondary,
            LinkStatus::Unresolved => Role::Warn,
        };
    }

    fn title(&self) -> String {
        return Reference::title(self);
    }
}

/// Input understood by a picker. Terminal key events are mapped onto this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Delete the last query character.
    Backspace,
    /// A printable character.
    Char(char),
    /// Cursor down.
    Down,
    /// Jump to the last item.
    End,
    /// Confirm: select in browse mode, leave search mode otherwise.
    Enter,
    /// Leave search mode.
    Esc,
    /// Jump to the first item.
    Home,
    /// Cursor up.
    Up,
}

/// List state: all items, the filtered view onto them, and the cursor.
#[derive(Debug, Clone)]
pub struct Picker<I> {
    /// Role of the cursor row.
    accent: Role,
    /// Visible rows, excluding the header.
    capacity: usize,
    /// Index into `filtered`.
    cursor: usize,
    /// Indices into `items`, strictly increasing.
    filtered: Vec<usize>,
    /// Everything that was loaded, in load order.
    items: Vec<I>,
    /// Last search text. Kept when search mode ends.
    query: String,
    /// Whether keystrokes currently edit the query.
    searching: bool,
    /// Header label.
    title: String,
}

impl<I: Item + Clone> Picker<I> {
    /// Empty picker with the default viewport.
    pub fn new(title: &str) -> Self {
        return Self {
            accent: Role::Primary,
            capacity: DEFAULT_CAPACITY,
            cursor: 0,
            filtered: Vec::new(),
            items: Vec::new(),
            query: String::new(),
            searching: false,
            title: title.to_string(),
        };
    }

    /// Use `role` to highlight the cursor row.
    #[must_use]
    pub fn accent(mut self, role: Role) -> Self {
        self.accent = role;
        return self;
    }

    /// Visible slice of `filtered` and the cursor's offset within it.
    ///
    /// The cursor is pinned to the top while it is on one of the first two
    /// rows, pinned to the bottom while it is within the last page, and
    /// otherwise keeps exactly one row of context above it.
    pub fn cursor_window(&self) -> (usize, Vec<&I>) {
        let len = self.filtered.len();
        let capacity = self.capacity.max(MIN_CAPACITY);
        let last_page = len.saturating_sub(capacity);

        let (start, relative) = if self.cursor < 2 {
            (0, self.cursor)
        } else if self.cursor >= last_page {
            (last_page, self.cursor.saturating_sub(last_page))
        } else {
            (self.cursor.saturating_sub(1), 1)
        };
        let end = start.saturating_add(capacity).min(len);

        let visible = self
            .filtered
            .get(start..end)
            .unwrap_or_default()
            .iter()
            .filter_map(|&index| return self.items.get(index))
            .collect();
        return (relative, visible);
    }

    /// Position of the cursor within the filtered list.
    #[cfg(test)]
    pub const fn cursor(&self) -> usize {
        return self.cursor;
    }

    /// Items currently matching the query, in load order.
    #[cfg(test)]
    pub fn filtered(&self) -> impl Iterator<Item = &I> {
        return self.filtered.iter().filter_map(|&index| return self.items.get(index));
    }

    /// Rows the picker occupies, header included.
    #[cfg(test)]
    pub const fn height(&self) -> usize {
        return self.capacity.saturating_add(HEADER_ROWS);
    }

    /// Whether keystrokes currently edit the query.
    #[cfg(test)]
    pub const fn is_searching(&self) -> bool {
        return self.searching;
    }

    /// Current query text.
    #[cfg(test)]
    pub fn query(&self) -> &str {
        return &self.query;
    }

    /// Fit the picker into `height` rows, one of which is the header.
    #[must_use]
    pub fn resize(mut self, height: usize) -> Self {
        self.capacity = height.saturating_sub(HEADER_ROWS);
        return self;
    }

    /// Handle one key. Returns the next picker and, when the key confirmed a
    /// choice in browse mode, the selected item.
    #[must_use]
    pub fn update(self, key: Key) -> (Self, Option<I>) {
        if self.searching {
            return (self.update_searching(key), None);
        }
        return self.update_browsing(key);
    }

    /// Render the header and visible rows as lines of styled fragments.
    pub fn view<S: Stylist>(&self, stylist: &S) -> Vec<Vec<S::Output>> {
        let position = if self.filtered.is_empty() { 0 } else { self.cursor.saturating_add(1) };
        let count = format!("({position}/{})", self.filtered.len());

        let header = if self.searching {
            vec![
                stylist.render(&format!("Search {count}"), Role::Heading),
                stylist.render(&format!(" {}_", self.query), Role::Text),
            ]
        } else {
            let hint = if self.query.is_empty() { " / to search".to_string() } else { format!(" {}", self.query) };
            vec![
                stylist.render(&format!("{} {count}", self.title), Role::Heading),
                stylist.render(&hint, Role::Faded),
            ]
        };

        let (relative, visible) = self.cursor_window();
        let mut lines = Vec::with_capacity(visible.len().saturating_add(1));
        lines.push(header);
        for (row, item) in visible.into_iter().enumerate() {
            let line = if row == relative {
                stylist.render(&format!("> {}", item.title()), self.accent)
            } else {
                stylist.render(&format!("  {}", item.title()), item.role())
            };
            lines.push(vec![line]);
        }
        return lines;
    }

    /// Replace the items, re-applying the current query.
    #[must_use]
    pub fn with_items(mut self, items: Vec<I>) -> Self {
        self.items = items;
        return self.apply_filter();
    }

    /// Pre-seed the query and filter on it, staying in browse mode.
    #[must_use]
    pub fn with_query(mut self, query: &str) -> Self {
        self.query = query.to_string();
        self.searching = false;
        return self.apply_filter();
    }

    /// Recompute `filtered` from `query`. The cursor always resets, since
    /// its old position means nothing in a different list.
    fn apply_filter(mut self) -> Self {
        self.cursor = 0;
        let query = self.query.to_lowercase();
        self.filtered = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| return is_subsequence(&query, &item.title().to_lowercase()))
            .map(|(index, _)| return index)
            .collect();
        return self;
    }

    /// Move the cursor by one row, clamped to the filtered list.
    fn cursor_down(mut self) -> Self {
        if self.cursor.saturating_add(1) < self.filtered.len() {
            self.cursor = self.cursor.saturating_add(1);
        }
        return self;
    }

    /// Move the cursor up by one row, stopping at the first.
    fn cursor_up(mut self) -> Self {
        self.cursor = self.cursor.saturating_sub(1);
        return self;
    }

    /// Index of the last filtered item, or 0 when empty.
    fn last_index(&self) -> usize {
        return self.filtered.len().saturating_sub(1);
    }

    /// Browse mode: navigation, entering search, and selection.
    fn update_browsing(mut self, key: Key) -> (Self, Option<I>) {
        match key {
            Key::Char('/') => self.searching = true,
            Key::Char('h') | Key::Home => self.cursor = 0,
            Key::Char('l') | Key::End => self.cursor = self.last_index(),
            Key::Char('k') | Key::Up => return (self.cursor_up(), None),
            Key::Char('j') | Key::Down => return (self.cursor_down(), None),
            Key::Enter => {
                let selected = self
                    .filtered
                    .get(self.cursor)
                    .and_then(|&index| return self.items.get(index))
                    .cloned();
                return (self, selected);
            },
            Key::Backspace | Key::Char(_) | Key::Esc => {},
        }
        return (self, None);
    }

    /// Search mode: edit the query and refilter on every change.
    fn update_searching(mut self, key: Key) -> Self {
        match key {
            Key::Up => return self.cursor_up(),
            Key::Down => return self.cursor_down(),
            Key::Esc | Key::Enter => self.searching = false,
            Key::Backspace => {
                if self.query.pop().is_some() {
                    return self.apply_filter();
                }
            },
            Key::Char(c) => {
                self.query.push(c);
                return self.apply_filter();
            },
            Key::Home | Key::End => {},
        }
        return self;
    }
}

/// True when every character of `needle` appears in `haystack` in order.
fn is_subsequence(needle: &str, haystack: &str) -> bool {
    let mut remaining = haystack.chars();
    return needle.chars().all(|wanted| return remaining.any(|c| return c == wanted));
}
