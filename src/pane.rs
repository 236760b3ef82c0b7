use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::fs::entry::Entry;

/// Rows taken by the pane border and header.
const CHROME_ROWS: usize = 3;

/// Which half of the screen a pane occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaneId {
    Left,
    Right,
}

impl PaneId {
    pub fn index(self) -> usize {
        match self {
            PaneId::Left => 0,
            PaneId::Right => 1,
        }
    }

    pub fn other(self) -> Self {
        match self {
            PaneId::Left => PaneId::Right,
            PaneId::Right => PaneId::Left,
        }
    }
}

impl fmt::Display for PaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaneId::Left => write!(f, "left"),
            PaneId::Right => write!(f, "right"),
        }
    }
}

/// Incremental name filter active while the pane is in search mode.
#[derive(Debug, Clone, Default)]
pub struct SearchFilter {
    pub query: String,
    /// Indices into the pane's full listing that match `query`.
    pub filtered: Vec<usize>,
    /// Cursor before filtering started, restored on cancel.
    pub saved_cursor: usize,
}

/// One directory listing with its cursor, scroll, marks and filter.
#[derive(Debug)]
pub struct PaneState {
    pub id: PaneId,
    pub dir: PathBuf,
    pub entries: Vec<Entry>,
    pub cursor: usize,
    pub offset: usize,
    pub width: u16,
    pub height: u16,
    pub marked: HashSet<String>,
    pub search: Option<SearchFilter>,
    pub error: Option<String>,
}

impl PaneState {
    pub fn new(id: PaneId, dir: PathBuf) -> Self {
        Self {
            id,
            dir,
            entries: Vec::new(),
            cursor: 0,
            offset: 0,
            width: 0,
            height: 0,
            marked: HashSet::new(),
            search: None,
            error: None,
        }
    }

    // === Visible sequence ===

    fn filter_active(&self) -> Option<&SearchFilter> {
        self.search.as_ref().filter(|s| !s.query.is_empty())
    }

    /// Length of the visible sequence (filtered when a query is active).
    pub fn visible_len(&self) -> usize {
        match self.filter_active() {
            Some(filter) => filter.filtered.len(),
            None => self.entries.len(),
        }
    }

    /// Map a visible position to an index in the full listing.
    pub fn listing_index(&self, visible: usize) -> Option<usize> {
        match self.filter_active() {
            Some(filter) => filter.filtered.get(visible).copied(),
            None => (visible < self.entries.len()).then_some(visible),
        }
    }

    pub fn visible_entry(&self, visible: usize) -> Option<&Entry> {
        self.listing_index(visible).and_then(|i| self.entries.get(i))
    }

    pub fn selected_entry(&self) -> Option<&Entry> {
        self.visible_entry(self.cursor)
    }

    /// Absolute path an entry refers to; `..` maps to the parent directory.
    pub fn entry_path(&self, entry: &Entry) -> PathBuf {
        if entry.is_parent() {
            self.parent_dir().unwrap_or_else(|| self.dir.clone())
        } else {
            self.dir.join(&entry.name)
        }
    }

    pub fn selected_path(&self) -> Option<PathBuf> {
        self.selected_entry().map(|e| self.entry_path(e))
    }

    pub fn parent_dir(&self) -> Option<PathBuf> {
        self.dir.parent().map(Path::to_path_buf)
    }

    // === Geometry ===

    pub fn set_size(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.adjust_offset();
    }

    /// Number of entry rows that fit in the pane, at least 1.
    pub fn page_size(&self) -> usize {
        (self.height as usize).saturating_sub(CHROME_ROWS).max(1)
    }

    /// Keep the cursor inside the viewport.
    pub fn adjust_offset(&mut self) {
        let page = self.page_size();
        if self.cursor < self.offset {
            self.offset = self.cursor;
        } else if self.cursor >= self.offset + page {
            self.offset = self.cursor + 1 - page;
        }
    }

    fn clamp_cursor(&mut self) {
        let len = self.visible_len();
        if len == 0 {
            self.cursor = 0;
            self.offset = 0;
        } else if self.cursor >= len {
            self.cursor = len - 1;
        }
        if self.offset > self.cursor {
            self.offset = self.cursor;
        }
        self.adjust_offset();
    }

    // === Listing ===

    /// Replace the listing. A different directory resets cursor and scroll;
    /// a reload of the same directory keeps the cursor, clamped. Marks are
    /// always cleared.
    pub fn set_listing(&mut self, dir: PathBuf, entries: Vec<Entry>) {
        if dir != self.dir {
            self.cursor = 0;
            self.offset = 0;
        }
        self.dir = dir;
        self.entries = entries;
        self.marked.clear();
        self.error = None;
        if let Some(query) = self.search.as_ref().map(|s| s.query.clone()) {
            self.recompute_filter(&query);
        }
        self.clamp_cursor();
    }

    pub fn set_error(&mut self, message: String) {
        self.error = Some(message);
    }

    // === Cursor motion ===

    pub fn move_up(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
        self.adjust_offset();
    }

    pub fn move_down(&mut self) {
        if self.cursor + 1 < self.visible_len() {
            self.cursor += 1;
        }
        self.adjust_offset();
    }

    pub fn page_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(self.page_size());
        self.adjust_offset();
    }

    pub fn page_down(&mut self) {
        let len = self.visible_len();
        if len > 0 {
            self.cursor = (self.cursor + self.page_size()).min(len - 1);
        }
        self.adjust_offset();
    }

    pub fn go_top(&mut self) {
        self.cursor = 0;
        self.adjust_offset();
    }

    pub fn go_bottom(&mut self) {
        self.cursor = self.visible_len().saturating_sub(1);
        self.adjust_offset();
    }

    // === Search ===

    pub fn is_searching(&self) -> bool {
        self.search.is_some()
    }

    /// Begin filtering with an empty query, dropping any previous filter.
    pub fn start_search(&mut self) {
        self.search = Some(SearchFilter {
            query: String::new(),
            filtered: (0..self.entries.len()).collect(),
            saved_cursor: self.cursor,
        });
    }

    /// Refilter against `query` and reset the cursor to the top.
    pub fn update_search(&mut self, query: &str) {
        if self.search.is_none() {
            return;
        }
        self.recompute_filter(query);
        self.cursor = 0;
        self.offset = 0;
    }

    fn recompute_filter(&mut self, query: &str) {
        let needle = query.to_lowercase();
        let filtered = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.name.to_lowercase().contains(&needle))
            .map(|(i, _)| i)
            .collect();
        if let Some(search) = self.search.as_mut() {
            search.query = query.to_string();
            search.filtered = filtered;
        }
    }

    /// Leave search mode. Confirming keeps the entry selected in the
    /// filtered view; cancelling restores the cursor saved at search start.
    pub fn end_search(&mut self, confirm: bool) {
        let Some(search) = self.search.take() else {
            return;
        };
        let relocated = if confirm && !search.query.is_empty() {
            search
                .filtered
                .get(self.cursor)
                .and_then(|&i| self.entries.get(i))
                .map(|e| e.name.clone())
                .and_then(|name| self.entries.iter().position(|e| e.name == name))
        } else if confirm {
            Some(self.cursor)
        } else {
            None
        };
        self.cursor = relocated.unwrap_or(search.saved_cursor);
        self.clamp_cursor();
    }

    pub fn search_query(&self) -> Option<&str> {
        self.search.as_ref().map(|s| s.query.as_str())
    }

    // === Marks ===

    pub fn is_marked(&self, name: &str) -> bool {
        self.marked.contains(name)
    }

    pub fn marked_count(&self) -> usize {
        self.marked.len()
    }

    /// Marked entries as absolute paths, in listing order.
    pub fn marked_paths(&self) -> Vec<PathBuf> {
        self.entries
            .iter()
            .filter(|e| self.marked.contains(&e.name))
            .map(|e| self.dir.join(&e.name))
            .collect()
    }

    pub fn clear_marks(&mut self) {
        self.marked.clear();
    }

    fn mark_selected(&mut self, toggle: bool) {
        let Some(name) = self
            .selected_entry()
            .filter(|e| !e.is_parent())
            .map(|e| e.name.clone())
        else {
            return;
        };
        if toggle && self.marked.contains(&name) {
            self.marked.remove(&name);
        } else {
            self.marked.insert(name);
        }
    }

    /// Toggle the mark on the selection, then advance one row.
    pub fn toggle_mark(&mut self) {
        self.mark_selected(true);
        self.move_down();
    }

    /// Clear every mark if any exist, otherwise mark every non-parent entry.
    pub fn toggle_all_marks(&mut self) {
        if !self.marked.is_empty() {
            self.marked.clear();
            return;
        }
        self.marked = self
            .entries
            .iter()
            .filter(|e| !e.is_parent())
            .map(|e| e.name.clone())
            .collect();
    }

    pub fn move_up_with_mark(&mut self) {
        self.move_up();
        self.mark_selected(false);
    }

    pub fn move_down_with_mark(&mut self) {
        self.move_down();
        self.mark_selected(false);
    }
}
