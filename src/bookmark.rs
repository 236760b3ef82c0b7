use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crossterm::event::{KeyCode, KeyEvent};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A named directory shortcut.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    pub name: String,
    pub path: PathBuf,
}

/// JSON-file-backed bookmark table.
#[derive(Debug, Clone)]
pub struct BookmarkStore {
    file: PathBuf,
}

impl BookmarkStore {
    pub fn new(file: PathBuf) -> Self {
        Self { file }
    }

    /// `<config dir>/dual-pane-fm/bookmarks.json`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("dual-pane-fm").join("bookmarks.json"))
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    /// Read all bookmarks. A missing file is an empty table.
    pub fn load(&self) -> Result<Vec<Bookmark>> {
        match fs::read_to_string(&self.file) {
            Ok(text) if text.trim().is_empty() => Ok(Vec::new()),
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self, bookmarks: &[Bookmark]) -> Result<()> {
        if let Some(parent) = self.file.parent() {
            fs::create_dir_all(parent)?;
        }
        let text = serde_json::to_string_pretty(bookmarks)?;
        fs::write(&self.file, text)?;
        Ok(())
    }

    /// Append a bookmark. Returns false, without writing, if its path is
    /// already stored.
    pub fn add(&self, bookmark: Bookmark) -> Result<bool> {
        let mut all = self.load()?;
        if all.iter().any(|b| b.path == bookmark.path) {
            return Ok(false);
        }
        all.push(bookmark);
        self.save(&all)?;
        Ok(true)
    }

    /// Remove every bookmark pointing at `path`.
    pub fn remove(&self, path: &Path) -> Result<()> {
        let mut all = self.load()?;
        all.retain(|b| b.path != path);
        self.save(&all)
    }
}

/// Result of a key press in the bookmark list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookmarkOutcome {
    Select(PathBuf),
    Close,
}

/// Scrollable selection over the stored bookmarks.
#[derive(Debug, Default)]
pub struct BookmarkList {
    pub entries: Vec<Bookmark>,
    pub cursor: usize,
    pub error: Option<String>,
}

impl BookmarkList {
    pub fn open(store: &BookmarkStore) -> Self {
        let mut list = Self::default();
        list.reload(store);
        list
    }

    fn reload(&mut self, store: &BookmarkStore) {
        match store.load() {
            Ok(entries) => {
                self.entries = entries;
                self.error = None;
            }
            Err(e) => {
                tracing::warn!(file = %store.file().display(), "failed to load bookmarks: {e}");
                self.entries.clear();
                self.error = Some(e.to_string());
            }
        }
        self.cursor = self.cursor.min(self.entries.len().saturating_sub(1));
    }

    pub fn selected(&self) -> Option<&Bookmark> {
        self.entries.get(self.cursor)
    }

    pub fn handle_key(&mut self, key: &KeyEvent, store: &BookmarkStore) -> Option<BookmarkOutcome> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.cursor = self.cursor.saturating_sub(1);
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.cursor + 1 < self.entries.len() {
                    self.cursor += 1;
                }
                None
            }
            KeyCode::Enter => self
                .selected()
                .map(|b| BookmarkOutcome::Select(b.path.clone())),
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(path) = self.selected().map(|b| b.path.clone()) {
                    if let Err(e) = store.remove(&path) {
                        self.error = Some(e.to_string());
                        return None;
                    }
                    self.reload(store);
                }
                None
            }
            KeyCode::Esc | KeyCode::Char('b') | KeyCode::Char('q') => Some(BookmarkOutcome::Close),
            _ => None,
        }
    }
}
