use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crossterm::event::KeyEvent;
use ratatui::layout::Rect;

use crate::bookmark::{Bookmark, BookmarkList, BookmarkOutcome, BookmarkStore};
use crate::config::expand_tilde;
use crate::dialog::{Dialog, DialogResult, PendingAction};
use crate::error::FsError;
use crate::event::{Event, FileOpResult};
use crate::fs::clipboard::{ClipboardOp, ClipboardState};
use crate::fs::entry::{normalize, Entry};
use crate::fs::opener;
use crate::handler;
use crate::keymap::KeyMap;
use crate::pane::{PaneId, PaneState};
use crate::preview::{PreviewContent, PreviewState};
use crate::tasks::{FileOp, TaskSpawner};
use crate::text_input::TextInput;
use crate::theme::ThemeColors;
use crate::ui;

/// Input-interpretation context.
#[derive(Debug)]
pub enum AppMode {
    Normal,
    Dialog(Dialog),
    Search,
    Bookmark(BookmarkList),
    Help,
}

/// Transient message shown in the status bar.
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
    pub created: Instant,
}

/// Startup settings handed to the controller.
pub struct AppOptions {
    pub keymap: KeyMap,
    pub theme: ThemeColors,
    pub bookmarks: BookmarkStore,
    pub show_preview: bool,
    pub max_preview_bytes: usize,
    pub status_timeout: Duration,
}

/// Main application state: both panes, clipboard, mode and everything the
/// renderer reads.
pub struct App {
    pub panes: [PaneState; 2],
    pub active: PaneId,
    pub mode: AppMode,
    pub clipboard: ClipboardState,
    /// Paths frozen when a multi-delete confirmation opens.
    pub pending_delete: Vec<PathBuf>,
    pub preview: PreviewState,
    pub search_input: TextInput,
    pub status_message: Option<StatusMessage>,
    pub keymap: KeyMap,
    pub theme: ThemeColors,
    pub bookmarks: BookmarkStore,
    pub should_quit: bool,
    pub width: u16,
    pub height: u16,
    max_preview_bytes: usize,
    status_timeout: Duration,
    loaded: [bool; 2],
    tasks: TaskSpawner,
}

impl App {
    /// Create the controller and issue the initial listing of both panes.
    pub fn new(left: PathBuf, right: PathBuf, options: AppOptions, tasks: TaskSpawner) -> Self {
        tasks.load_dir(PaneId::Left, left.clone());
        tasks.load_dir(PaneId::Right, right.clone());
        Self {
            panes: [
                PaneState::new(PaneId::Left, left),
                PaneState::new(PaneId::Right, right),
            ],
            active: PaneId::Left,
            mode: AppMode::Normal,
            clipboard: ClipboardState::new(),
            pending_delete: Vec::new(),
            preview: PreviewState::new(options.show_preview),
            search_input: TextInput::default(),
            status_message: None,
            keymap: options.keymap,
            theme: options.theme,
            bookmarks: options.bookmarks,
            should_quit: false,
            width: 0,
            height: 0,
            max_preview_bytes: options.max_preview_bytes,
            status_timeout: options.status_timeout,
            loaded: [false, false],
            tasks,
        }
    }

    /// Both initial listings have completed (successfully or not).
    pub fn is_ready(&self) -> bool {
        self.loaded.iter().all(|&l| l)
    }

    pub fn pane(&self, id: PaneId) -> &PaneState {
        &self.panes[id.index()]
    }

    pub fn pane_mut(&mut self, id: PaneId) -> &mut PaneState {
        &mut self.panes[id.index()]
    }

    pub fn active_pane(&self) -> &PaneState {
        self.pane(self.active)
    }

    pub fn active_pane_mut(&mut self) -> &mut PaneState {
        self.pane_mut(self.active)
    }

    // === Event entry point ===

    /// Apply one event from the inbox.
    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => handler::handle_key_event(self, key),
            Event::Tick => self.clear_expired_status(),
            Event::Resize(w, h) => self.resize(w, h),
            Event::DirLoaded { pane, path, result } => self.on_dir_loaded(pane, path, result),
            Event::PreviewLoaded { path, result } => self.on_preview_loaded(path, result),
            Event::FileOpComplete(result) => self.on_file_op_complete(result),
        }
    }

    /// Last arrival wins: no check that `path` is the most recently
    /// requested directory for the pane.
    fn on_dir_loaded(&mut self, id: PaneId, path: PathBuf, result: Result<Vec<Entry>, FsError>) {
        self.loaded[id.index()] = true;
        match result {
            Ok(entries) => {
                tracing::debug!(pane = %id, dir = %path.display(), count = entries.len(), "directory loaded");
                self.pane_mut(id).set_listing(path, entries);
                if id == self.active {
                    self.refresh_preview();
                }
            }
            Err(e) => {
                tracing::warn!(pane = %id, dir = %path.display(), "directory load failed: {e}");
                self.pane_mut(id).set_error(e.to_string());
                self.set_status(format!("Error: {e}"), true);
            }
        }
    }

    fn on_preview_loaded(&mut self, path: PathBuf, result: Result<PreviewContent, FsError>) {
        if !self.preview.visible {
            return;
        }
        match result {
            Ok(content) => self.preview.set_content(path, content),
            Err(e) => self.preview.set_error(path, format!("Error: {e}")),
        }
    }

    fn on_file_op_complete(&mut self, result: FileOpResult) {
        let text = result.status_text();
        match &result.error {
            None => tracing::info!(kind = %result.kind, total = result.total, "file operation completed"),
            Some(e) => tracing::warn!(
                kind = %result.kind,
                completed = result.completed,
                total = result.total,
                "file operation failed: {e}"
            ),
        }
        self.set_status(text, result.error.is_some());
        self.reload_panes();
    }

    fn reload_panes(&self) {
        for pane in &self.panes {
            self.tasks.load_dir(pane.id, pane.dir.clone());
        }
    }

    // === Navigation ===

    /// Apply a cursor motion to the active pane and refresh the preview.
    pub fn navigate(&mut self, motion: fn(&mut PaneState)) {
        motion(self.active_pane_mut());
        self.refresh_preview();
    }

    /// Enter the selected directory, or hand a file to the default app.
    pub fn open_selected(&mut self) {
        let pane = self.active_pane();
        let Some(entry) = pane.selected_entry() else {
            return;
        };
        let path = pane.entry_path(entry);
        if entry.is_dir {
            self.tasks.load_dir(self.active, path);
        } else if let Err(e) = opener::open_path(&path) {
            tracing::warn!(path = %path.display(), "open failed: {e}");
            self.set_status(format!("Open failed: {e}"), true);
        }
    }

    pub fn go_parent(&mut self) {
        let pane = self.active_pane();
        if let Some(parent) = pane.parent_dir().filter(|p| *p != pane.dir) {
            self.tasks.load_dir(self.active, parent);
        }
    }

    pub fn switch_pane(&mut self) {
        self.active = self.active.other();
        self.refresh_preview();
    }

    pub fn toggle_preview(&mut self) {
        self.preview.toggle();
        self.update_layout();
        self.refresh_preview();
    }

    /// Issue a preview load for the active selection, if the preview is shown.
    pub fn refresh_preview(&mut self) {
        if !self.preview.visible {
            return;
        }
        match self.active_pane().selected_path() {
            Some(path) => self.tasks.load_preview(path, self.max_preview_bytes),
            None => self.preview.clear(),
        }
    }

    // === Marks ===

    pub fn toggle_mark(&mut self) {
        self.navigate(PaneState::toggle_mark);
    }

    pub fn toggle_all_marks(&mut self) {
        self.active_pane_mut().toggle_all_marks();
    }

    pub fn mark_up(&mut self) {
        self.navigate(PaneState::move_up_with_mark);
    }

    pub fn mark_down(&mut self) {
        self.navigate(PaneState::move_down_with_mark);
    }

    // === Clipboard ===

    /// Fill the clipboard from the marks, or else the single selection.
    pub fn yank(&mut self, op: ClipboardOp) {
        let verb = match op {
            ClipboardOp::Copy => "Copied",
            ClipboardOp::Move => "Cut",
        };
        let pane = self.active_pane();
        let marked = pane.marked_paths();
        if !marked.is_empty() {
            let count = marked.len();
            self.clipboard.set(marked, op);
            self.set_status(format!("{verb} {count} files to clipboard"), false);
            return;
        }
        let Some(entry) = pane.selected_entry().filter(|e| !e.is_parent()) else {
            return;
        };
        let name = entry.name.clone();
        let path = pane.entry_path(entry);
        self.clipboard.set(vec![path], op);
        self.set_status(format!("{verb} to clipboard: {name}"), false);
    }

    /// Hand the clipboard to a background batch targeting the other pane.
    pub fn paste(&mut self) {
        let Some((sources, op)) = self.clipboard.take() else {
            return;
        };
        self.active_pane_mut().clear_marks();
        let dest = self.pane(self.active.other()).dir.clone();
        let file_op = match op {
            ClipboardOp::Copy => FileOp::Copy { sources, dest },
            ClipboardOp::Move => FileOp::Move { sources, dest },
        };
        self.tasks.run_file_op(file_op);
    }

    // === Dialog openers ===

    fn open_dialog(&mut self, dialog: Dialog) {
        tracing::debug!(action = %dialog.action, "open dialog");
        self.mode = AppMode::Dialog(dialog);
    }

    pub fn request_delete(&mut self) {
        let pane = self.active_pane();
        if pane.marked_count() > 0 {
            let snapshot = pane.marked_paths();
            let message = format!("Delete {} files?", snapshot.len());
            self.pending_delete = snapshot;
            self.open_dialog(Dialog::confirm("Delete", &message, PendingAction::DeleteMulti));
            return;
        }
        if let Some(entry) = pane.selected_entry().filter(|e| !e.is_parent()) {
            let message = format!("Delete {:?}?", entry.name);
            let path = pane.entry_path(entry);
            self.open_dialog(Dialog::confirm("Delete", &message, PendingAction::Delete(path)));
        }
    }

    pub fn request_rename(&mut self) {
        let pane = self.active_pane();
        if let Some(entry) = pane.selected_entry().filter(|e| !e.is_parent()) {
            let name = entry.name.clone();
            let path = pane.entry_path(entry);
            self.open_dialog(Dialog::input(
                "Rename",
                "new name",
                &name,
                PendingAction::Rename(path),
            ));
        }
    }

    pub fn request_mkdir(&mut self) {
        let dir = self.active_pane().dir.clone();
        self.open_dialog(Dialog::input(
            "New Directory",
            "directory name",
            "",
            PendingAction::Mkdir(dir),
        ));
    }

    pub fn request_goto(&mut self) {
        let dir = self.active_pane().dir.display().to_string();
        self.open_dialog(Dialog::input(
            "Go to Directory",
            "path",
            &dir,
            PendingAction::Goto(self.active),
        ));
    }

    // === Dialog resolution ===

    pub fn handle_dialog_key(&mut self, key: KeyEvent) {
        let AppMode::Dialog(dialog) = &mut self.mode else {
            return;
        };
        if let Some(result) = dialog.handle_key(&key) {
            self.mode = AppMode::Normal;
            self.resolve_dialog(result);
        }
    }

    /// Run the action a confirmed dialog names. Cancelled dialogs never
    /// touch the filesystem.
    pub fn resolve_dialog(&mut self, result: DialogResult) {
        if !result.confirmed {
            tracing::debug!(action = %result.action, "dialog cancelled");
            if result.action == PendingAction::DeleteMulti {
                self.pending_delete.clear();
            }
            return;
        }
        tracing::debug!(action = %result.action, "dialog confirmed");

        let text = result.text;
        match result.action {
            PendingAction::Delete(path) => {
                self.tasks.run_file_op(FileOp::Delete { targets: vec![path] });
            }
            PendingAction::DeleteMulti => {
                let targets = std::mem::take(&mut self.pending_delete);
                if targets.is_empty() {
                    return;
                }
                self.active_pane_mut().clear_marks();
                self.tasks.run_file_op(FileOp::Delete { targets });
            }
            PendingAction::Rename(path) => {
                self.tasks.run_file_op(FileOp::Rename {
                    path,
                    new_name: text,
                });
            }
            PendingAction::Mkdir(parent) => {
                self.tasks.run_file_op(FileOp::Mkdir { parent, name: text });
            }
            PendingAction::Goto(id) => {
                let base = self.pane(id).dir.clone();
                if let Some(target) = resolve_goto_path(&base, &text) {
                    self.tasks.load_dir(id, target);
                }
            }
        }
    }

    // === Search ===

    pub fn start_search(&mut self) {
        self.search_input.clear();
        self.active_pane_mut().start_search();
        self.mode = AppMode::Search;
        self.update_layout();
    }

    /// Feed an editing key to the search bar and refilter.
    pub fn edit_search(&mut self, key: &KeyEvent) {
        let before = self.search_input.value.clone();
        if self.search_input.handle_key(key) && self.search_input.value != before {
            let query = self.search_input.value.clone();
            self.active_pane_mut().update_search(&query);
        }
    }

    pub fn finish_search(&mut self, confirm: bool) {
        self.active_pane_mut().end_search(confirm);
        self.search_input.clear();
        self.mode = AppMode::Normal;
        self.update_layout();
        self.refresh_preview();
    }

    // === Bookmarks, help, external ===

    pub fn open_bookmarks(&mut self) {
        self.mode = AppMode::Bookmark(BookmarkList::open(&self.bookmarks));
    }

    pub fn handle_bookmark_key(&mut self, key: KeyEvent) {
        let AppMode::Bookmark(list) = &mut self.mode else {
            return;
        };
        match list.handle_key(&key, &self.bookmarks) {
            Some(BookmarkOutcome::Select(path)) => {
                self.mode = AppMode::Normal;
                self.tasks.load_dir(self.active, path);
            }
            Some(BookmarkOutcome::Close) => self.mode = AppMode::Normal,
            None => {}
        }
    }

    /// Bookmark the active directory under its base name.
    pub fn add_bookmark(&mut self) {
        let dir = self.active_pane().dir.clone();
        let name = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| dir.display().to_string());
        match self.bookmarks.add(Bookmark {
            name,
            path: dir.clone(),
        }) {
            Ok(true) => self.set_status(format!("Bookmarked: {}", dir.display()), false),
            Ok(false) => self.set_status(format!("Already bookmarked: {}", dir.display()), false),
            Err(e) => {
                tracing::warn!("bookmark add failed: {e}");
                self.set_status(format!("Bookmark error: {e}"), true);
            }
        }
    }

    pub fn open_help(&mut self) {
        self.mode = AppMode::Help;
    }

    pub fn close_overlay(&mut self) {
        self.mode = AppMode::Normal;
    }

    /// Open the active directory in the platform file manager.
    pub fn open_explorer(&mut self) {
        let dir = self.active_pane().dir.clone();
        if let Err(e) = opener::open_path(&dir) {
            tracing::warn!(dir = %dir.display(), "open in file manager failed: {e}");
            self.set_status(format!("Open failed: {e}"), true);
        }
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    // === Status ===

    pub fn set_status(&mut self, text: String, is_error: bool) {
        self.status_message = Some(StatusMessage {
            text,
            is_error,
            created: Instant::now(),
        });
    }

    pub fn clear_expired_status(&mut self) {
        if let Some(msg) = &self.status_message {
            if msg.created.elapsed() >= self.status_timeout {
                self.status_message = None;
            }
        }
    }

    // === Layout ===

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.update_layout();
    }

    /// Push the current pane geometry into both panes.
    pub fn update_layout(&mut self) {
        let area = Rect::new(0, 0, self.width, self.height);
        let searching = matches!(self.mode, AppMode::Search);
        let layout = ui::main_layout(area, self.preview.visible, searching);
        for (pane, rect) in self.panes.iter_mut().zip(layout.panes) {
            pane.set_size(rect.width, rect.height);
        }
    }
}

/// Resolve goto input against `base`: trims, expands `~`, joins relative
/// paths and normalizes lexically. Empty input yields `None`.
pub fn resolve_goto_path(base: &Path, input: &str) -> Option<PathBuf> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    let expanded = expand_tilde(input);
    let joined = if expanded.is_absolute() {
        expanded
    } else {
        base.join(expanded)
    };
    Some(normalize(&joined))
}
