use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, AppMode};
use crate::fs::clipboard::ClipboardOp;
use crate::keymap::Action;
use crate::pane::PaneState;

/// Route a key event according to the current mode.
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.quit();
        return;
    }
    if !app.is_ready() {
        return;
    }

    match app.mode {
        AppMode::Normal => handle_normal_mode(app, key),
        AppMode::Dialog(_) => app.handle_dialog_key(key),
        AppMode::Bookmark(_) => app.handle_bookmark_key(key),
        AppMode::Search => handle_search_mode(app, key),
        AppMode::Help => handle_help_mode(app, key),
    }
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    let Some(action) = app.keymap.action_for(&key) else {
        return;
    };
    tracing::trace!(action = action.name(), "key action");
    match action {
        Action::Up => app.navigate(PaneState::move_up),
        Action::Down => app.navigate(PaneState::move_down),
        Action::PageUp => app.navigate(PaneState::page_up),
        Action::PageDown => app.navigate(PaneState::page_down),
        Action::First => app.navigate(PaneState::go_top),
        Action::Last => app.navigate(PaneState::go_bottom),
        Action::Open => app.open_selected(),
        Action::Parent => app.go_parent(),
        Action::SwitchPane => app.switch_pane(),
        Action::TogglePreview => app.toggle_preview(),
        Action::Copy => app.yank(ClipboardOp::Copy),
        Action::Cut => app.yank(ClipboardOp::Move),
        Action::Paste => app.paste(),
        Action::Mkdir => app.request_mkdir(),
        Action::Delete => app.request_delete(),
        Action::Rename => app.request_rename(),
        Action::Search => app.start_search(),
        Action::Bookmarks => app.open_bookmarks(),
        Action::AddBookmark => app.add_bookmark(),
        Action::Help => app.open_help(),
        Action::Quit => app.quit(),
        Action::Mark => app.toggle_mark(),
        Action::SelectAll => app.toggle_all_marks(),
        Action::MarkUp => app.mark_up(),
        Action::MarkDown => app.mark_down(),
        Action::Goto => app.request_goto(),
        Action::Explorer => app.open_explorer(),
    }
}

/// Enter/Esc leave search; arrows move within the filtered view; every
/// other key edits the query.
fn handle_search_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.finish_search(true),
        KeyCode::Esc => app.finish_search(false),
        KeyCode::Up => app.navigate(PaneState::move_up),
        KeyCode::Down => app.navigate(PaneState::move_down),
        _ => app.edit_search(&key),
    }
}

fn handle_help_mode(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Esc {
        app.close_overlay();
        return;
    }
    if let Some(Action::Help | Action::Quit) = app.keymap.action_for(&key) {
        app.close_overlay();
    }
}
