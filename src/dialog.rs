use std::fmt;
use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent};

use crate::pane::PaneId;
use crate::text_input::TextInput;

/// The operation a dialog will trigger once confirmed, with its target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    /// Delete one path.
    Delete(PathBuf),
    /// Delete the controller's pending-delete snapshot.
    DeleteMulti,
    /// Rename this path to the entered name.
    Rename(PathBuf),
    /// Create the entered name inside this directory.
    Mkdir(PathBuf),
    /// Load the entered path into this pane.
    Goto(PaneId),
}

impl fmt::Display for PendingAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PendingAction::Delete(path) => write!(f, "delete:{}", path.display()),
            PendingAction::DeleteMulti => write!(f, "delete-multi:"),
            PendingAction::Rename(path) => write!(f, "rename:{}", path.display()),
            PendingAction::Mkdir(dir) => write!(f, "mkdir:{}", dir.display()),
            PendingAction::Goto(pane) => write!(f, "goto:{}", pane.index()),
        }
    }
}

/// Outcome emitted when a dialog is resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogResult {
    pub confirmed: bool,
    /// Entered text for input dialogs, empty for confirmations.
    pub text: String,
    pub action: PendingAction,
}

#[derive(Debug, Clone)]
pub enum DialogBody {
    Confirm { message: String },
    Input { placeholder: String, input: TextInput },
}

/// A modal prompt: yes/no confirmation or single-line text input.
#[derive(Debug, Clone)]
pub struct Dialog {
    pub title: String,
    pub body: DialogBody,
    pub action: PendingAction,
}

impl Dialog {
    pub fn confirm(title: &str, message: &str, action: PendingAction) -> Self {
        Self {
            title: title.to_string(),
            body: DialogBody::Confirm {
                message: message.to_string(),
            },
            action,
        }
    }

    pub fn input(title: &str, placeholder: &str, initial: &str, action: PendingAction) -> Self {
        Self {
            title: title.to_string(),
            body: DialogBody::Input {
                placeholder: placeholder.to_string(),
                input: TextInput::new(initial),
            },
            action,
        }
    }

    /// Feed one key to the dialog. Returns a result once it is confirmed or
    /// cancelled; other keys only edit the dialog's own state.
    pub fn handle_key(&mut self, key: &KeyEvent) -> Option<DialogResult> {
        let action = &self.action;
        let resolve = |confirmed: bool, text: String| DialogResult {
            confirmed,
            text,
            action: action.clone(),
        };
        match &mut self.body {
            DialogBody::Confirm { .. } => match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                    Some(resolve(true, String::new()))
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    Some(resolve(false, String::new()))
                }
                _ => None,
            },
            DialogBody::Input { input, .. } => match key.code {
                KeyCode::Enter => {
                    let text = input.value.clone();
                    Some(resolve(true, text))
                }
                KeyCode::Esc => Some(resolve(false, String::new())),
                _ => {
                    input.handle_key(key);
                    None
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn delete_dialog() -> Dialog {
        Dialog::confirm(
            "Delete",
            "Delete \"f.txt\"?",
            PendingAction::Delete(PathBuf::from("/a/f.txt")),
        )
    }

    #[test]
    fn confirm_accepts_y_and_enter() {
        for code in [KeyCode::Char('y'), KeyCode::Char('Y'), KeyCode::Enter] {
            let result = delete_dialog().handle_key(&key(code)).unwrap();
            assert!(result.confirmed);
            assert_eq!(result.action, PendingAction::Delete(PathBuf::from("/a/f.txt")));
        }
    }

    #[test]
    fn confirm_rejects_n_and_esc() {
        for code in [KeyCode::Char('n'), KeyCode::Char('N'), KeyCode::Esc] {
            let result = delete_dialog().handle_key(&key(code)).unwrap();
            assert!(!result.confirmed);
        }
    }

    #[test]
    fn confirm_ignores_other_keys() {
        let mut dialog = delete_dialog();
        assert!(dialog.handle_key(&key(KeyCode::Char('x'))).is_none());
        assert!(dialog.handle_key(&key(KeyCode::Tab)).is_none());
    }

    #[test]
    fn input_edits_then_confirms_with_text() {
        let mut dialog = Dialog::input(
            "Rename",
            "New name",
            "old.txt",
            PendingAction::Rename(PathBuf::from("/a/old.txt")),
        );
        for _ in 0..7 {
            assert!(dialog.handle_key(&key(KeyCode::Backspace)).is_none());
        }
        for c in "new.md".chars() {
            dialog.handle_key(&key(KeyCode::Char(c)));
        }
        let result = dialog.handle_key(&key(KeyCode::Enter)).unwrap();
        assert!(result.confirmed);
        assert_eq!(result.text, "new.md");
        assert_eq!(result.action, PendingAction::Rename(PathBuf::from("/a/old.txt")));
    }

    #[test]
    fn input_treats_y_and_n_as_text() {
        let mut dialog = Dialog::input("Mkdir", "", "", PendingAction::Mkdir(PathBuf::from("/a")));
        assert!(dialog.handle_key(&key(KeyCode::Char('y'))).is_none());
        assert!(dialog.handle_key(&key(KeyCode::Char('n'))).is_none());
        let result = dialog.handle_key(&key(KeyCode::Esc)).unwrap();
        assert!(!result.confirmed);
    }

    #[test]
    fn action_display_matches_verb_target_form() {
        assert_eq!(
            PendingAction::Delete(PathBuf::from("/a/f")).to_string(),
            "delete:/a/f"
        );
        assert_eq!(PendingAction::DeleteMulti.to_string(), "delete-multi:");
        assert_eq!(PendingAction::Goto(PaneId::Right).to_string(), "goto:1");
        assert_eq!(
            PendingAction::Mkdir(PathBuf::from("/a")).to_string(),
            "mkdir:/a"
        );
    }
}
