use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Maximum number of characters accepted by a single-line input.
pub const INPUT_CHAR_LIMIT: usize = 256;

/// Single-line editable text with a byte-offset cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    pub value: String,
    /// Byte offset into `value`, always on a char boundary.
    pub cursor: usize,
}

impl TextInput {
    /// Create an input pre-filled with `initial`, cursor at the end.
    pub fn new(initial: &str) -> Self {
        let value: String = initial.chars().take(INPUT_CHAR_LIMIT).collect();
        let cursor = value.len();
        Self { value, cursor }
    }

    pub fn insert(&mut self, c: char) {
        if self.value.chars().count() >= INPUT_CHAR_LIMIT {
            return;
        }
        self.value.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Delete the character before the cursor.
    pub fn backspace(&mut self) {
        if let Some(prev) = self.value[..self.cursor].chars().next_back() {
            self.cursor -= prev.len_utf8();
            self.value.remove(self.cursor);
        }
    }

    /// Delete the character under the cursor.
    pub fn delete(&mut self) {
        if self.cursor < self.value.len() {
            self.value.remove(self.cursor);
        }
    }

    pub fn move_left(&mut self) {
        if let Some(prev) = self.value[..self.cursor].chars().next_back() {
            self.cursor -= prev.len_utf8();
        }
    }

    pub fn move_right(&mut self) {
        if let Some(next) = self.value[self.cursor..].chars().next() {
            self.cursor += next.len_utf8();
        }
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.value.len();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    /// Apply an editing key. Returns true if the key was consumed.
    pub fn handle_key(&mut self, key: &KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.clear();
            }
            KeyCode::Char(_) if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
                return false;
            }
            KeyCode::Char(c) => self.insert(c),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            KeyCode::Left => self.move_left(),
            KeyCode::Right => self.move_right(),
            KeyCode::Home => self.home(),
            KeyCode::End => self.end(),
            _ => return false,
        }
        true
    }

    /// Text before and after the cursor, for rendering.
    pub fn split_at_cursor(&self) -> (&str, &str) {
        self.value.split_at(self.cursor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn insert_chars() {
        let mut input = TextInput::default();
        input.insert('a');
        input.insert('b');
        input.insert('c');
        assert_eq!(input.value, "abc");
        assert_eq!(input.cursor, 3);
    }

    #[test]
    fn new_places_cursor_at_end() {
        let input = TextInput::new("héllo");
        assert_eq!(input.cursor, input.value.len());
    }

    #[test]
    fn backspace_removes_multibyte_char() {
        let mut input = TextInput::new("aé");
        input.backspace();
        assert_eq!(input.value, "a");
        assert_eq!(input.cursor, 1);
    }

    #[test]
    fn backspace_at_start_is_noop() {
        let mut input = TextInput::new("ab");
        input.home();
        input.backspace();
        assert_eq!(input.value, "ab");
        assert_eq!(input.cursor, 0);
    }

    #[test]
    fn cursor_left_right_and_insert_in_middle() {
        let mut input = TextInput::new("ac");
        input.move_left();
        input.insert('b');
        assert_eq!(input.value, "abc");
        input.move_right();
        assert_eq!(input.cursor, 3);
        input.move_right();
        assert_eq!(input.cursor, 3);
    }

    #[test]
    fn delete_under_cursor() {
        let mut input = TextInput::new("abc");
        input.home();
        input.delete();
        assert_eq!(input.value, "bc");
        input.end();
        input.delete();
        assert_eq!(input.value, "bc");
    }

    #[test]
    fn respects_char_limit() {
        let mut input = TextInput::new(&"x".repeat(INPUT_CHAR_LIMIT + 10));
        assert_eq!(input.value.chars().count(), INPUT_CHAR_LIMIT);
        input.insert('y');
        assert_eq!(input.value.chars().count(), INPUT_CHAR_LIMIT);
    }

    #[test]
    fn handle_key_edits_and_reports() {
        let mut input = TextInput::default();
        assert!(input.handle_key(&key(KeyCode::Char('q'))));
        assert!(input.handle_key(&key(KeyCode::Backspace)));
        assert!(input.value.is_empty());
        assert!(!input.handle_key(&key(KeyCode::Enter)));
        assert!(!input.handle_key(&KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL)));
    }

    #[test]
    fn ctrl_u_clears() {
        let mut input = TextInput::new("abc");
        assert!(input.handle_key(&KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL)));
        assert!(input.value.is_empty());
        assert_eq!(input.cursor, 0);
    }
}
