use std::collections::{BTreeMap, HashMap};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Normal-mode actions that can be bound to keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Up,
    Down,
    PageUp,
    PageDown,
    First,
    Last,
    Open,
    Parent,
    SwitchPane,
    TogglePreview,
    Copy,
    Cut,
    Paste,
    Mkdir,
    Delete,
    Rename,
    Search,
    Bookmarks,
    AddBookmark,
    Help,
    Quit,
    Mark,
    SelectAll,
    MarkUp,
    MarkDown,
    Goto,
    Explorer,
}

impl Action {
    pub const ALL: [Action; 27] = [
        Action::Up,
        Action::Down,
        Action::PageUp,
        Action::PageDown,
        Action::First,
        Action::Last,
        Action::Open,
        Action::Parent,
        Action::SwitchPane,
        Action::TogglePreview,
        Action::Copy,
        Action::Cut,
        Action::Paste,
        Action::Mkdir,
        Action::Delete,
        Action::Rename,
        Action::Search,
        Action::Bookmarks,
        Action::AddBookmark,
        Action::Help,
        Action::Quit,
        Action::Mark,
        Action::SelectAll,
        Action::MarkUp,
        Action::MarkDown,
        Action::Goto,
        Action::Explorer,
    ];

    /// Name used in the `[keys]` config table.
    pub fn name(self) -> &'static str {
        match self {
            Action::Up => "up",
            Action::Down => "down",
            Action::PageUp => "page_up",
            Action::PageDown => "page_down",
            Action::First => "first",
            Action::Last => "last",
            Action::Open => "open",
            Action::Parent => "parent",
            Action::SwitchPane => "switch_pane",
            Action::TogglePreview => "toggle_preview",
            Action::Copy => "copy",
            Action::Cut => "cut",
            Action::Paste => "paste",
            Action::Mkdir => "mkdir",
            Action::Delete => "delete",
            Action::Rename => "rename",
            Action::Search => "search",
            Action::Bookmarks => "bookmarks",
            Action::AddBookmark => "add_bookmark",
            Action::Help => "help",
            Action::Quit => "quit",
            Action::Mark => "mark",
            Action::SelectAll => "select_all",
            Action::MarkUp => "mark_up",
            Action::MarkDown => "mark_down",
            Action::Goto => "goto",
            Action::Explorer => "explorer",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.name() == name)
    }

    /// One-line description for the help overlay.
    pub fn description(self) -> &'static str {
        match self {
            Action::Up => "Move up",
            Action::Down => "Move down",
            Action::PageUp => "Page up",
            Action::PageDown => "Page down",
            Action::First => "Go to first entry",
            Action::Last => "Go to last entry",
            Action::Open => "Open directory / file",
            Action::Parent => "Go to parent directory",
            Action::SwitchPane => "Switch pane",
            Action::TogglePreview => "Toggle preview",
            Action::Copy => "Copy to clipboard",
            Action::Cut => "Cut to clipboard",
            Action::Paste => "Paste into other pane",
            Action::Mkdir => "Make directory",
            Action::Delete => "Delete",
            Action::Rename => "Rename",
            Action::Search => "Search in pane",
            Action::Bookmarks => "Show bookmarks",
            Action::AddBookmark => "Bookmark current directory",
            Action::Help => "Toggle help",
            Action::Quit => "Quit",
            Action::Mark => "Mark / unmark",
            Action::SelectAll => "Mark all / clear marks",
            Action::MarkUp => "Move up and mark",
            Action::MarkDown => "Move down and mark",
            Action::Goto => "Go to directory",
            Action::Explorer => "Open directory in file manager",
        }
    }

    fn default_keys(self) -> &'static [&'static str] {
        match self {
            Action::Up => &["up"],
            Action::Down => &["down"],
            Action::PageUp => &["pageup"],
            Action::PageDown => &["pagedown"],
            Action::First => &["home"],
            Action::Last => &["end"],
            Action::Open => &["enter"],
            Action::Parent => &["backspace"],
            Action::SwitchPane => &["tab"],
            Action::TogglePreview => &["t"],
            Action::Copy => &["f5", "c"],
            Action::Cut => &["f6", "m"],
            Action::Paste => &["p"],
            Action::Mkdir => &["f7", "n"],
            Action::Delete => &["f8", "d"],
            Action::Rename => &["r"],
            Action::Search => &["/"],
            Action::Bookmarks => &["b"],
            Action::AddBookmark => &["B"],
            Action::Help => &["?"],
            Action::Quit => &["q", "ctrl+c"],
            Action::Mark => &["space"],
            Action::SelectAll => &["ctrl+a"],
            Action::MarkUp => &["shift+up"],
            Action::MarkDown => &["shift+down"],
            Action::Goto => &["g"],
            Action::Explorer => &["e"],
        }
    }
}

/// A key plus modifiers, as matched against normalized key events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    pub fn display_key(&self) -> String {
        let key_name = match self.code {
            KeyCode::Char(' ') => "Space".to_string(),
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Enter => "Enter".to_string(),
            KeyCode::Esc => "Esc".to_string(),
            KeyCode::Backspace => "Backspace".to_string(),
            KeyCode::Delete => "Delete".to_string(),
            KeyCode::Tab => "Tab".to_string(),
            KeyCode::Home => "Home".to_string(),
            KeyCode::End => "End".to_string(),
            KeyCode::PageUp => "PgUp".to_string(),
            KeyCode::PageDown => "PgDn".to_string(),
            KeyCode::Up => "↑".to_string(),
            KeyCode::Down => "↓".to_string(),
            KeyCode::Left => "←".to_string(),
            KeyCode::Right => "→".to_string(),
            KeyCode::F(n) => format!("F{n}"),
            _ => format!("{:?}", self.code),
        };

        let mut out = String::new();
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            out.push_str("Ctrl+");
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            out.push_str("Alt+");
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            out.push_str("Shift+");
        }
        out.push_str(&key_name);
        out
    }
}

/// Parse `"c"`, `"B"`, `"enter"`, `"ctrl+a"`, `"shift+up"`, `"f5"`...
pub fn parse_key_binding(s: &str) -> Option<KeyBinding> {
    if s.is_empty() {
        return None;
    }
    // A lone "+" is the plus key itself.
    if s == "+" {
        return Some(KeyBinding {
            code: KeyCode::Char('+'),
            modifiers: KeyModifiers::NONE,
        });
    }

    let parts: Vec<&str> = s.split('+').collect();
    let (key_str, modifier_strs) = parts.split_last()?;

    let mut modifiers = KeyModifiers::NONE;
    for m in modifier_strs {
        modifiers |= match m.to_lowercase().as_str() {
            "ctrl" | "control" => KeyModifiers::CONTROL,
            "alt" => KeyModifiers::ALT,
            "shift" => KeyModifiers::SHIFT,
            _ => return None,
        };
    }

    let code = if let Some(code) = named_key(key_str) {
        code
    } else {
        let mut chars = key_str.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => KeyCode::Char(c),
            _ => return None,
        }
    };

    // Character keys carry shift in the character itself.
    if let KeyCode::Char(c) = code {
        if modifiers.contains(KeyModifiers::SHIFT) {
            modifiers -= KeyModifiers::SHIFT;
            let upper = c.to_uppercase().next().unwrap_or(c);
            return Some(KeyBinding {
                code: KeyCode::Char(upper),
                modifiers,
            });
        }
    }
    Some(KeyBinding { code, modifiers })
}

fn named_key(s: &str) -> Option<KeyCode> {
    match s.to_lowercase().as_str() {
        "enter" | "return" => Some(KeyCode::Enter),
        "space" => Some(KeyCode::Char(' ')),
        "esc" | "escape" => Some(KeyCode::Esc),
        "up" => Some(KeyCode::Up),
        "down" => Some(KeyCode::Down),
        "left" => Some(KeyCode::Left),
        "right" => Some(KeyCode::Right),
        "home" => Some(KeyCode::Home),
        "end" => Some(KeyCode::End),
        "backspace" => Some(KeyCode::Backspace),
        "delete" | "del" => Some(KeyCode::Delete),
        "tab" => Some(KeyCode::Tab),
        "pageup" | "pgup" => Some(KeyCode::PageUp),
        "pagedown" | "pgdown" | "pgdn" => Some(KeyCode::PageDown),
        s if s.starts_with('f') && s.len() > 1 => s[1..]
            .parse::<u8>()
            .ok()
            .filter(|n| (1..=24).contains(n))
            .map(KeyCode::F),
        _ => None,
    }
}

/// Drop SHIFT from character keys; the character already reflects it.
pub fn normalize_key_event(key: &KeyEvent) -> KeyBinding {
    let mut modifiers = key.modifiers;
    if let KeyCode::Char(_) = key.code {
        modifiers -= KeyModifiers::SHIFT;
    }
    KeyBinding {
        code: key.code,
        modifiers,
    }
}

/// Immutable key → action table, built once at startup.
#[derive(Debug, Clone)]
pub struct KeyMap {
    lookup: HashMap<KeyBinding, Action>,
    by_action: Vec<(Action, Vec<KeyBinding>)>,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self::new(&BTreeMap::new()).0
    }
}

impl KeyMap {
    /// Build from the defaults plus `[keys]` overrides. An override replaces
    /// every default key of its action and wins over other actions' defaults.
    /// Returns warnings for unknown actions and unparseable keys.
    pub fn new(overrides: &BTreeMap<String, Vec<String>>) -> (Self, Vec<String>) {
        let mut warnings = Vec::new();
        let mut custom: HashMap<Action, Vec<KeyBinding>> = HashMap::new();

        for (name, keys) in overrides {
            let Some(action) = Action::from_name(name) else {
                warnings.push(format!("unknown action in [keys]: {name:?}"));
                continue;
            };
            let mut bindings = Vec::new();
            for key in keys {
                match parse_key_binding(key) {
                    Some(kb) => bindings.push(kb),
                    None => warnings.push(format!("invalid key binding for {name}: {key:?}")),
                }
            }
            custom.insert(action, bindings);
        }

        let mut by_action = Vec::with_capacity(Action::ALL.len());
        for action in Action::ALL {
            let bindings = custom.get(&action).cloned().unwrap_or_else(|| {
                action
                    .default_keys()
                    .iter()
                    .filter_map(|k| parse_key_binding(k))
                    .collect()
            });
            by_action.push((action, bindings));
        }

        let mut lookup = HashMap::new();
        let (overridden, defaults): (Vec<_>, Vec<_>) = by_action
            .iter()
            .partition(|(action, _)| custom.contains_key(action));
        for (action, bindings) in defaults.into_iter().chain(overridden) {
            for kb in bindings {
                lookup.insert(*kb, *action);
            }
        }

        (Self { lookup, by_action }, warnings)
    }

    pub fn action_for(&self, key: &KeyEvent) -> Option<Action> {
        self.lookup.get(&normalize_key_event(key)).copied()
    }

    /// Keys that currently trigger `action`, in configured order.
    pub fn keys_for(&self, action: Action) -> Vec<KeyBinding> {
        self.by_action
            .iter()
            .find(|(a, _)| *a == action)
            .map(|(_, keys)| {
                keys.iter()
                    .filter(|kb| self.lookup.get(*kb) == Some(&action))
                    .copied()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// `"F5 / c"` style label for the help overlay.
    pub fn describe_keys(&self, action: Action) -> String {
        self.keys_for(action)
            .iter()
            .map(KeyBinding::display_key)
            .collect::<Vec<_>>()
            .join(" / ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn parse_single_chars_and_named_keys() {
        assert_eq!(
            parse_key_binding("c"),
            Some(KeyBinding {
                code: KeyCode::Char('c'),
                modifiers: KeyModifiers::NONE
            })
        );
        assert_eq!(parse_key_binding("B").unwrap().code, KeyCode::Char('B'));
        assert_eq!(parse_key_binding("space").unwrap().code, KeyCode::Char(' '));
        assert_eq!(parse_key_binding("PgDown").unwrap().code, KeyCode::PageDown);
        assert_eq!(parse_key_binding("f7").unwrap().code, KeyCode::F(7));
        assert_eq!(parse_key_binding("+").unwrap().code, KeyCode::Char('+'));
    }

    #[test]
    fn parse_modifiers() {
        let ctrl_a = parse_key_binding("ctrl+a").unwrap();
        assert_eq!(ctrl_a.code, KeyCode::Char('a'));
        assert_eq!(ctrl_a.modifiers, KeyModifiers::CONTROL);

        let shift_up = parse_key_binding("shift+up").unwrap();
        assert_eq!(shift_up.code, KeyCode::Up);
        assert_eq!(shift_up.modifiers, KeyModifiers::SHIFT);

        let shift_b = parse_key_binding("shift+b").unwrap();
        assert_eq!(shift_b.code, KeyCode::Char('B'));
        assert_eq!(shift_b.modifiers, KeyModifiers::NONE);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(parse_key_binding("").is_none());
        assert!(parse_key_binding("hyper+x").is_none());
        assert!(parse_key_binding("notakey").is_none());
        assert!(parse_key_binding("f99").is_none());
    }

    #[test]
    fn normalize_strips_shift_from_chars_only() {
        let upper = normalize_key_event(&key(KeyCode::Char('B'), KeyModifiers::SHIFT));
        assert_eq!(upper.modifiers, KeyModifiers::NONE);
        let question = normalize_key_event(&key(KeyCode::Char('?'), KeyModifiers::SHIFT));
        assert_eq!(question.modifiers, KeyModifiers::NONE);
        let up = normalize_key_event(&key(KeyCode::Up, KeyModifiers::SHIFT));
        assert_eq!(up.modifiers, KeyModifiers::SHIFT);
    }

    #[test]
    fn default_bindings_resolve() {
        let map = KeyMap::default();
        let cases = [
            (key(KeyCode::F(5), KeyModifiers::NONE), Action::Copy),
            (key(KeyCode::Char('c'), KeyModifiers::NONE), Action::Copy),
            (key(KeyCode::Char('m'), KeyModifiers::NONE), Action::Cut),
            (key(KeyCode::Char('B'), KeyModifiers::SHIFT), Action::AddBookmark),
            (key(KeyCode::Char('b'), KeyModifiers::NONE), Action::Bookmarks),
            (key(KeyCode::Char('?'), KeyModifiers::SHIFT), Action::Help),
            (key(KeyCode::Char('c'), KeyModifiers::CONTROL), Action::Quit),
            (key(KeyCode::Char('a'), KeyModifiers::CONTROL), Action::SelectAll),
            (key(KeyCode::Char(' '), KeyModifiers::NONE), Action::Mark),
            (key(KeyCode::Up, KeyModifiers::SHIFT), Action::MarkUp),
            (key(KeyCode::Up, KeyModifiers::NONE), Action::Up),
            (key(KeyCode::Backspace, KeyModifiers::NONE), Action::Parent),
        ];
        for (event, expected) in cases {
            assert_eq!(map.action_for(&event), Some(expected), "{event:?}");
        }
        assert_eq!(map.action_for(&key(KeyCode::Char('z'), KeyModifiers::NONE)), None);
    }

    #[test]
    fn every_action_has_a_default_key() {
        let map = KeyMap::default();
        for action in Action::ALL {
            assert!(!map.keys_for(action).is_empty(), "{action:?}");
            assert_eq!(Action::from_name(action.name()), Some(action));
        }
    }

    #[test]
    fn override_replaces_defaults_and_wins_conflicts() {
        let mut overrides = BTreeMap::new();
        overrides.insert("copy".to_string(), vec!["y".to_string()]);
        overrides.insert("search".to_string(), vec!["b".to_string()]);
        let (map, warnings) = KeyMap::new(&overrides);
        assert!(warnings.is_empty());
        assert_eq!(
            map.action_for(&key(KeyCode::Char('y'), KeyModifiers::NONE)),
            Some(Action::Copy)
        );
        assert_eq!(map.action_for(&key(KeyCode::Char('c'), KeyModifiers::NONE)), None);
        assert_eq!(
            map.action_for(&key(KeyCode::Char('b'), KeyModifiers::NONE)),
            Some(Action::Search)
        );
        assert!(map.keys_for(Action::Bookmarks).is_empty());
    }

    #[test]
    fn bad_overrides_warn() {
        let mut overrides = BTreeMap::new();
        overrides.insert("teleport".to_string(), vec!["x".to_string()]);
        overrides.insert("paste".to_string(), vec!["nope".to_string(), "v".to_string()]);
        let (map, warnings) = KeyMap::new(&overrides);
        assert_eq!(warnings.len(), 2);
        assert_eq!(
            map.action_for(&key(KeyCode::Char('v'), KeyModifiers::NONE)),
            Some(Action::Paste)
        );
    }

    #[test]
    fn describe_keys_joins_labels() {
        let map = KeyMap::default();
        assert_eq!(map.describe_keys(Action::Copy), "F5 / c");
        assert_eq!(map.describe_keys(Action::Quit), "q / Ctrl+c");
        assert_eq!(map.describe_keys(Action::MarkDown), "Shift+↓");
    }
}
