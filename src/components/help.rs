use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Widget},
};

use crate::keymap::{Action, KeyMap};
use crate::theme::ThemeColors;

/// A group of actions shown under one heading.
struct HelpCategory {
    name: &'static str,
    actions: &'static [Action],
}

const CATEGORIES: &[HelpCategory] = &[
    HelpCategory {
        name: "Navigation",
        actions: &[
            Action::Up,
            Action::Down,
            Action::PageUp,
            Action::PageDown,
            Action::First,
            Action::Last,
            Action::Open,
            Action::Parent,
            Action::SwitchPane,
            Action::Goto,
        ],
    },
    HelpCategory {
        name: "Selection",
        actions: &[
            Action::Mark,
            Action::SelectAll,
            Action::MarkUp,
            Action::MarkDown,
        ],
    },
    HelpCategory {
        name: "File Operations",
        actions: &[
            Action::Copy,
            Action::Cut,
            Action::Paste,
            Action::Mkdir,
            Action::Delete,
            Action::Rename,
            Action::Explorer,
        ],
    },
    HelpCategory {
        name: "General",
        actions: &[
            Action::Search,
            Action::TogglePreview,
            Action::Bookmarks,
            Action::AddBookmark,
            Action::Help,
            Action::Quit,
        ],
    },
];

/// Keybinding reference built from the live key map.
pub struct HelpOverlay<'a> {
    keymap: &'a KeyMap,
    theme: &'a ThemeColors,
}

impl<'a> HelpOverlay<'a> {
    pub fn new(keymap: &'a KeyMap, theme: &'a ThemeColors) -> Self {
        Self { keymap, theme }
    }

    fn build_content_lines(&self) -> Vec<Line<'static>> {
        let heading = Style::default()
            .fg(self.theme.accent_fg)
            .add_modifier(Modifier::BOLD);
        let key_style = Style::default()
            .fg(self.theme.warning_fg)
            .add_modifier(Modifier::BOLD);

        let mut lines = vec![
            Line::from(Span::styled(" Keybinding Reference ", heading)),
            Line::from(""),
        ];

        for category in CATEGORIES {
            lines.push(Line::from(vec![
                Span::styled(format!("── {} ", category.name), heading),
                Span::styled("─".repeat(30), Style::default().fg(self.theme.dim_fg)),
            ]));
            for &action in category.actions {
                let keys = self.keymap.describe_keys(action);
                if keys.is_empty() {
                    continue;
                }
                lines.push(Line::from(vec![
                    Span::styled(format!("  {keys:<22}"), key_style),
                    Span::styled(
                        action.description(),
                        Style::default().fg(self.theme.pane_fg),
                    ),
                ]));
            }
            lines.push(Line::from(""));
        }

        lines.push(Line::from(Span::styled(
            " Ctrl+C quits from anywhere. Press Esc to close. ",
            Style::default().fg(self.theme.dim_fg),
        )));
        lines
    }
}

impl<'a> Widget for HelpOverlay<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let width = ((area.width as f32 * 0.7) as u16).min(80);
        let height = ((area.height as f32 * 0.9) as u16).min(50);
        let rect = super::dialog::centered_rect(width, height, area);

        Clear.render(rect, buf);

        let block = Block::default()
            .title(" Help ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.border_focused_fg))
            .style(Style::default().bg(self.theme.dialog_bg));
        let inner = block.inner(rect);
        block.render(rect, buf);

        for (i, line) in self
            .build_content_lines()
            .iter()
            .take(inner.height as usize)
            .enumerate()
        {
            buf.set_line(inner.x + 1, inner.y + i as u16, line, inner.width.saturating_sub(2));
        }
    }
}
