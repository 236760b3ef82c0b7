use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Padding, Widget},
};

use crate::dialog::{Dialog, DialogBody};
use crate::text_input::TextInput;
use crate::theme::ThemeColors;

/// Calculate a centered rectangle within the given area.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + area.width.saturating_sub(w) / 2;
    let y = area.y + area.height.saturating_sub(h) / 2;
    Rect::new(x, y, w, h)
}

/// Centered modal for confirm and input dialogs.
pub struct DialogWidget<'a> {
    dialog: &'a Dialog,
    theme: &'a ThemeColors,
}

impl<'a> DialogWidget<'a> {
    pub fn new(dialog: &'a Dialog, theme: &'a ThemeColors) -> Self {
        Self { dialog, theme }
    }

    fn hint_style(&self) -> Style {
        Style::default()
            .fg(self.theme.dim_fg)
            .add_modifier(Modifier::DIM)
    }
}

impl<'a> Widget for DialogWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let content_width = match &self.dialog.body {
            DialogBody::Confirm { message } => u16::try_from(message.chars().count())
                .unwrap_or(u16::MAX)
                .saturating_add(4),
            DialogBody::Input { .. } => 50,
        };
        let width = content_width.clamp(40, 70).min(area.width.saturating_sub(4));
        let rect = centered_rect(width, 5, area);

        Clear.render(rect, buf);

        let block = Block::default()
            .title(format!(" {} ", self.dialog.title))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.dialog_border_fg))
            .style(Style::default().bg(self.theme.dialog_bg))
            .padding(Padding::horizontal(1));
        let inner = block.inner(rect);
        block.render(rect, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let (body, hint) = match &self.dialog.body {
            DialogBody::Confirm { message } => (
                Line::from(Span::styled(
                    message.clone(),
                    Style::default()
                        .fg(self.theme.warning_fg)
                        .add_modifier(Modifier::BOLD),
                )),
                "[y/Enter] Yes  [n/Esc] Cancel",
            ),
            DialogBody::Input { placeholder, input } => (
                input_line(input, placeholder, inner.width as usize, self.theme),
                "[Enter] Confirm  [Esc] Cancel",
            ),
        };
        buf.set_line(inner.x, inner.y, &body, inner.width);

        if inner.height > 1 {
            let hint_line = Line::from(Span::styled(hint, self.hint_style()));
            buf.set_line(inner.x, inner.y + inner.height - 1, &hint_line, inner.width);
        }
    }
}

/// Input text with a block cursor, scrolled so the cursor stays visible.
/// An empty input shows the placeholder.
pub fn input_line(
    input: &TextInput,
    placeholder: &str,
    max_width: usize,
    theme: &ThemeColors,
) -> Line<'static> {
    let cursor_style = Style::default()
        .bg(theme.pane_fg)
        .fg(theme.dialog_bg)
        .add_modifier(Modifier::BOLD);

    if input.value.is_empty() {
        return Line::from(vec![
            Span::styled(" ", cursor_style),
            Span::styled(placeholder.to_string(), Style::default().fg(theme.dim_fg)),
        ]);
    }

    let (before, after) = input.split_at_cursor();
    let mut after_chars = after.chars();
    let cursor_char = after_chars.next().map(String::from).unwrap_or_else(|| " ".into());
    let after: String = after_chars.collect();

    let before_len = before.chars().count();
    let budget = max_width.saturating_sub(2);
    let before: String = if before_len > budget {
        before.chars().skip(before_len - budget).collect()
    } else {
        before.to_string()
    };

    let text_style = Style::default().fg(theme.pane_fg);
    Line::from(vec![
        Span::styled(before, text_style),
        Span::styled(cursor_char, cursor_style),
        Span::styled(after, text_style),
    ])
}
