use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};

use crate::preview::PreviewState;
use crate::theme::ThemeColors;

/// Expand tabs and replace other control characters, which would otherwise
/// leave stale cells behind or reach the terminal as escape sequences.
fn sanitize_line(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\t' => out.push_str("    "),
            c if c.is_control() => out.push('?'),
            c => out.push(c),
        }
    }
    out
}

/// Preview widget that renders the loaded file text or directory summary.
pub struct PreviewWidget<'a> {
    preview: &'a PreviewState,
    theme: &'a ThemeColors,
}

impl<'a> PreviewWidget<'a> {
    pub fn new(preview: &'a PreviewState, theme: &'a ThemeColors) -> Self {
        Self { preview, theme }
    }
}

impl<'a> Widget for PreviewWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = match self.preview.path.as_ref().and_then(|p| p.file_name()) {
            Some(name) => format!(" Preview: {} ", name.to_string_lossy()),
            None => " Preview ".to_string(),
        };
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.border_fg))
            .style(
                Style::default()
                    .bg(self.theme.preview_bg)
                    .fg(self.theme.preview_fg),
            );
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        if let Some(error) = &self.preview.error {
            let line = Line::from(Span::styled(
                error.clone(),
                Style::default().fg(self.theme.error_fg),
            ));
            buf.set_line(inner.x, inner.y, &line, inner.width);
            return;
        }

        if self.preview.lines.is_empty() {
            let line = Line::from(Span::styled(
                "No preview",
                Style::default().fg(self.theme.dim_fg),
            ));
            buf.set_line(inner.x, inner.y, &line, inner.width);
            return;
        }

        let style = if self.preview.is_binary {
            Style::default()
                .fg(self.theme.dim_fg)
                .add_modifier(Modifier::ITALIC)
        } else {
            Style::default().fg(self.theme.preview_fg)
        };
        for (i, text) in self
            .preview
            .lines
            .iter()
            .take(inner.height as usize)
            .enumerate()
        {
            let text = sanitize_line(text);
            buf.set_line(
                inner.x,
                inner.y + i as u16,
                &Line::from(Span::styled(text, style)),
                inner.width,
            );
        }
    }
}
