use std::time::SystemTime;

use chrono::{DateTime, Datelike, Local};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};

use crate::fs::entry::Entry;
use crate::pane::PaneState;
use crate::theme::ThemeColors;

/// Panes narrower than this show names only.
const DETAIL_MIN_WIDTH: u16 = 35;
const SIZE_COLUMN: usize = 7;
const TIME_COLUMN: usize = 12;

/// Human-readable size: `512B`, `1.5K`, `3.0M`, `2.1G`.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [(u64, &str); 3] = [(1 << 30, "G"), (1 << 20, "M"), (1 << 10, "K")];
    for (scale, unit) in UNITS {
        if bytes >= scale {
            return format!("{:.1}{unit}", bytes as f64 / scale as f64);
        }
    }
    format!("{bytes}B")
}

/// `Mar 04 13:37` for this year, `Mar 04  2021` otherwise.
pub fn format_time(time: SystemTime) -> String {
    let local: DateTime<Local> = time.into();
    if local.year() == Local::now().year() {
        local.format("%b %d %H:%M").to_string()
    } else {
        local.format("%b %d  %Y").to_string()
    }
}

/// Renders one pane: bordered block titled with the directory, a column
/// header, then the visible slice of the listing.
pub struct PaneWidget<'a> {
    pane: &'a PaneState,
    theme: &'a ThemeColors,
    focused: bool,
}

impl<'a> PaneWidget<'a> {
    pub fn new(pane: &'a PaneState, theme: &'a ThemeColors, focused: bool) -> Self {
        Self {
            pane,
            theme,
            focused,
        }
    }

    fn entry_style(&self, entry: &Entry, is_cursor: bool, is_marked: bool) -> Style {
        let mut style = if is_marked {
            Style::default()
                .fg(self.theme.marked_fg)
                .add_modifier(Modifier::BOLD)
        } else if entry.is_symlink {
            Style::default().fg(self.theme.link_fg)
        } else if entry.is_dir {
            Style::default()
                .fg(self.theme.dir_fg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.theme.file_fg)
        };
        if is_cursor && self.focused {
            style = style.bg(self.theme.cursor_bg);
            if !is_marked {
                style = style.fg(self.theme.cursor_fg);
            }
        } else if is_cursor {
            style = style.add_modifier(Modifier::UNDERLINED);
        }
        style
    }

    fn row_text(entry: &Entry, width: usize, details: bool) -> String {
        let mut name = entry.name.clone();
        if entry.is_symlink {
            name.push('@');
        }
        if !details {
            return name;
        }

        let size = if entry.is_dir {
            "<DIR>".to_string()
        } else {
            format_size(entry.size)
        };
        let time = entry.modified.map(format_time).unwrap_or_default();
        let name_width = width.saturating_sub(SIZE_COLUMN + TIME_COLUMN + 2);
        let name: String = name.chars().take(name_width).collect();
        format!(
            "{name:<name_width$} {size:>SIZE_COLUMN$} {time:<TIME_COLUMN$}",
        )
    }
}

impl<'a> Widget for PaneWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border = if self.focused {
            self.theme.border_focused_fg
        } else {
            self.theme.border_fg
        };
        let title = match self.pane.search_query() {
            Some(query) if !query.is_empty() => {
                format!(" {} [/{query}] ", self.pane.dir.display())
            }
            _ => format!(" {} ", self.pane.dir.display()),
        };
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .style(Style::default().bg(self.theme.pane_bg).fg(self.theme.pane_fg));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let width = inner.width as usize;
        let details = area.width >= DETAIL_MIN_WIDTH;

        let header = if details {
            let name_width = width.saturating_sub(SIZE_COLUMN + TIME_COLUMN + 2);
            format!(
                "{:<name_width$} {:>SIZE_COLUMN$} {:<TIME_COLUMN$}",
                "Name", "Size", "Modified"
            )
        } else {
            "Name".to_string()
        };
        let header_style = Style::default()
            .fg(self.theme.header_fg)
            .add_modifier(Modifier::BOLD);
        buf.set_line(
            inner.x,
            inner.y,
            &Line::from(Span::styled(header, header_style)),
            inner.width,
        );

        let rows = inner.height.saturating_sub(1) as usize;
        let body_y = inner.y + 1;

        if let Some(error) = &self.pane.error {
            let line = Line::from(Span::styled(
                error.clone(),
                Style::default().fg(self.theme.error_fg),
            ));
            if rows > 0 {
                buf.set_line(inner.x, body_y, &line, inner.width);
            }
            return;
        }

        if self.pane.is_searching() && self.pane.visible_len() == 0 {
            let line = Line::from(Span::styled(
                "No matches",
                Style::default().fg(self.theme.dim_fg),
            ));
            if rows > 0 {
                buf.set_line(inner.x, body_y, &line, inner.width);
            }
            return;
        }

        let start = self.pane.offset;
        let end = (start + rows).min(self.pane.visible_len());
        for (row, visible) in (start..end).enumerate() {
            let Some(entry) = self.pane.visible_entry(visible) else {
                break;
            };
            let is_cursor = visible == self.pane.cursor;
            let is_marked = self.pane.is_marked(&entry.name);
            let style = self.entry_style(entry, is_cursor, is_marked);
            let text = format!("{:<width$}", Self::row_text(entry, width, details));
            buf.set_line(
                inner.x,
                body_y + row as u16,
                &Line::from(Span::styled(text, style)),
                inner.width,
            );
        }
    }
}
