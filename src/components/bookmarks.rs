use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Widget},
};

use super::dialog::centered_rect;
use crate::bookmark::BookmarkList;
use crate::theme::ThemeColors;

const EMPTY_TEXT: &str = "No bookmarks. Press B to add one.";

/// Centered overlay listing saved bookmarks.
pub struct BookmarkWidget<'a> {
    list: &'a BookmarkList,
    theme: &'a ThemeColors,
}

impl<'a> BookmarkWidget<'a> {
    pub fn new(list: &'a BookmarkList, theme: &'a ThemeColors) -> Self {
        Self { list, theme }
    }
}

impl<'a> Widget for BookmarkWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let rows = u16::try_from(self.list.entries.len()).unwrap_or(u16::MAX);
        let height = rows
            .saturating_add(4)
            .clamp(6, area.height.saturating_sub(2).max(6));
        let width = (area.width as f32 * 0.6) as u16;
        let rect = centered_rect(width.max(40), height, area);

        Clear.render(rect, buf);

        let block = Block::default()
            .title(" Bookmarks ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.dialog_border_fg))
            .style(Style::default().bg(self.theme.dialog_bg));
        let inner = block.inner(rect);
        block.render(rect, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let body_rows = inner.height.saturating_sub(1) as usize;
        let mut lines: Vec<Line> = Vec::new();

        if let Some(error) = &self.list.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(self.theme.error_fg),
            )));
        } else if self.list.entries.is_empty() {
            lines.push(Line::from(Span::styled(
                EMPTY_TEXT,
                Style::default().fg(self.theme.dim_fg),
            )));
        } else {
            let skip = (self.list.cursor + 1).saturating_sub(body_rows);
            for (i, bookmark) in self.list.entries.iter().enumerate().skip(skip).take(body_rows) {
                let selected = i == self.list.cursor;
                let name_style = if selected {
                    Style::default()
                        .bg(self.theme.cursor_bg)
                        .fg(self.theme.cursor_fg)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(self.theme.dir_fg)
                };
                lines.push(Line::from(vec![
                    Span::styled(format!(" {} ", bookmark.name), name_style),
                    Span::styled(
                        format!(" {}", bookmark.path.display()),
                        Style::default().fg(self.theme.dim_fg),
                    ),
                ]));
            }
        }

        for (i, line) in lines.iter().enumerate() {
            buf.set_line(inner.x, inner.y + i as u16, line, inner.width);
        }

        let hint = Line::from(Span::styled(
            "[Enter] Go  [d] Remove  [Esc] Close",
            Style::default()
                .fg(self.theme.dim_fg)
                .add_modifier(Modifier::DIM),
        ));
        buf.set_line(inner.x, inner.y + inner.height - 1, &hint, inner.width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bookmark::Bookmark;
    use crate::components::buffer_to_string;
    use crate::theme::dark_theme;
    use std::path::PathBuf;

    #[test]
    fn empty_list_shows_hint_text() {
        let list = BookmarkList::default();
        let theme = dark_theme();
        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        BookmarkWidget::new(&list, &theme).render(area, &mut buf);
        assert!(buffer_to_string(&buf, area).contains(EMPTY_TEXT));
    }

    #[test]
    fn very_long_list_fits_the_area() {
        let list = BookmarkList {
            entries: (0..70_000)
                .map(|i| Bookmark {
                    name: format!("b{i}"),
                    path: PathBuf::from(format!("/b/{i}")),
                })
                .collect(),
            cursor: 0,
            error: None,
        };
        let theme = dark_theme();
        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        BookmarkWidget::new(&list, &theme).render(area, &mut buf);
        let content = buffer_to_string(&buf, area);
        assert!(content.contains(" b0 "));
        assert!(content.contains("[Enter] Go"));
    }

    #[test]
    fn lists_names_and_paths() {
        let list = BookmarkList {
            entries: vec![
                Bookmark {
                    name: "projects".into(),
                    path: PathBuf::from("/home/me/projects"),
                },
                Bookmark {
                    name: "logs".into(),
                    path: PathBuf::from("/var/log"),
                },
            ],
            cursor: 1,
            error: None,
        };
        let theme = dark_theme();
        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        BookmarkWidget::new(&list, &theme).render(area, &mut buf);

        let content = buffer_to_string(&buf, area);
        assert!(content.contains("projects"));
        assert!(content.contains("/home/me/projects"));
        assert!(content.contains("/var/log"));
    }

    #[test]
    fn store_error_is_shown() {
        let list = BookmarkList {
            error: Some("expected value at line 1".into()),
            ..Default::default()
        };
        let theme = dark_theme();
        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        BookmarkWidget::new(&list, &theme).render(area, &mut buf);
        assert!(buffer_to_string(&buf, area).contains("expected value"));
    }
}
