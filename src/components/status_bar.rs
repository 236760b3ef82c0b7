use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::theme::ThemeColors;

/// Bottom bar: active directory, mode and selection info, or a transient
/// status message when one is set.
pub struct StatusBarWidget<'a> {
    path_str: &'a str,
    mode: &'a str,
    theme: &'a ThemeColors,
    file_info: Option<&'a str>,
    marked: usize,
    clipboard: usize,
    status_message: Option<&'a str>,
    is_error: bool,
}

impl<'a> StatusBarWidget<'a> {
    pub fn new(path_str: &'a str, mode: &'a str, theme: &'a ThemeColors) -> Self {
        Self {
            path_str,
            mode,
            theme,
            file_info: None,
            marked: 0,
            clipboard: 0,
            status_message: None,
            is_error: false,
        }
    }

    pub fn file_info(mut self, info: &'a str) -> Self {
        self.file_info = Some(info);
        self
    }

    pub fn marked(mut self, count: usize) -> Self {
        self.marked = count;
        self
    }

    pub fn clipboard(mut self, count: usize) -> Self {
        self.clipboard = count;
        self
    }

    pub fn status_message(mut self, msg: &'a str, is_error: bool) -> Self {
        self.status_message = Some(msg);
        self.is_error = is_error;
        self
    }
}

impl<'a> Widget for StatusBarWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        let width = area.width as usize;

        if let Some(msg) = self.status_message {
            let style = if self.is_error {
                Style::default()
                    .bg(self.theme.error_fg)
                    .fg(self.theme.status_fg)
            } else {
                Style::default()
                    .bg(self.theme.status_bg)
                    .fg(self.theme.success_fg)
            };
            let display = format!("{msg:<width$}");
            buf.set_line(area.x, area.y, &Line::from(Span::styled(display, style)), area.width);
            return;
        }

        let base = Style::default()
            .bg(self.theme.status_bg)
            .fg(self.theme.status_fg);
        let mut spans = vec![
            Span::styled(
                format!(" {} ", self.mode),
                base.fg(self.theme.accent_fg).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!(" {}", self.path_str), base),
        ];
        if let Some(info) = self.file_info {
            spans.push(Span::styled(format!(" │ {info}"), base.fg(self.theme.dim_fg)));
        }
        if self.marked > 0 {
            spans.push(Span::styled(
                format!(" │ {} selected", self.marked),
                base.fg(self.theme.marked_fg),
            ));
        }
        if self.clipboard > 0 {
            spans.push(Span::styled(
                format!(" │ {} in clipboard", self.clipboard),
                base.fg(self.theme.accent_fg),
            ));
        }

        let used: usize = spans.iter().map(|s| s.width()).sum();
        let hint = " ?:help ";
        let pad = width.saturating_sub(used + hint.len());
        spans.push(Span::styled(" ".repeat(pad), base));
        spans.push(Span::styled(hint, base.fg(self.theme.dim_fg)));

        buf.set_line(area.x, area.y, &Line::from(spans), area.width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::dark_theme;
    use ratatui::style::Color;

    fn row(buf: &Buffer, width: u16) -> String {
        (0..width)
            .map(|x| buf.cell((x, 0)).unwrap().symbol().to_string())
            .collect()
    }

    #[test]
    fn normal_bar_shows_path_mode_and_counts() {
        let theme = dark_theme();
        let widget = StatusBarWidget::new("/home/user/project", "NORMAL", &theme)
            .file_info("1.5K rw-r--r--")
            .marked(3)
            .clipboard(2);
        let area = Rect::new(0, 0, 120, 1);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);

        let content = row(&buf, 120);
        assert!(content.contains("NORMAL"));
        assert!(content.contains("/home/user/project"));
        assert!(content.contains("1.5K rw-r--r--"));
        assert!(content.contains("3 selected"));
        assert!(content.contains("2 in clipboard"));
        assert!(content.contains("?:help"));
    }

    #[test]
    fn zero_counts_are_hidden() {
        let theme = dark_theme();
        let widget = StatusBarWidget::new("/tmp", "NORMAL", &theme);
        let area = Rect::new(0, 0, 80, 1);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);
        let content = row(&buf, 80);
        assert!(!content.contains("selected"));
        assert!(!content.contains("clipboard"));
    }

    #[test]
    fn success_message_replaces_bar() {
        let theme = dark_theme();
        let widget = StatusBarWidget::new("/tmp", "NORMAL", &theme)
            .status_message("Copy completed", false);
        let area = Rect::new(0, 0, 80, 1);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);

        let content = row(&buf, 80);
        assert!(content.contains("Copy completed"));
        assert!(!content.contains("NORMAL"));
        assert_eq!(buf.cell((0, 0)).unwrap().fg, Color::Rgb(166, 227, 161));
    }

    #[test]
    fn error_message_uses_error_background() {
        let theme = dark_theme();
        let widget = StatusBarWidget::new("/tmp", "NORMAL", &theme)
            .status_message("Delete failed: not found: /tmp/x", true);
        let area = Rect::new(0, 0, 80, 1);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);
        assert_eq!(buf.cell((0, 0)).unwrap().bg, Color::Rgb(243, 139, 168));
    }

    #[test]
    fn zero_area_does_not_panic() {
        let theme = dark_theme();
        let area = Rect::new(0, 0, 0, 0);
        let mut buf = Buffer::empty(area);
        StatusBarWidget::new("/tmp", "NORMAL", &theme).render(area, &mut buf);
    }
}
