use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::{App, AppMode};
use crate::components::{
    bookmarks::BookmarkWidget,
    dialog::{input_line, DialogWidget},
    help::HelpOverlay,
    pane::{format_size, PaneWidget},
    preview::PreviewWidget,
    status_bar::StatusBarWidget,
};
use crate::pane::PaneId;

/// Screen regions for one frame.
#[derive(Debug, Clone, Copy)]
pub struct MainLayout {
    pub panes: [Rect; 2],
    pub preview: Option<Rect>,
    pub search: Option<Rect>,
    pub status: Rect,
}

/// Split the screen. Shared by rendering and by the controller, which
/// derives each pane's page size from it.
pub fn main_layout(area: Rect, preview_visible: bool, searching: bool) -> MainLayout {
    let mut rows = vec![Constraint::Min(1)];
    if searching {
        rows.push(Constraint::Length(1));
    }
    rows.push(Constraint::Length(1));
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints(rows)
        .split(area);

    let main = vertical[0];
    let (search, status) = if searching {
        (Some(vertical[1]), vertical[2])
    } else {
        (None, vertical[1])
    };

    let columns = if preview_visible {
        vec![
            Constraint::Percentage(35),
            Constraint::Percentage(35),
            Constraint::Percentage(30),
        ]
    } else {
        vec![Constraint::Percentage(50), Constraint::Percentage(50)]
    };
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(columns)
        .split(main);

    MainLayout {
        panes: [horizontal[0], horizontal[1]],
        preview: preview_visible.then(|| horizontal[2]),
        search,
        status,
    }
}

/// Render the application UI.
pub fn render(app: &App, frame: &mut Frame) {
    let area = frame.area();

    if !app.is_ready() {
        let loading = Paragraph::new(Span::styled(
            "Loading...",
            Style::default().fg(app.theme.dim_fg),
        ));
        frame.render_widget(loading, area);
        return;
    }

    let searching = matches!(app.mode, AppMode::Search);
    let layout = main_layout(area, app.preview.visible, searching);

    for id in [PaneId::Left, PaneId::Right] {
        let widget = PaneWidget::new(app.pane(id), &app.theme, id == app.active);
        frame.render_widget(widget, layout.panes[id.index()]);
    }

    if let Some(rect) = layout.preview {
        frame.render_widget(PreviewWidget::new(&app.preview, &app.theme), rect);
    }

    if let Some(rect) = layout.search {
        let mut spans = vec![Span::styled(
            "Search: ",
            Style::default()
                .fg(app.theme.accent_fg)
                .add_modifier(Modifier::BOLD),
        )];
        let input = input_line(
            &app.search_input,
            "type to filter",
            rect.width.saturating_sub(8) as usize,
            &app.theme,
        );
        spans.extend(input.spans);
        frame.render_widget(Paragraph::new(Line::from(spans)), rect);
    }

    render_status_bar(app, frame, layout.status);

    match &app.mode {
        AppMode::Dialog(dialog) => {
            frame.render_widget(DialogWidget::new(dialog, &app.theme), area);
        }
        AppMode::Bookmark(list) => {
            frame.render_widget(BookmarkWidget::new(list, &app.theme), area);
        }
        AppMode::Help => {
            frame.render_widget(HelpOverlay::new(&app.keymap, &app.theme), area);
        }
        AppMode::Normal | AppMode::Search => {}
    }
}

fn render_status_bar(app: &App, frame: &mut Frame, area: Rect) {
    let pane = app.active_pane();
    let path = pane.dir.display().to_string();
    let mode = match app.mode {
        AppMode::Normal => "NORMAL",
        AppMode::Dialog(_) => "DIALOG",
        AppMode::Search => "SEARCH",
        AppMode::Bookmark(_) => "BOOKMARKS",
        AppMode::Help => "HELP",
    };
    let info = pane
        .selected_entry()
        .filter(|e| !e.is_parent())
        .map(|e| {
            let size = if e.is_dir {
                "<DIR>".to_string()
            } else {
                format_size(e.size)
            };
            format!("{} {} {}", e.name, size, e.permissions_string())
        });

    let mut widget = StatusBarWidget::new(&path, mode, &app.theme)
        .marked(pane.marked_count())
        .clipboard(app.clipboard.len());
    if let Some(info) = info.as_deref() {
        widget = widget.file_info(info);
    }
    if let Some(msg) = &app.status_message {
        widget = widget.status_message(&msg.text, msg.is_error);
    }
    frame.render_widget(widget, area);
}
