pub mod bookmarks;
pub mod dialog;
pub mod help;
pub mod pane;
pub mod preview;
pub mod status_bar;

#[cfg(test)]
pub(crate) fn buffer_to_string(
    buf: &ratatui::buffer::Buffer,
    area: ratatui::layout::Rect,
) -> String {
    let mut s = String::new();
    for y in area.y..area.y + area.height {
        for x in area.x..area.x + area.width {
            if let Some(cell) = buf.cell((x, y)) {
                s.push_str(cell.symbol());
            }
        }
        s.push('\n');
    }
    s
}
