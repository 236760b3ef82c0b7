//! Built-in palettes and theme resolution from config.
//!
//! Two palettes (dark and light) ship with the binary; the `custom` scheme
//! starts from dark and applies hex overrides from `[theme.custom]`.

use ratatui::style::Color;

use crate::config::{ThemeColorsConfig, ThemeConfig};

// ── Runtime theme colors ─────────────────────────────────────────────────────

/// All runtime colors used in the UI.
#[derive(Debug, Clone)]
pub struct ThemeColors {
    // Panes
    pub pane_bg: Color,
    pub pane_fg: Color,
    pub cursor_bg: Color,
    pub cursor_fg: Color,
    pub dir_fg: Color,
    pub file_fg: Color,
    pub link_fg: Color,
    pub marked_fg: Color,
    pub header_fg: Color,

    // Preview panel
    pub preview_bg: Color,
    pub preview_fg: Color,

    // Status bar
    pub status_bg: Color,
    pub status_fg: Color,

    // Borders & chrome
    pub border_fg: Color,
    pub border_focused_fg: Color,

    // Dialogs
    pub dialog_bg: Color,
    pub dialog_border_fg: Color,

    // Semantic colors (not configurable)
    pub error_fg: Color,
    pub warning_fg: Color,
    pub success_fg: Color,
    pub accent_fg: Color,
    pub dim_fg: Color,
}

// ── Built-in palettes ────────────────────────────────────────────────────────

/// Dark theme using the Catppuccin Mocha palette.
pub fn dark_theme() -> ThemeColors {
    ThemeColors {
        pane_bg: Color::Reset,
        pane_fg: Color::Rgb(205, 214, 244),   // #cdd6f4 (text)
        cursor_bg: Color::Rgb(69, 71, 90),    // #45475a (surface1)
        cursor_fg: Color::Rgb(205, 214, 244), // #cdd6f4
        dir_fg: Color::Rgb(137, 180, 250),    // #89b4fa (blue)
        file_fg: Color::Rgb(205, 214, 244),
        link_fg: Color::Rgb(148, 226, 213),   // #94e2d5 (teal)
        marked_fg: Color::Rgb(249, 226, 175), // #f9e2af (yellow)
        header_fg: Color::Rgb(203, 166, 247), // #cba6f7 (mauve)

        preview_bg: Color::Reset,
        preview_fg: Color::Rgb(205, 214, 244),

        status_bg: Color::Rgb(30, 30, 46), // #1e1e2e (base)
        status_fg: Color::Rgb(205, 214, 244),

        border_fg: Color::Rgb(88, 91, 112), // #585b70 (surface2)
        border_focused_fg: Color::Rgb(137, 180, 250),

        dialog_bg: Color::Rgb(49, 50, 68), // #313244 (surface0)
        dialog_border_fg: Color::Rgb(137, 180, 250),

        error_fg: Color::Rgb(243, 139, 168),   // #f38ba8 (red)
        warning_fg: Color::Rgb(249, 226, 175), // #f9e2af (yellow)
        success_fg: Color::Rgb(166, 227, 161), // #a6e3a1 (green)
        accent_fg: Color::Rgb(203, 166, 247),  // #cba6f7 (mauve)
        dim_fg: Color::Rgb(108, 112, 134),     // #6c7086 (overlay0)
    }
}

/// Light theme using the Catppuccin Latte palette.
pub fn light_theme() -> ThemeColors {
    ThemeColors {
        pane_bg: Color::Reset,
        pane_fg: Color::Rgb(76, 79, 105),      // #4c4f69 (text)
        cursor_bg: Color::Rgb(204, 208, 218),  // #ccd0da (surface1)
        cursor_fg: Color::Rgb(76, 79, 105),
        dir_fg: Color::Rgb(30, 102, 245),      // #1e66f5 (blue)
        file_fg: Color::Rgb(76, 79, 105),
        link_fg: Color::Rgb(23, 146, 153),     // #179299 (teal)
        marked_fg: Color::Rgb(223, 142, 29),   // #df8e1d (yellow)
        header_fg: Color::Rgb(136, 57, 239),   // #8839ef (mauve)

        preview_bg: Color::Reset,
        preview_fg: Color::Rgb(76, 79, 105),

        status_bg: Color::Rgb(239, 241, 245), // #eff1f5 (base)
        status_fg: Color::Rgb(76, 79, 105),

        border_fg: Color::Rgb(172, 176, 190), // #acb0be (surface2)
        border_focused_fg: Color::Rgb(30, 102, 245),

        dialog_bg: Color::Rgb(230, 233, 239), // #e6e9ef (surface0)
        dialog_border_fg: Color::Rgb(30, 102, 245),

        error_fg: Color::Rgb(210, 15, 57),    // #d20f39 (red)
        warning_fg: Color::Rgb(223, 142, 29), // #df8e1d (yellow)
        success_fg: Color::Rgb(64, 160, 43),  // #40a02b (green)
        accent_fg: Color::Rgb(136, 57, 239),
        dim_fg: Color::Rgb(156, 160, 176), // #9ca0b0 (overlay0)
    }
}

// ── Color parsing ────────────────────────────────────────────────────────────

/// Parse `"#aabbcc"` (the `#` is optional). Returns `None` for malformed input.
pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

// ── Theme resolution ─────────────────────────────────────────────────────────

/// Resolve the runtime palette. Unknown scheme names fall back to dark.
pub fn resolve_theme(config: &ThemeConfig) -> ThemeColors {
    match config.scheme.as_deref().unwrap_or("dark") {
        "light" => light_theme(),
        "custom" => {
            let mut theme = dark_theme();
            if let Some(custom) = &config.custom {
                apply_custom_colors(&mut theme, custom);
            }
            theme
        }
        _ => dark_theme(),
    }
}

/// Apply hex overrides; malformed values keep the existing color.
fn apply_custom_colors(theme: &mut ThemeColors, custom: &ThemeColorsConfig) {
    macro_rules! apply {
        ($($field:ident),* $(,)?) => {
            $(
                if let Some(color) = custom.$field.as_deref().and_then(parse_hex_color) {
                    theme.$field = color;
                }
            )*
        };
    }
    apply!(
        pane_bg,
        pane_fg,
        cursor_bg,
        cursor_fg,
        dir_fg,
        file_fg,
        link_fg,
        marked_fg,
        preview_bg,
        preview_fg,
        status_bg,
        status_fg,
        border_fg,
        border_focused_fg,
        dialog_bg,
        dialog_border_fg,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_hex_color_valid() {
        assert_eq!(parse_hex_color("#ff0000"), Some(Color::Rgb(255, 0, 0)));
        assert_eq!(parse_hex_color("#1a1b26"), Some(Color::Rgb(26, 27, 38)));
        assert_eq!(parse_hex_color("00ff00"), Some(Color::Rgb(0, 255, 0)));
    }

    #[test]
    fn parse_hex_color_invalid() {
        assert_eq!(parse_hex_color("#zzzzzz"), None);
        assert_eq!(parse_hex_color("#fff"), None);
        assert_eq!(parse_hex_color(""), None);
        assert_eq!(parse_hex_color("#ééé"), None);
    }

    #[test]
    fn resolve_named_schemes() {
        let light = resolve_theme(&ThemeConfig {
            scheme: Some("light".to_string()),
            custom: None,
        });
        assert_eq!(light.dir_fg, Color::Rgb(30, 102, 245));

        let default = resolve_theme(&ThemeConfig::default());
        assert_eq!(default.dir_fg, Color::Rgb(137, 180, 250));

        let unknown = resolve_theme(&ThemeConfig {
            scheme: Some("neon".to_string()),
            custom: None,
        });
        assert_eq!(unknown.dir_fg, Color::Rgb(137, 180, 250));
    }

    #[test]
    fn custom_overrides_apply_over_dark() {
        let config = ThemeConfig {
            scheme: Some("custom".to_string()),
            custom: Some(ThemeColorsConfig {
                pane_bg: Some("#1a1b26".to_string()),
                marked_fg: Some("#c0caf5".to_string()),
                cursor_bg: Some("#zzzzzz".to_string()),
                ..Default::default()
            }),
        };
        let theme = resolve_theme(&config);
        assert_eq!(theme.pane_bg, Color::Rgb(26, 27, 38));
        assert_eq!(theme.marked_fg, Color::Rgb(192, 202, 245));
        assert_eq!(theme.cursor_bg, dark_theme().cursor_bg);
        assert_eq!(theme.dir_fg, Color::Rgb(137, 180, 250));
    }

    #[test]
    fn dark_and_light_differ() {
        let dark = dark_theme();
        let light = light_theme();
        assert_ne!(dark.pane_fg, light.pane_fg);
        assert_ne!(dark.cursor_bg, light.cursor_bg);
        assert_ne!(dark.marked_fg, light.marked_fg);
    }
}
