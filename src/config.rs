//! Application configuration: TOML file loading, CLI overrides, and defaults.
//!
//! Resolution order (later sources override earlier ones):
//! 1. Built-in defaults
//! 2. Global `~/.config/dual-pane-fm/config.toml`
//! 3. Project-local `.dpf.toml` in the current working directory
//! 4. `$DPF_CONFIG` environment variable (path to config file)
//! 5. `--config <file>`
//! 6. CLI flags (`--preview`, `--theme`, `--log-level`)

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::bookmark::BookmarkStore;
use crate::preview::DEFAULT_MAX_PREVIEW_BYTES;

// ── Section configs ──────────────────────────────────────────────────────────

/// General application settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct GeneralConfig {
    /// Starting directory for both panes (overridden by CLI positional args).
    pub start_path: Option<String>,
    /// Show the preview pane on startup.
    pub show_preview: Option<bool>,
    /// Seconds a status message stays visible.
    pub status_timeout_secs: Option<u64>,
    /// Idle tick interval in milliseconds.
    pub tick_rate_ms: Option<u64>,
}

/// Preview pane settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct PreviewConfig {
    /// Maximum bytes read from a file for preview.
    pub max_bytes: Option<usize>,
}

/// Bookmark store settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct BookmarksConfig {
    /// Path of the bookmarks JSON file.
    pub file: Option<String>,
}

/// Log output settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct LogConfig {
    /// `off`, `error`, `warn`, `info`, `debug` or `trace`.
    pub level: Option<String>,
    pub file: Option<String>,
}

/// Hex color overrides for the `custom` scheme.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ThemeColorsConfig {
    pub pane_bg: Option<String>,
    pub pane_fg: Option<String>,
    pub cursor_bg: Option<String>,
    pub cursor_fg: Option<String>,
    pub dir_fg: Option<String>,
    pub file_fg: Option<String>,
    pub link_fg: Option<String>,
    pub marked_fg: Option<String>,
    pub preview_bg: Option<String>,
    pub preview_fg: Option<String>,
    pub status_bg: Option<String>,
    pub status_fg: Option<String>,
    pub border_fg: Option<String>,
    pub border_focused_fg: Option<String>,
    pub dialog_bg: Option<String>,
    pub dialog_border_fg: Option<String>,
}

/// Theme configuration section.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ThemeConfig {
    /// Color scheme: "dark", "light", "custom".
    pub scheme: Option<String>,
    pub custom: Option<ThemeColorsConfig>,
}

// ── Top-level config ─────────────────────────────────────────────────────────

/// Top-level application configuration.
///
/// All fields are optional so that partial configs from different sources
/// can be merged together.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub preview: PreviewConfig,
    pub bookmarks: BookmarksConfig,
    pub log: LogConfig,
    pub theme: ThemeConfig,
    /// Action name → key strings; each entry replaces that action's defaults.
    pub keys: BTreeMap<String, Vec<String>>,
}

// ── Default constants ────────────────────────────────────────────────────────

pub const DEFAULT_STATUS_TIMEOUT_SECS: u64 = 3;
pub const DEFAULT_TICK_RATE_MS: u64 = 250;
pub const DEFAULT_LOG_LEVEL: &str = "info";

const APP_DIR: &str = "dual-pane-fm";

// ── Config file locator ──────────────────────────────────────────────────────

/// Candidate config files, highest priority first. The `--config` path is
/// handled separately.
fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(env_path) = std::env::var("DPF_CONFIG") {
        paths.push(PathBuf::from(env_path));
    }

    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join(".dpf.toml"));
    }

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join(APP_DIR).join("config.toml"));
    }

    paths
}

/// Read and parse one config file. Missing files are skipped silently;
/// unreadable or malformed ones are skipped with a warning on stderr.
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
        Err(e) => {
            eprintln!("Warning: cannot read config file {}: {}", path.display(), e);
            return None;
        }
    };
    match toml::from_str::<AppConfig>(&content) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            eprintln!(
                "Warning: failed to parse config file {}: {}",
                path.display(),
                e
            );
            None
        }
    }
}

// ── Merge logic ──────────────────────────────────────────────────────────────

impl AppConfig {
    /// Merge `other` on top of `self`; `other`'s `Some` values win.
    pub fn merge(self, other: &AppConfig) -> AppConfig {
        let mut keys = self.keys;
        for (action, bindings) in &other.keys {
            keys.insert(action.clone(), bindings.clone());
        }

        AppConfig {
            general: GeneralConfig {
                start_path: other
                    .general
                    .start_path
                    .clone()
                    .or(self.general.start_path),
                show_preview: other.general.show_preview.or(self.general.show_preview),
                status_timeout_secs: other
                    .general
                    .status_timeout_secs
                    .or(self.general.status_timeout_secs),
                tick_rate_ms: other.general.tick_rate_ms.or(self.general.tick_rate_ms),
            },
            preview: PreviewConfig {
                max_bytes: other.preview.max_bytes.or(self.preview.max_bytes),
            },
            bookmarks: BookmarksConfig {
                file: other.bookmarks.file.clone().or(self.bookmarks.file),
            },
            log: LogConfig {
                level: other.log.level.clone().or(self.log.level),
                file: other.log.file.clone().or(self.log.file),
            },
            theme: ThemeConfig {
                scheme: other.theme.scheme.clone().or(self.theme.scheme),
                custom: other.theme.custom.clone().or(self.theme.custom),
            },
            keys,
        }
    }

    /// Load the final merged configuration.
    ///
    /// `cli_config_path` comes from `--config`; `cli_overrides` holds the
    /// partial config derived from other CLI flags.
    pub fn load(cli_config_path: Option<&Path>, cli_overrides: Option<&AppConfig>) -> AppConfig {
        let mut config = AppConfig::default();

        for path in candidate_paths().iter().rev() {
            if let Some(file_cfg) = load_file(path) {
                config = config.merge(&file_cfg);
            }
        }

        if let Some(cli_path) = cli_config_path {
            if !cli_path.exists() {
                eprintln!("Warning: config file {} not found", cli_path.display());
            } else if let Some(file_cfg) = load_file(cli_path) {
                config = config.merge(&file_cfg);
            }
        }

        if let Some(overrides) = cli_overrides {
            config = config.merge(overrides);
        }

        config
    }

    // ── Convenience getters with built-in defaults ──────────────────────────

    pub fn start_path(&self) -> Option<PathBuf> {
        self.general.start_path.as_deref().map(expand_tilde)
    }

    pub fn show_preview(&self) -> bool {
        self.general.show_preview.unwrap_or(false)
    }

    pub fn status_timeout(&self) -> Duration {
        Duration::from_secs(
            self.general
                .status_timeout_secs
                .unwrap_or(DEFAULT_STATUS_TIMEOUT_SECS),
        )
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(
            self.general
                .tick_rate_ms
                .unwrap_or(DEFAULT_TICK_RATE_MS)
                .max(10),
        )
    }

    pub fn max_preview_bytes(&self) -> usize {
        self.preview.max_bytes.unwrap_or(DEFAULT_MAX_PREVIEW_BYTES)
    }

    /// Configured bookmarks file, else the default location.
    pub fn bookmarks_file(&self) -> Option<PathBuf> {
        self.bookmarks
            .file
            .as_deref()
            .map(expand_tilde)
            .or_else(BookmarkStore::default_path)
    }

    pub fn log_level(&self) -> &str {
        self.log.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    /// Configured log file, else `<state or cache dir>/dual-pane-fm/dpf.log`,
    /// else the temp dir.
    pub fn log_file(&self) -> PathBuf {
        if let Some(file) = self.log.file.as_deref() {
            return expand_tilde(file);
        }
        dirs::state_dir()
            .or_else(dirs::cache_dir)
            .unwrap_or_else(std::env::temp_dir)
            .join(APP_DIR)
            .join("dpf.log")
    }

    /// Theme scheme: "dark", "light", or "custom".
    pub fn theme_scheme(&self) -> &str {
        self.theme.scheme.as_deref().unwrap_or("dark")
    }
}

/// Expand a leading `~` to the home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    } else if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_values() {
        let cfg = AppConfig::default();
        assert!(!cfg.show_preview());
        assert_eq!(cfg.status_timeout(), Duration::from_secs(3));
        assert_eq!(cfg.tick_rate(), Duration::from_millis(250));
        assert_eq!(cfg.max_preview_bytes(), 65536);
        assert_eq!(cfg.log_level(), "info");
        assert_eq!(cfg.theme_scheme(), "dark");
        assert!(cfg.start_path().is_none());
        assert!(cfg.keys.is_empty());
    }

    #[test]
    fn test_toml_parsing_full() {
        let toml = r#"
[general]
start_path = "/srv"
show_preview = true
status_timeout_secs = 5
tick_rate_ms = 100

[preview]
max_bytes = 1024

[bookmarks]
file = "/tmp/marks.json"

[log]
level = "debug"
file = "/tmp/dpf.log"

[theme]
scheme = "light"

[keys]
copy = ["y", "f5"]
quit = ["ctrl+q"]
"#;
        let cfg: AppConfig = toml::from_str(toml).expect("parse failed");
        assert_eq!(cfg.start_path(), Some(PathBuf::from("/srv")));
        assert!(cfg.show_preview());
        assert_eq!(cfg.status_timeout(), Duration::from_secs(5));
        assert_eq!(cfg.tick_rate(), Duration::from_millis(100));
        assert_eq!(cfg.max_preview_bytes(), 1024);
        assert_eq!(cfg.bookmarks_file(), Some(PathBuf::from("/tmp/marks.json")));
        assert_eq!(cfg.log_level(), "debug");
        assert_eq!(cfg.log_file(), PathBuf::from("/tmp/dpf.log"));
        assert_eq!(cfg.theme_scheme(), "light");
        assert_eq!(cfg.keys["copy"], vec!["y".to_string(), "f5".to_string()]);
    }

    #[test]
    fn test_toml_parsing_partial_and_empty() {
        let cfg: AppConfig = toml::from_str("[general]\nshow_preview = true\n").expect("parse");
        assert!(cfg.show_preview());
        assert_eq!(cfg.max_preview_bytes(), 65536);

        let empty: AppConfig = toml::from_str("").expect("parse");
        assert!(!empty.show_preview());
    }

    #[test]
    fn test_merge_overrides() {
        let base = AppConfig {
            general: GeneralConfig {
                show_preview: Some(false),
                status_timeout_secs: Some(9),
                ..Default::default()
            },
            keys: BTreeMap::from([
                ("copy".to_string(), vec!["y".to_string()]),
                ("paste".to_string(), vec!["v".to_string()]),
            ]),
            ..Default::default()
        };
        let over = AppConfig {
            general: GeneralConfig {
                show_preview: Some(true),
                ..Default::default()
            },
            keys: BTreeMap::from([("copy".to_string(), vec!["c".to_string()])]),
            ..Default::default()
        };

        let merged = base.merge(&over);
        assert!(merged.show_preview());
        assert_eq!(merged.status_timeout(), Duration::from_secs(9));
        assert_eq!(merged.keys["copy"], vec!["c".to_string()]);
        assert_eq!(merged.keys["paste"], vec!["v".to_string()]);
    }

    #[test]
    fn test_merge_none_does_not_clear_some() {
        let base = AppConfig {
            log: LogConfig {
                level: Some("warn".into()),
                file: None,
            },
            ..Default::default()
        };
        let merged = base.merge(&AppConfig::default());
        assert_eq!(merged.log_level(), "warn");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg_path = dir.path().join("test-config.toml");
        let mut f = std::fs::File::create(&cfg_path).expect("create");
        writeln!(
            f,
            r##"
[preview]
max_bytes = 2048

[theme]
scheme = "custom"

[theme.custom]
pane_bg = "#1a1b26"
"##
        )
        .expect("write");

        let cfg = load_file(&cfg_path).expect("load");
        assert_eq!(cfg.max_preview_bytes(), 2048);
        let custom = cfg.theme.custom.as_ref().expect("custom present");
        assert_eq!(custom.pane_bg.as_deref(), Some("#1a1b26"));
        assert!(custom.dialog_bg.is_none());
    }

    #[test]
    fn test_load_missing_and_invalid_files() {
        assert!(load_file(Path::new("/nonexistent/config.toml")).is_none());

        let dir = tempfile::tempdir().expect("tempdir");
        let cfg_path = dir.path().join("bad.toml");
        std::fs::write(&cfg_path, "this is { not valid toml").expect("write");
        assert!(load_file(&cfg_path).is_none());
    }

    #[test]
    fn test_load_with_cli_overrides() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg_path = dir.path().join("config.toml");
        std::fs::write(
            &cfg_path,
            "[general]\nstatus_timeout_secs = 7\n\n[preview]\nmax_bytes = 10\n",
        )
        .expect("write");

        let cli_overrides = AppConfig {
            preview: PreviewConfig {
                max_bytes: Some(20),
            },
            ..Default::default()
        };

        let cfg = AppConfig::load(Some(&cfg_path), Some(&cli_overrides));
        assert_eq!(cfg.max_preview_bytes(), 20);
        assert_eq!(cfg.status_timeout(), Duration::from_secs(7));
    }

    #[test]
    fn test_expand_tilde() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_tilde("~"), home);
            assert_eq!(expand_tilde("~/x"), home.join("x"));
        }
        assert_eq!(expand_tilde("/abs/~"), PathBuf::from("/abs/~"));
    }
}
