mod app;
mod bookmark;
mod components;
mod config;
mod dialog;
mod error;
mod event;
mod fs;
mod handler;
mod keymap;
mod logging;
mod pane;
mod preview;
mod tasks;
mod text_input;
mod theme;
mod tui;
mod ui;

use std::path::{Path, PathBuf};

use clap::Parser;

use crate::app::{App, AppOptions};
use crate::bookmark::BookmarkStore;
use crate::config::{AppConfig, GeneralConfig, LogConfig, ThemeConfig};
use crate::event::EventHandler;
use crate::keymap::KeyMap;
use crate::tasks::TaskSpawner;
use crate::tui::{install_panic_hook, Tui};

/// A dual-pane terminal file manager.
#[derive(Parser, Debug)]
#[command(name = "dpf", version, about)]
struct Cli {
    /// Starting directory of the left pane (defaults to config or cwd)
    left: Option<PathBuf>,

    /// Starting directory of the right pane (defaults to the left one)
    right: Option<PathBuf>,

    /// Path to a config file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Show the preview pane on startup
    #[arg(long)]
    preview: bool,

    /// Color scheme: dark, light or custom
    #[arg(long, value_name = "SCHEME")]
    theme: Option<String>,

    /// Log level: off, error, warn, info, debug or trace
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,
}

impl Cli {
    /// Partial config holding only the flags that were given.
    fn overrides(&self) -> AppConfig {
        AppConfig {
            general: GeneralConfig {
                show_preview: self.preview.then_some(true),
                ..Default::default()
            },
            log: LogConfig {
                level: self.log_level.clone(),
                ..Default::default()
            },
            theme: ThemeConfig {
                scheme: self.theme.clone(),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

/// Resolve a start directory, falling back to the cwd and then home when
/// the requested one is not a readable directory.
fn resolve_start_dir(requested: Option<&Path>) -> error::Result<PathBuf> {
    if let Some(path) = requested {
        match path.canonicalize() {
            Ok(dir) if dir.is_dir() => return Ok(dir),
            Ok(_) => eprintln!("Warning: {} is not a directory", path.display()),
            Err(e) => eprintln!("Warning: cannot open {}: {}", path.display(), e),
        }
    }
    std::env::current_dir()
        .ok()
        .or_else(dirs::home_dir)
        .ok_or_else(|| error::AppError::InvalidPath("no usable start directory".into()))
}

#[tokio::main]
async fn main() -> error::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref(), Some(&cli.overrides()));

    let (keymap, warnings) = KeyMap::new(&config.keys);
    for warning in &warnings {
        eprintln!("Warning: {warning}");
    }

    let log_file = config.log_file();
    if let Err(e) = logging::init(config.log_level(), &log_file) {
        eprintln!("Warning: cannot open log file {}: {}", log_file.display(), e);
    }

    let configured_start = config.start_path();
    let left = resolve_start_dir(cli.left.as_deref().or(configured_start.as_deref()))?;
    let right = match cli.right.as_deref() {
        Some(path) => resolve_start_dir(Some(path))?,
        None => left.clone(),
    };

    let bookmarks_file = config.bookmarks_file().ok_or_else(|| {
        error::AppError::InvalidPath("cannot determine bookmarks location".into())
    })?;

    tracing::info!(
        left = %left.display(),
        right = %right.display(),
        theme = config.theme_scheme(),
        "starting"
    );
    for warning in &warnings {
        tracing::warn!("{warning}");
    }

    install_panic_hook();

    let mut tui = Tui::new()?;
    let mut events = EventHandler::new(config.tick_rate());
    let options = AppOptions {
        keymap,
        theme: theme::resolve_theme(&config.theme),
        bookmarks: BookmarkStore::new(bookmarks_file),
        show_preview: config.show_preview(),
        max_preview_bytes: config.max_preview_bytes(),
        status_timeout: config.status_timeout(),
    };
    let mut app = App::new(left, right, options, TaskSpawner::new(events.sender()));

    let result = run(&mut tui, &mut events, &mut app).await;
    tui.restore()?;
    if let Err(e) = &result {
        tracing::error!("exiting with error: {e}");
    } else {
        tracing::info!("exiting");
    }
    result
}

async fn run(tui: &mut Tui, events: &mut EventHandler, app: &mut App) -> error::Result<()> {
    let (width, height) = tui.size()?;
    app.resize(width, height);

    while !app.should_quit {
        tui.terminal_mut().draw(|frame| ui::render(app, frame))?;
        let event = events.next().await?;
        app.handle_event(event);
    }
    Ok(())
}
