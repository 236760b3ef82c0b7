use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};
use tokio::sync::mpsc;

use crate::error::{FsError, Result};
use crate::fs::entry::Entry;
use crate::pane::PaneId;
use crate::preview::PreviewContent;

/// Kind of file operation, for status reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOpKind {
    Copy,
    Move,
    Delete,
    Rename,
    Mkdir,
}

impl fmt::Display for FileOpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FileOpKind::Copy => "Copy",
            FileOpKind::Move => "Move",
            FileOpKind::Delete => "Delete",
            FileOpKind::Rename => "Rename",
            FileOpKind::Mkdir => "Mkdir",
        };
        f.write_str(label)
    }
}

/// Outcome of a file operation batch.
#[derive(Debug)]
pub struct FileOpResult {
    pub kind: FileOpKind,
    /// Items finished before the batch stopped.
    pub completed: usize,
    pub total: usize,
    /// First failure; the remaining items were not attempted.
    pub error: Option<FsError>,
}

impl FileOpResult {
    /// `"Copy completed"` or `"Copy failed: ..."`.
    pub fn status_text(&self) -> String {
        match &self.error {
            None => format!("{} completed", self.kind),
            Some(err) if self.total > 1 => format!(
                "{} failed after {}/{}: {err}",
                self.kind, self.completed, self.total
            ),
            Some(err) => format!("{} failed: {err}", self.kind),
        }
    }
}

/// Everything that can re-enter the main loop: terminal input, ticks and
/// completions of background work.
#[derive(Debug)]
pub enum Event {
    Key(KeyEvent),
    /// Periodic tick for status expiry.
    Tick,
    Resize(u16, u16),
    /// A directory listing finished for `pane`.
    DirLoaded {
        pane: PaneId,
        path: PathBuf,
        result: std::result::Result<Vec<Entry>, FsError>,
    },
    /// A preview load finished.
    PreviewLoaded {
        path: PathBuf,
        result: std::result::Result<PreviewContent, FsError>,
    },
    /// A file operation batch finished.
    FileOpComplete(FileOpResult),
}

/// Polls crossterm on a background task and funnels everything into one inbox.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
    tx: mpsc::UnboundedSender<Event>,
}

impl EventHandler {
    /// Create an EventHandler that emits `Tick` every `tick_rate` of idle.
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let event_tx = tx.clone();

        tokio::task::spawn_blocking(move || loop {
            let event = if event::poll(tick_rate).unwrap_or(false) {
                match event::read() {
                    Ok(CrosstermEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                        Event::Key(key)
                    }
                    Ok(CrosstermEvent::Resize(w, h)) => Event::Resize(w, h),
                    _ => continue,
                }
            } else {
                Event::Tick
            };
            if event_tx.send(event).is_err() {
                break;
            }
        });

        Self { rx, tx }
    }

    /// Sender for background tasks to deliver completions.
    pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
        self.tx.clone()
    }

    /// Wait for the next event.
    pub async fn next(&mut self) -> Result<Event> {
        self.rx
            .recv()
            .await
            .ok_or_else(|| crate::error::AppError::Terminal("Event channel closed".into()))
    }
}
