use std::path::{Path, PathBuf};

use tokio::sync::mpsc;

use crate::error::FsError;
use crate::event::{Event, FileOpKind, FileOpResult};
use crate::fs::{entry, operations};
use crate::pane::PaneId;
use crate::preview;

/// A file operation batch, with every input captured at issue time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOp {
    Copy { sources: Vec<PathBuf>, dest: PathBuf },
    Move { sources: Vec<PathBuf>, dest: PathBuf },
    Delete { targets: Vec<PathBuf> },
    Rename { path: PathBuf, new_name: String },
    Mkdir { parent: PathBuf, name: String },
}

impl FileOp {
    pub fn kind(&self) -> FileOpKind {
        match self {
            FileOp::Copy { .. } => FileOpKind::Copy,
            FileOp::Move { .. } => FileOpKind::Move,
            FileOp::Delete { .. } => FileOpKind::Delete,
            FileOp::Rename { .. } => FileOpKind::Rename,
            FileOp::Mkdir { .. } => FileOpKind::Mkdir,
        }
    }

    /// Run the batch, stopping at the first failure. Items already done
    /// are not rolled back.
    pub fn run(self) -> FileOpResult {
        let kind = self.kind();
        match self {
            FileOp::Copy { sources, dest } => {
                run_batch(kind, &sources, |src| operations::copy_item(src, &dest).map(drop))
            }
            FileOp::Move { sources, dest } => {
                run_batch(kind, &sources, |src| operations::move_item(src, &dest).map(drop))
            }
            FileOp::Delete { targets } => run_batch(kind, &targets, operations::delete),
            FileOp::Rename { path, new_name } => run_batch(kind, &[path], |p| {
                operations::rename(p, &new_name).map(drop)
            }),
            FileOp::Mkdir { parent, name } => run_batch(kind, &[parent], |p| {
                operations::make_dir(p, &name).map(drop)
            }),
        }
    }
}

fn run_batch<F>(kind: FileOpKind, items: &[PathBuf], mut op: F) -> FileOpResult
where
    F: FnMut(&Path) -> Result<(), FsError>,
{
    let total = items.len();
    for (done, item) in items.iter().enumerate() {
        if let Err(error) = op(item) {
            return FileOpResult {
                kind,
                completed: done,
                total,
                error: Some(error),
            };
        }
    }
    FileOpResult {
        kind,
        completed: total,
        total,
        error: None,
    }
}

/// Issues background work whose results come back as events on the main
/// loop's inbox. Nothing issued here touches application state directly.
#[derive(Debug, Clone)]
pub struct TaskSpawner {
    tx: mpsc::UnboundedSender<Event>,
}

impl TaskSpawner {
    pub fn new(tx: mpsc::UnboundedSender<Event>) -> Self {
        Self { tx }
    }

    fn spawn<F>(&self, work: F)
    where
        F: FnOnce() -> Event + Send + 'static,
    {
        let tx = self.tx.clone();
        tokio::task::spawn_blocking(move || {
            // The receiver is gone only during shutdown.
            let _ = tx.send(work());
        });
    }

    /// List `dir` and deliver `Event::DirLoaded` tagged with `pane`.
    pub fn load_dir(&self, pane: PaneId, dir: PathBuf) {
        tracing::debug!(%pane, dir = %dir.display(), "issue directory load");
        self.spawn(move || {
            let result = entry::list_directory(&dir);
            Event::DirLoaded {
                pane,
                path: dir,
                result,
            }
        });
    }

    pub fn load_preview(&self, path: PathBuf, max_bytes: usize) {
        tracing::debug!(path = %path.display(), "issue preview load");
        self.spawn(move || {
            let result = preview::load_preview(&path, max_bytes);
            Event::PreviewLoaded { path, result }
        });
    }

    pub fn run_file_op(&self, op: FileOp) {
        tracing::debug!(kind = %op.kind(), ?op, "issue file operation");
        self.spawn(move || Event::FileOpComplete(op.run()));
    }
}
