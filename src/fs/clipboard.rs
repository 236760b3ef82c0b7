use std::fmt;
use std::path::PathBuf;

/// What a paste does with the clipboard's sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipboardOp {
    Copy,
    Move,
}

impl fmt::Display for ClipboardOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClipboardOp::Copy => write!(f, "Copy"),
            ClipboardOp::Move => write!(f, "Move"),
        }
    }
}

/// Controller-owned buffer of absolute source paths plus the pending intent.
#[derive(Debug, Clone, Default)]
pub struct ClipboardState {
    pub paths: Vec<PathBuf>,
    pub operation: Option<ClipboardOp>,
}

impl ClipboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the clipboard contents.
    pub fn set(&mut self, paths: Vec<PathBuf>, op: ClipboardOp) {
        self.paths = paths;
        self.operation = Some(op);
    }

    /// Move the contents out, leaving the clipboard empty.
    ///
    /// Returns `None` when there is nothing to paste.
    pub fn take(&mut self) -> Option<(Vec<PathBuf>, ClipboardOp)> {
        if self.paths.is_empty() {
            return None;
        }
        let op = self.operation.take()?;
        Some((std::mem::take(&mut self.paths), op))
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }
}
