use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::FsError;
use crate::fs::entry::list_directory;

/// Default cap on bytes read for a file preview.
pub const DEFAULT_MAX_PREVIEW_BYTES: usize = 64 * 1024;

/// Prefix scanned for NUL bytes when classifying content.
const BINARY_SNIFF_LEN: usize = 512;

/// Text shown in place of binary content.
pub const BINARY_PLACEHOLDER: &str = "[Binary file]";

/// Loaded preview content for one path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewContent {
    pub text: String,
    pub is_binary: bool,
}

/// Load a preview for `path`: a summary for directories, otherwise at most
/// `max_bytes` of the file classified as text or binary.
pub fn load_preview(path: &Path, max_bytes: usize) -> Result<PreviewContent, FsError> {
    let meta = fs::metadata(path).map_err(|e| FsError::from_io(path, e))?;
    if meta.is_dir() {
        return directory_summary(path);
    }
    if !meta.file_type().is_file() {
        return Ok(PreviewContent {
            text: format!("Not a regular file: {}", path.display()),
            is_binary: false,
        });
    }

    let file = fs::File::open(path).map_err(|e| FsError::from_io(path, e))?;
    let mut buf = Vec::with_capacity(max_bytes.min(meta.len() as usize));
    file.take(max_bytes as u64)
        .read_to_end(&mut buf)
        .map_err(|e| FsError::from_io(path, e))?;
    let truncated = meta.len() > buf.len() as u64;

    match decode_text(&buf, truncated) {
        Some(text) => Ok(PreviewContent {
            text,
            is_binary: false,
        }),
        None => Ok(PreviewContent {
            text: String::new(),
            is_binary: true,
        }),
    }
}

/// Decode `buf` as UTF-8 text, or `None` if it looks binary.
///
/// A multi-byte character cut off by the read cap does not count as invalid.
fn decode_text(buf: &[u8], truncated: bool) -> Option<String> {
    let sniff = &buf[..buf.len().min(BINARY_SNIFF_LEN)];
    if sniff.contains(&0) {
        return None;
    }
    match std::str::from_utf8(buf) {
        Ok(s) => Some(s.to_string()),
        Err(e) if truncated && e.error_len().is_none() => {
            Some(String::from_utf8_lossy(&buf[..e.valid_up_to()]).into_owned())
        }
        Err(_) => None,
    }
}

fn directory_summary(path: &Path) -> Result<PreviewContent, FsError> {
    let entries = list_directory(path)?;
    let children: Vec<_> = entries.iter().filter(|e| !e.is_parent()).collect();

    let mut text = format!("Directory: {}\n{} items\n\n", path.display(), children.len());
    for entry in children {
        if entry.is_dir {
            text.push_str(&format!("  [DIR] {}\n", entry.name));
        } else {
            text.push_str(&format!("  {} ({} bytes)\n", entry.name, entry.size));
        }
    }
    Ok(PreviewContent {
        text,
        is_binary: false,
    })
}

/// Preview pane state: visibility plus the last content that arrived.
#[derive(Debug, Default)]
pub struct PreviewState {
    pub visible: bool,
    pub path: Option<PathBuf>,
    pub lines: Vec<String>,
    pub is_binary: bool,
    pub error: Option<String>,
}

impl PreviewState {
    pub fn new(visible: bool) -> Self {
        Self {
            visible,
            ..Self::default()
        }
    }

    /// Store newly loaded content. The path is not compared against the
    /// current selection; the latest arrival is always displayed.
    pub fn set_content(&mut self, path: PathBuf, content: PreviewContent) {
        self.path = Some(path);
        self.is_binary = content.is_binary;
        self.error = None;
        self.lines = if content.is_binary {
            vec![BINARY_PLACEHOLDER.to_string()]
        } else {
            content.text.lines().map(str::to_string).collect()
        };
    }

    pub fn set_error(&mut self, path: PathBuf, message: String) {
        self.path = Some(path);
        self.lines.clear();
        self.is_binary = false;
        self.error = Some(message);
    }

    pub fn clear(&mut self) {
        self.path = None;
        self.lines.clear();
        self.is_binary = false;
        self.error = None;
    }

    /// Flip visibility; hiding also drops the loaded content.
    pub fn toggle(&mut self) -> bool {
        self.visible = !self.visible;
        if !self.visible {
            self.clear();
        }
        self.visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn text_file_preview() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("a.txt");
        fs::write(&path, "line one\nline two\n").unwrap();
        let content = load_preview(&path, DEFAULT_MAX_PREVIEW_BYTES).unwrap();
        assert!(!content.is_binary);
        assert_eq!(content.text, "line one\nline two\n");
    }

    #[test]
    fn nul_byte_marks_binary() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bin");
        fs::write(&path, b"abc\0def").unwrap();
        assert!(load_preview(&path, DEFAULT_MAX_PREVIEW_BYTES).unwrap().is_binary);
    }

    #[test]
    fn invalid_utf8_marks_binary() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("latin1");
        fs::write(&path, [b'a', 0xff, 0xfe, b'b']).unwrap();
        assert!(load_preview(&path, DEFAULT_MAX_PREVIEW_BYTES).unwrap().is_binary);
    }

    #[test]
    fn cap_splitting_a_character_is_still_text() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("utf8");
        // "aé" is 3 bytes; a 2-byte cap cuts the é in half.
        fs::write(&path, "aé").unwrap();
        let content = load_preview(&path, 2).unwrap();
        assert!(!content.is_binary);
        assert_eq!(content.text, "a");
    }

    #[test]
    fn reads_at_most_cap_bytes() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("big");
        fs::write(&path, "x".repeat(100)).unwrap();
        assert_eq!(load_preview(&path, 10).unwrap().text.len(), 10);
    }

    #[test]
    fn directory_summary_lists_children() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("sub")).unwrap();
        fs::write(tmp.path().join("f.txt"), "12345").unwrap();
        let content = load_preview(tmp.path(), DEFAULT_MAX_PREVIEW_BYTES).unwrap();
        assert!(!content.is_binary);
        assert!(content.text.starts_with(&format!("Directory: {}", tmp.path().display())));
        assert!(content.text.contains("2 items"));
        assert!(content.text.contains("  [DIR] sub"));
        assert!(content.text.contains("  f.txt (5 bytes)"));
    }

    #[cfg(unix)]
    #[test]
    fn device_node_is_not_read() {
        let dev = Path::new("/dev/null");
        let content = load_preview(dev, 10).unwrap();
        assert!(!content.is_binary);
        assert_eq!(content.text, "Not a regular file: /dev/null");
    }

    #[test]
    fn missing_file_is_error() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            load_preview(&tmp.path().join("nope"), 10),
            Err(FsError::NotFound(_))
        ));
    }

    #[test]
    fn state_shows_binary_placeholder() {
        let mut state = PreviewState::new(true);
        state.set_content(
            PathBuf::from("/x"),
            PreviewContent {
                text: String::new(),
                is_binary: true,
            },
        );
        assert_eq!(state.lines, vec![BINARY_PLACEHOLDER.to_string()]);
    }

    #[test]
    fn hiding_clears_content() {
        let mut state = PreviewState::new(true);
        state.set_content(
            PathBuf::from("/x"),
            PreviewContent {
                text: "hi".into(),
                is_binary: false,
            },
        );
        assert!(!state.toggle());
        assert!(state.lines.is_empty());
        assert!(state.path.is_none());
        assert!(state.toggle());
    }
}
