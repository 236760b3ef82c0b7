use std::fs;
use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;

use crate::error::FsError;

/// Name of the synthetic parent-navigation entry.
pub const PARENT_ENTRY: &str = "..";

/// One filesystem item inside a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    /// Size in bytes. Meaningless for directories.
    pub size: u64,
    pub modified: Option<SystemTime>,
    /// True for directories, including symlinks that resolve to one.
    pub is_dir: bool,
    pub is_symlink: bool,
    /// Unix permission bits (0 on platforms without them).
    pub mode: u32,
}

impl Entry {
    /// The synthetic `..` entry prepended to non-root listings.
    pub fn parent() -> Self {
        Self {
            name: PARENT_ENTRY.to_string(),
            size: 0,
            modified: None,
            is_dir: true,
            is_symlink: false,
            mode: 0,
        }
    }

    pub fn is_parent(&self) -> bool {
        self.name == PARENT_ENTRY
    }

    /// `drwxr-xr-x` style rendering of the permission bits.
    pub fn permissions_string(&self) -> String {
        let mut out = String::with_capacity(10);
        out.push(if self.is_symlink {
            'l'
        } else if self.is_dir {
            'd'
        } else {
            '-'
        });
        const FLAGS: [(u32, char); 9] = [
            (0o400, 'r'),
            (0o200, 'w'),
            (0o100, 'x'),
            (0o040, 'r'),
            (0o020, 'w'),
            (0o010, 'x'),
            (0o004, 'r'),
            (0o002, 'w'),
            (0o001, 'x'),
        ];
        for (bit, ch) in FLAGS {
            out.push(if self.mode & bit != 0 { ch } else { '-' });
        }
        out
    }
}

#[cfg(unix)]
fn mode_bits(meta: &fs::Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    meta.permissions().mode() & 0o7777
}

#[cfg(not(unix))]
fn mode_bits(meta: &fs::Metadata) -> u32 {
    if meta.permissions().readonly() {
        0o444
    } else {
        0o644
    }
}

/// Read `dir` and return its entries: `..` first (unless `dir` is a root),
/// then directories, then files, each group sorted case-insensitively.
pub fn list_directory(dir: &Path) -> Result<Vec<Entry>, FsError> {
    let read = fs::read_dir(dir).map_err(|e| FsError::from_io(dir, e))?;

    let mut entries = Vec::new();
    for item in read {
        let item = item.map_err(|e| FsError::from_io(dir, e))?;
        let path = item.path();
        let Ok(link_meta) = fs::symlink_metadata(&path) else {
            continue;
        };
        let is_symlink = link_meta.file_type().is_symlink();
        // Follow links so symlinked directories are navigable; broken links
        // fall back to the link's own metadata and list as files.
        let meta = if is_symlink {
            fs::metadata(&path).unwrap_or(link_meta)
        } else {
            link_meta
        };
        entries.push(Entry {
            name: item.file_name().to_string_lossy().into_owned(),
            size: meta.len(),
            modified: meta.modified().ok(),
            is_dir: meta.is_dir(),
            is_symlink,
            mode: mode_bits(&meta),
        });
    }

    sort_entries(&mut entries);

    if dir.parent().is_some() {
        entries.insert(0, Entry::parent());
    }
    Ok(entries)
}

/// Directories before files, case-insensitive ascending within each group.
pub fn sort_entries(entries: &mut [Entry]) {
    entries.sort_by(|a, b| {
        b.is_dir
            .cmp(&a.is_dir)
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
            .then_with(|| a.name.cmp(&b.name))
    });
}

/// Lexical normalization: removes `.` and resolves `..` against preceding
/// components without touching the filesystem.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_test_dir() -> TempDir {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("beta")).unwrap();
        fs::create_dir(tmp.path().join("Alpha")).unwrap();
        fs::write(tmp.path().join("zeta.txt"), "zzz").unwrap();
        fs::write(tmp.path().join("Apple.md"), "a").unwrap();
        fs::write(tmp.path().join("banana.rs"), "fn main() {}").unwrap();
        tmp
    }

    fn names(entries: &[Entry]) -> Vec<&str> {
        entries.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn listing_sorts_dirs_first_case_insensitive() {
        let tmp = setup_test_dir();
        let entries = list_directory(tmp.path()).unwrap();
        assert_eq!(
            names(&entries),
            vec!["..", "Alpha", "beta", "Apple.md", "banana.rs", "zeta.txt"]
        );
    }

    #[test]
    fn listing_reports_sizes_and_flags() {
        let tmp = setup_test_dir();
        let entries = list_directory(tmp.path()).unwrap();
        let zeta = entries.iter().find(|e| e.name == "zeta.txt").unwrap();
        assert_eq!(zeta.size, 3);
        assert!(!zeta.is_dir);
        assert!(zeta.modified.is_some());
        let alpha = entries.iter().find(|e| e.name == "Alpha").unwrap();
        assert!(alpha.is_dir);
        assert!(!alpha.is_symlink);
    }

    #[test]
    fn root_listing_has_no_parent_entry() {
        let root = Path::new("/");
        let entries = list_directory(root).unwrap();
        assert!(entries.iter().all(|e| !e.is_parent()));
    }

    #[test]
    fn empty_dir_lists_only_parent() {
        let tmp = TempDir::new().unwrap();
        let entries = list_directory(tmp.path()).unwrap();
        assert_eq!(names(&entries), vec![".."]);
        assert!(entries[0].is_parent());
    }

    #[test]
    fn missing_dir_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let err = list_directory(&tmp.path().join("nope")).unwrap_err();
        assert!(matches!(err, FsError::NotFound(_)));
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_dir_is_navigable() {
        let tmp = setup_test_dir();
        std::os::unix::fs::symlink(tmp.path().join("beta"), tmp.path().join("link")).unwrap();
        std::os::unix::fs::symlink(tmp.path().join("gone"), tmp.path().join("broken")).unwrap();
        let entries = list_directory(tmp.path()).unwrap();
        let link = entries.iter().find(|e| e.name == "link").unwrap();
        assert!(link.is_dir);
        assert!(link.is_symlink);
        let broken = entries.iter().find(|e| e.name == "broken").unwrap();
        assert!(!broken.is_dir);
        assert!(broken.is_symlink);
    }

    #[test]
    fn permissions_string_formats_bits() {
        let entry = Entry {
            name: "x".into(),
            size: 0,
            modified: None,
            is_dir: true,
            is_symlink: false,
            mode: 0o755,
        };
        assert_eq!(entry.permissions_string(), "drwxr-xr-x");
    }

    #[test]
    fn normalize_strips_dot_components() {
        assert_eq!(normalize(Path::new("/a/./b/../c")), PathBuf::from("/a/c"));
        assert_eq!(normalize(Path::new("/..")), PathBuf::from("/"));
        assert_eq!(normalize(Path::new("a/..")), PathBuf::from("."));
    }
}
