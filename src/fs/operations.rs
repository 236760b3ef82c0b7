use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::error::FsError;

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> FsError + '_ {
    move |e| FsError::from_io(path, e)
}

/// Whether anything (including a dangling symlink) occupies `path`.
fn occupied(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

fn file_name(path: &Path) -> Result<&std::ffi::OsStr, FsError> {
    path.file_name()
        .ok_or_else(|| FsError::InvalidName(path.display().to_string()))
}

/// Check that a single path component is usable as a new entry name.
pub fn validate_name(name: &str) -> Result<(), FsError> {
    if name.is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains('\0')
        || (cfg!(windows) && name.contains('\\'))
    {
        return Err(FsError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Whether `dest_dir` is `src` or lies beneath it.
fn is_within(dest_dir: &Path, src: &Path) -> bool {
    if dest_dir.starts_with(src) {
        return true;
    }
    match (fs::canonicalize(dest_dir), fs::canonicalize(src)) {
        (Ok(dest), Ok(src)) => dest.starts_with(src),
        _ => false,
    }
}

/// Resolve the destination for placing `src` into `dest_dir`, refusing
/// existing targets and directory-into-own-subtree transfers.
fn transfer_target(src: &Path, dest_dir: &Path) -> Result<PathBuf, FsError> {
    let meta = fs::symlink_metadata(src).map_err(io_err(src))?;
    let dest = dest_dir.join(file_name(src)?);
    if occupied(&dest) {
        return Err(FsError::AlreadyExists(dest));
    }
    if meta.is_dir() && is_within(dest_dir, src) {
        return Err(FsError::IntoItself(src.to_path_buf()));
    }
    Ok(dest)
}

/// Copy a file or directory into `dest_dir`, keeping its name.
///
/// Fails with `AlreadyExists` if the destination is taken. Nothing inside a
/// copied directory is ever overwritten. Returns the new path.
pub fn copy_item(src: &Path, dest_dir: &Path) -> Result<PathBuf, FsError> {
    let dest = transfer_target(src, dest_dir)?;
    copy_any(src, &dest)?;
    Ok(dest)
}

fn copy_any(src: &Path, dest: &Path) -> Result<(), FsError> {
    let meta = fs::symlink_metadata(src).map_err(io_err(src))?;
    if meta.file_type().is_symlink() {
        copy_symlink(src, dest)
    } else if meta.is_dir() {
        copy_dir_recursive(src, dest)
    } else {
        copy_file(src, dest)
    }
}

fn copy_file(src: &Path, dest: &Path) -> Result<(), FsError> {
    if occupied(dest) {
        return Err(FsError::AlreadyExists(dest.to_path_buf()));
    }
    fs::copy(src, dest).map_err(io_err(src))?;
    Ok(())
}

#[cfg(unix)]
fn copy_symlink(src: &Path, dest: &Path) -> Result<(), FsError> {
    let target = fs::read_link(src).map_err(io_err(src))?;
    std::os::unix::fs::symlink(target, dest).map_err(io_err(dest))
}

#[cfg(not(unix))]
fn copy_symlink(src: &Path, dest: &Path) -> Result<(), FsError> {
    if src.is_dir() {
        copy_dir_recursive(src, dest)
    } else {
        copy_file(src, dest)
    }
}

fn copy_dir_recursive(src: &Path, dest: &Path) -> Result<(), FsError> {
    fs::create_dir_all(dest).map_err(io_err(dest))?;
    for entry in fs::read_dir(src).map_err(io_err(src))? {
        let entry = entry.map_err(io_err(src))?;
        copy_any(&entry.path(), &dest.join(entry.file_name()))?;
    }
    Ok(())
}

/// Move a file or directory into `dest_dir`, keeping its name.
///
/// Uses `fs::rename` first. Falls back to copy + delete only when rename
/// fails because source and destination are on different devices; any
/// other rename error is returned as is. Returns the new path.
pub fn move_item(src: &Path, dest_dir: &Path) -> Result<PathBuf, FsError> {
    let dest = transfer_target(src, dest_dir)?;
    match fs::rename(src, &dest) {
        Ok(()) => return Ok(dest),
        Err(e) if is_cross_device(&e) => {
            tracing::debug!(src = %src.display(), "rename crosses devices, copying");
        }
        Err(e) => return Err(FsError::from_io(src, e)),
    }
    copy_any(src, &dest)?;
    delete(src)?;
    Ok(dest)
}

/// `EXDEV` on unix, `ERROR_NOT_SAME_DEVICE` on windows.
fn is_cross_device(e: &std::io::Error) -> bool {
    const CROSS_DEVICE: i32 = if cfg!(windows) { 17 } else { 18 };
    e.raw_os_error() == Some(CROSS_DEVICE)
}

/// Delete a file or directory. Directories are removed recursively; a
/// symlink is removed without touching its target.
pub fn delete(path: &Path) -> Result<(), FsError> {
    let meta = fs::symlink_metadata(path).map_err(io_err(path))?;
    if meta.is_dir() {
        fs::remove_dir_all(path).map_err(io_err(path))
    } else {
        fs::remove_file(path).map_err(io_err(path))
    }
}

/// Rename `path` within its parent directory. Returns the new path.
pub fn rename(path: &Path, new_name: &str) -> Result<PathBuf, FsError> {
    validate_name(new_name)?;
    let parent = path
        .parent()
        .ok_or_else(|| FsError::InvalidName(path.display().to_string()))?;
    let target = parent.join(new_name);
    if target == path {
        return Ok(target);
    }
    if occupied(&target) {
        return Err(FsError::AlreadyExists(target));
    }
    fs::rename(path, &target).map_err(io_err(path))?;
    Ok(target)
}

/// Create `name` under `parent`, including intermediate directories
/// (`a/b` is allowed). Returns the created path.
pub fn make_dir(parent: &Path, name: &str) -> Result<PathBuf, FsError> {
    let relative = Path::new(name);
    let valid = !name.is_empty()
        && relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
    if !valid {
        return Err(FsError::InvalidName(name.to_string()));
    }
    let target = parent.join(relative);
    fs::create_dir_all(&target).map_err(io_err(&target))?;
    Ok(target)
}
