use std::path::Path;

/// Launch the platform handler for `path` without waiting for it.
///
/// Only a launch failure is reported; the handler's exit status is not.
pub fn open_path(path: &Path) -> std::io::Result<()> {
    open::that_detached(path)
}
