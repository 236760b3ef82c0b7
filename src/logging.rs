use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Install the global file logger.
///
/// Logs never go to the terminal, which is in raw mode on the alternate
/// screen. `RUST_LOG` wins over `level`; `level = "off"` disables logging.
/// Failure to open the file is returned so the caller can warn before the
/// terminal is taken over.
pub fn init(level: &str, file: &Path) -> std::io::Result<()> {
    if level.eq_ignore_ascii_case("off") && std::env::var_os("RUST_LOG").is_none() {
        return Ok(());
    }

    if let Some(parent) = file.parent() {
        fs::create_dir_all(parent)?;
    }
    let log_file = OpenOptions::new().create(true).append(true).open(file)?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    // A second init (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .with_target(false)
        .with_env_filter(filter)
        .try_init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn creates_log_file_and_parent_dirs() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("nested").join("dpf.log");
        init("debug", &file).unwrap();
        assert!(file.exists());
    }

    #[test]
    fn off_level_skips_file() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("dpf.log");
        init("off", &file).unwrap();
        assert!(!file.exists());
    }
}
