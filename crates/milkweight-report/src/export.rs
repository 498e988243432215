use std::io::Write;
use std::path::{Path, PathBuf};

use milkweight_core::{MilkError, Result};
use tracing::info;

/// Write rendered report `text` to `output`, or to stdout when `None`.
pub fn export(text: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => save_to(text, &expand_home(path)),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.flush()?;
            Ok(())
        }
    }
}

/// Atomically write `text` to `path`, creating parent directories if needed.
pub fn save_to(text: &str, path: &Path) -> Result<()> {
    let write_err = |source| MilkError::FileWrite {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }

    // Write to a sibling temp file then rename over the target.
    let mut tmp_name = path.as_os_str().to_os_string();
    tmp_name.push(".tmp");
    let tmp = PathBuf::from(tmp_name);
    std::fs::write(&tmp, text).map_err(write_err)?;
    if let Err(source) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(write_err(source));
    }

    info!("Report written to {}", path.display());
    Ok(())
}

/// Replace a leading `~` with the user's home directory.
pub fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match dirs::home_dir() {
        Some(home) => home.join(rest),
        None => path.to_path_buf(),
    }
}
