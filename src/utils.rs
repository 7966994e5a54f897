use std::{
    fs::{create_dir_all, read_to_string, write},
    path::Path,
};

use anyhow::{ensure, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use serde::{de::DeserializeOwned, Serialize};

pub fn progress_bar(len: u64) -> ProgressBar {
    ProgressBar::new(len).with_style(
        ProgressStyle::with_template("[{elapsed_precise}] {human_pos}/{human_len} {percent}% ({eta})")
            .expect("hardcoded"),
    )
}

/// Fails with a descriptive error when a required input is missing.
pub fn require(path: &Path) -> Result<()> {
    ensure!(path.exists(), "{} not found", path.display());
    Ok(())
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw =
        read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Pretty-prints with a trailing newline, non-ASCII left as is.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|x| !x.as_os_str().is_empty()) {
        create_dir_all(parent)?;
    }
    let mut output = serde_json::to_string_pretty(value)?;
    output.push('\n');
    write(path, output).with_context(|| format!("Failed to write {}", path.display()))
}

pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|x| x.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
