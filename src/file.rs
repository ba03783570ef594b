// src/file.rs

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::errors::{Error, Result};

pub fn ensure_directory(dir: &Path) -> Result<()> {
    if dir.exists() && !dir.is_dir() {
        return Err(Error::Configuration(format!(
            "Path exists but is not a directory: {}",
            dir.display()
        )));
    }
    if !dir.exists() { fs::create_dir_all(dir)?; }
    Ok(())
}

/// Ensure the parent directory of `path` exists (no-op for bare file names).
pub fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory(parent)?;
        }
    }
    Ok(())
}

/// Copy `src` into `dir` under `name`, creating `dir` as needed.
/// Returns the destination path.
pub fn copy_into(src: &Path, dir: &Path, name: &str) -> Result<PathBuf> {
    ensure_directory(dir)?;
    let dest = dir.join(name);
    fs::copy(src, &dest)?;
    Ok(dest)
}

/// Sorted names of the immediate entries of `dir` matching `keep`.
pub fn sorted_entries(dir: &Path, keep: impl Fn(&Path) -> bool) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !keep(&path) { continue; }
        if let Some(name) = path.file_name().and_then(|s| s.to_str()) {
            names.push(s!(name));
        }
    }
    names.sort_unstable();
    Ok(names)
}
