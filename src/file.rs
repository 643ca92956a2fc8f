// src/file.rs

use std::{
    fs,
    path::{Path, PathBuf},
};

/// Read a file that may not be valid UTF-8 (mirrored evidence pages come
/// in whatever encoding the vendor used); bad bytes are replaced, the
/// batch never aborts on them.
pub fn read_text_lossy(path: &Path) -> Result<String, Box<dyn std::error::Error>> {
    let bytes = fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

pub fn ensure_directory(dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if dir.exists() && !dir.is_dir() {
        return Err(format!("Path exists but is not a directory: {}", dir.display()).into());
    }
    if !dir.exists() { fs::create_dir_all(dir)?; }
    Ok(())
}

pub fn looks_like_dir_hint(p: &Path) -> bool {
    let s = p.to_string_lossy();
    s.ends_with('/') || s.ends_with('\\')
}

/// Resolve `-o` for single-file outputs: empty -> default name, a
/// directory (existing or hinted) -> default name inside it.
pub fn resolve_out_path(
    out: &Option<PathBuf>,
    default_dir: &Path,
    default_filename: &str,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let hint = match out {
        None => default_dir.join(default_filename),
        Some(p) => p.clone(),
    };
    if hint.is_dir() || looks_like_dir_hint(&hint) {
        ensure_directory(&hint)?;
        return Ok(hint.join(default_filename));
    }
    if let Some(parent) = hint.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory(parent)?;
        }
    }
    Ok(hint)
}

/// First free "<stem>.<ext>" in `dir`; taken names get "_N" counters,
/// N starting at 1. Checks the filesystem, so re-runs keep prior files.
pub fn resolve_unique_filename(dir: &Path, stem: &str, ext: &str) -> PathBuf {
    let mut path = dir.join(format!("{stem}.{ext}"));
    let mut counter = 1usize;
    while path.exists() {
        path = dir.join(format!("{stem}_{counter}.{ext}"));
        counter += 1;
    }
    path
}
