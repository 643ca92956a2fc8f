// src/store.rs
//
// Report persistence: CSV datasets on disk, plus the directory scans the
// pipeline stages run on (saved pages, evidence documents, master files).

use std::{error::Error, fs, path::{Path, PathBuf}};

use crate::csv::{detect_headers, parse_rows, rows_to_string};
use crate::file::read_text_lossy;
use crate::params::MASTER_PREFIX;

pub struct Dataset {
    pub headers: Option<Vec<String>>,
    pub rows: Vec<Vec<String>>,
}

pub fn load_dataset(path: &Path) -> Result<Dataset, Box<dyn Error>> {
    let text = read_text_lossy(path)?;
    let (headers, rows) = detect_headers(parse_rows(&text));
    Ok(Dataset { headers, rows })
}

pub fn save_dataset(path: &Path, ds: &Dataset) -> Result<(), Box<dyn Error>> {
    fs::write(path, rows_to_string(&ds.headers, &ds.rows))?;
    Ok(())
}

/// Headerless single-column URL list, one URL per line; blanks skipped.
pub fn load_url_list(path: &Path) -> Result<Vec<String>, Box<dyn Error>> {
    let text = read_text_lossy(path)?;
    Ok(parse_rows(&text)
        .into_iter()
        .filter_map(|row| row.into_iter().next())
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty())
        .collect())
}

/// All `*.html` files in `dir`, as (filename, path), sorted by filename
/// so report order is stable across runs.
pub fn list_html_files(dir: &Path) -> Result<Vec<(String, PathBuf)>, Box<dyn Error>> {
    let mut out = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() { continue; }
        let Some(name) = path.file_name().and_then(|s| s.to_str()) else { continue };
        if !name.to_ascii_lowercase().ends_with(".html") { continue; }
        out.push((name.to_string(), path));
    }
    out.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(out)
}

/// All `master_*.csv` files in `dir`, sorted.
pub fn list_master_files(dir: &Path) -> Result<Vec<PathBuf>, Box<dyn Error>> {
    let mut out = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() { continue; }
        let Some(name) = path.file_name().and_then(|s| s.to_str()) else { continue };
        if name.starts_with(MASTER_PREFIX) && name.to_ascii_lowercase().ends_with(".csv") {
            out.push(path);
        }
    }
    out.sort();
    Ok(out)
}
