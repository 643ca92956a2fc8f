// src/fetch.rs
//
// URL mirroring: advisory pages into the pages dir, linked evidence
// documents into the evidence dir. One request at a time with a polite
// pause; a failed URL is logged and skipped, never fatal to the batch.

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;

use crate::core::sanitize::sanitize_stem;
use crate::file::{ensure_directory, resolve_unique_filename};
use crate::net;
use crate::progress::Progress;

pub struct MirrorSummary {
    pub saved: Vec<PathBuf>,
    pub failed: Vec<String>,
}

/// Local stem for an advisory URL: the last path segment, truncated to
/// its last 8 characters ("…/security-advisories/2022-001/" -> "2022-001").
pub fn page_stem(url: &str) -> Option<String> {
    let last = url.trim_end_matches('/').rsplit('/').next()?;
    if last.len() < 2 {
        return None;
    }
    let n = last.chars().count();
    let tail: String = last.chars().skip(n.saturating_sub(8)).collect();
    Some(sanitize_stem(&tail, "page"))
}

/// Evidence documents keep the linked extension; everything that isn't
/// a PDF is saved as HTML.
pub fn evidence_ext(url: &str) -> &'static str {
    if url.to_ascii_lowercase().ends_with(".pdf") { "pdf" } else { "html" }
}

/// Download advisory pages into `dir`, one file per URL.
pub fn mirror_pages(
    client: &Client,
    urls: &[String],
    dir: &Path,
    pause_ms: u64,
    progress: &mut dyn Progress,
) -> Result<MirrorSummary, Box<dyn Error>> {
    ensure_directory(dir)?;
    progress.begin(urls.len());

    let mut summary = MirrorSummary { saved: Vec::new(), failed: Vec::new() };
    for url in urls {
        let Some(stem) = page_stem(url) else {
            progress.item_failed(url, "URL too short to derive a filename");
            summary.failed.push(url.clone());
            continue;
        };
        match net::http_get(client, url) {
            Ok(body) => {
                let path = resolve_unique_filename(dir, &stem, "html");
                fs::write(&path, &body)?;
                progress.item_done(url, &path);
                summary.saved.push(path);
            }
            Err(e) => {
                loge!("fetch {url}: {e}");
                progress.item_failed(url, &e.to_string());
                summary.failed.push(url.clone());
            }
        }
        thread::sleep(Duration::from_millis(pause_ms)); // be polite
    }

    progress.finish();
    Ok(summary)
}

/// Download evidence documents into `dir`; `entries` are (label, url)
/// pairs where the label (the report's No column) names the file.
pub fn mirror_evidence(
    client: &Client,
    entries: &[(String, String)],
    dir: &Path,
    pause_ms: u64,
    progress: &mut dyn Progress,
) -> Result<MirrorSummary, Box<dyn Error>> {
    ensure_directory(dir)?;
    progress.begin(entries.len());

    let mut summary = MirrorSummary { saved: Vec::new(), failed: Vec::new() };
    for (label, url) in entries {
        if url.is_empty() {
            progress.item_failed(label, "empty URL, skipped");
            continue;
        }
        match net::http_get(client, url) {
            Ok(body) => {
                let stem = sanitize_stem(label, "doc");
                let path = resolve_unique_filename(dir, &stem, evidence_ext(url));
                fs::write(&path, &body)?;
                progress.item_done(url, &path);
                summary.saved.push(path);
            }
            Err(e) => {
                loge!("mirror {url}: {e}");
                progress.item_failed(url, &e.to_string());
                summary.failed.push(url.clone());
            }
        }
        thread::sleep(Duration::from_millis(pause_ms));
    }

    progress.finish();
    Ok(summary)
}
