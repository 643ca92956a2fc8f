// src/specs/advisory.rs
//
// One saved advisory page -> title, publication date, CVE set.
//
// Ground truth on the page:
// - <title> holds the advisory name.
// - <time class="text-grey"> holds "dd-mm-YYYY hh:mm"; only the date
//   part is kept.
// - CVE identifiers appear in running text anywhere in the document.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::core::html::{inner_after_open_tag, next_tag_block_ci, slice_between_ci, strip_tags};
use crate::core::sanitize::{normalize_entities, normalize_ws};
use crate::params::{ADVISORY_URL_PREFIX, PAGE_DATE_FMT};
use crate::record::Record;
use crate::specs::cve_regex;

pub struct AdvisoryBundle {
    /// Page title; empty when the page has none.
    pub title: String,
    /// Publication date; `None` when absent or unparseable.
    pub date: Option<NaiveDate>,
    /// Sorted, de-duplicated CVE identifiers.
    pub cves: Vec<String>,
}

pub fn extract(doc: &str) -> AdvisoryBundle {
    AdvisoryBundle {
        title: extract_title(doc).unwrap_or_default(),
        date: extract_date(doc),
        cves: extract_cves(doc),
    }
}

fn extract_title(doc: &str) -> Option<String> {
    let inner = slice_between_ci(doc, "<title", "</title>")?;
    let clean = normalize_ws(&strip_tags(normalize_entities(inner)));
    if clean.is_empty() { None } else { Some(clean) }
}

/// First `<time>` block carrying class "text-grey". The cell reads like
/// "06-01-2022 10:30"; only the leading date token matters.
fn extract_date(doc: &str) -> Option<NaiveDate> {
    let mut pos = 0usize;
    while let Some((ts, te)) = next_tag_block_ci(doc, "<time", "</time>", pos) {
        let block = &doc[ts..te];
        pos = te;

        let open_end = block.find('>').unwrap_or(block.len());
        if !block[..open_end].to_ascii_lowercase().contains("text-grey") {
            continue;
        }

        let text = strip_tags(normalize_entities(&inner_after_open_tag(block)));
        let date_str = text.split_whitespace().next().unwrap_or("");
        return NaiveDate::parse_from_str(date_str, PAGE_DATE_FMT).ok();
    }
    None
}

fn extract_cves(doc: &str) -> Vec<String> {
    let set: BTreeSet<String> = cve_regex()
        .find_iter(doc)
        .map(|m| m.as_str().to_string())
        .collect();
    set.into_iter().collect()
}

/// Advisory URL derived from the saved filename, e.g. "2022-001.html" ->
/// "https://cert.europa.eu/publications/security-advisories/2022-001/".
pub fn advisory_url(filename: &str) -> String {
    let stem = filename.rsplit_once('.').map(|(s, _)| s).unwrap_or(filename);
    format!("{ADVISORY_URL_PREFIX}{stem}/")
}

/// Expand one page's bundle into report records, one per CVE; a page
/// naming no CVE still yields a single sentinel-CVE record. `seq` is
/// assigned later, once the whole report is assembled and sorted.
pub fn to_records(bundle: &AdvisoryBundle, filename: &str) -> Vec<Record> {
    let url = advisory_url(filename);
    let cves: Vec<Option<String>> = if bundle.cves.is_empty() {
        vec![None]
    } else {
        bundle.cves.iter().cloned().map(Some).collect()
    };

    cves.into_iter()
        .map(|cve| Record {
            seq: 0,
            date: bundle.date,
            cve,
            title: bundle.title.clone(),
            source: s!(filename),
            url: url.clone(),
        })
        .collect()
}
