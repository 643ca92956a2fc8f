// src/runner.rs
//
// One function per pipeline stage. Stages are batch and synchronous:
// read everything, transform in memory, write everything. Fetch/mirror
// are the only stages that touch the network.

use std::error::Error;
use std::path::{Path, PathBuf};

use crate::{
    dedup, fetch, net,
    file::resolve_out_path,
    params::{
        ADVISORY_REPORT, DEFAULT_OUT_DIR, DUP_MARKER, EVIDENCE_REPORT, LINKS_REPORT, NONE_SENTINEL,
        Params, TaskKind,
    },
    progress::Progress,
    record::{ColumnMap, REPORT_HEADERS, Record, cve_to_cell, date_to_cell},
    specs::{advisory, evidence, links},
    store::{self, Dataset},
};

/// Summary of what was produced.
pub struct RunSummary {
    pub files_written: Vec<PathBuf>,
}

/// Top-level runner: dispatch on task kind and run.
pub fn run(params: &Params, progress: &mut dyn Progress) -> Result<RunSummary, Box<dyn Error>> {
    match params.task {
        TaskKind::Fetch => fetch_pages(params, progress),
        TaskKind::Extract => extract_advisories(params, progress),
        TaskKind::Links => extract_links(params, progress),
        TaskKind::Mirror => mirror_evidence_docs(params, progress),
        TaskKind::Evidence => extract_evidence(params, progress),
        TaskKind::Dedup => dedup_report(params, progress),
        TaskKind::Mark => mark_masters(params, progress),
    }
}

/* ---------------- fetch: url list -> saved pages ---------------- */

fn fetch_pages(params: &Params, progress: &mut dyn Progress) -> Result<RunSummary, Box<dyn Error>> {
    let urls = store::load_url_list(&params.urls)?;
    progress.log(&format!("Loaded {} URLs from {}", urls.len(), params.urls.display()));
    logf!("fetch: {} URLs", urls.len());

    let client = net::client()?;
    let summary = fetch::mirror_pages(&client, &urls, &params.pages_dir, params.pause_ms, progress)?;

    report_failures(&summary.failed, progress);
    Ok(RunSummary { files_written: summary.saved })
}

/* ---------------- extract: saved pages -> advisory report ---------------- */

fn extract_advisories(
    params: &Params,
    progress: &mut dyn Progress,
) -> Result<RunSummary, Box<dyn Error>> {
    let files = store::list_html_files(&params.pages_dir)?;
    progress.begin(files.len());

    // Files come back sorted by name, so records are already in report
    // order; seq is assigned once the full collection is assembled.
    let mut records: Vec<Record> = Vec::new();
    for (name, path) in &files {
        let doc = crate::file::read_text_lossy(path)?;
        let bundle = advisory::extract(&doc);
        records.extend(advisory::to_records(&bundle, name));
        progress.item_done(name, path);
    }
    for (i, r) in records.iter_mut().enumerate() {
        r.seq = i;
    }

    let rows: Vec<Vec<String>> = records
        .iter()
        .enumerate()
        .map(|(i, r)| r.to_row(i + 1))
        .collect();
    let ds = Dataset {
        headers: Some(REPORT_HEADERS.map(String::from).to_vec()),
        rows,
    };

    let out = resolve_out_path(&params.out, Path::new(DEFAULT_OUT_DIR), ADVISORY_REPORT)?;
    store::save_dataset(&out, &ds)?;

    logf!("extract: {} records from {} pages -> {}", records.len(), files.len(), out.display());
    progress.log(&format!("Wrote {} records to {}", records.len(), out.display()));
    Ok(RunSummary { files_written: vec![out] })
}

/* ---------------- links: saved pages -> reference link report ---------------- */

fn extract_links(
    params: &Params,
    progress: &mut dyn Progress,
) -> Result<RunSummary, Box<dyn Error>> {
    let files = store::list_html_files(&params.pages_dir)?;
    progress.begin(files.len());

    let mut rows: Vec<Vec<String>> = Vec::new();
    for (name, path) in &files {
        let doc = crate::file::read_text_lossy(path)?;
        let bundle = links::extract(&doc);

        // A page with no surviving links still gets one sentinel row, so
        // every source file stays visible in the report.
        let urls = if bundle.urls.is_empty() {
            vec![s!(NONE_SENTINEL)]
        } else {
            bundle.urls
        };
        for url in urls {
            rows.push(vec![
                s!(), // No, assigned below
                date_to_cell(bundle.date),
                bundle.title.clone(),
                name.clone(),
                url,
            ]);
        }
        progress.item_done(name, path);
    }
    for (i, row) in rows.iter_mut().enumerate() {
        row[0] = (i + 1).to_string();
    }

    let ds = Dataset {
        headers: Some(["No", "date", "title", "from", "url"].map(String::from).to_vec()),
        rows,
    };
    let out = resolve_out_path(&params.out, Path::new(DEFAULT_OUT_DIR), LINKS_REPORT)?;
    store::save_dataset(&out, &ds)?;

    logf!("links: {} rows -> {}", ds.rows.len(), out.display());
    progress.log(&format!("Wrote {} link rows to {}", ds.rows.len(), out.display()));
    Ok(RunSummary { files_written: vec![out] })
}

/* ---------------- mirror: link report -> saved evidence ---------------- */

fn mirror_evidence_docs(
    params: &Params,
    progress: &mut dyn Progress,
) -> Result<RunSummary, Box<dyn Error>> {
    let report = match &params.report {
        Some(p) => p.clone(),
        None => PathBuf::from(DEFAULT_OUT_DIR).join(LINKS_REPORT),
    };
    let ds = store::load_dataset(&report)?;

    let url_ix = ds
        .headers
        .as_ref()
        .and_then(|h| h.iter().position(|c| c.eq_ignore_ascii_case("url")))
        .ok_or_else(|| format!("{}: no url column", report.display()))?;

    let entries: Vec<(String, String)> = ds
        .rows
        .iter()
        .map(|row| {
            let label = row.first().cloned().unwrap_or_default();
            let url = row.get(url_ix).cloned().unwrap_or_default();
            let url = if url == NONE_SENTINEL { s!() } else { url };
            (label, url)
        })
        .collect();

    let client = net::client()?;
    let summary =
        fetch::mirror_evidence(&client, &entries, &params.evidence_dir, params.pause_ms, progress)?;

    report_failures(&summary.failed, progress);
    Ok(RunSummary { files_written: summary.saved })
}

/* ---------------- evidence: saved evidence -> CVE report ---------------- */

fn extract_evidence(
    params: &Params,
    progress: &mut dyn Progress,
) -> Result<RunSummary, Box<dyn Error>> {
    let files = store::list_html_files(&params.evidence_dir)?;
    progress.begin(files.len());

    let mut rows: Vec<Vec<String>> = Vec::new();
    for (name, path) in &files {
        let doc = crate::file::read_text_lossy(path)?;
        let cves = evidence::extract_cves(&doc, params.exclude_year.as_deref());
        let cves = if cves.is_empty() { vec![s!(NONE_SENTINEL)] } else { cves };
        for cve in cves {
            rows.push(vec![s!(), cve, name.clone()]);
        }
        progress.item_done(name, path);
    }
    for (i, row) in rows.iter_mut().enumerate() {
        row[0] = (i + 1).to_string();
    }

    let ds = Dataset {
        headers: Some(["No", "CVE", "from"].map(String::from).to_vec()),
        rows,
    };
    let out = resolve_out_path(&params.out, Path::new(DEFAULT_OUT_DIR), EVIDENCE_REPORT)?;
    store::save_dataset(&out, &ds)?;

    logf!("evidence: {} rows -> {}", ds.rows.len(), out.display());
    progress.log(&format!("Wrote {} evidence rows to {}", ds.rows.len(), out.display()));
    Ok(RunSummary { files_written: vec![out] })
}

/* ---------------- dedup: discard (from, CVE) duplicates ---------------- */

fn dedup_report(params: &Params, progress: &mut dyn Progress) -> Result<RunSummary, Box<dyn Error>> {
    let report = params
        .report
        .clone()
        .ok_or("dedup needs --report <file>")?;
    let ds = store::load_dataset(&report)?;

    let map = ColumnMap::from_headers(ds.headers.as_deref());
    let records: Vec<Record> = ds
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| Record::from_row_with(row, i, &map))
        .collect();
    let (canonical, duplicates) = dedup::resolve_discard(records);

    for dup in &duplicates {
        let line = format!(
            "Dropped duplicate: from={} CVE={} (row {})",
            dup.source,
            cve_to_cell(&dup.cve),
            dup.seq + 1
        );
        logf!("{line}");
        progress.log(&line);
    }
    progress.log(&format!("Dropped {} duplicate rows", duplicates.len()));

    // Surviving rows keep all their original columns; only the No column
    // is reassigned when the report carries one.
    let renumber = ds
        .headers
        .as_ref()
        .map(|h| !h.is_empty() && h[0].eq_ignore_ascii_case("no"))
        .unwrap_or(false);
    let rows: Vec<Vec<String>> = canonical
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let mut row = ds.rows[r.seq].clone();
            if renumber && !row.is_empty() {
                row[0] = (i + 1).to_string();
            }
            row
        })
        .collect();

    let default_name = format!(
        "deduped_{}",
        report.file_name().map(|s| s.to_string_lossy().into_owned()).unwrap_or_else(|| s!("report.csv"))
    );
    let default_dir = report.parent().filter(|p| !p.as_os_str().is_empty());
    let out = resolve_out_path(
        &params.out,
        default_dir.unwrap_or(Path::new(DEFAULT_OUT_DIR)),
        &default_name,
    )?;
    store::save_dataset(&out, &Dataset { headers: ds.headers.clone(), rows })?;

    logf!("dedup: kept {} of {} rows -> {}", canonical.len(), ds.rows.len(), out.display());
    Ok(RunSummary { files_written: vec![out] })
}

/* ---------------- mark: flag duplicates in master files ---------------- */

fn mark_masters(params: &Params, progress: &mut dyn Progress) -> Result<RunSummary, Box<dyn Error>> {
    let files = store::list_master_files(&params.master_dir)?;
    if files.is_empty() {
        progress.log(&format!("No master files under {}", params.master_dir.display()));
        return Ok(RunSummary { files_written: Vec::new() });
    }
    progress.begin(files.len());

    let mut total_losers = 0usize;
    let mut written = Vec::with_capacity(files.len());
    for path in files {
        let mut ds = store::load_dataset(&path)?;
        let map = ColumnMap::from_headers(ds.headers.as_deref());
        let mut records: Vec<Record> = ds
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| Record::from_row_with(row, i, &map))
            .collect();

        let losers = dedup::resolve_mark(&mut records);
        total_losers += losers;

        // Write only freshly marked CVE cells back; every other cell of
        // every row stays exactly as read.
        for (row, rec) in ds.rows.iter_mut().zip(&records) {
            let cell = cve_to_cell(&rec.cve);
            if map.cve < row.len() && row[map.cve] != cell && cell.ends_with(DUP_MARKER) {
                row[map.cve] = cell;
            }
        }
        store::save_dataset(&path, &ds)?;

        let label = path.file_name().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
        progress.item_done(&label, &path);
        logf!("mark: {label}: {losers} losing duplicates");
        written.push(path);
    }

    if total_losers > 0 {
        progress.log(&format!("Marked {total_losers} losing duplicates in total"));
    } else {
        progress.log("No duplicates found");
    }
    Ok(RunSummary { files_written: written })
}

/* ---------------- shared ---------------- */

fn report_failures(failed: &[String], progress: &mut dyn Progress) {
    if failed.is_empty() {
        progress.log("All downloads succeeded");
        return;
    }
    progress.log(&format!("{} downloads failed:", failed.len()));
    for url in failed {
        progress.log(&format!("  {url}"));
    }
}
