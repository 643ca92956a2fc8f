// src/params.rs
use std::path::PathBuf;

// Net config
pub const ADVISORY_URL_PREFIX: &str = "https://cert.europa.eu/publications/security-advisories/";
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/112.0.0.0 Safari/537.36";
pub const REQUEST_TIMEOUT_SECS: u64 = 30;
pub const REQUEST_PAUSE_MS: u64 = 3_000; // be polite

// Layout on disk
pub const DEFAULT_OUT_DIR: &str = "out";
pub const PAGES_SUBDIR: &str = "pages";
pub const EVIDENCE_SUBDIR: &str = "evidence";
pub const DEFAULT_URL_LIST: &str = "url.csv";
pub const ADVISORY_REPORT: &str = "advisories.csv";
pub const LINKS_REPORT: &str = "links.csv";
pub const EVIDENCE_REPORT: &str = "evidence.csv";
pub const MASTER_PREFIX: &str = "master_";

// Report text conventions
pub const NONE_SENTINEL: &str = "none";
pub const DUP_MARKER: char = '!';
pub const REPORT_DATE_FMT: &str = "%Y/%m/%d";
pub const PAGE_DATE_FMT: &str = "%d-%m-%Y";

// Reference links whose domain contains any of these are dropped.
pub const EXCLUDED_DOMAINS: &[&str] = &[
    "europa.eu",
    "linkedin.com",
    "github.com",
    "infosec.exchange",
    "facebook.com",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskKind {
    Fetch,    // url list -> saved advisory pages
    Extract,  // saved pages -> advisory CVE report
    Links,    // saved pages -> outbound reference link report
    Mirror,   // link report -> saved evidence documents
    Evidence, // saved evidence -> evidence CVE report
    Dedup,    // report -> report minus (from, CVE) duplicates
    Mark,     // master files -> losing duplicates marked in place
}

#[derive(Clone)]
pub struct Params {
    pub task: TaskKind,
    pub urls: PathBuf,              // url list for fetch
    pub pages_dir: PathBuf,         // saved advisory pages
    pub evidence_dir: PathBuf,      // mirrored evidence documents
    pub report: Option<PathBuf>,    // input report (mirror, dedup)
    pub out: Option<PathBuf>,       // output path; task-specific default
    pub master_dir: PathBuf,        // directory scanned for master_*.csv
    pub exclude_year: Option<String>, // drop CVE-<year>-* in evidence extraction
    pub pause_ms: u64,
}

impl Params {
    pub fn new(task: TaskKind) -> Self {
        Self {
            task,
            urls: PathBuf::from(DEFAULT_URL_LIST),
            pages_dir: PathBuf::from(DEFAULT_OUT_DIR).join(PAGES_SUBDIR),
            evidence_dir: PathBuf::from(DEFAULT_OUT_DIR).join(EVIDENCE_SUBDIR),
            report: None,
            out: None,
            master_dir: PathBuf::from(DEFAULT_OUT_DIR),
            exclude_year: None,
            pause_ms: REQUEST_PAUSE_MS,
        }
    }
}
