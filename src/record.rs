// src/record.rs
//
// The unit of report data: one CVE sighting in one saved document.
// CSV column order is fixed: [No, date, CVE, title, from, url]. The No
// column is a 1-based output position assigned at write time and never
// stored on the record itself.

use chrono::NaiveDate;

use crate::params::{NONE_SENTINEL, REPORT_DATE_FMT};

pub const REPORT_HEADERS: [&str; 6] = ["No", "date", "CVE", "title", "from", "url"];

/// Column positions for one report. Reports vary in shape (the evidence
/// report is `[No, CVE, from]`), so columns are located by header name;
/// the fixed layout above is the fallback for headerless files. A column
/// the header row lacks gets an out-of-range index, which reads back as
/// the empty cell.
pub struct ColumnMap {
    pub date: usize,
    pub cve: usize,
    pub title: usize,
    pub source: usize,
    pub url: usize,
}

impl ColumnMap {
    pub fn fixed() -> Self {
        Self { date: 1, cve: 2, title: 3, source: 4, url: 5 }
    }

    pub fn from_headers(headers: Option<&[String]>) -> Self {
        let Some(h) = headers else { return Self::fixed() };
        let find = |name: &str| {
            h.iter()
                .position(|c| c.trim().eq_ignore_ascii_case(name))
                .unwrap_or(usize::MAX)
        };
        Self {
            date: find("date"),
            cve: find("CVE"),
            title: find("title"),
            source: find("from"),
            url: find("url"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    /// Original input position; tie-break only, no other meaning.
    pub seq: usize,
    /// Publication date; `None` covers absent and unparseable dates alike.
    pub date: Option<NaiveDate>,
    /// CVE identifier; `None` when the document named no CVE.
    pub cve: Option<String>,
    pub title: String,
    /// Origin document filename, stable per scrape.
    pub source: String,
    pub url: String,
}

/// Parse a report date cell. Sentinel and malformed text degrade to `None`;
/// a bad date never aborts a batch.
pub fn parse_report_date(cell: &str) -> Option<NaiveDate> {
    let cell = cell.trim();
    if cell.is_empty() || cell == NONE_SENTINEL {
        return None;
    }
    NaiveDate::parse_from_str(cell, REPORT_DATE_FMT).ok()
}

pub fn date_to_cell(date: Option<NaiveDate>) -> String {
    match date {
        Some(d) => d.format(REPORT_DATE_FMT).to_string(),
        None => s!(NONE_SENTINEL),
    }
}

pub fn cve_from_cell(cell: &str) -> Option<String> {
    let cell = cell.trim();
    if cell.is_empty() || cell == NONE_SENTINEL {
        None
    } else {
        Some(cell.to_string())
    }
}

pub fn cve_to_cell(cve: &Option<String>) -> String {
    match cve {
        Some(c) => c.clone(),
        None => s!(NONE_SENTINEL),
    }
}

impl Record {
    /// Build from a fixed-layout row `[No, date, CVE, title, from, url]`.
    /// Short rows are tolerated; missing cells read as empty/sentinel.
    pub fn from_row(row: &[String], seq: usize) -> Self {
        Self::from_row_with(row, seq, &ColumnMap::fixed())
    }

    /// Build from a row whose columns sit wherever `map` says they do.
    pub fn from_row_with(row: &[String], seq: usize, map: &ColumnMap) -> Self {
        let cell = |i: usize| row.get(i).map(String::as_str).unwrap_or("");
        Self {
            seq,
            date: parse_report_date(cell(map.date)),
            cve: cve_from_cell(cell(map.cve)),
            title: s!(cell(map.title)),
            source: s!(cell(map.source)),
            url: s!(cell(map.url)),
        }
    }

    /// Report row with the writer-assigned 1-based position.
    pub fn to_row(&self, no: usize) -> Vec<String> {
        vec![
            no.to_string(),
            date_to_cell(self.date),
            cve_to_cell(&self.cve),
            self.title.clone(),
            self.source.clone(),
            self.url.clone(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_date_degrades_to_sentinel() {
        assert_eq!(parse_report_date("2022/13/40"), None);
        assert_eq!(parse_report_date("not a date"), None);
        assert_eq!(parse_report_date(NONE_SENTINEL), None);
        assert_eq!(
            parse_report_date("2022/03/01"),
            NaiveDate::from_ymd_opt(2022, 3, 1)
        );
    }

    #[test]
    fn row_round_trip() {
        let row: Vec<String> = ["7", "2022/01/05", "CVE-2022-0001", "Title", "a.html", "https://x/"]
            .map(String::from).to_vec();
        let r = Record::from_row(&row, 6);
        assert_eq!(r.cve.as_deref(), Some("CVE-2022-0001"));
        assert_eq!(r.source, "a.html");
        // No is reassigned by the writer, not carried over
        assert_eq!(r.to_row(1)[0], "1");
        assert_eq!(r.to_row(1)[1..], row[1..]);
    }

    #[test]
    fn column_map_follows_header_names() {
        let headers: Vec<String> = ["No", "CVE", "from"].map(String::from).to_vec();
        let map = ColumnMap::from_headers(Some(headers.as_slice()));
        let row: Vec<String> = ["2", "CVE-2022-2", "a.html"].map(String::from).to_vec();
        let r = Record::from_row_with(&row, 1, &map);
        assert_eq!(r.cve.as_deref(), Some("CVE-2022-2"));
        assert_eq!(r.source, "a.html");
        // columns the header lacks read as absent
        assert_eq!(r.date, None);
        assert_eq!(r.title, "");
        assert_eq!(r.url, "");
    }

    #[test]
    fn headerless_input_falls_back_to_fixed_layout() {
        let map = ColumnMap::from_headers(None);
        let row: Vec<String> = ["1", "2022/01/05", "CVE-2022-1", "T", "a.html", "https://x/"]
            .map(String::from).to_vec();
        let r = Record::from_row_with(&row, 0, &map);
        assert_eq!(r, Record::from_row(&row, 0));
        assert_eq!(r.cve.as_deref(), Some("CVE-2022-1"));
    }

    #[test]
    fn short_row_reads_as_sentinels() {
        let r = Record::from_row(&[s!("1")], 0);
        assert_eq!(r.date, None);
        assert_eq!(r.cve, None);
        assert_eq!(r.source, "");
    }
}
