// src/dedup.rs
//
// Duplicate resolution over report records. Two policies, kept as two
// explicit entry points so callers can never silently flip between them:
//
// - discard: (from, CVE) keyed; later records for a seen key are split off
//   into a separate sequence and dropped from the canonical report.
// - mark: CVE keyed within one file; every record in a duplicate group
//   except the earliest-dated one gets a marker appended to its CVE cell
//   and stays in the report.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;

use crate::params::DUP_MARKER;
use crate::record::Record;

/// Discard-policy identity key: exact (from, CVE) pair, case-sensitive,
/// no normalization. A sentinel CVE is an ordinary key value.
pub fn discard_key(r: &Record) -> (String, Option<String>) {
    (r.source.clone(), r.cve.clone())
}

/// Mark-policy identity key: the CVE alone.
pub fn mark_key(r: &Record) -> Option<String> {
    r.cve.clone()
}

/// Split records into (canonical, duplicates) under the discard policy.
///
/// Single pass in input order: the first record for each key goes to
/// canonical, every later record with a seen key goes to duplicates.
/// Both outputs keep their records' original relative order, and
/// canonical + duplicates account for every input record.
///
/// Note the key ignores the date on purpose: two records for the same
/// (from, CVE) from different dates still collapse to the first seen.
pub fn resolve_discard(records: Vec<Record>) -> (Vec<Record>, Vec<Record>) {
    let mut seen: HashSet<(String, Option<String>)> = HashSet::new();
    let mut canonical = Vec::with_capacity(records.len());
    let mut duplicates = Vec::new();

    for r in records {
        if seen.insert(discard_key(&r)) {
            canonical.push(r);
        } else {
            duplicates.push(r);
        }
    }

    (canonical, duplicates)
}

/// Missing dates order after every valid date; ties fall back to the
/// record's original position.
fn mark_order_key(r: &Record) -> (bool, NaiveDate, usize) {
    (r.date.is_none(), r.date.unwrap_or(NaiveDate::MIN), r.seq)
}

/// Mark losing duplicates in place under the mark policy. Group scope is
/// the slice itself (the caller passes one file's records per call).
///
/// Within each group of records sharing a CVE, the earliest by
/// (date, seq) wins and is left alone; every other member gets the
/// marker appended to its CVE. Sentinel-CVE records and singleton groups
/// are untouched. Row order and record count never change.
///
/// Marking is idempotent: a CVE already ending in the marker is excluded
/// from grouping, so re-running over marked data is a no-op.
///
/// Returns the number of losers marked (winners are kept as-is and not
/// counted).
pub fn resolve_mark(records: &mut [Record]) -> usize {
    let mut groups: HashMap<String, Vec<usize>> = HashMap::new();
    for (i, r) in records.iter().enumerate() {
        if let Some(cve) = mark_key(r) {
            if cve.ends_with(DUP_MARKER) {
                continue;
            }
            groups.entry(cve).or_default().push(i);
        }
    }

    let mut losers = 0;
    for (_, mut ix) in groups {
        if ix.len() < 2 {
            continue;
        }
        ix.sort_by_key(|&i| mark_order_key(&records[i]));
        for &i in &ix[1..] {
            if let Some(cve) = records[i].cve.as_mut() {
                cve.push(DUP_MARKER);
                losers += 1;
            }
        }
    }

    losers
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(seq: usize, source: &str, cve: Option<&str>, date: Option<(i32, u32, u32)>) -> Record {
        Record {
            seq,
            date: date.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
            cve: cve.map(String::from),
            title: s!("title"),
            source: s!(source),
            url: s!("https://example.org/"),
        }
    }

    #[test]
    fn discard_splits_on_from_cve_pair() {
        let input = vec![
            rec(0, "a.html", Some("CVE-2022-1"), None),
            rec(1, "a.html", Some("CVE-2022-1"), None),
            rec(2, "b.html", Some("CVE-2022-1"), None),
        ];
        let (canonical, duplicates) = resolve_discard(input);
        assert_eq!(canonical.len(), 2);
        assert_eq!(duplicates.len(), 1);
        assert_eq!(canonical[0].seq, 0);
        assert_eq!(canonical[1].source, "b.html");
        assert_eq!(duplicates[0].seq, 1);
    }

    #[test]
    fn discard_uniqueness_and_conservation() {
        let input: Vec<Record> = (0..20)
            .map(|i| rec(i, if i % 2 == 0 { "a.html" } else { "b.html" },
                Some(["CVE-2022-1", "CVE-2022-2", "CVE-2022-3"][i % 3]), None))
            .collect();
        let total = input.len();
        let (canonical, duplicates) = resolve_discard(input);

        assert_eq!(canonical.len() + duplicates.len(), total);
        let mut keys = HashSet::new();
        for r in &canonical {
            assert!(keys.insert(discard_key(r)), "duplicate key in canonical");
        }
    }

    #[test]
    fn discard_is_idempotent() {
        let input = vec![
            rec(0, "a.html", Some("CVE-2022-1"), None),
            rec(1, "a.html", Some("CVE-2022-1"), None),
            rec(2, "a.html", None, None),
            rec(3, "a.html", None, None),
        ];
        let (canonical, _) = resolve_discard(input);
        let again = canonical.clone();
        let (canonical2, duplicates2) = resolve_discard(again);
        assert_eq!(canonical2, canonical);
        assert!(duplicates2.is_empty());
    }

    #[test]
    fn discard_treats_sentinel_cve_as_key() {
        let input = vec![
            rec(0, "a.html", None, None),
            rec(1, "a.html", None, None),
            rec(2, "b.html", None, None),
        ];
        let (canonical, duplicates) = resolve_discard(input);
        assert_eq!(canonical.len(), 2);
        assert_eq!(duplicates.len(), 1);
    }

    #[test]
    fn discard_empty_input() {
        let (canonical, duplicates) = resolve_discard(Vec::new());
        assert!(canonical.is_empty());
        assert!(duplicates.is_empty());
    }

    #[test]
    fn mark_earliest_date_wins_then_seq() {
        // dates [2022-03-01, 2022-01-05, 2022-01-05]: winner is seq 1
        let mut records = vec![
            rec(0, "m.csv", Some("CVE-2022-9"), Some((2022, 3, 1))),
            rec(1, "m.csv", Some("CVE-2022-9"), Some((2022, 1, 5))),
            rec(2, "m.csv", Some("CVE-2022-9"), Some((2022, 1, 5))),
        ];
        let losers = resolve_mark(&mut records);
        assert_eq!(losers, 2);
        assert_eq!(records[1].cve.as_deref(), Some("CVE-2022-9"));
        assert_eq!(records[0].cve.as_deref(), Some("CVE-2022-9!"));
        assert_eq!(records[2].cve.as_deref(), Some("CVE-2022-9!"));
    }

    #[test]
    fn mark_missing_date_always_loses() {
        // unparseable date became None on load; seq says it came first
        let mut records = vec![
            rec(0, "m.csv", Some("CVE-2022-9"), None),
            rec(1, "m.csv", Some("CVE-2022-9"), Some((2022, 6, 1))),
        ];
        let losers = resolve_mark(&mut records);
        assert_eq!(losers, 1);
        assert_eq!(records[0].cve.as_deref(), Some("CVE-2022-9!"));
        assert_eq!(records[1].cve.as_deref(), Some("CVE-2022-9"));
    }

    #[test]
    fn mark_ties_among_missing_dates_use_seq() {
        let mut records = vec![
            rec(0, "m.csv", Some("CVE-2022-9"), None),
            rec(1, "m.csv", Some("CVE-2022-9"), None),
        ];
        resolve_mark(&mut records);
        assert_eq!(records[0].cve.as_deref(), Some("CVE-2022-9"));
        assert_eq!(records[1].cve.as_deref(), Some("CVE-2022-9!"));
    }

    #[test]
    fn mark_preserves_order_and_count() {
        let mut records = vec![
            rec(0, "m.csv", Some("CVE-2022-1"), Some((2022, 1, 1))),
            rec(1, "m.csv", Some("CVE-2022-2"), Some((2022, 1, 2))),
            rec(2, "m.csv", Some("CVE-2022-1"), Some((2022, 1, 3))),
            rec(3, "m.csv", None, None),
        ];
        let before: Vec<usize> = records.iter().map(|r| r.seq).collect();
        resolve_mark(&mut records);
        let after: Vec<usize> = records.iter().map(|r| r.seq).collect();
        assert_eq!(before, after);
        assert_eq!(records.len(), 4);
        // only the losing CVE cell changed
        assert_eq!(records[2].cve.as_deref(), Some("CVE-2022-1!"));
        assert_eq!(records[1].cve.as_deref(), Some("CVE-2022-2"));
        assert_eq!(records[3].cve, None);
    }

    #[test]
    fn mark_skips_sentinel_and_singletons() {
        let mut records = vec![
            rec(0, "m.csv", None, None),
            rec(1, "m.csv", None, None),
            rec(2, "m.csv", Some("CVE-2022-5"), None),
        ];
        let losers = resolve_mark(&mut records);
        assert_eq!(losers, 0);
        assert_eq!(records[0].cve, None);
        assert_eq!(records[1].cve, None);
        assert_eq!(records[2].cve.as_deref(), Some("CVE-2022-5"));
    }

    #[test]
    fn mark_is_idempotent_over_marked_data() {
        let mut records = vec![
            rec(0, "m.csv", Some("CVE-2022-9"), Some((2022, 1, 1))),
            rec(1, "m.csv", Some("CVE-2022-9"), Some((2022, 2, 1))),
            rec(2, "m.csv", Some("CVE-2022-9"), Some((2022, 3, 1))),
        ];
        assert_eq!(resolve_mark(&mut records), 2);
        let snapshot = records.clone();

        // second run: already-marked CVEs never collect a second marker
        assert_eq!(resolve_mark(&mut records), 0);
        assert_eq!(records, snapshot);
        assert_eq!(records[1].cve.as_deref(), Some("CVE-2022-9!"));
    }

    #[test]
    fn mark_empty_input() {
        let mut records: Vec<Record> = Vec::new();
        assert_eq!(resolve_mark(&mut records), 0);
    }
}
