// src/specs/evidence.rs
//
// One mirrored evidence document -> CVE set.
//
// Evidence pages are third-party and messy; match identifiers over the
// raw text rather than trusting any markup. An optional year exclusion
// drops identifiers outside the audit window (vendor pages often list
// this year's CVEs next to the one under review).

use std::collections::BTreeSet;

use crate::specs::cve_regex;

pub fn extract_cves(doc: &str, exclude_year: Option<&str>) -> Vec<String> {
    let set: BTreeSet<String> = cve_regex()
        .find_iter(doc)
        .map(|m| m.as_str().to_string())
        .filter(|cve| match exclude_year {
            Some(year) => cve_year(cve) != Some(year),
            None => true,
        })
        .collect();
    set.into_iter().collect()
}

fn cve_year(cve: &str) -> Option<&str> {
    cve.split('-').nth(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_sorted_unique_cves() {
        let doc = "fixes CVE-2022-1000, CVE-2021-44228 and CVE-2022-1000";
        assert_eq!(
            extract_cves(doc, None),
            vec!["CVE-2021-44228", "CVE-2022-1000"]
        );
    }

    #[test]
    fn year_exclusion_drops_that_year_only() {
        let doc = "CVE-2022-1000 CVE-2024-0001 CVE-2024-9999";
        assert_eq!(extract_cves(doc, Some("2024")), vec!["CVE-2022-1000"]);
        assert_eq!(extract_cves(doc, Some("2023")).len(), 3);
    }

    #[test]
    fn no_matches_is_empty() {
        assert!(extract_cves("no identifiers here", None).is_empty());
    }
}
