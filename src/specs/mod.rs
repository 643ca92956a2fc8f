// src/specs/mod.rs
//! Per-document extraction specs.
//!
//! Each spec knows where the ground truth lives in one kind of saved
//! document and how to pull it out robustly:
//!
//! - `advisory` – title, publication date and CVE set from a saved
//!   CERT-EU advisory page.
//! - `links` – outbound `https://` reference links from an advisory
//!   page, minus the excluded social/self-referential domains.
//! - `evidence` – CVE set from a mirrored vendor/evidence document.
//!
//! Specs only extract. Directory walking, sorting, sentinel rows and
//! report writing live with the runner; fetching lives in `net`/`fetch`.
//! All specs are testable offline against captured fixtures.

use std::sync::OnceLock;

use regex::Regex;

pub mod advisory;
pub mod evidence;
pub mod links;

/// `CVE-YYYY-NNNN…` — four-digit year, four-or-more digit number.
pub fn cve_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Hard-coded pattern, compiled once; covered by the test below.
    RE.get_or_init(|| Regex::new(r"CVE-\d{4}-\d{4,}").expect("CVE pattern compiles"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cve_pattern_compiles_and_matches() {
        let re = cve_regex();
        assert!(re.is_match("see CVE-2022-12345 for details"));
        assert!(!re.is_match("CVE-22-1234"));
    }
}
