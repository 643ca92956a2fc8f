// src/specs/links.rs
//
// One saved advisory page -> outbound reference links.
//
// Every <a href="https://..."> target counts except links into the
// excluded domains (the advisory site itself and social platforms);
// those are navigation, not evidence.

use chrono::NaiveDate;

use crate::core::html::{attr_value_ci, to_lower};
use crate::params::EXCLUDED_DOMAINS;
use crate::specs::advisory;

pub struct LinkBundle {
    pub title: String,
    pub date: Option<NaiveDate>,
    /// Candidate evidence URLs in page order; duplicates kept.
    pub urls: Vec<String>,
}

pub fn extract(doc: &str) -> LinkBundle {
    let advisory = advisory::extract(doc);
    LinkBundle {
        title: advisory.title,
        date: advisory.date,
        urls: extract_https_links(doc, EXCLUDED_DOMAINS),
    }
}

pub fn extract_https_links(doc: &str, excluded_domains: &[&str]) -> Vec<String> {
    let lc = to_lower(doc);
    let mut urls = Vec::new();
    let mut pos = 0usize;

    while let Some(rel) = lc[pos..].find("<a") {
        let start = pos + rel;
        let after = start + 2;

        // Anchor tags only: "<article>", "<aside>", "<abbr>" also start
        // with "<a". The name must end right here.
        let is_anchor = matches!(
            lc.as_bytes().get(after).copied(),
            Some(b' ' | b'\t' | b'\r' | b'\n' | b'/' | b'>')
        );
        if !is_anchor {
            pos = after;
            continue;
        }

        // href lives in the open tag; no closing </a> required.
        let Some(open_end) = doc[start..].find('>').map(|i| start + i + 1) else { break };
        pos = open_end;

        let Some(href) = attr_value_ci(&doc[start..open_end], "href") else { continue };
        if !href.starts_with("https://") {
            continue;
        }
        if is_excluded(href, excluded_domains) {
            continue;
        }
        urls.push(href.to_string());
    }

    urls
}

fn is_excluded(url: &str, excluded_domains: &[&str]) -> bool {
    let Some(domain) = domain_of(url) else { return true };
    let domain = to_lower(domain);
    excluded_domains.iter().any(|ex| domain.contains(ex))
}

fn domain_of(url: &str) -> Option<&str> {
    let rest = url.split_once("//").map(|(_, r)| r)?;
    let end = rest.find('/').unwrap_or(rest.len());
    let d = &rest[..end];
    if d.is_empty() { None } else { Some(d) }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <title>Security Advisory 2022-003</title>
        <time class="text-grey">10-02-2022 09:00</time>
        <a href="https://vendor.example.com/advisory/123">vendor</a>
        <a href="https://cert.europa.eu/publications/security-advisories/2022-003/">self</a>
        <a href="https://www.linkedin.com/company/cert-eu">share</a>
        <a href="http://insecure.example.com/x">plain http</a>
        <a name="anchor">no href</a>
        <a href="https://vendor.example.com/advisory/123">vendor again</a>
    "#;

    #[test]
    fn keeps_https_drops_excluded_and_plain_http() {
        let b = extract(PAGE);
        assert_eq!(b.title, "Security Advisory 2022-003");
        assert_eq!(b.date, NaiveDate::from_ymd_opt(2022, 2, 10));
        // duplicates survive; order is page order
        assert_eq!(b.urls, vec![
            "https://vendor.example.com/advisory/123",
            "https://vendor.example.com/advisory/123",
        ]);
    }

    #[test]
    fn exclusion_matches_domain_not_path() {
        let doc = r#"<a href="https://vendor.example.com/mirror/github.com/x">ok</a>"#;
        let urls = extract_https_links(doc, EXCLUDED_DOMAINS);
        assert_eq!(urls.len(), 1);
    }

    #[test]
    fn anchors_inside_a_prefixed_tags_are_found() {
        let doc = r#"<article><a href="https://vendor.example.com/fix">fix</a></article>"#;
        assert_eq!(
            extract_https_links(doc, EXCLUDED_DOMAINS),
            vec!["https://vendor.example.com/fix"]
        );

        let doc = r#"
            <aside>background</aside>
            <abbr title="Common Vulnerabilities">CVE</abbr>
            <a href="https://vendor.example.com/a">a</a>
        "#;
        assert_eq!(extract_https_links(doc, EXCLUDED_DOMAINS).len(), 1);
    }

    #[test]
    fn unclosed_anchor_still_yields_its_href() {
        let doc = r#"<p><a href="https://vendor.example.com/x">dangling</p>"#;
        assert_eq!(
            extract_https_links(doc, EXCLUDED_DOMAINS),
            vec!["https://vendor.example.com/x"]
        );
    }

    #[test]
    fn no_links_is_empty_not_error() {
        assert!(extract_https_links("<p>nothing here</p>", EXCLUDED_DOMAINS).is_empty());
    }
}
