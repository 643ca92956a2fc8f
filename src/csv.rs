// src/csv.rs
use std::io::{self, Write};
use std::mem::take;

/// Excel (ja locale) wants a BOM on CSV output; the original reports carry one.
pub const BOM: &str = "\u{feff}";

/* ---------------- Parsing ---------------- */

/// Minimal CSV parser (quotes + CRLF tolerant). BOM-aware.
pub fn parse_rows(text: &str) -> Vec<Vec<String>> {
    let text = text.strip_prefix(BOM).unwrap_or(text);

    let mut rows = Vec::new();
    let mut field = s!();
    let mut row = Vec::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if in_quotes {
                    if matches!(chars.peek(), Some('"')) {
                        chars.next(); // double-quote escape
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                } else {
                    in_quotes = true;
                }
            }
            ',' if !in_quotes => {
                // move the field without cloning
                row.push(take(&mut field));
            }
            '\n' | '\r' if !in_quotes => {
                if ch == '\r' && matches!(chars.peek(), Some('\n')) { chars.next(); }
                row.push(take(&mut field));
                if !row.is_empty() && !(row.len() == 1 && row[0].is_empty()) {
                    rows.push(take(&mut row));
                } else {
                    row.clear();
                }
            }
            _ => field.push(ch),
        }
    }

    // Flush any trailing field/row even if quotes were unterminated.
    row.push(field);
    if !(row.len() == 1 && row[0].is_empty()) {
        rows.push(row);
    }

    rows
}

/// Report files start with a "No" column; treat such a first row as the header.
pub fn detect_headers(mut rows: Vec<Vec<String>>) -> (Option<Vec<String>>, Vec<Vec<String>>) {
    if rows.is_empty() { return (None, rows); }
    let first = &rows[0];
    if !first.is_empty() && first[0].eq_ignore_ascii_case("no") {
        let header = rows.remove(0);
        return (Some(header), rows);
    }
    (None, rows)
}

/* ---------------- Writing ---------------- */

fn needs_quotes(field: &str) -> bool {
    field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Write a single CSV row to any writer.
pub fn write_row<W: Write>(mut w: W, row: &[String]) -> io::Result<()> {
    let mut first = true;
    for cell in row {
        if !first { write!(w, ",")?; } else { first = false; }
        if needs_quotes(cell) {
            let escaped = cell.replace('"', "\"\"");
            write!(w, "\"{}\"", escaped)?;
        } else {
            write!(w, "{}", cell)?;
        }
    }
    writeln!(w)
}

/// Full file contents for a report: BOM, optional header line, rows.
pub fn rows_to_string(headers: &Option<Vec<String>>, rows: &[Vec<String>]) -> String {
    let mut buf: Vec<u8> = BOM.as_bytes().to_vec();

    if let Some(h) = headers {
        let _ = write_row(&mut buf, h);
    }
    for r in rows {
        let _ = write_row(&mut buf, r);
    }

    match String::from_utf8(buf) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(&e.into_bytes()).into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_quotes_and_crlf() {
        let rows = parse_rows("a,\"b,1\"\r\nc,\"say \"\"hi\"\"\"\n");
        assert_eq!(rows, vec![
            vec![s!("a"), s!("b,1")],
            vec![s!("c"), s!("say \"hi\"")],
        ]);
    }

    #[test]
    fn parse_strips_bom() {
        let rows = parse_rows("\u{feff}No,CVE\n1,CVE-2022-1\n");
        assert_eq!(rows[0][0], "No");
    }

    #[test]
    fn detect_headers_on_no_column() {
        let rows = vec![
            vec![s!("No"), s!("CVE")],
            vec![s!("1"), s!("CVE-2022-1")],
        ];
        let (h, body) = detect_headers(rows);
        assert_eq!(h, Some(vec![s!("No"), s!("CVE")]));
        assert_eq!(body.len(), 1);
    }

    #[test]
    fn round_trip_keeps_cells() {
        let headers = Some(vec![s!("No"), s!("title")]);
        let rows = vec![vec![s!("1"), s!("A, \"quoted\" title")]];
        let text = rows_to_string(&headers, &rows);
        assert!(text.starts_with(BOM));
        let (h2, body) = detect_headers(parse_rows(&text));
        assert_eq!(h2, headers);
        assert_eq!(body, rows);
    }
}
