//! Table rendering for terminal output.
//!
//! Row builders are kept separate from the [`Table`] so that column order and cell formatting can be checked without
//! caring about borders.

use std::borrow::Cow;

use comfy_table::{ContentArrangement, Table, presets};

use crate::api::{DNSRecord, Domain, UrlForward};

/// Record content longer than this is cut short in tables.
pub const CONTENT_WIDTH: usize = 50;

pub const DOMAIN_HEADERS: [&str; 6] = ["Domain", "Status", "TLD", "Created", "Expires", "AutoRenew"];
pub const RECORD_HEADERS: [&str; 6] = ["ID", "Type", "Name", "Content", "Prio", "TTL"];
pub const FORWARD_HEADERS: [&str; 6] = ["ID", "Subdomain", "Location", "Type", "Wildcard", "Path"];

/// Shortens `text` to at most `max` characters, replacing the tail with `...` when anything had to go.
pub fn truncate(text: &str, max: usize) -> Cow<'_, str> {
    if text.chars().count() <= max {
        return Cow::Borrowed(text);
    }

    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    Cow::Owned(kept + "...")
}

pub fn yes_no(flag: bool) -> &'static str {
    if flag { "Yes" } else { "No" }
}

/// Cuts a Porkbun timestamp (`YYYY-MM-DD HH:MM:SS`) down to its date.
fn date(stamp: Option<&str>) -> String {
    stamp.map(|s| s.chars().take(10).collect()).unwrap_or_default()
}

fn number(n: Option<u32>) -> String {
    n.map(|n| n.to_string()).unwrap_or_default()
}

pub fn domain_rows(domains: &[Domain]) -> Vec<[String; 6]> {
    domains
        .iter()
        .map(|d| {
            [
                d.name.clone(),
                d.status.clone(),
                d.tld.clone(),
                date(d.create_date.as_deref()),
                date(d.expire_date.as_deref()),
                yes_no(d.auto_renew).to_string(),
            ]
        })
        .collect()
}

pub fn record_rows(records: &[DNSRecord]) -> Vec<[String; 6]> {
    records
        .iter()
        .map(|r| {
            [
                r.id.clone(),
                r.typ.to_string(),
                r.name.clone(),
                truncate(&r.content, CONTENT_WIDTH).into_owned(),
                number(r.prio),
                number(r.ttl),
            ]
        })
        .collect()
}

pub fn forward_rows(forwards: &[UrlForward]) -> Vec<[String; 6]> {
    forwards
        .iter()
        .map(|f| {
            let subdomain = if f.subdomain.is_empty() { "(root)" } else { &f.subdomain };
            [
                f.id.clone(),
                subdomain.to_string(),
                f.location.clone(),
                f.kind.to_string(),
                yes_no(f.wildcard).to_string(),
                yes_no(f.include_path).to_string(),
            ]
        })
        .collect()
}

pub fn table<const N: usize>(headers: [&str; N], rows: Vec<[String; N]>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(headers);
    for row in rows {
        table.add_row(row);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ForwardKind, RecordType};

    fn record(content: &str) -> DNSRecord {
        DNSRecord {
            id: "42".into(),
            name: "www.example.com".into(),
            typ: RecordType::TXT.into(),
            content: content.into(),
            ttl: Some(600),
            prio: None,
            notes: None,
        }
    }

    #[test]
    fn long_content_is_cut_to_fifty_characters() {
        let long = "x".repeat(51);
        let row = &record_rows(&[record(&long)])[0];
        assert_eq!(row[3].chars().count(), 50);
        assert!(row[3].ends_with("..."));
        assert!(row[3].starts_with(&"x".repeat(47)));

        let exact = "y".repeat(50);
        assert_eq!(record_rows(&[record(&exact)])[0][3], exact);
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let text = "é".repeat(60);
        let cut = truncate(&text, 10);
        assert_eq!(cut, format!("{}...", "é".repeat(7)));
    }

    #[test]
    fn record_columns_are_in_order() {
        let row = &record_rows(&[record("hello")])[0];
        assert_eq!(row, &["42", "TXT", "www.example.com", "hello", "", "600"].map(String::from));
    }

    #[test]
    fn domain_dates_are_cut_to_the_day() {
        let domain = Domain {
            name: "example.com".into(),
            status: "ACTIVE".into(),
            tld: "com".into(),
            create_date: Some("2020-01-02 03:04:05".into()),
            expire_date: None,
            auto_renew: true,
        };
        let row = &domain_rows(&[domain])[0];
        assert_eq!(row, &["example.com", "ACTIVE", "com", "2020-01-02", "", "Yes"].map(String::from));
    }

    #[test]
    fn root_forwards_are_labelled() {
        let forward = UrlForward {
            id: "7".into(),
            subdomain: String::new(),
            location: "https://example.net".into(),
            kind: ForwardKind::Permanent,
            include_path: false,
            wildcard: true,
        };
        let row = &forward_rows(&[forward])[0];
        assert_eq!(row, &["7", "(root)", "https://example.net", "permanent", "Yes", "No"].map(String::from));
    }

    #[test]
    fn tables_show_headers_and_cells() {
        let rendered = table(RECORD_HEADERS, record_rows(&[record("hello")])).to_string();
        assert!(rendered.contains("Content"));
        assert!(rendered.contains("hello"));
    }
}
