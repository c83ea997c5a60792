//! Delimited-text export and import of check results.
//!
//! Minimal CSV handling (quotes + CRLF tolerant), no external dependency.
//! Boolean fields render as yes/no tokens, missing latency as `N/A`.

use anyhow::{Result, anyhow};
use chrono::NaiveDateTime;

use crate::store::CheckRow;

pub const CSV_HEADER: [&str; 6] = [
    "URL",
    "Status",
    "Layout OK",
    "Pattern OK",
    "Response Time",
    "Checked At",
];

/// Localizable boolean tokens.
pub const YES_TOKEN: &str = "Yes";
pub const NO_TOKEN: &str = "No";

/// Rendered in place of a latency the store has no value for.
pub const MISSING_TOKEN: &str = "N/A";

const TIMESTAMP_FORMAT: &str = "%d-%m-%Y %H:%M:%S";

/// Render check results as CSV, newest-first order preserved from the input.
/// Zero results produce the header row alone.
#[must_use]
pub fn export_csv(rows: &[CheckRow]) -> String {
    let mut out = String::new();
    write_record(&mut out, CSV_HEADER.iter().copied());

    for row in rows {
        let status = row.status.to_string();
        let response_time = row
            .response_time
            .map_or_else(|| MISSING_TOKEN.to_string(), |rt| format!("{rt:.3}"));
        let checked_at = row.checked_at.format(TIMESTAMP_FORMAT).to_string();

        write_record(
            &mut out,
            [
                row.url.as_str(),
                status.as_str(),
                bool_token(row.layout_ok),
                bool_token(row.pattern_ok),
                response_time.as_str(),
                checked_at.as_str(),
            ]
            .into_iter(),
        );
    }

    out
}

/// Parse previously exported CSV back into check rows.
///
/// URL, status, and the boolean flags survive the round trip exactly;
/// latency survives at the exported precision.
pub fn import_csv(text: &str) -> Result<Vec<CheckRow>> {
    let mut rows = parse_rows(text);
    if rows.is_empty() {
        return Err(anyhow!("Export is empty: missing header row"));
    }

    let header = rows.remove(0);
    if header != CSV_HEADER {
        return Err(anyhow!("Unrecognized export header: {header:?}"));
    }

    rows.into_iter()
        .enumerate()
        .map(|(i, fields)| {
            let line = i + 2;
            if fields.len() != CSV_HEADER.len() {
                return Err(anyhow!(
                    "Line {line}: expected {} fields, found {}",
                    CSV_HEADER.len(),
                    fields.len()
                ));
            }

            let checked_at = NaiveDateTime::parse_from_str(&fields[5], TIMESTAMP_FORMAT)
                .map_err(|e| anyhow!("Line {line}: bad timestamp '{}': {e}", fields[5]))?
                .and_utc();

            Ok(CheckRow {
                url: fields[0].clone(),
                status: fields[1]
                    .parse()
                    .map_err(|e| anyhow!("Line {line}: {e}"))?,
                layout_ok: parse_token(&fields[2])
                    .ok_or_else(|| anyhow!("Line {line}: bad boolean '{}'", fields[2]))?,
                pattern_ok: parse_token(&fields[3])
                    .ok_or_else(|| anyhow!("Line {line}: bad boolean '{}'", fields[3]))?,
                response_time: if fields[4] == MISSING_TOKEN {
                    None
                } else {
                    Some(
                        fields[4]
                            .parse()
                            .map_err(|e| anyhow!("Line {line}: bad latency '{}': {e}", fields[4]))?,
                    )
                },
                checked_at,
            })
        })
        .collect()
}

fn bool_token(value: bool) -> &'static str {
    if value { YES_TOKEN } else { NO_TOKEN }
}

fn parse_token(field: &str) -> Option<bool> {
    if field == YES_TOKEN {
        Some(true)
    } else if field == NO_TOKEN {
        Some(false)
    } else {
        None
    }
}

fn write_record<'a>(out: &mut String, fields: impl Iterator<Item = &'a str>) {
    for (i, field) in fields.enumerate() {
        if i > 0 {
            out.push(',');
        }
        if field.contains([',', '"', '\n', '\r']) {
            out.push('"');
            for ch in field.chars() {
                if ch == '"' {
                    out.push('"');
                }
                out.push(ch);
            }
            out.push('"');
        } else {
            out.push_str(field);
        }
    }
    out.push('\n');
}

/// Minimal CSV parser (quotes + CRLF tolerant).
fn parse_rows(text: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut field = String::new();
    let mut row: Vec<String> = Vec::new();
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
                row.push(std::mem::take(&mut field));
            }
            '\n' | '\r' if !in_quotes => {
                if ch == '\r' && matches!(chars.peek(), Some('\n')) {
                    chars.next();
                }
                row.push(std::mem::take(&mut field));
                if !(row.len() == 1 && row[0].is_empty()) {
                    rows.push(std::mem::take(&mut row));
                } else {
                    row.clear();
                }
            }
            _ => field.push(ch),
        }
    }

    // Flush a trailing row without a final newline
    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verify::CheckStatus;
    use chrono::{TimeZone, Utc};

    fn row(url: &str, status: CheckStatus, rt: Option<f64>) -> CheckRow {
        CheckRow {
            url: url.to_string(),
            status,
            layout_ok: status.is_success(),
            pattern_ok: true,
            response_time: rt,
            checked_at: Utc.with_ymd_and_hms(2026, 8, 6, 12, 30, 45).unwrap(),
        }
    }

    #[test]
    fn empty_export_is_header_only() {
        let out = export_csv(&[]);
        assert_eq!(out, "URL,Status,Layout OK,Pattern OK,Response Time,Checked At\n");
    }

    #[test]
    fn export_renders_tokens() {
        let out = export_csv(&[row("https://example.com/a", CheckStatus::Error, None)]);
        let data_line = out.lines().nth(1).unwrap();
        assert_eq!(
            data_line,
            "https://example.com/a,error,No,Yes,N/A,06-08-2026 12:30:45"
        );
    }

    #[test]
    fn round_trip_preserves_identity_fields() {
        let rows = vec![
            row("https://example.com/a", CheckStatus::Http(200), Some(0.217)),
            row("https://example.com/b?x=1,2", CheckStatus::Http(404), Some(1.5)),
            row("https://example.com/c", CheckStatus::Error, None),
        ];

        let imported = import_csv(&export_csv(&rows)).unwrap();
        assert_eq!(imported.len(), rows.len());
        for (orig, back) in rows.iter().zip(&imported) {
            assert_eq!(orig.url, back.url);
            assert_eq!(orig.status, back.status);
            assert_eq!(orig.layout_ok, back.layout_ok);
            assert_eq!(orig.pattern_ok, back.pattern_ok);
            assert_eq!(orig.checked_at, back.checked_at);
        }
        assert_eq!(imported[0].response_time, Some(0.217));
        assert_eq!(imported[2].response_time, None);
    }

    #[test]
    fn quoted_fields_survive() {
        let mut odd = row("https://example.com/x", CheckStatus::Http(200), Some(0.1));
        odd.url = "https://example.com/search?q=\"a,b\"".to_string();

        let out = export_csv(&[odd.clone()]);
        let imported = import_csv(&out).unwrap();
        assert_eq!(imported[0].url, odd.url);
    }

    #[test]
    fn import_rejects_foreign_header() {
        assert!(import_csv("Name,Value\nx,1\n").is_err());
        assert!(import_csv("").is_err());
    }
}
