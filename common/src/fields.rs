//! # Field Engine
//!
//! Placeholder handling for template markup. A field token is `{` followed by
//! one or more characters other than `}` and a closing `}`; the field name is
//! the enclosed text with surrounding whitespace trimmed.
//!
//! Two names are reserved and case-sensitive:
//! - `DATUM` is always replaced by the render-time date (`DD.MM.YYYY`).
//! - `UNTERSCHRIFT` marks the signature block. It is left untouched here and
//!   resolved later by the presentation step.
//!
//! Both `extract_fields` and `render_fields` are total: malformed tokens
//! (an unclosed `{`, an empty `{}`) simply produce no match.

use chrono::{Local, NaiveDate};
use log::warn;
use regex::{NoExpand, Regex};
use std::collections::{BTreeMap, HashSet};

/// Auto-field replaced with the current date on every render.
pub const DATE_FIELD: &str = "DATUM";

/// Signature block marker, resolved by the presentation step.
pub const SIGNATURE_FIELD: &str = "UNTERSCHRIFT";

/// Quick-insert fields offered by the template editor.
pub const SUGGESTED_FIELDS: [&str; 5] = ["Vorname", "Nachname", "Email", DATE_FIELD, SIGNATURE_FIELD];

/// Token form of the signature block marker.
pub const SIGNATURE_TOKEN: &str = "{UNTERSCHRIFT}";

const DATE_TOKEN: &str = "{DATUM}";

/// Returns `true` for the auto-fields that never need a caller-supplied value.
pub fn is_reserved(name: &str) -> bool {
    name == DATE_FIELD || name == SIGNATURE_FIELD
}

/// Replaces every markup tag (`<` up to the next `>`) with a single space.
///
/// An unclosed `<` is kept as text together with everything after it.
fn strip_tags(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut rest = content;

    while let Some(open) = rest.find('<') {
        match rest[open..].find('>') {
            Some(rel_close) => {
                out.push_str(&rest[..open]);
                out.push(' ');
                rest = &rest[open + rel_close + 1..];
            }
            None => break,
        }
    }

    out.push_str(rest);
    out
}

/// Scans `text` left to right and returns the raw inner text of every token.
///
/// At each `{` the first following `}` closes the token. `{}` is not a token
/// and scanning resumes right after the `{`. Once no `}` is left, no further
/// token can exist.
fn scan_tokens(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut pos = 0;

    while let Some(rel_open) = text[pos..].find('{') {
        let open = pos + rel_open;
        let Some(rel_close) = text[open + 1..].find('}') else {
            break;
        };
        let close = open + 1 + rel_close;

        if close == open + 1 {
            pos = open + 1;
            continue;
        }

        tokens.push(&text[open + 1..close]);
        pos = close + 1;
    }

    tokens
}

/// Extracts the ordered set of distinct field names from template markup.
///
/// Tags are stripped first so tokens inside attribute values are ignored.
/// Names are trimmed and de-duplicated by exact match, keeping first-seen order.
pub fn extract_fields(content: &str) -> Vec<String> {
    let text = strip_tags(content);
    let mut seen = HashSet::new();
    let mut fields = Vec::new();

    for raw in scan_tokens(&text) {
        let name = raw.trim();
        if seen.insert(name.to_string()) {
            fields.push(name.to_string());
        }
    }

    fields
}

/// Formats a date the way the `DATUM` field renders it.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d.%m.%Y").to_string()
}

/// Renders `content` with the supplied values and today's date.
pub fn render_fields(content: &str, values: &BTreeMap<String, String>) -> String {
    render_fields_on(content, values, Local::now().date_naive())
}

/// Renders `content` with the supplied values and a fixed `DATUM` date.
///
/// Each `{name}` is matched with the name used as-is inside the pattern, so
/// names containing pattern syntax may match more or less than the literal
/// token. Names that do not form a valid pattern are skipped. Values are
/// inserted literally. Any `DATUM` entry in `values` is ignored; the date is
/// always `today`. `{UNTERSCHRIFT}` and unknown tokens stay in the output.
pub fn render_fields_on(
    content: &str,
    values: &BTreeMap<String, String>,
    today: NaiveDate,
) -> String {
    let mut result = content.to_string();

    for (field, value) in values {
        if field == DATE_FIELD {
            continue;
        }
        match Regex::new(&format!(r"\{{{}\}}", field)) {
            Ok(re) => {
                result = re.replace_all(&result, NoExpand(value)).into_owned();
            }
            Err(e) => warn!("Skipping field {:?}: not a usable pattern ({})", field, e),
        }
    }

    result.replace(DATE_TOKEN, &format_date(today))
}
