//! `{{FORMAT}}` date variables in output paths.

use crate::config::{DateKind, DateVariable};
use crate::host::VaultHost;
use crate::types::NoteRef;
use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;
use serde_yaml::Value;
use std::sync::LazyLock;

static DATE_VARIABLE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{\{([^}]+)\}\}").unwrap());

// Longest tokens first so `MMMM` wins over `MM`
const TOKENS: &[(&str, &str)] = &[
    ("YYYY", "%Y"),
    ("YY", "%y"),
    ("MMMM", "%B"),
    ("MMM", "%b"),
    ("MM", "%m"),
    ("M", "%-m"),
    ("DD", "%d"),
    ("D", "%-d"),
    ("dddd", "%A"),
    ("ddd", "%a"),
    ("HH", "%H"),
    ("H", "%-H"),
    ("mm", "%M"),
    ("ss", "%S"),
];

/// Whether a template contains any date variable.
pub fn has_date_variables(template: &str) -> bool {
    DATE_VARIABLE.is_match(template)
}

/// Format a date with moment-style tokens. Text in `[brackets]` is literal.
pub fn format_date(format: &str, date: &NaiveDateTime) -> String {
    let mut out = String::new();
    let mut rest = format;

    while let Some(c) = rest.chars().next() {
        if c == '[' {
            if let Some(end) = rest.find(']') {
                out.push_str(&rest[1..end]);
                rest = &rest[end + 1..];
                continue;
            }
        }

        if let Some((token, spec)) = TOKENS.iter().find(|(token, _)| rest.starts_with(token)) {
            out.push_str(&date.format(spec).to_string());
            rest = &rest[token.len()..];
        } else {
            out.push(c);
            rest = &rest[c.len_utf8()..];
        }
    }

    out
}

/// Replace every `{{FORMAT}}` in a template with the formatted date.
pub fn expand_date_variables(template: &str, date: &NaiveDateTime) -> String {
    DATE_VARIABLE
        .replace_all(template, |caps: &regex::Captures| format_date(caps[1].trim(), date))
        .into_owned()
}

/// Parse a frontmatter date value.
pub fn parse_date_value(value: &Value) -> Option<NaiveDateTime> {
    let raw = value.as_str()?.trim();

    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn file_date<H: VaultHost + ?Sized>(host: &H, note: &NoteRef, kind: DateKind) -> Option<NaiveDateTime> {
    let times = host.file_times(&note.path).ok()?;
    match kind {
        DateKind::Modification => times.modified.or(times.created),
        DateKind::Creation | DateKind::Frontmatter => times.created.or(times.modified),
    }
}

/// The date used for a note's date variables.
///
/// Falls back from the frontmatter key to the configured file date, and
/// finally to the current time.
pub fn note_date<H: VaultHost + ?Sized>(
    host: &H,
    note: &NoteRef,
    settings: &DateVariable,
) -> NaiveDateTime {
    let date = match settings.kind {
        DateKind::Frontmatter => host
            .frontmatter(&note.path)
            .ok()
            .flatten()
            .and_then(|fm| fm.get(settings.key()).and_then(parse_date_value))
            .or_else(|| {
                file_date(host, note, settings.fallback.unwrap_or(DateKind::Creation))
            }),
        kind => file_date(host, note, kind),
    };

    date.unwrap_or_else(|| chrono::Local::now().naive_local())
}
