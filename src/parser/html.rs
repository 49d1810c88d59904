//! Legacy schedule-page parsing.
//!
//! Older events only publish their schedule as an HTML table of paired
//! rows. The markup is stable enough that tailored string scanning
//! beats a full DOM parser: one `runTable`, a `tbody`, and `tr`/`td`
//! blocks that never nest.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;

use crate::duration::Duration;
use crate::error::Error;
use crate::model::{Run, Talent, UNKNOWN};
use crate::parser::split_names;

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

/// Parse the legacy schedule page into runs, in source row order.
///
/// Rows come in pairs: the first row of a pair carries start time,
/// title, runners and setup length; the second carries the estimate,
/// a combined "category — platform" cell and the hosts.
pub fn parse_schedule(html: &str) -> Result<Vec<Run>, Error> {
    let table = slice_between_ci(html, r#"<table id="runtable""#, "</table>")
        .ok_or(Error::MissingSchedule)?;
    let body = slice_between_ci(table, "<tbody", "</tbody>").ok_or(Error::MissingSchedule)?;

    let rows: Vec<Vec<String>> = tag_inners(body, "tr")
        .iter()
        .map(|row| tag_inners(row, "td").iter().map(|cell| cell_text(cell)).collect())
        .collect();

    if rows.len() < 2 {
        return Err(Error::MissingSchedule);
    }
    if rows.len() % 2 != 0 {
        return Err(Error::InvalidSchedule);
    }

    rows.chunks(2).map(|pair| run_from_rows(&pair[0], &pair[1])).collect()
}

fn run_from_rows(first: &[String], second: &[String]) -> Result<Run, Error> {
    if first.len() < 4 || second.len() < 3 {
        return Err(Error::UnexpectedData);
    }

    let (category, platform) = split_category_platform(&second[1]);

    Ok(Run {
        start: parse_start(&first[0]),
        title: first[1].clone(),
        runners: split_names(&first[2]).into_iter().map(Talent::named).collect(),
        setup: Duration::from_hms(&first[3]),
        estimate: Duration::from_hms(&second[0]),
        category,
        platform,
        hosts: split_names(&second[2]),
        commentators: Vec::new(),
    })
}

/// Strict RFC 3339; anything else degrades to the epoch rather than
/// failing the row.
fn parse_start(cell: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(cell.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_default()
}

/// Split the combined "category — platform" cell on its em dash. A
/// cell that does not yield exactly two non-empty halves falls back to
/// the "unknown" sentinel, independently per side.
fn split_category_platform(cell: &str) -> (String, String) {
    let mut category = UNKNOWN.to_string();
    let mut platform = UNKNOWN.to_string();

    let halves: Vec<&str> = cell.split('—').collect();
    if halves.len() == 2 {
        let c = halves[0].trim();
        if !c.is_empty() {
            category = c.to_string();
        }
        let p = halves[1].trim();
        if !p.is_empty() {
            platform = p.to_string();
        }
    }

    (category, platform)
}

// ── HTML scanning helpers ──
//
// Case-insensitive on ASCII tag names, which is all this page uses.
// `to_ascii_lowercase` keeps byte offsets aligned with the original.

/// Inner content between the first `open_pat…>` and the following
/// `close_pat`. `open_pat` may stop mid-tag so attribute variants
/// still match.
fn slice_between_ci<'a>(s: &'a str, open_pat: &str, close_pat: &str) -> Option<&'a str> {
    let lower = s.to_ascii_lowercase();
    let open = lower.find(&open_pat.to_ascii_lowercase())?;
    let after_open = open + s[open..].find('>')? + 1;
    let close = after_open + lower[after_open..].find(&close_pat.to_ascii_lowercase())?;
    Some(&s[after_open..close])
}

/// Inner content of every `<tag …>…</tag>` block in `s`, in order.
/// Assumes the blocks do not nest, which holds for `tr` and `td`.
fn tag_inners<'a>(s: &'a str, tag: &str) -> Vec<&'a str> {
    let lower = s.to_ascii_lowercase();
    let open = format!("<{tag}");
    let close = format!("</{tag}");

    let mut out = Vec::new();
    let mut pos = 0;
    while let Some(found) = lower[pos..].find(&open) {
        let start = pos + found;
        let Some(gt) = s[start..].find('>') else { break };
        let inner_start = start + gt + 1;
        let Some(end) = lower[inner_start..].find(&close) else { break };
        out.push(&s[inner_start..inner_start + end]);
        pos = inner_start + end + close.len();
    }
    out
}

/// Cell content as text: nested tags dropped, entities decoded,
/// whitespace collapsed and trimmed.
fn cell_text(inner: &str) -> String {
    let no_tags = TAG_RE.replace_all(inner, " ");
    collapse_ws(&decode_entities(&no_tags))
}

/// The entities the schedule page actually emits, plus decimal numeric
/// references. Unknown entities pass through untouched.
fn decode_entities(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];

        // the longest entity this page emits is 8 bytes inside &…;
        let semi = match rest.find(';') {
            Some(i) if i <= 8 => i,
            _ => {
                out.push('&');
                rest = &rest[1..];
                continue;
            }
        };

        let entity = &rest[1..semi];
        let decoded = match entity {
            "amp" => Some('&'),
            "nbsp" => Some(' '),
            "mdash" => Some('—'),
            "ndash" => Some('–'),
            "quot" => Some('"'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            _ if entity.starts_with('#') => {
                entity[1..].parse::<u32>().ok().and_then(char::from_u32)
            }
            _ => None,
        };

        match decoded {
            Some(c) => {
                out.push(c);
                rest = &rest[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn collapse_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ── Tests ──
