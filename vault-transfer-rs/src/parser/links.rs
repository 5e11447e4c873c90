//! Wikilink, embed and markdown link parsing.

use crate::parser::code_block::{find_code_ranges, is_in_code};
use crate::types::{Link, LinkSyntax};
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

// (!)?                     - Optional ! for embeds (group 1)
// \[\[                     - Opening [[
// ([^\]\|#]+)              - Target path (group 2)
// (?:#\^([a-zA-Z0-9_-]+))? - Block reference (group 3)
// (?:#([^\]\|]+))?         - Heading reference (group 4)
// (?:\|([^\]]+))?          - Alias (group 5)
// \]\]                     - Closing ]]
static WIKILINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(!?)\[\[([^\]\|#]+)(?:#\^([a-zA-Z0-9_-]+))?(?:#([^\]\|]+))?(?:\|([^\]]+))?\]\]")
        .unwrap()
});

// ![alt](target "title") or [text](<target with spaces>)
static MARKDOWN_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(!?)\[([^\]\n]*)\]\(\s*(?:<([^>\n]+)>|([^)\s]+))(?:\s+"[^"\n]*")?\s*\)"#)
        .unwrap()
});

// Anything with a URI scheme points outside the vault
static URL_SCHEME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.-]*:").unwrap());

fn position(content: &str, start: usize, end: usize) -> (usize, usize, usize) {
    let line = content[..start].matches('\n').count() + 1;
    let line_start = content[..start].rfind('\n').map(|i| i + 1).unwrap_or(0);
    (line, start - line_start, end - line_start)
}

/// Split `path#heading` or `path#^block` into its parts.
fn split_fragment(raw: &str) -> (String, Option<String>, Option<String>) {
    match raw.split_once('#') {
        Some((path, fragment)) => match fragment.strip_prefix('^') {
            Some(block) => (path.to_string(), None, Some(block.to_string())),
            None => (path.to_string(), Some(fragment.to_string()), None),
        },
        None => (raw.to_string(), None, None),
    }
}

/// Parse all wikilinks and embeds from content.
pub fn parse_wikilinks(content: &str) -> Vec<Link> {
    let code_ranges = find_code_ranges(content);
    let mut links = Vec::new();

    for cap in WIKILINK.captures_iter(content) {
        let Some(full) = cap.get(0) else { continue };
        if is_in_code(full.start(), &code_ranges) {
            continue;
        }

        let (line, start_col, end_col) = position(content, full.start(), full.end());
        links.push(Link {
            target: cap.get(2).map(|m| m.as_str().trim()).unwrap_or("").to_string(),
            alias: cap.get(5).map(|m| m.as_str().to_string()),
            heading: cap.get(4).map(|m| m.as_str().to_string()),
            block_id: cap.get(3).map(|m| m.as_str().to_string()),
            embed: cap.get(1).is_some_and(|m| !m.as_str().is_empty()),
            syntax: LinkSyntax::Wiki,
            line,
            start_col,
            end_col,
        });
    }

    links
}

/// Parse markdown links and images that point inside the vault.
///
/// External URLs are skipped and percent-encoded targets are decoded.
pub fn parse_markdown_links(content: &str) -> Vec<Link> {
    let code_ranges = find_code_ranges(content);
    let mut links = Vec::new();

    for cap in MARKDOWN_LINK.captures_iter(content) {
        let Some(full) = cap.get(0) else { continue };
        if is_in_code(full.start(), &code_ranges) {
            continue;
        }

        let Some(raw) = cap.get(3).or_else(|| cap.get(4)).map(|m| m.as_str().trim()) else {
            continue;
        };
        if raw.is_empty() || raw.starts_with('#') || URL_SCHEME.is_match(raw) {
            continue;
        }

        let decoded = urlencoding::decode(raw)
            .map(|d| d.into_owned())
            .unwrap_or_else(|_| raw.to_string());
        let (target, heading, block_id) = split_fragment(&decoded);

        let (line, start_col, end_col) = position(content, full.start(), full.end());
        let text = cap.get(2).map(|m| m.as_str()).unwrap_or("");
        links.push(Link {
            target,
            alias: (!text.is_empty()).then(|| text.to_string()),
            heading,
            block_id,
            embed: cap.get(1).is_some_and(|m| !m.as_str().is_empty()),
            syntax: LinkSyntax::Markdown,
            line,
            start_col,
            end_col,
        });
    }

    links
}

/// Parse every link and embed in content, in document order.
pub fn parse_all_links(content: &str) -> Vec<Link> {
    let mut links = parse_wikilinks(content);
    links.extend(parse_markdown_links(content));
    links.sort_by_key(|l| (l.line, l.start_col));
    links
}

/// The distinct link targets of a note, fragments included.
///
/// This is the union of embeds and links, in first-seen order.
pub fn linked_targets(content: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    parse_all_links(content)
        .into_iter()
        .map(|link| link.full_target())
        .filter(|target| seen.insert(target.clone()))
        .collect()
}

/// Strip a `#heading` or `#^block` suffix from a link.
pub fn strip_fragment(link: &str) -> &str {
    link.split('#').next().unwrap_or(link).trim()
}
