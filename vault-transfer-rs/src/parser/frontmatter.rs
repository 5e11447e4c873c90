//! YAML frontmatter parsing and tag edits.

use crate::error::{Result, TransferError};
use serde_yaml::{Mapping, Value};
use std::path::Path;

const TAGS_KEY: &str = "tags";

/// A note split into its frontmatter and body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontmatterSplit<'a> {
    /// The raw YAML string, without delimiters.
    pub yaml: Option<&'a str>,
    /// Everything after the closing delimiter line.
    pub body: &'a str,
}

/// Split content into frontmatter and body.
///
/// Frontmatter must open on the first line with `---` and close with a line
/// holding only `---`.
pub fn split_frontmatter(content: &str) -> FrontmatterSplit<'_> {
    let no_frontmatter = FrontmatterSplit {
        yaml: None,
        body: content,
    };

    let Some(rest) = content
        .strip_prefix("---\n")
        .or_else(|| content.strip_prefix("---\r\n"))
    else {
        return no_frontmatter;
    };
    let yaml_start = content.len() - rest.len();

    let mut offset = yaml_start;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(['\r', '\n']) == "---" {
            let yaml_end = offset.saturating_sub(1).max(yaml_start);
            let yaml = content[yaml_start..yaml_end].trim_end_matches('\r');
            return FrontmatterSplit {
                yaml: Some(yaml),
                body: &content[offset + line.len()..],
            };
        }
        offset += line.len();
    }

    no_frontmatter
}

/// Parse the frontmatter of a note into a mapping.
///
/// Returns `None` when the note has no frontmatter. Empty frontmatter parses
/// as an empty mapping.
pub fn parse_frontmatter(content: &str, path: &Path) -> Result<Option<Mapping>> {
    let Some(yaml) = split_frontmatter(content).yaml else {
        return Ok(None);
    };
    if yaml.trim().is_empty() {
        return Ok(Some(Mapping::new()));
    }

    let invalid = |message: String| TransferError::InvalidFrontmatter {
        path: path.to_path_buf(),
        message,
    };
    match serde_yaml::from_str::<Value>(yaml).map_err(|e| invalid(e.to_string()))? {
        Value::Mapping(map) => Ok(Some(map)),
        Value::Null => Ok(Some(Mapping::new())),
        other => Err(invalid(format!("expected a mapping, found {:?}", other))),
    }
}

/// Render a mapping and a body back into note content.
///
/// An empty mapping drops the frontmatter block entirely.
pub fn render_frontmatter(map: &Mapping, body: &str) -> Result<String> {
    if map.is_empty() {
        return Ok(body.to_string());
    }
    let yaml = serde_yaml::to_string(map)?;
    Ok(format!("---\n{}---\n{}", yaml, body))
}

fn tag_matches(value: &Value, tag: &str) -> bool {
    value
        .as_str()
        .map(|v| v.trim().trim_start_matches('#').eq_ignore_ascii_case(tag))
        .unwrap_or(false)
}

/// Read the `tags` entry as a list of values.
///
/// Obsidian accepts a list or a comma/space separated string.
fn tag_list(map: &Mapping) -> Vec<Value> {
    match map.get(TAGS_KEY) {
        Some(Value::Sequence(seq)) => seq.clone(),
        Some(Value::String(s)) => s
            .split([',', ' '])
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(|t| Value::String(t.to_string()))
            .collect(),
        Some(Value::Null) | None => Vec::new(),
        Some(other) => vec![other.clone()],
    }
}

/// Add a tag to the `tags` list unless already present.
///
/// Returns whether the mapping changed.
pub fn add_tag(map: &mut Mapping, tag: &str) -> bool {
    let mut tags = tag_list(map);
    if tags.iter().any(|t| tag_matches(t, tag)) {
        return false;
    }

    tags.push(Value::String(tag.to_string()));
    map.insert(Value::String(TAGS_KEY.to_string()), Value::Sequence(tags));
    true
}

/// Remove every instance of a tag from the `tags` list.
///
/// The key is dropped when no tags remain. Returns whether the mapping changed.
pub fn remove_tag(map: &mut Mapping, tag: &str) -> bool {
    let mut tags = tag_list(map);
    let before = tags.len();
    tags.retain(|t| !tag_matches(t, tag));
    if tags.len() == before {
        return false;
    }

    if tags.is_empty() {
        map.remove(TAGS_KEY);
    } else {
        map.insert(Value::String(TAGS_KEY.to_string()), Value::Sequence(tags));
    }
    true
}
