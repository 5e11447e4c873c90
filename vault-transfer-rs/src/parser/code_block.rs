//! Code span detection, so links inside code are ignored.

use regex::Regex;
use std::sync::LazyLock;

/// A byte range covered by a fenced block or inline code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeRange {
    /// Start byte offset (inclusive).
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
    pub fenced: bool,
}

// An opening or closing fence: ``` or ~~~, optionally indented up to 3 spaces
static FENCE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^ {0,3}(`{3,}|~{3,})").unwrap());

// Inline code: a run of backticks, content, and the same run again
static INLINE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"``[^\n]+?``|`[^`\n]+`").unwrap());

/// Find all code ranges in content.
pub fn find_code_ranges(content: &str) -> Vec<CodeRange> {
    let mut ranges = Vec::new();

    // (fence char, fence length, block start)
    let mut open: Option<(char, usize, usize)> = None;
    let mut offset = 0;

    for line in content.split_inclusive('\n') {
        let line_start = offset;
        offset += line.len();

        let Some(caps) = FENCE.captures(line) else {
            continue;
        };
        let fence = &caps[1];
        let fence_char = fence.chars().next().unwrap_or('`');

        match open {
            None => open = Some((fence_char, fence.len(), line_start)),
            Some((ch, len, start)) => {
                let closes = fence_char == ch
                    && fence.len() >= len
                    && line[caps.get(0).map_or(0, |m| m.end())..].trim().is_empty();
                if closes {
                    ranges.push(CodeRange {
                        start,
                        end: offset,
                        fenced: true,
                    });
                    open = None;
                }
            }
        }
    }

    // An unclosed fence runs to the end of the document
    if let Some((_, _, start)) = open {
        ranges.push(CodeRange {
            start,
            end: content.len(),
            fenced: true,
        });
    }

    let fenced: Vec<CodeRange> = ranges.clone();
    for m in INLINE_CODE.find_iter(content) {
        if fenced.iter().any(|r| m.start() < r.end && m.end() > r.start) {
            continue;
        }
        ranges.push(CodeRange {
            start: m.start(),
            end: m.end(),
            fenced: false,
        });
    }

    ranges.sort_by_key(|r| r.start);
    ranges
}

/// Check if a byte offset falls inside any code range.
pub fn is_in_code(offset: usize, ranges: &[CodeRange]) -> bool {
    ranges.iter().any(|r| offset >= r.start && offset < r.end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fenced_block() {
        let content = "Some text\n\n```rust\nlet x = [[not a link]];\n```\n\nMore text";
        let ranges = find_code_ranges(content);
        assert_eq!(ranges.len(), 1);
        assert!(ranges[0].fenced);
        assert!(is_in_code(content.find("[[").unwrap(), &ranges));
        assert!(!is_in_code(content.find("More").unwrap(), &ranges));
    }

    #[test]
    fn test_tilde_fence_and_backtick_fence() {
        let content = "```\nouter\n```\n\ntext\n\n~~~\ninner\n~~~";
        let ranges = find_code_ranges(content);
        assert_eq!(ranges.len(), 2);
    }

    #[test]
    fn test_unclosed_fence_runs_to_end() {
        let content = "intro\n```\n![[hidden.png]]\n";
        let ranges = find_code_ranges(content);
        assert_eq!(ranges.len(), 1);
        assert_eq!(ranges[0].end, content.len());
    }

    #[test]
    fn test_inline_code() {
        let content = "before `code [[x]]` after";
        let ranges = find_code_ranges(content);
        assert_eq!(ranges.len(), 1);
        assert!(!ranges[0].fenced);
        assert!(!is_in_code(0, &ranges));
        assert!(is_in_code(8, &ranges));
        assert!(!is_in_code(20, &ranges));
    }

    #[test]
    fn test_double_backtick_inline() {
        let content = "Some ``inline `code` with backticks`` here";
        let ranges = find_code_ranges(content);
        assert_eq!(ranges.len(), 1);
    }
}
