//! Parsers for Obsidian markdown syntax.

pub mod code_block;
pub mod frontmatter;
pub mod links;

pub use code_block::{find_code_ranges, CodeRange};
pub use frontmatter::{
    add_tag, parse_frontmatter, remove_tag, render_frontmatter, split_frontmatter,
};
pub use links::{linked_targets, parse_all_links, parse_markdown_links, parse_wikilinks, strip_fragment};
