//! Markdown drafts → blocks, by way of HTML and the block parser.

use pulldown_cmark::{Options, Parser, html};

use crate::block::Block;
use crate::parser;

/// Strip YAML frontmatter from the beginning of markdown content
fn strip_frontmatter(markdown: &str) -> &str {
    let Some(rest) = markdown.strip_prefix("---") else {
        return markdown;
    };
    match rest.find("\n---") {
        Some(end) => rest[end + 4..].trim_start_matches(['\r', '\n']),
        None => markdown,
    }
}

/// Render markdown to HTML. Tables stay disabled: a two-cell table would
/// otherwise come back as a columns block.
pub fn markdown_to_html(markdown: &str) -> String {
    let markdown = strip_frontmatter(markdown);
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let mut out = String::new();
    html::push_html(&mut out, Parser::new_ext(markdown, options));
    out
}

pub fn markdown_to_blocks(markdown: &str) -> Vec<Block> {
    let html = markdown_to_html(markdown);
    tracing::debug!(bytes = html.len(), "rendered markdown");
    parser::parse(&html)
}
