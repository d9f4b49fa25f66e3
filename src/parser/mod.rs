//! Best-effort HTML → block parser.
//!
//! Every fragment that no rule recognizes becomes a text block holding the
//! fragment's markup, so content is never dropped. Parsing is not the exact
//! inverse of serialization.

#[cfg(feature = "html-parser")]
mod dom;
#[cfg(feature = "html-parser")]
mod rules;
#[cfg_attr(not(feature = "html-parser"), allow(dead_code))]
mod style;

use crate::block::{Align, Block, BlockId, Text};

#[cfg(feature = "html-parser")]
use crate::block::ColumnBlock;
#[cfg(feature = "html-parser")]
use markup5ever_rcdom::Handle;

/// Parse HTML into blocks. Empty or whitespace-only input gives no blocks;
/// anything else gives at least one.
pub fn parse(html: &str) -> Vec<Block> {
    if html.trim().is_empty() {
        return Vec::new();
    }

    let blocks = parse_markup(html);
    if blocks.is_empty() {
        tracing::debug!("no blocks recognized, wrapping raw input");
        return vec![Block::Text(raw_text(html))];
    }
    blocks
}

#[cfg(not(feature = "html-parser"))]
fn parse_markup(_html: &str) -> Vec<Block> {
    // Without a DOM the raw input is kept as one text block.
    Vec::new()
}

#[cfg(feature = "html-parser")]
fn parse_markup(html: &str) -> Vec<Block> {
    let dom = dom::parse_wrapped(html);
    let nodes = dom::top_level_nodes(&dom);
    nodes
        .iter()
        .filter(|node| !dom::is_ignorable(node))
        .map(classify)
        .collect()
}

#[cfg(feature = "html-parser")]
fn classify(node: &Handle) -> Block {
    for rule in rules::RULES {
        if (rule.matches)(node) {
            tracing::debug!(rule = rule.name, "classified node");
            return (rule.build)(node);
        }
    }
    tracing::debug!(
        tag = dom::tag_name(node).unwrap_or("#node"),
        "unrecognized node, keeping markup"
    );
    Block::Text(fallback_text(node))
}

/// Blocks of one columns zone. A nested columns shape degrades to text.
#[cfg(feature = "html-parser")]
fn parse_zone(cell: &Handle) -> Vec<ColumnBlock> {
    dom::children(cell)
        .iter()
        .filter(|node| !dom::is_ignorable(node))
        .map(|node| match ColumnBlock::try_from(classify(node)) {
            Ok(block) => block,
            Err(nested) => {
                tracing::debug!(id = %nested.id, "nested columns in a zone, keeping markup");
                ColumnBlock::Text(fallback_text(node))
            }
        })
        .collect()
}

#[cfg(feature = "html-parser")]
fn fallback_text(node: &Handle) -> Text {
    let align = match dom::tag_name(node) {
        Some("p" | "div" | "ul" | "ol") => rules::read_align(node),
        _ => Align::Left,
    };
    Text {
        id: BlockId::generate(),
        html: dom::outer_html(node),
        align,
    }
}

fn raw_text(html: &str) -> Text {
    Text {
        id: BlockId::generate(),
        html: html.to_string(),
        align: Align::Left,
    }
}

#[cfg(all(test, feature = "html-parser"))]
mod tests {
    use super::*;
    use crate::block::{Button, Columns, HeadingLevel, IconStyle, SocialLink};

    fn only(html: &str) -> Block {
        let mut blocks = parse(html);
        assert_eq!(blocks.len(), 1, "expected one block for {html:?}: {blocks:?}");
        blocks.remove(0)
    }

    fn text_of(block: &Block) -> (&str, Align) {
        match block {
            Block::Text(t) => (t.html.as_str(), t.align),
            other => panic!("expected text block, got {other:?}"),
        }
    }

    #[test]
    fn heading_and_paragraph() {
        let blocks = parse("<h1>Hello</h1><p>World</p>");
        assert_eq!(blocks.len(), 2);
        match &blocks[0] {
            Block::Heading(h) => {
                assert_eq!(h.level, HeadingLevel::H1);
                assert_eq!(h.text, "Hello");
                assert_eq!(h.align, Align::Left);
            }
            other => panic!("expected heading, got {other:?}"),
        }
        assert_eq!(text_of(&blocks[1]), ("<p>World</p>", Align::Left));
    }

    #[test]
    fn empty_and_whitespace_input() {
        assert!(parse("").is_empty());
        assert!(parse("   ").is_empty());
        assert!(parse("\n\t ").is_empty());
    }

    #[test]
    fn unrecognized_div_keeps_outer_html() {
        let html = r#"<div class="weird-widget">unrecognized</div>"#;
        assert_eq!(text_of(&only(html)), (html, Align::Left));
    }

    #[test]
    fn attribute_quoting_is_normalized() {
        let block = only("<div class='weird-widget'>unrecognized</div>");
        assert_eq!(
            text_of(&block).0,
            r#"<div class="weird-widget">unrecognized</div>"#
        );
    }

    #[test]
    fn bare_text_becomes_escaped_paragraph() {
        let block = only("  Hello & welcome  ");
        assert_eq!(text_of(&block), ("<p>Hello &amp; welcome</p>", Align::Left));
    }

    #[test]
    fn spacer_height() {
        let block = only(
            r#"<div style="height: 40px; line-height: 40px; font-size: 1px;">&nbsp;</div>"#,
        );
        assert!(matches!(block, Block::Spacer(ref s) if s.height == 40));

        let block = only(r#"<div style="height: auto"></div>"#);
        assert!(matches!(block, Block::Spacer(ref s) if s.height == 24));
    }

    #[test]
    fn heading_alignment_and_levels() {
        match only(r#"<h2 align="center">Hi <em>there</em></h2>"#) {
            Block::Heading(h) => {
                assert_eq!(h.level, HeadingLevel::H2);
                assert_eq!(h.align, Align::Center);
                assert_eq!(h.text, "Hi <em>there</em>");
            }
            other => panic!("expected heading, got {other:?}"),
        }
        // Only three heading levels exist.
        assert_eq!(text_of(&only("<h4>Small</h4>")), ("<h4>Small</h4>", Align::Left));
    }

    #[test]
    fn divider_and_whitespace_between_blocks() {
        let blocks = parse("<hr>\n\n<hr />");
        assert_eq!(blocks.len(), 2);
        assert!(blocks.iter().all(|b| matches!(b, Block::Divider(_))));
    }

    #[test]
    fn blockquote_has_no_attribution() {
        match only("<blockquote>\n  Be bold.\n</blockquote>") {
            Block::Quote(q) => {
                assert_eq!(q.text, "Be bold.");
                assert_eq!(q.attribution, "");
            }
            other => panic!("expected quote, got {other:?}"),
        }
    }

    #[test]
    fn table_with_anchor_is_a_button() {
        let html = r##"<table><tr><td align="right"><a href="https://x.com/?a=1&amp;b=2" style="background-color: #111; color: #eee">Go</a></td></tr></table>"##;
        match only(html) {
            Block::Button(Button {
                text,
                url,
                align,
                bg_color,
                text_color,
                ..
            }) => {
                assert_eq!(text, "Go");
                assert_eq!(url, "https://x.com/?a=1&b=2");
                assert_eq!(align, Align::Right);
                assert_eq!(bg_color.as_deref(), Some("#111"));
                assert_eq!(text_color.as_deref(), Some("#eee"));
            }
            other => panic!("expected button, got {other:?}"),
        }
    }

    #[test]
    fn two_cell_table_is_columns() {
        match only("<table><tr><td><h1>L</h1></td><td><p>R</p> </td></tr></table>") {
            Block::Columns(Columns { left, right, .. }) => {
                assert_eq!(left.len(), 1);
                assert!(matches!(&left[0], ColumnBlock::Heading(h) if h.text == "L"));
                assert_eq!(right.len(), 1);
                assert!(matches!(&right[0], ColumnBlock::Text(t) if t.html == "<p>R</p>"));
            }
            other => panic!("expected columns, got {other:?}"),
        }
    }

    #[test]
    fn two_cell_table_with_button_anchor_is_a_button() {
        let html = r#"<table><tr><td>Left</td><td><a href="/buy" style="padding: 12px">Buy</a></td></tr></table>"#;
        assert!(matches!(only(html), Block::Button(b) if b.text == "Buy"));
    }

    #[test]
    fn nested_columns_degrade_to_text() {
        let html = "<table><tr><td><table><tr><td>a</td><td>b</td></tr></table></td><td>x</td></tr></table>";
        match only(html) {
            Block::Columns(Columns { left, right, .. }) => {
                assert!(matches!(
                    &left[..],
                    [ColumnBlock::Text(t)]
                        if t.html == "<table><tbody><tr><td>a</td><td>b</td></tr></tbody></table>"
                ));
                assert!(matches!(&right[..], [ColumnBlock::Text(t)] if t.html == "<p>x</p>"));
            }
            other => panic!("expected columns, got {other:?}"),
        }
    }

    #[test]
    fn plain_table_falls_back() {
        let block = only("<table><tr><td>only</td></tr></table>");
        assert_eq!(
            text_of(&block),
            ("<table><tbody><tr><td>only</td></tr></tbody></table>", Align::Left)
        );
    }

    #[test]
    fn social_icons_are_recognized() {
        let html = concat!(
            r#"<div style="text-align: center">"#,
            r#"<a href="https://facebook.com/acme"><img src="https://cdn.example.com/icons/social/grey/facebook.png"></a>"#,
            r#"<a href="https://x.com/acme"><img src="/icons/social/grey/x.png"></a>"#,
            "</div>"
        );
        match only(html) {
            Block::Social(s) => {
                assert_eq!(s.align, Align::Center);
                assert_eq!(s.icon_style, IconStyle::Grey);
                assert_eq!(
                    s.links,
                    vec![
                        SocialLink::new("facebook", "https://facebook.com/acme"),
                        SocialLink::new("x", "https://x.com/acme"),
                    ]
                );
            }
            other => panic!("expected social, got {other:?}"),
        }
    }

    #[test]
    fn unparseable_social_icons_use_default_links() {
        let html = r##"<div><a href="#"><img src="/img/social/a.gif"></a><a href="#"><img src="/img/social/b.gif"></a></div>"##;
        match only(html) {
            Block::Social(s) => {
                assert_eq!(s.links, crate::palette::default_social_links());
                assert_eq!(s.icon_style, IconStyle::Color);
            }
            other => panic!("expected social, got {other:?}"),
        }
    }

    #[test]
    fn images() {
        match only(r#"<img src="a.png" alt="A">"#) {
            Block::Image(i) => {
                assert_eq!(i.src, "a.png");
                assert_eq!(i.alt, "A");
                assert_eq!(i.width, None);
            }
            other => panic!("expected image, got {other:?}"),
        }

        let html = r#"<div style="text-align: right"><img src="b.png" style="width: 80%; max-width: 400px"></div>"#;
        match only(html) {
            Block::Image(i) => {
                assert_eq!(i.align, Align::Right);
                assert_eq!(i.alt, "");
                assert_eq!(i.width, Some(80));
                assert_eq!(i.max_width, Some(400));
            }
            other => panic!("expected image, got {other:?}"),
        }
    }

    #[test]
    fn wrapped_paragraph_with_image_stays_text() {
        let html = r#"<div style="text-align: left;"><p><img src="a.png" alt="A"></p></div>"#;
        assert_eq!(
            text_of(&only(html)),
            (r#"<p><img src="a.png" alt="A"></p>"#, Align::Left)
        );
    }

    #[test]
    fn linked_thumbnail_stays_text() {
        let html = r#"<div style="text-align: center;"><a href="v.mp4"><img src="t.png"></a></div>"#;
        let block = only(html);
        let (inner, align) = text_of(&block);
        assert_eq!(inner, r#"<a href="v.mp4"><img src="t.png"></a>"#);
        assert_eq!(align, Align::Center);
    }

    #[test]
    fn template_content_is_kept() {
        let block = only("<template>x</template>");
        assert_eq!(text_of(&block).0, "<template>x</template>");
    }

    #[test]
    fn unclosed_plaintext_does_not_swallow_markup() {
        let block = only("<plaintext>abc");
        let (html, _) = text_of(&block);
        assert_eq!(html, "<plaintext>abc</plaintext>");
    }

    #[test]
    fn columns_holding_a_button_parse_as_that_button() {
        let columns = Block::Columns(Columns {
            id: BlockId::new("c"),
            left: vec![ColumnBlock::Button(Button {
                id: BlockId::new("b"),
                text: "Go".to_string(),
                url: "https://example.com".to_string(),
                align: Align::Center,
                bg_color: None,
                text_color: None,
            })],
            right: vec![ColumnBlock::Text(Text {
                id: BlockId::new("t"),
                html: "<p>Side note</p>".to_string(),
                align: Align::Left,
            })],
        });
        let html = crate::serialize(&[columns]);
        match only(&html) {
            Block::Button(b) => {
                assert_eq!(b.text, "Go");
                assert_eq!(b.url, "https://example.com");
            }
            other => panic!("expected button, got {other:?}"),
        }
    }

    #[test]
    fn div_with_text_and_image_is_text() {
        let html = r#"<div>Caption <img src="c.png"></div>"#;
        assert_eq!(text_of(&only(html)), (html, Align::Left));
    }

    #[test]
    fn lists_keep_alignment() {
        let html = r#"<ul style="text-align: center"><li>x</li></ul>"#;
        assert_eq!(text_of(&only(html)), (html, Align::Center));
    }

    #[test]
    fn text_wrapper_is_unwrapped() {
        let block = only(r#"<div style="text-align: right;"><p>x</p><p>y</p></div>"#);
        assert_eq!(text_of(&block), ("<p>x</p><p>y</p>", Align::Right));
    }

    #[test]
    fn other_elements_fall_back_left_aligned() {
        let html = r#"<span style="text-align: right">inline</span>"#;
        assert_eq!(text_of(&only(html)), (html, Align::Left));
    }

    #[test]
    fn comments_are_kept() {
        assert_eq!(text_of(&only("<!-- keep -->")).0, "<!-- keep -->");
    }

    #[test]
    fn nothing_recognized_wraps_raw_input() {
        assert_eq!(text_of(&only("</div>")), ("</div>", Align::Left));
        assert_eq!(text_of(&only("<!DOCTYPE html>")).0, "<!DOCTYPE html>");
    }

    #[test]
    fn parsed_ids_are_unique() {
        let blocks = parse("<h1>a</h1><p>b</p><hr><p>c</p>");
        let mut ids: Vec<_> = blocks.iter().map(|b| b.id().clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 4);
    }
}
