use std::borrow::Cow;

use crate::block::{
    Block, Button, ColumnBlock, Columns, Heading, Image, Quote, Social, SocialLink, Spacer, Text,
    Video,
};
use crate::config::Config;

/// Shared attributes of every layout table.
const TABLE_OPEN: &str =
    r#"<table role="presentation" border="0" cellpadding="0" cellspacing="0" width="100%"><tr>"#;
const TABLE_CLOSE: &str = "</tr></table>";

const DIVIDER: &str =
    r#"<hr style="border: none; border-top: 1px solid #e5e5e5; margin: 16px 0;" />"#;

/// Platforms with a hosted icon, keyed by the lowercase platform name.
const SOCIAL_ICONS: &[(&str, &str)] = &[
    ("facebook", "Facebook"),
    ("instagram", "Instagram"),
    ("x", "X"),
    ("twitter", "Twitter"),
    ("linkedin", "LinkedIn"),
    ("youtube", "YouTube"),
    ("tiktok", "TikTok"),
    ("pinterest", "Pinterest"),
];

/// Convert blocks to email HTML, one block per line.
pub fn blocks_to_html(blocks: &[Block], config: &Config) -> String {
    let mut out = String::new();
    for (i, block) in blocks.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        emit_block(block, config, &mut out);
    }
    out
}

fn emit_block(block: &Block, config: &Config, out: &mut String) {
    match block {
        Block::Heading(b) => emit_heading(b, out),
        Block::Text(b) => emit_text(b, out),
        Block::Button(b) => emit_button(b, config, out),
        Block::Image(b) => emit_image(b, out),
        Block::Divider(_) => out.push_str(DIVIDER),
        Block::Spacer(b) => emit_spacer(b, out),
        Block::Social(b) => emit_social(b, config, out),
        Block::Columns(b) => emit_columns(b, config, out),
        Block::Quote(b) => emit_quote(b, config, out),
        Block::Video(b) => emit_video(b, out),
        Block::Html(b) => out.push_str(&b.code),
    }
}

fn emit_column_block(block: &ColumnBlock, config: &Config, out: &mut String) {
    match block {
        ColumnBlock::Heading(b) => emit_heading(b, out),
        ColumnBlock::Text(b) => emit_text(b, out),
        ColumnBlock::Button(b) => emit_button(b, config, out),
        ColumnBlock::Image(b) => emit_image(b, out),
        ColumnBlock::Divider(_) => out.push_str(DIVIDER),
        ColumnBlock::Spacer(b) => emit_spacer(b, out),
        ColumnBlock::Social(b) => emit_social(b, config, out),
        ColumnBlock::Quote(b) => emit_quote(b, config, out),
        ColumnBlock::Video(b) => emit_video(b, out),
        ColumnBlock::Html(b) => out.push_str(&b.code),
    }
}

fn emit_heading(heading: &Heading, out: &mut String) {
    let level = heading.level.number();
    out.push_str(&format!(
        r#"<h{level} style="text-align: {}; margin: 0 0 16px 0;">"#,
        heading.align.as_str()
    ));
    // Rich inline HTML; sanitizing is the caller's job.
    out.push_str(&heading.text);
    out.push_str(&format!("</h{level}>"));
}

fn emit_text(text: &Text, out: &mut String) {
    out.push_str(&format!(
        r#"<div style="text-align: {};">"#,
        text.align.as_str()
    ));
    out.push_str(&text.html);
    out.push_str("</div>");
}

fn emit_button(button: &Button, config: &Config, out: &mut String) {
    let background = button
        .bg_color
        .as_deref()
        .unwrap_or(&config.button.background);
    let color = button
        .text_color
        .as_deref()
        .unwrap_or(&config.button.color);

    out.push_str(TABLE_OPEN);
    out.push_str(&format!(
        r#"<td align="{}" style="padding: 8px 0;">"#,
        button.align.as_str()
    ));
    out.push_str(&format!(
        r#"<a href="{}" target="_blank" style="display: inline-block; background-color: {}; color: {}; padding: 12px 24px; border-radius: 6px; text-decoration: none; font-weight: 600;">{}</a>"#,
        escape(&button.url),
        escape(background),
        escape(color),
        escape(&button.text),
    ));
    out.push_str("</td>");
    out.push_str(TABLE_CLOSE);
}

fn emit_image(image: &Image, out: &mut String) {
    let mut style = String::new();
    if let Some(width) = image.width {
        style.push_str(&format!("width: {width}%; "));
    }
    match image.max_width {
        Some(max_width) => style.push_str(&format!("max-width: {max_width}px; ")),
        None => style.push_str("max-width: 100%; "),
    }
    style.push_str("height: auto; border: 0; display: inline-block;");

    out.push_str(&format!(
        r#"<div style="text-align: {};"><img src="{}" alt="{}" style="{}" /></div>"#,
        image.align.as_str(),
        escape(&image.src),
        escape(&image.alt),
        style,
    ));
}

fn emit_spacer(spacer: &Spacer, out: &mut String) {
    let h = spacer.height;
    out.push_str(&format!(
        r#"<div style="height: {h}px; line-height: {h}px; font-size: 1px;">&nbsp;</div>"#
    ));
}

fn emit_social(social: &Social, config: &Config, out: &mut String) {
    out.push_str(&format!(
        r#"<div style="text-align: {};">"#,
        social.align.as_str()
    ));
    for link in &social.links {
        emit_social_link(link, social, config, out);
    }
    out.push_str("</div>");
}

fn emit_social_link(link: &SocialLink, social: &Social, config: &Config, out: &mut String) {
    out.push_str(&format!(
        r#"<a href="{}" target="_blank" style="display: inline-block; margin: 0 4px;">"#,
        escape(&link.url)
    ));
    let key = link.platform.trim().to_ascii_lowercase();
    match SOCIAL_ICONS.iter().find(|(name, _)| *name == key) {
        Some((name, label)) => {
            let src = config.icon_url(social.icon_style.as_str(), name);
            out.push_str(&format!(
                r#"<img src="{}" alt="{}" width="32" height="32" style="display: block; border: 0;" />"#,
                escape(&src),
                label,
            ));
        }
        None => out.push_str(&escape(&link.platform)),
    }
    out.push_str("</a>");
}

fn emit_columns(columns: &Columns, config: &Config, out: &mut String) {
    out.push_str(TABLE_OPEN);
    out.push_str(r#"<td width="50%" valign="top" style="padding-right: 8px;">"#);
    emit_zone(&columns.left, config, out);
    out.push_str("</td>");
    out.push_str(r#"<td width="50%" valign="top" style="padding-left: 8px;">"#);
    emit_zone(&columns.right, config, out);
    out.push_str("</td>");
    out.push_str(TABLE_CLOSE);
}

fn emit_zone(blocks: &[ColumnBlock], config: &Config, out: &mut String) {
    for (i, block) in blocks.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        emit_column_block(block, config, out);
    }
}

fn emit_quote(quote: &Quote, config: &Config, out: &mut String) {
    out.push_str(TABLE_OPEN);
    out.push_str(&format!(
        r#"<td style="text-align: {}; border-left: 4px solid {}; padding: 8px 16px;">"#,
        quote.align.as_str(),
        escape(&config.quote.accent),
    ));
    out.push_str(&format!(
        r#"<blockquote style="margin: 0; font-style: italic;">{}</blockquote>"#,
        escape(&quote.text)
    ));
    if !quote.attribution.is_empty() {
        out.push_str(&format!(
            r#"<p style="margin: 8px 0 0 0; font-size: 14px; color: #6b7280;">&mdash; {}</p>"#,
            escape(&quote.attribution)
        ));
    }
    out.push_str("</td>");
    out.push_str(TABLE_CLOSE);
}

fn emit_video(video: &Video, out: &mut String) {
    // Email clients cannot play video: link a thumbnail instead.
    out.push_str(&format!(
        r#"<div style="text-align: {};"><a href="{}" target="_blank"><img src="{}" alt="{}" style="max-width: 100%; height: auto; border: 0; display: inline-block;" /></a></div>"#,
        video.align.as_str(),
        escape(&video.video_url),
        escape(&video.thumbnail_url),
        escape(&video.alt),
    ));
}

/// Escape `&`, `<`, `>` and `"` for text and attribute contexts.
pub(crate) fn escape(value: &str) -> Cow<'_, str> {
    if !value.contains(['&', '<', '>', '"']) {
        return Cow::Borrowed(value);
    }
    let mut escaped = String::with_capacity(value.len() + 8);
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    Cow::Owned(escaped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{Align, BlockId, Divider, HeadingLevel, IconStyle, RawHtml};

    fn render(blocks: &[Block]) -> String {
        blocks_to_html(blocks, &Config::default())
    }

    fn id(s: &str) -> BlockId {
        BlockId::new(s)
    }

    fn text(id_: &str, html: &str) -> Text {
        Text {
            id: id(id_),
            html: html.to_string(),
            align: Align::Left,
        }
    }

    #[test]
    fn divider() {
        assert_eq!(
            render(&[Block::Divider(Divider { id: id("a") })]),
            r#"<hr style="border: none; border-top: 1px solid #e5e5e5; margin: 16px 0;" />"#
        );
    }

    #[test]
    fn spacer() {
        let html = render(&[Block::Spacer(Spacer {
            id: id("s"),
            height: 40,
        })]);
        assert_eq!(
            html,
            r#"<div style="height: 40px; line-height: 40px; font-size: 1px;">&nbsp;</div>"#
        );
    }

    #[test]
    fn heading_keeps_inline_markup() {
        let html = render(&[Block::Heading(Heading {
            id: id("h"),
            level: HeadingLevel::H2,
            text: "Hello <strong>world</strong>".to_string(),
            align: Align::Center,
        })]);
        assert_eq!(
            html,
            r#"<h2 style="text-align: center; margin: 0 0 16px 0;">Hello <strong>world</strong></h2>"#
        );
    }

    #[test]
    fn text_is_not_escaped() {
        let html = render(&[Block::Text(text("t", "<p>A &amp; B</p>"))]);
        assert_eq!(html, r#"<div style="text-align: left;"><p>A &amp; B</p></div>"#);
    }

    #[test]
    fn button_uses_default_colors() {
        let html = render(&[Block::Button(Button {
            id: id("b"),
            text: "Shop now".to_string(),
            url: "https://shop.example.com/?a=1&b=2".to_string(),
            align: Align::Center,
            bg_color: None,
            text_color: None,
        })]);
        assert!(html.starts_with(TABLE_OPEN));
        assert!(html.contains(r#"<td align="center" style="padding: 8px 0;">"#));
        assert!(html.contains(r#"href="https://shop.example.com/?a=1&amp;b=2""#));
        assert!(html.contains("background-color: #2563eb; color: #ffffff;"));
        assert!(html.ends_with(">Shop now</a></td></tr></table>"));
    }

    #[test]
    fn button_url_cannot_break_out_of_href() {
        let html = render(&[Block::Button(Button {
            id: id("b"),
            text: "<b>Click</b>".to_string(),
            url: "\"><script>alert(1)</script>".to_string(),
            align: Align::Left,
            bg_color: Some("red".to_string()),
            text_color: Some("white".to_string()),
        })]);
        assert!(html.contains(r#"href="&quot;&gt;&lt;script&gt;alert(1)&lt;/script&gt;""#));
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;b&gt;Click&lt;/b&gt;</a>"));
        assert!(html.contains("background-color: red; color: white;"));
    }

    #[test]
    fn image_sizes() {
        let mut image = Image {
            id: id("i"),
            src: "https://img.example.com/a.png".to_string(),
            alt: "A \"quoted\" alt".to_string(),
            width: Some(50),
            max_width: Some(300),
            align: Align::Right,
        };
        assert_eq!(
            render(&[Block::Image(image.clone())]),
            r#"<div style="text-align: right;"><img src="https://img.example.com/a.png" alt="A &quot;quoted&quot; alt" style="width: 50%; max-width: 300px; height: auto; border: 0; display: inline-block;" /></div>"#
        );

        image.width = None;
        image.max_width = None;
        assert!(render(&[Block::Image(image)]).contains(
            r#"style="max-width: 100%; height: auto; border: 0; display: inline-block;""#
        ));
    }

    #[test]
    fn social_icons_and_unknown_platforms() {
        let config = Config::default().with_base_url("https://cdn.example.com/");
        let social = Block::Social(Social {
            id: id("s"),
            align: Align::Center,
            icon_style: IconStyle::Grey,
            links: vec![
                SocialLink::new("Facebook", "https://facebook.com/acme"),
                SocialLink::new("<Mastodon>", "https://mastodon.social/@acme"),
            ],
        });
        let html = blocks_to_html(&[social], &config);
        assert!(html.starts_with(r#"<div style="text-align: center;">"#));
        assert!(html.contains(
            r#"<img src="https://cdn.example.com/icons/social/grey/facebook.png" alt="Facebook" width="32" height="32""#
        ));
        assert!(html.contains(r#"margin: 0 4px;">&lt;Mastodon&gt;</a>"#));
        assert!(!html.contains("mastodon.png"));
    }

    #[test]
    fn columns_render_each_side_in_a_cell() {
        let columns = Block::Columns(Columns {
            id: id("c"),
            left: vec![
                ColumnBlock::Text(text("l1", "<p>L1</p>")),
                ColumnBlock::Divider(Divider { id: id("l2") }),
            ],
            right: vec![ColumnBlock::Text(text("r1", "<p>R</p>"))],
        });
        let expected = format!(
            "{TABLE_OPEN}<td width=\"50%\" valign=\"top\" style=\"padding-right: 8px;\"><div style=\"text-align: left;\"><p>L1</p></div>\n{DIVIDER}</td><td width=\"50%\" valign=\"top\" style=\"padding-left: 8px;\"><div style=\"text-align: left;\"><p>R</p></div></td>{TABLE_CLOSE}"
        );
        assert_eq!(render(&[columns]), expected);
    }

    #[test]
    fn quote_with_and_without_attribution() {
        let mut quote = Quote {
            id: id("q"),
            text: "Less is <more>".to_string(),
            attribution: "Mies & co".to_string(),
            align: Align::Left,
        };
        let html = render(&[Block::Quote(quote.clone())]);
        assert!(html.contains("border-left: 4px solid #e5e5e5;"));
        assert!(html.contains(">Less is &lt;more&gt;</blockquote>"));
        assert!(html.contains(">&mdash; Mies &amp; co</p>"));

        quote.attribution.clear();
        assert!(!render(&[Block::Quote(quote)]).contains("&mdash;"));
    }

    #[test]
    fn video_links_thumbnail() {
        let html = render(&[Block::Video(Video {
            id: id("v"),
            thumbnail_url: "https://img.example.com/thumb.jpg".to_string(),
            video_url: "https://video.example.com/watch?v=1".to_string(),
            alt: "Launch video".to_string(),
            align: Align::Center,
        })]);
        assert!(html.contains(r#"<a href="https://video.example.com/watch?v=1" target="_blank"><img src="https://img.example.com/thumb.jpg" alt="Launch video""#));
        assert!(!html.contains("<video"));
    }

    #[test]
    fn raw_html_passes_through() {
        let code = "<table><tr><td>{{ unsubscribe }}</td></tr></table>";
        let html = render(&[Block::Html(RawHtml {
            id: id("x"),
            code: code.to_string(),
        })]);
        assert_eq!(html, code);
    }

    #[test]
    fn blocks_are_newline_separated_and_deterministic() {
        let blocks = vec![
            Block::Text(text("a", "<p>one</p>")),
            Block::Divider(Divider { id: id("b") }),
        ];
        let first = render(&blocks);
        assert_eq!(
            first,
            format!("<div style=\"text-align: left;\"><p>one</p></div>\n{DIVIDER}")
        );
        assert_eq!(first, render(&blocks));
        assert_eq!(render(&[]), "");
    }

    #[test]
    fn escape_only_allocates_when_needed() {
        assert!(matches!(escape("plain"), Cow::Borrowed("plain")));
        assert_eq!(escape(r#"a&b<c>"d"#), "a&amp;b&lt;c&gt;&quot;d");
    }
}
