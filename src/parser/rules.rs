//! Ordered classification rules. The first rule whose predicate matches a
//! node builds its block; order matters for ambiguous markup such as a `div`
//! that could be social links, an image, a spacer or plain text.

use std::sync::LazyLock;

use markup5ever_rcdom::Handle;
use regex::Regex;

use super::dom::{
    attr, attr_names, descendants_named, element_children, first_descendant_named, inner_html,
    is_element, own_cells, tag_name, text_content, text_of,
};
use super::style;
use crate::block::{
    Align, Block, BlockId, Button, Columns, Divider, Heading, HeadingLevel, IconStyle, Image,
    Quote, Social, SocialLink, Spacer, Text,
};
use crate::html::escape;
use crate::palette;

/// `/icons/social/<style>/<platform>.png`, as emitted by the serializer.
static SOCIAL_ICON: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/icons/social/(color|grey|black|white)/([A-Za-z0-9_-]+)\.png")
        .expect("social icon pattern is valid")
});

pub(super) struct Rule {
    pub(super) name: &'static str,
    pub(super) matches: fn(&Handle) -> bool,
    pub(super) build: fn(&Handle) -> Block,
}

pub(super) const RULES: &[Rule] = &[
    Rule {
        name: "text-node",
        matches: is_text_node,
        build: build_paragraph,
    },
    Rule {
        name: "heading",
        matches: is_heading,
        build: build_heading,
    },
    Rule {
        name: "divider",
        matches: is_divider,
        build: build_divider,
    },
    Rule {
        name: "blockquote",
        matches: is_blockquote,
        build: build_blockquote,
    },
    Rule {
        name: "columns",
        matches: is_columns_table,
        build: build_columns,
    },
    Rule {
        name: "quote-table",
        matches: is_quote_table,
        build: build_quote_table,
    },
    Rule {
        name: "button",
        matches: is_button_table,
        build: build_button,
    },
    Rule {
        name: "social",
        matches: is_social,
        build: build_social,
    },
    Rule {
        name: "image",
        matches: is_image,
        build: build_image,
    },
    Rule {
        name: "spacer",
        matches: is_spacer,
        build: build_spacer,
    },
    Rule {
        name: "text-wrapper",
        matches: is_text_wrapper,
        build: build_text_wrapper,
    },
];

/// Alignment from inline `text-align`, then the `align` attribute.
pub(super) fn read_align(node: &Handle) -> Align {
    style::align_from(
        attr(node, "style").as_deref(),
        attr(node, "align").as_deref(),
    )
}

fn is_text_node(node: &Handle) -> bool {
    text_of(node).is_some_and(|text| !text.trim().is_empty())
}

fn build_paragraph(node: &Handle) -> Block {
    let text = text_of(node).unwrap_or_default();
    Block::Text(Text {
        id: BlockId::generate(),
        html: format!("<p>{}</p>", escape(text.trim())),
        align: Align::Left,
    })
}

fn heading_level(node: &Handle) -> Option<HeadingLevel> {
    match tag_name(node)? {
        "h1" => Some(HeadingLevel::H1),
        "h2" => Some(HeadingLevel::H2),
        "h3" => Some(HeadingLevel::H3),
        _ => None,
    }
}

fn is_heading(node: &Handle) -> bool {
    heading_level(node).is_some()
}

fn build_heading(node: &Handle) -> Block {
    Block::Heading(Heading {
        id: BlockId::generate(),
        level: heading_level(node).unwrap_or(HeadingLevel::H1),
        text: inner_html(node),
        align: read_align(node),
    })
}

fn is_divider(node: &Handle) -> bool {
    is_element(node, "hr")
}

fn build_divider(_node: &Handle) -> Block {
    Block::Divider(Divider {
        id: BlockId::generate(),
    })
}

fn is_blockquote(node: &Handle) -> bool {
    is_element(node, "blockquote")
}

fn build_blockquote(node: &Handle) -> Block {
    // Attribution is not recoverable from a bare blockquote.
    Block::Quote(Quote {
        id: BlockId::generate(),
        text: text_content(node).trim().to_string(),
        attribution: String::new(),
        align: read_align(node),
    })
}

/// An anchor whose inline style makes it look like a button.
fn is_button_anchor(anchor: &Handle) -> bool {
    let Some(style) = attr(anchor, "style") else {
        return false;
    };
    style::declarations(&style).any(|(name, _)| {
        matches!(name.as_str(), "background-color" | "background" | "padding")
    })
}

fn has_button_anchor(node: &Handle) -> bool {
    descendants_named(node, "a").iter().any(is_button_anchor)
}

fn is_columns_table(node: &Handle) -> bool {
    is_element(node, "table") && own_cells(node).len() == 2 && !has_button_anchor(node)
}

fn build_columns(node: &Handle) -> Block {
    let cells = own_cells(node);
    let zone = |index: usize| {
        cells
            .get(index)
            .map(super::parse_zone)
            .unwrap_or_default()
    };
    Block::Columns(Columns {
        id: BlockId::generate(),
        left: zone(0),
        right: zone(1),
    })
}

fn quote_cell(node: &Handle) -> Option<Handle> {
    if !is_element(node, "table") {
        return None;
    }
    let cells = own_cells(node);
    if cells.len() != 1 {
        return None;
    }
    let cell = cells.into_iter().next()?;
    element_children(&cell)
        .iter()
        .any(|child| is_element(child, "blockquote"))
        .then_some(cell)
}

fn is_quote_table(node: &Handle) -> bool {
    quote_cell(node).is_some()
}

fn build_quote_table(node: &Handle) -> Block {
    let Some(cell) = quote_cell(node) else {
        return Block::Text(super::fallback_text(node));
    };
    let children = element_children(&cell);
    let text = children
        .iter()
        .find(|child| is_element(child, "blockquote"))
        .map(|quote| text_content(quote).trim().to_string())
        .unwrap_or_default();
    let attribution = children
        .iter()
        .find(|child| is_element(child, "p"))
        .map(|line| {
            let line = text_content(line);
            let line = line.trim();
            line.strip_prefix('—').unwrap_or(line).trim().to_string()
        })
        .unwrap_or_default();

    Block::Quote(Quote {
        id: BlockId::generate(),
        text,
        attribution,
        align: read_align(&cell),
    })
}

fn is_button_table(node: &Handle) -> bool {
    is_element(node, "table") && first_descendant_named(node, "a").is_some()
}

fn build_button(node: &Handle) -> Block {
    let Some(anchor) = first_descendant_named(node, "a") else {
        return Block::Text(super::fallback_text(node));
    };
    let anchor_style = attr(&anchor, "style").unwrap_or_default();
    let bg_color = style::property(&anchor_style, "background-color")
        .or_else(|| style::property(&anchor_style, "background"))
        .map(str::to_string);
    let text_color = style::property(&anchor_style, "color").map(str::to_string);
    let align = own_cells(node)
        .first()
        .map(read_align)
        .unwrap_or_else(|| read_align(node));

    Block::Button(Button {
        id: BlockId::generate(),
        text: text_content(&anchor).trim().to_string(),
        url: attr(&anchor, "href").unwrap_or_default(),
        align,
        bg_color,
        text_color,
    })
}

fn icon_src(anchor: &Handle) -> Option<String> {
    first_descendant_named(anchor, "img").and_then(|img| attr(&img, "src"))
}

fn social_anchors(node: &Handle) -> Vec<Handle> {
    element_children(node)
        .into_iter()
        .filter(|child| is_element(child, "a"))
        .collect()
}

fn is_social(node: &Handle) -> bool {
    if !is_element(node, "div") {
        return false;
    }
    let anchors = social_anchors(node);
    anchors.len() >= 2
        && anchors
            .iter()
            .all(|anchor| icon_src(anchor).is_some_and(|src| src.contains("/social/")))
}

fn build_social(node: &Handle) -> Block {
    let mut icon_style = None;
    let mut links = Vec::new();
    for anchor in social_anchors(node) {
        let Some(src) = icon_src(&anchor) else {
            continue;
        };
        let Some(caps) = SOCIAL_ICON.captures(&src) else {
            continue;
        };
        if icon_style.is_none() {
            icon_style = IconStyle::from_name(&caps[1]);
        }
        links.push(SocialLink::new(
            caps[2].to_ascii_lowercase(),
            attr(&anchor, "href").unwrap_or_default(),
        ));
    }
    if links.is_empty() {
        tracing::debug!("no social icon recognized, using default links");
        links = palette::default_social_links();
    }

    Block::Social(Social {
        id: BlockId::generate(),
        align: read_align(node),
        icon_style: icon_style.unwrap_or_default(),
        links,
    })
}

fn is_content_free(node: &Handle) -> bool {
    text_content(node).trim().is_empty()
}

/// A bare `img`, or a content-free `div` whose only element child is an `img`.
fn is_image(node: &Handle) -> bool {
    if is_element(node, "img") {
        return true;
    }
    is_element(node, "div")
        && is_content_free(node)
        && matches!(element_children(node).as_slice(), [child] if is_element(child, "img"))
}

fn build_image(node: &Handle) -> Block {
    let img = if is_element(node, "img") {
        Some(node.clone())
    } else {
        first_descendant_named(node, "img")
    };
    let Some(img) = img else {
        return Block::Text(super::fallback_text(node));
    };
    let img_style = attr(&img, "style").unwrap_or_default();

    Block::Image(Image {
        id: BlockId::generate(),
        src: attr(&img, "src").unwrap_or_default(),
        alt: attr(&img, "alt").unwrap_or_default(),
        width: style::property(&img_style, "width").and_then(|w| style::length_in(w, "%")),
        max_width: style::property(&img_style, "max-width")
            .and_then(|w| style::length_in(w, "px")),
        align: read_align(node),
    })
}

fn is_spacer(node: &Handle) -> bool {
    is_element(node, "div")
        && is_content_free(node)
        && attr(node, "style").is_some_and(|s| style::property(&s, "height").is_some())
}

fn build_spacer(node: &Handle) -> Block {
    let height = attr(node, "style")
        .and_then(|s| style::property(&s, "height").and_then(style::leading_number))
        .unwrap_or(palette::DEFAULT_SPACER_HEIGHT);
    Block::Spacer(Spacer {
        id: BlockId::generate(),
        height,
    })
}

/// The serializer's own text wrapper: a `div` styled with nothing but `text-align`.
fn is_text_wrapper(node: &Handle) -> bool {
    if !is_element(node, "div") || attr_names(node) != ["style"] {
        return false;
    }
    let Some(style) = attr(node, "style") else {
        return false;
    };
    let decls: Vec<_> = style::declarations(&style).collect();
    matches!(
        decls.as_slice(),
        [(name, value)] if name == "text-align" && Align::from_css(value).is_some()
    )
}

fn build_text_wrapper(node: &Handle) -> Block {
    Block::Text(Text {
        id: BlockId::generate(),
        html: inner_html(node),
        align: read_align(node),
    })
}
