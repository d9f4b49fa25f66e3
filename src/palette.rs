//! The "add block" palette: labels, icons and default-valued factories.

use crate::block::{
    Align, Block, BlockId, BlockKind, Button, ColumnBlock, Columns, Divider, Heading,
    HeadingLevel, IconStyle, Image, Quote, RawHtml, Social, SocialLink, Spacer, Text, Video,
};

pub const DEFAULT_SPACER_HEIGHT: u32 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteEntry {
    pub kind: BlockKind,
    pub label: &'static str,
    /// Icon identifier understood by the editor UI.
    pub icon: &'static str,
}

/// Palette entries in display order.
pub const PALETTE: &[PaletteEntry] = &[
    PaletteEntry {
        kind: BlockKind::Heading,
        label: "Heading",
        icon: "heading",
    },
    PaletteEntry {
        kind: BlockKind::Text,
        label: "Text",
        icon: "type",
    },
    PaletteEntry {
        kind: BlockKind::Button,
        label: "Button",
        icon: "mouse-pointer-click",
    },
    PaletteEntry {
        kind: BlockKind::Image,
        label: "Image",
        icon: "image",
    },
    PaletteEntry {
        kind: BlockKind::Divider,
        label: "Divider",
        icon: "minus",
    },
    PaletteEntry {
        kind: BlockKind::Spacer,
        label: "Spacer",
        icon: "move-vertical",
    },
    PaletteEntry {
        kind: BlockKind::Social,
        label: "Social Links",
        icon: "share-2",
    },
    PaletteEntry {
        kind: BlockKind::Columns,
        label: "Columns",
        icon: "columns-2",
    },
    PaletteEntry {
        kind: BlockKind::Quote,
        label: "Quote",
        icon: "quote",
    },
    PaletteEntry {
        kind: BlockKind::Video,
        label: "Video",
        icon: "video",
    },
    PaletteEntry {
        kind: BlockKind::Html,
        label: "HTML",
        icon: "code",
    },
];

impl BlockKind {
    pub fn palette_entry(self) -> &'static PaletteEntry {
        // PALETTE lists every kind exactly once, in the order of BlockKind::ALL.
        &PALETTE[self as usize]
    }

    pub fn label(self) -> &'static str {
        self.palette_entry().label
    }

    pub fn icon(self) -> &'static str {
        self.palette_entry().icon
    }

    /// A new block of this kind with fresh ids and default values.
    pub fn create(self) -> Block {
        match self.create_column_block() {
            Some(block) => block.into(),
            None => Block::Columns(Columns {
                id: BlockId::generate(),
                left: vec![default_text()],
                right: vec![default_text()],
            }),
        }
    }

    /// A new block for a columns zone; `None` for columns, which cannot nest.
    pub fn create_column_block(self) -> Option<ColumnBlock> {
        let id = BlockId::generate();
        let block = match self {
            BlockKind::Columns => return None,
            BlockKind::Heading => ColumnBlock::Heading(Heading {
                id,
                level: HeadingLevel::H2,
                text: "Your heading".to_string(),
                align: Align::Left,
            }),
            BlockKind::Text => return Some(default_text()),
            BlockKind::Button => ColumnBlock::Button(Button {
                id,
                text: "Click here".to_string(),
                url: "https://".to_string(),
                align: Align::Center,
                bg_color: None,
                text_color: None,
            }),
            BlockKind::Image => ColumnBlock::Image(Image {
                id,
                src: String::new(),
                alt: String::new(),
                width: None,
                max_width: None,
                align: Align::Center,
            }),
            BlockKind::Divider => ColumnBlock::Divider(Divider { id }),
            BlockKind::Spacer => ColumnBlock::Spacer(Spacer {
                id,
                height: DEFAULT_SPACER_HEIGHT,
            }),
            BlockKind::Social => ColumnBlock::Social(Social {
                id,
                align: Align::Center,
                icon_style: IconStyle::Color,
                links: default_social_links(),
            }),
            BlockKind::Quote => ColumnBlock::Quote(Quote {
                id,
                text: "Add a memorable quote here.".to_string(),
                attribution: String::new(),
                align: Align::Left,
            }),
            BlockKind::Video => ColumnBlock::Video(Video {
                id,
                thumbnail_url: String::new(),
                video_url: String::new(),
                alt: String::new(),
                align: Align::Center,
            }),
            BlockKind::Html => ColumnBlock::Html(RawHtml {
                id,
                code: "<div></div>".to_string(),
            }),
        };
        Some(block)
    }
}

fn default_text() -> ColumnBlock {
    ColumnBlock::Text(Text {
        id: BlockId::generate(),
        html: "<p>Write something here.</p>".to_string(),
        align: Align::Left,
    })
}

/// Links used for a new social block, or when none can be recovered from markup.
pub(crate) fn default_social_links() -> Vec<SocialLink> {
    vec![
        SocialLink::new("facebook", "https://facebook.com"),
        SocialLink::new("instagram", "https://instagram.com"),
        SocialLink::new("x", "https://x.com"),
    ]
}
