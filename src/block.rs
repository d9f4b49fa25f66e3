use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::InvalidHeadingLevel;

/// Opaque block identifier, unique within a document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(String);

impl BlockId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// A fresh random id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BlockId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for BlockId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Horizontal alignment shared by most variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

impl Align {
    pub fn as_str(self) -> &'static str {
        match self {
            Align::Left => "left",
            Align::Center => "center",
            Align::Right => "right",
        }
    }

    /// Reads a CSS `text-align` value or a legacy `align` attribute value.
    pub fn from_css(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "left" | "start" => Some(Align::Left),
            "center" | "middle" => Some(Align::Center),
            "right" | "end" => Some(Align::Right),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
}

impl HeadingLevel {
    pub fn number(self) -> u8 {
        match self {
            HeadingLevel::H1 => 1,
            HeadingLevel::H2 => 2,
            HeadingLevel::H3 => 3,
        }
    }
}

impl TryFrom<u8> for HeadingLevel {
    type Error = InvalidHeadingLevel;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        match level {
            1 => Ok(HeadingLevel::H1),
            2 => Ok(HeadingLevel::H2),
            3 => Ok(HeadingLevel::H3),
            other => Err(InvalidHeadingLevel(other)),
        }
    }
}

impl From<HeadingLevel> for u8 {
    fn from(level: HeadingLevel) -> Self {
        level.number()
    }
}

/// Icon set used for social links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IconStyle {
    #[default]
    Color,
    Grey,
    Black,
    White,
}

impl IconStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            IconStyle::Color => "color",
            IconStyle::Grey => "grey",
            IconStyle::Black => "black",
            IconStyle::White => "white",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "color" => Some(IconStyle::Color),
            "grey" => Some(IconStyle::Grey),
            "black" => Some(IconStyle::Black),
            "white" => Some(IconStyle::White),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLink {
    /// Free-form name, matched against the known icon table when rendering.
    pub platform: String,
    pub url: String,
}

impl SocialLink {
    pub fn new(platform: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            platform: platform.into(),
            url: url.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heading {
    pub id: BlockId,
    pub level: HeadingLevel,
    /// Inline HTML, inserted unescaped.
    pub text: String,
    #[serde(default)]
    pub align: Align,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    pub id: BlockId,
    /// Block-level HTML fragment, inserted unescaped.
    pub html: String,
    #[serde(default)]
    pub align: Align,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Button {
    pub id: BlockId,
    pub text: String,
    pub url: String,
    #[serde(default)]
    pub align: Align,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub id: BlockId,
    /// Empty means the image has not been chosen yet.
    pub src: String,
    #[serde(default)]
    pub alt: String,
    /// Percent of the container width.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// Pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_width: Option<u32>,
    #[serde(default)]
    pub align: Align,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Divider {
    pub id: BlockId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spacer {
    pub id: BlockId,
    /// Pixels.
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Social {
    pub id: BlockId,
    #[serde(default)]
    pub align: Align,
    #[serde(default)]
    pub icon_style: IconStyle,
    #[serde(default)]
    pub links: Vec<SocialLink>,
}

/// Two fixed zones. Zones hold [`ColumnBlock`]s, which cannot be columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Columns {
    pub id: BlockId,
    #[serde(default)]
    pub left: Vec<ColumnBlock>,
    #[serde(default)]
    pub right: Vec<ColumnBlock>,
}

impl Columns {
    pub fn zone(&self, side: Side) -> &Vec<ColumnBlock> {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    pub fn zone_mut(&mut self, side: Side) -> &mut Vec<ColumnBlock> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }
}

/// One of the two zones of a [`Columns`] block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub id: BlockId,
    pub text: String,
    #[serde(default)]
    pub attribution: String,
    #[serde(default)]
    pub align: Align,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: BlockId,
    pub thumbnail_url: String,
    pub video_url: String,
    #[serde(default)]
    pub alt: String,
    #[serde(default)]
    pub align: Align,
}

/// Raw passthrough markup. Not validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawHtml {
    pub id: BlockId,
    pub code: String,
}

/// Discriminant of a block, without its data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Heading,
    Text,
    Button,
    Image,
    Divider,
    Spacer,
    Social,
    Columns,
    Quote,
    Video,
    Html,
}

impl BlockKind {
    pub const ALL: [BlockKind; 11] = [
        BlockKind::Heading,
        BlockKind::Text,
        BlockKind::Button,
        BlockKind::Image,
        BlockKind::Divider,
        BlockKind::Spacer,
        BlockKind::Social,
        BlockKind::Columns,
        BlockKind::Quote,
        BlockKind::Video,
        BlockKind::Html,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BlockKind::Heading => "heading",
            BlockKind::Text => "text",
            BlockKind::Button => "button",
            BlockKind::Image => "image",
            BlockKind::Divider => "divider",
            BlockKind::Spacer => "spacer",
            BlockKind::Social => "social",
            BlockKind::Columns => "columns",
            BlockKind::Quote => "quote",
            BlockKind::Video => "video",
            BlockKind::Html => "html",
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A top-level block of an email document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Block {
    Heading(Heading),
    Text(Text),
    Button(Button),
    Image(Image),
    Divider(Divider),
    Spacer(Spacer),
    Social(Social),
    Columns(Columns),
    Quote(Quote),
    Video(Video),
    Html(RawHtml),
}

/// A block that may live inside a columns zone: every variant except columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ColumnBlock {
    Heading(Heading),
    Text(Text),
    Button(Button),
    Image(Image),
    Divider(Divider),
    Spacer(Spacer),
    Social(Social),
    Quote(Quote),
    Video(Video),
    Html(RawHtml),
}

impl Block {
    pub fn id(&self) -> &BlockId {
        match self {
            Block::Heading(b) => &b.id,
            Block::Text(b) => &b.id,
            Block::Button(b) => &b.id,
            Block::Image(b) => &b.id,
            Block::Divider(b) => &b.id,
            Block::Spacer(b) => &b.id,
            Block::Social(b) => &b.id,
            Block::Columns(b) => &b.id,
            Block::Quote(b) => &b.id,
            Block::Video(b) => &b.id,
            Block::Html(b) => &b.id,
        }
    }

    fn id_mut(&mut self) -> &mut BlockId {
        match self {
            Block::Heading(b) => &mut b.id,
            Block::Text(b) => &mut b.id,
            Block::Button(b) => &mut b.id,
            Block::Image(b) => &mut b.id,
            Block::Divider(b) => &mut b.id,
            Block::Spacer(b) => &mut b.id,
            Block::Social(b) => &mut b.id,
            Block::Columns(b) => &mut b.id,
            Block::Quote(b) => &mut b.id,
            Block::Video(b) => &mut b.id,
            Block::Html(b) => &mut b.id,
        }
    }

    pub fn kind(&self) -> BlockKind {
        match self {
            Block::Columns(_) => BlockKind::Columns,
            Block::Heading(_) => BlockKind::Heading,
            Block::Text(_) => BlockKind::Text,
            Block::Button(_) => BlockKind::Button,
            Block::Image(_) => BlockKind::Image,
            Block::Divider(_) => BlockKind::Divider,
            Block::Spacer(_) => BlockKind::Spacer,
            Block::Social(_) => BlockKind::Social,
            Block::Quote(_) => BlockKind::Quote,
            Block::Video(_) => BlockKind::Video,
            Block::Html(_) => BlockKind::Html,
        }
    }

    /// A copy with every id regenerated, nested column children included.
    pub fn with_fresh_ids(&self) -> Block {
        let mut copy = self.clone();
        *copy.id_mut() = BlockId::generate();
        if let Block::Columns(columns) = &mut copy {
            for side in Side::BOTH {
                for child in columns.zone_mut(side) {
                    *child.id_mut() = BlockId::generate();
                }
            }
        }
        copy
    }

    /// Every id in this block, nested ones after the block's own.
    pub fn ids(&self) -> Vec<&BlockId> {
        let mut ids = vec![self.id()];
        if let Block::Columns(columns) = self {
            ids.extend(columns.left.iter().map(ColumnBlock::id));
            ids.extend(columns.right.iter().map(ColumnBlock::id));
        }
        ids
    }
}

impl ColumnBlock {
    pub fn id(&self) -> &BlockId {
        match self {
            ColumnBlock::Heading(b) => &b.id,
            ColumnBlock::Text(b) => &b.id,
            ColumnBlock::Button(b) => &b.id,
            ColumnBlock::Image(b) => &b.id,
            ColumnBlock::Divider(b) => &b.id,
            ColumnBlock::Spacer(b) => &b.id,
            ColumnBlock::Social(b) => &b.id,
            ColumnBlock::Quote(b) => &b.id,
            ColumnBlock::Video(b) => &b.id,
            ColumnBlock::Html(b) => &b.id,
        }
    }

    fn id_mut(&mut self) -> &mut BlockId {
        match self {
            ColumnBlock::Heading(b) => &mut b.id,
            ColumnBlock::Text(b) => &mut b.id,
            ColumnBlock::Button(b) => &mut b.id,
            ColumnBlock::Image(b) => &mut b.id,
            ColumnBlock::Divider(b) => &mut b.id,
            ColumnBlock::Spacer(b) => &mut b.id,
            ColumnBlock::Social(b) => &mut b.id,
            ColumnBlock::Quote(b) => &mut b.id,
            ColumnBlock::Video(b) => &mut b.id,
            ColumnBlock::Html(b) => &mut b.id,
        }
    }

    pub fn kind(&self) -> BlockKind {
        match self {
            ColumnBlock::Heading(_) => BlockKind::Heading,
            ColumnBlock::Text(_) => BlockKind::Text,
            ColumnBlock::Button(_) => BlockKind::Button,
            ColumnBlock::Image(_) => BlockKind::Image,
            ColumnBlock::Divider(_) => BlockKind::Divider,
            ColumnBlock::Spacer(_) => BlockKind::Spacer,
            ColumnBlock::Social(_) => BlockKind::Social,
            ColumnBlock::Quote(_) => BlockKind::Quote,
            ColumnBlock::Video(_) => BlockKind::Video,
            ColumnBlock::Html(_) => BlockKind::Html,
        }
    }

    pub fn with_fresh_ids(&self) -> ColumnBlock {
        let mut copy = self.clone();
        *copy.id_mut() = BlockId::generate();
        copy
    }
}

impl From<ColumnBlock> for Block {
    fn from(block: ColumnBlock) -> Self {
        match block {
            ColumnBlock::Heading(b) => Block::Heading(b),
            ColumnBlock::Text(b) => Block::Text(b),
            ColumnBlock::Button(b) => Block::Button(b),
            ColumnBlock::Image(b) => Block::Image(b),
            ColumnBlock::Divider(b) => Block::Divider(b),
            ColumnBlock::Spacer(b) => Block::Spacer(b),
            ColumnBlock::Social(b) => Block::Social(b),
            ColumnBlock::Quote(b) => Block::Quote(b),
            ColumnBlock::Video(b) => Block::Video(b),
            ColumnBlock::Html(b) => Block::Html(b),
        }
    }
}

/// Fails for columns blocks, handing the columns value back.
impl TryFrom<Block> for ColumnBlock {
    type Error = Columns;

    fn try_from(block: Block) -> Result<Self, Self::Error> {
        match block {
            Block::Columns(columns) => Err(columns),
            Block::Heading(b) => Ok(ColumnBlock::Heading(b)),
            Block::Text(b) => Ok(ColumnBlock::Text(b)),
            Block::Button(b) => Ok(ColumnBlock::Button(b)),
            Block::Image(b) => Ok(ColumnBlock::Image(b)),
            Block::Divider(b) => Ok(ColumnBlock::Divider(b)),
            Block::Spacer(b) => Ok(ColumnBlock::Spacer(b)),
            Block::Social(b) => Ok(ColumnBlock::Social(b)),
            Block::Quote(b) => Ok(ColumnBlock::Quote(b)),
            Block::Video(b) => Ok(ColumnBlock::Video(b)),
            Block::Html(b) => Ok(ColumnBlock::Html(b)),
        }
    }
}
